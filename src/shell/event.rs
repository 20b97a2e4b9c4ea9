use serde::Serialize;
use tokio::sync::broadcast;

use super::identity::ScreenIdentity;
use super::instance::InstanceId;
use super::lifecycle::{TeardownReason, VisualState};

/// Notifications published by the navigator.
///
/// Hosts mount and unmount view nodes from these; nothing in the core
/// depends on anyone listening.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NavEvent {
    /// New frame appended
    Pushed { identity: ScreenIdentity, depth: usize },

    /// Navigated back to an ancestor, collapsing the frames above it
    ReturnedTo {
        identity: ScreenIdentity,
        collapsed: Vec<ScreenIdentity>,
    },

    /// Top frame removed by backward navigation
    Popped { identity: ScreenIdentity, depth: usize },

    /// Fresh instance created by a factory
    Built {
        identity: ScreenIdentity,
        instance: InstanceId,
    },

    /// Content rebuilt in place
    Refreshed {
        identity: ScreenIdentity,
        revision: u32,
    },

    /// Instance detached and removed from the cache
    Destroyed {
        identity: ScreenIdentity,
        instance: InstanceId,
        reason: TeardownReason,
    },

    /// A transition finished for an instance
    Settled {
        identity: ScreenIdentity,
        state: VisualState,
    },

    /// Root layout visible again on this tab
    BaseRevealed { tab: String },

    /// Root layout covered by the first frame of a branch
    BaseHidden,

    /// Root layout switched tabs
    TabSwitched { tab: String },

    /// Stack cleared
    Reset { tab: String },

    /// Factory rejected; the push was rolled back
    BuildFailed { screen: String, message: String },
}

/// Broadcast event bus
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<NavEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NavEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: NavEvent) {
        log::trace!("event: {:?}", event);
        // No subscribers is fine
        let _ = self.sender.send(event);
    }
}
