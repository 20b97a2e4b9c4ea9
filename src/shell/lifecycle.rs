use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual state of a cached screen instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualState {
    /// Built but not shown (dormant, or settled after leaving)
    Hidden,

    /// Incoming screen, waiting for the settle delay
    Entering,

    /// Foreground screen, receiving input
    Active,

    /// Covered by a child screen, resident but inert
    Dimmed,

    /// Outgoing screen during backward navigation
    Exiting,
}

impl VisualState {
    /// Whether the instance is currently painted in the panel (dimmed screens peek through)
    pub fn is_visible(self) -> bool {
        !matches!(self, VisualState::Hidden)
    }

    /// Whether the instance accepts input
    pub fn is_interactive(self) -> bool {
        matches!(self, VisualState::Active)
    }
}

impl fmt::Display for VisualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VisualState::Hidden => "hidden",
            VisualState::Entering => "entering",
            VisualState::Active => "active",
            VisualState::Dimmed => "dimmed",
            VisualState::Exiting => "exiting",
        };
        f.write_str(label)
    }
}

/// Policy for what happens when a cached screen is visited again with new params
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Keep the cached content
    #[default]
    Never,

    /// Rebuild when any key field differs from the last params
    OnEntityChange,

    /// Rebuild on every visit
    Always,
}

impl fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RefreshPolicy::Never => "never",
            RefreshPolicy::OnEntityChange => "on-entity-change",
            RefreshPolicy::Always => "always",
        };
        f.write_str(label)
    }
}

/// Reason why a screen instance was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownReason {
    /// Popped by backward navigation and no longer referenced
    Popped,

    /// Collapsed away by returning to an ancestor frame
    AncestorReturn,

    /// Stack was reset to the base layout
    Reset,

    /// Re-opened while still exiting; replaced by a fresh build
    Superseded,

    /// Build resolved after its frame was already gone
    Orphaned,
}

impl fmt::Display for TeardownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TeardownReason::Popped => "popped",
            TeardownReason::AncestorReturn => "ancestor return",
            TeardownReason::Reset => "reset",
            TeardownReason::Superseded => "superseded",
            TeardownReason::Orphaned => "orphaned",
        };
        f.write_str(label)
    }
}
