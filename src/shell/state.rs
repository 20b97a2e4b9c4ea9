use std::sync::{Mutex, MutexGuard, PoisonError};

use super::base::BaseLayout;
use super::event::{EventBus, NavEvent};
use super::identity::ScreenIdentity;
use super::instance::InstanceCache;
use super::lifecycle::TeardownReason;
use super::stack::NavigationStack;
use super::transition::PendingSettles;

/// Everything a navigation operation mutates, kept behind one lock
#[derive(Debug)]
pub(crate) struct NavState {
    pub stack: NavigationStack,
    pub cache: InstanceCache,
    pub base: BaseLayout,
    pub pending: PendingSettles,
}

impl NavState {
    pub fn new(base: BaseLayout) -> Self {
        Self {
            stack: NavigationStack::new(base.active_tab()),
            cache: InstanceCache::new(),
            base,
            pending: PendingSettles::default(),
        }
    }

    /// `Some(reason)` if leaving `identity` must destroy its instance:
    /// entity-scoped and no longer referenced by any frame
    pub fn teardown_reason(
        &self,
        identity: &ScreenIdentity,
        reason: TeardownReason,
    ) -> Option<TeardownReason> {
        let instance = self.cache.get(identity)?;
        (instance.is_entity_scoped() && !self.stack.contains(identity)).then_some(reason)
    }

    /// Destroy `identity` now if nothing on the stack still needs it
    pub fn release_if_orphaned(
        &mut self,
        identity: &ScreenIdentity,
        reason: TeardownReason,
        events: &EventBus,
    ) -> bool {
        if self.teardown_reason(identity, reason).is_none() {
            return false;
        }
        self.pending.cancel_screen(identity);
        match self.cache.destroy(identity, reason) {
            Some(instance) => {
                events.publish(NavEvent::Destroyed {
                    identity: identity.clone(),
                    instance: instance.id(),
                    reason,
                });
                true
            }
            None => false,
        }
    }
}

pub(crate) fn lock_state(state: &Mutex<NavState>) -> MutexGuard<'_, NavState> {
    // Every mutation completes before the guard drops, so a poisoned lock
    // still holds a consistent state
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
