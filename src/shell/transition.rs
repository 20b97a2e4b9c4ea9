//! Transition controller.
//!
//! Drives the hand-off between the outgoing and incoming screen:
//!
//! ```text
//! forward:   outgoing  Active -> Dimmed            (immediately)
//!            incoming  Hidden -> Entering -> Active (after D)
//! backward:  outgoing  Active -> Exiting -> Hidden  (after D, then destroyed if doomed)
//!            revealed  Dimmed -> Active            (immediately)
//!            or base   Hidden -> Revealing -> Shown (after D)
//! ```
//!
//! Every deferred step is a ticket in [`PendingSettles`]. Touching an
//! instance cancels its outstanding tickets, and a timer only applies its
//! ticket if it is still pending, so a late timer can never overwrite a
//! newer state.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::event::{EventBus, NavEvent};
use super::identity::ScreenIdentity;
use super::instance::InstanceId;
use super::lifecycle::{TeardownReason, VisualState};
use super::state::{lock_state, NavState};

pub type TicketId = u64;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SettleTarget {
    Screen {
        identity: ScreenIdentity,
        instance: InstanceId,
    },
    Base,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SettleAction {
    /// Entering -> Active
    Activate,
    /// Exiting -> Hidden, then destroy if still doomed
    Hide { destroy: Option<TeardownReason> },
    /// Revealing -> Shown
    RevealBase,
}

#[derive(Debug, Clone)]
pub(crate) struct SettleTicket {
    pub id: TicketId,
    pub target: SettleTarget,
    pub action: SettleAction,
}

/// Outstanding deferred steps, in issue order
#[derive(Debug, Default)]
pub(crate) struct PendingSettles {
    next_id: TicketId,
    tickets: BTreeMap<TicketId, SettleTicket>,
}

impl PendingSettles {
    pub fn issue(&mut self, target: SettleTarget, action: SettleAction) -> TicketId {
        self.next_id += 1;
        let id = self.next_id;
        self.tickets.insert(id, SettleTicket { id, target, action });
        id
    }

    /// Cancel every ticket for `identity`; returns how many were dropped
    pub fn cancel_screen(&mut self, identity: &ScreenIdentity) -> usize {
        let before = self.tickets.len();
        self.tickets.retain(|_, ticket| {
            !matches!(&ticket.target, SettleTarget::Screen { identity: target, .. } if target == identity)
        });
        before - self.tickets.len()
    }

    pub fn cancel_base(&mut self) {
        self.tickets.retain(|_, ticket| ticket.target != SettleTarget::Base);
    }

    pub fn take(&mut self, id: TicketId) -> Option<SettleTicket> {
        self.tickets.remove(&id)
    }

    pub fn drain(&mut self) -> Vec<SettleTicket> {
        std::mem::take(&mut self.tickets).into_values().collect()
    }

    pub fn clear(&mut self) {
        self.tickets.clear();
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

/// What an incoming screen covers
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outgoing {
    Base,
    Screen(ScreenIdentity),
}

/// Applies visual hand-offs and schedules their settle steps
#[derive(Debug, Clone)]
pub struct TransitionController {
    settle_delay: Duration,
}

impl TransitionController {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Forward navigation, first half: the covered screen dims, or the base hides
    pub(crate) fn recede(&self, state: &mut NavState, outgoing: &Outgoing, events: &EventBus) {
        match outgoing {
            Outgoing::Base => {
                state.pending.cancel_base();
                if state.base.is_visible() {
                    state.base.hide();
                    events.publish(NavEvent::BaseHidden);
                }
            }
            Outgoing::Screen(identity) => {
                state.pending.cancel_screen(identity);
                if let Some(instance) = state.cache.get_mut(identity) {
                    instance.set_visual_state(VisualState::Dimmed);
                }
            }
        }
    }

    /// Undo `recede` after a failed build
    pub(crate) fn restore(&self, state: &mut NavState, outgoing: &Outgoing, events: &EventBus) {
        match outgoing {
            Outgoing::Base => {
                if state.stack.is_at_base() && !state.base.is_visible() {
                    state.base.show();
                    events.publish(NavEvent::BaseRevealed {
                        tab: state.base.active_tab().to_string(),
                    });
                }
            }
            Outgoing::Screen(identity) => {
                let still_top = state
                    .stack
                    .current()
                    .is_some_and(|top| &top.identity == identity);
                if still_top {
                    self.reactivate(state, identity, events);
                }
            }
        }
    }

    /// Forward navigation, second half: incoming `Hidden -> Entering`
    pub(crate) fn enter(&self, state: &mut NavState, identity: &ScreenIdentity) -> Option<TicketId> {
        state.pending.cancel_screen(identity);
        let instance = state.cache.get_mut(identity)?;
        instance.set_doomed(false);
        instance.set_visual_state(VisualState::Entering);
        let target = SettleTarget::Screen {
            identity: identity.clone(),
            instance: instance.id(),
        };
        Some(state.pending.issue(target, SettleAction::Activate))
    }

    /// Backward navigation: outgoing `Active -> Exiting`; `destroy` marks it doomed
    pub(crate) fn exit(
        &self,
        state: &mut NavState,
        identity: &ScreenIdentity,
        destroy: Option<TeardownReason>,
    ) -> Option<TicketId> {
        state.pending.cancel_screen(identity);
        let instance = state.cache.get_mut(identity)?;
        instance.set_doomed(destroy.is_some());
        instance.set_visual_state(VisualState::Exiting);
        let target = SettleTarget::Screen {
            identity: identity.clone(),
            instance: instance.id(),
        };
        Some(state.pending.issue(target, SettleAction::Hide { destroy }))
    }

    /// Already-resident screen becomes active without a delay
    pub(crate) fn reactivate(&self, state: &mut NavState, identity: &ScreenIdentity, events: &EventBus) {
        state.pending.cancel_screen(identity);
        if let Some(instance) = state.cache.get_mut(identity) {
            instance.set_doomed(false);
            instance.set_visual_state(VisualState::Active);
            events.publish(NavEvent::Settled {
                identity: identity.clone(),
                state: VisualState::Active,
            });
        }
    }

    /// Hide without animation (collapsed frames, resets, orphaned builds)
    pub(crate) fn hide_now(&self, state: &mut NavState, identity: &ScreenIdentity) {
        state.pending.cancel_screen(identity);
        if let Some(instance) = state.cache.get_mut(identity) {
            instance.set_visual_state(VisualState::Hidden);
        }
    }

    /// Stack emptied by backward navigation: reveal the base on the branch's origin tab
    pub(crate) fn reveal_base(&self, state: &mut NavState, tab: &str, events: &EventBus) -> TicketId {
        if let Err(err) = state.base.switch_tab(tab) {
            log::warn!("Keeping base tab '{}': {}", state.base.active_tab(), err);
        }
        state.pending.cancel_base();
        state.base.reveal();
        events.publish(NavEvent::BaseRevealed {
            tab: state.base.active_tab().to_string(),
        });
        state.pending.issue(SettleTarget::Base, SettleAction::RevealBase)
    }

    /// Fire the given tickets after the settle delay
    pub(crate) fn schedule(&self, state: &Arc<Mutex<NavState>>, events: &EventBus, tickets: Vec<TicketId>) {
        if tickets.is_empty() {
            return;
        }

        let weak = Arc::downgrade(state);
        let events = events.clone();
        let delay = self.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(state) = weak.upgrade() else {
                return;
            };
            let mut guard = lock_state(&state);
            for id in tickets {
                // Missing means superseded by a newer navigation
                if let Some(ticket) = guard.pending.take(id) {
                    Self::apply(&mut guard, ticket, &events);
                }
            }
        });
    }

    /// Apply every pending ticket now; returns how many were applied
    pub(crate) fn flush(state: &mut NavState, events: &EventBus) -> usize {
        let tickets = state.pending.drain();
        let count = tickets.len();
        for ticket in tickets {
            Self::apply(state, ticket, events);
        }
        count
    }

    fn apply(state: &mut NavState, ticket: SettleTicket, events: &EventBus) {
        log::trace!("Applying settle ticket {} ({:?})", ticket.id, ticket.action);
        match (ticket.target, ticket.action) {
            (SettleTarget::Base, _) => {
                if state.base.settle() {
                    log::debug!("Base layout settled on '{}'", state.base.active_tab());
                }
            }
            (SettleTarget::Screen { identity, instance }, action) => {
                let Some(current) = state.cache.get_mut(&identity) else {
                    return;
                };
                if current.id() != instance {
                    return;
                }

                match action {
                    SettleAction::Activate => {
                        current.set_visual_state(VisualState::Active);
                        events.publish(NavEvent::Settled {
                            identity,
                            state: VisualState::Active,
                        });
                    }
                    SettleAction::Hide { destroy } => {
                        current.set_visual_state(VisualState::Hidden);
                        let doomed = current.is_doomed();
                        events.publish(NavEvent::Settled {
                            identity: identity.clone(),
                            state: VisualState::Hidden,
                        });
                        if let (Some(reason), true) = (destroy, doomed) {
                            state.release_if_orphaned(&identity, reason, events);
                        }
                    }
                    SettleAction::RevealBase => {}
                }
            }
        }
    }
}
