//! Public navigation API.
//!
//! [`Navigator`] glues the registry, the instance cache, the stack, the base
//! layout and the transition controller together. Navigation operations are
//! serialized by a fair async gate; state lives behind a plain mutex that is
//! only ever held between awaits, never across one.

use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::ShellConfig;

use super::base::{BaseLayout, BasePhase};
use super::descriptor::ScreenDescriptor;
use super::error::NavError;
use super::event::{EventBus, NavEvent};
use super::identity::ScreenIdentity;
use super::instance::{ResolvePlan, ScreenInstance};
use super::lifecycle::{TeardownReason, VisualState};
use super::overview::NavOverview;
use super::params::ScreenParams;
use super::registry::ScreenRegistry;
use super::stack::{FrameId, PushPlan, StackFrame};
use super::state::{lock_state, NavState};
use super::transition::{Outgoing, TicketId, TransitionController};
use super::view::ViewFragment;

struct Inner {
    registry: RwLock<ScreenRegistry>,
    state: Arc<Mutex<NavState>>,
    /// FIFO queue of navigation operations
    gate: tokio::sync::Mutex<()>,
    transitions: TransitionController,
    events: EventBus,
}

/// Handle to the navigation stack; clones share the same state
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<Inner>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(&ShellConfig::default())
    }
}

impl Navigator {
    pub fn new(config: &ShellConfig) -> Self {
        let base = BaseLayout::new(config.base.tabs.clone(), config.base.default_tab.clone());
        Self {
            inner: Arc::new(Inner {
                registry: RwLock::new(ScreenRegistry::new()),
                state: Arc::new(Mutex::new(NavState::new(base))),
                gate: tokio::sync::Mutex::new(()),
                transitions: TransitionController::new(config.settle_delay()),
                events: EventBus::new(config.events.capacity),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NavState> {
        lock_state(&self.inner.state)
    }

    fn events(&self) -> &EventBus {
        &self.inner.events
    }

    fn descriptor(&self, screen_name: &str) -> Result<Arc<ScreenDescriptor>, NavError> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(screen_name)
    }

    // ---- Registry ----

    pub fn register_screen(&self, descriptor: ScreenDescriptor) -> Result<(), NavError> {
        self.inner
            .registry
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .register(descriptor)
    }

    /// Registered descriptors, in registration order
    pub fn screens(&self) -> Vec<Arc<ScreenDescriptor>> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// Identity `screen_name` would resolve to for `params`
    pub fn identity_of(&self, screen_name: &str, params: &ScreenParams) -> Result<ScreenIdentity, NavError> {
        self.descriptor(screen_name)?.identity_for(params)
    }

    // ---- Navigation ----

    /// Navigate forward to `screen_name`.
    ///
    /// An identity already on top is refreshed in place (or left alone), an
    /// identity deeper in the stack is returned to, anything else is pushed.
    /// Unknown screens and missing key params fail before queueing.
    pub async fn navigate_to(&self, screen_name: &str, params: ScreenParams) -> Result<(), NavError> {
        let descriptor = self.descriptor(screen_name)?;
        let identity = descriptor.identity_for(&params)?;

        let _turn = self.inner.gate.lock().await;
        let plan = self.lock().stack.plan(&identity);
        log::debug!("navigate_to {} -> {:?}", identity, plan);

        match plan {
            PushPlan::AlreadyTop => self.refresh_top(&descriptor, identity, params).await,
            PushPlan::ReturnTo(index) => self.return_to(&descriptor, identity, index, params).await,
            PushPlan::Append => self.push_new(&descriptor, identity, params).await,
        }
    }

    /// Pop the top frame. Returns the popped identity, `None` at base.
    pub async fn navigate_back(&self) -> Option<ScreenIdentity> {
        let _turn = self.inner.gate.lock().await;

        let mut state = self.lock();
        let frame = state.stack.pop()?;
        let transitions = &self.inner.transitions;

        let reason = state.teardown_reason(&frame.identity, TeardownReason::Popped);
        let mut tickets: Vec<TicketId> = transitions
            .exit(&mut state, &frame.identity, reason)
            .into_iter()
            .collect();

        match state.stack.current().map(|top| top.identity.clone()) {
            Some(revealed) => transitions.reactivate(&mut state, &revealed, self.events()),
            None => tickets.push(transitions.reveal_base(&mut state, &frame.origin_base_tab, self.events())),
        }

        let depth = state.stack.depth();
        self.events().publish(NavEvent::Popped {
            identity: frame.identity.clone(),
            depth,
        });
        drop(state);

        transitions.schedule(&self.inner.state, self.events(), tickets);
        log::info!("Back from {} (depth {})", frame.identity, depth);
        Some(frame.identity)
    }

    /// Clear the stack and show the base layout, optionally on `base_tab`.
    ///
    /// Does not wait for the navigation queue. A build still in flight is
    /// installed hidden when it completes.
    pub fn reset_to_base(&self, base_tab: Option<&str>) -> Result<(), NavError> {
        let mut state = self.lock();

        let tab = match base_tab {
            Some(tab) if !state.base.has_tab(tab) => return Err(NavError::UnknownBaseTab(tab.to_string())),
            Some(tab) => tab.to_string(),
            None => state.base.active_tab().to_string(),
        };

        let removed = state.stack.reset(tab.clone());
        state.pending.clear();

        for instance in state.cache.iter_mut() {
            instance.set_doomed(false);
            instance.set_visual_state(VisualState::Hidden);
        }
        for identity in state.cache.entity_scoped_identities() {
            if let Some(instance) = state.cache.destroy(&identity, TeardownReason::Reset) {
                self.events().publish(NavEvent::Destroyed {
                    identity,
                    instance: instance.id(),
                    reason: TeardownReason::Reset,
                });
            }
        }

        state.base.switch_tab(&tab)?;
        state.base.show();
        self.events().publish(NavEvent::Reset { tab: tab.clone() });
        log::info!("Reset to base '{}' ({} frame(s) cleared)", tab, removed.len());
        Ok(())
    }

    /// Switch the base layout's tab. Allowed at any depth; the current branch
    /// still returns to its own origin tab.
    pub fn switch_base_tab(&self, tab: &str) -> Result<(), NavError> {
        let mut state = self.lock();
        state.base.switch_tab(tab)?;
        self.events().publish(NavEvent::TabSwitched { tab: tab.to_string() });
        Ok(())
    }

    async fn refresh_top(
        &self,
        descriptor: &ScreenDescriptor,
        identity: ScreenIdentity,
        params: ScreenParams,
    ) -> Result<(), NavError> {
        let plan = {
            let mut state = self.lock();
            let unchanged = state
                .cache
                .get(&identity)
                .is_some_and(|instance| instance.last_params() == &params);
            if unchanged {
                log::debug!("{} already on top", identity);
                return Ok(());
            }

            let plan = state.cache.plan_resolve(&identity, descriptor, &params);
            if plan == ResolvePlan::Reuse {
                state.cache.touch_params(&identity, params.clone());
                Self::update_frame_params(&mut state, &identity, params);
                return Ok(());
            }
            plan
        };

        let content = self.build(descriptor, &params).await?;

        let mut state = self.lock();
        if !state.stack.contains(&identity) {
            self.install_orphan(&mut state, &identity, descriptor, content, params);
            return Ok(());
        }

        log::debug!("{:?} for {} on top", plan, identity);
        let fresh = self.store(&mut state, &identity, descriptor, content, params.clone());
        Self::update_frame_params(&mut state, &identity, params);
        if fresh {
            self.inner.transitions.reactivate(&mut state, &identity, self.events());
        }
        Ok(())
    }

    async fn return_to(
        &self,
        descriptor: &ScreenDescriptor,
        identity: ScreenIdentity,
        index: usize,
        params: ScreenParams,
    ) -> Result<(), NavError> {
        log::debug!("Returning to {} at index {}", identity, index);
        let plan = {
            let state = self.lock();
            let unchanged = state
                .cache
                .get(&identity)
                .is_some_and(|instance| instance.last_params() == &params && !instance.is_doomed());
            if unchanged {
                ResolvePlan::Reuse
            } else {
                state.cache.plan_resolve(&identity, descriptor, &params)
            }
        };

        // Built before collapsing so a failure leaves the stack untouched
        let content = match plan {
            ResolvePlan::Reuse => None,
            ResolvePlan::Rebuild | ResolvePlan::Build => Some(self.build(descriptor, &params).await?),
        };

        let mut state = self.lock();
        let Some(index) = state.stack.find_index(&identity) else {
            if let Some(content) = content {
                self.install_orphan(&mut state, &identity, descriptor, content, params);
            }
            return Ok(());
        };

        let collapsed = state.stack.pop_to_index(index);
        match content {
            Some(content) => {
                self.store(&mut state, &identity, descriptor, content, params.clone());
            }
            None => state.cache.touch_params(&identity, params.clone()),
        }
        Self::update_frame_params(&mut state, &identity, params);

        let transitions = &self.inner.transitions;
        let mut tickets = Vec::new();
        if let Some((old_top, covered)) = collapsed.split_last() {
            for frame in covered {
                transitions.hide_now(&mut state, &frame.identity);
                state.release_if_orphaned(&frame.identity, TeardownReason::AncestorReturn, self.events());
            }
            let reason = state.teardown_reason(&old_top.identity, TeardownReason::AncestorReturn);
            tickets.extend(transitions.exit(&mut state, &old_top.identity, reason));
        }
        transitions.reactivate(&mut state, &identity, self.events());

        self.events().publish(NavEvent::ReturnedTo {
            identity: identity.clone(),
            collapsed: collapsed.iter().map(|frame| frame.identity.clone()).collect(),
        });
        drop(state);

        transitions.schedule(&self.inner.state, self.events(), tickets);
        log::info!("Returned to {} ({} frame(s) collapsed)", identity, collapsed.len());
        Ok(())
    }

    async fn push_new(
        &self,
        descriptor: &ScreenDescriptor,
        identity: ScreenIdentity,
        params: ScreenParams,
    ) -> Result<(), NavError> {
        let transitions = &self.inner.transitions;

        let (frame_id, outgoing, plan) = {
            let mut state = self.lock();

            let stale = state.cache.get(&identity).is_some_and(ScreenInstance::is_doomed);
            if stale {
                state.pending.cancel_screen(&identity);
                if let Some(instance) = state.cache.destroy(&identity, TeardownReason::Superseded) {
                    log::warn!("Discarded exiting instance {} of {}", instance.id(), identity);
                    self.events().publish(NavEvent::Destroyed {
                        identity: identity.clone(),
                        instance: instance.id(),
                        reason: TeardownReason::Superseded,
                    });
                }
            }

            let outgoing = match state.stack.current() {
                Some(top) => Outgoing::Screen(top.identity.clone()),
                None => Outgoing::Base,
            };
            let active_tab = state.base.active_tab().to_string();
            let frame_id = state.stack.push(descriptor.name(), identity.clone(), params.clone(), &active_tab);
            transitions.recede(&mut state, &outgoing, self.events());

            let plan = state.cache.plan_resolve(&identity, descriptor, &params);
            if plan == ResolvePlan::Reuse {
                state.cache.touch_params(&identity, params);
                let ticket = self.enter_pushed(&mut state, &identity);
                drop(state);
                transitions.schedule(&self.inner.state, self.events(), ticket.into_iter().collect());
                return Ok(());
            }
            (frame_id, outgoing, plan)
        };

        let content = match self.build(descriptor, &params).await {
            Ok(content) => content,
            Err(err) => {
                self.rollback(frame_id, &outgoing);
                return Err(err);
            }
        };

        let mut state = self.lock();
        if !state.stack.contains_frame(frame_id) {
            log::warn!("Frame for {} was reset away during its build", identity);
            self.install_orphan(&mut state, &identity, descriptor, content, params);
            return Ok(());
        }

        log::debug!("{:?} for {}", plan, identity);
        self.store(&mut state, &identity, descriptor, content, params);
        let ticket = self.enter_pushed(&mut state, &identity);
        drop(state);

        transitions.schedule(&self.inner.state, self.events(), ticket.into_iter().collect());
        Ok(())
    }

    fn enter_pushed(&self, state: &mut NavState, identity: &ScreenIdentity) -> Option<TicketId> {
        let ticket = self.inner.transitions.enter(state, identity);
        let depth = state.stack.depth();
        self.events().publish(NavEvent::Pushed {
            identity: identity.clone(),
            depth,
        });
        log::info!("Pushed {} (depth {})", identity, depth);
        ticket
    }

    /// Run the factory, announcing a failure
    async fn build(&self, descriptor: &ScreenDescriptor, params: &ScreenParams) -> Result<ViewFragment, NavError> {
        descriptor.build_content(params).await.inspect_err(|err| {
            log::warn!("{}", err);
            self.events().publish(NavEvent::BuildFailed {
                screen: descriptor.name().to_string(),
                message: err.to_string(),
            });
        })
    }

    /// Undo a push whose build failed
    fn rollback(&self, frame_id: FrameId, outgoing: &Outgoing) {
        let mut state = self.lock();
        let Some(frame) = state.stack.remove_frame(frame_id) else {
            // Already cleared by a reset
            return;
        };
        self.inner.transitions.restore(&mut state, outgoing, self.events());
        log::warn!("Rolled back push of {} (depth {})", frame.identity, state.stack.depth());
    }

    /// Put built content into the cache. Returns true for a new instance.
    fn store(
        &self,
        state: &mut NavState,
        identity: &ScreenIdentity,
        descriptor: &ScreenDescriptor,
        content: ViewFragment,
        params: ScreenParams,
    ) -> bool {
        let reusable = state.cache.get(identity).is_some_and(|instance| !instance.is_doomed());
        if reusable {
            if let Some(revision) = state.cache.refresh(identity, content, params) {
                self.events().publish(NavEvent::Refreshed {
                    identity: identity.clone(),
                    revision,
                });
            }
            return false;
        }

        state.pending.cancel_screen(identity);
        if let Some(stale) = state.cache.destroy(identity, TeardownReason::Superseded) {
            self.events().publish(NavEvent::Destroyed {
                identity: identity.clone(),
                instance: stale.id(),
                reason: TeardownReason::Superseded,
            });
        }
        let instance = state
            .cache
            .install(identity.clone(), descriptor.is_entity_scoped(), content, params);
        self.events().publish(NavEvent::Built {
            identity: identity.clone(),
            instance,
        });
        true
    }

    /// Install a build whose frame disappeared meanwhile: kept hidden, and
    /// destroyed at once if nothing references it
    fn install_orphan(
        &self,
        state: &mut NavState,
        identity: &ScreenIdentity,
        descriptor: &ScreenDescriptor,
        content: ViewFragment,
        params: ScreenParams,
    ) {
        self.store(state, identity, descriptor, content, params);
        if !state.stack.contains(identity) {
            self.inner.transitions.hide_now(state, identity);
        }
        state.release_if_orphaned(identity, TeardownReason::Orphaned, self.events());
    }

    fn update_frame_params(state: &mut NavState, identity: &ScreenIdentity, params: ScreenParams) {
        if let Some(index) = state.stack.find_index(identity) {
            if let Some(frame) = state.stack.frame_mut(index) {
                frame.params = params;
            }
        }
    }

    // ---- Transitions ----

    /// Apply every pending settle step now
    pub fn finish_transitions(&self) -> usize {
        let mut state = self.lock();
        TransitionController::flush(&mut state, self.events())
    }

    pub fn has_pending_transitions(&self) -> bool {
        !self.lock().pending.is_empty()
    }

    pub fn settle_delay(&self) -> Duration {
        self.inner.transitions.settle_delay()
    }

    // ---- Queries ----

    pub fn current_depth(&self) -> usize {
        self.lock().stack.depth()
    }

    pub fn is_at_base(&self) -> bool {
        self.lock().stack.is_at_base()
    }

    pub fn current(&self) -> Option<StackFrame> {
        self.lock().stack.current().cloned()
    }

    pub fn find_index(&self, identity: &ScreenIdentity) -> Option<usize> {
        self.lock().stack.find_index(identity)
    }

    /// Snapshot of all frames, bottom to top
    pub fn stack(&self) -> Vec<StackFrame> {
        self.lock().stack.frames().to_vec()
    }

    pub fn active_base_tab(&self) -> String {
        self.lock().base.active_tab().to_string()
    }

    pub fn base_tabs(&self) -> Vec<String> {
        self.lock().base.tabs().to_vec()
    }

    pub fn base_visible(&self) -> bool {
        self.lock().base.is_visible()
    }

    pub fn base_phase(&self) -> BasePhase {
        self.lock().base.phase()
    }

    /// Visual state of the cached instance for `identity`, if any
    pub fn visual_state(&self, identity: &ScreenIdentity) -> Option<VisualState> {
        self.lock().cache.get(identity).map(ScreenInstance::visual_state)
    }

    pub fn instance(&self, identity: &ScreenIdentity) -> Option<ScreenInstance> {
        self.lock().cache.get(identity).cloned()
    }

    pub fn active_count(&self) -> usize {
        self.lock().cache.active_count()
    }

    pub fn cached_count(&self) -> usize {
        self.lock().cache.len()
    }

    pub fn overview(&self) -> NavOverview {
        let titles = self.screens();
        let state = self.lock();
        NavOverview::capture(&state, |name| {
            titles
                .iter()
                .find(|descriptor| descriptor.name() == name)
                .map(|descriptor| descriptor.display_title().to_string())
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NavEvent> {
        self.events().subscribe()
    }
}
