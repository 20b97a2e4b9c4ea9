//! Screen instance cache.
//!
//! Holds at most one realized view per [`ScreenIdentity`], independently of
//! the navigation stack. Resolution is split in two halves around the
//! asynchronous factory call: [`InstanceCache::plan_resolve`] decides what
//! has to happen, and [`InstanceCache::install`] / [`InstanceCache::refresh`]
//! apply the built content afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::descriptor::ScreenDescriptor;
use super::identity::ScreenIdentity;
use super::lifecycle::{TeardownReason, VisualState};
use super::params::ScreenParams;
use super::view::{ViewFragment, ViewNode};

/// Unique id of one realized instance; a rebuilt-from-scratch screen gets a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub uuid::Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A realized screen
#[derive(Debug, Clone)]
pub struct ScreenInstance {
    id: InstanceId,
    identity: ScreenIdentity,
    entity_scoped: bool,
    view: ViewNode,
    last_params: ScreenParams,
    visual_state: VisualState,
    /// Popped and unreferenced; destroyed once its exit settles
    doomed: bool,
}

impl ScreenInstance {
    pub fn new(
        identity: ScreenIdentity,
        entity_scoped: bool,
        content: ViewFragment,
        params: ScreenParams,
    ) -> Self {
        Self {
            id: InstanceId::new(),
            identity,
            entity_scoped,
            view: ViewNode::new(content),
            last_params: params,
            visual_state: VisualState::Hidden,
            doomed: false,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn identity(&self) -> &ScreenIdentity {
        &self.identity
    }

    pub fn is_entity_scoped(&self) -> bool {
        self.entity_scoped
    }

    pub fn view(&self) -> &ViewNode {
        &self.view
    }

    pub fn last_params(&self) -> &ScreenParams {
        &self.last_params
    }

    pub fn visual_state(&self) -> VisualState {
        self.visual_state
    }

    pub fn is_doomed(&self) -> bool {
        self.doomed
    }

    pub(crate) fn set_visual_state(&mut self, state: VisualState) {
        if self.visual_state != state {
            log::debug!("{} {} -> {}", self.identity, self.visual_state, state);
        }
        self.visual_state = state;
    }

    pub(crate) fn set_doomed(&mut self, doomed: bool) {
        self.doomed = doomed;
    }
}

/// Outcome of the synchronous half of `resolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvePlan {
    /// Cached instance can be shown as is
    Reuse,

    /// Cached instance must get new content in place
    Rebuild,

    /// No usable instance; build a new one
    Build,
}

/// Identity-keyed store of realized screens
#[derive(Debug, Default)]
pub struct InstanceCache {
    instances: HashMap<ScreenIdentity, ScreenInstance>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &ScreenIdentity) -> Option<&ScreenInstance> {
        self.instances.get(identity)
    }

    pub(crate) fn get_mut(&mut self, identity: &ScreenIdentity) -> Option<&mut ScreenInstance> {
        self.instances.get_mut(identity)
    }

    pub fn contains(&self, identity: &ScreenIdentity) -> bool {
        self.instances.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScreenInstance> {
        self.instances.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ScreenInstance> {
        self.instances.values_mut()
    }

    /// Number of instances currently receiving input
    pub fn active_count(&self) -> usize {
        self.instances
            .values()
            .filter(|instance| instance.visual_state == VisualState::Active)
            .count()
    }

    /// Decide how `identity` is resolved for `params`.
    ///
    /// A doomed instance (exiting, about to be destroyed) is never handed
    /// back; callers destroy it and build fresh.
    pub fn plan_resolve(
        &self,
        identity: &ScreenIdentity,
        descriptor: &ScreenDescriptor,
        params: &ScreenParams,
    ) -> ResolvePlan {
        match self.instances.get(identity) {
            None => ResolvePlan::Build,
            Some(instance) if instance.doomed => ResolvePlan::Build,
            Some(instance) if descriptor.needs_refresh(&instance.last_params, params) => {
                ResolvePlan::Rebuild
            }
            Some(_) => ResolvePlan::Reuse,
        }
    }

    /// Store a freshly built instance (cold path). Returns its id.
    pub fn install(
        &mut self,
        identity: ScreenIdentity,
        entity_scoped: bool,
        content: ViewFragment,
        params: ScreenParams,
    ) -> InstanceId {
        let instance = ScreenInstance::new(identity.clone(), entity_scoped, content, params);
        let id = instance.id;
        if let Some(mut previous) = self.instances.insert(identity.clone(), instance) {
            previous.view.detach();
            log::warn!("Replaced cached instance {} for {}", previous.id, identity);
        }
        log::debug!("Built instance {} for {}", id, identity);
        id
    }

    /// Swap new content into an existing instance. Returns the new revision.
    pub fn refresh(
        &mut self,
        identity: &ScreenIdentity,
        content: ViewFragment,
        params: ScreenParams,
    ) -> Option<u32> {
        let instance = self.instances.get_mut(identity)?;
        instance.view.replace_content(content);
        instance.last_params = params;
        log::debug!("Refreshed {} (revision {})", identity, instance.view.revision());
        Some(instance.view.revision())
    }

    /// Record the params an instance was last resolved with
    pub fn touch_params(&mut self, identity: &ScreenIdentity, params: ScreenParams) {
        if let Some(instance) = self.instances.get_mut(identity) {
            instance.last_params = params;
        }
    }

    /// Detach the view and drop the cache entry
    pub fn destroy(
        &mut self,
        identity: &ScreenIdentity,
        reason: TeardownReason,
    ) -> Option<ScreenInstance> {
        let mut instance = self.instances.remove(identity)?;
        instance.view.detach();
        instance.visual_state = VisualState::Hidden;
        log::info!("Destroyed {} ({}): {}", identity, instance.id, reason);
        Some(instance)
    }

    /// Identities of every entity-scoped instance
    pub fn entity_scoped_identities(&self) -> Vec<ScreenIdentity> {
        self.instances
            .values()
            .filter(|instance| instance.entity_scoped)
            .map(|instance| instance.identity.clone())
            .collect()
    }
}
