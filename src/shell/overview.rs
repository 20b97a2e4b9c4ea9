use serde::Serialize;

use super::base::BasePhase;
use super::identity::ScreenIdentity;
use super::instance::InstanceId;
use super::lifecycle::VisualState;
use super::state::NavState;

/// Snapshot of the whole navigation state, for display and debugging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavOverview {
    pub base_tab: String,
    pub base_phase: BasePhase,
    pub depth: usize,
    /// Bottom to top
    pub frames: Vec<FrameSummary>,
    /// Sorted by identity
    pub instances: Vec<InstanceSummary>,
    pub pending_transitions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    pub identity: ScreenIdentity,
    pub screen: String,
    pub title: String,
    pub origin_base_tab: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceSummary {
    pub identity: ScreenIdentity,
    pub instance: InstanceId,
    pub state: VisualState,
    pub revision: u32,
    pub on_stack: bool,
    pub entity_scoped: bool,
}

impl NavOverview {
    /// `title_of` maps a screen name to its display title
    pub(crate) fn capture<F>(state: &NavState, title_of: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let frames = state
            .stack
            .frames()
            .iter()
            .map(|frame| FrameSummary {
                identity: frame.identity.clone(),
                screen: frame.screen_name.clone(),
                title: title_of(&frame.screen_name).unwrap_or_else(|| frame.screen_name.clone()),
                origin_base_tab: frame.origin_base_tab.clone(),
            })
            .collect();

        let mut instances: Vec<InstanceSummary> = state
            .cache
            .iter()
            .map(|instance| InstanceSummary {
                identity: instance.identity().clone(),
                instance: instance.id(),
                state: instance.visual_state(),
                revision: instance.view().revision(),
                on_stack: state.stack.contains(instance.identity()),
                entity_scoped: instance.is_entity_scoped(),
            })
            .collect();
        instances.sort_by(|a, b| a.identity.cmp(&b.identity));

        Self {
            base_tab: state.base.active_tab().to_string(),
            base_phase: state.base.phase(),
            depth: state.stack.depth(),
            frames,
            instances,
            pending_transitions: state.pending.len(),
        }
    }

    /// The instance currently receiving input, if any
    pub fn active(&self) -> Option<&InstanceSummary> {
        self.instances
            .iter()
            .find(|instance| instance.state == VisualState::Active)
    }

    pub fn is_at_base(&self) -> bool {
        self.depth == 0
    }
}
