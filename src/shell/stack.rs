use serde::Serialize;

use super::identity::ScreenIdentity;
use super::params::ScreenParams;

/// Monotonic id of a pushed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FrameId(pub u64);

/// One entry in the navigation history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackFrame {
    pub id: FrameId,
    pub screen_name: String,
    pub identity: ScreenIdentity,
    pub params: ScreenParams,
    /// Base tab that was active when this branch left the base layout
    pub origin_base_tab: String,
}

/// What pushing an identity means for the current stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushPlan {
    /// Already on top; re-navigation is a no-op
    AlreadyTop,

    /// Present deeper in the stack; collapse back to this index
    ReturnTo(usize),

    /// Not present; append a new frame
    Append,
}

/// Ordered navigation history.
///
/// No two frames ever share an identity: pushing an identity that is already
/// present means returning to it.
#[derive(Debug)]
pub struct NavigationStack {
    frames: Vec<StackFrame>,
    base_tab: String,
    next_frame_id: u64,
}

impl NavigationStack {
    pub fn new(base_tab: impl Into<String>) -> Self {
        Self {
            frames: Vec::new(),
            base_tab: base_tab.into(),
            next_frame_id: 1,
        }
    }

    pub fn plan(&self, identity: &ScreenIdentity) -> PushPlan {
        match self.find_index(identity) {
            Some(index) if index + 1 == self.frames.len() => PushPlan::AlreadyTop,
            Some(index) => PushPlan::ReturnTo(index),
            None => PushPlan::Append,
        }
    }

    /// Append a frame for an identity not yet on the stack.
    ///
    /// `active_base_tab` is captured as the branch origin when the stack is
    /// empty; deeper frames inherit the origin of the frame below.
    pub fn push(
        &mut self,
        screen_name: &str,
        identity: ScreenIdentity,
        params: ScreenParams,
        active_base_tab: &str,
    ) -> FrameId {
        debug_assert!(self.find_index(&identity).is_none(), "duplicate frame {}", identity);

        let origin_base_tab = match self.frames.last() {
            Some(top) => top.origin_base_tab.clone(),
            None => {
                self.base_tab = active_base_tab.to_string();
                active_base_tab.to_string()
            }
        };

        let id = FrameId(self.next_frame_id);
        self.next_frame_id += 1;
        log::debug!("Stack push {} (depth {})", identity, self.frames.len() + 1);
        self.frames.push(StackFrame {
            id,
            screen_name: screen_name.to_string(),
            identity,
            params,
            origin_base_tab,
        });
        id
    }

    pub fn pop(&mut self) -> Option<StackFrame> {
        let frame = self.frames.pop()?;
        log::debug!("Stack pop {} (depth {})", frame.identity, self.frames.len());
        Some(frame)
    }

    pub fn current(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    pub fn find_index(&self, identity: &ScreenIdentity) -> Option<usize> {
        self.frames.iter().position(|frame| &frame.identity == identity)
    }

    pub fn contains(&self, identity: &ScreenIdentity) -> bool {
        self.find_index(identity).is_some()
    }

    /// Remove every frame above `index`, returned bottom to top
    pub fn pop_to_index(&mut self, index: usize) -> Vec<StackFrame> {
        if index + 1 >= self.frames.len() {
            return Vec::new();
        }
        let popped = self.frames.split_off(index + 1);
        log::debug!("Stack collapsed {} frame(s) to depth {}", popped.len(), self.frames.len());
        popped
    }

    /// Remove one specific frame wherever it is (rollback of a failed push)
    pub fn remove_frame(&mut self, id: FrameId) -> Option<StackFrame> {
        let index = self.frames.iter().position(|frame| frame.id == id)?;
        Some(self.frames.remove(index))
    }

    pub fn contains_frame(&self, id: FrameId) -> bool {
        self.frames.iter().any(|frame| frame.id == id)
    }

    pub(crate) fn frame_mut(&mut self, index: usize) -> Option<&mut StackFrame> {
        self.frames.get_mut(index)
    }

    /// Clear all frames and record `base_tab`; returns the removed frames
    pub fn reset(&mut self, base_tab: impl Into<String>) -> Vec<StackFrame> {
        self.base_tab = base_tab.into();
        std::mem::take(&mut self.frames)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_at_base(&self) -> bool {
        self.frames.is_empty()
    }

    /// Root-layout tab active when the stack was last empty
    pub fn base_tab(&self) -> &str {
        &self.base_tab
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }
}
