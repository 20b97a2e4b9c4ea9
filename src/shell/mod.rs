//! View navigation stack of the phone shell.

pub mod base;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod identity;
pub mod instance;
pub mod lifecycle;
pub mod navigator;
pub mod overview;
pub mod params;
pub mod registry;
pub mod stack;
pub mod transition;
pub mod view;

mod state;

pub use base::{BaseLayout, BasePhase};
pub use descriptor::{factory_fn, EntityScope, FnFactory, ScreenDescriptor, ScreenFactory};
pub use error::NavError;
pub use event::{EventBus, NavEvent};
pub use identity::ScreenIdentity;
pub use instance::{InstanceCache, InstanceId, ResolvePlan, ScreenInstance};
pub use lifecycle::{RefreshPolicy, TeardownReason, VisualState};
pub use navigator::Navigator;
pub use overview::{FrameSummary, InstanceSummary, NavOverview};
pub use params::ScreenParams;
pub use registry::ScreenRegistry;
pub use stack::{FrameId, NavigationStack, PushPlan, StackFrame};
pub use transition::TransitionController;
pub use view::{ViewFragment, ViewNode};
