use serde::Serialize;

use super::error::NavError;

/// Visibility phase of the root layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BasePhase {
    Hidden,
    /// Being revealed by a backward navigation; settles to `Shown`
    Revealing,
    Shown,
}

/// Always-present root layout the navigation stack sits on top of.
///
/// Owns its own tab set, independent of the stack. The navigator keeps it
/// visible exactly when the stack is empty.
#[derive(Debug)]
pub struct BaseLayout {
    tabs: Vec<String>,
    active_tab: String,
    phase: BasePhase,
}

impl BaseLayout {
    /// Create a shown layout; `default_tab` is added to `tabs` if missing
    pub fn new(tabs: Vec<String>, default_tab: impl Into<String>) -> Self {
        let default_tab = default_tab.into();
        let mut tabs = tabs;
        if !tabs.contains(&default_tab) {
            tabs.insert(0, default_tab.clone());
        }
        Self {
            tabs,
            active_tab: default_tab,
            phase: BasePhase::Shown,
        }
    }

    pub fn active_tab(&self) -> &str {
        &self.active_tab
    }

    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    pub fn phase(&self) -> BasePhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase != BasePhase::Hidden
    }

    pub fn has_tab(&self, tab: &str) -> bool {
        self.tabs.iter().any(|t| t == tab)
    }

    pub fn switch_tab(&mut self, tab: &str) -> Result<(), NavError> {
        if !self.has_tab(tab) {
            return Err(NavError::UnknownBaseTab(tab.to_string()));
        }
        if self.active_tab != tab {
            log::debug!("Base tab {} -> {}", self.active_tab, tab);
            self.active_tab = tab.to_string();
        }
        Ok(())
    }

    /// Show immediately (reset, rollback)
    pub fn show(&mut self) {
        self.phase = BasePhase::Shown;
    }

    /// Start an animated reveal
    pub fn reveal(&mut self) {
        self.phase = BasePhase::Revealing;
    }

    /// Finish a reveal; no-op unless revealing
    pub fn settle(&mut self) -> bool {
        if self.phase == BasePhase::Revealing {
            self.phase = BasePhase::Shown;
            return true;
        }
        false
    }

    pub fn hide(&mut self) {
        self.phase = BasePhase::Hidden;
    }
}
