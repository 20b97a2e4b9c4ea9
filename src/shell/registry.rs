use std::collections::HashMap;
use std::sync::Arc;

use super::descriptor::ScreenDescriptor;
use super::error::NavError;

/// Maps screen names to their descriptors.
///
/// Every screen must be registered here before anything navigates to it;
/// the navigator never creates screens any other way.
#[derive(Debug, Default)]
pub struct ScreenRegistry {
    descriptors: HashMap<String, Arc<ScreenDescriptor>>,
    /// Registration order, for listings
    order: Vec<String>,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: ScreenDescriptor) -> Result<(), NavError> {
        let name = descriptor.name().to_string();
        if name.is_empty() || name.contains(':') {
            return Err(NavError::InvalidScreenName(name));
        }
        if self.descriptors.contains_key(&name) {
            return Err(NavError::DuplicateScreen(name));
        }

        log::debug!(
            "Registered screen '{}' (scope: {:?}, refresh: {})",
            name,
            descriptor.scope(),
            descriptor.policy()
        );
        self.order.push(name.clone());
        self.descriptors.insert(name, Arc::new(descriptor));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<ScreenDescriptor>, NavError> {
        self.descriptors
            .get(name)
            .cloned()
            .ok_or_else(|| NavError::UnknownScreen(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ScreenDescriptor>> {
        self.order.iter().filter_map(|name| self.descriptors.get(name))
    }
}
