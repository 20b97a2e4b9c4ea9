use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::error::NavError;
use super::identity::ScreenIdentity;
use super::lifecycle::RefreshPolicy;
use super::params::ScreenParams;
use super::view::ViewFragment;

/// Trait for building screen content (factory pattern for lazy creation)
#[async_trait]
pub trait ScreenFactory: Send + Sync {
    /// Build the view-tree fragment for the given params
    async fn build(&self, params: &ScreenParams) -> Result<ViewFragment>;
}

/// Factory backed by an async closure
pub struct FnFactory<F> {
    build: F,
}

/// Wrap an async closure as a [`ScreenFactory`]
pub fn factory_fn<F, Fut>(build: F) -> FnFactory<F>
where
    F: Fn(ScreenParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ViewFragment>> + Send + 'static,
{
    FnFactory { build }
}

#[async_trait]
impl<F, Fut> ScreenFactory for FnFactory<F>
where
    F: Fn(ScreenParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ViewFragment>> + Send + 'static,
{
    async fn build(&self, params: &ScreenParams) -> Result<ViewFragment> {
        let future: BoxFuture<'static, Result<ViewFragment>> = Box::pin((self.build)(params.clone()));
        future.await
    }
}

/// How a screen's identity is derived from its params
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityScope {
    /// One instance for the whole screen type
    Singleton,

    /// One instance per entity key, built from these param fields
    PerEntity(Vec<String>),
}

impl EntityScope {
    pub fn is_entity_scoped(&self) -> bool {
        matches!(self, EntityScope::PerEntity(_))
    }
}

/// Static description of a screen type, registered once
#[derive(Clone)]
pub struct ScreenDescriptor {
    name: String,
    title: String,
    scope: EntityScope,
    /// Content fields compared by `RefreshPolicy::OnEntityChange`
    content_key: Vec<String>,
    refresh: RefreshPolicy,
    factory: Arc<dyn ScreenFactory>,
}

impl ScreenDescriptor {
    pub fn new(name: impl Into<String>, factory: impl ScreenFactory + 'static) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            scope: EntityScope::Singleton,
            content_key: Vec::new(),
            refresh: RefreshPolicy::default(),
            factory: Arc::new(factory),
        }
    }

    /// Set the human-readable title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Make the screen entity-scoped, keyed by these param fields
    pub fn per_entity<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = EntityScope::PerEntity(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Extra content fields compared by `OnEntityChange`, on top of the entity key
    pub fn keyed_on<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_key = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_title(&self) -> &str {
        &self.title
    }

    pub fn scope(&self) -> &EntityScope {
        &self.scope
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.refresh
    }

    pub fn is_entity_scoped(&self) -> bool {
        self.scope.is_entity_scoped()
    }

    /// Fields that determine the entity key; empty for singletons
    pub fn key_fields(&self) -> &[String] {
        match &self.scope {
            EntityScope::PerEntity(fields) => fields,
            EntityScope::Singleton => &[],
        }
    }

    pub fn content_fields(&self) -> &[String] {
        &self.content_key
    }

    /// Entity key for `params`; `None` for singleton screens
    pub fn entity_key_of(&self, params: &ScreenParams) -> Result<Option<String>, NavError> {
        let EntityScope::PerEntity(fields) = &self.scope else {
            return Ok(None);
        };

        let mut parts = Vec::with_capacity(fields.len());
        for field in fields {
            let part = params.key_component(field).ok_or_else(|| NavError::InvalidParams {
                screen: self.name.clone(),
                field: field.clone(),
            })?;
            parts.push(part);
        }

        Ok(Some(parts.join(":")))
    }

    /// Identity for `params`. Pure: same params, same identity.
    pub fn identity_for(&self, params: &ScreenParams) -> Result<ScreenIdentity, NavError> {
        Ok(match self.entity_key_of(params)? {
            Some(key) => ScreenIdentity::entity(&self.name, &key),
            None => ScreenIdentity::singleton(&self.name),
        })
    }

    /// Whether a cached instance last built with `last` must be rebuilt for `next`
    pub fn needs_refresh(&self, last: &ScreenParams, next: &ScreenParams) -> bool {
        match self.refresh {
            RefreshPolicy::Never => false,
            RefreshPolicy::OnEntityChange => {
                last.differs_on(next, self.key_fields()) || last.differs_on(next, &self.content_key)
            }
            RefreshPolicy::Always => true,
        }
    }

    /// Run the factory, mapping a rejection to `BuildFailed`
    pub async fn build_content(&self, params: &ScreenParams) -> Result<ViewFragment, NavError> {
        self.factory
            .build(params)
            .await
            .map_err(|source| NavError::BuildFailed {
                screen: self.name.clone(),
                source,
            })
    }
}

impl fmt::Debug for ScreenDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenDescriptor")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("scope", &self.scope)
            .field("content_key", &self.content_key)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}
