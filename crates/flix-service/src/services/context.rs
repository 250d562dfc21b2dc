//! Service context - dependency container for services
//!
//! Holds the repositories, the profile cache, the id generator and feed
//! tuning. Cloning is cheap; every field is shared.

use std::sync::Arc;

use flix_cache::ProfileCache;
use flix_common::{AppConfig, FeedConfig};
use flix_core::traits::{CircleRepository, PostRepository, ProfileProvider, ReactionRepository};
use flix_core::{Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    post_repo: Arc<dyn PostRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    circle_repo: Arc<dyn CircleRepository>,

    // Cache
    profile_cache: ProfileCache,

    snowflake_generator: Arc<SnowflakeGenerator>,
    feed_config: FeedConfig,
}

impl ServiceContext {
    pub fn new(
        post_repo: Arc<dyn PostRepository>,
        reaction_repo: Arc<dyn ReactionRepository>,
        circle_repo: Arc<dyn CircleRepository>,
        profile_cache: ProfileCache,
        snowflake_generator: Arc<SnowflakeGenerator>,
        feed_config: FeedConfig,
    ) -> Self {
        Self {
            post_repo,
            reaction_repo,
            circle_repo,
            profile_cache,
            snowflake_generator,
            feed_config,
        }
    }

    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    pub fn circle_repo(&self) -> &dyn CircleRepository {
        self.circle_repo.as_ref()
    }

    // === Cache ===

    pub fn profile_cache(&self) -> &ProfileCache {
        &self.profile_cache
    }

    // === Configuration ===

    pub fn feed_config(&self) -> &FeedConfig {
        &self.feed_config
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("profile_cache", &self.profile_cache)
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("feed_config", &self.feed_config)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    post_repo: Option<Arc<dyn PostRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    circle_repo: Option<Arc<dyn CircleRepository>>,
    profile_provider: Option<Arc<dyn ProfileProvider>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    feed_config: FeedConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn circle_repo(mut self, repo: Arc<dyn CircleRepository>) -> Self {
        self.circle_repo = Some(repo);
        self
    }

    pub fn profile_provider(mut self, provider: Arc<dyn ProfileProvider>) -> Self {
        self.profile_provider = Some(provider);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn feed_config(mut self, config: FeedConfig) -> Self {
        self.feed_config = config;
        self
    }

    /// Take feed tuning and the worker id from the application config
    pub fn config(mut self, config: &AppConfig) -> Self {
        self.feed_config = config.feed.clone();
        self.snowflake_generator = Some(Arc::new(SnowflakeGenerator::new(
            config.snowflake.worker_id,
        )));
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let provider = self
            .profile_provider
            .ok_or_else(|| ServiceError::validation("profile_provider is required"))?;
        let profile_cache = ProfileCache::new(provider, self.feed_config.profile_cache_ttl());

        Ok(ServiceContext::new(
            self.post_repo
                .ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            self.reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            self.circle_repo
                .ok_or_else(|| ServiceError::validation("circle_repo is required"))?,
            profile_cache,
            self.snowflake_generator.unwrap_or_default(),
            self.feed_config,
        ))
    }
}
