//! Posting service - the publish flow
//!
//! Validates the request, applies the one-post-per-window rule through the
//! gate keeper, resolves the audience and hands off to the post store.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use validator::Validate;

use flix_core::{DomainError, Post, Snowflake};

use crate::dto::CreatePostRequest;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::gate::GateKeeper;
use super::post::PostStore;
use super::visibility::VisibilityResolver;

pub struct PostingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostingService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Publish a post for `author_id`.
    ///
    /// With `enforce_single_post` on, fails with `PostingWindowActive` while
    /// the author still holds a valid post.
    #[instrument(skip(self, req))]
    pub async fn publish(
        &self,
        author_id: Snowflake,
        req: CreatePostRequest,
    ) -> ServiceResult<Snowflake> {
        req.validate()?;
        if req.images.is_empty() {
            return Err(DomainError::NoImageSelected.into());
        }

        if self.ctx.feed_config().enforce_single_post {
            let now = self.ctx.post_repo().server_time().await?;
            let gate = GateKeeper::new(self.ctx).status(author_id, now).await?;
            if !gate.can_post() {
                return Err(DomainError::PostingWindowActive {
                    hours_remaining: gate.hours_until_next_post,
                }
                .into());
            }
        }

        let audience = VisibilityResolver::new(self.ctx)
            .resolve(author_id, &req.targets)
            .await?;

        let images = req.image_refs();
        let post_id = PostStore::new(self.ctx)
            .create(author_id, images, req.caption, audience)
            .await?;

        info!(post_id = %post_id, author_id = %author_id, "Post published");
        Ok(post_id)
    }

    /// The viewer's own post if it is still valid at `now`
    #[instrument(skip(self))]
    pub async fn current_post(
        &self,
        viewer_id: Snowflake,
        now: DateTime<Utc>,
    ) -> ServiceResult<Option<Post>> {
        let latest = GateKeeper::new(self.ctx).latest_post(viewer_id).await?;
        Ok(latest.filter(|post| post.is_valid(now)))
    }
}
