//! Post store - the fan-out writer
//!
//! A post is written to the global partition (the canonical copy) and then
//! once into each audience circle's partition. All copies share id and
//! timestamp, so rewriting any of them is idempotent.

use futures::future::join_all;
use tracing::{info, instrument, warn};

use flix_core::{Audience, DomainError, ImageRef, Partition, Post, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct PostStore<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostStore<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a post and fan it out to its audience.
    ///
    /// `created_at` comes from the store clock. The ledger is created before
    /// the canonical copy, so a failure of either returns the store error
    /// with no post written; failed circle copies
    /// return `PartialFanoutFailure` naming exactly those circles. Does not
    /// check the posting gate.
    #[instrument(skip(self, images, caption), fields(image_count = images.len()))]
    pub async fn create(
        &self,
        author_id: Snowflake,
        images: Vec<ImageRef>,
        caption: Option<String>,
        audience: Audience,
    ) -> ServiceResult<Snowflake> {
        if images.is_empty() {
            return Err(DomainError::NoImageSelected.into());
        }

        let created_at = self.ctx.post_repo().server_time().await?;
        let post = Post::new(
            self.ctx.generate_id(),
            author_id,
            created_at,
            images,
            caption,
            audience,
        )?;

        self.ctx.reaction_repo().create_ledger(post.id).await?;
        if let Err(e) = self.ctx.post_repo().write(Partition::Global, &post).await {
            if let Err(cleanup) = self.ctx.reaction_repo().delete_ledger(post.id).await {
                warn!(post_id = %post.id, error = %cleanup, "Ledger cleanup failed");
            }
            return Err(e.into());
        }

        let circles: Vec<_> = post.audience.circle_ids().collect();
        self.write_copies(&post, &circles).await?;

        info!(
            post_id = %post.id,
            author_id = %author_id,
            copies = circles.len(),
            "Post created"
        );

        Ok(post.id)
    }

    /// Rewrite the named circle copies from the canonical copy.
    ///
    /// Every circle must belong to the post's audience. The canonical copy
    /// is only read, never rewritten.
    #[instrument(skip(self))]
    pub async fn retry_fanout(&self, post_id: Snowflake, circles: &[Snowflake]) -> ServiceResult<()> {
        let post = self
            .ctx
            .post_repo()
            .read(Partition::Global, post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        if let Some(stray) = circles.iter().find(|c| !post.audience.includes_circle(**c)) {
            return Err(DomainError::ValidationError(format!(
                "circle {stray} is not in the audience of post {post_id}"
            ))
            .into());
        }

        self.write_copies(&post, circles).await?;
        info!(post_id = %post_id, copies = circles.len(), "Fan-out copies rewritten");
        Ok(())
    }

    async fn write_copies(&self, post: &Post, circles: &[Snowflake]) -> ServiceResult<()> {
        let repo = self.ctx.post_repo();
        let writes = circles.iter().map(|circle_id| async move {
            let result = repo.write(Partition::Circle(*circle_id), post).await;
            (*circle_id, result)
        });

        let mut failed_circles = Vec::new();
        for (circle_id, result) in join_all(writes).await {
            if let Err(e) = result {
                warn!(post_id = %post.id, circle_id = %circle_id, error = %e, "Fan-out write failed");
                failed_circles.push(circle_id);
            }
        }

        if failed_circles.is_empty() {
            Ok(())
        } else {
            Err(DomainError::PartialFanoutFailure {
                post_id: post.id,
                failed_circles,
            }
            .into())
        }
    }
}
