//! Reaction ledger
//!
//! Append-only per-post log. Counts are folded from the log when read;
//! repeated reactions by the same reactor all count.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use validator::Validate;

use flix_core::{DomainError, Partition, Reaction, ReactionSummary, Snowflake};

use crate::dto::AddReactionRequest;

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct ReactionLedger<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionLedger<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Append a reaction to a post.
    ///
    /// The symbol is trimmed; an empty symbol is a validation error. Fails
    /// with `PostNotFound` when the canonical copy is absent, or when the
    /// ledger is dropped by a delete before the entry lands.
    #[instrument(skip(self))]
    pub async fn append(
        &self,
        post_id: Snowflake,
        reactor_id: Snowflake,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<Reaction> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(DomainError::ValidationError("reaction symbol is empty".to_string()).into());
        }

        if self
            .ctx
            .post_repo()
            .read(Partition::Global, post_id)
            .await?
            .is_none()
        {
            return Err(DomainError::PostNotFound(post_id).into());
        }

        let reaction = Reaction::new(post_id, reactor_id, symbol, now);
        self.ctx.reaction_repo().append(&reaction).await?;

        info!(post_id = %post_id, reactor_id = %reactor_id, symbol = %symbol, "Reaction added");

        Ok(reaction)
    }

    /// React through a request DTO, timestamped by the store clock
    #[instrument(skip(self, req))]
    pub async fn react(
        &self,
        reactor_id: Snowflake,
        post_id: Snowflake,
        req: AddReactionRequest,
    ) -> ServiceResult<Reaction> {
        req.validate()?;
        let now = self.ctx.post_repo().server_time().await?;
        self.append(post_id, reactor_id, &req.symbol, now).await
    }

    /// Count per symbol; empty for a post with no ledger
    #[instrument(skip(self))]
    pub async fn summary(&self, post_id: Snowflake) -> ServiceResult<ReactionSummary> {
        let entries = self.ctx.reaction_repo().find_by_post(post_id).await?;
        Ok(ReactionSummary::fold(&entries))
    }
}
