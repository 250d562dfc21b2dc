//! Gate keeper - the one place the posting window is evaluated
//!
//! A viewer holding a post younger than 24 hours may see feeds and may not
//! post again until it ages out.

use chrono::{DateTime, Utc};
use tracing::{instrument, trace};

use flix_core::{Partition, Post, PostFilter, Snowflake, ViewerGateState};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct GateKeeper<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GateKeeper<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Gate state of `viewer_id` at `now`, from their most recent post of
    /// any audience
    #[instrument(skip(self))]
    pub async fn status(
        &self,
        viewer_id: Snowflake,
        now: DateTime<Utc>,
    ) -> ServiceResult<ViewerGateState> {
        let latest = self.latest_post(viewer_id).await?;
        let state = ViewerGateState::evaluate(latest.map(|p| p.created_at), now);
        trace!(
            has_valid_post = state.has_valid_post,
            hours_until_next_post = state.hours_until_next_post,
            "Gate evaluated"
        );
        Ok(state)
    }

    /// The viewer's most recent post, valid or not
    pub async fn latest_post(&self, viewer_id: Snowflake) -> ServiceResult<Option<Post>> {
        let posts = self
            .ctx
            .post_repo()
            .query(Partition::Global, &PostFilter::by_author(viewer_id))
            .await?;
        Ok(posts.into_iter().max_by_key(|p| (p.created_at, p.id)))
    }
}
