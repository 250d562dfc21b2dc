//! Memories - a viewer's own posts by calendar month, expired ones included

use chrono::{DateTime, Months, NaiveDate, Utc};
use tracing::instrument;

use flix_core::{DomainError, Partition, Post, PostFilter, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct MemoriesService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemoriesService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Posts by `viewer_id` created in the given UTC month, oldest first
    #[instrument(skip(self))]
    pub async fn month(&self, viewer_id: Snowflake, year: i32, month: u32) -> ServiceResult<Vec<Post>> {
        let (start, end) = month_bounds(year, month).ok_or_else(|| {
            DomainError::ValidationError(format!("invalid month {year}-{month:02}"))
        })?;

        let filter = PostFilter {
            author_id: Some(viewer_id),
            ..PostFilter::since(start)
        }
        .before(end);

        let mut posts = self
            .ctx
            .post_repo()
            .query(Partition::Global, &filter)
            .await?;
        posts.sort_by_key(|p| (p.created_at, p.id));
        Ok(posts)
    }
}

fn month_bounds(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some((
        first.and_hms_opt(0, 0, 0)?.and_utc(),
        next.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}
