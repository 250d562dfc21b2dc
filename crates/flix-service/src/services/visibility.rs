//! Visibility resolver
//!
//! Turns the audience picker selections into the audience a post is
//! written with.

use std::collections::{BTreeSet, HashSet};

use flix_core::{Audience, AudienceTarget, Snowflake};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct VisibilityResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VisibilityResolver<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve picker selections to an audience.
    ///
    /// No selection, or `Everyone` among the selections, gives `Everyone`
    /// and discards any circles. Otherwise circles the author is not a
    /// member of are dropped; if none remain the result is
    /// `InvalidAudience`.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        author_id: Snowflake,
        targets: &[AudienceTarget],
    ) -> ServiceResult<Audience> {
        if targets.is_empty() || targets.contains(&AudienceTarget::Everyone) {
            return Ok(Audience::Everyone);
        }

        let memberships: HashSet<Snowflake> = self
            .ctx
            .circle_repo()
            .find_by_member(author_id)
            .await?
            .into_iter()
            .map(|circle| circle.id)
            .collect();

        let mut circles = BTreeSet::new();
        for target in targets {
            if let AudienceTarget::Circle(circle_id) = *target {
                if memberships.contains(&circle_id) {
                    circles.insert(circle_id);
                } else {
                    debug!(circle_id = %circle_id, "Dropping circle the author is not a member of");
                }
            }
        }

        Ok(Audience::circles(circles)?)
    }
}
