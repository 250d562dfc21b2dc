//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{Partition, Snowflake};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(Snowflake),

    #[error("Circle not found: {0}")]
    CircleNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("No image selected")]
    NoImageSelected,

    #[error("Audience is empty after membership verification")]
    InvalidAudience,

    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the author may do this")]
    Forbidden,

    #[error("Not a member of circle {0}")]
    NotCircleMember(Snowflake),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("A post is still live; next post allowed in {hours_remaining:.1} hours")]
    PostingWindowActive { hours_remaining: f64 },

    // =========================================================================
    // Consistency Errors (recoverable by idempotent retry)
    // =========================================================================
    #[error("Fan-out incomplete for post {post_id}: {} circle copies failed", failed_circles.len())]
    PartialFanoutFailure {
        post_id: Snowflake,
        failed_circles: Vec<Snowflake>,
    },

    #[error("Delete incomplete for post {post_id}: {} copies survive", surviving.len())]
    PartialDeleteFailure {
        post_id: Snowflake,
        surviving: Vec<Partition>,
    },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Subscription failed: {0}")]
    SubscriptionError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Identity provider error: {0}")]
    IdentityError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::CircleNotFound(_) => "UNKNOWN_CIRCLE",

            Self::NoImageSelected => "NO_IMAGE_SELECTED",
            Self::InvalidAudience => "INVALID_AUDIENCE",
            Self::ValidationError(_) => "VALIDATION_ERROR",

            Self::Forbidden => "FORBIDDEN",
            Self::NotCircleMember(_) => "NOT_CIRCLE_MEMBER",

            Self::PostingWindowActive { .. } => "POSTING_WINDOW_ACTIVE",

            Self::PartialFanoutFailure { .. } => "PARTIAL_FANOUT_FAILURE",
            Self::PartialDeleteFailure { .. } => "PARTIAL_DELETE_FAILURE",

            Self::SubscriptionError(_) => "SUBSCRIPTION_ERROR",
            Self::StoreError(_) => "STORE_ERROR",
            Self::IdentityError(_) => "IDENTITY_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PostNotFound(_) | Self::CircleNotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoImageSelected | Self::InvalidAudience | Self::ValidationError(_)
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Forbidden | Self::NotCircleMember(_))
    }

    /// Partial writes/deletes the caller can finish by retrying the remnants
    pub fn is_partial(&self) -> bool {
        matches!(
            self,
            Self::PartialFanoutFailure { .. } | Self::PartialDeleteFailure { .. }
        )
    }

    /// Whether retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        self.is_partial()
            || matches!(
                self,
                Self::SubscriptionError(_) | Self::StoreError(_) | Self::IdentityError(_)
            )
    }
}
