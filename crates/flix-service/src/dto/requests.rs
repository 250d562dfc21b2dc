//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use flix_core::{AudienceTarget, ImageRef};
use serde::Deserialize;
use validator::{Validate, ValidationError};

// ============================================================================
// Post Requests
// ============================================================================

/// Create post request
///
/// An empty `images` list passes validation and is rejected by the service
/// with `NoImageSelected`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Object store URIs, in display order
    #[validate(custom(function = "validate_image_refs"))]
    pub images: Vec<String>,

    pub caption: Option<String>,

    /// Audience picker selections; empty means everyone
    #[serde(default)]
    pub targets: Vec<AudienceTarget>,
}

impl CreatePostRequest {
    pub fn image_refs(&self) -> Vec<ImageRef> {
        self.images.iter().map(ImageRef::new).collect()
    }
}

fn validate_image_refs(images: &[String]) -> Result<(), ValidationError> {
    if images.iter().any(|uri| uri.trim().is_empty()) {
        return Err(ValidationError::new("blank_image")
            .with_message("Image reference must not be blank".into()));
    }
    Ok(())
}

// ============================================================================
// Reaction Requests
// ============================================================================

/// Add reaction request (an emoji or short text)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddReactionRequest {
    #[validate(length(min = 1, max = 64, message = "Reaction must be 1-64 characters"))]
    pub symbol: String,
}
