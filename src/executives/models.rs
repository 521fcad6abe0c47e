//! Executive records and API response validation.
//!
//! Contains the executive structure, session tokens, and the check that turns
//! a raw JSON body into a list of executives.

use crate::executives::error::FetchError;
use serde::Deserialize;
use serde_json::Value;

/// Session token requested for the "current" tab.
pub const CURRENT_SESSION: &str = "2023-2024";

/// Session token requested for the "past" tab.
pub const PAST_SESSION: &str = "2022-2023";

/// Field of the response body that holds the executive list.
pub const LIST_FIELD: &str = "data";

/// Represents one organizational executive.
///
/// Records come from the remote API and are never modified by the UI.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Executive {
    /// Email address, unique per executive
    pub email: String,
    /// Full name
    pub name: String,
    /// Position held (e.g. "President")
    pub position: String,
    /// Student ID
    pub student_id: String,
    /// Academic session the record belongs to
    pub session: String,
    /// Avatar image URL
    pub image_url: String,
    /// LinkedIn profile URL
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

impl Executive {
    /// Build the `mailto:` link for this executive.
    ///
    /// # Returns
    /// * `String` - Mail link (e.g., "mailto:jane@example.org")
    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }

    /// Get the LinkedIn URL if one is set.
    ///
    /// # Returns
    /// * `Option<&str>` - LinkedIn URL, or None when missing or blank
    pub fn linkedin(&self) -> Option<&str> {
        self.linkedin_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Extract the executive list from a response body.
///
/// # Arguments
/// * `body` - Parsed JSON response body
///
/// # Returns
/// * `Result<Vec<Executive>, FetchError>` - Executives in received order
///
/// # Details
/// The body must be an object whose `data` field is an array of executive
/// records. Any other shape, including a single malformed record, yields
/// `FetchError::UnexpectedShape`.
pub fn parse_executives(body: Value) -> Result<Vec<Executive>, FetchError> {
    let Value::Object(mut fields) = body else {
        return Err(FetchError::UnexpectedShape);
    };

    match fields.remove(LIST_FIELD) {
        Some(list @ Value::Array(_)) => {
            serde_json::from_value(list).map_err(|_| FetchError::UnexpectedShape)
        }
        _ => Err(FetchError::UnexpectedShape),
    }
}
