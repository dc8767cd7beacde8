//! Check request/response models.

use serde::{Deserialize, Serialize};

/// A relationship check: does `user` have `relation` to `object`?
///
/// Identifiers are in `<type>:<id>` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Subject identifier, e.g. `user:alice`.
    pub user: String,
    /// Relation name, e.g. `viewer`.
    pub relation: String,
    /// Object identifier, e.g. `document:readme`.
    pub object: String,
}

impl CheckRequest {
    #[must_use]
    pub fn new(
        object_type: &str,
        object_id: &str,
        relation: &str,
        user_type: &str,
        user_id: &str,
    ) -> Self {
        Self {
            user: format!("{user_type}:{user_id}"),
            relation: relation.to_owned(),
            object: format!("{object_type}:{object_id}"),
        }
    }
}

/// Response of a relationship check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Whether the relationship holds. The service omits the field for "not allowed".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<bool>,
    /// Optional resolution trace returned by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl CheckResponse {
    #[must_use]
    pub fn allowed() -> Self {
        Self {
            allowed: Some(true),
            resolution: None,
        }
    }

    #[must_use]
    pub fn denied() -> Self {
        Self {
            allowed: Some(false),
            resolution: None,
        }
    }

    /// The decision carried by this response; a missing flag means "not allowed".
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.allowed.unwrap_or(false)
    }
}
