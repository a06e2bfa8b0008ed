//! User data model.
//!
//! Users are provisioned externally; this service only reads them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Signed-in user as stored in the session and returned to clients.
///
/// # Examples
/// ```
/// use audit_backend::domain::User;
///
/// let user = User::new("a@x.com", "Ada", "Lovelace");
/// assert_eq!(user.display_name(), "Ada Lovelace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "auditor@example.org")]
    email: String,
    #[schema(example = "Ada")]
    first_name: String,
    #[schema(example = "Lovelace")]
    last_name: String,
}

impl User {
    /// Build a user from stored column values.
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Email identifying the user.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// First and last name joined for greetings, skipping blanks.
    pub fn display_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
