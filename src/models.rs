//! Domain record collected by the form flow.

use serde::{Deserialize, Serialize};

/// Personal details gathered across the Start and Detail steps.
///
/// Field names are PascalCase on the wire so that session JSON and
/// submitted form fields share one vocabulary. Missing fields bind to
/// empty strings and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl UserData {
    /// Empty record with only the first name filled in
    pub fn with_first_name(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            ..Self::default()
        }
    }

    /// Full name for display, skipping empty parts
    pub fn display_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
