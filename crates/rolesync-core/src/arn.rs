//! Role ARN template rendering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default ARN template. Placeholders are substituted verbatim.
pub const DEFAULT_ROLE_TEMPLATE: &str = "arn:aws:iam::{owner_id}:role/{role_name}";

const OWNER_ID_PLACEHOLDER: &str = "{owner_id}";
const ROLE_NAME_PLACEHOLDER: &str = "{role_name}";

/// Errors produced when constructing a [`RoleArnTemplate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArnTemplateError {
    #[error("ARN template is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),
}

/// An ARN template carrying `{owner_id}` and `{role_name}` placeholders.
///
/// Validated at construction so rendering can never produce an ARN with a
/// leftover placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct RoleArnTemplate(String);

impl RoleArnTemplate {
    /// Validates and wraps a template string.
    pub fn new(template: impl Into<String>) -> Result<Self, ArnTemplateError> {
        let template = template.into();
        if !template.contains(OWNER_ID_PLACEHOLDER) {
            return Err(ArnTemplateError::MissingPlaceholder(OWNER_ID_PLACEHOLDER));
        }
        if !template.contains(ROLE_NAME_PLACEHOLDER) {
            return Err(ArnTemplateError::MissingPlaceholder(ROLE_NAME_PLACEHOLDER));
        }
        Ok(Self(template))
    }

    /// Renders the template for an account and role.
    pub fn render(&self, owner_id: &str, role_name: &str) -> String {
        self.0
            .replace(OWNER_ID_PLACEHOLDER, owner_id)
            .replace(ROLE_NAME_PLACEHOLDER, role_name)
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RoleArnTemplate {
    fn default() -> Self {
        Self(DEFAULT_ROLE_TEMPLATE.to_string())
    }
}

impl std::str::FromStr for RoleArnTemplate {
    type Err = ArnTemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RoleArnTemplate {
    type Error = ArnTemplateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RoleArnTemplate> for String {
    fn from(t: RoleArnTemplate) -> Self {
        t.0
    }
}

impl std::fmt::Display for RoleArnTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
