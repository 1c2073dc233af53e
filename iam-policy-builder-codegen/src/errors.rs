//! Error types for the generation pipeline.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use thiserror::Error;

use crate::arn::ArnTemplateError;

/// A structural or referential problem in one service's raw metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("document matches neither the scraped nor the service reference format")]
    UnknownFormat,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("name is empty")]
    EmptyName,

    #[error("unknown access level `{0}`")]
    UnknownAccessLevel(String),

    #[error("duplicate action `{0}` (action names are case-insensitive)")]
    DuplicateAction(String),

    #[error("duplicate resource type `{0}`")]
    DuplicateResourceType(String),

    #[error("duplicate condition key `{0}`")]
    DuplicateConditionKey(String),

    #[error("references undeclared resource type `{0}`")]
    DanglingResourceType(String),

    #[error("references undeclared condition key `{0}`")]
    UndeclaredConditionKey(String),

    #[error("malformed condition key `{0}`")]
    MalformedConditionKey(String),

    #[error("unknown condition value type `{0}`")]
    UnknownConditionType(String),

    #[error("malformed ARN template `{template}`: {reason}")]
    MalformedArn {
        template: String,
        reason: ArnTemplateError,
    },
}

/// A [`SchemaViolation`] located within a service.
///
/// `location` names the offending entry and field, e.g. `actions.MakeWidget.accessLevel`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{service}: {location}: {kind}")]
pub struct SchemaError {
    pub service: String,
    pub location: String,
    pub kind: SchemaViolation,
}

impl SchemaError {
    pub fn new(
        service: impl Into<String>,
        location: impl Into<String>,
        kind: SchemaViolation,
    ) -> Self {
        Self {
            service: service.into(),
            location: location.into(),
            kind,
        }
    }
}

/// Emitter invariant violations. These indicate a bug in the pipeline, not bad input.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("identifier plan has {found} {what} entries, metadata has {expected}")]
    PlanMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("resource `{resource}` has no parameter for placeholder `{placeholder}`")]
    MissingParameter {
        resource: String,
        placeholder: String,
    },

    #[error("`{member}` references condition `{key}` with no planned accessor")]
    UnknownCondition { member: String, key: String },

    #[error("failed to write generated source: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Errors surfaced by the batch driver and output helpers.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{service}: rendering failed: {source}")]
    Render {
        service: String,
        #[source]
        source: RenderError,
    },

    #[error("services `{first}` and `{second}` both map to module `{module}`")]
    DuplicateModule {
        module: String,
        first: String,
        second: String,
    },

    #[error("failed to {operation} {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerationError {
    pub fn render(service: impl Into<String>, source: RenderError) -> Self {
        Self::Render {
            service: service.into(),
            source,
        }
    }

    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// The member category an identifier is allocated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Role {
    Action,
    Resource,
    Condition,
}

impl Role {
    /// Method name prefix for this role.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Action => "to_",
            Self::Resource => "on_",
            Self::Condition => "if_",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Action => f.write_str("action"),
            Self::Resource => f.write_str("resource"),
            Self::Condition => f.write_str("condition"),
        }
    }
}

/// Two names in one service mangled to the same identifier.
///
/// Non-fatal: the later name received a numeric suffix.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CollisionWarning {
    pub service: String,
    pub role: Role,
    pub source: String,
    pub base: String,
    pub resolved: String,
}

impl Display for CollisionWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}: {} `{}` collides on `{}`, renamed to `{}`",
            self.service, self.role, self.source, self.base, self.resolved
        )
    }
}

pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_service_and_location() {
        let err = SchemaError::new(
            "widgets",
            "actions.MakeWidget.accessLevel",
            SchemaViolation::UnknownAccessLevel("Admin".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "widgets: actions.MakeWidget.accessLevel: unknown access level `Admin`"
        );
    }

    #[test]
    fn test_collision_warning_display() {
        let warning = CollisionWarning {
            service: "widgets".to_string(),
            role: Role::Condition,
            source: "widgets:FooBar".to_string(),
            base: "if_foo_bar".to_string(),
            resolved: "if_foo_bar2".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "widgets: condition `widgets:FooBar` collides on `if_foo_bar`, renamed to `if_foo_bar2`"
        );
    }
}
