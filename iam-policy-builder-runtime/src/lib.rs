//! Runtime support for generated IAM statement providers.
//!
//! Every module produced by `iam-policy-builder-codegen` wraps a [`PolicyStatement`] and
//! implements [`ServiceStatement`]. The generated methods (`to_*`, `on_*`, `if_*`) only
//! ever call the three primitives exposed here:
//!
//! - [`PolicyStatement::to`] adds a fully qualified action
//! - [`PolicyStatement::on`] adds a resource ARN
//! - [`PolicyStatement::r#if`] adds a condition clause
//!
//! [`GlobalConditions`] adds accessors for the global `aws:` condition keys to every
//! statement.
//!
//! The runtime performs no validation against IAM. Which keys and operators are reachable
//! is decided at generation time by the accessors the generator chose to emit.
//!
//! ```
//! use iam_policy_builder_runtime::{OperatorKind, PolicyStatement};
//!
//! let statement = PolicyStatement::new()
//!     .to("s3:GetObject")
//!     .on("arn:aws:s3:::my-bucket/*")
//!     .r#if("aws:SecureTransport", true, OperatorKind::Bool);
//!
//! let json = statement.to_json().unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"Effect":"Allow","Action":"s3:GetObject","Resource":"arn:aws:s3:::my-bucket/*","Condition":{"Bool":{"aws:SecureTransport":"true"}}}"#
//! );
//! ```

mod access_level;
mod arn;
mod global;
mod operator;
mod service;
mod statement;
mod values;

pub use access_level::AccessLevel;
pub use arn::{ArnDefaults, DEFAULT_PARTITION, WILDCARD};
pub use global::{GlobalConditionKey, GlobalConditions, GLOBAL_CONDITION_KEYS};
pub use operator::{Operator, OperatorKind, ParseOperatorError, SetQualifier};
pub use service::{ActionInfo, ResourceTypeInfo, ResourceTypeRef, ServiceStatement};
pub use statement::{ConditionBlock, Effect, PolicyStatement};
pub use values::{ConditionValue, IntoConditionValues};

// Generated modules implement `Serialize` through this path so consumers do not need a
// direct serde dependency.
pub use serde;

/// Everything a consumer of generated modules usually needs in scope.
pub mod prelude {
    pub use crate::{
        AccessLevel, ArnDefaults, Effect, GlobalConditions, Operator, OperatorKind,
        PolicyStatement, ServiceStatement, SetQualifier,
    };
}
