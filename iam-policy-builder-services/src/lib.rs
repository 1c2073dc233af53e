//! Typed IAM statement providers for the service catalogs bundled in
//! `resources/services`.
//!
//! Every module is generated by the build script; each exposes one statement type with a
//! chainable `to_*` method per action, `on_*` per resource type and `if_*` per condition
//! key.
//!
//! ```
//! use iam_policy_builder_services::{ServiceStatement, Widgets};
//!
//! let statement = Widgets::new()
//!     .to_make_widget()
//!     .on_widget("abc", None, None, None);
//!
//! assert_eq!(
//!     statement.to_json().unwrap(),
//!     r#"{"Effect":"Allow","Action":"widgets:MakeWidget","Resource":"arn:aws:widgets:*:*:widget/abc"}"#
//! );
//! ```

pub use iam_policy_builder_runtime::{
    AccessLevel, ArnDefaults, Effect, GlobalConditions, Operator, OperatorKind, PolicyStatement,
    ServiceStatement,
};

include!(concat!(env!("OUT_DIR"), "/services.rs"));
