//! Generator for typed IAM statement providers.
//!
//! The pipeline for one service is strictly sequential:
//!
//! 1. [`normalize`] parses a raw catalog document (scraped or service reference format)
//!    into a validated [`ServiceMetadata`].
//! 2. [`mangle`] derives a unique Rust identifier for every action, resource type and
//!    condition key.
//! 3. [`emit`] renders one Rust module from the metadata and the identifier plan.
//!
//! [`batch`] runs the pipeline for many services in parallel and [`output`] moves the
//! results to and from disk.
//!
//! ```
//! use iam_policy_builder_codegen::generate_service;
//!
//! let json = r#"{
//!     "name": "widgets",
//!     "servicePrefix": "widgets",
//!     "actionList": {"MakeWidget": {"accessLevel": "Write"}},
//!     "resourceTypes": {},
//!     "conditions": {}
//! }"#;
//! let module = generate_service("widgets", json).unwrap();
//! assert_eq!(module.type_name, "Widgets");
//! assert!(module.source.contains("pub fn to_make_widget(self) -> Self"));
//! ```

pub mod arn;
pub mod batch;
pub mod emit;
pub mod errors;
pub mod mangle;
pub mod normalize;
pub mod output;
pub mod raw;
pub mod schema;

pub use batch::{
    generate_batch, generate_service, BatchReport, GeneratedModule, IndexStyle, ServiceInput,
    ServiceOutcome,
};
pub use emit::{render_module, GENERATED_MARKER};
pub use errors::{
    CollisionWarning, GenerationError, RenderError, Role, SchemaError, SchemaViolation,
};
pub use mangle::{plan_identifiers, IdentifierPlan};
pub use normalize::{normalize, normalize_json};
pub use output::{check_modules, load_inputs, write_modules, StaleFile, Staleness, INDEX_FILE};
pub use schema::ServiceMetadata;
