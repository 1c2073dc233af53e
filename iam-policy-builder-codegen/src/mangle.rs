//! Identifier derivation for generated modules.
//!
//! Every AWS name becomes a snake_case method with a role prefix (`to_`, `on_`, `if_`).
//! Names are split on non-alphanumerics and each segment is capitalised before snake
//! casing, so `Foo-Bar` and `FooBar` derive the same base identifier. Clashes within a
//! module are resolved with the lowest free numeric suffix starting at 2, and each one is
//! reported as a [`CollisionWarning`].

use std::collections::HashSet;

use convert_case::{Boundary, Case, Casing};
use iam_policy_builder_runtime::GLOBAL_CONDITION_KEYS;
use serde::Serialize;

use crate::arn::StandardPlaceholder;
use crate::errors::{CollisionWarning, Role};
use crate::schema::ServiceMetadata;

/// Method names provided by the generated type or the runtime traits. Pre-allocated so a
/// derived accessor never shadows them. The global condition accessors are reserved as
/// well, see [`method_scope`].
pub const RESERVED_METHODS: &[&str] = &[
    "new",
    "with_sid",
    "to",
    "on",
    "if",
    "add",
    "allow",
    "deny",
    "not_action",
    "not_resource",
    "with_arn_defaults",
    "all_actions",
    "all_actions_with_access_level",
    "action_info",
    "resource_type_info",
    "statement",
    "statement_mut",
    "into_statement",
    "to_value",
    "to_json",
    "to_json_pretty",
    "to_owned",
    "to_string",
    "clone",
    "default",
    "serialize",
];

/// Argument names used by generated accessors besides the derived ones.
const RESERVED_PARAMETERS: &[&str] = &[
    "self", "value", "operator", "account", "region", "partition", "defaults", "arn",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "gen", "macro", "override", "priv", "try", "typeof", "unsized", "virtual",
    "yield",
];

/// Short names for STS web-identity provider key prefixes.
const WEB_IDENTITY_PROVIDERS: &[(&str, &str)] = &[
    ("accounts.google.com", "google"),
    ("cognito-identity.amazonaws.com", "cognito"),
    ("www.amazon.com", "amazon"),
    ("graph.facebook.com", "facebook"),
];

pub fn is_keyword(ident: &str) -> bool {
    RUST_KEYWORDS.contains(&ident)
}

fn upper_first(segment: &str) -> String {
    let mut chars = segment.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}

/// Split on non-alphanumerics, capitalise each segment and join. Only ASCII letters and
/// digits survive.
pub fn pascal_join(name: &str) -> String {
    if name.chars().any(|c| c.is_alphanumeric() && !c.is_ascii()) {
        log::warn!("`{name}` contains non-ASCII letters, which are dropped from its identifier");
    }
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .map(upper_first)
        .collect()
}

/// snake_case of `name`. Digits stay attached to the preceding word (`Ec2Instance` becomes
/// `ec2_instance`).
pub fn snake(name: &str) -> String {
    pascal_join(name)
        .without_boundaries(&[
            Boundary::LOWER_DIGIT,
            Boundary::UPPER_DIGIT,
            Boundary::DIGIT_LOWER,
        ])
        .to_case(Case::Snake)
}

/// PascalCase type name for a service.
pub fn type_name(service_name: &str) -> String {
    let name = pascal_join(service_name);
    match name.chars().next() {
        None => "Service".to_string(),
        Some(first) if first.is_ascii_digit() => format!("Service{name}"),
        Some(_) => name,
    }
}

/// Module (file) name for a service prefix.
pub fn module_name(prefix: &str) -> String {
    let name = snake(prefix);
    match name.chars().next() {
        None => "service".to_string(),
        Some(first) if first.is_ascii_digit() => format!("service_{name}"),
        Some(_) if is_keyword(&name) => format!("{name}_"),
        Some(_) => name,
    }
}

/// Set of identifiers already taken in one namespace.
#[derive(Debug, Clone, Default)]
pub struct IdentifierScope {
    taken: HashSet<String>,
}

impl IdentifierScope {
    pub fn with_reserved(reserved: &[&str]) -> Self {
        Self {
            taken: reserved.iter().map(|name| (*name).to_string()).collect(),
        }
    }

    pub fn reserve(&mut self, ident: &str) {
        self.taken.insert(ident.to_string());
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.taken.contains(ident)
    }

    /// Claim `base`, or `base2`, `base3`, ... if taken. The flag reports a collision.
    pub fn allocate(&mut self, base: &str) -> (String, bool) {
        if self.taken.insert(base.to_string()) {
            return (base.to_string(), false);
        }
        let mut suffix = 2_usize;
        loop {
            let candidate = format!("{base}{suffix}");
            if self.taken.insert(candidate.clone()) {
                return (candidate, true);
            }
            suffix += 1;
        }
    }
}

/// Derive the base method name for `role`. Never empty, never a keyword.
pub fn method_base(role: Role, name: &str) -> String {
    let body = snake(name);
    let body = if body.is_empty() { "unnamed".to_string() } else { body };
    format!("{}{}", role.prefix(), body)
}

/// Derive the condition accessor base name for a key in the given service.
///
/// Keys of other services (including global `aws:` keys) carry their prefix so that
/// `aws:RequestTag/${TagKey}` becomes `if_aws_request_tag`. Open-suffix keys get `_exists`.
pub fn condition_base(
    service_prefix: &str,
    key_prefix: &str,
    key_name: &str,
    open_suffix: bool,
) -> String {
    let qualifier = WEB_IDENTITY_PROVIDERS
        .iter()
        .find(|(provider, _)| *provider == key_prefix)
        .map(|(_, short)| *short)
        .or_else(|| (key_prefix != service_prefix).then_some(key_prefix));

    let combined = match qualifier {
        Some(qualifier) => format!("{qualifier}-{key_name}"),
        None => key_name.to_string(),
    };
    let base = method_base(Role::Condition, &combined);
    if open_suffix {
        format!("{base}_exists")
    } else {
        base
    }
}

/// Derive a parameter name, unique within `scope`.
pub fn parameter_ident(scope: &mut IdentifierScope, placeholder: &str) -> String {
    let mut base = snake(placeholder);
    if base.is_empty() {
        base = "param".to_string();
    } else if base.starts_with(|c: char| c.is_ascii_digit()) {
        base = format!("p{base}");
    }
    if is_keyword(&base) {
        base.push('_');
    }
    scope.allocate(&base).0
}

/// Identifier and embedded literal for one generated member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberPlan {
    pub method: String,
    /// Qualified action, ARN template or condition key as written into the source.
    pub literal: String,
}

/// Parameters of one resource accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourcePlan {
    pub member: MemberPlan,
    /// `(placeholder, argument)` pairs for resource-specific placeholders, in order.
    pub parameters: Vec<(String, String)>,
    /// Standard placeholders present, in argument order.
    #[serde(skip)]
    pub standard: Vec<StandardPlaceholder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionPlan {
    pub member: MemberPlan,
    /// Argument carrying the parameter value of a parameterized key.
    pub parameter: Option<String>,
}

/// All identifiers for one service module, parallel to the metadata vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierPlan {
    pub module_name: String,
    pub type_name: String,
    pub actions: Vec<MemberPlan>,
    pub resources: Vec<ResourcePlan>,
    pub conditions: Vec<ConditionPlan>,
    pub warnings: Vec<CollisionWarning>,
}

impl IdentifierPlan {
    /// Method name of the condition accessor for a raw key, if one was planned.
    pub fn condition_method(&self, service: &ServiceMetadata, key: &str) -> Option<&str> {
        service
            .condition_keys
            .iter()
            .position(|condition| condition.key.raw() == key)
            .and_then(|index| self.conditions.get(index))
            .map(|plan| plan.member.method.as_str())
    }
}

/// Scope for the methods of one generated type: [`RESERVED_METHODS`] plus every global
/// condition accessor of the runtime.
pub fn method_scope() -> IdentifierScope {
    let mut scope = IdentifierScope::with_reserved(RESERVED_METHODS);
    for global in GLOBAL_CONDITION_KEYS {
        scope.reserve(global.method);
    }
    scope
}

struct Planner<'a> {
    service: &'a ServiceMetadata,
    scope: IdentifierScope,
    /// Global accessors a catalog may redeclare under the exact same key.
    shadowable: HashSet<&'static str>,
    warnings: Vec<CollisionWarning>,
}

impl Planner<'_> {
    fn allocate(&mut self, role: Role, source: &str, base: String) -> String {
        let (method, collided) = self.scope.allocate(&base);
        if collided {
            let warning = CollisionWarning {
                service: self.service.prefix.clone(),
                role,
                source: source.to_string(),
                base,
                resolved: method.clone(),
            };
            log::warn!("{warning}");
            self.warnings.push(warning);
        }
        method
    }

    /// A key identical to a runtime global key keeps the global accessor's name; the
    /// generated inherent method takes precedence over the trait method.
    fn allocate_condition(&mut self, key: &str, base: String) -> String {
        let shadows = GLOBAL_CONDITION_KEYS
            .iter()
            .any(|global| global.key == key && global.method == base);
        if shadows && self.shadowable.remove(base.as_str()) {
            return base;
        }
        self.allocate(Role::Condition, key, base)
    }
}

/// Allocate every identifier for `service`: actions first, then resource types, then
/// condition keys, each in input order.
pub fn plan_identifiers(service: &ServiceMetadata) -> IdentifierPlan {
    let mut planner = Planner {
        service,
        scope: method_scope(),
        shadowable: GLOBAL_CONDITION_KEYS.iter().map(|global| global.method).collect(),
        warnings: Vec::new(),
    };

    let actions = service
        .actions
        .iter()
        .map(|action| {
            let method = planner.allocate(
                Role::Action,
                &action.name,
                method_base(Role::Action, &action.name),
            );
            MemberPlan {
                method,
                literal: format!("{}:{}", service.prefix, action.name),
            }
        })
        .collect();

    let resources = service
        .resource_types
        .iter()
        .map(|resource| {
            let method = planner.allocate(
                Role::Resource,
                &resource.name,
                method_base(Role::Resource, &resource.name),
            );
            let mut parameter_scope = IdentifierScope::with_reserved(RESERVED_PARAMETERS);
            let parameters = resource
                .arn
                .custom_placeholders()
                .into_iter()
                .map(|placeholder| {
                    (
                        placeholder.to_string(),
                        parameter_ident(&mut parameter_scope, placeholder),
                    )
                })
                .collect();
            ResourcePlan {
                member: MemberPlan {
                    method,
                    literal: resource.arn.raw().to_string(),
                },
                parameters,
                standard: resource.arn.standard_placeholders(),
            }
        })
        .collect();

    let conditions = service
        .condition_keys
        .iter()
        .map(|condition| {
            let key = &condition.key;
            let base = condition_base(
                &service.prefix,
                key.prefix(),
                key.name(),
                key.is_open_suffix(),
            );
            let method = planner.allocate_condition(key.raw(), base);
            let parameter = key.parameter().map(|placeholder| {
                let mut parameter_scope = IdentifierScope::with_reserved(RESERVED_PARAMETERS);
                parameter_ident(&mut parameter_scope, placeholder)
            });
            ConditionPlan {
                member: MemberPlan {
                    method,
                    literal: key.literal_prefix(),
                },
                parameter,
            }
        })
        .collect();

    log::debug!(
        "{}: planned identifiers with {} collision(s)",
        service.prefix,
        planner.warnings.len()
    );

    IdentifierPlan {
        module_name: module_name(&service.prefix),
        type_name: type_name(&service.name),
        actions,
        resources,
        conditions,
        warnings: planner.warnings,
    }
}
