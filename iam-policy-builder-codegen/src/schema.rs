//! Canonical metadata for one AWS service.
//!
//! Everything downstream of the normalizer (identifier planning and rendering) reads these
//! types only. Vectors keep the order entries had in the raw input.

use iam_policy_builder_runtime::{AccessLevel, OperatorKind};
use serde::Serialize;

use crate::arn::ArnTemplate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceMetadata {
    /// Human readable service name, used for the generated type name.
    pub name: String,
    /// Prefix used in qualified action names.
    pub prefix: String,
    pub url: String,
    pub actions: Vec<Action>,
    pub resource_types: Vec<ResourceType>,
    pub condition_keys: Vec<ConditionKey>,
}

impl ServiceMetadata {
    pub fn resource_type(&self, name: &str) -> Option<&ResourceType> {
        self.resource_types.iter().find(|resource| resource.name == name)
    }

    pub fn condition_key(&self, key: &str) -> Option<&ConditionKey> {
        self.condition_keys.iter().find(|condition| condition.key.raw() == key)
    }

    /// Action names grouped by access level, levels in order of first appearance.
    pub fn access_levels(&self) -> Vec<(AccessLevel, Vec<&str>)> {
        let mut groups: Vec<(AccessLevel, Vec<&str>)> = Vec::new();
        for action in &self.actions {
            match groups.iter_mut().find(|(level, _)| *level == action.access_level) {
                Some((_, names)) => names.push(action.name.as_str()),
                None => groups.push((action.access_level, vec![action.name.as_str()])),
            }
        }
        groups
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub name: String,
    pub description: String,
    pub url: String,
    pub access_level: AccessLevel,
    pub resource_types: Vec<ActionResourceType>,
    /// Condition keys, including those attached to individual resource type rows.
    pub conditions: Vec<String>,
    pub dependent_actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResourceType {
    pub name: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceType {
    pub name: String,
    pub url: String,
    pub arn: ArnTemplate,
    pub condition_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionKey {
    pub key: ConditionKeyTemplate,
    pub description: String,
    pub url: String,
    pub value_type: ConditionValueType,
    pub related_actions: Vec<String>,
    pub related_resource_types: Vec<String>,
}

impl ConditionKey {
    pub fn default_operator(&self) -> OperatorKind {
        self.value_type.default_operator()
    }
}

/// Value family of a condition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConditionValueType {
    String,
    Arn,
    Numeric,
    Date,
    Bool,
    IpAddress,
    Binary,
}

impl ConditionValueType {
    /// Parse a type label as AWS publishes it (`String`, `ArrayOfARN`, `Boolean`, ...).
    ///
    /// `ArrayOf` variants map to their element family. Matching is case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_ascii_lowercase();
        let base = lower.strip_prefix("arrayof").unwrap_or(&lower);
        match base {
            "" | "string" => Some(Self::String),
            "arn" => Some(Self::Arn),
            "numeric" | "long" | "integer" => Some(Self::Numeric),
            "date" => Some(Self::Date),
            "bool" | "boolean" => Some(Self::Bool),
            "ipaddress" => Some(Self::IpAddress),
            "binary" => Some(Self::Binary),
            _ => None,
        }
    }

    pub const fn default_operator(self) -> OperatorKind {
        match self {
            Self::String => OperatorKind::StringLike,
            Self::Arn => OperatorKind::ArnLike,
            Self::Numeric => OperatorKind::NumericEquals,
            Self::Date => OperatorKind::DateEquals,
            Self::Bool => OperatorKind::Bool,
            Self::IpAddress => OperatorKind::IpAddress,
            Self::Binary => OperatorKind::BinaryEquals,
        }
    }

    /// Link to the IAM documentation of the operators for this family.
    pub const fn operator_docs(self) -> &'static str {
        match self {
            Self::String => "https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_elements_condition_operators.html#Conditions_String",
            Self::Arn => "https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_elements_condition_operators.html#Conditions_ARN",
            Self::Numeric => "https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_elements_condition_operators.html#Conditions_Numeric",
            Self::Date => "https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_elements_condition_operators.html#Conditions_Date",
            Self::Bool => "https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_elements_condition_operators.html#Conditions_Boolean",
            Self::IpAddress => "https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_elements_condition_operators.html#Conditions_IPAddress",
            Self::Binary => "https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_elements_condition_operators.html#Conditions_BinaryEquals",
        }
    }
}

/// A condition key, possibly parameterized.
///
/// `aws:RequestTag/${TagKey}` has prefix `aws`, name `RequestTag` and parameter `TagKey`;
/// `s3:ExistingObjectTag/<key>` has parameter `key`. A key ending in a bare `/` (such as
/// `ec2:ResourceTag/`) has no parameter but is an existence check on the key family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionKeyTemplate {
    raw: String,
    prefix: String,
    name: String,
    parameter: Option<String>,
    open_suffix: bool,
}

impl ConditionKeyTemplate {
    /// Parse a fully qualified key. Returns `None` when the key has no `prefix:` part or
    /// an empty name.
    pub fn parse(raw: &str) -> Option<Self> {
        let (prefix, rest) = raw.split_once(':')?;
        if prefix.is_empty() || rest.is_empty() {
            return None;
        }

        // The name ends at the first `/` followed by a placeholder or the end of the key.
        let split = rest.char_indices().find_map(|(index, c)| {
            let tail = &rest[index + c.len_utf8()..];
            (c == '/' && (tail.is_empty() || tail.starts_with('$') || tail.starts_with('<')))
                .then_some(index)
        });

        let (name, parameter, open_suffix) = match split {
            None => (rest, None, false),
            Some(index) => {
                let tail = &rest[index + 1..];
                let parameter: String = tail.chars().filter(char::is_ascii_alphanumeric).collect();
                if tail.is_empty() {
                    (&rest[..index], None, true)
                } else if parameter.is_empty() {
                    return None;
                } else {
                    (&rest[..index], Some(parameter), false)
                }
            }
        };

        if name.is_empty() {
            return None;
        }

        Some(Self {
            raw: raw.to_string(),
            prefix: prefix.to_string(),
            name: name.to_string(),
            parameter,
            open_suffix,
        })
    }

    /// The key exactly as published.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholder name for parameterized keys.
    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    /// `true` for keys ending in a bare `/`.
    pub fn is_open_suffix(&self) -> bool {
        self.open_suffix
    }

    /// Literal text preceding the parameter value in the policy key, e.g. `aws:RequestTag/`.
    pub fn literal_prefix(&self) -> String {
        if self.parameter.is_some() || self.open_suffix {
            format!("{}:{}/", self.prefix, self.name)
        } else {
            self.raw.clone()
        }
    }
}

impl Serialize for ConditionKeyTemplate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
