//! The in-progress policy statement.
//!
//! A [`PolicyStatement`] is an explicit value object: ordered sets for actions and
//! resources, and an operator → key → value-set map for conditions. Serialization reads
//! the current state without consuming or snapshotting it, so a statement can be
//! serialized, mutated and serialized again.

use indexmap::{IndexMap, IndexSet};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::arn::{ArnDefaults, WILDCARD};
use crate::operator::Operator;
use crate::values::IntoConditionValues;

/// Whether a statement grants or denies access.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

impl Display for Effect {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Allow => f.write_str("Allow"),
            Self::Deny => f.write_str("Deny"),
        }
    }
}

/// Condition clauses keyed by operator, then by context key.
pub type ConditionBlock = IndexMap<Operator, IndexMap<String, IndexSet<String>>>;

/// One IAM policy statement under construction.
///
/// Mutators come in two flavours: chaining methods that take and return `self`
/// ([`to`](Self::to), [`on`](Self::on), [`r#if`](Self::r#if), ...) and `&mut self`
/// methods ([`add_action`](Self::add_action), ...) used by generated providers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyStatement {
    sid: Option<String>,
    effect: Effect,
    actions: IndexSet<String>,
    not_action: bool,
    resources: IndexSet<String>,
    not_resource: bool,
    conditions: ConditionBlock,
    arn_defaults: ArnDefaults,
}

impl PolicyStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a statement carrying a statement ID.
    pub fn with_sid(sid: impl Into<String>) -> Self {
        Self {
            sid: Some(sid.into()),
            ..Self::default()
        }
    }

    #[inline]
    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    #[inline]
    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Selected actions in insertion order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(String::as_str)
    }

    /// Selected resources in insertion order. Empty means `*` on serialization.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(String::as_str)
    }

    #[inline]
    pub fn conditions(&self) -> &ConditionBlock {
        &self.conditions
    }

    #[inline]
    pub fn arn_defaults(&self) -> &ArnDefaults {
        &self.arn_defaults
    }

    #[inline]
    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    #[inline]
    pub fn has_resources(&self) -> bool {
        !self.resources.is_empty()
    }

    #[inline]
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    #[inline]
    pub fn is_not_action(&self) -> bool {
        self.not_action
    }

    #[inline]
    pub fn is_not_resource(&self) -> bool {
        self.not_resource
    }

    /// Add a fully qualified action (`service:Action`). Returns `false` if it was already
    /// present.
    pub fn add_action(&mut self, action: impl Into<String>) -> bool {
        self.actions.insert(action.into())
    }

    /// Add a resource ARN. Returns `false` if it was already present.
    pub fn add_resource(&mut self, arn: impl Into<String>) -> bool {
        self.resources.insert(arn.into())
    }

    /// Add values to the clause identified by `operator` and `key`.
    ///
    /// Values for an existing operator and key are merged into the existing set. The same
    /// key under a different operator forms an independent clause.
    pub fn add_condition(
        &mut self,
        key: impl Into<String>,
        values: impl IntoConditionValues,
        operator: impl Into<Operator>,
    ) {
        let key = key.into();
        let operator = operator.into();
        let values = values.into_condition_values();
        log::trace!("condition {} {} += {:?}", operator, key, values);

        self.conditions
            .entry(operator)
            .or_default()
            .entry(key)
            .or_default()
            .extend(values);
    }

    pub fn set_effect(&mut self, effect: Effect) {
        self.effect = effect;
    }

    pub fn set_sid(&mut self, sid: Option<String>) {
        self.sid = sid;
    }

    pub fn set_not_action(&mut self, not_action: bool) {
        self.not_action = not_action;
    }

    pub fn set_not_resource(&mut self, not_resource: bool) {
        self.not_resource = not_resource;
    }

    pub fn set_arn_defaults(&mut self, defaults: ArnDefaults) {
        self.arn_defaults = defaults;
    }

    /// Add an action and return the statement.
    pub fn to(mut self, action: impl Into<String>) -> Self {
        self.add_action(action);
        self
    }

    /// Add a resource ARN and return the statement.
    pub fn on(mut self, arn: impl Into<String>) -> Self {
        self.add_resource(arn);
        self
    }

    /// Add a condition clause and return the statement.
    ///
    /// Pass [`Operator::default()`] for the `StringLike` default.
    pub fn r#if(
        mut self,
        key: impl Into<String>,
        values: impl IntoConditionValues,
        operator: impl Into<Operator>,
    ) -> Self {
        self.add_condition(key, values, operator);
        self
    }

    pub fn allow(mut self) -> Self {
        self.effect = Effect::Allow;
        self
    }

    pub fn deny(mut self) -> Self {
        self.effect = Effect::Deny;
        self
    }

    /// Serialize the actions as `NotAction`.
    pub fn not_action(mut self) -> Self {
        self.not_action = true;
        self
    }

    /// Serialize the resources as `NotResource`.
    pub fn not_resource(mut self) -> Self {
        self.not_resource = true;
        self
    }

    pub fn with_arn_defaults(mut self, defaults: ArnDefaults) -> Self {
        self.arn_defaults = defaults;
        self
    }

    /// The statement as a JSON value.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// The statement as compact JSON text.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// The statement as pretty-printed JSON text.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A string set that serializes as a bare string when it has exactly one element.
struct OneOrMany<'a>(&'a IndexSet<String>);

impl Serialize for OneOrMany<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.len() {
            1 => serializer.serialize_str(&self.0[0]),
            len => {
                let mut seq = serializer.serialize_seq(Some(len))?;
                for item in self.0 {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

struct ConditionsRef<'a>(&'a ConditionBlock);

impl Serialize for ConditionsRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut operators = serializer.serialize_map(Some(self.0.len()))?;
        for (operator, clauses) in self.0 {
            operators.serialize_entry(operator, &ClausesRef(clauses))?;
        }
        operators.end()
    }
}

struct ClausesRef<'a>(&'a IndexMap<String, IndexSet<String>>);

impl Serialize for ClausesRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut clauses = serializer.serialize_map(Some(self.0.len()))?;
        for (key, values) in self.0 {
            clauses.serialize_entry(key, &OneOrMany(values))?;
        }
        clauses.end()
    }
}

impl Serialize for PolicyStatement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        if let Some(sid) = &self.sid {
            map.serialize_entry("Sid", sid)?;
        }
        map.serialize_entry("Effect", &self.effect)?;

        let action_key = if self.not_action { "NotAction" } else { "Action" };
        map.serialize_entry(action_key, &OneOrMany(&self.actions))?;

        let resource_key = if self.not_resource {
            "NotResource"
        } else {
            "Resource"
        };
        if self.resources.is_empty() {
            map.serialize_entry(resource_key, WILDCARD)?;
        } else {
            map.serialize_entry(resource_key, &OneOrMany(&self.resources))?;
        }

        if !self.conditions.is_empty() {
            map.serialize_entry("Condition", &ConditionsRef(&self.conditions))?;
        }

        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::OperatorKind;
    use serde_json::json;

    #[test]
    fn test_empty_statement_defaults_resource_to_wildcard() {
        let statement = PolicyStatement::new();
        assert_eq!(
            statement.to_value().unwrap(),
            json!({"Effect": "Allow", "Action": [], "Resource": "*"})
        );
    }

    #[test]
    fn test_actions_are_idempotent() {
        let statement = PolicyStatement::new()
            .to("svc:Action")
            .to("svc:Action")
            .to("svc:Action");
        assert_eq!(statement.actions().count(), 1);
        assert_eq!(
            statement.to_value().unwrap(),
            json!({"Effect": "Allow", "Action": "svc:Action", "Resource": "*"})
        );
    }

    #[test]
    fn test_multiple_entries_serialize_as_arrays_in_insertion_order() {
        let statement = PolicyStatement::new()
            .to("svc:B")
            .to("svc:A")
            .on("arn:aws:svc:::b")
            .on("arn:aws:svc:::a")
            .on("arn:aws:svc:::b");
        assert_eq!(
            statement.to_value().unwrap(),
            json!({
                "Effect": "Allow",
                "Action": ["svc:B", "svc:A"],
                "Resource": ["arn:aws:svc:::b", "arn:aws:svc:::a"]
            })
        );
    }

    #[test]
    fn test_condition_values_merge_under_same_operator_and_key() {
        let statement = PolicyStatement::new()
            .to("svc:Action")
            .r#if("aws:RequestTag/Env", "prod", OperatorKind::StringEquals)
            .r#if("aws:RequestTag/Env", "staging", OperatorKind::StringEquals)
            .r#if("aws:RequestTag/Env", "prod", OperatorKind::StringEquals);

        assert_eq!(
            statement.to_value().unwrap()["Condition"],
            json!({"StringEquals": {"aws:RequestTag/Env": ["prod", "staging"]}})
        );
    }

    #[test]
    fn test_distinct_operators_form_independent_clauses() {
        let statement = PolicyStatement::new()
            .r#if("aws:RequestTag/Env", "prod", OperatorKind::StringEquals)
            .r#if("aws:RequestTag/Env", "tmp-*", OperatorKind::StringNotLike);

        assert_eq!(
            statement.to_value().unwrap()["Condition"],
            json!({
                "StringEquals": {"aws:RequestTag/Env": "prod"},
                "StringNotLike": {"aws:RequestTag/Env": "tmp-*"}
            })
        );
    }

    #[test]
    fn test_sid_deny_and_negation() {
        let statement = PolicyStatement::with_sid("DenyAll")
            .deny()
            .not_action()
            .not_resource()
            .to("svc:Read")
            .on("arn:aws:svc:::x");
        assert_eq!(
            statement.to_value().unwrap(),
            json!({
                "Sid": "DenyAll",
                "Effect": "Deny",
                "NotAction": "svc:Read",
                "NotResource": "arn:aws:svc:::x"
            })
        );
    }

    #[test]
    fn test_serialization_is_repeatable_and_reflects_later_mutations() {
        let mut statement = PolicyStatement::new().to("svc:A");
        let first = statement.to_json().unwrap();
        assert_eq!(first, statement.to_json().unwrap());

        statement.add_action("svc:B");
        let second = statement.to_value().unwrap();
        assert_eq!(second["Action"], json!(["svc:A", "svc:B"]));
    }

    #[test]
    fn test_key_order_in_output() {
        let json = PolicyStatement::with_sid("S1")
            .to("svc:A")
            .r#if("svc:Key", "v", Operator::default())
            .to_json()
            .unwrap();
        assert_eq!(
            json,
            r#"{"Sid":"S1","Effect":"Allow","Action":"svc:A","Resource":"*","Condition":{"StringLike":{"svc:Key":"v"}}}"#
        );
    }
}
