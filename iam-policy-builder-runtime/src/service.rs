//! The contract every generated service module implements.

use crate::access_level::AccessLevel;
use crate::arn::ArnDefaults;
use crate::operator::Operator;
use crate::statement::PolicyStatement;
use crate::values::IntoConditionValues;

/// A resource type an action can be scoped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceTypeRef {
    pub name: &'static str,
    pub required: bool,
}

/// Static description of one action of a service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub access_level: AccessLevel,
    pub resource_types: &'static [ResourceTypeRef],
    pub conditions: &'static [&'static str],
    pub dependent_actions: &'static [&'static str],
}

/// Static description of one resource type of a service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceTypeInfo {
    pub name: &'static str,
    pub url: &'static str,
    pub arn: &'static str,
    pub condition_keys: &'static [&'static str],
}

/// Implemented by each generated service statement type.
///
/// The associated constants are the service's lookup tables. The provided methods forward
/// to the wrapped [`PolicyStatement`] so that service-specific accessors and the generic
/// primitives can be chained freely.
pub trait ServiceStatement: Sized {
    /// Prefix used in qualified action names (`s3`, `ec2`, ...).
    const SERVICE_PREFIX: &'static str;
    /// Every action of the service, in catalog order.
    const ACTION_LIST: &'static [ActionInfo];
    /// Every resource type of the service, in catalog order.
    const RESOURCE_TYPES: &'static [ResourceTypeInfo];
    /// Action names grouped by access level. Levels with no actions are omitted.
    const ACCESS_LEVEL_LIST: &'static [(AccessLevel, &'static [&'static str])];

    fn statement(&self) -> &PolicyStatement;

    fn statement_mut(&mut self) -> &mut PolicyStatement;

    fn into_statement(self) -> PolicyStatement;

    /// Add a fully qualified action.
    fn to(mut self, action: impl Into<String>) -> Self {
        self.statement_mut().add_action(action);
        self
    }

    /// Add a resource ARN.
    fn on(mut self, arn: impl Into<String>) -> Self {
        self.statement_mut().add_resource(arn);
        self
    }

    /// Add a condition clause. A key without a `:` is qualified with the service prefix.
    fn r#if(
        mut self,
        key: impl Into<String>,
        values: impl IntoConditionValues,
        operator: impl Into<Operator>,
    ) -> Self {
        let key = key.into();
        let key = if key.contains(':') {
            key
        } else {
            format!("{}:{key}", Self::SERVICE_PREFIX)
        };
        self.statement_mut().add_condition(key, values, operator);
        self
    }

    fn allow(mut self) -> Self {
        self.statement_mut().set_effect(crate::Effect::Allow);
        self
    }

    fn deny(mut self) -> Self {
        self.statement_mut().set_effect(crate::Effect::Deny);
        self
    }

    fn not_action(mut self) -> Self {
        self.statement_mut().set_not_action(true);
        self
    }

    fn not_resource(mut self) -> Self {
        self.statement_mut().set_not_resource(true);
        self
    }

    /// Override the values used for omitted `partition`/`region`/`account` arguments.
    fn with_arn_defaults(mut self, defaults: ArnDefaults) -> Self {
        self.statement_mut().set_arn_defaults(defaults);
        self
    }

    /// Add `<prefix>:*`.
    fn all_actions(self) -> Self {
        let action = format!("{}:*", Self::SERVICE_PREFIX);
        self.to(action)
    }

    /// Add every action of the given access level.
    fn all_actions_with_access_level(mut self, level: AccessLevel) -> Self {
        let names = Self::ACCESS_LEVEL_LIST
            .iter()
            .filter(|(candidate, _)| *candidate == level)
            .flat_map(|(_, names)| names.iter());
        for name in names {
            self.statement_mut()
                .add_action(format!("{}:{}", Self::SERVICE_PREFIX, name));
        }
        self
    }

    /// Look up an action by name, case-insensitively.
    fn action_info(name: &str) -> Option<&'static ActionInfo> {
        Self::ACTION_LIST
            .iter()
            .find(|action| action.name.eq_ignore_ascii_case(name))
    }

    /// Look up a resource type by exact name.
    fn resource_type_info(name: &str) -> Option<&'static ResourceTypeInfo> {
        Self::RESOURCE_TYPES
            .iter()
            .find(|resource| resource.name == name)
    }

    fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        self.statement().to_value()
    }

    fn to_json(&self) -> serde_json::Result<String> {
        self.statement().to_json()
    }

    fn to_json_pretty(&self) -> serde_json::Result<String> {
        self.statement().to_json_pretty()
    }
}
