//! Validation of raw records into [`ServiceMetadata`].
//!
//! Normalization is all-or-nothing: the first violation aborts the service with a
//! [`SchemaError`] naming the entry and field.

use std::collections::{HashMap, HashSet};

use iam_policy_builder_runtime::AccessLevel;

use crate::arn::ArnTemplate;
use crate::errors::{SchemaError, SchemaResult, SchemaViolation};
use crate::raw::{RawAction, RawResourceType, RawServiceRecord};
use crate::schema::{
    Action, ActionResourceType, ConditionKey, ConditionKeyTemplate, ConditionValueType,
    ResourceType, ServiceMetadata,
};

/// Parse and normalize one JSON document.
pub fn normalize_json(label: &str, text: &str) -> SchemaResult<ServiceMetadata> {
    let record = RawServiceRecord::from_json(label, text)?;
    normalize(record)
}

/// Validate a raw record and convert it into the canonical schema.
pub fn normalize(record: RawServiceRecord) -> SchemaResult<ServiceMetadata> {
    let prefix = record.prefix.trim().to_string();
    if prefix.is_empty() {
        return Err(SchemaError::new(
            &record.name,
            "servicePrefix",
            SchemaViolation::EmptyName,
        ));
    }

    let mut normalizer = Normalizer {
        prefix,
        condition_index: HashMap::new(),
        condition_keys: Vec::new(),
    };

    normalizer.add_condition_keys(&record)?;
    let resource_types = normalizer.add_resource_types(record.resource_types)?;
    let actions = normalizer.add_actions(record.actions, &resource_types)?;

    let name = if record.name.trim().is_empty() {
        normalizer.prefix.clone()
    } else {
        record.name.trim().to_string()
    };

    log::debug!(
        "{}: normalized {} actions, {} resource types, {} condition keys",
        normalizer.prefix,
        actions.len(),
        resource_types.len(),
        normalizer.condition_keys.len()
    );

    Ok(ServiceMetadata {
        name,
        prefix: normalizer.prefix,
        url: record.url,
        actions,
        resource_types,
        condition_keys: normalizer.condition_keys,
    })
}

struct Normalizer {
    prefix: String,
    condition_index: HashMap<String, usize>,
    condition_keys: Vec<ConditionKey>,
}

impl Normalizer {
    fn error(&self, location: impl Into<String>, kind: SchemaViolation) -> SchemaError {
        SchemaError::new(&self.prefix, location, kind)
    }

    /// Keys published without a prefix belong to the service itself.
    fn qualify(&self, key: &str) -> String {
        let key = key.trim();
        if key.contains(':') {
            key.to_string()
        } else {
            format!("{}:{}", self.prefix, key)
        }
    }

    fn add_condition_keys(&mut self, record: &RawServiceRecord) -> SchemaResult<()> {
        for raw in &record.condition_keys {
            let qualified = self.qualify(&raw.key);
            let location = format!("conditions.{qualified}");

            if self.condition_index.contains_key(&qualified) {
                return Err(self.error(
                    location,
                    SchemaViolation::DuplicateConditionKey(qualified),
                ));
            }

            let key = ConditionKeyTemplate::parse(&qualified).ok_or_else(|| {
                self.error(
                    location.clone(),
                    SchemaViolation::MalformedConditionKey(qualified.clone()),
                )
            })?;

            let label = raw.value_type.as_deref().unwrap_or_default();
            let value_type = ConditionValueType::from_label(label).ok_or_else(|| {
                self.error(
                    format!("{location}.type"),
                    SchemaViolation::UnknownConditionType(label.to_string()),
                )
            })?;

            self.condition_index
                .insert(qualified, self.condition_keys.len());
            self.condition_keys.push(ConditionKey {
                key,
                description: raw.description.trim().to_string(),
                url: raw.url.trim().to_string(),
                value_type,
                related_actions: Vec::new(),
                related_resource_types: Vec::new(),
            });
        }
        Ok(())
    }

    /// Resolve condition key references, de-duplicated in order of first mention.
    fn resolve_conditions<'a>(
        &self,
        location: &str,
        keys: impl IntoIterator<Item = &'a String>,
    ) -> SchemaResult<Vec<usize>> {
        let mut resolved = Vec::new();
        for key in keys {
            let qualified = self.qualify(key);
            let index = *self.condition_index.get(&qualified).ok_or_else(|| {
                self.error(location, SchemaViolation::UndeclaredConditionKey(qualified))
            })?;
            if !resolved.contains(&index) {
                resolved.push(index);
            }
        }
        Ok(resolved)
    }

    fn condition_names(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .map(|index| self.condition_keys[*index].key.raw().to_string())
            .collect()
    }

    fn add_resource_types(
        &mut self,
        raw: Vec<RawResourceType>,
    ) -> SchemaResult<Vec<ResourceType>> {
        let mut seen = HashSet::new();
        let mut resource_types = Vec::with_capacity(raw.len());

        for resource in raw {
            let name = resource.name.trim().to_string();
            if name.is_empty() {
                return Err(self.error("resourceTypes", SchemaViolation::EmptyName));
            }
            let location = format!("resourceTypes.{name}");
            if !seen.insert(name.clone()) {
                return Err(self.error(location, SchemaViolation::DuplicateResourceType(name)));
            }

            let template = resource
                .arn
                .as_deref()
                .map(str::trim)
                .filter(|arn| !arn.is_empty())
                .ok_or_else(|| {
                    self.error(format!("{location}.arn"), SchemaViolation::MissingField("arn"))
                })?;
            let arn = ArnTemplate::parse(template).map_err(|reason| {
                self.error(
                    format!("{location}.arn"),
                    SchemaViolation::MalformedArn {
                        template: template.to_string(),
                        reason,
                    },
                )
            })?;

            let conditions = self.resolve_conditions(
                &format!("{location}.conditionKeys"),
                &resource.condition_keys,
            )?;
            for index in &conditions {
                self.condition_keys[*index]
                    .related_resource_types
                    .push(name.clone());
            }

            resource_types.push(ResourceType {
                condition_keys: self.condition_names(&conditions),
                name,
                url: resource.url.trim().to_string(),
                arn,
            });
        }

        Ok(resource_types)
    }

    fn add_actions(
        &mut self,
        raw: Vec<RawAction>,
        resource_types: &[ResourceType],
    ) -> SchemaResult<Vec<Action>> {
        let mut seen = HashSet::new();
        let mut actions = Vec::with_capacity(raw.len());

        for action in raw {
            let name = action.name.trim().to_string();
            if name.is_empty() {
                return Err(self.error("actions", SchemaViolation::EmptyName));
            }
            let location = format!("actions.{name}");
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(self.error(location, SchemaViolation::DuplicateAction(name)));
            }

            let access_level = AccessLevel::from_label(&action.access_level).ok_or_else(|| {
                self.error(
                    format!("{location}.accessLevel"),
                    SchemaViolation::UnknownAccessLevel(action.access_level.clone()),
                )
            })?;

            let mut action_resources: Vec<ActionResourceType> = Vec::new();
            for resource in &action.resource_types {
                let resource_name = resource.name.trim();
                if !resource_types.iter().any(|r| r.name == resource_name) {
                    return Err(self.error(
                        format!("{location}.resourceTypes"),
                        SchemaViolation::DanglingResourceType(resource_name.to_string()),
                    ));
                }
                match action_resources.iter_mut().find(|r| r.name == resource_name) {
                    Some(existing) => existing.required |= resource.required,
                    None => action_resources.push(ActionResourceType {
                        name: resource_name.to_string(),
                        required: resource.required,
                    }),
                }
            }

            let referenced = action.conditions.iter().chain(
                action
                    .resource_types
                    .iter()
                    .flat_map(|resource| resource.conditions.iter()),
            );
            let conditions =
                self.resolve_conditions(&format!("{location}.conditions"), referenced)?;
            for index in &conditions {
                let related = &mut self.condition_keys[*index].related_actions;
                if !related.contains(&name) {
                    related.push(name.clone());
                }
            }

            actions.push(Action {
                conditions: self.condition_names(&conditions),
                name,
                description: action.description.trim().to_string(),
                url: action.url.trim().to_string(),
                access_level,
                resource_types: action_resources,
                dependent_actions: action
                    .dependent_actions
                    .iter()
                    .map(|dependent| dependent.trim().to_string())
                    .collect(),
            });
        }

        Ok(actions)
    }
}
