//! Raw per-service records as they arrive from upstream.
//!
//! Two shapes are accepted:
//!
//! - the scraped record: camelCase keys, entries keyed by name in maps whose order is
//!   significant (`actionList`, `resourceTypes`, `conditions`)
//! - the AWS service reference record: PascalCase keys with entries in arrays
//!   (`Actions`, `Resources`, `ConditionKeys`)
//!
//! Both are lowered into [`RawServiceRecord`], which the normalizer validates.

use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::errors::{SchemaError, SchemaResult, SchemaViolation};

/// An action before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAction {
    pub name: String,
    pub description: String,
    pub url: String,
    /// Access level label as published or derived from annotations.
    pub access_level: String,
    pub resource_types: Vec<RawActionResource>,
    pub conditions: Vec<String>,
    pub dependent_actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawActionResource {
    pub name: String,
    pub required: bool,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResourceType {
    pub name: String,
    pub url: String,
    pub arn: Option<String>,
    pub condition_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConditionKey {
    pub key: String,
    pub description: String,
    pub url: String,
    pub value_type: Option<String>,
}

/// Format-independent raw record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawServiceRecord {
    pub name: String,
    pub prefix: String,
    pub url: String,
    pub actions: Vec<RawAction>,
    pub resource_types: Vec<RawResourceType>,
    pub condition_keys: Vec<RawConditionKey>,
}

impl RawServiceRecord {
    /// Parse a JSON document in either supported format.
    ///
    /// `label` identifies the document (usually its file stem) in errors raised before the
    /// service prefix is known.
    pub fn from_json(label: &str, text: &str) -> SchemaResult<Self> {
        let invalid = |e: serde_json::Error| {
            SchemaError::new(label, "$", SchemaViolation::InvalidJson(e.to_string()))
        };

        let probe: FormatProbe = serde_json::from_str(text).map_err(invalid)?;
        let record = if probe.action_list.is_some() || probe.service_prefix.is_some() {
            log::debug!("{label}: scraped record");
            serde_json::from_str::<ScrapedService>(text)
                .map_err(invalid)?
                .into_record(label)?
        } else if probe.actions.is_some() || probe.name.is_some() {
            log::debug!("{label}: service reference record");
            serde_json::from_str::<ReferenceService>(text)
                .map_err(invalid)?
                .into_record(label)?
        } else {
            return Err(SchemaError::new(label, "$", SchemaViolation::UnknownFormat));
        };

        Ok(record)
    }
}

#[derive(Deserialize)]
struct FormatProbe {
    #[serde(rename = "actionList")]
    action_list: Option<IgnoredAny>,
    #[serde(rename = "servicePrefix")]
    service_prefix: Option<IgnoredAny>,
    #[serde(rename = "Actions")]
    actions: Option<IgnoredAny>,
    #[serde(rename = "Name")]
    name: Option<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapedService {
    name: Option<String>,
    service_prefix: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    action_list: IndexMap<String, ScrapedAction>,
    #[serde(default)]
    resource_types: IndexMap<String, ScrapedResourceType>,
    #[serde(default)]
    conditions: IndexMap<String, ScrapedCondition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapedAction {
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    access_level: Option<String>,
    #[serde(default)]
    resource_types: IndexMap<String, ScrapedActionResource>,
    #[serde(default)]
    conditions: Vec<String>,
    #[serde(default)]
    dependent_actions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapedActionResource {
    #[serde(default)]
    required: bool,
    #[serde(default)]
    conditions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapedResourceType {
    name: Option<String>,
    #[serde(default)]
    url: String,
    arn: Option<String>,
    #[serde(default)]
    condition_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapedCondition {
    key: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(rename = "type")]
    value_type: Option<String>,
    #[serde(default)]
    url: String,
}

impl ScrapedService {
    fn into_record(self, label: &str) -> SchemaResult<RawServiceRecord> {
        let prefix = self.service_prefix.ok_or_else(|| {
            SchemaError::new(
                label,
                "servicePrefix",
                SchemaViolation::MissingField("servicePrefix"),
            )
        })?;
        let name = self.name.unwrap_or_else(|| prefix.clone());

        let actions = self
            .action_list
            .into_iter()
            .map(|(name, action)| -> SchemaResult<RawAction> {
                let access_level = action.access_level.ok_or_else(|| {
                    SchemaError::new(
                        &prefix,
                        format!("actionList.{name}.accessLevel"),
                        SchemaViolation::MissingField("accessLevel"),
                    )
                })?;
                Ok(RawAction {
                    description: action.description,
                    url: action.url,
                    access_level,
                    resource_types: action
                        .resource_types
                        .into_iter()
                        .map(|(name, resource)| RawActionResource {
                            name,
                            required: resource.required,
                            conditions: resource.conditions,
                        })
                        .collect(),
                    conditions: action.conditions,
                    dependent_actions: action.dependent_actions,
                    name,
                })
            })
            .collect::<SchemaResult<Vec<_>>>()?;

        let resource_types = self
            .resource_types
            .into_iter()
            .map(|(key, resource)| RawResourceType {
                name: resource.name.unwrap_or(key),
                url: resource.url,
                arn: resource.arn,
                condition_keys: resource.condition_keys,
            })
            .collect();

        let condition_keys = self
            .conditions
            .into_iter()
            .map(|(key, condition)| RawConditionKey {
                key: condition.key.unwrap_or(key),
                description: condition.description,
                url: condition.url,
                value_type: condition.value_type,
            })
            .collect();

        Ok(RawServiceRecord {
            name,
            prefix,
            url: self.url,
            actions,
            resource_types,
            condition_keys,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReferenceService {
    name: Option<String>,
    #[serde(default)]
    actions: Vec<ReferenceAction>,
    #[serde(default)]
    resources: Vec<ReferenceResource>,
    #[serde(default)]
    condition_keys: Vec<ReferenceConditionKey>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReferenceAction {
    name: String,
    #[serde(default)]
    action_condition_keys: Vec<String>,
    annotations: Option<ReferenceAnnotations>,
    #[serde(default)]
    resources: Vec<ReferenceActionResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReferenceAnnotations {
    #[serde(default)]
    properties: ReferenceProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReferenceProperties {
    #[serde(default)]
    is_list: bool,
    #[serde(default)]
    is_permission_management: bool,
    #[serde(default)]
    is_tagging_only: bool,
    #[serde(default)]
    is_write: bool,
}

impl ReferenceProperties {
    fn access_level(&self) -> &'static str {
        if self.is_permission_management {
            "Permissions management"
        } else if self.is_tagging_only {
            "Tagging"
        } else if self.is_write {
            "Write"
        } else if self.is_list {
            "List"
        } else {
            "Read"
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReferenceActionResource {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReferenceResource {
    name: String,
    #[serde(rename = "ARNFormats", default)]
    arn_formats: Vec<String>,
    #[serde(default)]
    condition_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReferenceConditionKey {
    name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl ReferenceService {
    fn into_record(self, label: &str) -> SchemaResult<RawServiceRecord> {
        let prefix = self
            .name
            .ok_or_else(|| SchemaError::new(label, "Name", SchemaViolation::MissingField("Name")))?;

        let actions = self
            .actions
            .into_iter()
            .map(|action| {
                let properties = action.annotations.map(|a| a.properties).unwrap_or_default();
                RawAction {
                    name: action.name,
                    access_level: properties.access_level().to_string(),
                    resource_types: action
                        .resources
                        .into_iter()
                        .map(|resource| RawActionResource {
                            name: resource.name,
                            required: false,
                            conditions: Vec::new(),
                        })
                        .collect(),
                    conditions: action.action_condition_keys,
                    ..RawAction::default()
                }
            })
            .collect();

        let resource_types = self
            .resources
            .into_iter()
            .map(|resource| RawResourceType {
                name: resource.name,
                arn: resource.arn_formats.into_iter().next(),
                condition_keys: resource.condition_keys,
                ..RawResourceType::default()
            })
            .collect();

        let condition_keys = self
            .condition_keys
            .into_iter()
            .map(|condition| RawConditionKey {
                key: condition.name,
                value_type: condition.types.into_iter().next(),
                ..RawConditionKey::default()
            })
            .collect();

        Ok(RawServiceRecord {
            name: prefix.clone(),
            prefix,
            url: String::new(),
            actions,
            resource_types,
            condition_keys,
        })
    }
}
