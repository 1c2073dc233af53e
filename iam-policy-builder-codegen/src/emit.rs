//! Rust source rendering for one service.
//!
//! The emitted module is self-contained apart from the runtime crate, which it reaches
//! through `iam_policy_builder_runtime`. Output depends only on the metadata and the
//! identifier plan, so rendering the same input twice yields the same bytes.

use std::fmt::Write;

use crate::arn::{ArnSegment, StandardPlaceholder};
use crate::errors::RenderError;
use crate::mangle::{ConditionPlan, IdentifierPlan, MemberPlan, ResourcePlan};
use crate::schema::{Action, ConditionKey, ConditionValueType, ResourceType, ServiceMetadata};

/// First line of every generated file.
pub const GENERATED_MARKER: &str = "// Code generated by iam-policy-builder. DO NOT EDIT.";

const INDENT: &str = "    ";

/// Render the complete module source for `service`.
///
/// `plan` must have been produced by [`plan_identifiers`](crate::mangle::plan_identifiers)
/// for the same metadata.
pub fn render_module(
    service: &ServiceMetadata,
    plan: &IdentifierPlan,
) -> Result<String, RenderError> {
    check_len("action", service.actions.len(), plan.actions.len())?;
    check_len(
        "resource type",
        service.resource_types.len(),
        plan.resources.len(),
    )?;
    check_len(
        "condition key",
        service.condition_keys.len(),
        plan.conditions.len(),
    )?;

    let mut writer = ModuleWriter {
        service,
        plan,
        out: String::new(),
    };
    writer.header()?;
    writer.struct_definition()?;
    writer.inherent_impl()?;
    writer.trait_impl()?;
    writer.conversions()?;

    log::debug!(
        "{}: rendered {} bytes for module `{}`",
        service.prefix,
        writer.out.len(),
        plan.module_name
    );
    Ok(writer.out)
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<(), RenderError> {
    if expected == found {
        Ok(())
    } else {
        Err(RenderError::PlanMismatch {
            what,
            expected,
            found,
        })
    }
}

/// Escape literal text for use inside a `format!` string.
fn escape_braces(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}

fn code_span(text: &str) -> String {
    format!("`{}`", text.replace('`', "'"))
}

struct ModuleWriter<'a> {
    service: &'a ServiceMetadata,
    plan: &'a IdentifierPlan,
    out: String,
}

impl ModuleWriter<'_> {
    /// Write `text` as `///` lines. Lines are trimmed so that nothing turns into an
    /// indented code block (and therefore a doctest). A bare `\r` is not allowed in a doc
    /// comment and counts as a line break.
    fn doc(&mut self, indent: &str, text: &str) -> std::fmt::Result {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        for line in text.lines() {
            let line = line.trim().replace("```", "'''");
            if line.is_empty() {
                writeln!(self.out, "{indent}///")?;
            } else {
                writeln!(self.out, "{indent}/// {line}")?;
            }
        }
        Ok(())
    }

    fn doc_sections(&mut self, indent: &str, sections: &[String]) -> std::fmt::Result {
        let text = sections
            .iter()
            .filter(|section| !section.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n");
        self.doc(indent, &text)
    }

    fn header(&mut self) -> std::fmt::Result {
        writeln!(self.out, "{GENERATED_MARKER}")?;
        writeln!(self.out, "// Source: service catalog `{}`.", self.service.prefix)?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "use iam_policy_builder_runtime::{{self as runtime, ServiceStatement as _}};"
        )?;
        writeln!(self.out)
    }

    fn struct_definition(&mut self) -> std::fmt::Result {
        let mut sections = vec![format!(
            "Statement provider for service {} ({}).",
            code_span(&self.service.prefix),
            self.service.name
        )];
        if !self.service.url.is_empty() {
            sections.push(format!("<{}>", self.service.url));
        }
        sections.push(
            "Generic builder methods come from [`ServiceStatement`](runtime::ServiceStatement)."
                .to_string(),
        );
        self.doc_sections("", &sections)?;

        writeln!(self.out, "#[derive(Clone, Debug, Default, PartialEq, Eq)]")?;
        writeln!(self.out, "pub struct {} {{", self.plan.type_name)?;
        writeln!(self.out, "{INDENT}statement: runtime::PolicyStatement,")?;
        writeln!(self.out, "}}")?;
        writeln!(self.out)
    }

    fn inherent_impl(&mut self) -> Result<(), RenderError> {
        writeln!(self.out, "impl {} {{", self.plan.type_name)?;
        writeln!(self.out, "{INDENT}/// Create an empty statement.")?;
        writeln!(self.out, "{INDENT}pub fn new() -> Self {{")?;
        writeln!(self.out, "{INDENT}{INDENT}Self::default()")?;
        writeln!(self.out, "{INDENT}}}")?;
        writeln!(self.out)?;
        writeln!(self.out, "{INDENT}/// Create an empty statement with a statement ID.")?;
        writeln!(
            self.out,
            "{INDENT}pub fn with_sid(sid: impl Into<String>) -> Self {{"
        )?;
        writeln!(self.out, "{INDENT}{INDENT}Self {{")?;
        writeln!(
            self.out,
            "{INDENT}{INDENT}{INDENT}statement: runtime::PolicyStatement::with_sid(sid),"
        )?;
        writeln!(self.out, "{INDENT}{INDENT}}}")?;
        writeln!(self.out, "{INDENT}}}")?;

        let service = self.service;
        let plan = self.plan;
        for (action, member) in service.actions.iter().zip(&plan.actions) {
            writeln!(self.out)?;
            self.action_method(action, member)?;
        }
        for (resource, resource_plan) in service.resource_types.iter().zip(&plan.resources) {
            writeln!(self.out)?;
            self.resource_method(resource, resource_plan)?;
        }
        for (condition, condition_plan) in service.condition_keys.iter().zip(&plan.conditions) {
            writeln!(self.out)?;
            self.condition_method(condition, condition_plan)?;
        }

        writeln!(self.out, "}}")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn condition_links(&self, member: &str, keys: &[String]) -> Result<String, RenderError> {
        let mut lines = Vec::with_capacity(keys.len());
        for key in keys {
            let method = self
                .plan
                .condition_method(self.service, key)
                .ok_or_else(|| RenderError::UnknownCondition {
                    member: member.to_string(),
                    key: key.clone(),
                })?;
            lines.push(format!("- [`{method}`](Self::{method})"));
        }
        Ok(lines.join("\n"))
    }

    fn action_method(&mut self, action: &Action, member: &MemberPlan) -> Result<(), RenderError> {
        let mut sections = vec![
            action.description.clone(),
            format!("Access level: {}", action.access_level),
        ];

        if !action.resource_types.is_empty() {
            let mut lines = vec!["Resource types:".to_string()];
            for resource in &action.resource_types {
                let suffix = if resource.required { " (required)" } else { "" };
                lines.push(format!("- {}{suffix}", code_span(&resource.name)));
            }
            sections.push(lines.join("\n"));
        }
        if !action.conditions.is_empty() {
            let links = self.condition_links(&action.name, &action.conditions)?;
            sections.push(format!("Possible conditions:\n{links}"));
        }
        if !action.dependent_actions.is_empty() {
            let mut lines = vec!["Dependent actions:".to_string()];
            lines.extend(
                action
                    .dependent_actions
                    .iter()
                    .map(|dependent| format!("- {}", code_span(dependent))),
            );
            sections.push(lines.join("\n"));
        }
        if !action.url.is_empty() {
            sections.push(format!("<{}>", action.url));
        }

        self.doc_sections(INDENT, &sections)?;
        writeln!(self.out, "{INDENT}pub fn {}(self) -> Self {{", member.method)?;
        writeln!(self.out, "{INDENT}{INDENT}self.to({:?})", member.literal)?;
        writeln!(self.out, "{INDENT}}}")?;
        Ok(())
    }

    fn resource_method(
        &mut self,
        resource: &ResourceType,
        plan: &ResourcePlan,
    ) -> Result<(), RenderError> {
        let mut sections = vec![
            format!("Adds a resource of type {}.", code_span(&resource.name)),
            format!("ARN template: {}", code_span(resource.arn.raw())),
        ];
        if !resource.condition_keys.is_empty() {
            let links = self.condition_links(&resource.name, &resource.condition_keys)?;
            sections.push(format!("Possible conditions:\n{links}"));
        }
        if !plan.standard.is_empty() {
            let names: Vec<String> = plan
                .standard
                .iter()
                .map(|standard| code_span(standard.parameter()))
                .collect();
            sections.push(format!(
                "Omitted {} fall back to the statement's ARN defaults.",
                names.join(", ")
            ));
        }
        if !resource.url.is_empty() {
            sections.push(format!("<{}>", resource.url));
        }
        self.doc_sections(INDENT, &sections)?;

        let mut arguments: Vec<String> = vec!["self".to_string()];
        arguments.extend(plan.parameters.iter().map(|(_, ident)| format!("{ident}: &str")));
        arguments.extend(
            plan.standard
                .iter()
                .map(|standard| format!("{}: Option<&str>", standard.parameter())),
        );
        self.signature(&plan.member.method, &arguments)?;

        let body = INDENT.repeat(2);
        if !resource.arn.has_placeholders() {
            writeln!(self.out, "{body}self.on({:?})", resource.arn.raw())?;
        } else if plan.standard.is_empty() {
            let format = arn_format(resource, plan)?;
            writeln!(self.out, "{body}self.on(format!({format:?}))")?;
        } else {
            let format = arn_format(resource, plan)?;
            writeln!(
                self.out,
                "{body}let defaults = self.statement.arn_defaults();"
            )?;
            writeln!(self.out, "{body}let arn = format!(")?;
            writeln!(self.out, "{body}{INDENT}{format:?},")?;
            for standard in &plan.standard {
                let name = standard.parameter();
                writeln!(
                    self.out,
                    "{body}{INDENT}{name} = {name}.unwrap_or(defaults.{name}()),"
                )?;
            }
            writeln!(self.out, "{body});")?;
            writeln!(self.out, "{body}self.on(arn)")?;
        }
        writeln!(self.out, "{INDENT}}}")?;
        Ok(())
    }

    fn condition_method(
        &mut self,
        condition: &ConditionKey,
        plan: &ConditionPlan,
    ) -> Result<(), RenderError> {
        let mut sections = vec![condition.description.clone()];
        if !condition.related_actions.is_empty() {
            let mut lines = vec!["Applies to actions:".to_string()];
            for name in &condition.related_actions {
                lines.push(format!("- {}", self.member_link(name, LinkTarget::Action)));
            }
            sections.push(lines.join("\n"));
        }
        if !condition.related_resource_types.is_empty() {
            let mut lines = vec!["Applies to resource types:".to_string()];
            for name in &condition.related_resource_types {
                lines.push(format!("- {}", self.member_link(name, LinkTarget::Resource)));
            }
            sections.push(lines.join("\n"));
        }
        let operator = condition.default_operator();
        sections.push(format!(
            "Condition key {}. Default operator: `{}` ([{} operators]({})).",
            code_span(condition.key.raw()),
            operator.as_str(),
            value_type_label(condition.value_type),
            condition.value_type.operator_docs()
        ));
        if condition.value_type == ConditionValueType::Bool {
            sections.push("A `None` value tests for `true`.".to_string());
        }
        if !condition.url.is_empty() {
            sections.push(format!("<{}>", condition.url));
        }
        self.doc_sections(INDENT, &sections)?;

        let mut arguments: Vec<String> = vec!["self".to_string()];
        if let Some(parameter) = &plan.parameter {
            arguments.push(format!("{parameter}: &str"));
        }
        arguments.push(match condition.value_type {
            ConditionValueType::Bool => "value: Option<bool>".to_string(),
            _ => "value: impl runtime::IntoConditionValues".to_string(),
        });
        arguments.push("operator: Option<runtime::Operator>".to_string());
        self.signature(&plan.member.method, &arguments)?;

        let key = match &plan.parameter {
            Some(parameter) => format!(
                "format!({:?})",
                format!("{}{{{parameter}}}", escape_braces(&plan.member.literal))
            ),
            None => format!("{:?}", plan.member.literal),
        };
        let body = INDENT.repeat(2);
        writeln!(self.out, "{body}self.r#if(")?;
        writeln!(self.out, "{body}{INDENT}{key},")?;
        if condition.value_type == ConditionValueType::Bool {
            writeln!(self.out, "{body}{INDENT}value.unwrap_or(true),")?;
        } else {
            writeln!(self.out, "{body}{INDENT}value,")?;
        }
        writeln!(
            self.out,
            "{body}{INDENT}operator.unwrap_or(runtime::Operator::new(runtime::OperatorKind::{})),",
            operator.as_str()
        )?;
        writeln!(self.out, "{body})")?;
        writeln!(self.out, "{INDENT}}}")?;
        Ok(())
    }

    /// Intra-doc link to the accessor for a named action or resource type, or the plain
    /// name when the service does not declare it.
    fn member_link(&self, name: &str, target: LinkTarget) -> String {
        let method = match target {
            LinkTarget::Action => self
                .service
                .actions
                .iter()
                .position(|action| action.name == name)
                .and_then(|index| self.plan.actions.get(index)),
            LinkTarget::Resource => self
                .service
                .resource_types
                .iter()
                .position(|resource| resource.name == name)
                .and_then(|index| self.plan.resources.get(index))
                .map(|resource| &resource.member),
        };
        method.map_or_else(
            || code_span(name),
            |member| format!("[`{}`](Self::{})", member.method, member.method),
        )
    }

    fn signature(&mut self, method: &str, arguments: &[String]) -> std::fmt::Result {
        let single_line = format!("{INDENT}pub fn {method}({}) -> Self {{", arguments.join(", "));
        if single_line.len() <= 100 {
            return writeln!(self.out, "{single_line}");
        }
        writeln!(self.out, "{INDENT}pub fn {method}(")?;
        for argument in arguments {
            writeln!(self.out, "{INDENT}{INDENT}{argument},")?;
        }
        writeln!(self.out, "{INDENT}) -> Self {{")
    }

    fn trait_impl(&mut self) -> std::fmt::Result {
        let service = self.service;
        writeln!(
            self.out,
            "impl runtime::ServiceStatement for {} {{",
            self.plan.type_name
        )?;
        writeln!(
            self.out,
            "{INDENT}const SERVICE_PREFIX: &'static str = {:?};",
            service.prefix
        )?;
        writeln!(self.out)?;

        writeln!(
            self.out,
            "{INDENT}const ACTION_LIST: &'static [runtime::ActionInfo] = &["
        )?;
        for action in &service.actions {
            self.action_info(action)?;
        }
        writeln!(self.out, "{INDENT}];")?;
        writeln!(self.out)?;

        writeln!(
            self.out,
            "{INDENT}const RESOURCE_TYPES: &'static [runtime::ResourceTypeInfo] = &["
        )?;
        for resource in &service.resource_types {
            let body = INDENT.repeat(3);
            writeln!(self.out, "{INDENT}{INDENT}runtime::ResourceTypeInfo {{")?;
            writeln!(self.out, "{body}name: {:?},", resource.name)?;
            writeln!(self.out, "{body}url: {:?},", resource.url)?;
            writeln!(self.out, "{body}arn: {:?},", resource.arn.raw())?;
            writeln!(
                self.out,
                "{body}condition_keys: {},",
                str_slice(&resource.condition_keys)
            )?;
            writeln!(self.out, "{INDENT}{INDENT}}},")?;
        }
        writeln!(self.out, "{INDENT}];")?;
        writeln!(self.out)?;

        writeln!(
            self.out,
            "{INDENT}const ACCESS_LEVEL_LIST: &'static [(runtime::AccessLevel, &'static [&'static str])] = &["
        )?;
        for (level, names) in service.access_levels() {
            writeln!(
                self.out,
                "{INDENT}{INDENT}(runtime::AccessLevel::{level:?}, {}),",
                str_slice(&names)
            )?;
        }
        writeln!(self.out, "{INDENT}];")?;
        writeln!(self.out)?;

        writeln!(
            self.out,
            "{INDENT}fn statement(&self) -> &runtime::PolicyStatement {{"
        )?;
        writeln!(self.out, "{INDENT}{INDENT}&self.statement")?;
        writeln!(self.out, "{INDENT}}}")?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{INDENT}fn statement_mut(&mut self) -> &mut runtime::PolicyStatement {{"
        )?;
        writeln!(self.out, "{INDENT}{INDENT}&mut self.statement")?;
        writeln!(self.out, "{INDENT}}}")?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{INDENT}fn into_statement(self) -> runtime::PolicyStatement {{"
        )?;
        writeln!(self.out, "{INDENT}{INDENT}self.statement")?;
        writeln!(self.out, "{INDENT}}}")?;
        writeln!(self.out, "}}")?;
        writeln!(self.out)
    }

    fn action_info(&mut self, action: &Action) -> std::fmt::Result {
        let body = INDENT.repeat(3);
        writeln!(self.out, "{INDENT}{INDENT}runtime::ActionInfo {{")?;
        writeln!(self.out, "{body}name: {:?},", action.name)?;
        writeln!(self.out, "{body}description: {:?},", action.description)?;
        writeln!(self.out, "{body}url: {:?},", action.url)?;
        writeln!(
            self.out,
            "{body}access_level: runtime::AccessLevel::{:?},",
            action.access_level
        )?;
        if action.resource_types.is_empty() {
            writeln!(self.out, "{body}resource_types: &[],")?;
        } else {
            writeln!(self.out, "{body}resource_types: &[")?;
            for resource in &action.resource_types {
                writeln!(
                    self.out,
                    "{body}{INDENT}runtime::ResourceTypeRef {{ name: {:?}, required: {} }},",
                    resource.name, resource.required
                )?;
            }
            writeln!(self.out, "{body}],")?;
        }
        writeln!(self.out, "{body}conditions: {},", str_slice(&action.conditions))?;
        writeln!(
            self.out,
            "{body}dependent_actions: {},",
            str_slice(&action.dependent_actions)
        )?;
        writeln!(self.out, "{INDENT}{INDENT}}},")
    }

    fn conversions(&mut self) -> std::fmt::Result {
        let type_name = &self.plan.type_name;
        writeln!(
            self.out,
            "impl runtime::serde::Serialize for {type_name} {{"
        )?;
        writeln!(
            self.out,
            "{INDENT}fn serialize<S: runtime::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {{"
        )?;
        writeln!(
            self.out,
            "{INDENT}{INDENT}runtime::serde::Serialize::serialize(&self.statement, serializer)"
        )?;
        writeln!(self.out, "{INDENT}}}")?;
        writeln!(self.out, "}}")?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "impl From<{type_name}> for runtime::PolicyStatement {{"
        )?;
        writeln!(
            self.out,
            "{INDENT}fn from(value: {type_name}) -> Self {{"
        )?;
        writeln!(self.out, "{INDENT}{INDENT}value.statement")?;
        writeln!(self.out, "{INDENT}}}")?;
        writeln!(self.out, "}}")
    }
}

#[derive(Clone, Copy)]
enum LinkTarget {
    Action,
    Resource,
}

/// `format!` string for a resource accessor: literal text escaped, placeholders replaced
/// by the argument that carries them.
fn arn_format(resource: &ResourceType, plan: &ResourcePlan) -> Result<String, RenderError> {
    let mut format = String::with_capacity(resource.arn.raw().len());
    for segment in resource.arn.segments() {
        match segment {
            ArnSegment::Literal(text) => format.push_str(&escape_braces(text)),
            ArnSegment::Placeholder(name) => {
                let ident = match StandardPlaceholder::from_name(name) {
                    Some(standard) => standard.parameter(),
                    None => plan
                        .parameters
                        .iter()
                        .find(|(placeholder, _)| placeholder == name)
                        .map(|(_, ident)| ident.as_str())
                        .ok_or_else(|| RenderError::MissingParameter {
                            resource: resource.name.clone(),
                            placeholder: name.clone(),
                        })?,
                };
                write!(format, "{{{ident}}}")?;
            }
        }
    }
    Ok(format)
}

fn str_slice<S: AsRef<str>>(items: &[S]) -> String {
    let literals: Vec<String> = items
        .iter()
        .map(|item| format!("{:?}", item.as_ref()))
        .collect();
    format!("&[{}]", literals.join(", "))
}

const fn value_type_label(value_type: ConditionValueType) -> &'static str {
    match value_type {
        ConditionValueType::String => "string",
        ConditionValueType::Arn => "ARN",
        ConditionValueType::Numeric => "numeric",
        ConditionValueType::Date => "date",
        ConditionValueType::Bool => "boolean",
        ConditionValueType::IpAddress => "IP address",
        ConditionValueType::Binary => "binary",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mangle::plan_identifiers;
    use crate::normalize::normalize_json;

    const WIDGETS: &str = r#"{
        "name": "widgets",
        "servicePrefix": "widgets",
        "url": "https://example.com/widgets",
        "actionList": {
            "MakeWidget": {
                "url": "https://example.com/widgets#MakeWidget",
                "description": "Grants permission to make a widget",
                "accessLevel": "Write",
                "resourceTypes": {"Widget": {"required": true}},
                "conditions": ["aws:RequestTag/${TagKey}", "widgets:Sealed"],
                "dependentActions": ["widgets:TagWidget"]
            },
            "ListWidgets": {"description": "Grants permission to list widgets", "accessLevel": "List"}
        },
        "resourceTypes": {
            "Widget": {"name": "Widget", "arn": "arn:${Partition}:widgets:${Region}:${Account}:widget/${Id}"},
            "Catalog": {"name": "Catalog", "arn": "arn:aws:widgets:::catalog"},
            "Shelf": {"name": "Shelf", "arn": "shelf/{${ShelfName}}"}
        },
        "conditions": {
            "aws:RequestTag/${TagKey}": {"key": "aws:RequestTag/${TagKey}", "description": "Filters by request tag", "type": "String"},
            "widgets:Sealed": {"key": "widgets:Sealed", "description": "Filters by seal state", "type": "Bool"}
        }
    }"#;

    fn render(json: &str) -> String {
        let service = normalize_json("widgets", json).unwrap();
        let plan = plan_identifiers(&service);
        render_module(&service, &plan).unwrap()
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render(WIDGETS), render(WIDGETS));
    }

    #[test]
    fn test_header_and_type() {
        let source = render(WIDGETS);
        assert!(source.starts_with(GENERATED_MARKER));
        assert!(source.contains("pub struct Widgets {"));
        assert!(source.contains("impl runtime::ServiceStatement for Widgets {"));
        assert!(source.contains("const SERVICE_PREFIX: &'static str = \"widgets\";"));
        assert!(source.contains("impl From<Widgets> for runtime::PolicyStatement {"));
    }

    #[test]
    fn test_action_method_and_docs() {
        let source = render(WIDGETS);
        assert!(source.contains(
            "    pub fn to_make_widget(self) -> Self {\n        self.to(\"widgets:MakeWidget\")\n    }"
        ));
        assert!(source.contains("    /// Access level: Write\n"));
        assert!(source.contains("    /// - [`if_aws_request_tag`](Self::if_aws_request_tag)\n"));
        assert!(source.contains("    /// - `widgets:TagWidget`\n"));
        assert!(source.contains("    /// <https://example.com/widgets#MakeWidget>\n"));
    }

    #[test]
    fn test_actions_keep_input_order() {
        let source = render(WIDGETS);
        let make = source.find("fn to_make_widget").unwrap();
        let list = source.find("fn to_list_widgets").unwrap();
        assert!(make < list);
    }

    #[test]
    fn test_resource_method_with_standard_placeholders() {
        let source = render(WIDGETS);
        let expected = "    pub fn on_widget(
        self,
        id: &str,
        account: Option<&str>,
        region: Option<&str>,
        partition: Option<&str>,
    ) -> Self {
        let defaults = self.statement.arn_defaults();
        let arn = format!(
            \"arn:{partition}:widgets:{region}:{account}:widget/{id}\",
            account = account.unwrap_or(defaults.account()),
            region = region.unwrap_or(defaults.region()),
            partition = partition.unwrap_or(defaults.partition()),
        );
        self.on(arn)
    }";
        assert!(source.contains(expected), "{source}");
    }

    #[test]
    fn test_resource_method_without_placeholders() {
        let source = render(WIDGETS);
        assert!(source.contains(
            "    pub fn on_catalog(self) -> Self {\n        self.on(\"arn:aws:widgets:::catalog\")\n    }"
        ));
    }

    #[test]
    fn test_resource_literal_braces_are_escaped() {
        let source = render(WIDGETS);
        assert!(source.contains("    pub fn on_shelf(self, shelf_name: &str) -> Self {\n"));
        assert!(source.contains("self.on(format!(\"shelf/{{{shelf_name}}}\"))"));
    }

    #[test]
    fn test_condition_methods() {
        let source = render(WIDGETS);
        let expected = "    pub fn if_aws_request_tag(
        self,
        tag_key: &str,
        value: impl runtime::IntoConditionValues,
        operator: Option<runtime::Operator>,
    ) -> Self {
        self.r#if(
            format!(\"aws:RequestTag/{tag_key}\"),
            value,
            operator.unwrap_or(runtime::Operator::new(runtime::OperatorKind::StringLike)),
        )
    }";
        assert!(source.contains(expected), "{source}");
        assert!(source.contains(
            "    pub fn if_sealed(self, value: Option<bool>, operator: Option<runtime::Operator>) -> Self {\n"
        ));
        assert!(source.contains("            value.unwrap_or(true),\n"));
        assert!(source.contains("    /// A `None` value tests for `true`.\n"));
        assert!(source.contains("runtime::Operator::new(runtime::OperatorKind::Bool)"));
        assert!(source.contains("            \"widgets:Sealed\",\n"));
    }

    #[test]
    fn test_lookup_tables() {
        let source = render(WIDGETS);
        assert!(source.contains("runtime::ResourceTypeRef { name: \"Widget\", required: true },"));
        assert!(source.contains(
            "conditions: &[\"aws:RequestTag/${TagKey}\", \"widgets:Sealed\"],"
        ));
        assert!(source.contains("(runtime::AccessLevel::Write, &[\"MakeWidget\"]),"));
        assert!(source.contains("(runtime::AccessLevel::List, &[\"ListWidgets\"]),"));
        assert!(source.contains(
            "arn: \"arn:${Partition}:widgets:${Region}:${Account}:widget/${Id}\","
        ));
    }

    #[test]
    fn test_carriage_returns_in_docs_become_line_breaks() {
        let json = WIDGETS.replace(
            "Grants permission to list widgets",
            "line one\\rline two\\r\\nline three",
        );
        let source = render(&json);
        assert!(!source.contains('\r'));
        assert!(source.contains("    /// line one\n    /// line two\n    /// line three\n"));
    }

    #[test]
    fn test_docs_cannot_open_code_blocks() {
        let json = WIDGETS.replace(
            "Grants permission to list widgets",
            "Lists widgets\\n    indented\\n```rust\\nlet x = 1;\\n```",
        );
        let source = render(&json);
        assert!(source.contains("    /// indented\n"));
        assert!(source
            .lines()
            .filter(|line| line.trim_start().starts_with("///"))
            .all(|line| !line.contains("```")));
    }

    #[test]
    fn test_plan_mismatch_is_reported() {
        let service = normalize_json("widgets", WIDGETS).unwrap();
        let mut plan = plan_identifiers(&service);
        plan.actions.pop();
        let err = render_module(&service, &plan).unwrap_err();
        assert!(matches!(
            err,
            RenderError::PlanMismatch {
                what: "action",
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_missing_parameter_is_reported() {
        let service = normalize_json("widgets", WIDGETS).unwrap();
        let mut plan = plan_identifiers(&service);
        plan.resources[0].parameters.clear();
        let err = render_module(&service, &plan).unwrap_err();
        assert_eq!(
            err.to_string(),
            "resource `Widget` has no parameter for placeholder `Id`"
        );
    }
}
