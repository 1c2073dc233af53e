//! Behaviour of the statement providers generated from the bundled catalogs.

use chrono::{TimeZone, Utc};
use iam_policy_builder_services::{
    AccessLevel, ArnDefaults, GlobalConditions, Groundstation, Operator, OperatorKind,
    PolicyStatement, ServiceStatement, Widgets, S3,
};
use rstest::rstest;
use serde_json::json;

#[test]
fn test_make_widget_scenario() {
    let statement = Widgets::new()
        .to_make_widget()
        .on_widget("abc", None, None, None);

    assert_eq!(
        statement.to_json().unwrap(),
        r#"{"Effect":"Allow","Action":"widgets:MakeWidget","Resource":"arn:aws:widgets:*:*:widget/abc"}"#
    );
}

#[rstest]
#[case(None, None, None, "arn:aws:widgets:*:*:widget/abc")]
#[case(Some("123456789012"), None, None, "arn:aws:widgets:*:123456789012:widget/abc")]
#[case(None, Some("eu-west-1"), None, "arn:aws:widgets:eu-west-1:*:widget/abc")]
#[case(
    Some("123456789012"),
    Some("cn-north-1"),
    Some("aws-cn"),
    "arn:aws-cn:widgets:cn-north-1:123456789012:widget/abc"
)]
fn test_widget_arn_arguments(
    #[case] account: Option<&str>,
    #[case] region: Option<&str>,
    #[case] partition: Option<&str>,
    #[case] expected: &str,
) {
    let statement = Widgets::new().on_widget("abc", account, region, partition);
    let resources: Vec<&str> = statement.statement().resources().collect();
    assert_eq!(resources, vec![expected]);
    assert!(!expected.contains("${"));
}

#[test]
fn test_statement_arn_defaults_fill_omitted_arguments() {
    let statement = Widgets::new()
        .with_arn_defaults(
            ArnDefaults::default()
                .with_partition("aws-us-gov")
                .with_account("111122223333"),
        )
        .on_widget("abc", None, Some("us-gov-west-1"), None);

    let resources: Vec<&str> = statement.statement().resources().collect();
    assert_eq!(
        resources,
        vec!["arn:aws-us-gov:widgets:us-gov-west-1:111122223333:widget/abc"]
    );
}

#[test]
fn test_partial_standard_placeholders() {
    let statement = Widgets::new().on_depot("north", None, None);
    let resources: Vec<&str> = statement.statement().resources().collect();
    assert_eq!(resources, vec!["arn:aws:widgets::*:depot/north"]);

    let statement = S3::new().on_object("my-bucket", "reports/*", None);
    let resources: Vec<&str> = statement.statement().resources().collect();
    assert_eq!(resources, vec!["arn:aws:s3:::my-bucket/reports/*"]);
}

#[test]
fn test_resource_without_placeholders() {
    let statement = Widgets::new().on_catalog();
    let resources: Vec<&str> = statement.statement().resources().collect();
    assert_eq!(resources, vec!["arn:aws:widgets:::catalog/public"]);
}

#[test]
fn test_repeated_actions_and_resources_are_idempotent() {
    let once = Widgets::new()
        .to_make_widget()
        .on_widget("abc", None, None, None);
    let twice = Widgets::new()
        .to_make_widget()
        .to_make_widget()
        .on_widget("abc", None, None, None)
        .on_widget("abc", None, None, None);
    assert_eq!(once, twice);
    assert_eq!(once.to_json().unwrap(), twice.to_json().unwrap());
}

#[test]
fn test_multiple_actions_serialize_as_array() {
    let statement = Widgets::new().to_make_widget().to_describe_widget();
    assert_eq!(
        statement.to_value().unwrap(),
        json!({
            "Effect": "Allow",
            "Action": ["widgets:MakeWidget", "widgets:DescribeWidget"],
            "Resource": "*"
        })
    );
}

#[test]
fn test_condition_values_merge_under_same_operator() {
    let statement = Widgets::new()
        .to_make_widget()
        .if_color("red", None)
        .if_color("blue", None)
        .if_color("red", Some(Operator::new(OperatorKind::StringEquals)));

    assert_eq!(
        statement.to_value().unwrap(),
        json!({
            "Effect": "Allow",
            "Action": "widgets:MakeWidget",
            "Resource": "*",
            "Condition": {
                "StringLike": {"widgets:Color": ["red", "blue"]},
                "StringEquals": {"widgets:Color": "red"}
            }
        })
    );
}

#[test]
fn test_parameterized_condition_keys() {
    let statement = Widgets::new()
        .to_tag_widget()
        .if_aws_request_tag("team", ["platform", "security"], None)
        .if_aws_tag_keys(
            vec!["team"],
            Some(Operator::new(OperatorKind::StringEquals).for_all_values()),
        );

    assert_eq!(
        statement.to_value().unwrap()["Condition"],
        json!({
            "StringLike": {"aws:RequestTag/team": ["platform", "security"]},
            "ForAllValues:StringEquals": {"aws:TagKeys": "team"}
        })
    );
}

#[test]
fn test_typed_condition_defaults() {
    let ship_by = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let statement = Widgets::new()
        .to_ship_widget()
        .if_weight(5000, Some(Operator::new(OperatorKind::NumericLessThan)))
        .if_ship_by(ship_by, None)
        .if_fragile(None, None)
        .if_source_ip("203.0.113.0/24", None)
        .if_policy_arn("arn:aws:iam::123456789012:policy/*", None);

    assert_eq!(
        statement.to_value().unwrap()["Condition"],
        json!({
            "NumericLessThan": {"widgets:Weight": "5000"},
            "DateEquals": {"widgets:ShipBy": "2024-03-01T12:00:00.000Z"},
            "Bool": {"widgets:Fragile": "true"},
            "IpAddress": {"widgets:SourceIp": "203.0.113.0/24"},
            "ArnLike": {"widgets:PolicyArn": "arn:aws:iam::123456789012:policy/*"}
        })
    );
}

#[test]
fn test_sid_effect_and_negation() {
    let statement = Widgets::with_sid("DenyEverythingElse")
        .deny()
        .to_make_widget()
        .not_action()
        .on_catalog()
        .not_resource();

    assert_eq!(
        statement.to_value().unwrap(),
        json!({
            "Sid": "DenyEverythingElse",
            "Effect": "Deny",
            "NotAction": "widgets:MakeWidget",
            "NotResource": "arn:aws:widgets:::catalog/public"
        })
    );
}

#[test]
fn test_generic_primitives_chain_with_generated_methods() {
    let statement = Groundstation::new()
        .to_get_config()
        .to("groundstation:GetSatellite")
        .on_config("antenna-downlink", "c-123", Some("111122223333"), Some("us-east-2"), None)
        .r#if("groundstation:configType", "antenna-downlink", OperatorKind::StringEquals);

    let policy: PolicyStatement = statement.into();
    assert_eq!(
        policy.to_value().unwrap(),
        json!({
            "Effect": "Allow",
            "Action": ["groundstation:GetConfig", "groundstation:GetSatellite"],
            "Resource": "arn:aws:groundstation:us-east-2:111122223333:config/antenna-downlink/c-123",
            "Condition": {"StringEquals": {"groundstation:configType": "antenna-downlink"}}
        })
    );
}

#[test]
fn test_bool_condition_value_can_be_given() {
    let statement = Widgets::new().to_ship_widget().if_fragile(Some(false), None);
    assert_eq!(
        statement.to_value().unwrap()["Condition"],
        json!({"Bool": {"widgets:Fragile": "false"}})
    );
}

#[test]
fn test_generic_condition_qualifies_bare_keys() {
    let statement = Groundstation::new()
        .to_get_config()
        .r#if("configType", "x", OperatorKind::StringEquals);
    assert_eq!(
        statement.to_value().unwrap()["Condition"],
        json!({"StringEquals": {"groundstation:configType": "x"}})
    );
}

#[test]
fn test_global_conditions_on_generated_types() {
    let statement = Widgets::new()
        .to_make_widget()
        .if_aws_called_via("cloudformation.amazonaws.com", None)
        .if_aws_multi_factor_auth_present(None)
        .if_aws_requested_region(["eu-west-1", "eu-north-1"], None);
    assert_eq!(
        statement.to_value().unwrap()["Condition"],
        json!({
            "ForAnyValue:StringEquals": {"aws:CalledVia": "cloudformation.amazonaws.com"},
            "Bool": {"aws:MultiFactorAuthPresent": "true"},
            "StringLike": {"aws:RequestedRegion": ["eu-west-1", "eu-north-1"]}
        })
    );
}

#[test]
fn test_declared_global_keys_use_the_generated_accessor() {
    // Widgets declares `aws:RequestTag/${TagKey}`, so the inherent accessor is called even
    // with the global trait in scope.
    let generated = Widgets::new().to_make_widget().if_aws_request_tag("team", "infra", None);
    let global = PolicyStatement::new()
        .to("widgets:MakeWidget")
        .if_aws_request_tag("team", "infra", None);
    assert_eq!(generated.to_value().unwrap(), global.to_value().unwrap());
}

#[test]
fn test_service_specific_unqualified_keys_are_qualified() {
    let statement = Groundstation::new()
        .to_describe_contact()
        .if_contact_id("c-1", None);
    assert_eq!(
        statement.to_value().unwrap()["Condition"],
        json!({"StringLike": {"groundstation:contactId": "c-1"}})
    );
}

#[test]
fn test_service_reference_catalog() {
    let statement = S3::new()
        .to_get_object()
        .on_object("my-bucket", "*", None)
        .if_existing_object_tag("classification", "public", None)
        .if_x_amz_content_sha256("UNSIGNED-PAYLOAD", None)
        .if_signature_age(600_000, Some(Operator::new(OperatorKind::NumericLessThan)));

    assert_eq!(
        statement.to_value().unwrap(),
        json!({
            "Effect": "Allow",
            "Action": "s3:GetObject",
            "Resource": "arn:aws:s3:::my-bucket/*",
            "Condition": {
                "StringLike": {
                    "s3:ExistingObjectTag/classification": "public",
                    "s3:x-amz-content-sha256": "UNSIGNED-PAYLOAD"
                },
                "NumericLessThan": {"s3:signatureAge": "600000"}
            }
        })
    );
}

#[test]
fn test_all_actions_wildcards() {
    let statement = Widgets::new().all_actions();
    assert_eq!(statement.statement().actions().collect::<Vec<_>>(), vec!["widgets:*"]);

    let statement = Groundstation::new().all_actions_with_access_level(AccessLevel::Tagging);
    assert_eq!(
        statement.statement().actions().collect::<Vec<_>>(),
        vec!["groundstation:TagResource", "groundstation:UntagResource"]
    );
}

#[test]
fn test_lookup_tables() {
    assert_eq!(Widgets::SERVICE_PREFIX, "widgets");
    assert_eq!(Widgets::ACTION_LIST.len(), 6);
    assert_eq!(Widgets::ACTION_LIST[0].name, "MakeWidget");

    let make = Widgets::action_info("makewidget").unwrap();
    assert_eq!(make.access_level, AccessLevel::Write);
    assert_eq!(make.resource_types[0].name, "Widget");
    assert!(make.resource_types[0].required);
    assert_eq!(make.dependent_actions, &["widgets:TagWidget"]);
    assert_eq!(
        make.conditions,
        &["aws:RequestTag/${TagKey}", "aws:TagKeys", "widgets:Color"]
    );

    let ship = Widgets::action_info("ShipWidget").unwrap();
    assert_eq!(
        ship.conditions,
        &["widgets:Fragile", "widgets:SourceIp", "widgets:Weight", "widgets:ShipBy"]
    );

    let widget = Widgets::resource_type_info("Widget").unwrap();
    assert_eq!(
        widget.arn,
        "arn:${Partition}:widgets:${Region}:${Account}:widget/${Id}"
    );
    assert!(Widgets::resource_type_info("widget").is_none());

    let levels: Vec<AccessLevel> = Widgets::ACCESS_LEVEL_LIST
        .iter()
        .map(|(level, _)| *level)
        .collect();
    assert_eq!(
        levels,
        vec![
            AccessLevel::Write,
            AccessLevel::Read,
            AccessLevel::List,
            AccessLevel::Tagging,
            AccessLevel::PermissionsManagement
        ]
    );
    assert_eq!(
        Widgets::ACCESS_LEVEL_LIST[0].1,
        &["MakeWidget", "ShipWidget"]
    );
}

#[test]
fn test_service_reference_access_levels_and_optional_resources() {
    assert_eq!(S3::SERVICE_PREFIX, "s3");
    let put_policy = S3::action_info("PutBucketPolicy").unwrap();
    assert_eq!(put_policy.access_level, AccessLevel::PermissionsManagement);
    assert!(!put_policy.resource_types[0].required);
    assert_eq!(
        S3::action_info("PutObjectTagging").unwrap().access_level,
        AccessLevel::Tagging
    );
    assert_eq!(
        S3::resource_type_info("accesspoint").unwrap().arn,
        "arn:${Partition}:s3:${Region}:${Account}:accesspoint/${AccessPointName}"
    );
}

#[test]
fn test_statement_is_reusable_after_serialization() {
    let statement = Widgets::new().to_list_widgets();
    let first = statement.to_json().unwrap();
    assert_eq!(first, statement.to_json().unwrap());

    let statement = statement.to_describe_widget();
    assert_eq!(
        statement.to_value().unwrap()["Action"],
        json!(["widgets:ListWidgets", "widgets:DescribeWidget"])
    );
    assert_ne!(first, statement.to_json().unwrap());
}
