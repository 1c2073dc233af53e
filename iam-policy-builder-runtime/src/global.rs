//! Accessors for the global `aws:` condition keys, available on every statement.
//!
//! A generated service type that declares one of these keys itself provides an inherent
//! method of the same name, which takes precedence over the one defined here.

use crate::operator::{Operator, OperatorKind};
use crate::service::ServiceStatement;
use crate::statement::PolicyStatement;
use crate::values::IntoConditionValues;

/// A global condition key together with the accessor that sets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlobalConditionKey {
    pub method: &'static str,
    /// The key as service catalogs spell it, placeholder included.
    pub key: &'static str,
}

const STRING_LIKE: Operator = Operator::new(OperatorKind::StringLike);

macro_rules! global_conditions {
    (
        values {
            $( $(#[$value_doc:meta])* $value_method:ident => $value_key:literal, $value_default:expr; )+
        }
        tags {
            $( $(#[$tag_doc:meta])* $tag_method:ident => $tag_key:literal; )+
        }
        flags {
            $( $(#[$flag_doc:meta])* $flag_method:ident => $flag_key:literal; )+
        }
    ) => {
        /// Global `aws:` condition accessors.
        ///
        /// Implemented for [`PolicyStatement`] and every [`ServiceStatement`]. Each accessor
        /// takes an optional operator override; boolean keys take an optional value that
        /// defaults to `true`.
        pub trait GlobalConditions: Sized {
            /// Add a clause for a fully qualified key.
            fn add_global_condition(
                self,
                key: String,
                values: Vec<String>,
                operator: Operator,
            ) -> Self;

            $(
                $(#[$value_doc])*
                fn $value_method(
                    self,
                    value: impl IntoConditionValues,
                    operator: Option<Operator>,
                ) -> Self {
                    self.add_global_condition(
                        $value_key.to_string(),
                        value.into_condition_values(),
                        operator.unwrap_or($value_default),
                    )
                }
            )+

            $(
                $(#[$tag_doc])*
                fn $tag_method(
                    self,
                    tag_key: &str,
                    value: impl IntoConditionValues,
                    operator: Option<Operator>,
                ) -> Self {
                    self.add_global_condition(
                        format!("{}/{tag_key}", $tag_key),
                        value.into_condition_values(),
                        operator.unwrap_or(STRING_LIKE),
                    )
                }
            )+

            $(
                $(#[$flag_doc])*
                fn $flag_method(self, value: Option<bool>) -> Self {
                    self.add_global_condition(
                        $flag_key.to_string(),
                        vec![value.unwrap_or(true).to_string()],
                        Operator::new(OperatorKind::Bool),
                    )
                }
            )+
        }

        /// Every key covered by [`GlobalConditions`], with its accessor name.
        pub const GLOBAL_CONDITION_KEYS: &[GlobalConditionKey] = &[
            $( GlobalConditionKey { method: stringify!($value_method), key: $value_key }, )+
            $( GlobalConditionKey { method: stringify!($tag_method), key: concat!($tag_key, "/${TagKey}") }, )+
            $( GlobalConditionKey { method: stringify!($flag_method), key: $flag_key }, )+
        ];
    };
}

global_conditions! {
    values {
        /// Services that made requests on the principal's behalf, in chain order.
        /// Default operator: `ForAnyValue:StringEquals`.
        if_aws_called_via => "aws:CalledVia", Operator::new(OperatorKind::StringEquals).for_any_value();
        /// First service in the `aws:CalledVia` chain.
        if_aws_called_via_first => "aws:CalledViaFirst", STRING_LIKE;
        /// Last service in the `aws:CalledVia` chain.
        if_aws_called_via_last => "aws:CalledViaLast", STRING_LIKE;
        /// Date and time of the request. Default operator: `DateLessThanEquals`.
        if_aws_current_time => "aws:CurrentTime", Operator::new(OperatorKind::DateLessThanEquals);
        /// Date and time of the request as epoch or UNIX time. Default operator:
        /// `DateLessThanEquals`.
        if_aws_epoch_time => "aws:EpochTime", Operator::new(OperatorKind::DateLessThanEquals);
        /// Seconds since the principal was authorized using MFA. Default operator:
        /// `NumericLessThan`.
        if_aws_multi_factor_auth_age => "aws:MultiFactorAuthAge", Operator::new(OperatorKind::NumericLessThan);
        /// Account the requesting principal belongs to.
        if_aws_principal_account => "aws:PrincipalAccount", STRING_LIKE;
        /// ARN of the requesting principal. Default operator: `ArnLike`.
        if_aws_principal_arn => "aws:PrincipalArn", Operator::new(OperatorKind::ArnLike);
        /// Identifier of the organization the principal's account belongs to.
        if_aws_principal_org_id => "aws:PrincipalOrgID", STRING_LIKE;
        /// Organizations path of the principal's account.
        if_aws_principal_org_paths => "aws:PrincipalOrgPaths", STRING_LIKE;
        /// Type of the requesting principal (`Account`, `User`, `FederatedUser`, ...).
        if_aws_principal_type => "aws:PrincipalType", STRING_LIKE;
        /// HTTP referer of the request.
        if_aws_referer => "aws:Referer", STRING_LIKE;
        /// Region the request was made to.
        if_aws_requested_region => "aws:RequestedRegion", STRING_LIKE;
        /// Account of the resource making a service-to-service request.
        if_aws_source_account => "aws:SourceAccount", STRING_LIKE;
        /// ARN of the resource making a service-to-service request. Default operator:
        /// `ArnLike`.
        if_aws_source_arn => "aws:SourceArn", Operator::new(OperatorKind::ArnLike);
        /// Requester's IP address. Default operator: `IpAddress`.
        if_aws_source_ip => "aws:SourceIp", Operator::new(OperatorKind::IpAddress);
        /// VPC the request came through.
        if_aws_source_vpc => "aws:SourceVpc", STRING_LIKE;
        /// VPC endpoint the request came through.
        if_aws_source_vpce => "aws:SourceVpce", STRING_LIKE;
        /// Tag keys present in the request.
        if_aws_tag_keys => "aws:TagKeys", STRING_LIKE;
        /// When temporary credentials were issued. Default operator:
        /// `DateGreaterThanEquals`.
        if_aws_token_issue_time => "aws:TokenIssueTime", Operator::new(OperatorKind::DateGreaterThanEquals);
        /// Requester's client application.
        if_aws_user_agent => "aws:UserAgent", STRING_LIKE;
        /// Principal identifier of the requester.
        if_aws_userid => "aws:userid", STRING_LIKE;
        /// User name of the requester.
        if_aws_username => "aws:username", STRING_LIKE;
        /// Requester's IP address inside a VPC. Default operator: `IpAddress`.
        if_aws_vpc_source_ip => "aws:VpcSourceIp", Operator::new(OperatorKind::IpAddress);
    }
    tags {
        /// Tag attached to the requesting principal.
        if_aws_principal_tag => "aws:PrincipalTag";
        /// Tag key and value passed in the request.
        if_aws_request_tag => "aws:RequestTag";
        /// Tag attached to the resource.
        if_aws_resource_tag => "aws:ResourceTag";
    }
    flags {
        /// Whether the temporary credentials were authenticated with MFA.
        if_aws_multi_factor_auth_present => "aws:MultiFactorAuthPresent";
        /// Whether the request was sent over TLS.
        if_aws_secure_transport => "aws:SecureTransport";
        /// Whether an AWS service made the request on the principal's behalf.
        if_aws_via_aws_service => "aws:ViaAWSService";
    }
}

impl GlobalConditions for PolicyStatement {
    fn add_global_condition(
        mut self,
        key: String,
        values: Vec<String>,
        operator: Operator,
    ) -> Self {
        self.add_condition(key, values, operator);
        self
    }
}

impl<T: ServiceStatement> GlobalConditions for T {
    fn add_global_condition(
        mut self,
        key: String,
        values: Vec<String>,
        operator: Operator,
    ) -> Self {
        self.statement_mut().add_condition(key, values, operator);
        self
    }
}
