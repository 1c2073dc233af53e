//! IAM condition operators.
//!
//! An [`Operator`] is one of the documented operator families ([`OperatorKind`]) with an
//! optional set qualifier (`ForAnyValue:` / `ForAllValues:`) and an optional `IfExists`
//! suffix, e.g. `ForAnyValue:StringEqualsIfExists`.

use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use thiserror::Error;

macro_rules! operator_kinds {
    ($($variant:ident),+ $(,)?) => {
        /// The base condition operators IAM documents.
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub enum OperatorKind {
            $($variant,)+
        }

        impl OperatorKind {
            /// Every operator kind, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// The operator name as it appears in a policy document.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

operator_kinds! {
    StringEquals,
    StringNotEquals,
    StringEqualsIgnoreCase,
    StringNotEqualsIgnoreCase,
    StringLike,
    StringNotLike,
    NumericEquals,
    NumericNotEquals,
    NumericLessThan,
    NumericLessThanEquals,
    NumericGreaterThan,
    NumericGreaterThanEquals,
    DateEquals,
    DateNotEquals,
    DateLessThan,
    DateLessThanEquals,
    DateGreaterThan,
    DateGreaterThanEquals,
    Bool,
    BinaryEquals,
    IpAddress,
    NotIpAddress,
    ArnEquals,
    ArnNotEquals,
    ArnLike,
    ArnNotLike,
    Null,
}

impl Display for OperatorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Multi-valued context key qualifier.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SetQualifier {
    ForAnyValue,
    ForAllValues,
}

impl SetQualifier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ForAnyValue => "ForAnyValue",
            Self::ForAllValues => "ForAllValues",
        }
    }
}

/// A complete condition operator.
///
/// The default operator is `StringLike`, matching what an accessor uses for string keys
/// when the caller does not override it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Operator {
    kind: OperatorKind,
    qualifier: Option<SetQualifier>,
    if_exists: bool,
}

impl Operator {
    pub const fn new(kind: OperatorKind) -> Self {
        Self {
            kind,
            qualifier: None,
            if_exists: false,
        }
    }

    /// Prefix the operator with `ForAnyValue:`.
    pub const fn for_any_value(mut self) -> Self {
        self.qualifier = Some(SetQualifier::ForAnyValue);
        self
    }

    /// Prefix the operator with `ForAllValues:`.
    pub const fn for_all_values(mut self) -> Self {
        self.qualifier = Some(SetQualifier::ForAllValues);
        self
    }

    /// Append `IfExists` to the operator.
    pub const fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    pub const fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub const fn qualifier(&self) -> Option<SetQualifier> {
        self.qualifier
    }

    pub const fn is_if_exists(&self) -> bool {
        self.if_exists
    }
}

impl Default for Operator {
    fn default() -> Self {
        Self::new(OperatorKind::StringLike)
    }
}

impl From<OperatorKind> for Operator {
    fn from(kind: OperatorKind) -> Self {
        Self::new(kind)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(qualifier) = self.qualifier {
            write!(f, "{}:", qualifier.as_str())?;
        }
        f.write_str(self.kind.as_str())?;
        if self.if_exists {
            f.write_str("IfExists")?;
        }
        Ok(())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error returned when a string is not a known IAM condition operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid condition operator: {0}")]
pub struct ParseOperatorError(pub String);

impl FromStr for Operator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (qualifier, rest) = match s.split_once(':') {
            Some(("ForAnyValue", rest)) => (Some(SetQualifier::ForAnyValue), rest),
            Some(("ForAllValues", rest)) => (Some(SetQualifier::ForAllValues), rest),
            Some(_) => return Err(ParseOperatorError(s.to_string())),
            None => (None, s),
        };

        let (base, if_exists) = match rest.strip_suffix("IfExists") {
            Some(base) => (base, true),
            None => (rest, false),
        };

        let kind = OperatorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == base)
            .ok_or_else(|| ParseOperatorError(s.to_string()))?;

        Ok(Self {
            kind,
            qualifier,
            if_exists,
        })
    }
}
