//! ARN template parsing.
//!
//! Templates such as `arn:${Partition}:widgets:${Region}:${Account}:widget/${Id}` are split
//! into literal text and `${Name}` placeholders. `Partition`, `Region`, `Account` and
//! `AccountId` are recognised by name wherever they occur; every other placeholder is a
//! resource-specific parameter.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Why a template could not be parsed. Offsets are byte offsets of the opening `$`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArnTemplateError {
    #[error("unterminated placeholder at offset {0}")]
    Unterminated(usize),

    #[error("empty placeholder at offset {0}")]
    Empty(usize),

    #[error("invalid placeholder name `{0}`")]
    InvalidName(String),
}

/// Placeholders the generated accessor fills from optional arguments or statement defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardPlaceholder {
    Account,
    Region,
    Partition,
}

impl StandardPlaceholder {
    /// Order in which the optional arguments appear on an accessor.
    pub const PARAMETER_ORDER: [Self; 3] = [Self::Account, Self::Region, Self::Partition];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Partition" => Some(Self::Partition),
            "Region" => Some(Self::Region),
            "Account" | "AccountId" => Some(Self::Account),
            _ => None,
        }
    }

    /// Argument name on the generated accessor.
    pub const fn parameter(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Region => "region",
            Self::Partition => "partition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArnSegment {
    Literal(String),
    Placeholder(String),
}

/// A parsed ARN template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArnTemplate {
    raw: String,
    segments: Vec<ArnSegment>,
}

fn is_placeholder_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl ArnTemplate {
    pub fn parse(raw: &str) -> Result<Self, ArnTemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;
        let mut offset = 0;

        while let Some(start) = rest.find("${") {
            literal.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let end = after_open
                .find('}')
                .ok_or(ArnTemplateError::Unterminated(offset + start))?;
            let name = &after_open[..end];

            if name.is_empty() {
                return Err(ArnTemplateError::Empty(offset + start));
            }
            if !name.chars().all(is_placeholder_char) {
                return Err(ArnTemplateError::InvalidName(name.to_string()));
            }

            if !literal.is_empty() {
                segments.push(ArnSegment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(ArnSegment::Placeholder(name.to_string()));

            let consumed = start + 2 + end + 1;
            offset += consumed;
            rest = &rest[consumed..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(ArnSegment::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[ArnSegment] {
        &self.segments
    }

    /// Resource-specific placeholders, first occurrence order, without duplicates.
    pub fn custom_placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            let ArnSegment::Placeholder(name) = segment else {
                continue;
            };
            if StandardPlaceholder::from_name(name).is_none() && !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// Standard placeholders present in the template, in accessor argument order.
    pub fn standard_placeholders(&self) -> Vec<StandardPlaceholder> {
        StandardPlaceholder::PARAMETER_ORDER
            .into_iter()
            .filter(|standard| {
                self.segments.iter().any(|segment| {
                    matches!(segment, ArnSegment::Placeholder(name)
                        if StandardPlaceholder::from_name(name) == Some(*standard))
                })
            })
            .collect()
    }

    pub fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, ArnSegment::Placeholder(_)))
    }

    /// Substitute every placeholder through `lookup`. Placeholders it does not resolve are
    /// left as `${Name}`.
    pub fn fill<'a>(&self, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
        let mut arn = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                ArnSegment::Literal(text) => arn.push_str(text),
                ArnSegment::Placeholder(name) => match lookup(name) {
                    Some(value) => arn.push_str(value),
                    None => {
                        arn.push_str("${");
                        arn.push_str(name);
                        arn.push('}');
                    }
                },
            }
        }
        arn
    }
}

impl Serialize for ArnTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
