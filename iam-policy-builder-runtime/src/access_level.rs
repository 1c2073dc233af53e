//! AWS access level classification of actions.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Coarse classification AWS assigns to every action.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum AccessLevel {
    List,
    Read,
    Write,
    #[serde(rename = "Permissions management")]
    PermissionsManagement,
    Tagging,
}

impl AccessLevel {
    /// All access levels, in the order AWS documents them.
    pub const ALL: [Self; 5] = [
        Self::List,
        Self::Read,
        Self::Write,
        Self::PermissionsManagement,
        Self::Tagging,
    ];

    /// The label AWS uses in its documentation tables.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Read => "Read",
            Self::Write => "Write",
            Self::PermissionsManagement => "Permissions management",
            Self::Tagging => "Tagging",
        }
    }

    /// Match an access level label case-insensitively.
    ///
    /// Runs of whitespace are treated as a single space, so `"permissions  Management"`
    /// still matches. Anything outside the fixed set yields `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(&normalized))
    }
}

impl Display for AccessLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Read", AccessLevel::Read)]
    #[case("write", AccessLevel::Write)]
    #[case("LIST", AccessLevel::List)]
    #[case("Tagging", AccessLevel::Tagging)]
    #[case("Permissions management", AccessLevel::PermissionsManagement)]
    #[case("permissions  MANAGEMENT", AccessLevel::PermissionsManagement)]
    #[case(" Read ", AccessLevel::Read)]
    fn test_from_label(#[case] label: &str, #[case] expected: AccessLevel) {
        assert_eq!(AccessLevel::from_label(label), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("Admin")]
    #[case("PermissionsManagement")]
    #[case("Read/Write")]
    fn test_from_label_rejects_unknown(#[case] label: &str) {
        assert_eq!(AccessLevel::from_label(label), None);
    }

    #[test]
    fn test_serde_uses_documentation_labels() {
        let json = serde_json::to_string(&AccessLevel::PermissionsManagement).unwrap();
        assert_eq!(json, "\"Permissions management\"");

        let parsed: AccessLevel = serde_json::from_str("\"Tagging\"").unwrap();
        assert_eq!(parsed, AccessLevel::Tagging);
    }

    #[test]
    fn test_display_round_trips_through_from_label() {
        for level in AccessLevel::ALL {
            assert_eq!(AccessLevel::from_label(&level.to_string()), Some(level));
        }
    }
}
