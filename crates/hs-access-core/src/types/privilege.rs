//! The privilege lattice.
//!
//! Privileges are ordered by numeric code where a *lower* value is
//! *stronger*: `Owner < Change < View < None`. Comparison with `<=` reads
//! "at least as strong as". Combining several grants keeps the strongest,
//! and `None` is the identity of [`PrivilegeCode::combine`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A privilege level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeCode {
    /// Full control: change flags, delete, share at any level.
    Owner = 1,
    /// May modify content and metadata.
    Change = 2,
    /// Read-only access.
    View = 3,
    /// No privilege. Equivalent to the absence of a grant.
    #[default]
    None = 4,
}

impl PrivilegeCode {
    /// All levels from strongest to weakest.
    pub const ALL: [PrivilegeCode; 4] = [Self::Owner, Self::Change, Self::View, Self::None];

    /// The strongest of two privileges.
    pub fn combine(self, other: PrivilegeCode) -> PrivilegeCode {
        self.min(other)
    }

    /// Combine any number of privileges. An empty sequence yields `None`.
    pub fn combine_all<I>(privileges: I) -> PrivilegeCode
    where
        I: IntoIterator<Item = PrivilegeCode>,
    {
        privileges
            .into_iter()
            .fold(PrivilegeCode::None, PrivilegeCode::combine)
    }

    /// Whether `self` is at least as strong as `required`.
    pub fn at_least(self, required: PrivilegeCode) -> bool {
        self <= required
    }

    /// Apply a ceiling: the result is never stronger than `ceiling`.
    pub fn weaken_to(self, ceiling: PrivilegeCode) -> PrivilegeCode {
        self.max(ceiling)
    }

    /// Whether this level represents any privilege at all.
    pub fn is_some(self) -> bool {
        self != PrivilegeCode::None
    }

    /// Numeric code as persisted by the original system.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Parse a numeric code.
    pub fn from_code(code: i32) -> Option<PrivilegeCode> {
        match code {
            1 => Some(Self::Owner),
            2 => Some(Self::Change),
            3 => Some(Self::View),
            4 => Some(Self::None),
            _ => None,
        }
    }

    /// Return the privilege as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Change => "change",
            Self::View => "view",
            Self::None => "none",
        }
    }
}

impl fmt::Display for PrivilegeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PrivilegeCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "change" => Ok(Self::Change),
            "view" => Ok(Self::View),
            "none" => Ok(Self::None),
            _ => Err(AppError::usage(format!(
                "Invalid privilege: '{s}'. Expected one of: owner, change, view, none"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_strongest_first() {
        assert!(PrivilegeCode::Owner < PrivilegeCode::Change);
        assert!(PrivilegeCode::Change < PrivilegeCode::View);
        assert!(PrivilegeCode::View < PrivilegeCode::None);
    }

    #[test]
    fn test_combine_keeps_strongest() {
        assert_eq!(
            PrivilegeCode::View.combine(PrivilegeCode::Change),
            PrivilegeCode::Change
        );
        for p in PrivilegeCode::ALL {
            assert_eq!(p.combine(PrivilegeCode::None), p);
            assert_eq!(PrivilegeCode::None.combine(p), p);
        }
        assert_eq!(PrivilegeCode::combine_all([]), PrivilegeCode::None);
        assert_eq!(
            PrivilegeCode::combine_all([PrivilegeCode::View, PrivilegeCode::Owner]),
            PrivilegeCode::Owner
        );
    }

    #[test]
    fn test_at_least() {
        assert!(PrivilegeCode::Owner.at_least(PrivilegeCode::View));
        assert!(PrivilegeCode::View.at_least(PrivilegeCode::View));
        assert!(!PrivilegeCode::View.at_least(PrivilegeCode::Change));
        assert!(!PrivilegeCode::None.at_least(PrivilegeCode::View));
    }

    #[test]
    fn test_weaken_never_strengthens() {
        assert_eq!(
            PrivilegeCode::Change.weaken_to(PrivilegeCode::View),
            PrivilegeCode::View
        );
        assert_eq!(
            PrivilegeCode::None.weaken_to(PrivilegeCode::View),
            PrivilegeCode::None
        );
    }

    #[test]
    fn test_codes_and_parsing() {
        for p in PrivilegeCode::ALL {
            assert_eq!(PrivilegeCode::from_code(p.code()), Some(p));
        }
        assert_eq!(PrivilegeCode::from_code(0), None);
        assert_eq!("CHANGE".parse::<PrivilegeCode>().unwrap(), PrivilegeCode::Change);
        assert!("admin".parse::<PrivilegeCode>().unwrap_err().is_usage());
    }
}
