use std::fmt;

use serde::{Deserialize, Serialize};

/// Marital status as declared on the return.
///
/// Only [`MaritalStatus::MarriedJoint`] earns the spouse allowance; a spouse
/// filing separately claims their own personal allowance instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    #[default]
    Single,
    MarriedJoint,
    MarriedSeparate,
}

impl MaritalStatus {
    pub fn all() -> &'static [MaritalStatus] {
        &[
            MaritalStatus::Single,
            MaritalStatus::MarriedJoint,
            MaritalStatus::MarriedSeparate,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedJoint => "MJ",
            Self::MarriedSeparate => "MS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedJoint => "Married (File Jointly)",
            Self::MarriedSeparate => "Married (File Separate)",
        }
    }

    /// Parses a short code (`S`, `MJ`, `MS`) or a snake_case name
    /// (`single`, `married_joint`, `married_separate`). Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "single" => Some(Self::Single),
            "mj" | "married_joint" => Some(Self::MarriedJoint),
            "ms" | "married_separate" => Some(Self::MarriedSeparate),
            _ => None,
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
