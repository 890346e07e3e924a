//! Data models for the roster
//!
//! These represent the canonical JSON structure kept under the local storage key.
//! Field names and enum spellings match the persisted layout so existing data loads as-is.

use serde::{Deserialize, Serialize};

/// Gender as selected in the form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Unspecified, Gender::Male, Gender::Female];

    /// Label shown in the table and the form select
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Unspecified => "",
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Gender::Unspecified => Gender::Male,
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Unspecified,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Gender::Unspecified => Gender::Female,
            Gender::Male => Gender::Unspecified,
            Gender::Female => Gender::Male,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Unspecified => write!(f, "unspecified"),
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "unspecified" | "none" => Ok(Gender::Unspecified),
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!(
                "Invalid gender: {}. Use: unspecified, male, female",
                s
            )),
        }
    }
}

/// Column the visible table is ordered by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Id,
    Name,
    Address,
}

impl SortKey {
    /// Cycle order used by the sort selector
    pub fn next(self) -> Self {
        match self {
            SortKey::Id => SortKey::Name,
            SortKey::Name => SortKey::Address,
            SortKey::Address => SortKey::Id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Id => "ID",
            SortKey::Name => "Name",
            SortKey::Address => "Address",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Id => write!(f, "id"),
            SortKey::Name => write!(f, "name"),
            SortKey::Address => write!(f, "address"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" => Ok(SortKey::Id),
            "name" => Ok(SortKey::Name),
            "address" => Ok(SortKey::Address),
            _ => Err(format!("Invalid sort key: {}. Use: id, name, address", s)),
        }
    }
}

/// A single employee as stored in the roster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub id: u64,
    pub name: String,
    /// Date of birth as entered (`YYYY-MM-DD`), empty when unknown
    #[serde(rename = "dob", default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

/// Editable form state; `id` is `None` until the store assigns one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub id: Option<u64>,
    pub name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub email: String,
    pub address: String,
}

impl EmployeeDraft {
    /// Create a draft with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True when the name has visible characters
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Turn the draft into a record carrying the given id
    pub fn into_record(self, id: u64) -> EmployeeRecord {
        EmployeeRecord {
            id,
            name: self.name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            email: self.email,
            address: self.address,
        }
    }
}

impl From<&EmployeeRecord> for EmployeeDraft {
    fn from(record: &EmployeeRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.name.clone(),
            date_of_birth: record.date_of_birth.clone(),
            gender: record.gender,
            email: record.email.clone(),
            address: record.address.clone(),
        }
    }
}
