//! Core data structures for extracted EBD records
//!
//! This module defines the public types produced by an extraction run:
//! records, their check steps and per-step results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier used when no paragraph id could be found for a record.
pub const NOT_AVAILABLE: &str = "n/a";

/// Title used when the heading paragraph could not be parsed.
pub const UNREADABLE_TITLE: &str = "<unreadable heading>";

// Type aliases for convenience
pub type StepsById = BTreeMap<String, Vec<Step>>;

/// Market role that performs the checks of an EBD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Netzbetreiber
    Nb,
    /// Lieferant
    Lf,
    /// Messstellenbetreiber
    Msb,
    /// Bilanzkoordinator
    Biko,
    /// Betreiber einer technischen Ressource
    Btr,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Nb, Role::Lf, Role::Msb, Role::Biko, Role::Btr];

    pub fn code(self) -> &'static str {
        match self {
            Role::Nb => "NB",
            Role::Lf => "LF",
            Role::Msb => "MSB",
            Role::Biko => "BIKO",
            Role::Btr => "BTR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role code '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Role::ALL
            .into_iter()
            .find(|role| role.code() == upper)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.code().to_string()
    }
}

/// One EBD anchored in the document: heading title, checking role and the
/// paragraph id used to find its table again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub title: String,
    pub role: Role,
    /// `E_dddd` key from the start of the title, if present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebd_code: Option<String>,
    /// EBD code named by a `Basiert auf Strom EBD` line under the heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step_nr: String,
    pub description: String,
    pub results: Vec<CheckResult>,
}

impl Step {
    pub fn new(step_nr: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            step_nr: step_nr.into(),
            description: description.into(),
            results: Vec::new(),
        }
    }
}

/// One possible outcome of a check step. Never both fields empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub description: String,
    pub code: String,
}

impl CheckResult {
    /// Build a result, or `None` when both description and code are empty.
    pub fn new(description: impl Into<String>, code: impl Into<String>) -> Option<Self> {
        let description = description.into();
        let code = code.into();
        if description.is_empty() && code.is_empty() {
            None
        } else {
            Some(Self { description, code })
        }
    }
}

/// Complete output of one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Records in document order
    pub records: Vec<Record>,
    /// Step lists keyed by record id
    pub steps: StepsById,
}

impl Extraction {
    pub fn steps_for(&self, record: &Record) -> &[Step] {
        self.steps
            .get(&record.id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub record_index: usize,
    pub location: MatchLocation,
    pub text: String,
    /// Byte offsets of the hit in `text`
    pub start_pos: usize,
    pub end_pos: usize,
}

/// Where inside a record a search hit was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLocation {
    Title,
    StepDescription { step: usize },
    ResultDescription { step: usize, result: usize },
    ResultCode { step: usize, result: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineItem {
    pub title: String,
    pub role: Role,
    pub step_count: usize,
    pub record_index: usize,
}
