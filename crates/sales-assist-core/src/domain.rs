//! Retrieval domains.
//!
//! A domain scopes which documents and persona the backend uses when it
//! answers a chat turn. The set is closed; `General` is the unrestricted
//! domain that searches across all documents and has no curated file set.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// A fixed retrieval category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Domain {
    Rpa,
    It,
    Hr,
    Security,
    General,
}

impl Domain {
    /// All domains in menu order.
    pub fn all() -> Vec<Domain> {
        Domain::iter().collect()
    }

    /// Wire representation, e.g. `"hr"`.
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Whether this domain searches over every document instead of a curated subset.
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Domain::General)
    }

    /// Whether files can be uploaded or selected in this domain.
    pub fn allows_file_actions(&self) -> bool {
        !self.is_unrestricted()
    }

    /// Human-readable label used by menus and headers.
    pub fn label(&self) -> &'static str {
        match self {
            Domain::Rpa => "RPA Solutions",
            Domain::It => "IT Infrastructure",
            Domain::Hr => "HR Solutions",
            Domain::Security => "Security",
            Domain::General => "General",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Domain::Rpa => "Automation offerings, bots and process discovery",
            Domain::It => "Infrastructure, cloud and managed services",
            Domain::Hr => "HR platforms, onboarding and people operations",
            Domain::Security => "Security assessments, compliance and SOC services",
            Domain::General => "Search across every uploaded document",
        }
    }

    /// Prompt suggested when the user picks this domain with an empty input line.
    pub fn starter_prompt(&self) -> &'static str {
        match self {
            Domain::Rpa => "What RPA solutions can we offer to a new client?",
            Domain::It => "Summarize our IT infrastructure service catalogue.",
            Domain::Hr => "What HR solutions do we provide for onboarding?",
            Domain::Security => "Which security services fit a mid-size company?",
            Domain::General => "What can you help me with today?",
        }
    }
}
