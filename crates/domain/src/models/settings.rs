//! Sectioned settings domain models.
//!
//! A settings record belongs to exactly one owner key and holds a JSON object
//! per section. Platform-wide settings use a fixed singleton key; reseller
//! preferences are keyed by the reseller profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Content of a single section.
pub type SectionValue = serde_json::Map<String, serde_json::Value>;

/// Which family of settings a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsScope {
    /// Platform-wide configuration managed by staff.
    Platform,
    /// Per-reseller preferences managed by the reseller.
    Reseller,
}

impl SettingsScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsScope::Platform => "platform",
            SettingsScope::Reseller => "reseller",
        }
    }

    /// Sections a record of this scope carries.
    pub fn sections(&self) -> &'static [SettingsSection] {
        match self {
            SettingsScope::Platform => &[
                SettingsSection::General,
                SettingsSection::Security,
                SettingsSection::Notifications,
                SettingsSection::Integrations,
            ],
            SettingsScope::Reseller => &[SettingsSection::Preferences],
        }
    }
}

impl fmt::Display for SettingsScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsScope {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "platform" => Ok(SettingsScope::Platform),
            "reseller" => Ok(SettingsScope::Reseller),
            other => Err(UnknownName(other.to_string())),
        }
    }
}

/// A named, independently updatable sub-document of a settings record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSection {
    General,
    Security,
    Notifications,
    Integrations,
    Preferences,
}

impl SettingsSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsSection::General => "general",
            SettingsSection::Security => "security",
            SettingsSection::Notifications => "notifications",
            SettingsSection::Integrations => "integrations",
            SettingsSection::Preferences => "preferences",
        }
    }

    pub fn scope(&self) -> SettingsScope {
        match self {
            SettingsSection::Preferences => SettingsScope::Reseller,
            _ => SettingsScope::Platform,
        }
    }
}

impl fmt::Display for SettingsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsSection {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(SettingsSection::General),
            "security" => Ok(SettingsSection::Security),
            "notifications" => Ok(SettingsSection::Notifications),
            "integrations" => Ok(SettingsSection::Integrations),
            "preferences" => Ok(SettingsSection::Preferences),
            other => Err(UnknownName(other.to_string())),
        }
    }
}

/// Returned when a scope or section name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown settings name: {0}")]
pub struct UnknownName(pub String);

/// Identifies the single settings record of an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerKey {
    pub scope: SettingsScope,
    pub owner_id: Uuid,
}

impl OwnerKey {
    /// The platform-wide singleton record.
    pub fn platform() -> Self {
        Self {
            scope: SettingsScope::Platform,
            owner_id: Uuid::nil(),
        }
    }

    /// The record owned by a reseller profile.
    pub fn reseller(profile_id: Uuid) -> Self {
        Self {
            scope: SettingsScope::Reseller,
            owner_id: profile_id,
        }
    }

    /// Whether `section` may be stored on this owner's record.
    pub fn allows(&self, section: SettingsSection) -> bool {
        section.scope() == self.scope
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.owner_id)
    }
}

/// A persisted settings record.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsRecord {
    pub id: Uuid,
    pub owner: OwnerKey,
    pub sections: BTreeMap<SettingsSection, SectionValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SettingsRecord {
    /// A freshly created record with every section empty.
    pub fn empty(owner: OwnerKey) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner,
            sections: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored content of `section`, or an empty map if it was never set.
    pub fn section(&self, section: SettingsSection) -> SectionValue {
        self.sections.get(&section).cloned().unwrap_or_default()
    }

    /// All sections of the owner's scope, in declaration order.
    pub fn snapshot(&self) -> SettingsSnapshot {
        let sections = self
            .owner
            .scope
            .sections()
            .iter()
            .map(|s| (*s, self.section(*s)))
            .collect();

        SettingsSnapshot {
            sections,
            updated_at: self.updated_at,
        }
    }
}

/// Read view of every section of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSnapshot {
    #[serde(flatten)]
    pub sections: BTreeMap<SettingsSection, SectionValue>,
    pub updated_at: DateTime<Utc>,
}
