//! Settings record entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{OwnerKey, SectionValue, SettingsRecord, SettingsScope, SettingsSection};
use domain::services::StoreError;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Database row mapping for the settings_records table.
#[derive(Debug, Clone, FromRow)]
pub struct SettingsRecordEntity {
    pub id: Uuid,
    pub scope: String,
    pub owner_id: Uuid,
    pub sections: Json<serde_json::Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SettingsRecordEntity> for SettingsRecord {
    type Error = StoreError;

    fn try_from(entity: SettingsRecordEntity) -> Result<Self, Self::Error> {
        let scope: SettingsScope = entity
            .scope
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("record {}: {}", entity.id, e)))?;

        let mut sections: BTreeMap<SettingsSection, SectionValue> = BTreeMap::new();
        for (name, value) in entity.sections.0 {
            let section: SettingsSection = name
                .parse()
                .map_err(|e| StoreError::Corrupt(format!("record {}: {}", entity.id, e)))?;
            match value {
                Value::Object(map) => {
                    sections.insert(section, map);
                }
                _ => {
                    return Err(StoreError::Corrupt(format!(
                        "record {}: section '{}' is not an object",
                        entity.id, section
                    )));
                }
            }
        }

        Ok(Self {
            id: entity.id,
            owner: OwnerKey {
                scope,
                owner_id: entity.owner_id,
            },
            sections,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
