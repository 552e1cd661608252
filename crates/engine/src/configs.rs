use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// Database row for a configuration entry.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "configs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub config_type_id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A configuration entry, always attached to a [`crate::ConfigType`].
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub id: Uuid,
    pub name: String,
    pub config_type_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Config {
    #[must_use]
    pub fn new(name: String, config_type_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            config_type_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&Config> for ActiveModel {
    fn from(config: &Config) -> Self {
        Self {
            id: ActiveValue::Set(config.id.to_string()),
            name: ActiveValue::Set(config.name.clone()),
            config_type_id: ActiveValue::Set(config.config_type_id.to_string()),
            created_at: ActiveValue::Set(config.created_at),
            updated_at: ActiveValue::Set(config.updated_at),
        }
    }
}

impl TryFrom<Model> for Config {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound(model.id.clone()))?,
            name: model.name,
            config_type_id: Uuid::parse_str(&model.config_type_id)
                .map_err(|_| EngineError::KeyNotFound(model.config_type_id.clone()))?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
