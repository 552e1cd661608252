use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// Database row for a configuration category.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "config_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Category grouping configuration entries. Names are unique.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigType {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConfigType {
    #[must_use]
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&ConfigType> for ActiveModel {
    fn from(config_type: &ConfigType) -> Self {
        Self {
            id: ActiveValue::Set(config_type.id.to_string()),
            name: ActiveValue::Set(config_type.name.clone()),
            created_at: ActiveValue::Set(config_type.created_at),
            updated_at: ActiveValue::Set(config_type.updated_at),
        }
    }
}

impl TryFrom<Model> for ConfigType {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound(model.id.clone()))?,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
