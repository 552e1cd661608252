use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// Database row for an uploaded receipt attached to a transaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transaction_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub transaction_id: String,
    pub url: String,
    pub public_id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A receipt stored on the media CDN. `public_id` is the CDN handle,
/// kept so the asset could be purged later.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionFile {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub url: String,
    pub public_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionFile {
    #[must_use]
    pub fn new(transaction_id: Uuid, url: String, public_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            url,
            public_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&TransactionFile> for ActiveModel {
    fn from(file: &TransactionFile) -> Self {
        Self {
            id: ActiveValue::Set(file.id.to_string()),
            transaction_id: ActiveValue::Set(file.transaction_id.to_string()),
            url: ActiveValue::Set(file.url.clone()),
            public_id: ActiveValue::Set(file.public_id.clone()),
            created_at: ActiveValue::Set(file.created_at),
            updated_at: ActiveValue::Set(file.updated_at),
        }
    }
}

impl TryFrom<Model> for TransactionFile {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound(model.id.clone()))?,
            transaction_id: Uuid::parse_str(&model.transaction_id)
                .map_err(|_| EngineError::KeyNotFound(model.transaction_id.clone()))?,
            url: model.url,
            public_id: model.public_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
