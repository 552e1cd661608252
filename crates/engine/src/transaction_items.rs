use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// Database row for a transaction line item.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transaction_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub transaction_id: String,
    pub name: String,
    pub amount: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A single line item of a transaction. Amounts are positive minor
/// currency units; the parent's kind decides the sign.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionItem {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub name: String,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionItem {
    #[must_use]
    pub fn new(transaction_id: Uuid, name: String, amount: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            name,
            amount,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&TransactionItem> for ActiveModel {
    fn from(item: &TransactionItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            transaction_id: ActiveValue::Set(item.transaction_id.to_string()),
            name: ActiveValue::Set(item.name.clone()),
            amount: ActiveValue::Set(item.amount),
            created_at: ActiveValue::Set(item.created_at),
            updated_at: ActiveValue::Set(item.updated_at),
        }
    }
}

impl TryFrom<Model> for TransactionItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound(model.id.clone()))?,
            transaction_id: Uuid::parse_str(&model.transaction_id)
                .map_err(|_| EngineError::KeyNotFound(model.transaction_id.clone()))?,
            name: model.name,
            amount: model.amount,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
