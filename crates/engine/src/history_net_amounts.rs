use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, net_amounts};

/// Database row for a net amount snapshot.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "history_net_amounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub net_amount_id: i32,
    pub amount: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Immutable snapshot of the net amount after a change was applied.
/// History rows are never updated or deleted.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryNetAmount {
    pub id: Uuid,
    pub net_amount_id: i32,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

impl HistoryNetAmount {
    #[must_use]
    pub fn new(amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            net_amount_id: net_amounts::NET_AMOUNT_ID,
            amount,
            created_at: Utc::now(),
        }
    }
}

impl From<&HistoryNetAmount> for ActiveModel {
    fn from(snapshot: &HistoryNetAmount) -> Self {
        Self {
            id: ActiveValue::Set(snapshot.id.to_string()),
            net_amount_id: ActiveValue::Set(snapshot.net_amount_id),
            amount: ActiveValue::Set(snapshot.amount),
            created_at: ActiveValue::Set(snapshot.created_at),
        }
    }
}

impl TryFrom<Model> for HistoryNetAmount {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound(model.id.clone()))?,
            net_amount_id: model.net_amount_id,
            amount: model.amount,
            created_at: model.created_at,
        })
    }
}
