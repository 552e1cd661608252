use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Id of the single net amount row seeded by the migration.
pub const NET_AMOUNT_ID: i32 = 1;

/// Database row for the running net amount.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "net_amounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub amount: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// The organisation-wide running balance, in minor currency units.
/// Exactly one row exists; every change also writes a history entry.
#[derive(Clone, Debug, PartialEq)]
pub struct NetAmount {
    pub id: i32,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for NetAmount {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            amount: model.amount,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
