use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Seeded status for freshly created records.
pub const PENDING: i32 = 1;
/// Seeded status for accepted records.
pub const APPROVED: i32 = 2;
/// Seeded status for declined records.
pub const REJECTED: i32 = 3;

/// Database row for an approval status.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "status_approves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A named approval status. Ids 1..=3 are seeded and never change;
/// additional statuses can be created at runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusApprove {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for StatusApprove {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
