use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, TransactionFile, TransactionItem, status_approves};

/// Database row for an expense or income record.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub note: Option<String>,
    pub kind: String,
    pub amount: i64,
    pub status_approve_id: i32,
    pub created_by: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTimeUtc>,
    pub history_net_amount_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Direction of a transaction against the shared net amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// An expense or income record with its line items and receipts.
///
/// `amount` is the sum of the item amounts, in minor currency units.
/// `history_net_amount_id` points at the ledger snapshot taken when
/// this record last changed the net amount.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub title: String,
    pub note: Option<String>,
    pub kind: TransactionKind,
    pub amount: i64,
    pub status_approve_id: i32,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub history_net_amount_id: Option<Uuid>,
    pub items: Vec<TransactionItem>,
    pub files: Vec<TransactionFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    #[must_use]
    pub fn new(title: String, kind: TransactionKind, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            note: None,
            kind,
            amount: 0,
            status_approve_id: status_approves::PENDING,
            created_by,
            approved_by: None,
            approved_at: None,
            history_net_amount_id: None,
            items: Vec::new(),
            files: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Signed effect on the net amount: negative for expenses,
    /// positive for incomes.
    #[must_use]
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionKind::Expense => -self.amount,
            TransactionKind::Income => self.amount,
        }
    }
}

impl From<&Transaction> for ActiveModel {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(transaction.id.to_string()),
            title: ActiveValue::Set(transaction.title.clone()),
            note: ActiveValue::Set(transaction.note.clone()),
            kind: ActiveValue::Set(transaction.kind.as_str().to_string()),
            amount: ActiveValue::Set(transaction.amount),
            status_approve_id: ActiveValue::Set(transaction.status_approve_id),
            created_by: ActiveValue::Set(transaction.created_by.to_string()),
            approved_by: ActiveValue::Set(transaction.approved_by.map(|id| id.to_string())),
            approved_at: ActiveValue::Set(transaction.approved_at),
            history_net_amount_id: ActiveValue::Set(
                transaction.history_net_amount_id.map(|id| id.to_string()),
            ),
            created_at: ActiveValue::Set(transaction.created_at),
            updated_at: ActiveValue::Set(transaction.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound(model.id.clone()))?,
            title: model.title,
            note: model.note,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: model.amount,
            status_approve_id: model.status_approve_id,
            created_by: Uuid::parse_str(&model.created_by)
                .map_err(|_| EngineError::KeyNotFound(model.created_by.clone()))?,
            approved_by: parse_optional_id(model.approved_by.as_deref())?,
            approved_at: model.approved_at,
            history_net_amount_id: parse_optional_id(model.history_net_amount_id.as_deref())?,
            items: Vec::new(),
            files: Vec::new(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

fn parse_optional_id(value: Option<&str>) -> Result<Option<Uuid>, EngineError> {
    value
        .map(|raw| Uuid::parse_str(raw).map_err(|_| EngineError::KeyNotFound(raw.to_string())))
        .transpose()
}
