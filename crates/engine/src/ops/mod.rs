use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

pub use approvals::{ApproveListFilter, ApproveListRow, OriginUpdate};
pub use configs::{ConfigFilter, ConfigRow};
pub use transactions::{TransactionFilter, TransactionRow};

mod access;
mod approvals;
mod configs;
mod ledger;
mod transactions;
mod users;

/// Runs `$body` inside a database transaction, committing on `Ok` and
/// rolling back (by drop) on `Err`.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point for every domain operation.
///
/// Cheap to clone; all state lives in the database.
#[derive(Clone, Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct EngineBuilder {
    database: Option<DatabaseConnection>,
}

impl EngineBuilder {
    #[must_use]
    pub fn database(mut self, database: DatabaseConnection) -> Self {
        self.database = Some(database);
        self
    }

    /// Checks the connection is alive before handing out the engine.
    pub async fn build(self) -> ResultEngine<Engine> {
        let database = self
            .database
            .ok_or_else(|| EngineError::Validation("database connection required".to_string()))?;
        database.ping().await?;
        Ok(Engine { database })
    }
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
}
