use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};
use crate::{
    APPROVED, CreateTransactionCmd, EngineError, PENDING, REJECTED, ResultEngine, StatusApprove,
    Transaction, TransactionFile, TransactionFileNew, TransactionItem, TransactionItemNew,
    TransactionKind, UpdateTransactionCmd, User, status_approves, transaction_files,
    transaction_items, transactions, users,
};

/// Filters for transaction listings.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub status_approve_id: Option<i32>,
    pub created_by: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    /// Substring match over title and note.
    pub search: Option<String>,
}

/// A transaction joined with its status and the involved users.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionRow {
    pub transaction: Transaction,
    pub status_approve: Option<StatusApprove>,
    pub created_by: Option<User>,
    pub approved_by: Option<User>,
}

impl Engine {
    /// Records a new expense or income. The total is the sum of the
    /// item amounts and hits the net amount immediately, without
    /// waiting for approval.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<TransactionRow> {
        let title = normalize_required_name(&cmd.title, "title")?;
        let note = normalize_optional_text(cmd.note.as_deref());

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.created_by.to_string())
                .await?;
            let mut transaction = Transaction::new(title, cmd.kind, cmd.created_by);
            transaction.note = note;
            transaction.items = build_items(transaction.id, &cmd.items)?;
            transaction.files = build_files(transaction.id, &cmd.files)?;
            transaction.amount = transaction.items.iter().map(|item| item.amount).sum();
            let snapshot = self
                .apply_net_change(&db_tx, transaction.signed_amount())
                .await?;
            transaction.history_net_amount_id = Some(snapshot.id);
            let model = transactions::ActiveModel::from(&transaction)
                .insert(&db_tx)
                .await?;
            insert_items(&db_tx, &transaction.items).await?;
            insert_files(&db_tx, &transaction.files).await?;
            self.transaction_row(&db_tx, model).await
        })
    }

    /// Transactions matching `filter`, newest first, with the overall
    /// count.
    pub async fn list_transactions(
        &self,
        page: u64,
        size: u64,
        filter: &TransactionFilter,
    ) -> ResultEngine<(Vec<TransactionRow>, u64)> {
        with_tx!(self, |db_tx| {
            let mut query = transactions::Entity::find();
            if let Some(status_approve_id) = filter.status_approve_id {
                query = query.filter(transactions::Column::StatusApproveId.eq(status_approve_id));
            }
            if let Some(created_by) = filter.created_by {
                query = query.filter(transactions::Column::CreatedBy.eq(created_by.to_string()));
            }
            if let Some(kind) = filter.kind {
                query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
            }
            if let Some(search) = filter.search.as_deref() {
                query = query.filter(
                    Condition::any()
                        .add(transactions::Column::Title.contains(search))
                        .add(transactions::Column::Note.contains(search)),
                );
            }
            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_desc(transactions::Column::CreatedAt)
                .order_by_desc(transactions::Column::Id)
                .offset(page.saturating_sub(1) * size)
                .limit(size)
                .all(&db_tx)
                .await?;
            let rows = self.transaction_rows(&db_tx, models).await?;
            Ok((rows, total))
        })
    }

    pub async fn transaction_detail(&self, transaction_id: Uuid) -> ResultEngine<TransactionRow> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(transaction_id.to_string()))?;
            self.transaction_row(&db_tx, model).await
        })
    }

    /// Rewrites a transaction in place. Only the owner or an admin may
    /// do this. Items and files are replaced wholesale; the net amount
    /// moves by the difference between the old and new signed totals,
    /// recorded as a single snapshot even when the difference is zero.
    pub async fn update_transaction(
        &self,
        cmd: UpdateTransactionCmd,
    ) -> ResultEngine<TransactionRow> {
        let title = normalize_required_name(&cmd.title, "title")?;
        let note = normalize_optional_text(cmd.note.as_deref());

        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(cmd.transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(cmd.transaction_id.to_string()))?;
            self.require_owner_or_admin(&db_tx, &model.created_by, cmd.user_id)
                .await?;
            let mut transaction = Transaction::try_from(model)?;
            let old_signed = transaction.signed_amount();
            transaction.title = title;
            transaction.note = note;
            transaction.kind = cmd.kind;
            transaction.items = build_items(transaction.id, &cmd.items)?;
            transaction.files = build_files(transaction.id, &cmd.files)?;
            transaction.amount = transaction.items.iter().map(|item| item.amount).sum();
            transaction.updated_at = Utc::now();
            let snapshot = self
                .apply_net_change(&db_tx, transaction.signed_amount() - old_signed)
                .await?;
            transaction.history_net_amount_id = Some(snapshot.id);

            transaction_items::Entity::delete_many()
                .filter(transaction_items::Column::TransactionId.eq(transaction.id.to_string()))
                .exec(&db_tx)
                .await?;
            transaction_files::Entity::delete_many()
                .filter(transaction_files::Column::TransactionId.eq(transaction.id.to_string()))
                .exec(&db_tx)
                .await?;
            insert_items(&db_tx, &transaction.items).await?;
            insert_files(&db_tx, &transaction.files).await?;

            let update = transactions::ActiveModel {
                id: ActiveValue::Set(transaction.id.to_string()),
                title: ActiveValue::Set(transaction.title.clone()),
                note: ActiveValue::Set(transaction.note.clone()),
                kind: ActiveValue::Set(transaction.kind.as_str().to_string()),
                amount: ActiveValue::Set(transaction.amount),
                history_net_amount_id: ActiveValue::Set(
                    transaction.history_net_amount_id.map(|id| id.to_string()),
                ),
                updated_at: ActiveValue::Set(transaction.updated_at),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            self.transaction_row(&db_tx, updated).await
        })
    }

    /// Resolves a pending transaction. Admin only; the decision stamps
    /// status, approver and time. The net amount was already adjusted
    /// when the record was written, so nothing moves here.
    pub async fn approve_transaction(
        &self,
        transaction_id: Uuid,
        user_id: Uuid,
        status_approve_id: i32,
    ) -> ResultEngine<TransactionRow> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            if status_approve_id != APPROVED && status_approve_id != REJECTED {
                return Err(EngineError::Validation(
                    "status must be Approved or Rejected".to_string(),
                ));
            }
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(transaction_id.to_string()))?;
            if model.status_approve_id != PENDING {
                return Err(EngineError::Validation(
                    "transaction is already resolved".to_string(),
                ));
            }
            let now = Utc::now();
            let update = transactions::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                status_approve_id: ActiveValue::Set(status_approve_id),
                approved_by: ActiveValue::Set(Some(user_id.to_string())),
                approved_at: ActiveValue::Set(Some(now)),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            self.transaction_row(&db_tx, updated).await
        })
    }

    /// Removes a transaction and reverses its effect on the net
    /// amount. History snapshots stay; only the live record goes.
    pub async fn delete_transaction(
        &self,
        transaction_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(transaction_id.to_string()))?;
            self.require_owner_or_admin(&db_tx, &model.created_by, user_id)
                .await?;
            let transaction = Transaction::try_from(model)?;
            self.apply_net_change(&db_tx, -transaction.signed_amount())
                .await?;
            transaction_items::Entity::delete_many()
                .filter(transaction_items::Column::TransactionId.eq(transaction_id.to_string()))
                .exec(&db_tx)
                .await?;
            transaction_files::Entity::delete_many()
                .filter(transaction_files::Column::TransactionId.eq(transaction_id.to_string()))
                .exec(&db_tx)
                .await?;
            transactions::Entity::delete_by_id(transaction_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn transaction_row(
        &self,
        db: &DatabaseTransaction,
        model: transactions::Model,
    ) -> ResultEngine<TransactionRow> {
        let key = model.id.clone();
        self.transaction_rows(db, vec![model])
            .await?
            .pop()
            .ok_or(EngineError::KeyNotFound(key))
    }

    async fn transaction_rows(
        &self,
        db: &DatabaseTransaction,
        models: Vec<transactions::Model>,
    ) -> ResultEngine<Vec<TransactionRow>> {
        let ids: Vec<String> = models.iter().map(|model| model.id.clone()).collect();

        let mut items_by_tx: HashMap<String, Vec<TransactionItem>> = HashMap::new();
        let mut files_by_tx: HashMap<String, Vec<TransactionFile>> = HashMap::new();
        if !ids.is_empty() {
            for model in transaction_items::Entity::find()
                .filter(transaction_items::Column::TransactionId.is_in(ids.clone()))
                .order_by_asc(transaction_items::Column::CreatedAt)
                .all(db)
                .await?
            {
                let key = model.transaction_id.clone();
                items_by_tx
                    .entry(key)
                    .or_default()
                    .push(TransactionItem::try_from(model)?);
            }
            for model in transaction_files::Entity::find()
                .filter(transaction_files::Column::TransactionId.is_in(ids.clone()))
                .order_by_asc(transaction_files::Column::CreatedAt)
                .all(db)
                .await?
            {
                let key = model.transaction_id.clone();
                files_by_tx
                    .entry(key)
                    .or_default()
                    .push(TransactionFile::try_from(model)?);
            }
        }

        let status_ids: Vec<i32> = models.iter().map(|model| model.status_approve_id).collect();
        let mut statuses = HashMap::new();
        if !status_ids.is_empty() {
            for model in status_approves::Entity::find()
                .filter(status_approves::Column::Id.is_in(status_ids))
                .all(db)
                .await?
            {
                statuses.insert(model.id, StatusApprove::from(model));
            }
        }

        let mut user_ids: Vec<String> =
            models.iter().map(|model| model.created_by.clone()).collect();
        user_ids.extend(models.iter().filter_map(|model| model.approved_by.clone()));
        let mut users_by_id = HashMap::new();
        if !user_ids.is_empty() {
            for model in users::Entity::find()
                .filter(users::Column::Id.is_in(user_ids))
                .all(db)
                .await?
            {
                let user = User::try_from(model)?;
                users_by_id.insert(user.id, user);
            }
        }

        let mut rows = Vec::with_capacity(models.len());
        for model in models {
            let raw_id = model.id.clone();
            let mut transaction = Transaction::try_from(model)?;
            transaction.items = items_by_tx.remove(&raw_id).unwrap_or_default();
            transaction.files = files_by_tx.remove(&raw_id).unwrap_or_default();
            let status_approve = statuses.get(&transaction.status_approve_id).cloned();
            let created_by = users_by_id.get(&transaction.created_by).cloned();
            let approved_by = transaction
                .approved_by
                .and_then(|id| users_by_id.get(&id).cloned());
            rows.push(TransactionRow {
                transaction,
                status_approve,
                created_by,
                approved_by,
            });
        }
        Ok(rows)
    }
}

fn build_items(
    transaction_id: Uuid,
    items: &[TransactionItemNew],
) -> ResultEngine<Vec<TransactionItem>> {
    if items.is_empty() {
        return Err(EngineError::Validation(
            "transaction must have at least one item".to_string(),
        ));
    }
    items
        .iter()
        .map(|item| {
            let name = normalize_required_name(&item.name, "item name")?;
            if item.amount <= 0 {
                return Err(EngineError::Validation(format!(
                    "item amount must be positive: {name}"
                )));
            }
            Ok(TransactionItem::new(transaction_id, name, item.amount))
        })
        .collect()
}

fn build_files(
    transaction_id: Uuid,
    files: &[TransactionFileNew],
) -> ResultEngine<Vec<TransactionFile>> {
    files
        .iter()
        .map(|file| {
            let url = normalize_required_name(&file.url, "file url")?;
            let public_id = normalize_required_name(&file.public_id, "file public id")?;
            Ok(TransactionFile::new(transaction_id, url, public_id))
        })
        .collect()
}

async fn insert_items(
    db: &DatabaseTransaction,
    items: &[TransactionItem],
) -> ResultEngine<()> {
    for item in items {
        transaction_items::ActiveModel::from(item).insert(db).await?;
    }
    Ok(())
}

async fn insert_files(
    db: &DatabaseTransaction,
    files: &[TransactionFile],
) -> ResultEngine<()> {
    for file in files {
        transaction_files::ActiveModel::from(file).insert(db).await?;
    }
    Ok(())
}
