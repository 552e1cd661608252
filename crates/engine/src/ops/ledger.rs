use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use super::{Engine, with_tx};
use crate::{
    EngineError, HistoryNetAmount, NET_AMOUNT_ID, NetAmount, ResultEngine, history_net_amounts,
    net_amounts,
};

impl Engine {
    /// Current running balance.
    pub async fn net_amount(&self) -> ResultEngine<NetAmount> {
        with_tx!(self, |db_tx| { self.load_net_amount(&db_tx).await })
    }

    /// Overwrites the net amount with an absolute value. Admin only;
    /// the change is snapshotted like any other.
    pub async fn set_net_amount(&self, user_id: Uuid, amount: i64) -> ResultEngine<NetAmount> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            self.write_net_snapshot(&db_tx, amount).await?;
            self.load_net_amount(&db_tx).await
        })
    }

    /// Net amount snapshots, newest first, with the overall count.
    pub async fn net_amount_history(
        &self,
        page: u64,
        size: u64,
    ) -> ResultEngine<(Vec<HistoryNetAmount>, u64)> {
        with_tx!(self, |db_tx| {
            let query = history_net_amounts::Entity::find();
            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_desc(history_net_amounts::Column::CreatedAt)
                .order_by_desc(history_net_amounts::Column::Id)
                .offset(page.saturating_sub(1) * size)
                .limit(size)
                .all(&db_tx)
                .await?;
            let snapshots = models
                .into_iter()
                .map(HistoryNetAmount::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok((snapshots, total))
        })
    }

    /// Shifts the net amount by `delta` and records the balance after
    /// the change. Runs inside the caller's transaction so the ledger
    /// moves together with the record that caused it.
    pub(super) async fn apply_net_change(
        &self,
        db: &DatabaseTransaction,
        delta: i64,
    ) -> ResultEngine<HistoryNetAmount> {
        let current = self.load_net_amount(db).await?;
        self.write_net_snapshot(db, current.amount + delta).await
    }

    async fn write_net_snapshot(
        &self,
        db: &DatabaseTransaction,
        balance: i64,
    ) -> ResultEngine<HistoryNetAmount> {
        let update = net_amounts::ActiveModel {
            id: ActiveValue::Set(NET_AMOUNT_ID),
            amount: ActiveValue::Set(balance),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        update.update(db).await?;
        let snapshot = HistoryNetAmount::new(balance);
        history_net_amounts::ActiveModel::from(&snapshot)
            .insert(db)
            .await?;
        Ok(snapshot)
    }

    async fn load_net_amount(&self, db: &DatabaseTransaction) -> ResultEngine<NetAmount> {
        net_amounts::Entity::find_by_id(NET_AMOUNT_ID)
            .one(db)
            .await?
            .map(NetAmount::from)
            .ok_or_else(|| EngineError::KeyNotFound(NET_AMOUNT_ID.to_string()))
    }
}
