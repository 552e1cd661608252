//! Engine rows mapped onto the wire types.

use api_types::{
    approval::{ApproveListView, StatusApproveView},
    config::{ConfigTypeView, ConfigView},
    ledger::{HistoryNetAmountView, NetAmountView},
    transaction::{FileView, ItemView, TransactionKind as ApiKind, TransactionView},
    user::UserView,
};
use engine::{
    ApproveList, ApproveListRow, Config, ConfigRow, ConfigType, HistoryNetAmount, NetAmount,
    StatusApprove, Transaction, TransactionFile, TransactionItem, TransactionRow, User,
};

pub(crate) fn kind_to_api(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Income => ApiKind::Income,
    }
}

pub(crate) fn kind_to_engine(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Expense => engine::TransactionKind::Expense,
        ApiKind::Income => engine::TransactionKind::Income,
    }
}

pub(crate) fn user_view(user: &User) -> UserView {
    UserView {
        id: user.id,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        avatar: user.avatar.clone(),
        role: user.role.as_str().to_string(),
        email_verified: user.email_verified_at.is_some(),
    }
}

pub(crate) fn status_view(status: StatusApprove) -> StatusApproveView {
    StatusApproveView {
        id: status.id,
        name: status.name,
    }
}

pub(crate) fn config_type_view(config_type: ConfigType) -> ConfigTypeView {
    ConfigTypeView {
        id: config_type.id,
        name: config_type.name,
    }
}

pub(crate) fn config_view(row: ConfigRow) -> ConfigView {
    let ConfigRow {
        config,
        config_type,
    } = row;
    let Config {
        id,
        name,
        created_at,
        updated_at,
        ..
    } = config;

    ConfigView {
        id,
        name,
        config_type: config_type.map(config_type_view),
        created_at,
        updated_at,
    }
}

pub(crate) fn approve_list_view(row: ApproveListRow) -> ApproveListView {
    let ApproveListRow {
        approve_list,
        status_approve,
        config,
        user,
    } = row;
    let ApproveList {
        id,
        url,
        title,
        detail,
        comment,
        id_from,
        api_path,
        created_at,
        updated_at,
        ..
    } = approve_list;

    ApproveListView {
        id,
        url,
        title,
        detail,
        comment,
        id_from,
        api_path,
        status_approve: status_approve.map(status_view),
        config: config.map(config_view),
        user: user.as_ref().map(user_view),
        created_at,
        updated_at,
    }
}

pub(crate) fn transaction_view(row: TransactionRow) -> TransactionView {
    let TransactionRow {
        transaction,
        status_approve,
        created_by,
        approved_by,
    } = row;
    let Transaction {
        id,
        title,
        note,
        kind,
        amount,
        approved_at,
        items,
        files,
        created_at,
        updated_at,
        ..
    } = transaction;

    TransactionView {
        id,
        title,
        note,
        kind: kind_to_api(kind),
        amount,
        status_approve: status_approve.map(status_view),
        created_by: created_by.as_ref().map(user_view),
        approved_by: approved_by.as_ref().map(user_view),
        approved_at,
        items: items.into_iter().map(item_view).collect(),
        files: files.into_iter().map(file_view).collect(),
        created_at,
        updated_at,
    }
}

fn item_view(item: TransactionItem) -> ItemView {
    ItemView {
        id: item.id,
        name: item.name,
        amount: item.amount,
    }
}

fn file_view(file: TransactionFile) -> FileView {
    FileView {
        id: file.id,
        url: file.url,
        public_id: file.public_id,
    }
}

pub(crate) fn net_amount_view(net_amount: NetAmount) -> NetAmountView {
    NetAmountView {
        id: net_amount.id,
        amount: net_amount.amount,
        updated_at: net_amount.updated_at,
    }
}

pub(crate) fn history_view(snapshot: HistoryNetAmount) -> HistoryNetAmountView {
    HistoryNetAmountView {
        id: snapshot.id,
        net_amount_id: snapshot.net_amount_id,
        amount: snapshot.amount,
        created_at: snapshot.created_at,
    }
}
