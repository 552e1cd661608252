//! Business rules for the approval and expense tracking backend.
//!
//! The [`Engine`] wraps a SeaORM database connection and exposes each
//! operation as an async method. Every operation runs inside a single
//! database transaction, so a failed step never leaves partial state
//! behind. Domain types (`User`, `Transaction`, ...) use native ids
//! and timestamps; the row models they convert from stay private.

pub use approve_lists::ApproveList;
pub use commands::{
    CreateApproveListCmd, CreateTransactionCmd, CreateUserCmd, RegisterUserCmd, SsoUserCmd,
    TransactionFileNew, TransactionItemNew, UpdateApproveListCmd, UpdateTransactionCmd,
};
pub use config_types::ConfigType;
pub use configs::Config;
pub use error::EngineError;
pub use history_net_amounts::HistoryNetAmount;
pub use net_amounts::{NET_AMOUNT_ID, NetAmount};
pub use ops::{
    ApproveListFilter, ApproveListRow, ConfigFilter, ConfigRow, Engine, EngineBuilder,
    OriginUpdate, TransactionFilter, TransactionRow,
};
pub use status_approves::{APPROVED, PENDING, REJECTED, StatusApprove};
pub use transaction_files::TransactionFile;
pub use transaction_items::TransactionItem;
pub use transactions::{Transaction, TransactionKind};
pub use users::{Role, User};

mod approve_lists;
mod commands;
mod config_types;
mod configs;
mod error;
mod history_net_amounts;
mod net_amounts;
mod ops;
mod status_approves;
mod transaction_files;
mod transaction_items;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
