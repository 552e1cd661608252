//! Initial schema migration - creates all tables from scratch.
//!
//! Complete schema for the approval and expense backend:
//!
//! - `users`: accounts, credentials and OTP state
//! - `status_approves`: approval status lookup (seeded)
//! - `config_types` / `configs`: origin-system configuration
//! - `approve_lists`: approval requests pushed by origin systems
//! - `transactions`: expense/income records awaiting approval
//! - `transaction_items`: line items summing to the transaction amount
//! - `transaction_files`: uploaded receipt references
//! - `net_amounts`: the central fund balance (single seeded row)
//! - `history_net_amounts`: append-only balance snapshots

use sea_orm::{ConnectionTrait, Statement};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    Password,
    Avatar,
    Role,
    OtpCode,
    OtpExpiresAt,
    EmailVerifiedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StatusApproves {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ConfigTypes {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Configs {
    Table,
    Id,
    Name,
    ConfigTypeId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ApproveLists {
    Table,
    Id,
    Url,
    Title,
    Detail,
    Comment,
    IdFrom,
    ApiPath,
    StatusApproveId,
    ConfigId,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum NetAmounts {
    Table,
    Id,
    Amount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum HistoryNetAmounts {
    Table,
    Id,
    NetAmountId,
    Amount,
    CreatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Title,
    Note,
    Kind,
    Amount,
    StatusApproveId,
    CreatedBy,
    ApprovedBy,
    ApprovedAt,
    HistoryNetAmountId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TransactionItems {
    Table,
    Id,
    TransactionId,
    Name,
    Amount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TransactionFiles {
    Table,
    Id,
    TransactionId,
    Url,
    PublicId,
    CreatedAt,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::Password).string())
                    .col(ColumnDef::new(Users::Avatar).string())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("user"),
                    )
                    .col(ColumnDef::new(Users::OtpCode).string())
                    .col(ColumnDef::new(Users::OtpExpiresAt).timestamp())
                    .col(ColumnDef::new(Users::EmailVerifiedAt).timestamp())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-email-unique")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Status approves
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(StatusApproves::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StatusApproves::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StatusApproves::Name).string().not_null())
                    .col(
                        ColumnDef::new(StatusApproves::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StatusApproves::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Config types
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ConfigTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConfigTypes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ConfigTypes::Name).string().not_null())
                    .col(
                        ColumnDef::new(ConfigTypes::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConfigTypes::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-config_types-name-unique")
                    .table(ConfigTypes::Table)
                    .col(ConfigTypes::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Configs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Configs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Configs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Configs::Name).string().not_null())
                    .col(ColumnDef::new(Configs::ConfigTypeId).string().not_null())
                    .col(ColumnDef::new(Configs::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Configs::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-configs-config_type_id")
                            .from(Configs::Table, Configs::ConfigTypeId)
                            .to(ConfigTypes::Table, ConfigTypes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-configs-config_type_id")
                    .table(Configs::Table)
                    .col(Configs::ConfigTypeId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Approve lists
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ApproveLists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApproveLists::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApproveLists::Url).string().not_null())
                    .col(ColumnDef::new(ApproveLists::Title).string().not_null())
                    .col(ColumnDef::new(ApproveLists::Detail).string().not_null())
                    .col(ColumnDef::new(ApproveLists::Comment).string())
                    .col(ColumnDef::new(ApproveLists::IdFrom).string())
                    .col(ColumnDef::new(ApproveLists::ApiPath).string())
                    .col(
                        ColumnDef::new(ApproveLists::StatusApproveId)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(ApproveLists::ConfigId).string())
                    .col(ColumnDef::new(ApproveLists::UserId).string())
                    .col(
                        ColumnDef::new(ApproveLists::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApproveLists::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-approve_lists-status_approve_id")
                            .from(ApproveLists::Table, ApproveLists::StatusApproveId)
                            .to(StatusApproves::Table, StatusApproves::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-approve_lists-config_id")
                            .from(ApproveLists::Table, ApproveLists::ConfigId)
                            .to(Configs::Table, Configs::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-approve_lists-user_id")
                            .from(ApproveLists::Table, ApproveLists::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-approve_lists-user_id")
                    .table(ApproveLists::Table)
                    .col(ApproveLists::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-approve_lists-status_approve_id")
                    .table(ApproveLists::Table)
                    .col(ApproveLists::StatusApproveId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Net amounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(NetAmounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NetAmounts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NetAmounts::Amount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(NetAmounts::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(NetAmounts::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. History net amounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(HistoryNetAmounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HistoryNetAmounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HistoryNetAmounts::NetAmountId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HistoryNetAmounts::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HistoryNetAmounts::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-history_net_amounts-net_amount_id")
                            .from(HistoryNetAmounts::Table, HistoryNetAmounts::NetAmountId)
                            .to(NetAmounts::Table, NetAmounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-history_net_amounts-created_at")
                    .table(HistoryNetAmounts::Table)
                    .col(HistoryNetAmounts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::Title).string().not_null())
                    .col(ColumnDef::new(Transactions::Note).string())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::StatusApproveId)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Transactions::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Transactions::ApprovedBy).string())
                    .col(ColumnDef::new(Transactions::ApprovedAt).timestamp())
                    .col(ColumnDef::new(Transactions::HistoryNetAmountId).string())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-status_approve_id")
                            .from(Transactions::Table, Transactions::StatusApproveId)
                            .to(StatusApproves::Table, StatusApproves::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-created_by")
                            .from(Transactions::Table, Transactions::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-approved_by")
                            .from(Transactions::Table, Transactions::ApprovedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-history_net_amount_id")
                            .from(Transactions::Table, Transactions::HistoryNetAmountId)
                            .to(HistoryNetAmounts::Table, HistoryNetAmounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-created_by")
                    .table(Transactions::Table)
                    .col(Transactions::CreatedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-status_approve_id")
                    .table(Transactions::Table)
                    .col(Transactions::StatusApproveId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-created_at")
                    .table(Transactions::Table)
                    .col(Transactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Transaction items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TransactionItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransactionItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::TransactionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransactionItems::Name).string().not_null())
                    .col(
                        ColumnDef::new(TransactionItems::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transaction_items-transaction_id")
                            .from(TransactionItems::Table, TransactionItems::TransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transaction_items-transaction_id")
                    .table(TransactionItems::Table)
                    .col(TransactionItems::TransactionId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 10. Transaction files
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TransactionFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransactionFiles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TransactionFiles::TransactionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransactionFiles::Url).string().not_null())
                    .col(
                        ColumnDef::new(TransactionFiles::PublicId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionFiles::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionFiles::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transaction_files-transaction_id")
                            .from(TransactionFiles::Table, TransactionFiles::TransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transaction_files-transaction_id")
                    .table(TransactionFiles::Table)
                    .col(TransactionFiles::TransactionId)
                    .to_owned(),
            )
            .await?;

        seed_defaults(manager).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(TransactionFiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TransactionItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HistoryNetAmounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NetAmounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ApproveLists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Configs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConfigTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StatusApproves::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

/// Seeds the approval status lookup and the single fund balance row.
async fn seed_defaults(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let db = manager.get_connection();
    let backend = db.get_database_backend();

    for (id, name) in [(1, "Pending"), (2, "Approved"), (3, "Rejected")] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO status_approves (id, name, created_at, updated_at) \
             VALUES (?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP);",
            [id.into(), name.into()],
        ))
        .await?;
    }

    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO net_amounts (id, amount, created_at, updated_at) \
         VALUES (?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP);",
        [1.into(), 0i64.into()],
    ))
    .await?;

    Ok(())
}
