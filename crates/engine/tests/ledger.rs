use engine::{
    APPROVED, CreateTransactionCmd, CreateUserCmd, Engine, EngineError, Role, TransactionKind,
    UpdateTransactionCmd, User,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn seed_user(engine: &Engine, email: &str, role: Role) -> User {
    engine
        .create_user(CreateUserCmd::new(email, "Test", "User", "pw1234").role(role))
        .await
        .unwrap()
}

#[tokio::test]
async fn net_amount_starts_at_zero() {
    let (engine, _db) = engine_with_db().await;

    let net = engine.net_amount().await.unwrap();
    assert_eq!(net.amount, 0);

    let (history, total) = engine.net_amount_history(1, 10).await.unwrap();
    assert_eq!(total, 0);
    assert!(history.is_empty());
}

#[tokio::test]
async fn set_net_amount_is_admin_only_and_snapshotted() {
    let (engine, _db) = engine_with_db().await;
    let user = seed_user(&engine, "user@example.com", Role::User).await;
    let admin = seed_user(&engine, "admin@example.com", Role::Admin).await;

    let err = engine.set_net_amount(user.id, 1_000).await.unwrap_err();
    assert_eq!(err, EngineError::Forbidden("admin role required".to_string()));

    let net = engine.set_net_amount(admin.id, 1_000).await.unwrap();
    assert_eq!(net.amount, 1_000);

    let (history, total) = engine.net_amount_history(1, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(history[0].amount, 1_000);
}

#[tokio::test]
async fn expense_lifecycle_moves_net_and_back() {
    let (engine, _db) = engine_with_db().await;
    let owner = seed_user(&engine, "owner@example.com", Role::User).await;
    let admin = seed_user(&engine, "admin@example.com", Role::Admin).await;

    engine.set_net_amount(admin.id, 1_000).await.unwrap();

    // Creating an expense of 200 drops the balance right away.
    let row = engine
        .create_transaction(
            CreateTransactionCmd::new("Supplies", TransactionKind::Expense, owner.id)
                .item("Paper", 120)
                .item("Pens", 80),
        )
        .await
        .unwrap();
    assert_eq!(engine.net_amount().await.unwrap().amount, 800);

    // Shrinking the expense to 150 gives 50 back.
    engine
        .update_transaction(
            UpdateTransactionCmd::new(
                row.transaction.id,
                owner.id,
                "Supplies",
                TransactionKind::Expense,
            )
            .item("Paper", 150),
        )
        .await
        .unwrap();
    assert_eq!(engine.net_amount().await.unwrap().amount, 850);

    // Deleting reverses what is left of the expense.
    engine
        .delete_transaction(row.transaction.id, owner.id)
        .await
        .unwrap();
    assert_eq!(engine.net_amount().await.unwrap().amount, 1_000);

    // One snapshot per change: set, create, update, delete.
    let (history, total) = engine.net_amount_history(1, 10).await.unwrap();
    assert_eq!(total, 4);
    let amounts: Vec<i64> = history.iter().map(|entry| entry.amount).collect();
    assert_eq!(amounts, [1_000, 850, 800, 1_000]);
}

#[tokio::test]
async fn income_raises_the_net_amount() {
    let (engine, _db) = engine_with_db().await;
    let owner = seed_user(&engine, "owner@example.com", Role::User).await;

    engine
        .create_transaction(
            CreateTransactionCmd::new("Donation", TransactionKind::Income, owner.id)
                .item("Sponsor", 500),
        )
        .await
        .unwrap();

    assert_eq!(engine.net_amount().await.unwrap().amount, 500);
}

#[tokio::test]
async fn approval_never_touches_the_net_amount() {
    let (engine, _db) = engine_with_db().await;
    let owner = seed_user(&engine, "owner@example.com", Role::User).await;
    let admin = seed_user(&engine, "admin@example.com", Role::Admin).await;

    let row = engine
        .create_transaction(
            CreateTransactionCmd::new("Supplies", TransactionKind::Expense, owner.id)
                .item("Paper", 200),
        )
        .await
        .unwrap();
    assert_eq!(engine.net_amount().await.unwrap().amount, -200);
    let (_, snapshots_before) = engine.net_amount_history(1, 10).await.unwrap();

    engine
        .approve_transaction(row.transaction.id, admin.id, APPROVED)
        .await
        .unwrap();

    assert_eq!(engine.net_amount().await.unwrap().amount, -200);
    let (_, snapshots_after) = engine.net_amount_history(1, 10).await.unwrap();
    assert_eq!(snapshots_before, snapshots_after);
}

#[tokio::test]
async fn unchanged_update_still_writes_one_snapshot() {
    let (engine, _db) = engine_with_db().await;
    let owner = seed_user(&engine, "owner@example.com", Role::User).await;

    let row = engine
        .create_transaction(
            CreateTransactionCmd::new("Supplies", TransactionKind::Expense, owner.id)
                .item("Paper", 200),
        )
        .await
        .unwrap();

    engine
        .update_transaction(
            UpdateTransactionCmd::new(
                row.transaction.id,
                owner.id,
                "Supplies (retitled)",
                TransactionKind::Expense,
            )
            .item("Paper", 200),
        )
        .await
        .unwrap();

    let (history, total) = engine.net_amount_history(1, 10).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(history[0].amount, -200);
    assert_eq!(history[1].amount, -200);
}

#[tokio::test]
async fn history_paginates_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let admin = seed_user(&engine, "admin@example.com", Role::Admin).await;

    for amount in [100, 200, 300] {
        engine.set_net_amount(admin.id, amount).await.unwrap();
    }

    let (page_one, total) = engine.net_amount_history(1, 2).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(page_one.len(), 2);
    assert_eq!(page_one[0].amount, 300);

    let (page_two, _) = engine.net_amount_history(2, 2).await.unwrap();
    assert_eq!(page_two.len(), 1);
    assert_eq!(page_two[0].amount, 100);
}
