use engine::{
    APPROVED, ApproveListFilter, CreateApproveListCmd, CreateUserCmd, Engine, EngineError, PENDING,
    REJECTED, Role, UpdateApproveListCmd, User,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

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
async fn create_approve_list_defaults_to_pending() {
    let (engine, _db) = engine_with_db().await;

    let row = engine
        .create_approve_list(CreateApproveListCmd::new(
            "https://erp.example.com/po/12",
            "Purchase order 12",
            "Replacement monitors",
        ))
        .await
        .unwrap();

    assert_eq!(row.approve_list.status_approve_id, PENDING);
    assert_eq!(row.status_approve.unwrap().name, "Pending");
    assert!(row.config.is_none());
    assert!(row.user.is_none());
}

#[tokio::test]
async fn create_approve_list_validates_input_and_refs() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_approve_list(CreateApproveListCmd::new("https://x.example.com", " ", "d"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let missing = Uuid::new_v4();
    let err = engine
        .create_approve_list(
            CreateApproveListCmd::new("https://x.example.com", "t", "d").config_id(missing),
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound(missing.to_string()));

    let err = engine
        .create_approve_list(
            CreateApproveListCmd::new("https://x.example.com", "t", "d").status_approve_id(99),
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("99".to_string()));
}

#[tokio::test]
async fn list_filters_by_user_and_status() {
    let (engine, _db) = engine_with_db().await;
    let owner = seed_user(&engine, "owner@example.com", Role::User).await;

    engine
        .create_approve_list(
            CreateApproveListCmd::new("https://a.example.com", "Mine", "d").user_id(owner.id),
        )
        .await
        .unwrap();
    engine
        .create_approve_list(CreateApproveListCmd::new(
            "https://b.example.com",
            "Unassigned",
            "d",
        ))
        .await
        .unwrap();

    let filter = ApproveListFilter {
        user_id: Some(owner.id),
        ..Default::default()
    };
    let (mine, total) = engine.list_approve_lists(1, 10, &filter).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(mine[0].approve_list.title, "Mine");
    assert_eq!(mine[0].user.as_ref().unwrap().id, owner.id);

    let (for_user, total) = engine
        .list_approve_lists_for_user(owner.id, 1, 10)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(for_user[0].approve_list.title, "Mine");

    let filter = ApproveListFilter {
        status_approve_id: Some(APPROVED),
        ..Default::default()
    };
    let (_, total) = engine.list_approve_lists(1, 10, &filter).await.unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn search_matches_title_detail_and_url() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_approve_list(CreateApproveListCmd::new(
            "https://erp.example.com/po/1",
            "Printer toner",
            "Office supplies",
        ))
        .await
        .unwrap();
    engine
        .create_approve_list(CreateApproveListCmd::new(
            "https://erp.example.com/po/2",
            "Travel request",
            "Conference in Khon Kaen",
        ))
        .await
        .unwrap();

    let filter = ApproveListFilter {
        search: Some("toner".to_string()),
        ..Default::default()
    };
    let (found, total) = engine.list_approve_lists(1, 10, &filter).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].approve_list.title, "Printer toner");

    let filter = ApproveListFilter {
        search: Some("khon kaen".to_string()),
        ..Default::default()
    };
    let (_, total) = engine.list_approve_lists(1, 10, &filter).await.unwrap();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn update_stores_decision_and_resolves_callback() {
    let (engine, _db) = engine_with_db().await;

    let row = engine
        .create_approve_list(
            CreateApproveListCmd::new("https://erp.example.com/po/9", "PO 9", "d")
                .api_path("https://erp.example.com/api/purchase-orders/")
                .id_from("po-9"),
        )
        .await
        .unwrap();

    let (updated, origin) = engine
        .update_approve_list(
            UpdateApproveListCmd::new(row.approve_list.id)
                .status_approve_id(REJECTED)
                .comment("no budget left"),
        )
        .await
        .unwrap();

    assert_eq!(updated.approve_list.status_approve_id, REJECTED);
    assert_eq!(updated.approve_list.comment.as_deref(), Some("no budget left"));

    let origin = origin.unwrap();
    assert_eq!(origin.api_path, "https://erp.example.com/api/purchase-orders/");
    assert_eq!(origin.id_from, "po-9");
    assert_eq!(origin.status_approve_id, REJECTED);
    assert_eq!(origin.comment.as_deref(), Some("no budget left"));
}

#[tokio::test]
async fn update_without_callback_target_skips_it() {
    let (engine, _db) = engine_with_db().await;

    let row = engine
        .create_approve_list(CreateApproveListCmd::new(
            "https://erp.example.com/po/10",
            "PO 10",
            "d",
        ))
        .await
        .unwrap();

    // Nothing stored, nothing in the request: no callback.
    let (_, origin) = engine
        .update_approve_list(
            UpdateApproveListCmd::new(row.approve_list.id).status_approve_id(APPROVED),
        )
        .await
        .unwrap();
    assert!(origin.is_none());

    // Half a target is still no target.
    let (_, origin) = engine
        .update_approve_list(
            UpdateApproveListCmd::new(row.approve_list.id)
                .api_path("https://erp.example.com/api/po/"),
        )
        .await
        .unwrap();
    assert!(origin.is_none());

    // Request values complete the target without being stored.
    let (updated, origin) = engine
        .update_approve_list(
            UpdateApproveListCmd::new(row.approve_list.id)
                .api_path("https://erp.example.com/api/po/")
                .id_from("po-10"),
        )
        .await
        .unwrap();
    assert!(origin.is_some());
    assert!(updated.approve_list.api_path.is_none());
    assert!(updated.approve_list.id_from.is_none());
}

#[tokio::test]
async fn delete_approve_list_removes_it() {
    let (engine, _db) = engine_with_db().await;

    let row = engine
        .create_approve_list(CreateApproveListCmd::new(
            "https://erp.example.com/po/11",
            "PO 11",
            "d",
        ))
        .await
        .unwrap();

    engine
        .delete_approve_list(row.approve_list.id)
        .await
        .unwrap();

    let err = engine
        .approve_list_detail(row.approve_list.id)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound(row.approve_list.id.to_string())
    );

    let err = engine
        .delete_approve_list(row.approve_list.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn pending_excludes_resolved_requests() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .create_approve_list(CreateApproveListCmd::new(
            "https://a.example.com",
            "First",
            "d",
        ))
        .await
        .unwrap();
    engine
        .create_approve_list(CreateApproveListCmd::new(
            "https://b.example.com",
            "Second",
            "d",
        ))
        .await
        .unwrap();

    engine
        .update_approve_list(
            UpdateApproveListCmd::new(first.approve_list.id).status_approve_id(APPROVED),
        )
        .await
        .unwrap();

    let pending = engine.pending_approve_lists().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].approve_list.title, "Second");
}

#[tokio::test]
async fn create_status_approve_appends_beyond_seeds() {
    let (engine, _db) = engine_with_db().await;

    let status = engine.create_status_approve("On hold").await.unwrap();
    assert_eq!(status.id, 4);
    assert_eq!(status.name, "On hold");

    let row = engine
        .create_approve_list(
            CreateApproveListCmd::new("https://erp.example.com/po/12", "PO 12", "d")
                .status_approve_id(status.id),
        )
        .await
        .unwrap();
    assert_eq!(row.status_approve.unwrap().name, "On hold");
}
