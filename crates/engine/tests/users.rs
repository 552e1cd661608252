use engine::{CreateUserCmd, Engine, EngineError, RegisterUserCmd, Role, SsoUserCmd};
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

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

#[tokio::test]
async fn register_verify_login_roundtrip() {
    let (engine, _db) = engine_with_db().await;

    let (user, otp) = engine
        .register_user(RegisterUserCmd::new(
            "Kai@Example.com",
            "Kai",
            "Prasert",
            "hunter42",
        ))
        .await
        .unwrap();
    assert_eq!(user.email, "kai@example.com");
    assert_eq!(otp.len(), 6);
    assert!(otp.chars().all(|c| c.is_ascii_digit()));
    assert!(user.email_verified_at.is_none());

    let err = engine
        .login_user("kai@example.com", "hunter42")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Forbidden("email not verified".to_string()));

    let verified = engine.verify_otp("kai@example.com", &otp).await.unwrap();
    assert!(verified.email_verified_at.is_some());
    assert!(verified.otp_code.is_none());

    let logged_in = engine
        .login_user("kai@example.com", "hunter42")
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);
    assert_eq!(logged_in.role, Role::User);
}

#[tokio::test]
async fn register_duplicate_email_rejected() {
    let (engine, _db) = engine_with_db().await;

    engine
        .register_user(RegisterUserCmd::new("kai@example.com", "Kai", "P", "pw1234"))
        .await
        .unwrap();
    let err = engine
        .register_user(RegisterUserCmd::new("KAI@example.com", "Other", "P", "pw5678"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("kai@example.com".to_string()));
}

#[tokio::test]
async fn register_rejects_bad_input() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .register_user(RegisterUserCmd::new("not-an-email", "Kai", "P", "pw1234"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .register_user(RegisterUserCmd::new("kai@example.com", "Kai", "P", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn wrong_otp_rejected() {
    let (engine, _db) = engine_with_db().await;

    let (_, otp) = engine
        .register_user(RegisterUserCmd::new("kai@example.com", "Kai", "P", "pw1234"))
        .await
        .unwrap();
    let wrong = if otp == "000000" { "000001" } else { "000000" };

    let err = engine
        .verify_otp("kai@example.com", wrong)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("invalid verification code".to_string())
    );
}

#[tokio::test]
async fn expired_otp_rejected() {
    let (engine, db) = engine_with_db().await;

    let (_, otp) = engine
        .register_user(RegisterUserCmd::new("kai@example.com", "Kai", "P", "pw1234"))
        .await
        .unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE users SET otp_expires_at = ? WHERE email = ?",
        ["2000-01-01 00:00:00".into(), "kai@example.com".into()],
    ))
    .await
    .unwrap();

    let err = engine
        .verify_otp("kai@example.com", &otp)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("verification code expired".to_string())
    );
}

#[tokio::test]
async fn login_with_wrong_password_unauthorized() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_user(CreateUserCmd::new("kai@example.com", "Kai", "P", "pw1234"))
        .await
        .unwrap();

    let err = engine
        .login_user("kai@example.com", "nope")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Unauthorized("invalid email or password".to_string())
    );

    let err = engine
        .login_user("ghost@example.com", "pw1234")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Unauthorized("invalid email or password".to_string())
    );
}

#[tokio::test]
async fn sso_upsert_creates_then_refreshes() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .upsert_sso_user(SsoUserCmd::new("lin@example.com").first_name("Lin"))
        .await
        .unwrap();
    assert!(created.email_verified_at.is_some());
    assert!(created.password.is_none());
    assert_eq!(created.first_name, "Lin");

    let refreshed = engine
        .upsert_sso_user(
            SsoUserCmd::new("lin@example.com")
                .last_name("Chen")
                .avatar("https://cdn.example.com/lin.png"),
        )
        .await
        .unwrap();
    assert_eq!(refreshed.id, created.id);
    assert_eq!(refreshed.first_name, "Lin");
    assert_eq!(refreshed.last_name, "Chen");
    assert_eq!(
        refreshed.avatar.as_deref(),
        Some("https://cdn.example.com/lin.png")
    );

    // SSO users can never log in with a password.
    let err = engine
        .login_user("lin@example.com", "anything")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Unauthorized("invalid email or password".to_string())
    );
}

#[tokio::test]
async fn set_user_role_promotes_account() {
    let (engine, _db) = engine_with_db().await;

    let user = engine
        .create_user(CreateUserCmd::new("kai@example.com", "Kai", "P", "pw1234"))
        .await
        .unwrap();
    assert_eq!(user.role, Role::User);

    let promoted = engine
        .set_user_role("kai@example.com", Role::Admin)
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::Admin);

    let reloaded = engine.find_user(user.id).await.unwrap();
    assert_eq!(reloaded.role, Role::Admin);
}

#[tokio::test]
async fn set_user_role_unknown_email_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .set_user_role("ghost@example.com", Role::Admin)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("ghost@example.com".to_string())
    );
}

#[tokio::test]
async fn create_user_is_verified_and_unique() {
    let (engine, _db) = engine_with_db().await;

    let admin = engine
        .create_user(CreateUserCmd::new("boss@example.com", "Boss", "K", "pw1234").role(Role::Admin))
        .await
        .unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert!(admin.email_verified_at.is_some());

    engine
        .login_user("boss@example.com", "pw1234")
        .await
        .unwrap();

    let err = engine
        .create_user(CreateUserCmd::new("boss@example.com", "Again", "K", "pw5678"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("boss@example.com".to_string()));
}

#[tokio::test]
async fn user_by_email_normalizes_and_misses_cleanly() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_user(CreateUserCmd::new("kai@example.com", "Kai", "P", "pw1234"))
        .await
        .unwrap();

    let found = engine.user_by_email(" KAI@example.com ").await.unwrap();
    assert_eq!(found.id, created.id);

    let err = engine.user_by_email("ghost@example.com").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("ghost@example.com".to_string())
    );
}
