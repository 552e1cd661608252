use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "kongklang={level},server={level},engine={level},integrations={level}",
            level = settings.app.level
        ))
        .init();

    let clients = build_integrations(&settings)?;

    if let Some(server) = settings.server {
        tasks.spawn(async move {
            tracing::info!("Found server settings...");
            let db = match parse_database(&server.database).await {
                Ok(db) => db,
                Err(err) => {
                    tracing::error!("failed to initialize database: {err}");
                    return;
                }
            };

            let engine = match engine::Engine::builder().database(db).build().await {
                Ok(engine) => engine,
                Err(err) => {
                    tracing::error!("failed to build engine from database: {err}");
                    return;
                }
            };
            let auth = server::AuthConfig {
                jwt_secret: server.jwt_secret,
                api_key: server.api_key,
            };
            let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
            let addr = format!("{}:{}", bind, server.port);
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("failed to bind server listener: {err}");
                    return;
                }
            };
            if let Err(err) = server::run_with_listener(engine, clients, auth, listener).await {
                tracing::error!("server failed: {err}");
            }
        });
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

/// Builds the integration clients for the settings sections that are
/// present; everything else stays [`None`] and the matching endpoints
/// answer with a configuration error.
fn build_integrations(
    settings: &settings::Settings,
) -> Result<integrations::Integrations, integrations::IntegrationError> {
    let mut clients = integrations::Integrations::new();

    if let Some(storage) = &settings.storage {
        let mut client = integrations::StorageClient::new(
            &storage.cloud_name,
            &storage.api_key,
            &storage.api_secret,
        );
        if let Some(folder) = &storage.folder {
            client = client.folder(folder);
        }
        clients.storage = Some(client);
    }

    if let Some(ocr) = &settings.ocr {
        let mut client = integrations::OcrClient::new(&ocr.api_key);
        if let Some(base_url) = &ocr.base_url {
            client = client.base_url(base_url);
        }
        clients.ocr = Some(client);
    }

    if let Some(chat) = &settings.chat {
        clients.chat = Some(integrations::ChatClient::new(
            &chat.webhook_url,
            &chat.token,
        ));
    }

    if let Some(mail) = &settings.mail {
        clients.mail = Some(integrations::Mailer::new(
            &mail.host,
            mail.port,
            mail.username.clone(),
            mail.password.clone(),
            &mail.from,
        )?);
    }

    Ok(clients)
}
