use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};

const DEFAULT_URL: &str = "sqlite:./kongklang.db?mode=rwc";

async fn run(cmd: &str, db: &DatabaseConnection) -> Result<bool, DbErr> {
    match cmd {
        "up" => Migrator::up(db, None).await?,
        "down" => Migrator::down(db, None).await?,
        "fresh" => Migrator::fresh(db).await?,
        "status" => Migrator::status(db).await?,
        _ => return Ok(false),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), DbErr> {
    let cmd = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());

    let db = Database::connect(&url).await?;
    if !run(&cmd, &db).await? {
        eprintln!("unknown command {cmd:?}; expected up, down, fresh or status");
        std::process::exit(2);
    }

    Ok(())
}
