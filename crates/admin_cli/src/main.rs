use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{CreateUserCmd, Engine, EngineError, Role};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};

mod prompt;

#[derive(Parser, Debug)]
#[command(name = "kongklang_admin")]
#[command(about = "Admin utilities for Kongklang (bootstrap accounts, seed the balance)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./kongklang.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    NetAmount(NetAmount),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a verified account, prompting for its password.
    Create(UserCreateArgs),
    /// Give an existing account the admin role.
    Promote(UserPromoteArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    /// Create the account with the admin role.
    #[arg(long)]
    admin: bool,
}

#[derive(Args, Debug)]
struct UserPromoteArgs {
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct NetAmount {
    #[command(subcommand)]
    command: NetAmountCommand,
}

#[derive(Subcommand, Debug)]
enum NetAmountCommand {
    /// Overwrite the running balance with an absolute value.
    Set(NetAmountSetArgs),
}

#[derive(Args, Debug)]
struct NetAmountSetArgs {
    /// New balance in minor units.
    #[arg(long, allow_negative_numbers = true)]
    amount: i64,
    /// Email of the admin account authorizing the change.
    #[arg(long)]
    by: String,
}

async fn open_database(url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = open_database(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt::password_confirmed()?;

            let mut cmd =
                CreateUserCmd::new(&args.email, &args.first_name, &args.last_name, password);
            if args.admin {
                cmd = cmd.role(Role::Admin);
            }

            match engine.create_user(cmd).await {
                Ok(user) => println!("created user: {} ({})", user.email, user.id),
                Err(EngineError::ExistingKey(email)) => {
                    eprintln!("user already exists: {email}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::User(User {
            command: UserCommand::Promote(args),
        }) => match engine.set_user_role(&args.email, Role::Admin).await {
            Ok(user) => println!("promoted to admin: {}", user.email),
            Err(EngineError::KeyNotFound(email)) => {
                eprintln!("user not found: {email}");
                std::process::exit(1);
            }
            Err(err) => return Err(err.into()),
        },
        Command::NetAmount(NetAmount {
            command: NetAmountCommand::Set(args),
        }) => {
            let user = match engine.user_by_email(&args.by).await {
                Ok(user) => user,
                Err(EngineError::KeyNotFound(email)) => {
                    eprintln!("user not found: {email}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };

            match engine.set_net_amount(user.id, args.amount).await {
                Ok(net) => println!("net amount set to {}", net.amount),
                Err(EngineError::Forbidden(_)) => {
                    eprintln!("{} is not an admin; promote the account first", user.email);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(())
}
