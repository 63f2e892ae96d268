mod prompt;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, Role};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "courier_admin")]
#[command(about = "Admin utilities for the courier backend (users, ledger maintenance)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./courier.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Customers(Customers),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    /// `admin` or `employee`.
    #[arg(long, default_value = "employee", value_parser = parse_role)]
    role: Role,
}

#[derive(Args, Debug)]
struct Customers {
    #[command(subcommand)]
    command: CustomersCommand,
}

#[derive(Subcommand, Debug)]
enum CustomersCommand {
    /// Link orders with a free-text sender to the matching customer.
    LinkOrders,
    /// Recompute the counters and the balance of a customer from its orders.
    Rebuild(RebuildArgs),
}

#[derive(Args, Debug)]
struct RebuildArgs {
    #[arg(long)]
    id: Uuid,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::try_from(raw).map_err(|err| err.to_string())
}

async fn connect_db(
    database_url: &str,
) -> CliResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt::new_password(&args.username)?;
            let user = engine
                .create_user(&args.username, &password, args.role)
                .await?;
            println!("created user: {} ({})", user.username, user.role);
        }
        Command::Customers(Customers {
            command: CustomersCommand::LinkOrders,
        }) => {
            let linked = engine.link_orders_to_customers().await?;
            println!("linked orders: {linked}");
        }
        Command::Customers(Customers {
            command: CustomersCommand::Rebuild(args),
        }) => {
            let customer = engine.rebuild_customer_ledger(args.id).await?;
            println!(
                "rebuilt customer {}: balance {} over {} orders",
                customer.name, customer.balance_minor, customer.total_orders
            );
        }
    }

    Ok(())
}
