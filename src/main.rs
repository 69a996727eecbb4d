use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use usergate::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "usergate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, memory } => cli::commands::serve(host, port, memory).await,
        Commands::Init { force } => cli::commands::init(force).await,
        Commands::Migrate => cli::commands::migrate().await,
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => cli::commands::create_admin(&name, &email, password).await,
        Commands::SetRole { email, role } => cli::commands::set_role(&email, role).await,
        Commands::Users { format } => cli::commands::users(format).await,
    }
}
