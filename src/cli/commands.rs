//! CLI command implementations

use anyhow::{bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, Password};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::api;
use crate::auth::{PasswordHasher, Role};
use crate::cli::{error, info, print_user_table, success, warn, OutputFormat};
use crate::config::{self, loader::CONFIG_FILENAME, Config};
use crate::services::UserService;
use crate::store::{MemoryStore, PostgresStore, UserStore};

/// Start the HTTP API server
pub async fn serve(host: Option<String>, port: Option<u16>, memory: bool) -> Result<()> {
    let mut config = config::load_config()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate(!memory)?;

    let store: Arc<dyn UserStore> = if memory {
        warn("Using the in-memory store; users are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(connect(&config).await?)
    };

    info(&format!(
        "Starting API server on http://{}:{}",
        config.server.host, config.server.port
    ));
    api::run_server(config, store).await?;
    Ok(())
}

/// Write a default usergate.toml configuration file
pub async fn init(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() && !force {
        warn(&format!("{} already exists (use --force to overwrite)", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Set JWT_SECRET and DATABASE_URL, then run 'usergate migrate'");
    Ok(())
}

/// Create the users table
pub async fn migrate() -> Result<()> {
    let config = config::load_config()?;
    let store = connect(&config).await?;

    store.migrate().await.context("Migration failed")?;

    success("Database schema is up to date");
    Ok(())
}

/// Create an administrator account
pub async fn create_admin(name: &str, email: &str, password: Option<String>) -> Result<()> {
    let config = config::load_config()?;
    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Admin password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let users = user_service(&config).await?;
    match users.create_admin(name, email, &password).await {
        Ok(user) => {
            success(&format!("Created admin {} (id {})", user.email, user.id));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to create admin: {}", e));
            Err(e.into())
        }
    }
}

/// Change the role of an existing user
pub async fn set_role(email: &str, role: Role) -> Result<()> {
    let config = config::load_config()?;
    let users = user_service(&config).await?;

    let user = users.set_role(email, role).await?;
    success(&format!("{} is now {}", user.email, user.role));
    Ok(())
}

/// List registered users
pub async fn users(format: OutputFormat) -> Result<()> {
    let config = config::load_config()?;
    let users = user_service(&config).await?.list().await?;

    match format {
        OutputFormat::Table => print_user_table(&users),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&users)?),
    }
    Ok(())
}

async fn connect(config: &Config) -> Result<PostgresStore> {
    if config.database.url.trim().is_empty() {
        bail!("No database configured. Set DATABASE_URL or database.url in {}", CONFIG_FILENAME);
    }
    PostgresStore::connect(&config.database.url)
        .await
        .context("Failed to connect to PostgreSQL")
}

async fn user_service(config: &Config) -> Result<UserService> {
    let store = connect(config).await?;
    Ok(UserService::new(
        Arc::new(store),
        PasswordHasher::new(config.auth.bcrypt_cost),
    ))
}
