//! CLI interface for usergate

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

use crate::auth::Role;

#[derive(Parser)]
#[command(name = "usergate")]
#[command(author = "Krakaw")]
#[command(version)]
#[command(about = "User accounts REST API with JWT authentication", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep users in memory instead of PostgreSQL
        #[arg(long)]
        memory: bool,
    },

    /// Write a default usergate.toml configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Create the users table in the configured database
    Migrate,

    /// Create an administrator account
    CreateAdmin {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted
        #[arg(short, long, env = "USERGATE_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Change the role of an existing user
    SetRole {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, value_parser = parse_role)]
        role: Role,
    },

    /// List registered users
    Users {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

fn parse_role(value: &str) -> Result<Role, String> {
    value.parse()
}
