pub mod cli;
pub mod toml_config;

pub use toml_config::{AppConfig, LoginExpiredMode, Preferences};

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "runkang-admin")]
#[command(about = "Command-line console for the maternity center management API")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "runkang.toml")]
    pub config: PathBuf,

    /// Override the API base URL
    #[arg(long, env = "RUNKANG_API_URL")]
    pub api_url: Option<String>,

    /// Override the session directory
    #[arg(long)]
    pub session_dir: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        branch_id: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "RUNKANG_PASSWORD")]
        password: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Change the password of the signed-in user
    ChangePassword {
        #[arg(long)]
        old_password: String,
        #[arg(long)]
        new_password: String,
    },
    /// Print the route tree built from the backend menus
    Menus,
    /// Run the access guard for a route, e.g. `navigate /customer?id=1`
    Navigate { path: String },
    /// List all branches
    Branches,
    /// List records of an entity
    List {
        entity: String,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "20")]
        size: u32,
        #[arg(long)]
        order_by: Option<String>,
        #[arg(long)]
        asc: bool,
        /// Extra query filters, e.g. --filter CustomerName=王
        #[arg(long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,
    },
    /// Show one record
    Get { entity: String, id: String },
    /// Create a record from a JSON file
    Create {
        entity: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Update a record from a JSON file (id inside the body)
    Update {
        entity: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a record
    Delete { entity: String, id: String },
    /// Assign a sales lead to an employee
    AssignLead {
        id: String,
        #[arg(long)]
        employee_id: String,
    },
    /// Convert a sales lead into a customer
    ConvertLead {
        id: String,
        #[arg(long)]
        branch_id: Option<String>,
    },
}

#[cfg(feature = "cli")]
fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}
