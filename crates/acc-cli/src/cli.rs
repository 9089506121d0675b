//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use acc_core::Region;

use crate::commands::auth::AuthCommand;
use crate::commands::cost::CostCommand;
use crate::commands::docs::DocsCommand;
use crate::commands::hubs::HubsCommand;
use crate::commands::phase::PhaseCommand;
use crate::commands::timesheets::TimesheetsCommand;

/// Autodesk Construction Cloud command-line client.
#[derive(Parser, Debug)]
#[command(name = "acc")]
#[command(author, version = env!("ACC_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Directory for stored credentials and phase data
    #[arg(long, env = "ACC_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Registered application and gateway settings.
#[derive(Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// Application client id
    #[arg(long, env = "ACC_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// Application client secret
    #[arg(long, env = "ACC_CLIENT_SECRET", hide_env_values = true, global = true)]
    pub client_secret: Option<String>,

    /// OAuth redirect URI registered for the application
    #[arg(long, env = "ACC_REDIRECT_URI", global = true)]
    pub redirect_uri: Option<String>,

    /// API gateway base URL
    #[arg(long, env = "ACC_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Region for commands that are not scoped to a hub (US, EMEA, AUS, APAC)
    #[arg(long, env = "ACC_REGION", global = true)]
    pub region: Option<Region>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign-in and token management
    Auth(AuthCommand),

    /// Hubs, projects and regions
    Hubs(HubsCommand),

    /// Cost management records
    Cost(CostCommand),

    /// Cost management timesheets
    Timesheets(TimesheetsCommand),

    /// Document search and downloads
    Docs(DocsCommand),

    /// Local project phase tracking
    Phase(PhaseCommand),
}
