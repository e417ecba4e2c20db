//! Administer a TShock server through its REST API from the command line.
//!
//! Connection settings come from `TS_REST_API_*` environment variables. Each
//! command prints a `{ code, message, data? }` JSON envelope on stdout; logs
//! go to stderr and honour `RUST_LOG`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ortho_config::OrthoConfig;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use tshock_gateway::config::TShockSettings;
use tshock_gateway::domain::{ResponseMessage, ServerAdminService};
use tshock_gateway::outbound::tshock::TShockHttpClient;

/// `tshock-admin` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "tshock-admin",
    about = "Run administrative commands against a TShock REST API",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Mint a token with the configured credentials.
    Login,
    /// Report the account the session token belongs to.
    TokenTest,
    /// Show server state.
    Status {
        /// Include connected players.
        #[arg(long)]
        players: bool,
        /// Include server rules.
        #[arg(long)]
        rules: bool,
    },
    /// Show the message of the day.
    Motd,
    /// Show the server rules text.
    Rules,
    /// Broadcast a message to every player.
    Broadcast {
        /// Message text.
        message: String,
    },
    /// Run a console command and show its output.
    Exec {
        /// Command text, including the leading slash.
        command: String,
    },
    /// Manage user accounts.
    #[command(subcommand)]
    Users(UsersCommand),
}

#[derive(Debug, Subcommand)]
enum UsersCommand {
    /// List registered accounts.
    List,
    /// Show one account; numeric identifiers are treated as ids.
    Get {
        /// Account name or id.
        identifier: String,
    },
    /// Register an account.
    Create {
        /// Account name.
        name: String,
        /// Initial password.
        password: String,
        /// Permission group.
        #[arg(long)]
        group: Option<String>,
    },
    /// Delete an account; numeric identifiers are treated as ids.
    Remove {
        /// Account name or id.
        identifier: String,
    },
    /// Change password and/or group of an account.
    Save {
        /// Account name or id.
        identifier: String,
        /// Replacement password.
        #[arg(long)]
        password: Option<String>,
        /// Replacement permission group.
        #[arg(long)]
        group: Option<String>,
    },
}

fn main() -> io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;

    let settings = load_settings()?;
    let base_url = settings.base_url().map_err(io::Error::other)?;
    let credentials = settings.credentials().map_err(io::Error::other)?;
    let client = TShockHttpClient::new(base_url, settings.timeout(), credentials.clone())
        .map_err(io::Error::other)?;
    let service = ServerAdminService::new(Arc::new(client), credentials);

    run(&service, args.command).await
}

fn load_settings() -> io::Result<TShockSettings> {
    TShockSettings::load_from_iter([OsString::from("tshock-admin")])
        .map_err(|error| io::Error::other(format!("load TShock settings: {error}")))
}

async fn run(service: &ServerAdminService<TShockHttpClient>, command: Command) -> io::Result<()> {
    match command {
        Command::Login => emit(&ResponseMessage::from_flag(
            service.login().await,
            "login failed",
        )),
        Command::TokenTest => emit(&optional(
            service.verify_token().await,
            "token rejected",
        )),
        Command::Status { players, rules } => emit(&optional(
            service.status(players, rules).await,
            "server status unavailable",
        )),
        Command::Motd => emit(&ResponseMessage::success(service.motd().await)),
        Command::Rules => emit(&ResponseMessage::success(service.rules().await)),
        Command::Broadcast { message } => emit(&ResponseMessage::from_flag(
            service.broadcast(&message).await,
            "broadcast failed",
        )),
        Command::Exec { command: text } => emit(&ResponseMessage::success(
            service.execute_command(&text).await,
        )),
        Command::Users(users) => run_users(service, users).await,
    }
}

async fn run_users(
    service: &ServerAdminService<TShockHttpClient>,
    command: UsersCommand,
) -> io::Result<()> {
    match command {
        UsersCommand::List => emit(&ResponseMessage::success(service.list_users().await)),
        UsersCommand::Get { identifier } => emit(&optional(
            service.get_user(&identifier).await,
            "user not found",
        )),
        UsersCommand::Create {
            name,
            password,
            group,
        } => emit(&ResponseMessage::from_flag(
            service
                .create_user(&name, &password, group.as_deref())
                .await,
            "user not created",
        )),
        UsersCommand::Remove { identifier } => emit(&ResponseMessage::from_flag(
            service.remove_user(&identifier).await,
            "user not removed",
        )),
        UsersCommand::Save {
            identifier,
            password,
            group,
        } => emit(&ResponseMessage::from_flag(
            service
                .save_user(&identifier, password.as_deref(), group.as_deref())
                .await,
            "user not updated",
        )),
    }
}

fn optional<T>(data: Option<T>, failure_message: &str) -> ResponseMessage<T> {
    data.map_or_else(
        || ResponseMessage::failure(failure_message),
        ResponseMessage::success,
    )
}

fn emit<T: Serialize>(envelope: &ResponseMessage<T>) -> io::Result<()> {
    let rendered = serde_json::to_string_pretty(envelope).map_err(io::Error::other)?;
    println!("{rendered}");
    Ok(())
}
