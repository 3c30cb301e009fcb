//! comanda - command line front end for the restaurant backend
//!
//! Every invocation signs in, loads the catalog and open tabs, runs one
//! command and prints the resulting view.

mod logger;
mod render;

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use comanda_client::{
    Action, AppStore, Category, ClientConfig, ClientResult, ItemStatus, MenuItemForm, Outcome,
    Platform, alert_message,
};
use shared::input;

#[derive(Parser)]
#[command(name = "comanda")]
#[command(about = "Restaurant tabs, menu and kitchen board")]
#[command(
    after_help = "Environment (flags win):\n  COMANDA_PLATFORM           web, android, ios or desktop\n  COMANDA_API_URL            Backend base URL\n  COMANDA_TIMEOUT_SECS       Request timeout\n  COMANDA_FETCH_CLOSED_TABS  Also load closed tabs (1/true/yes/on)\n  COMANDA_EMAIL              Login email\n  COMANDA_PASSWORD           Login password\n  RUST_LOG                   Log filter override"
)]
struct Cli {
    /// Backend base URL; defaults to the platform address
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// web, android, ios or desktop
    #[arg(long, global = true)]
    platform: Option<Platform>,

    #[arg(long, global = true, env = "COMANDA_EMAIL")]
    email: Option<String>,

    #[arg(long, global = true, env = "COMANDA_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print views as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[arg(long, global = true, env = "COMANDA_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Also write JSON logs to a daily file in this directory
    #[arg(long, global = true, env = "COMANDA_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account, then sign in with it
    Register {
        name: String,
    },
    Menu {
        #[command(subcommand)]
        command: MenuCommand,
    },
    Tabs {
        #[command(subcommand)]
        command: TabCommand,
    },
    /// Kitchen and bar production board
    Board,
    /// Sales over closed tabs
    Report,
}

#[derive(Subcommand)]
enum MenuCommand {
    List,
    Add {
        name: String,
        /// Price, `,` or `.` as decimal separator
        #[arg(long)]
        price: String,
        #[arg(long, default_value = "")]
        description: String,
        /// starter, main, dessert or drink
        #[arg(long)]
        category: Option<Category>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum TabCommand {
    List,
    Open {
        table: String,
    },
    /// Add a menu item to a tab
    Add {
        tab: String,
        item: String,
        #[arg(long, short, default_value = "1")]
        quantity: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Move an item to the next status
    Advance {
        tab: String,
        item: String,
    },
    /// Set an item status explicitly
    Status {
        tab: String,
        item: String,
        status: ItemStatus,
    },
    Close {
        tab: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let _guard = logger::init_logger(&cli.log_level, cli.json, cli.log_dir.as_deref())?;

    let mut config = ClientConfig::from_env();
    if let Some(platform) = cli.platform {
        config = config.with_platform(platform);
    }
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(secs);
    }
    let closed_tabs = config.fetch_closed_tabs || matches!(cli.command, Command::Report);
    config = config.with_closed_tabs(closed_tabs);
    tracing::debug!(base_url = %config.base_url, platform = %config.platform, "Client configured");

    let store = AppStore::new(&config).context("failed to build HTTP client")?;
    let email = cli.email.as_deref().unwrap_or_default();
    let password = cli.password.as_deref().unwrap_or_default();

    match &cli.command {
        Command::Register { name } => {
            applied(Action::SignUp, store.sign_up(name, email, password).await)?;
            let user = store.current_user().await.context("no session after registration")?;
            println!("Registered {} <{}>", user.name, user.email);
            return Ok(());
        }
        _ => applied(Action::SignIn, store.sign_in(email, password).await)?,
    }

    match cli.command {
        Command::Register { .. } => {}
        Command::Menu { command } => menu(&store, command, cli.json).await?,
        Command::Tabs { command } => tabs(&store, command, cli.json).await?,
        Command::Board => {
            let board = store.snapshot().production_board();
            if cli.json {
                render::json(&board)?;
            } else {
                render::board(&board);
            }
        }
        Command::Report => {
            let report = store.snapshot().sales_report(&Local);
            if cli.json {
                render::json(&report)?;
            } else {
                render::report(&report);
            }
        }
    }

    Ok(())
}

async fn menu(store: &AppStore, command: MenuCommand, json: bool) -> anyhow::Result<()> {
    match command {
        MenuCommand::List => {}
        MenuCommand::Add {
            name,
            price,
            description,
            category,
        } => {
            let form = MenuItemForm {
                name,
                description,
                price,
                category,
            };
            applied(Action::AddMenuItem, store.add_menu_item(&form).await)?;
        }
        MenuCommand::Delete { id } => {
            applied(Action::DeleteMenuItem, store.delete_menu_item(&id).await)?;
        }
    }

    let snapshot = store.snapshot();
    if json {
        render::json(&snapshot.menu)
    } else {
        render::menu(&snapshot);
        Ok(())
    }
}

async fn tabs(store: &AppStore, command: TabCommand, json: bool) -> anyhow::Result<()> {
    match command {
        TabCommand::List => {}
        TabCommand::Open { table } => {
            applied(Action::OpenTab, store.open_tab(&table).await)?;
        }
        TabCommand::Add {
            tab,
            item,
            quantity,
            note,
        } => {
            let quantity = input::parse_quantity(&quantity)?;
            applied(
                Action::AddItem,
                store.add_item_with_note(&tab, &item, quantity, note).await,
            )?;
        }
        TabCommand::Advance { tab, item } => {
            let current = store
                .snapshot()
                .open_tab(&tab)
                .and_then(|t| t.item(&item))
                .map(|line| line.status)
                .with_context(|| format!("item #{} not found on open tab #{}", item, tab))?;
            let Some(next) = current.next() else {
                bail!("item #{} is already {}", item, current);
            };
            applied(
                Action::UpdateStatus,
                store.update_item_status(&tab, &item, next).await,
            )?;
        }
        TabCommand::Status { tab, item, status } => {
            applied(
                Action::UpdateStatus,
                store.update_item_status(&tab, &item, status).await,
            )?;
        }
        TabCommand::Close { tab } => {
            applied(Action::CloseTab, store.close_tab(&tab).await)?;
        }
    }

    let overview = store.snapshot().tab_overview();
    if json {
        render::json(&overview)
    } else {
        render::tabs(&overview);
        Ok(())
    }
}

/// Turn a store result into a command failure carrying the user-facing notice.
fn applied(action: Action, result: ClientResult<Outcome>) -> anyhow::Result<()> {
    match result {
        Ok(Outcome::Applied) => Ok(()),
        Ok(Outcome::Skipped(reason)) => bail!("{}", reason),
        Err(e) => bail!("{}", alert_message(action, &e)),
    }
}
