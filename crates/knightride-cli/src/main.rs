use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod context;
mod logging;

use context::AppContext;

#[derive(Parser)]
#[command(name = "knightride")]
#[command(about = "Knight Ride - rider safety companion", long_about = None)]
struct Cli {
    /// Directory holding config.toml and the session token
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// API base URL, overriding config and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the API server is reachable
    Health,
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        bike_model: Option<String>,
        #[arg(long)]
        license_number: Option<String>,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in rider's profile
    Whoami,
    /// List roadside services nearby
    Services {
        /// mechanic, fuel, hospital, ...
        #[arg(long = "type")]
        service_type: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lng: Option<f64>,
    },
    /// Request roadside assistance
    RequestService {
        #[arg(long = "type")]
        service_type: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Specific provider from `services`
        #[arg(long)]
        service_id: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
    /// Arm the SOS countdown; Ctrl-C cancels before it fires
    Sos {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long)]
        message: Option<String>,
        /// Seconds before the alert fires, overriding config
        #[arg(long)]
        countdown: Option<u32>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Manage emergency contacts
    Contacts {
        #[command(subcommand)]
        action: ContactsAction,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ContactsAction {
    /// List saved contacts with their positions
    List,
    /// Add a contact
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        relation: String,
    },
    /// Remove the contact at a position shown by `list`
    Remove { index: usize },
    /// Remove the contact with a phone number
    RemovePhone { phone: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The configured log level is only known once the config is read.
    let config_dir = cli.config_dir;
    let api_url = cli.api_url;
    let loaded = tracing::subscriber::with_default(logging::startup_subscriber(), || {
        AppContext::load_config(config_dir.as_deref(), api_url)
    })?;
    logging::init(&loaded.config.log_level);

    let ctx = AppContext::open(loaded)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(cli.command, ctx))
}

async fn run(command: Commands, ctx: AppContext) -> Result<()> {
    match command {
        Commands::Health => commands::account::health(&ctx).await?,
        Commands::Register {
            name,
            email,
            phone,
            password,
            bike_model,
            license_number,
        } => {
            commands::account::register(
                &ctx,
                commands::account::RegisterArgs {
                    name,
                    email,
                    phone,
                    password,
                    bike_model,
                    license_number,
                },
            )
            .await?
        }
        Commands::Login { email, password } => {
            commands::account::login(&ctx, email, password).await?
        }
        Commands::Logout => commands::account::logout(&ctx),
        Commands::Whoami => commands::account::whoami(&ctx).await?,
        Commands::Services {
            service_type,
            lat,
            lng,
        } => commands::roadside::list(&ctx, service_type, lat, lng).await?,
        Commands::RequestService {
            service_type,
            lat,
            lng,
            service_id,
            message,
        } => {
            commands::roadside::request(&ctx, service_type, lat, lng, service_id, message).await?
        }
        Commands::Sos {
            lat,
            lng,
            message,
            countdown,
            yes,
        } => {
            commands::sos::run(
                &ctx,
                commands::sos::SosArgs {
                    lat,
                    lng,
                    message,
                    countdown,
                    yes,
                },
            )
            .await?
        }
        Commands::Contacts { action } => match action {
            ContactsAction::List => commands::contacts::list(&ctx).await?,
            ContactsAction::Add {
                name,
                phone,
                relation,
            } => commands::contacts::add(&ctx, name, phone, relation).await?,
            ContactsAction::Remove { index } => commands::contacts::remove(&ctx, index).await?,
            ContactsAction::RemovePhone { phone } => {
                commands::contacts::remove_phone(&ctx, &phone).await?
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&ctx)?,
        },
    }

    Ok(())
}
