use anyhow::bail;
use clap::{Parser, Subcommand};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::{Subscriber, debug};
use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt};

use device_loaner::classification::{available_devices, borrowed_devices};
use device_loaner::config::{Config, LoggingConfig};
use device_loaner::loaner_api::loaner_client::{LoanerApiTrait, LoanerClient};
use device_loaner::loaner_api::models::borrow_reason::BorrowReason;
use device_loaner::site;
use device_loaner::workflows::borrow_workflow::BorrowWorkflow;
use device_loaner::workflows::return_workflow::ReturnWorkflow;
use device_loaner::workflows::{FieldErrors, SubmitError};

/// Borrow and return devices from the shared loaner pool.
#[derive(Parser, Debug)]
#[command(name = "device-loaner", about = "Device loaner client")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short = 'c', long = "config", default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available and borrowed devices.
    Devices,
    /// Borrow an available device.
    Borrow {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// "forgot at home", "lost device" or "other".
        #[arg(long)]
        reason: BorrowReason,
        /// Required when the reason is "other".
        #[arg(long)]
        custom_reason: Option<String>,
        #[arg(long)]
        device_type: String,
        #[arg(long)]
        asset_id: String,
    },
    /// Return a borrowed device.
    Return {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        asset_id: String,
    },
    /// Host the front-end bundle.
    Serve,
}

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !Path::new(&cli.config).exists() {
        println!("Config file not found. Creating example {}...", cli.config);
        Config::save_example(&cli.config)?;
        println!("Please edit {} with your settings and run again.", cli.config);
        bail!("{} was missing", cli.config);
    }
    let config = Config::from_file(&cli.config)?;

    init_logging(&config);

    match cli.command {
        Command::Devices => list_devices(&config).await,
        Command::Borrow {
            name,
            email,
            reason,
            custom_reason,
            device_type,
            asset_id,
        } => {
            let mut workflow = BorrowWorkflow::new(LoanerClient::new(&config.api.base_url)?);
            workflow.load().await;
            if let Some(e) = workflow.last_error() {
                bail!("Unable to load devices: {}", e);
            }

            workflow.set_name(name)?;
            workflow.set_email(email)?;
            workflow.select_reason(Some(reason))?;
            workflow.set_custom_reason(custom_reason.unwrap_or_default())?;
            workflow.select_device_type(device_type.as_str())?;
            let options = workflow.device_name_options();
            if !options.contains(&asset_id.as_str()) {
                bail!(
                    "{} is not an available {} (available: {})",
                    asset_id,
                    device_type,
                    options.join(", ")
                );
            }
            workflow.select_device(asset_id)?;

            match workflow.submit().await {
                Ok(device) => {
                    println!("Device Borrowed Successfully!");
                    println!(
                        "{} ({}) is now on loan to {} <{}>",
                        device.asset_id, device.device_type, device.name, device.email
                    );
                    Ok(())
                }
                Err(e) => report_submit_error(e, |f| f.key()),
            }
        }
        Command::Return {
            name,
            email,
            asset_id,
        } => {
            let client = LoanerClient::new(&config.api.base_url)?;
            let mut workflow = ReturnWorkflow::new(client)
                .scoped_to_borrower(config.forms.scope_returns_to_borrower);
            workflow.load().await;
            if let Some(e) = workflow.last_error() {
                bail!("Unable to load devices: {}", e);
            }

            workflow.set_name(name)?;
            workflow.set_email(email)?;
            if !workflow.device_options().iter().any(|d| d.asset_id == asset_id) {
                bail!("{} is not among the borrowed devices", asset_id);
            }
            workflow.select_device(asset_id.as_str())?;

            match workflow.submit().await {
                Ok(()) => {
                    println!("Device Returned Successfully!");
                    println!("{} is back in the pool", asset_id);
                    Ok(())
                }
                Err(e) => report_submit_error(e, |f| f.key()),
            }
        }
        Command::Serve => site::serve(PathBuf::from(&config.site.root), &config.site.listen).await,
    }
}

fn init_logging(config: &Config) {
    let logging = &config.logging;

    // stderr keeps command output on stdout clean
    let console_layer = fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(&logging.console_level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(level_file(logging, LevelFilter::DEBUG))
        .with(level_file(logging, LevelFilter::INFO))
        .with(level_file(logging, LevelFilter::WARN))
        .with(level_file(logging, LevelFilter::ERROR))
        .init();
}

/// Daily-rolled file receiving `level` and everything more severe.
fn level_file<S>(logging: &LoggingConfig, level: LevelFilter) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let name = logging.file_name(&level.to_string().to_lowercase());
    fmt::layer()
        .with_writer(rolling::daily(&logging.directory, name))
        .with_ansi(false)
        .with_filter(level)
}

async fn list_devices(config: &Config) -> anyhow::Result<()> {
    let client = LoanerClient::new(&config.api.base_url)?;
    debug!("Listing devices from {}", client.base_url());
    let devices = client.list_devices().await?;

    println!("Available:");
    for device in available_devices(&devices) {
        println!("  {} ({})", device.asset_id, device.device_type);
    }
    println!("Borrowed:");
    for device in borrowed_devices(&devices) {
        println!(
            "  {} ({}) - Borrowed by: {} <{}>",
            device.asset_id, device.device_type, device.name, device.email
        );
    }
    Ok(())
}

fn report_submit_error<F: Debug>(
    e: SubmitError<F>,
    key: impl Fn(&F) -> &'static str,
) -> anyhow::Result<()> {
    match e {
        SubmitError::Invalid(errors) => {
            print_field_errors(&errors, key);
            bail!("The form has errors")
        }
        SubmitError::Api(e) => Err(e.into()),
        SubmitError::Workflow(e) => Err(e.into()),
    }
}

fn print_field_errors<F>(errors: &FieldErrors<F>, key: impl Fn(&F) -> &'static str) {
    for (field, message) in errors {
        println!("  {}: {}", key(field), message);
    }
}
