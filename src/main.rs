//! APUSH Coach - essay feedback service
//!
//! Entry point for the HTTP server plus one-shot commands for running the
//! feedback pipeline from a terminal.

use apush_coach_core::{
    api::ApiServer,
    error::{CoachError, Result},
    prompts, validate_request, EnvGatewaySource, GatewaySource, ServerConfig,
};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "apush-coach")]
#[command(about = "Essay feedback service for the APUSH study app", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server address (overrides the config file)
        #[arg(long)]
        addr: Option<String>,

        /// TOML config file
        #[arg(short, long, env = "APUSH_COACH_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Get feedback for one essay and print it
    Feedback(EssayArgs),

    /// Print the messages that would be sent to the provider
    Prompt(EssayArgs),
}

#[derive(Args)]
struct EssayArgs {
    /// Curriculum unit (1-9)
    #[arg(short, long)]
    unit: i64,

    /// Essay type: SAQ, LEQ or DBQ
    #[arg(short = 't', long)]
    essay_type: String,

    /// Feedback language: en or es (default en)
    #[arg(long)]
    language: Option<String>,

    /// Essay file, or "-" for stdin
    essay: PathBuf,
}

impl EssayArgs {
    /// Run the same validation the HTTP endpoint uses
    fn to_request(&self) -> Result<apush_coach_core::EssayFeedbackRequest> {
        let essay_text = if self.essay.as_os_str() == "-" {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        } else {
            std::fs::read_to_string(&self.essay)?
        };

        let mut payload = json!({
            "unitId": self.unit,
            "essayType": self.essay_type,
            "essayText": essay_text,
        });
        if let Some(language) = &self.language {
            payload["language"] = json!(language);
        }

        Ok(validate_request(&payload)?)
    }
}

fn load_server_config(path: Option<PathBuf>, addr: Option<String>) -> Result<ServerConfig> {
    let mut config = match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            ServerConfig::from_file(&path).map_err(|e| CoachError::Configuration(e.to_string()))?
        }
        None => ServerConfig::default(),
    };

    if let Some(addr) = addr {
        config.addr = addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", addr, e))?;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Use specified level for our crates, WARN for HTTP internals
    let level_name = level.as_str().to_lowercase();
    let filter = EnvFilter::new(format!(
        "apush_coach={lvl},apush_coach_core={lvl},tower_http={lvl},hyper=warn,reqwest=warn",
        lvl = level_name
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("APUSH Coach v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { addr, config } => {
            let config = load_server_config(config, addr)?;
            let source = EnvGatewaySource::new(Some(config.provider.timeout))?;
            let server = ApiServer::new(config, Arc::new(source));
            server.serve().await?;
            Ok(())
        }
        Commands::Feedback(args) => {
            let request = args.to_request()?;
            let gateway = EnvGatewaySource::new(None)?.gateway()?;
            let result = gateway.generate(&request).await?;
            println!("{}", result.output);
            Ok(())
        }
        Commands::Prompt(args) => {
            let request = args.to_request()?;
            let prompt = prompts::compose(&request);
            println!("--- system ---\n{}\n\n--- user ---\n{}", prompt.role, prompt.task);
            Ok(())
        }
    }
}
