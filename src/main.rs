use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use onwave::chat;
use onwave::inference::HttpInferenceClient;
use onwave::resolver::Resolver;
use onwave::web_server;

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Text-generation endpoint to call for advice. Without it, ONWAVE_INFERENCE_URL
    /// and then the hosted Mistral model are used.
    #[arg(long, global = true)]
    inference_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the questionnaire and chat as a JSON API.
    Serve {
        #[arg(long, env = "ONWAVE_PORT", default_value_t = 9900, help = "Port for the web server.")]
        port: u16,
    },
    /// Take the questionnaire and chat in the terminal.
    Chat,
}

fn build_resolver(inference_url: Option<String>) -> Resolver {
    let client = match inference_url {
        Some(url) => HttpInferenceClient::new(url),
        None => HttpInferenceClient::default(),
    };
    info!(url = client.url(), "Using inference endpoint");
    Resolver::new(Arc::new(client))
}

// The main entry point of the application, using tokio's async runtime
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for HUGGINGFACE_API_KEY)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG (e.g., RUST_LOG=info,onwave=debug).
    // Logs go to stderr so the terminal chat stays readable.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("OnWave starting with command: {:?}", cli.command);

    let resolver = build_resolver(cli.inference_url);

    match cli.command {
        Commands::Serve { port } => {
            let mut web_server_handle = tokio::spawn(web_server::start_web_server(port, resolver));

            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);

            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Ctrl-C received, shutting down...");
                }
                res = &mut web_server_handle => {
                    match res {
                        Ok(Ok(())) => info!("Web server task completed unexpectedly."),
                        Ok(Err(e)) => {
                            error!("Web server failed: {:?}", e);
                            return Err(e);
                        }
                        Err(e) if e.is_panic() => {
                            error!("Web server task panicked: {:?}", e);
                            return Err(anyhow!("Web server task panicked"));
                        }
                        Err(e) => {
                            error!("Web server task failed: {:?}", e);
                            return Err(anyhow!("Web server task failed: {}", e));
                        }
                    }
                }
            }

            if !web_server_handle.is_finished() {
                web_server_handle.abort();
            }
            info!("Shutdown complete.");
        }
        Commands::Chat => {
            chat::run_terminal_chat(resolver)
                .await
                .context("Chat session failed")?;
            info!("Chat session finished.");
        }
    }

    Ok(())
}
