//! EduChain CLI
//!
//! Command-line interface for anchoring and verifying educational
//! documents on the Open Campus Codex chain.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use educhain_core::{ChainConfig, EduChainError, PinService, UploadRequest};
use educhain_flows::SearchOutcome;
use educhain_ipfs::{PinataClient, PinataConfig};
use educhain_registry::{RegistryClient, SessionRegistry};
use educhain_wallet::{LocalWalletProvider, WalletConnector};

/// EduChain - document anchoring on Open Campus Codex
#[derive(Parser)]
#[command(name = "educhain")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON-RPC endpoint override
    #[arg(long, global = true, env = "EDUCHAIN_RPC_URL")]
    rpc_url: Option<String>,

    /// DocumentRegistry contract address
    #[arg(long, global = true, env = "DOCUMENT_REGISTRY_ADDRESS")]
    contract: Option<String>,

    /// IPFS gateway base for preview links
    #[arg(long, global = true, env = "IPFS_GATEWAY_URL")]
    gateway: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pin a PDF to IPFS and record it in the registry
    Upload {
        /// Path to the PDF document
        file: PathBuf,

        /// User-supplied identifier (e.g. institution name)
        #[arg(short, long)]
        label: Option<String>,

        /// Metadata JSON stored verbatim instead of the default object
        #[arg(long)]
        metadata: Option<String>,

        /// Signing key for the session account
        #[arg(long, env = "EDUCHAIN_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,

        /// Pinata JWT credential
        #[arg(long, env = "PINATA_JWT", hide_env_values = true)]
        pinata_jwt: String,

        /// Skip the transaction confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Look up and verify the document recorded for an address
    Search {
        /// Wallet address to query
        address: String,
    },

    /// Probe the pin service with the configured credentials
    CheckAuth {
        /// Pinata JWT credential
        #[arg(long, env = "PINATA_JWT", hide_env_values = true)]
        pinata_jwt: String,
    },

    /// Stream DocumentUpdated events from the registry
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "educhain=debug,info"
    } else {
        "educhain=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let chain = chain_config(&cli);
    let contract = contract_address(&cli)?;
    let gateway = cli
        .gateway
        .clone()
        .unwrap_or_else(|| educhain_core::DEFAULT_IPFS_GATEWAY_URL.into());

    match cli.command {
        Commands::Upload {
            file,
            label,
            metadata,
            private_key,
            pinata_jwt,
            yes,
        } => {
            cmd_upload(
                chain,
                contract,
                &gateway,
                &file,
                label,
                metadata,
                &private_key,
                pinata_jwt,
                yes,
            )
            .await
        }
        Commands::Search { address } => cmd_search(chain, contract, &gateway, &address).await,
        Commands::CheckAuth { pinata_jwt } => cmd_check_auth(pinata_jwt).await,
        Commands::Watch => cmd_watch(chain, contract).await,
    }
}

fn chain_config(cli: &Cli) -> ChainConfig {
    let mut chain = ChainConfig::open_campus_codex();
    if let Some(url) = &cli.rpc_url {
        chain.rpc_url = url.clone();
    }
    chain
}

fn contract_address(cli: &Cli) -> Result<ethers::types::Address> {
    cli.contract
        .as_deref()
        .unwrap_or(educhain_core::DEFAULT_REGISTRY_ADDRESS)
        .parse()
        .context("Invalid registry contract address")
}

/// Pin a document and record it on-chain
#[allow(clippy::too_many_arguments)]
async fn cmd_upload(
    chain: ChainConfig,
    contract: ethers::types::Address,
    gateway: &str,
    file: &PathBuf,
    label: Option<String>,
    metadata: Option<String>,
    private_key: &str,
    pinata_jwt: String,
    yes: bool,
) -> Result<()> {
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".into());
    let mime_type = match file.extension().and_then(|e| e.to_str()) {
        Some("pdf") | Some("PDF") => educhain_core::PDF_MIME_TYPE,
        _ => "application/octet-stream",
    };

    let mut request = UploadRequest::new(file_name.clone(), mime_type, bytes);
    if let Some(label) = label {
        request = request.with_label(label);
    }

    // Establish the wallet session on the target chain
    let wallet: ethers::signers::LocalWallet = private_key
        .trim_start_matches("0x")
        .parse()
        .context("Invalid private key")?;
    let provider = Arc::new(LocalWalletProvider::new(wallet, chain.clone()));
    let connector = WalletConnector::new(chain.clone(), provider.clone());

    println!("{}", "🔗 Connecting wallet...".cyan().bold());
    let session = connector
        .connect()
        .await
        .map_err(user_facing)?;
    println!(
        "   {} {:#x} on chain {}",
        "Connected:".green(),
        session.account,
        session.chain_id
    );

    if !yes {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Pin '{}' and submit updateDocument from {:#x}?",
                file_name, session.account
            ))
            .default(false)
            .interact()
            .context("Confirmation prompt failed")?;
        if !proceed {
            return Err(user_facing(EduChainError::UserRejected(
                "transaction declined at the prompt".into(),
            )));
        }
    }

    let pin_service =
        PinataClient::with_config(PinataConfig::new(pinata_jwt).with_gateway(gateway));
    let signer = provider.signer().map_err(user_facing)?;
    let registry = SessionRegistry::with_signer(signer, contract, chain.clone());

    let spinner = spinner("Pinning document and waiting for confirmation...");
    let receipt = educhain_flows::upload(
        &session,
        &pin_service,
        &registry,
        &chain,
        request,
        metadata,
    )
    .await;
    spinner.finish_and_clear();
    let receipt = receipt.map_err(user_facing)?;

    println!("\n{}", "✅ Document recorded:".green().bold());
    println!("   {} {}", "CID:".yellow(), receipt.cid);
    println!("   {} {:#x}", "Tx:".yellow(), receipt.tx_hash);
    println!("   {} {}", "Explorer:".dimmed(), receipt.explorer_url);
    println!(
        "   {} {}",
        "Preview:".dimmed(),
        pin_service.gateway_url(&receipt.cid)
    );

    Ok(())
}

/// Verify the document recorded for an address
async fn cmd_search(
    chain: ChainConfig,
    contract: ethers::types::Address,
    gateway: &str,
    address: &str,
) -> Result<()> {
    println!("{} {}", "🔍 Searching:".cyan().bold(), address);

    let client = RegistryClient::read_only(contract, chain).map_err(user_facing)?;
    let outcome = educhain_flows::search(&client, gateway, address)
        .await
        .map_err(user_facing)?;

    match outcome {
        SearchOutcome::Found(view) => {
            println!("\n{}", "✅ Document found:".green().bold());
            println!("   {} {}", "CID:".yellow(), view.record.ipfs_cid);
            println!("   {} {}", "Uploaded:".dimmed(), view.uploaded_at_display());
            if let Ok(metadata) =
                serde_json::from_str::<serde_json::Value>(&view.record.metadata_json)
            {
                println!("   {} {}", "Metadata:".dimmed(), metadata);
            } else if !view.record.metadata_json.is_empty() {
                println!("   {} {}", "Metadata:".dimmed(), view.record.metadata_json);
            }
            println!("   {} {}", "Preview:".dimmed(), view.preview_url);
        }
        SearchOutcome::NoDocument { address } => {
            println!(
                "\n{} {:#x}",
                "ℹ️  No document is registered for".yellow(),
                address
            );
        }
    }

    Ok(())
}

/// Probe pin-service credentials
async fn cmd_check_auth(pinata_jwt: String) -> Result<()> {
    println!("{}", "🔑 Checking pin service credentials...".cyan().bold());

    let client = PinataClient::with_config(PinataConfig::new(pinata_jwt));
    client.test_authentication().await.map_err(user_facing)?;

    println!("{}", "✅ Credentials accepted".green().bold());
    Ok(())
}

/// Stream DocumentUpdated events
async fn cmd_watch(chain: ChainConfig, contract: ethers::types::Address) -> Result<()> {
    let client = RegistryClient::read_only(contract, chain).map_err(user_facing)?;

    println!(
        "{}",
        "👀 Watching DocumentUpdated events (ctrl-c to stop)...".cyan().bold()
    );

    let events = client.updates();
    let mut stream = events
        .stream()
        .await
        .map_err(|e| anyhow!("Failed to open event stream: {e}"))?;

    while let Some(event) = stream.next().await {
        match event {
            Ok(update) => {
                println!(
                    "{} uploader={:#x} cid={} timestamp={}",
                    "📄 DocumentUpdated".green(),
                    update.uploader,
                    update.ipfs_url,
                    update.timestamp
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "event decode failed");
            }
        }
    }

    Ok(())
}

/// Maps a flow error to its single user-visible message.
fn user_facing(err: EduChainError) -> anyhow::Error {
    tracing::debug!(error = %err, "flow failed");
    anyhow!("{}", err.user_message())
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid spinner template"),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(std::time::Duration::from_millis(80));
    bar
}
