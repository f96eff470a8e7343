//! seal-gate command line interface
//!
//! Usage:
//!   seal-gate serve               - Start the HTTP gateway
//!   seal-gate symmetric-key       - Generate an AES-256 key and IV
//!   seal-gate encrypt <text>      - Encrypt text with a PEM public key

use clap::{Parser, Subcommand};
use seal_gate::client::PublicKeyEncryptor;
use seal_gate::common::config::{ConfigFile, RunMode};
use seal_gate::logging::init_logging;
use seal_gate::server::http::run_server;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seal-gate")]
#[command(about = "RSA-OAEP encryption gateway with automatic key rotation")]
#[command(version)]
struct Cli {
    /// Configuration file path (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Key validity period in seconds
        #[arg(long)]
        validity_secs: Option<u64>,
        /// Enable development mode (exposes /api/encryption/debugkeys)
        #[arg(long)]
        dev: bool,
    },

    /// Generate a random AES-256 key and CBC IV (Base64)
    #[cfg(feature = "symmetric")]
    SymmetricKey,

    /// Encrypt text with a PEM public key, printing Base64 ciphertext
    Encrypt {
        /// File containing `-----BEGIN PUBLIC KEY-----`
        #[arg(long)]
        pem_file: PathBuf,
        /// Text to encrypt
        text: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_command(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// 配置的优先级：文件 < 环境变量 < 命令行参数。
fn load_config(path: Option<&PathBuf>) -> Result<ConfigFile, seal_gate::Error> {
    let mut config = match path {
        Some(path) => ConfigFile::from_file(path)?,
        None => ConfigFile::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

async fn run_command(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            validity_secs,
            dev,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(secs) = validity_secs {
                config.rotation.validity_period_secs = secs;
            }
            if dev {
                config.server.mode = RunMode::Development;
            }
            config.validate()?;

            init_logging(&config.logging)?;
            run_server(config).await?;
            Ok(())
        }

        #[cfg(feature = "symmetric")]
        Commands::SymmetricKey => {
            let session = seal_gate::symmetric::SymmetricSession::generate()?;
            println!("key: {}", session.export_key());
            println!("iv:  {}", session.export_iv());
            Ok(())
        }

        Commands::Encrypt { pem_file, text } => {
            let pem_text = fs::read_to_string(&pem_file)?;
            let encryptor: PublicKeyEncryptor = PublicKeyEncryptor::from_pem(&pem_text)?;
            println!("{}", encryptor.encrypt(&text)?);
            Ok(())
        }
    }
}
