use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::{Result, eyre};
use log::{debug, info};
use multisend_core::{
    ConfigWrapper, JsonAbi, MetaTransaction, StateMutability, TransactionInput, TransactionType,
    create_transaction, decode_multi, encode_all, encode_multi, new_transaction_id, parse_abi,
    utils::parse::parse_address, utils::parse::parse_hex_bytes, writable_functions,
};
use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a batch of transactions into a single multiSend call
    Encode {
        /// Path to the batch JSON file (array of transactions)
        #[arg(long = "batch", short = 'b')]
        batch_path: String,

        /// Network ID used to look up addresses in the config
        #[arg(long = "network", short = 'n', default_value_t = 1)]
        network_id: u64,

        /// Path to the config file, defaults to ./config.toml when present
        #[arg(long = "config", short = 'c')]
        config_path: Option<String>,

        /// MultiSend contract address, overrides the config
        #[arg(long = "multisend", short = 'm')]
        multisend: Option<String>,

        /// Safe address, the sender of collectible transfers
        #[arg(long = "safe", short = 's')]
        safe: Option<String>,

        /// Print a markdown summary instead of bare JSON
        #[arg(long = "summary")]
        summary: bool,
    },
    /// Decode multiSend call data back into its transactions
    Decode {
        /// multiSend call data (0x hex)
        #[arg(long = "data", short = 'd')]
        data: String,
    },
    /// Print an empty transaction of the given type
    New {
        /// transferFunds, transferCollectible, callContract or raw
        #[arg(long = "type", short = 't')]
        kind: String,
    },
    /// List the functions of an ABI that a batch row can call
    Functions {
        /// Path to the ABI file (JSON or human readable)
        #[arg(long = "abi", short = 'a')]
        abi_path: String,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Encode {
            batch_path,
            network_id,
            config_path,
            multisend,
            safe,
            summary,
        } => {
            let batch = load_batch(batch_path)?;
            let config = load_config(config_path.as_deref())?;

            let multisend_address = match multisend {
                Some(addr) => parse_address(addr)?,
                None => match &config {
                    Some(config) => config.get_multisend_address(*network_id)?,
                    None => multisend_core::DEFAULT_MULTI_SEND_ADDRESS,
                },
            };
            let safe_address = match safe {
                Some(addr) => Some(parse_address(addr)?),
                None => match &config {
                    Some(config) => config.get_safe_address(*network_id)?,
                    None => None,
                },
            };
            debug!(
                "Using multiSend {} and Safe {:?} on network {}",
                multisend_address, safe_address, network_id
            );

            let txs = encode_all(&batch, safe_address)?;
            let multi = encode_multi(&txs, Some(multisend_address));
            info!("Encoded {} transaction(s)", txs.len());

            if *summary {
                print_batch_summary(*network_id, &batch, &txs, &multi)?;
            } else {
                println!("{}", serde_json::to_string_pretty(&multi)?);
            }
        }
        Commands::Decode { data } => {
            let call_data = parse_hex_bytes(data)?;
            let txs = decode_multi(&call_data)?;
            println!("{}", serde_json::to_string_pretty(&txs)?);
        }
        Commands::New { kind } => {
            let kind: TransactionType = kind.parse()?;
            let tx = create_transaction(kind, new_transaction_id());
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
        Commands::Functions { abi_path } => {
            let abi = parse_abi(&fs::read_to_string(abi_path)?)?;
            for line in function_lines(&abi) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

fn load_batch(path: &str) -> Result<Vec<TransactionInput>> {
    let file_content = fs::read_to_string(path)?;
    parse_batch(&file_content)
}

fn parse_batch(content: &str) -> Result<Vec<TransactionInput>> {
    let batch: Vec<TransactionInput> = serde_json::from_str(content)?;
    if batch.is_empty() {
        return Err(eyre!("Batch is empty, nothing to encode"));
    }
    Ok(batch)
}

// An explicit path must exist, the default one is optional.
fn load_config(path: Option<&str>) -> Result<Option<ConfigWrapper>> {
    match path {
        Some(p) => ConfigWrapper::from_file(Some(p)).map(Some),
        None if Path::new("config.toml").exists() => ConfigWrapper::from_file(None).map(Some),
        None => Ok(None),
    }
}

fn function_lines(abi: &JsonAbi) -> Vec<String> {
    writable_functions(abi)
        .map(|f| {
            if f.state_mutability == StateMutability::Payable {
                format!("{} (payable)", f.signature())
            } else {
                f.signature()
            }
        })
        .collect()
}

fn print_batch_summary(
    network_id: u64,
    batch: &[TransactionInput],
    txs: &[MetaTransaction],
    multi: &MetaTransaction,
) -> Result<()> {
    println!("\n# MultiSend Batch (Network: {})", network_id);

    println!("\n## Transactions");
    for (i, (input, tx)) in batch.iter().zip(txs).enumerate() {
        println!(
            "{}. {} `{}` -> {} (value {}, {} bytes of data)",
            i + 1,
            input.kind(),
            input.id(),
            tx.to,
            tx.value,
            tx.data.len()
        );
    }

    println!("\n## Transaction Data");
    println!("```json");
    println!("{}", serde_json::to_string_pretty(multi)?);
    println!("```");

    Ok(())
}
