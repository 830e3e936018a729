//! Command-line client for a deployed SphericalTokenInVacuum contract.
//!
//! Reads the network, API key, signing key and contract address from the
//! environment, loads the contract metadata from a fixed relative path, and
//! forwards one command per invocation to the chain.

mod abi;
mod chain;
mod config;
mod types;

use std::path::Path;
use std::process;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use scale::Decode;
use subxt::utils::AccountId32;
use subxt_signer::sr25519::Keypair;
use subxt_signer::SecretUri;
use tracing_subscriber::EnvFilter;

use abi::ContractAbi;
use chain::Node;
use config::Config;
use types::{ContractError, LangError, Minted, Potato, PotatoAdded, PotatoCooked, Transferred};

#[derive(Debug, Parser)]
#[command(name = "stv-client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Append a potato record owned by the signing account
    Add { name: String, weight: u64 },
    /// Mark one of your potatoes cooked
    Cook { id: u32 },
    /// Print all historical occurrences of the named contract event
    Log { event: String },
    /// Print the current state of a potato record
    Sack { id: u32 },
    /// Expand the supply (contract owner only)
    Mint { to: String, amount: u128 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Argument violations terminate before any network traffic; help and
    // version requests are not violations.
    let cli = Cli::try_parse().unwrap_or_else(|err| match err.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
            let _ = err.print();
            process::exit(0)
        }
        _ => process::exit(1),
    });

    let config = Config::from_env()?;
    let abi = ContractAbi::load(Path::new(abi::DEFAULT_PATH))?;
    let node = Node::connect(&config.node_url()).await?;

    match cli.command {
        Command::Add { name, weight } => {
            let data = abi.call_data("add_potato", &(name, weight))?;
            submit_call(&node, &config, data).await
        }
        Command::Cook { id } => {
            let data = abi.call_data("cook_potato", &id)?;
            submit_call(&node, &config, data).await
        }
        Command::Mint { to, amount } => {
            let to = AccountId32::from_str(&to)
                .map_err(|e| anyhow!("recipient is not a valid SS58 address: {e:?}"))?;
            let data = abi.call_data("mint", &(to, amount))?;
            submit_call(&node, &config, data).await
        }
        Command::Log { event } => print_past_events(&node, &config, &abi, &event).await,
        Command::Sack { id } => print_sack(&node, &config, &abi, id).await,
    }
}

/// Estimate gas via a dry run, then submit with a 2x margin.
async fn submit_call(node: &Node, config: &Config, data: Vec<u8>) -> Result<()> {
    let signer = signer_from(&config.private_key)?;
    let origin = signer.public_key().to_account_id();

    let dry = node.dry_run(&origin, &config.contract, data.clone()).await?;
    let ret = match dry.result {
        Ok(ret) => ret,
        Err(e) => bail!("dry run failed to dispatch: {e:?}"),
    };
    if ret.did_revert() {
        bail!("dry run reverted: {}", revert_reason(&ret.data));
    }

    let gas_limit = dry.gas_required.double();
    node.submit(&signer, &config.contract, gas_limit, data).await
}

async fn print_past_events(
    node: &Node,
    config: &Config,
    abi: &ContractAbi,
    label: &str,
) -> Result<()> {
    let topic = abi.signature_topic(label)?;
    let events = node.past_contract_events(&config.contract, &topic).await?;
    for (block_number, data) in events {
        println!("[block {block_number}] {}", render_event(label, &data));
    }
    Ok(())
}

async fn print_sack(node: &Node, config: &Config, abi: &ContractAbi, id: u32) -> Result<()> {
    let signer = signer_from(&config.private_key)?;
    let origin = signer.public_key().to_account_id();

    let data = abi.call_data("sack", &id)?;
    let dry = node.dry_run(&origin, &config.contract, data).await?;
    let ret = match dry.result {
        Ok(ret) => ret,
        Err(e) => bail!("query failed to dispatch: {e:?}"),
    };
    if ret.did_revert() {
        bail!("query reverted: {}", revert_reason(&ret.data));
    }

    let record = <Result<Option<Potato>, LangError>>::decode(&mut &ret.data[..])
        .context("decoding sack return data")?
        .map_err(|e| anyhow!("contract rejected the call: {e:?}"))?;
    match record {
        Some(potato) => println!("{potato}"),
        None => println!("no potato with id {id}"),
    }
    Ok(())
}

fn signer_from(private_key: &str) -> Result<Keypair> {
    let uri = SecretUri::from_str(private_key).context("PRIVATE_KEY is not a valid secret URI")?;
    Keypair::from_uri(&uri).context("PRIVATE_KEY does not describe an sr25519 key")
}

/// Human-readable reason for a reverted call. Message return data is
/// `Result<Result<_, ContractError>, LangError>`; on revert the interesting
/// case is the inner `Err`.
fn revert_reason(data: &[u8]) -> String {
    match <Result<Result<(), ContractError>, LangError>>::decode(&mut &data[..]) {
        Ok(Ok(Err(err))) => err.to_string(),
        Ok(Err(lang)) => format!("{lang:?}"),
        _ => format!("0x{}", hex::encode(data)),
    }
}

fn render_event(label: &str, data: &[u8]) -> String {
    let rendered = match label {
        "PotatoAdded" => PotatoAdded::decode(&mut &data[..]).map(|e| e.to_string()),
        "PotatoCooked" => PotatoCooked::decode(&mut &data[..]).map(|e| e.to_string()),
        "Transferred" => Transferred::decode(&mut &data[..]).map(|e| e.to_string()),
        "Minted" => Minted::decode(&mut &data[..]).map(|e| e.to_string()),
        _ => Err(scale::Error::from("unknown event")),
    };
    rendered.unwrap_or_else(|_| format!("0x{}", hex::encode(data)))
}
