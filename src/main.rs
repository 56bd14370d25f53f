use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs;

use alloy_primitives::Address;
use serde::Deserialize;
use serde::Serialize;

use rosetta_mapper::core::client::CachedContractInfo;
use rosetta_mapper::core::client::ContractInfo;
use rosetta_mapper::core::client::StaticContractInfo;
use rosetta_mapper::core::evm::BlockData;
use rosetta_mapper::core::evm::TransactionData;
use rosetta_mapper::core::types::Transaction;
use rosetta_mapper::Mapper;
use rosetta_mapper::MapperConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const CONTRACT_INFO_CACHE_SIZE: usize = 1024;

/// Recorded node artifacts to be mapped.
#[derive(Deserialize)]
struct Replay {
    #[serde(default)]
    contracts: HashMap<Address, ContractInfo>,
    #[serde(default)]
    transactions: Vec<TransactionData>,
    #[serde(default)]
    blocks: Vec<BlockData>,
}

#[derive(Serialize)]
struct Output {
    transactions: Vec<Transaction>,
    cross_chain_transactions: Vec<Transaction>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Configure tracing subscriber
    let filter = env::var("MAPPER_LOG").unwrap_or(String::from("rosetta_mapper=info"));
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(tracing::Level::INFO)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    let _guard = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("starting mapper v{VERSION}");
    if cfg!(feature = "test-utilities") {
        tracing::warn!("build includes test-utilities, use cargo's `--no-default-features` flag");
    } else {
        tracing::debug!("compiled without test-utilities");
    }

    // Env variables
    let config_path = env::var("MAPPER_CONFIG").map_err(|_| "MAPPER_CONFIG is not set")?;
    tracing::debug!("found MAPPER_CONFIG environment variable");
    let config: MapperConfig = serde_json::from_str(&fs::read_to_string(&config_path)?)?;
    tracing::info!(
        "mapping for {} {}",
        config.network.blockchain,
        config.network.network
    );

    let replay_path = env::args().nth(1).ok_or("usage: mapper <replay.json>")?;
    let replay: Replay = serde_json::from_str(&fs::read_to_string(&replay_path)?)?;

    let contracts = replay
        .contracts
        .into_iter()
        .fold(StaticContractInfo::new(), |source, (address, info)| {
            source.add(address, &info.symbol, info.decimals)
        });
    let mapper = Mapper::new(
        config,
        CachedContractInfo::new(contracts, CONTRACT_INFO_CACHE_SIZE),
    );

    let transactions = replay
        .transactions
        .iter()
        .map(|data| mapper.map_transaction(data))
        .collect::<Result<Vec<_>, _>>()?;

    let mut cross_chain_transactions = vec![];
    for block in &replay.blocks {
        cross_chain_transactions.extend(mapper.map_cross_chain_transactions(block)?);
    }

    tracing::info!(
        "mapped {} transaction(s) and {} atomic transaction(s)",
        transactions.len(),
        cross_chain_transactions.len()
    );
    let output = Output {
        transactions,
        cross_chain_transactions,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
