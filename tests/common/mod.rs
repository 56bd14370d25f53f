use rosetta_mapper::config::ChainAlias;
use rosetta_mapper::config::NetworkIdentifier;
use rosetta_mapper::core::avax::ids::Id;
use rosetta_mapper::core::types::Operation;
use rosetta_mapper::core::types::Transaction;
use rosetta_mapper::MapperConfig;

/// Block timestamp from which atomic txs come in batches.
pub const AP5_ACTIVATION: u64 = 1_637_766_000;

pub fn set_tracing_subscriber(set: bool) -> Option<tracing::dispatcher::DefaultGuard> {
    if !set {
        return None;
    }
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(tracing::Level::INFO)
        .with_env_filter("rosetta_mapper=trace")
        .finish();
    Some(tracing::subscriber::set_default(subscriber))
}

pub fn avax_asset_id() -> Id {
    Id([0x21; 32])
}

pub fn x_chain_id() -> Id {
    Id([0x58; 32])
}

pub fn mainnet_config() -> MapperConfig {
    MapperConfig::new(
        NetworkIdentifier::new("Avalanche", "Mainnet"),
        avax_asset_id(),
        AP5_ACTIVATION,
    )
    .alias(x_chain_id(), ChainAlias::X)
}

/// Asserts indices run from 0 without gaps and links point backwards.
pub fn assert_well_formed(tx: &Transaction) {
    for (i, op) in tx.operations.iter().enumerate() {
        assert_eq!(op.index(), i as i64, "gap in operation indices");
        for related in &op.related_operations {
            assert!(related.index < op.index(), "forward link in {op:?}");
        }
    }
}

pub fn amount_values(ops: &[Operation]) -> Vec<Option<String>> {
    ops.iter()
        .map(|op| op.amount.as_ref().map(|a| a.value.clone()))
        .collect()
}
