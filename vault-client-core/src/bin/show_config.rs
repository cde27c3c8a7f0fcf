use vault_client_core::infrastructure::config::rpc_env_key;
use vault_client_core::{ClientConfig, SupportedNetwork};

fn main() {
    vault_client_core::init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("Vault Client Network Configuration:\n");
    println!(
        "  Default Network: {} ({})",
        config.default_network.name(),
        config.default_network.hex_chain_id()
    );
    for network in SupportedNetwork::ALL {
        let source = if config.rpc_overrides.contains_key(&network) {
            rpc_env_key(network)
        } else {
            "built-in".to_string()
        };
        let kind = if network.is_testnet() { "testnet" } else { "mainnet" };
        println!(
            "  {} RPC URL ({}): {} [{}]",
            network.name(),
            kind,
            config.rpc_url_for(network),
            source
        );
    }
    println!(
        "  Wallet RPC URL: {}",
        config.wallet_rpc_url.as_deref().unwrap_or("(not set)")
    );
    println!("  Selected RPC URL: {}", config.rpc_url_for(config.default_network));
}
