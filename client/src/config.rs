//! Connection settings, read from the environment (a `.env` file is honored).

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use subxt::utils::AccountId32;

pub struct Config {
    pub network: String,
    pub api_key: String,
    pub private_key: String,
    pub contract: AccountId32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let network = env::var("SUBSTRATE_NETWORK").context("SUBSTRATE_NETWORK is not set")?;
        let api_key = env::var("ONFINALITY_API_KEY").context("ONFINALITY_API_KEY is not set")?;
        let private_key = env::var("PRIVATE_KEY").context("PRIVATE_KEY is not set")?;
        let contract = env::var("DEMO_CONTRACT").context("DEMO_CONTRACT is not set")?;
        let contract = AccountId32::from_str(&contract)
            .map_err(|e| anyhow!("DEMO_CONTRACT is not a valid SS58 address: {e:?}"))?;
        Ok(Self {
            network,
            api_key,
            private_key,
            contract,
        })
    }

    pub fn node_url(&self) -> String {
        format!(
            "wss://{}.api.onfinality.io/ws?apikey={}",
            self.network, self.api_key
        )
    }
}
