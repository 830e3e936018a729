//! Node connection and the three remote operations the CLI performs:
//! read-only contract execution, signed call submission, and the historical
//! event scan.

use anyhow::{Context, Result};
use scale::{Decode, Encode};
use subxt::backend::legacy::LegacyRpcMethods;
use subxt::backend::rpc::RpcClient;
use subxt::dynamic::Value;
use subxt::utils::AccountId32;
use subxt::{OnlineClient, PolkadotConfig};
use subxt_signer::sr25519::Keypair;

use crate::types::{CallRequest, ContractEmitted, ContractExecResult, Weight};

pub struct Node {
    api: OnlineClient<PolkadotConfig>,
    rpc: LegacyRpcMethods<PolkadotConfig>,
}

impl Node {
    pub async fn connect(url: &str) -> Result<Self> {
        let rpc_client = RpcClient::from_url(url)
            .await
            .with_context(|| format!("connecting to {url}"))?;
        let api = OnlineClient::<PolkadotConfig>::from_rpc_client(rpc_client.clone())
            .await
            .context("initializing chain client")?;
        let rpc = LegacyRpcMethods::<PolkadotConfig>::new(rpc_client);
        Ok(Self { api, rpc })
    }

    /// Execute a contract call without submitting a transaction, via the
    /// `ContractsApi_call` runtime API. Used both for gas estimation and for
    /// read-only queries.
    pub async fn dry_run(
        &self,
        origin: &AccountId32,
        dest: &AccountId32,
        input_data: Vec<u8>,
    ) -> Result<ContractExecResult> {
        let request = CallRequest {
            origin: origin.clone(),
            dest: dest.clone(),
            value: 0,
            gas_limit: None,
            storage_deposit_limit: None,
            input_data,
        };
        let result: ContractExecResult = self
            .api
            .runtime_api()
            .at_latest()
            .await?
            .call_raw("ContractsApi_call", Some(&request.encode()))
            .await
            .context("contract dry run")?;
        tracing::debug!(gas_required = ?result.gas_required, "dry run complete");
        Ok(result)
    }

    /// Sign and submit a `Contracts::call` transaction. The hash is printed
    /// as soon as the transaction is accepted, the block number once it is
    /// finalized.
    pub async fn submit(
        &self,
        signer: &Keypair,
        dest: &AccountId32,
        gas_limit: Weight,
        input_data: Vec<u8>,
    ) -> Result<()> {
        let call = subxt::dynamic::tx(
            "Contracts",
            "call",
            vec![
                Value::unnamed_variant("Id", [Value::from_bytes(dest.0)]),
                Value::u128(0),
                Value::named_composite(vec![
                    ("ref_time", Value::u128(gas_limit.ref_time as u128)),
                    ("proof_size", Value::u128(gas_limit.proof_size as u128)),
                ]),
                Value::unnamed_variant("None", Vec::<Value>::new()),
                Value::from_bytes(input_data),
            ],
        );

        let progress = self
            .api
            .tx()
            .sign_and_submit_then_watch_default(&call, signer)
            .await
            .context("submitting transaction")?;
        println!("Mining transaction ...");
        println!("0x{}", hex::encode(progress.extrinsic_hash()));

        let in_block = progress
            .wait_for_finalized()
            .await
            .context("waiting for finalization")?;
        let block_number = self.api.blocks().at(in_block.block_hash()).await?.header().number;
        // Surfaces failed extrinsics (e.g. out of gas) as errors.
        in_block.wait_for_success().await?;
        println!("Mined in block {block_number}");
        Ok(())
    }

    /// All `ContractEmitted` events of `contract` whose topics carry
    /// `signature_topic`, scanned from the genesis block onward. Returns
    /// `(block number, event data)` pairs in chain order.
    pub async fn past_contract_events(
        &self,
        contract: &AccountId32,
        signature_topic: &[u8; 32],
    ) -> Result<Vec<(u32, Vec<u8>)>> {
        let latest = self.api.blocks().at_latest().await?.header().number;
        tracing::debug!(latest, "scanning blocks for contract events");

        let mut found = Vec::new();
        for number in 0..=latest {
            let Some(hash) = self
                .rpc
                .chain_get_block_hash(Some((number as u64).into()))
                .await?
            else {
                continue;
            };
            let events = self.api.blocks().at(hash).await?.events().await?;
            for event in events.iter() {
                let event = event?;
                if event.pallet_name() != "Contracts"
                    || event.variant_name() != "ContractEmitted"
                {
                    continue;
                }
                if !event.topics().iter().any(|t| t.as_ref() == signature_topic) {
                    continue;
                }
                let mut field_bytes = event.field_bytes();
                let emitted = ContractEmitted::decode(&mut field_bytes)
                    .context("decoding ContractEmitted event")?;
                if emitted.contract == *contract {
                    found.push((number, emitted.data));
                }
            }
        }
        Ok(found)
    }
}
