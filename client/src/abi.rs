//! The contract's interface description, loaded from the ink! metadata
//! artifact produced by a previous compilation step.
//!
//! Only two pieces are consumed: message selectors (to build call data) and
//! event signature topics (to filter historical events by name).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// Fixed relative path the artifact is read from at startup.
pub const DEFAULT_PATH: &str = "spherical_token.json";

#[derive(Deserialize)]
struct RawMetadata {
    spec: RawSpec,
}

#[derive(Deserialize)]
struct RawSpec {
    #[serde(default)]
    messages: Vec<RawMessage>,
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Deserialize)]
struct RawMessage {
    label: String,
    selector: String,
}

#[derive(Deserialize)]
struct RawEvent {
    label: String,
    signature_topic: Option<String>,
}

pub struct ContractAbi {
    selectors: HashMap<String, [u8; 4]>,
    topics: HashMap<String, [u8; 32]>,
}

impl ContractAbi {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading contract metadata at {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let metadata: RawMetadata =
            serde_json::from_str(raw).context("parsing contract metadata")?;

        let mut selectors = HashMap::new();
        for message in metadata.spec.messages {
            let selector = hex_array::<4>(&message.selector)
                .with_context(|| format!("selector of message `{}`", message.label))?;
            selectors.insert(message.label, selector);
        }

        let mut topics = HashMap::new();
        for event in metadata.spec.events {
            // Anonymous events carry no signature topic and cannot be looked
            // up by name.
            if let Some(topic) = event.signature_topic {
                let topic = hex_array::<32>(&topic)
                    .with_context(|| format!("signature topic of event `{}`", event.label))?;
                topics.insert(event.label, topic);
            }
        }

        Ok(Self { selectors, topics })
    }

    pub fn selector(&self, label: &str) -> Result<[u8; 4]> {
        self.selectors
            .get(label)
            .copied()
            .ok_or_else(|| anyhow!("contract has no message `{label}`"))
    }

    pub fn signature_topic(&self, label: &str) -> Result<[u8; 32]> {
        self.topics
            .get(label)
            .copied()
            .ok_or_else(|| anyhow!("contract has no event `{label}`"))
    }

    /// `selector ++ SCALE(args)`, the input-data layout pallet-contracts
    /// dispatches on.
    pub fn call_data(&self, label: &str, args: &impl scale::Encode) -> Result<Vec<u8>> {
        let mut data = self.selector(label)?.to_vec();
        args.encode_to(&mut data);
        Ok(data)
    }
}

fn hex_array<const N: usize>(raw: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(raw.trim_start_matches("0x")).context("invalid hex")?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| anyhow!("expected {N} bytes, got {}", bytes.len()))
}
