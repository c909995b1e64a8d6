//! JSON bodies for the POST endpoints.
//!
//! Koios names body parameters with a leading underscore (`_addresses`,
//! `_tx_hashes`, ...). Each payload type maps idiomatic field names onto those
//! wire names and skips optional parameters that are unset.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use crate::types::{
    Address, AssetName, BlockHash, BlockHeight, DatumHash, EpochNo, PolicyId, PoolId, ScriptHash,
    StakeAddress, TxHash,
};

/// Reference to a native asset by policy id and hex asset name.
///
/// Serialized as a two-element array, which is the shape `_asset_list`
/// expects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRef {
    pub policy_id: PolicyId,
    pub asset_name: AssetName,
}

impl AssetRef {
    pub fn new(policy_id: impl Into<PolicyId>, asset_name: impl Into<AssetName>) -> Self {
        Self {
            policy_id: policy_id.into(),
            asset_name: asset_name.into(),
        }
    }
}

impl<P: Into<PolicyId>, N: Into<AssetName>> From<(P, N)> for AssetRef {
    fn from((policy_id, asset_name): (P, N)) -> Self {
        Self::new(policy_id, asset_name)
    }
}

impl Serialize for AssetRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.policy_id)?;
        pair.serialize_element(&self.asset_name)?;
        pair.end()
    }
}

/// Body of `address_info`, `address_txs` and `address_assets`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AddressesPayload {
    #[serde(rename = "_addresses")]
    pub addresses: Vec<Address>,
    #[serde(rename = "_after_block_height", skip_serializing_if = "Option::is_none")]
    pub after_block_height: Option<BlockHeight>,
    #[serde(rename = "_extended", skip_serializing_if = "Option::is_none")]
    pub extended: Option<bool>,
}

impl AddressesPayload {
    pub fn new(addresses: impl IntoIterator<Item = impl Into<Address>>) -> Self {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
            after_block_height: None,
            extended: None,
        }
    }

    /// Ask for extended output (asset and script details where supported).
    pub fn extended(mut self) -> Self {
        self.extended = Some(true);
        self
    }

    /// Only include transactions after the given block height.
    pub fn after_block_height(mut self, height: impl Into<BlockHeight>) -> Self {
        self.after_block_height = Some(height.into());
        self
    }
}

/// Body of `account_info`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StakeAddressesPayload {
    #[serde(rename = "_stake_addresses")]
    pub stake_addresses: Vec<StakeAddress>,
    #[serde(rename = "_epoch_no", skip_serializing_if = "Option::is_none")]
    pub epoch_no: Option<EpochNo>,
}

impl StakeAddressesPayload {
    pub fn new(stake_addresses: impl IntoIterator<Item = impl Into<StakeAddress>>) -> Self {
        Self {
            stake_addresses: stake_addresses.into_iter().map(Into::into).collect(),
            epoch_no: None,
        }
    }

    pub fn epoch(mut self, epoch: impl Into<EpochNo>) -> Self {
        self.epoch_no = Some(epoch.into());
        self
    }
}

/// Body of `pool_info`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PoolIdsPayload {
    #[serde(rename = "_pool_bech32_ids")]
    pub pool_ids: Vec<PoolId>,
}

/// Body of `tx_info` and `tx_status`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TxHashesPayload {
    #[serde(rename = "_tx_hashes")]
    pub tx_hashes: Vec<TxHash>,
    #[serde(rename = "_inputs", skip_serializing_if = "Option::is_none")]
    pub inputs: Option<bool>,
    #[serde(rename = "_metadata", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<bool>,
    #[serde(rename = "_assets", skip_serializing_if = "Option::is_none")]
    pub assets: Option<bool>,
}

impl TxHashesPayload {
    pub fn new(tx_hashes: impl IntoIterator<Item = impl Into<TxHash>>) -> Self {
        Self {
            tx_hashes: tx_hashes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Ask `tx_info` to include inputs, metadata and assets.
    pub fn detailed(mut self) -> Self {
        self.inputs = Some(true);
        self.metadata = Some(true);
        self.assets = Some(true);
        self
    }
}

/// Body of `block_info` and `block_txs`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BlockHashesPayload {
    #[serde(rename = "_block_hashes")]
    pub block_hashes: Vec<BlockHash>,
}

/// Body of `script_info`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ScriptHashesPayload {
    #[serde(rename = "_script_hashes")]
    pub script_hashes: Vec<ScriptHash>,
}

/// Body of `datum_info`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DatumHashesPayload {
    #[serde(rename = "_datum_hashes")]
    pub datum_hashes: Vec<DatumHash>,
}

/// Body of `asset_info`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AssetListPayload {
    #[serde(rename = "_asset_list")]
    pub asset_list: Vec<AssetRef>,
}

impl AssetListPayload {
    pub fn new(assets: impl IntoIterator<Item = impl Into<AssetRef>>) -> Self {
        Self {
            asset_list: assets.into_iter().map(Into::into).collect(),
        }
    }
}
