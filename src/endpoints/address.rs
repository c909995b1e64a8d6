use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::options::RequestOptions;
use crate::payload::AddressesPayload;
use crate::response::ApiResponse;
use crate::types::{
    Address, AssetName, BlockHeight, DatumHash, EpochNo, Lovelace, PolicyId, StakeAddress,
    Timestamp, TxHash,
};

use super::all_present;

/// Unspent output held by an address.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Utxo {
    pub tx_hash: TxHash,
    pub tx_index: u32,
    pub block_height: Option<BlockHeight>,
    pub block_time: Timestamp,
    pub value: Lovelace,
    pub datum_hash: Option<DatumHash>,
    pub inline_datum: Option<serde_json::Value>,
    pub reference_script: Option<serde_json::Value>,
    pub asset_list: Vec<AddressAsset>,
}

/// Balance and outputs of an address.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressInfo {
    pub address: Address,
    pub balance: Lovelace,
    pub stake_address: Option<StakeAddress>,
    pub script_address: bool,
    pub utxo_set: Vec<Utxo>,
}

/// Transaction touching an address.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressTx {
    pub tx_hash: TxHash,
    pub epoch_no: EpochNo,
    pub block_height: Option<BlockHeight>,
    pub block_time: Timestamp,
}

/// Native asset held by an address.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressAsset {
    pub address: Option<Address>,
    pub policy_id: PolicyId,
    pub asset_name: Option<AssetName>,
    pub fingerprint: Option<String>,
    pub decimals: Option<u8>,
    pub quantity: Lovelace,
}

impl Client {
    // ── Address ──────────────────────────────────────────────────

    /// Returns balance and unspent outputs of the given addresses.
    pub async fn addresses_info(
        &self,
        ctx: &Context,
        addresses: &[Address],
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<AddressInfo>>> {
        if !all_present(addresses) {
            return Err(self.missing(ErrorKind::MissingAddress, Method::POST, "address_info"));
        }
        let payload = AddressesPayload::new(addresses.iter().cloned());
        self.post(ctx, "address_info", &payload, options).await
    }

    /// Returns balance and unspent outputs of a single address.
    pub async fn address_info(
        &self,
        ctx: &Context,
        address: &Address,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<AddressInfo>> {
        self.addresses_info(ctx, std::slice::from_ref(address), options)
            .await?
            .into_single()
    }

    /// Returns transactions of the given addresses, optionally only those
    /// after `after_block_height`.
    pub async fn address_txs(
        &self,
        ctx: &Context,
        addresses: &[Address],
        after_block_height: Option<BlockHeight>,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<AddressTx>>> {
        if !all_present(addresses) {
            return Err(self.missing(ErrorKind::MissingAddress, Method::POST, "address_txs"));
        }
        let mut payload = AddressesPayload::new(addresses.iter().cloned());
        if let Some(height) = after_block_height {
            payload = payload.after_block_height(height);
        }
        self.post(ctx, "address_txs", &payload, options).await
    }

    /// Returns native assets held by the given addresses.
    pub async fn address_assets(
        &self,
        ctx: &Context,
        addresses: &[Address],
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<AddressAsset>>> {
        if !all_present(addresses) {
            return Err(self.missing(ErrorKind::MissingAddress, Method::POST, "address_assets"));
        }
        let payload = AddressesPayload::new(addresses.iter().cloned());
        self.post(ctx, "address_assets", &payload, options).await
    }
}
