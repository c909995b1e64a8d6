use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::options::RequestOptions;
use crate::payload::{AssetListPayload, AssetRef};
use crate::response::ApiResponse;
use crate::types::{
    Address, AssetFingerprint, AssetName, PolicyId, StakeAddress, Timestamp, TxHash, TxMetadata,
};

use super::with_query;

/// Row of the asset list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetListItem {
    pub policy_id: PolicyId,
    pub asset_name: Option<AssetName>,
    pub fingerprint: AssetFingerprint,
}

/// Supply and registry information of a native asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetInfo {
    pub policy_id: PolicyId,
    pub asset_name: Option<AssetName>,
    pub asset_name_ascii: Option<String>,
    pub fingerprint: AssetFingerprint,
    pub minting_tx_hash: Option<TxHash>,
    /// Signed quantity; burns can make it negative.
    pub total_supply: String,
    pub mint_cnt: u64,
    pub burn_cnt: u64,
    pub creation_time: Timestamp,
    pub minting_tx_metadata: TxMetadata,
    pub token_registry_metadata: Option<serde_json::Value>,
    pub cip68_metadata: Option<serde_json::Value>,
}

/// Holder of a native asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetAddress {
    pub payment_address: Address,
    pub stake_address: Option<StakeAddress>,
    pub quantity: String,
}

impl Client {
    // ── Asset ────────────────────────────────────────────────────

    /// Returns all native assets.
    pub async fn assets(
        &self,
        ctx: &Context,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<AssetListItem>>> {
        self.get(ctx, "asset_list", options).await
    }

    /// Returns information about the given assets.
    pub async fn assets_info(
        &self,
        ctx: &Context,
        assets: &[AssetRef],
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<AssetInfo>>> {
        if assets.is_empty() || assets.iter().any(|a| a.policy_id.is_empty()) {
            return Err(self.missing(ErrorKind::MissingAsset, Method::POST, "asset_info"));
        }
        let payload = AssetListPayload::new(assets.iter().cloned());
        self.post(ctx, "asset_info", &payload, options).await
    }

    /// Returns information about a single asset.
    pub async fn asset_info(
        &self,
        ctx: &Context,
        policy_id: &PolicyId,
        asset_name: &AssetName,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<AssetInfo>> {
        let asset = AssetRef::new(policy_id.clone(), asset_name.clone());
        self.assets_info(ctx, std::slice::from_ref(&asset), options)
            .await?
            .into_single()
    }

    /// Returns the addresses holding an asset and their quantities.
    pub async fn asset_addresses(
        &self,
        ctx: &Context,
        policy_id: &PolicyId,
        asset_name: &AssetName,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<AssetAddress>>> {
        if policy_id.is_empty() {
            return Err(self.missing(ErrorKind::MissingAsset, Method::GET, "asset_addresses"));
        }
        let options = with_query(options, "_asset_policy", policy_id)?;
        let options = with_query(Some(options), "_asset_name", asset_name)?;
        self.get(ctx, "asset_addresses", Some(options)).await
    }
}
