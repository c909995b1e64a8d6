use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::options::RequestOptions;
use crate::payload::PoolIdsPayload;
use crate::response::ApiResponse;
use crate::types::{EpochNo, Lovelace, PoolId, StakeAddress, TxHash};

use super::all_present;

/// Row of the pool list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolListItem {
    pub pool_id_bech32: PoolId,
    pub pool_id_hex: Option<String>,
    pub active_epoch_no: Option<EpochNo>,
    pub margin: Option<f64>,
    pub fixed_cost: Option<Lovelace>,
    pub pledge: Option<Lovelace>,
    pub pool_status: Option<String>,
    pub ticker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolRelay {
    pub dns: Option<String>,
    pub srv: Option<String>,
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    pub port: Option<u16>,
}

/// Registration and live state of a stake pool.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolInfo {
    pub pool_id_bech32: PoolId,
    pub pool_id_hex: Option<String>,
    pub active_epoch_no: Option<EpochNo>,
    pub vrf_key_hash: Option<String>,
    pub margin: Option<f64>,
    pub fixed_cost: Option<Lovelace>,
    pub pledge: Option<Lovelace>,
    pub reward_addr: Option<StakeAddress>,
    pub owners: Option<Vec<StakeAddress>>,
    pub relays: Vec<PoolRelay>,
    pub meta_url: Option<String>,
    pub meta_hash: Option<String>,
    pub meta_json: Option<serde_json::Value>,
    pub pool_status: Option<String>,
    pub retiring_epoch: Option<EpochNo>,
    pub op_cert: Option<String>,
    pub op_cert_counter: Option<u64>,
    pub active_stake: Option<Lovelace>,
    pub block_count: Option<u64>,
    pub live_pledge: Option<Lovelace>,
    pub live_stake: Option<Lovelace>,
    pub live_delegators: Option<u64>,
    pub live_saturation: Option<f64>,
    pub update_tx_hash: Option<TxHash>,
}

impl Client {
    // ── Pool ─────────────────────────────────────────────────────

    /// Returns all registered pools.
    pub async fn pools(
        &self,
        ctx: &Context,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<PoolListItem>>> {
        self.get(ctx, "pool_list", options).await
    }

    /// Returns information about the given pools.
    pub async fn pools_info(
        &self,
        ctx: &Context,
        pool_ids: &[PoolId],
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<PoolInfo>>> {
        if !all_present(pool_ids) {
            return Err(self.missing(ErrorKind::MissingPoolId, Method::POST, "pool_info"));
        }
        let payload = PoolIdsPayload {
            pool_ids: pool_ids.to_vec(),
        };
        self.post(ctx, "pool_info", &payload, options).await
    }

    /// Returns information about a single pool.
    pub async fn pool_info(
        &self,
        ctx: &Context,
        pool_id: &PoolId,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<PoolInfo>> {
        self.pools_info(ctx, std::slice::from_ref(pool_id), options)
            .await?
            .into_single()
    }
}
