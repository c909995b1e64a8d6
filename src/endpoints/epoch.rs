use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::context::Context;
use crate::error::Result;
use crate::options::RequestOptions;
use crate::response::ApiResponse;
use crate::types::{BlockHash, EpochNo, Lovelace, Timestamp};

use super::with_query;

/// Summary of an epoch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EpochInfo {
    pub epoch_no: EpochNo,
    pub out_sum: Lovelace,
    pub fees: Lovelace,
    pub tx_count: u64,
    pub blk_count: u64,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub first_block_time: Timestamp,
    pub last_block_time: Timestamp,
    pub active_stake: Option<Lovelace>,
    pub total_rewards: Option<Lovelace>,
    pub avg_blk_reward: Option<Lovelace>,
}

/// Protocol parameters in force during an epoch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EpochParams {
    pub epoch_no: EpochNo,
    pub min_fee_a: Option<u64>,
    pub min_fee_b: Option<u64>,
    pub max_block_size: Option<u64>,
    pub max_tx_size: Option<u64>,
    pub max_bh_size: Option<u64>,
    pub key_deposit: Option<Lovelace>,
    pub pool_deposit: Option<Lovelace>,
    pub max_epoch: Option<u32>,
    pub optimal_pool_count: Option<u32>,
    pub influence: Option<f64>,
    pub monetary_expand_rate: Option<f64>,
    pub treasury_growth_rate: Option<f64>,
    pub protocol_major: Option<u32>,
    pub protocol_minor: Option<u32>,
    pub min_pool_cost: Option<Lovelace>,
    pub nonce: Option<String>,
    pub block_hash: Option<BlockHash>,
    pub price_mem: Option<f64>,
    pub price_step: Option<f64>,
    pub max_tx_ex_mem: Option<u64>,
    pub max_tx_ex_steps: Option<u64>,
    pub coins_per_utxo_size: Option<Lovelace>,
}

impl Client {
    // ── Epoch ────────────────────────────────────────────────────

    /// Returns epoch summaries, for every epoch or for `epoch` only.
    pub async fn epoch_info(
        &self,
        ctx: &Context,
        epoch: Option<EpochNo>,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<EpochInfo>>> {
        let options = match epoch {
            Some(epoch) => Some(with_query(options, "_epoch_no", epoch)?),
            None => options,
        };
        self.get(ctx, "epoch_info", options).await
    }

    /// Returns protocol parameters, for every epoch or for `epoch` only.
    pub async fn epoch_params(
        &self,
        ctx: &Context,
        epoch: Option<EpochNo>,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<EpochParams>>> {
        let options = match epoch {
            Some(epoch) => Some(with_query(options, "_epoch_no", epoch)?),
            None => options,
        };
        self.get(ctx, "epoch_params", options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_info_with_nulls() {
        let raw = r#"{
            "epoch_no": 400,
            "out_sum": "1012",
            "fees": 10,
            "tx_count": 3,
            "blk_count": 2,
            "start_time": 1680903891,
            "end_time": 1681335891,
            "first_block_time": 1680903891,
            "last_block_time": null,
            "active_stake": null,
            "total_rewards": null,
            "avg_blk_reward": null
        }"#;
        let info: EpochInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(info.epoch_no, EpochNo(400));
        assert!(info.last_block_time.is_zero());
        assert_eq!(info.active_stake, None);
        assert_eq!(info.out_sum, Lovelace(1012));
    }

    #[test]
    fn epoch_params_partial() {
        let raw = r#"{"epoch_no": 320, "min_fee_a": 44, "min_fee_b": 155381,
            "key_deposit": "2000000", "influence": 0.3, "price_mem": null}"#;
        let params: EpochParams = serde_json::from_str(raw).unwrap();
        assert_eq!(params.min_fee_a, Some(44));
        assert_eq!(params.key_deposit, Some(Lovelace::from_ada(2)));
        assert_eq!(params.price_mem, None);
        assert_eq!(params.max_block_size, None);
    }
}
