use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::options::RequestOptions;
use crate::payload::BlockHashesPayload;
use crate::response::ApiResponse;
use crate::types::{BlockHash, BlockHeight, EpochNo, Lovelace, PoolId, Slot, Timestamp, TxHash};

use super::all_present;

/// Row of the block list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    pub hash: BlockHash,
    pub epoch_no: EpochNo,
    pub abs_slot: Slot,
    pub epoch_slot: u32,
    pub block_height: BlockHeight,
    pub block_size: u32,
    pub block_time: Timestamp,
    pub tx_count: u64,
    pub vrf_key: Option<String>,
    pub pool: Option<PoolId>,
    pub op_cert_counter: Option<u64>,
    pub proto_major: Option<u32>,
    pub proto_minor: Option<u32>,
}

/// Detailed block information.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockInfo {
    #[serde(flatten)]
    pub block: Block,
    pub total_output: Option<Lovelace>,
    pub total_fees: Option<Lovelace>,
    pub num_confirmations: u64,
    pub parent_hash: Option<BlockHash>,
    pub child_hash: Option<BlockHash>,
}

/// Transactions included in a block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockTxs {
    pub block_hash: BlockHash,
    pub tx_hashes: Vec<TxHash>,
}

impl Client {
    // ── Blocks ───────────────────────────────────────────────────

    /// Returns the most recent blocks, newest first.
    pub async fn blocks(
        &self,
        ctx: &Context,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<Block>>> {
        self.get(ctx, "blocks", options).await
    }

    /// Returns detailed information about the given blocks.
    pub async fn blocks_info(
        &self,
        ctx: &Context,
        hashes: &[BlockHash],
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<BlockInfo>>> {
        if !all_present(hashes) {
            return Err(self.missing(ErrorKind::MissingBlockHash, Method::POST, "block_info"));
        }
        let payload = BlockHashesPayload {
            block_hashes: hashes.to_vec(),
        };
        self.post(ctx, "block_info", &payload, options).await
    }

    /// Returns detailed information about a single block.
    pub async fn block_info(
        &self,
        ctx: &Context,
        hash: &BlockHash,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<BlockInfo>> {
        self.blocks_info(ctx, std::slice::from_ref(hash), options)
            .await?
            .into_single()
    }

    /// Returns the transaction hashes of the given blocks.
    pub async fn block_txs(
        &self,
        ctx: &Context,
        hashes: &[BlockHash],
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<BlockTxs>>> {
        if !all_present(hashes) {
            return Err(self.missing(ErrorKind::MissingBlockHash, Method::POST, "block_txs"));
        }
        let payload = BlockHashesPayload {
            block_hashes: hashes.to_vec(),
        };
        self.post(ctx, "block_txs", &payload, options).await
    }
}
