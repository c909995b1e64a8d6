use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::options::RequestOptions;
use crate::payload::TxHashesPayload;
use crate::response::ApiResponse;
use crate::types::{
    BlockHash, BlockHeight, EpochNo, Lovelace, Slot, Timestamp, TxHash, TxMetadata,
};

use super::all_present;
use super::address::Utxo;

/// Detailed transaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TxInfo {
    pub tx_hash: TxHash,
    pub block_hash: Option<BlockHash>,
    pub block_height: Option<BlockHeight>,
    pub epoch_no: EpochNo,
    pub epoch_slot: u32,
    pub absolute_slot: Slot,
    pub tx_timestamp: Timestamp,
    pub tx_block_index: u32,
    pub tx_size: u32,
    pub total_output: Lovelace,
    pub fee: Lovelace,
    pub deposit: Option<String>,
    pub invalid_before: Option<String>,
    pub invalid_after: Option<String>,
    pub inputs: Option<Vec<Utxo>>,
    pub outputs: Vec<Utxo>,
    pub metadata: TxMetadata,
}

/// Confirmation count of a transaction; `None` when it is not on chain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TxStatus {
    pub tx_hash: TxHash,
    pub num_confirmations: Option<u64>,
}

impl Client {
    // ── Transactions ─────────────────────────────────────────────

    /// Returns detailed information about the given transactions.
    pub async fn txs_info(
        &self,
        ctx: &Context,
        tx_hashes: &[TxHash],
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<TxInfo>>> {
        if !all_present(tx_hashes) {
            return Err(self.missing(ErrorKind::MissingTxHash, Method::POST, "tx_info"));
        }
        let payload = TxHashesPayload::new(tx_hashes.iter().cloned()).detailed();
        self.post(ctx, "tx_info", &payload, options).await
    }

    /// Returns detailed information about a single transaction.
    pub async fn tx_info(
        &self,
        ctx: &Context,
        tx_hash: &TxHash,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<TxInfo>> {
        self.txs_info(ctx, std::slice::from_ref(tx_hash), options)
            .await?
            .into_single()
    }

    /// Returns the confirmation counts of the given transactions.
    pub async fn txs_statuses(
        &self,
        ctx: &Context,
        tx_hashes: &[TxHash],
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<TxStatus>>> {
        if !all_present(tx_hashes) {
            return Err(self.missing(ErrorKind::MissingTxHash, Method::POST, "tx_status"));
        }
        let payload = TxHashesPayload::new(tx_hashes.iter().cloned());
        self.post(ctx, "tx_status", &payload, options).await
    }

    /// Returns the confirmation count of a single transaction.
    pub async fn tx_status(
        &self,
        ctx: &Context,
        tx_hash: &TxHash,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<TxStatus>> {
        self.txs_statuses(ctx, std::slice::from_ref(tx_hash), options)
            .await?
            .into_single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_info_object_metadata() {
        let raw = r#"{
            "tx_hash": "f144a8264acf4bdfe2e1241170969c930d64ab6b0996a4a45237b623f1dd670e",
            "block_height": 6547734,
            "epoch_no": 321,
            "tx_timestamp": 1644820380,
            "total_output": "14",
            "fee": "172321",
            "outputs": [],
            "metadata": {"674": {"msg": ["hello"]}}
        }"#;
        let info: TxInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(info.fee, Lovelace(172_321));
        assert_eq!(info.metadata.get("674").unwrap()["msg"][0], "hello");
        assert!(info.inputs.is_none());
    }

    #[test]
    fn pending_status_has_no_confirmations() {
        let raw = r#"{"tx_hash": "abcd", "num_confirmations": null}"#;
        let status: TxStatus = serde_json::from_str(raw).unwrap();
        assert_eq!(status.num_confirmations, None);
    }
}
