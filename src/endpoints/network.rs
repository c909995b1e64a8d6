use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::context::Context;
use crate::error::Result;
use crate::options::RequestOptions;
use crate::response::ApiResponse;
use crate::types::{BlockHash, BlockHeight, EpochNo, Lovelace, Slot, Timestamp};

use super::with_query;

/// Current tip of the chain as seen by the Koios instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tip {
    pub hash: BlockHash,
    pub epoch_no: EpochNo,
    pub abs_slot: Slot,
    pub epoch_slot: u32,
    pub block_no: BlockHeight,
    pub block_time: Timestamp,
}

/// Genesis parameters of the network.
///
/// Koios sends every numeric value as a string here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Genesis {
    pub networkmagic: String,
    pub networkid: String,
    pub activeslotcoeff: String,
    pub updatequorum: String,
    pub maxlovelacesupply: Lovelace,
    pub epochlength: String,
    pub systemstart: Timestamp,
    pub slotsperkesperiod: String,
    pub slotlength: String,
    pub maxkesrevolutions: String,
    pub securityparam: String,
    pub alonzogenesis: Option<String>,
}

/// Supply distribution at the end of an epoch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    pub epoch_no: EpochNo,
    pub circulation: Lovelace,
    pub treasury: Lovelace,
    pub reward: Lovelace,
    pub supply: Lovelace,
    pub reserves: Lovelace,
}

impl Client {
    // ── Network ──────────────────────────────────────────────────

    /// Returns the tip of the chain.
    pub async fn tip(
        &self,
        ctx: &Context,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Tip>> {
        self.get::<Vec<Tip>>(ctx, "tip", options).await?.into_single()
    }

    /// Returns the genesis parameters of the network.
    pub async fn genesis(
        &self,
        ctx: &Context,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Genesis>> {
        self.get::<Vec<Genesis>>(ctx, "genesis", options)
            .await?
            .into_single()
    }

    /// Returns supply totals, for every epoch or for `epoch` only.
    pub async fn totals(
        &self,
        ctx: &Context,
        epoch: Option<EpochNo>,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<Totals>>> {
        let options = match epoch {
            Some(epoch) => Some(with_query(options, "_epoch_no", epoch)?),
            None => options,
        };
        self.get(ctx, "totals", options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tip_decodes() {
        let raw = r#"{
            "hash": "c8f56a1f66b8e84d4d1e5f3a4b02a7f6bd21e1e9f1b8f1e6e9e2d3c4b5a69788",
            "epoch_no": 321,
            "abs_slot": 53384091,
            "epoch_slot": 85691,
            "block_no": 7017300,
            "block_time": 1644820380
        }"#;
        let tip: Tip = serde_json::from_str(raw).unwrap();
        assert_eq!(tip.epoch_no, EpochNo(321));
        assert_eq!(tip.block_no.get(), 7_017_300);
        assert_eq!(tip.block_time.unix(), 1_644_820_380);
    }

    #[test]
    fn totals_accept_string_amounts() {
        let raw = r#"{"epoch_no": 320, "circulation": "32081169442642320",
            "treasury": "1000000", "reward": "2", "supply": "3", "reserves": "4"}"#;
        let totals: Totals = serde_json::from_str(raw).unwrap();
        assert_eq!(totals.circulation, Lovelace(32_081_169_442_642_320));
        assert_eq!(totals.treasury.as_ada_f64(), 1.0);
    }
}
