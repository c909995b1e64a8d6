use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::options::RequestOptions;
use crate::payload::StakeAddressesPayload;
use crate::response::ApiResponse;
use crate::types::{EpochNo, Lovelace, PoolId, StakeAddress};

use super::all_present;

/// Row of the account list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountListItem {
    pub stake_address: StakeAddress,
    pub stake_address_hex: Option<String>,
    pub script_hash: Option<String>,
}

/// State of a stake account.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountInfo {
    pub stake_address: StakeAddress,
    pub status: String,
    pub delegated_pool: Option<PoolId>,
    pub total_balance: Lovelace,
    pub utxo: Lovelace,
    pub rewards: Lovelace,
    pub withdrawals: Lovelace,
    pub rewards_available: Lovelace,
    pub reserves: Lovelace,
    pub treasury: Lovelace,
}

impl AccountInfo {
    pub fn is_registered(&self) -> bool {
        self.status == "registered"
    }
}

impl Client {
    // ── Account ──────────────────────────────────────────────────

    /// Returns all registered stake addresses.
    pub async fn accounts(
        &self,
        ctx: &Context,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<AccountListItem>>> {
        self.get(ctx, "account_list", options).await
    }

    /// Returns the state of the given stake accounts, at the current epoch or
    /// at `epoch`.
    pub async fn accounts_info(
        &self,
        ctx: &Context,
        stake_addresses: &[StakeAddress],
        epoch: Option<EpochNo>,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<AccountInfo>>> {
        if !all_present(stake_addresses) {
            return Err(self.missing(
                ErrorKind::MissingStakeAddress,
                Method::POST,
                "account_info",
            ));
        }
        let mut payload = StakeAddressesPayload::new(stake_addresses.iter().cloned());
        if let Some(epoch) = epoch {
            payload = payload.epoch(epoch);
        }
        self.post(ctx, "account_info", &payload, options).await
    }

    /// Returns the state of a single stake account.
    pub async fn account_info(
        &self,
        ctx: &Context,
        stake_address: &StakeAddress,
        epoch: Option<EpochNo>,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<AccountInfo>> {
        self.accounts_info(ctx, std::slice::from_ref(stake_address), epoch, options)
            .await?
            .into_single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_info_decodes() {
        let raw = r#"{
            "stake_address": "stake1uyrx65wjqjgeeksd8hptmcgl5jfyrqkfq0xe8xlp367kphsckq250",
            "status": "registered",
            "delegated_pool": "pool155efqn9xpcf73pphkk88cmlkdwx4ulkg606tne970qswczg3asc",
            "total_balance": "21",
            "utxo": "20",
            "rewards": "1",
            "withdrawals": "0",
            "rewards_available": "1",
            "reserves": "0",
            "treasury": "0"
        }"#;
        let info: AccountInfo = serde_json::from_str(raw).unwrap();
        assert!(info.is_registered());
        assert_eq!(info.total_balance, Lovelace(21));
        assert!(info.delegated_pool.is_some());
    }

    #[tokio::test]
    async fn empty_stake_addresses_rejected_locally() {
        let client = Client::builder().host("127.0.0.1").scheme("http").port(9).build().unwrap();
        let err = client
            .accounts_info(&Context::new(), &[], None, None)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::MissingStakeAddress));
        assert_eq!(client.total_requests(), 0);
    }
}
