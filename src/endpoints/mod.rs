//! Typed Koios endpoints, grouped the way the API documentation groups them.
//!
//! Every endpoint takes a [`Context`](crate::Context) and optional
//! [`RequestOptions`] and returns an [`ApiResponse`](crate::ApiResponse).
//! List endpoints return `Vec<T>`; the singular helpers (`address_info`,
//! `tx_info`, ...) require exactly one row in the result.

mod account;
mod address;
mod asset;
mod blocks;
mod epoch;
mod network;
mod pool;
mod script;
mod transactions;

pub use account::{AccountInfo, AccountListItem};
pub use address::{AddressAsset, AddressInfo, AddressTx, Utxo};
pub use asset::{AssetAddress, AssetInfo, AssetListItem};
pub use blocks::{Block, BlockInfo, BlockTxs};
pub use epoch::{EpochInfo, EpochParams};
pub use network::{Genesis, Tip, Totals};
pub use pool::{PoolInfo, PoolListItem, PoolRelay};
pub use script::{DatumInfo, ScriptInfo, ScriptListItem};
pub use transactions::{TxInfo, TxStatus};

use crate::error::Result;
use crate::options::RequestOptions;

/// Options with `key=value` added to the query, replacing earlier values.
fn with_query(
    options: Option<RequestOptions>,
    key: &str,
    value: impl ToString,
) -> Result<RequestOptions> {
    let mut options = options.unwrap_or_default();
    options.query_set(key, value.to_string())?;
    Ok(options)
}

/// True when the list is non-empty and holds no blank entry.
fn all_present<T: AsRef<str>>(items: &[T]) -> bool {
    !items.is_empty() && items.iter().all(|item| !item.as_ref().trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TxHash;

    #[test]
    fn with_query_replaces_existing_value() {
        let mut opts = RequestOptions::new();
        opts.query_set("_epoch_no", "1").unwrap();
        let opts = with_query(Some(opts), "_epoch_no", 320).unwrap();
        assert_eq!(opts.query_get("_epoch_no"), Some("320"));
        assert_eq!(opts.query_pairs().count(), 1);
    }

    #[test]
    fn blank_entries_are_missing() {
        assert!(all_present(&[TxHash::from("ab")]));
        assert!(!all_present::<TxHash>(&[]));
        assert!(!all_present(&[TxHash::from("ab"), TxHash::from("  ")]));
    }
}
