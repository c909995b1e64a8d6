use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::options::RequestOptions;
use crate::payload::{DatumHashesPayload, ScriptHashesPayload};
use crate::response::ApiResponse;
use crate::types::{DatumHash, ScriptHash, TxHash};

use super::all_present;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptListItem {
    pub script_hash: ScriptHash,
    pub creation_tx_hash: Option<TxHash>,
    #[serde(rename = "type")]
    pub script_type: Option<String>,
    pub size: Option<u32>,
}

/// Script body and its serialized form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptInfo {
    pub script_hash: ScriptHash,
    pub creation_tx_hash: Option<TxHash>,
    #[serde(rename = "type")]
    pub script_type: Option<String>,
    pub value: Option<serde_json::Value>,
    pub bytes: Option<String>,
    pub size: Option<u32>,
}

/// Datum value and its CBOR encoding.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatumInfo {
    pub datum_hash: DatumHash,
    pub creation_tx_hash: Option<TxHash>,
    pub value: Option<serde_json::Value>,
    pub bytes: Option<String>,
}

impl Client {
    // ── Script ───────────────────────────────────────────────────

    /// Returns all scripts.
    pub async fn script_list(
        &self,
        ctx: &Context,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<ScriptListItem>>> {
        self.get(ctx, "script_list", options).await
    }

    /// Returns the bodies of the given scripts.
    pub async fn scripts_info(
        &self,
        ctx: &Context,
        script_hashes: &[ScriptHash],
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<ScriptInfo>>> {
        if !all_present(script_hashes) {
            return Err(self.missing(ErrorKind::MissingScriptHash, Method::POST, "script_info"));
        }
        let payload = ScriptHashesPayload {
            script_hashes: script_hashes.to_vec(),
        };
        self.post(ctx, "script_info", &payload, options).await
    }

    /// Returns the body of a single script.
    pub async fn script_info(
        &self,
        ctx: &Context,
        script_hash: &ScriptHash,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<ScriptInfo>> {
        self.scripts_info(ctx, std::slice::from_ref(script_hash), options)
            .await?
            .into_single()
    }

    /// Returns the values of the given datums.
    pub async fn datums_info(
        &self,
        ctx: &Context,
        datum_hashes: &[DatumHash],
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<Vec<DatumInfo>>> {
        if !all_present(datum_hashes) {
            return Err(self.missing(ErrorKind::MissingDatumHash, Method::POST, "datum_info"));
        }
        let payload = DatumHashesPayload {
            datum_hashes: datum_hashes.to_vec(),
        };
        self.post(ctx, "datum_info", &payload, options).await
    }

    /// Returns the value of a single datum.
    pub async fn datum_info(
        &self,
        ctx: &Context,
        datum_hash: &DatumHash,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<DatumInfo>> {
        self.datums_info(ctx, std::slice::from_ref(datum_hash), options)
            .await?
            .into_single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_type_is_renamed() {
        let raw = r#"{"script_hash": "bd2119ee", "type": "plutusV2", "size": 2114}"#;
        let item: ScriptListItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.script_type.as_deref(), Some("plutusV2"));
        assert_eq!(item.creation_tx_hash, None);
    }

    #[tokio::test]
    async fn blank_hashes_are_rejected_locally() {
        let client = Client::builder().host("127.0.0.1").scheme("http").port(9).build().unwrap();
        let ctx = Context::new();

        let err = client.scripts_info(&ctx, &[], None).await.unwrap_err();
        assert!(err.is(ErrorKind::MissingScriptHash));
        let err = client.datum_info(&ctx, &DatumHash::from(""), None).await.unwrap_err();
        assert!(err.is(ErrorKind::MissingDatumHash));
        assert_eq!(client.total_requests(), 0);
    }
}
