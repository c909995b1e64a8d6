//! Typed async Rust client for the [Koios](https://www.koios.rest) REST API,
//! serving Cardano blockchain data.
//!
//! # Features
//!
//! - **`types` and `payload` modules**: the scalar value types Koios uses
//!   (addresses, hashes, lovelace amounts, timestamps, transaction metadata)
//!   and typed POST bodies. Available with no additional features.
//! - **`client` feature** (enabled by default): the async client built on
//!   `reqwest`, with client-wide rate limiting, per-call request options and
//!   pagination, and a response envelope describing every call.
//!
//! # Quick start
//!
//! ```no_run
//! use koios_client::{Client, Context};
//!
//! #[tokio::main]
//! async fn main() -> koios_client::Result<()> {
//!     let client = Client::mainnet()?;
//!     let tip = client.tip(&Context::new(), None).await?;
//!     println!("Epoch {} at block {}", tip.data.epoch_no, tip.data.block_no);
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Endpoint failures carry the [`Response`] envelope of the failed call and
//! can be classified with [`Error::is`]:
//!
//! ```no_run
//! use koios_client::{Client, Context, ErrorKind, types::TxHash};
//!
//! # async fn run(client: Client) {
//! match client.tx_status(&Context::new(), &TxHash::from("abcd"), None).await {
//!     Ok(status) => println!("{:?}", status.data.num_confirmations),
//!     Err(err) if err.is(ErrorKind::NoData) => println!("unknown transaction"),
//!     Err(err) if err.is(ErrorKind::Response) => println!("server error: {err}"),
//!     Err(err) => println!("request failed: {err}"),
//! }
//! # }
//! ```

mod lovelace;
pub mod payload;
pub mod types;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
mod context;
#[cfg(feature = "client")]
pub mod endpoints;
#[cfg(feature = "client")]
mod error;
#[cfg(feature = "client")]
mod options;
#[cfg(feature = "client")]
mod rate_limit;
#[cfg(feature = "client")]
mod response;

#[cfg(feature = "client")]
pub use client::{Client, ClientBuilder};
#[cfg(feature = "client")]
pub use context::Context;
#[cfg(feature = "client")]
pub use error::{Error, ErrorKind, ResponseError, Result};
#[cfg(feature = "client")]
pub use options::{PAGE_SIZE, RequestOptions};
#[cfg(feature = "client")]
pub use rate_limit::RateLimiter;
#[cfg(feature = "client")]
pub use response::{ApiResponse, RequestStats, Response};

pub use payload::AssetRef;
pub use types::*;
