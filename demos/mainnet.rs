//! Example: Query Cardano mainnet through Koios.
//!
//! Run with: cargo run --example mainnet
//!
//! Configuration is read from `KOIOS_*` environment variables; set
//! `RUST_LOG=koios_client=debug` to see request logs.

use std::time::Duration;

use koios_client::{ClientBuilder, Context, ErrorKind, RequestOptions, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = ClientBuilder::from_env()?
        .collect_request_stats(true)
        .build()?;
    let ctx = Context::with_timeout(Duration::from_secs(30));

    println!("=== Koios client ({}) ===\n", client.base_url());

    // 1. Chain tip
    println!("1. Fetching chain tip...");
    let tip = client.tip(&ctx, None).await?;
    println!("   Epoch: {}", tip.data.epoch_no);
    println!("   Block: {} ({})", tip.data.block_no, tip.data.hash);
    println!("   Block time: {}", tip.data.block_time);
    if let Some(stats) = &tip.response.stats {
        println!("   Round trip: {:?}", stats.req_dur);
    }
    println!();

    // 2. Supply totals for the previous epoch
    println!("2. Fetching supply totals...");
    let previous = tip.data.epoch_no.get().saturating_sub(1);
    let totals = client.totals(&ctx, Some(previous.into()), None).await?;
    if let Some(totals) = totals.data.first() {
        println!("   Epoch: {}", totals.epoch_no);
        println!("   Circulation: {:.0} ADA", totals.circulation.as_ada_f64());
        println!("   Treasury: {:.0} ADA", totals.treasury.as_ada_f64());
    }
    println!();

    // 3. Second page of ten pools
    println!("3. Fetching pools 11-20...");
    let mut opts = RequestOptions::new();
    opts.query_set("select", "pool_id_bech32,ticker")?
        .set_page_size(10)?
        .set_current_page(2)?;
    let pools = client.pools(&ctx, Some(opts)).await?;
    for pool in &pools.data {
        println!(
            "   {} {}",
            pool.ticker.as_deref().unwrap_or("-"),
            pool.pool_id_bech32
        );
    }
    if let Some(range) = &pools.response.content_range {
        println!("   Content-Range: {range}");
    }
    println!();

    // 4. A transaction that does not exist
    println!("4. Looking up an unknown transaction...");
    let unknown = "0000000000000000000000000000000000000000000000000000000000000000";
    match client.tx_info(&ctx, &unknown.into(), None).await {
        Ok(tx) => println!("   Found in block {:?}", tx.data.block_height),
        Err(err) if err.is(ErrorKind::NoData) => println!("   Not found"),
        Err(err) => return Err(err),
    }

    println!("\n=== Done! {} requests ===", client.total_requests());
    Ok(())
}
