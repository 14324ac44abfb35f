//! Fetch the server time and, when credentials are configured, the account balance.
//!
//! ```shell
//! KRAKEN_API_KEY=... KRAKEN_API_SECRET=... cargo run --example server_time
//! ```

use std::collections::HashMap;

use kraken_rest_core::{Context, OsEnv};
use kraken_rest_http_send_reqwest::ReqwestHttpSend;
use kraken_rest_spot::{Client, Config};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default().from_env(&ctx);
    let private = config.api_key.is_some();
    let client = Client::new(ctx, config)?;

    let cancel = CancellationToken::new();
    let time = client.server_time(&cancel).await?;
    println!("server time: {:?}", time.into_result());

    if private {
        let balance = client.balance(&cancel, None).await?;
        let balance: Result<HashMap<String, String>, _> = balance.into_result();
        println!("balance: {balance:?}");
    } else {
        println!("KRAKEN_API_KEY is not set, skip private endpoints");
    }

    Ok(())
}
