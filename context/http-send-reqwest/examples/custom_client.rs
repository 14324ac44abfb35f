use anyhow::Result;
use bytes::Bytes;
use kraken_rest_core::{collect_body, Context};
use kraken_rest_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Timeouts and pooling are configured on the reqwest client.
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .build()?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    let req = http::Request::builder()
        .method("GET")
        .uri("https://api.kraken.com/0/public/Time")
        .body(Bytes::new())?;

    let resp = ctx.http_send(req).await?;
    println!("Response status: {}", resp.status());
    for (name, value) in resp.headers() {
        println!("  {name}: {value:?}");
    }

    let body = collect_body(resp.into_body()).await?;
    println!("{}", String::from_utf8_lossy(&body));

    Ok(())
}
