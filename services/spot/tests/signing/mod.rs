use std::collections::HashMap;

use kraken_rest_core::hash::base64_decode;
use kraken_rest_core::{Context, CounterNonceSource, ErrorKind, Result, StaticEnv};
use kraken_rest_spot::{
    sign, Client, Config, EnvCredentialProvider, NoCredentialProvider, Request, SignedFields,
};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use crate::mock::MockHttpSend;

const API_KEY: &str = "test_api_key";
const SECRET: &str =
    "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";

fn context(mock: &MockHttpSend) -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new()
        .with_http_send(mock.clone())
        .with_nonce_source(CounterNonceSource::new(1616492376594))
}

fn config() -> Config {
    Config {
        api_key: Some(API_KEY.to_string()),
        api_secret: Some(SECRET.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_private_request_is_signed() -> Result<()> {
    let mock = MockHttpSend::json(r#"{"error":[],"result":{"txid":["OUF4EM-FRGI2-MQMWZD"]}}"#);
    let client = Client::new(context(&mock), config())?;

    client
        .send::<serde_json::Value>(
            &CancellationToken::new(),
            Request::post("/0/private/AddOrder")
                .form("ordertype", "limit")
                .form("type", "buy")
                .form("volume", "1.25")
                .form("pair", "XBTUSD")
                .form("price", "37500"),
        )
        .await?;

    let requests = mock.requests();
    let req = &requests[0];
    assert_eq!(
        req.body.as_ref(),
        b"nonce=1616492376594&ordertype=limit&pair=XBTUSD&price=37500&type=buy&volume=1.25"
            .as_slice()
    );
    assert_eq!(req.headers["api-key"], API_KEY);
    assert_eq!(
        req.headers["api-sign"],
        "4/dpxb3iT4tp/ZCVEwSnEsLxx0bqyhLpdfOpc6fn7OR8+UClSV5n9E6aSS8MPtnRfp32bAb0nmbRn6H8ndwLUQ=="
    );
    assert_eq!(
        req.headers["content-type"],
        "application/x-www-form-urlencoded"
    );
    Ok(())
}

#[tokio::test]
async fn test_signature_matches_transmitted_body() -> Result<()> {
    let mock = MockHttpSend::json(r#"{"error":[],"result":{}}"#);
    let client = Client::new(context(&mock), config())?;

    client
        .balance(&CancellationToken::new(), Some("123456"))
        .await?;

    let requests = mock.requests();
    let req = &requests[0];
    let fields = SignedFields::new(
        form_urlencoded::parse(&req.body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
    )?;
    assert_eq!(fields.nonce(), "1616492376594");
    assert_eq!(fields.otp(), Some("123456"));
    assert_eq!(
        req.headers["api-sign"],
        sign(req.uri.path(), &fields, &base64_decode(SECRET)?).as_str()
    );
    Ok(())
}

#[tokio::test]
async fn test_caller_supplied_nonce_is_kept() -> Result<()> {
    let mock = MockHttpSend::json(r#"{"error":[],"result":{}}"#);
    let client = Client::new(context(&mock), config())?;

    let nonce = client.nonce();
    client
        .send::<serde_json::Value>(
            &CancellationToken::new(),
            Request::post("/0/private/Balance").form("nonce", nonce.to_string()),
        )
        .await?;

    assert_eq!(
        mock.requests()[0].body.as_ref(),
        format!("nonce={nonce}").as_bytes()
    );
    Ok(())
}

#[tokio::test]
async fn test_sequential_nonces_increase() -> Result<()> {
    let mock = MockHttpSend::json(r#"{"error":[],"result":{}}"#);
    let client = Client::new(context(&mock), config())?;

    for _ in 0..3 {
        client.balance(&CancellationToken::new(), None).await?;
    }

    let bodies: Vec<String> = mock
        .requests()
        .iter()
        .map(|r| String::from_utf8_lossy(&r.body).to_string())
        .collect();
    assert_eq!(
        bodies,
        vec![
            "nonce=1616492376594",
            "nonce=1616492376595",
            "nonce=1616492376596"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_public_request_not_signed_even_with_credential() -> Result<()> {
    let mock = MockHttpSend::json(r#"{"error":[],"result":{"unixtime":1688997000}}"#);
    let client = Client::new(context(&mock), config())?;

    client.server_time(&CancellationToken::new()).await?;

    let requests = mock.requests();
    let req = &requests[0];
    assert!(req.headers.get("api-key").is_none());
    assert!(req.headers.get("api-sign").is_none());
    assert!(req.body.is_empty());
    assert!(req.headers.get("user-agent").is_some());
    Ok(())
}

#[tokio::test]
async fn test_public_only_client_rejects_private_request() -> Result<()> {
    let mock = MockHttpSend::json(r#"{"error":[],"result":{}}"#);
    let client = Client::new(context(&mock), Config::default())?;

    let err = client
        .balance(&CancellationToken::new(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(mock.requests().is_empty());

    // Public endpoints keep working.
    client.server_time(&CancellationToken::new()).await?;
    assert_eq!(mock.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_explicit_public_only_provider() -> Result<()> {
    let mock = MockHttpSend::json(r#"{"error":[],"result":{}}"#);
    let client =
        Client::with_credential_provider(context(&mock), config(), NoCredentialProvider)?;

    let err = client
        .balance(&CancellationToken::new(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    Ok(())
}

#[tokio::test]
async fn test_env_credential_provider() -> Result<()> {
    let mock = MockHttpSend::json(r#"{"error":[],"result":{"ZUSD":"171288.6158"}}"#);
    let ctx = context(&mock).with_env(StaticEnv {
        envs: HashMap::from([
            ("KRAKEN_API_KEY".to_string(), API_KEY.to_string()),
            ("KRAKEN_API_SECRET".to_string(), SECRET.to_string()),
        ]),
    });
    let client =
        Client::with_credential_provider(ctx, Config::default(), EnvCredentialProvider::new())?;

    let balance = client.balance(&CancellationToken::new(), None).await?;
    assert_eq!(
        balance.into_result().ok().and_then(|v| v.get("ZUSD").cloned()),
        Some("171288.6158".to_string())
    );
    assert_eq!(mock.requests()[0].headers["api-key"], API_KEY);
    Ok(())
}
