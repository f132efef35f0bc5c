mod common;

use common::{config, USDT, WBTC};
use dxsp::config::Protocol;
use dxsp::DexSwap;
use mockito::Matcher;
use rust_decimal::Decimal;

#[tokio::test]
async fn routes_quotes_to_the_configured_protocol() {
    let mut server = mockito::Server::new_async().await;
    let zerox = server
        .mock("GET", "/swap/v1/quote")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"buyAmount": "3000000000000000000"}"#)
        .create_async()
        .await;

    let dex = DexSwap::new(config(&server.url(), Protocol::ZeroEx)).unwrap();
    assert_eq!(dex.aggregator().name(), "0x");

    let quote = dex.get_quote(WBTC, USDT, Decimal::ONE).await.unwrap();

    zerox.assert_async().await;
    assert_eq!(quote, Some(Decimal::from(3)));
}

#[tokio::test]
async fn zerox_has_no_approval_step() {
    let server = mockito::Server::new_async().await;
    let dex = DexSwap::new(config(&server.url(), Protocol::ZeroEx)).unwrap();

    assert!(dex.get_approve(USDT).await.unwrap().is_none());
}

#[tokio::test]
async fn account_transactions_use_the_configured_wallet() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api")
        .match_query(Matcher::UrlEncoded("address".into(), common::WALLET.into()))
        .with_status(200)
        .with_body(r#"{"status": "0", "result": []}"#)
        .create_async()
        .await;

    let dex = DexSwap::new(config(&server.url(), Protocol::OneInch)).unwrap();
    let aggregate = dex.get_account_transactions(USDT, 24).await.unwrap();

    mock.assert_async().await;
    assert_eq!(aggregate.total, num_bigint::BigUint::default());
}
