//! The typed SDK client against a live relay.

use std::sync::Arc;

use wallink_relay::blockchain::CallArg;
use wallink_sdk::{LinkInput, RelayClient, SdkError};

mod common;
use common::{decode_payload, spawn_relay, test_config, MockLedger, NFT, USER};

#[tokio::test]
async fn test_sdk_create_profile_then_execute() {
    let ledger = Arc::new(MockLedger::default());
    let relay = spawn_relay(test_config(), ledger.clone()).await;
    let client = RelayClient::new(&relay.base_url);

    let links = vec![
        LinkInput {
            title: "Site".into(),
            url: "https://example.com".into(),
        },
        LinkInput {
            title: "Blog".into(),
            url: "https://blog.test".into(),
        },
    ];
    let built = client
        .create_profile(USER, "Ada", "Lovelace", "Analyst", &links)
        .await
        .unwrap();
    assert!(built.success);

    let plan = decode_payload(&built.transaction_bytes);
    assert_eq!(plan.target.function, "create_profile_nft");
    assert_eq!(plan.arguments[2], CallArg::string("Analyst"));
    assert_eq!(
        plan.arguments[3],
        CallArg::strings(vec!["Site".into(), "Blog".into()])
    );

    let executed = client
        .execute(&built.transaction_bytes, "zkSig")
        .await
        .unwrap();
    assert!(executed.success);
    assert_eq!(executed.digest, "7Yx3digest");
    assert_eq!(executed.object_changes[0]["objectId"], NFT);
    assert_eq!(ledger.execution_count(), 1);

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_sdk_link_calls() {
    let ledger = Arc::new(MockLedger::default());
    let relay = spawn_relay(test_config(), ledger.clone()).await;
    let client = RelayClient::new(&format!("{}/", relay.base_url));

    let built = client.update_link(USER, NFT, 4, "Code", "https://code.test").await.unwrap();
    let plan = decode_payload(&built.transaction_bytes);
    assert_eq!(plan.target.function, "update_social_link");
    assert_eq!(plan.arguments[1], CallArg::u64(4));

    let built = client.remove_link(USER, NFT, 4).await.unwrap();
    assert_eq!(decode_payload(&built.transaction_bytes).target.function, "remove_social_link");

    let health = client.health().await.unwrap();
    assert_eq!(health["sponsor"]["checkpoint"], 4242);

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_sdk_surfaces_relay_errors() {
    let ledger = Arc::new(MockLedger::default());
    let relay = spawn_relay(test_config(), ledger.clone()).await;
    let client = RelayClient::new(&relay.base_url);

    let err = client
        .update_profile(USER, NFT, "Ada", "", "")
        .await
        .unwrap_err();
    match err {
        SdkError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "missing required field: surname");
        }
        other => panic!("expected api error, got {:?}", other),
    }
    assert_eq!(ledger.plan_count(), 0);

    let built = client.add_link(USER, NFT, "Blog", "https://blog.test").await.unwrap();
    client.execute(&built.transaction_bytes, "zkSig").await.unwrap();
    let err = client
        .execute(&built.transaction_bytes, "zkSig")
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Api { status: 500, ref message } if message.contains("already executed")));

    relay.shutdown.trigger();
}
