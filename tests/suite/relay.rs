//! Follow-up chat relay: fixed framing, labeled context, no accumulation.

use crate::common;
use quill_client::FOLLOW_UP_SYSTEM_PROMPT;
use quill_types::{ChatContext, ExchangeError};

fn context() -> ChatContext {
    ChatContext {
        original_text: "A".to_string(),
        result_text: "B".to_string(),
    }
}

#[tokio::test]
async fn follow_up_carries_fixed_system_prompt_and_labeled_context() {
    let server = common::start_endpoint().await;
    common::mount_completion(&server, "sure").await;

    let client = common::test_client(&server);
    client
        .chat("what changed?", &context(), "m", "k")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();

    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], FOLLOW_UP_SYSTEM_PROMPT);

    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("Original text: \"A\""), "got: {user}");
    assert!(user.contains("Processed result: \"B\""), "got: {user}");
    assert!(user.contains("User message: what changed?"), "got: {user}");
}

#[tokio::test]
async fn each_follow_up_sends_only_the_latest_message() {
    let server = common::start_endpoint().await;
    common::mount_completion(&server, "reply").await;

    let client = common::test_client(&server);
    let ctx = context();
    client.chat("first question", &ctx, "m", "k").await.unwrap();
    client.chat("second question", &ctx, "m", "k").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    // Same two-message shape as the first turn: no transcript grows.
    assert_eq!(second["messages"].as_array().unwrap().len(), 2);
    let user = second["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("User message: second question"));
    assert!(!user.contains("first question"), "got: {user}");
    assert!(!user.contains("reply"), "got: {user}");
}

#[tokio::test]
async fn follow_up_has_no_input_length_limit() {
    let server = common::start_endpoint().await;
    common::mount_completion(&server, "ok").await;

    // Even with a tiny input limit configured, chat is not length-checked.
    let client = common::test_client(&server).with_input_limit(Some(1));
    let long = "y".repeat(10_000);
    let result = client.chat(&long, &context(), "m", "k").await;
    assert_eq!(result.unwrap(), "ok");
}

#[tokio::test]
async fn blank_follow_up_fails_without_network_call() {
    let server = common::start_endpoint().await;
    common::expect_no_requests(&server).await;

    let client = common::test_client(&server);
    assert_eq!(
        client.chat("  ", &context(), "m", "k").await,
        Err(ExchangeError::EmptyInput)
    );
    assert_eq!(
        client.chat("hi", &context(), "", "k").await,
        Err(ExchangeError::NotConfigured)
    );
}
