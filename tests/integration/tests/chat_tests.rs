//! Chat server integration tests
//!
//! Every test runs a real listener on an ephemeral port; no external
//! services are needed.
//!
//! Run with: cargo test -p integration-tests --test chat_tests

use std::time::Duration;

use chat_common::AppConfig;
use chat_core::notice;
use chat_server::KickOutcome;
use integration_tests::{server_frame, test_config, unique_username, TestServer};

/// Long enough for any in-flight frame on loopback to arrive
const QUIET: Duration = Duration::from_millis(300);

// ============================================================================
// End-to-end
// ============================================================================

#[tokio::test]
async fn test_end_to_end_scenario() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();

    // Bob first asks for a taken name
    let mut bob = server.connect().await.unwrap();
    assert_eq!(bob.expect_frame().await.unwrap(), notice::USERNAME_PROMPT);
    bob.send("alice").await.unwrap();
    assert_eq!(bob.expect_frame().await.unwrap(), notice::USERNAME_REJECTED);
    bob.register("bob").await.unwrap();
    alice
        .expect_frame_containing(&notice::joined("bob"))
        .await
        .unwrap();

    alice.send("/msg bob hi").await.unwrap();
    let private = bob.expect_frame().await.unwrap();
    assert!(private.contains("[Private][alice]: hi"), "got {private:?}");

    assert_eq!(server.kick("bob"), KickOutcome::Kicked);
    let trailing = bob.expect_closed().await.unwrap();
    assert_eq!(trailing, vec![notice::KICKED]);

    assert_eq!(
        alice.expect_frame().await.unwrap(),
        server_frame(&notice::removed("bob"))
    );
    assert_eq!(server.state().registry().usernames(), vec!["alice"]);
}

// ============================================================================
// Messaging
// ============================================================================

#[tokio::test]
async fn test_global_message_reaches_everyone() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();
    let mut bob = server.join("bob").await.unwrap();
    alice
        .expect_frame_containing(&notice::joined("bob"))
        .await
        .unwrap();

    bob.send("hello there").await.unwrap();
    assert_eq!(alice.expect_frame().await.unwrap(), "[bob]: hello there");
    assert_eq!(bob.expect_frame().await.unwrap(), "[bob]: hello there");

    bob.send("/all    ").await.unwrap();
    bob.send("/all   spaced   out  ").await.unwrap();
    assert_eq!(alice.expect_frame().await.unwrap(), "[bob]: spaced   out");
}

#[tokio::test]
async fn test_private_message_to_unknown_user() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();

    alice.send("/msg ghost boo").await.unwrap();
    assert_eq!(
        alice.expect_frame().await.unwrap(),
        notice::user_not_found("ghost")
    );

    alice.send("/msg ghost").await.unwrap();
    assert_eq!(
        alice.expect_frame().await.unwrap(),
        notice::PRIVATE_MESSAGE_USAGE
    );
}

#[tokio::test]
async fn test_rename_frees_old_name() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();
    let mut bob = server.join("bob").await.unwrap();
    alice
        .expect_frame_containing(&notice::joined("bob"))
        .await
        .unwrap();

    bob.send("/rename alice").await.unwrap();
    assert_eq!(bob.expect_frame().await.unwrap(), notice::RENAME_FAILED);

    bob.send("/rename robert").await.unwrap();
    assert_eq!(
        bob.expect_frame().await.unwrap(),
        notice::rename_succeeded("robert")
    );
    assert_eq!(
        alice.expect_frame().await.unwrap(),
        server_frame(&notice::renamed("bob", "robert"))
    );

    // The old name is free again
    let _newcomer = server.join("bob").await.unwrap();
    assert_eq!(
        server.state().registry().usernames(),
        vec!["alice", "bob", "robert"]
    );

    alice.send("/msg robert still you?").await.unwrap();
    bob.expect_frame_containing("[Private][alice]: still you?")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_stuck_recipient_does_not_block_others() {
    let server = TestServer::start_with_config(test_config()).await.unwrap();

    let mut alice = server.join("alice").await.unwrap();
    // Carol registers and then never reads again
    let _carol = server.join("carol").await.unwrap();
    let mut bob = server.join("bob").await.unwrap();

    for i in 0..200 {
        bob.send(&format!("message {i}")).await.unwrap();
    }

    alice.expect_frame_containing("[bob]: message 199").await.unwrap();
    bob.expect_frame_containing("[bob]: message 199").await.unwrap();
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_concurrent_registration_single_winner() {
    let server = TestServer::start().await.unwrap();

    let mut attempts = Vec::new();
    for _ in 0..8 {
        let mut client = server.connect().await.unwrap();
        attempts.push(tokio::spawn(async move {
            assert_eq!(client.expect_frame().await.unwrap(), notice::USERNAME_PROMPT);
            client.send("popular").await.unwrap();
            let reply = client.expect_frame().await.unwrap();
            (reply == notice::USERNAME_ACCEPTED, client)
        }));
    }

    let mut winners = 0;
    let mut clients = Vec::new();
    for attempt in attempts {
        let (accepted, client) = attempt.await.unwrap();
        winners += usize::from(accepted);
        clients.push(client);
    }

    assert_eq!(winners, 1);
    assert_eq!(server.state().registry().usernames(), vec!["popular"]);
}

// ============================================================================
// Kick and departure
// ============================================================================

#[tokio::test]
async fn test_kick_missing_user_is_silent() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();

    assert_eq!(server.kick("ghost"), KickOutcome::NotFound);
    assert!(alice.frames_within(QUIET).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_quit_announces_leave_once() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();
    let mut bob = server.join("bob").await.unwrap();
    alice
        .expect_frame_containing(&notice::joined("bob"))
        .await
        .unwrap();

    bob.send("/QUIT").await.unwrap();
    assert_eq!(bob.expect_closed().await.unwrap(), vec![notice::FAREWELL]);

    assert_eq!(
        alice.frames_within(QUIET).await.unwrap(),
        vec![server_frame(&notice::left("bob"))]
    );
    assert!(!server.state().registry().contains("bob"));
}

#[tokio::test]
async fn test_kick_racing_quit_single_departure_notice() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();

    for _ in 0..20 {
        let name = unique_username("racer");
        let mut racer = server.join(&name).await.unwrap();
        alice
            .expect_frame_containing(&notice::joined(&name))
            .await
            .unwrap();

        let (sent, outcome) = tokio::join!(racer.send("/quit"), async {
            tokio::task::yield_now().await;
            server.kick(&name)
        });
        sent.unwrap();
        racer.expect_closed().await.unwrap();

        let left = server_frame(&notice::left(&name));
        let removed = server_frame(&notice::removed(&name));
        let notices: Vec<_> = alice
            .frames_within(QUIET)
            .await
            .unwrap()
            .into_iter()
            .filter(|frame| *frame == left || *frame == removed)
            .collect();

        assert_eq!(notices.len(), 1, "outcome {outcome:?}, notices {notices:?}");
        if outcome == KickOutcome::Kicked {
            assert_eq!(notices[0], removed);
        } else {
            assert_eq!(notices[0], left);
        }
        assert!(!server.state().registry().contains(&name));
    }
}

#[tokio::test]
async fn test_disconnect_frees_name() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.join("alice").await.unwrap();
    let bob = server.join("bob").await.unwrap();

    drop(bob);
    alice
        .expect_frame_containing(&notice::left("bob"))
        .await
        .unwrap();

    let _bob_again = server.join("bob").await.unwrap();
}

// ============================================================================
// Shutdown
// ============================================================================

#[tokio::test]
async fn test_shutdown_closes_every_connection() {
    let server = TestServer::start_with_config(AppConfig::default()).await.unwrap();
    let mut alice = server.join("alice").await.unwrap();
    let mut lurker = server.connect().await.unwrap();
    assert_eq!(lurker.expect_frame().await.unwrap(), notice::USERNAME_PROMPT);

    server.shutdown().await.unwrap();

    assert_eq!(
        alice.expect_closed().await.unwrap(),
        vec![server_frame(notice::SERVER_SHUTDOWN)]
    );
    assert!(lurker.expect_closed().await.unwrap().is_empty());
}
