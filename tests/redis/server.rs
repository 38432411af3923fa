use std::time::{Duration, Instant};

use bytes::BytesMut;
use redis_lite::resp::RespValue;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};

use crate::test_utils::TestUtils;

async fn connect(address: &str) -> (TcpStream, BytesMut) {
    let client = TcpStream::connect(address).await.unwrap();
    (client, BytesMut::with_capacity(1024))
}

#[tokio::test]
async fn test_basic_commands_over_tcp() {
    let address = TestUtils::run_server().await;
    let (mut client, mut buffer) = connect(&address).await;

    TestUtils::send_command_and_receive(
        &mut client,
        &mut buffer,
        TestUtils::ping_command(),
        RespValue::SimpleString("PONG".to_string()),
    )
    .await;

    TestUtils::send_command_and_receive(
        &mut client,
        &mut buffer,
        TestUtils::set_command("test_key", "test_value"),
        RespValue::SimpleString("OK".to_string()),
    )
    .await;

    TestUtils::send_command_and_receive(
        &mut client,
        &mut buffer,
        TestUtils::get_command("test_key"),
        RespValue::BulkString("test_value".to_string()),
    )
    .await;
}

#[tokio::test]
async fn test_pipelined_and_split_requests() {
    let address = TestUtils::run_server().await;
    let (mut client, mut buffer) = connect(&address).await;

    let pipelined = format!(
        "{}{}",
        TestUtils::rpush_command("fruits", &["mango", "apple"]).encode(),
        TestUtils::llen_command("fruits").encode()
    );
    TestUtils::send_bytes(&mut client, pipelined.as_bytes()).await;

    assert_eq!(
        TestUtils::read_reply(&mut client, &mut buffer).await,
        RespValue::Integer(2)
    );
    assert_eq!(
        TestUtils::read_reply(&mut client, &mut buffer).await,
        RespValue::Integer(2)
    );

    // A frame split across two writes is answered once it is complete.
    let echo = TestUtils::echo_command("hello").encode();
    let (head, tail) = echo.split_at(7);
    TestUtils::send_bytes(&mut client, head.as_bytes()).await;
    TestUtils::sleep_ms(20).await;
    TestUtils::send_bytes(&mut client, tail.as_bytes()).await;

    assert_eq!(
        TestUtils::read_reply(&mut client, &mut buffer).await,
        RespValue::BulkString("hello".to_string())
    );
}

#[tokio::test]
async fn test_protocol_error_keeps_connection_open() {
    let address = TestUtils::run_server().await;
    let (mut client, mut buffer) = connect(&address).await;

    TestUtils::send_bytes(&mut client, b"?garbage\r\n").await;
    assert_eq!(
        TestUtils::read_reply(&mut client, &mut buffer).await,
        RespValue::Error("ERR Protocol error".to_string())
    );

    TestUtils::send_command_and_receive(
        &mut client,
        &mut buffer,
        TestUtils::ping_command(),
        RespValue::SimpleString("PONG".to_string()),
    )
    .await;
}

#[tokio::test]
async fn test_blpop_across_connections() {
    let address = TestUtils::run_server().await;
    let (mut blocked, mut blocked_buffer) = connect(&address).await;
    let (mut pusher, mut pusher_buffer) = connect(&address).await;

    TestUtils::send_bytes(
        &mut blocked,
        TestUtils::blpop_command(&["queue"], "0").encode().as_bytes(),
    )
    .await;
    TestUtils::sleep_ms(50).await;

    TestUtils::send_command_and_receive(
        &mut pusher,
        &mut pusher_buffer,
        TestUtils::rpush_command("queue", &["job"]),
        RespValue::Integer(1),
    )
    .await;

    assert_eq!(
        TestUtils::read_reply(&mut blocked, &mut blocked_buffer).await,
        RespValue::from_strings(vec!["queue".to_string(), "job".to_string()])
    );
}

#[tokio::test]
async fn test_blpop_times_out_over_tcp() {
    let address = TestUtils::run_server().await;
    let (mut client, mut buffer) = connect(&address).await;

    let started = Instant::now();
    TestUtils::send_command_and_receive(
        &mut client,
        &mut buffer,
        TestUtils::blpop_command(&["queue"], "0.1"),
        RespValue::NullArray,
    )
    .await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(100), "answered early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(500), "answered late: {:?}", elapsed);

    // The connection is usable again once the timeout has been answered.
    TestUtils::send_command_and_receive(
        &mut client,
        &mut buffer,
        TestUtils::ping_command(),
        RespValue::SimpleString("PONG".to_string()),
    )
    .await;
}

#[tokio::test]
async fn test_client_closing_while_blocked_releases_its_wait() {
    let address = TestUtils::run_server().await;
    let (mut leaving, _) = connect(&address).await;
    let (mut staying, mut staying_buffer) = connect(&address).await;
    let (mut pusher, mut pusher_buffer) = connect(&address).await;

    TestUtils::send_bytes(
        &mut leaving,
        TestUtils::blpop_command(&["queue"], "0").encode().as_bytes(),
    )
    .await;
    TestUtils::sleep_ms(50).await;
    TestUtils::send_bytes(
        &mut staying,
        TestUtils::blpop_command(&["queue"], "0").encode().as_bytes(),
    )
    .await;
    TestUtils::sleep_ms(50).await;

    drop(leaving);
    TestUtils::sleep_ms(50).await;

    TestUtils::send_command_and_receive(
        &mut pusher,
        &mut pusher_buffer,
        TestUtils::rpush_command("queue", &["job"]),
        RespValue::Integer(1),
    )
    .await;

    assert_eq!(
        TestUtils::read_reply(&mut staying, &mut staying_buffer).await,
        RespValue::from_strings(vec!["queue".to_string(), "job".to_string()])
    );

    TestUtils::send_command_and_receive(
        &mut pusher,
        &mut pusher_buffer,
        TestUtils::llen_command("queue"),
        RespValue::Integer(0),
    )
    .await;
}

#[tokio::test]
async fn test_half_closed_client_gets_every_pipelined_reply() {
    let address = TestUtils::run_server().await;

    for _ in 0..20 {
        let (mut client, _) = connect(&address).await;

        let pipelined = format!(
            "{}{}{}",
            TestUtils::ping_command().encode(),
            TestUtils::rpush_command("fruits", &["mango"]).encode(),
            TestUtils::echo_command("bye").encode()
        );
        TestUtils::send_bytes(&mut client, pipelined.as_bytes()).await;
        client.shutdown().await.unwrap();

        let mut received = Vec::new();
        timeout(Duration::from_secs(2), client.read_to_end(&mut received))
            .await
            .expect("server should close the connection")
            .unwrap();

        let mut replies = BytesMut::from(&received[..]);
        assert_eq!(
            RespValue::decode(&mut replies),
            Ok(Some(RespValue::SimpleString("PONG".to_string())))
        );
        assert!(matches!(
            RespValue::decode(&mut replies),
            Ok(Some(RespValue::Integer(_)))
        ));
        assert_eq!(
            RespValue::decode(&mut replies),
            Ok(Some(RespValue::BulkString("bye".to_string())))
        );
        assert!(replies.is_empty());
    }
}

#[tokio::test]
async fn test_half_close_while_blocked_drops_the_wait() {
    let address = TestUtils::run_server().await;
    let (mut leaving, _) = connect(&address).await;
    let (mut pusher, mut pusher_buffer) = connect(&address).await;

    TestUtils::send_bytes(
        &mut leaving,
        TestUtils::blpop_command(&["queue"], "0").encode().as_bytes(),
    )
    .await;
    TestUtils::sleep_ms(50).await;
    leaving.shutdown().await.unwrap();

    let mut received = Vec::new();
    timeout(Duration::from_secs(2), leaving.read_to_end(&mut received))
        .await
        .expect("server should close the connection")
        .unwrap();
    assert!(received.is_empty());

    TestUtils::send_command_and_receive(
        &mut pusher,
        &mut pusher_buffer,
        TestUtils::rpush_command("queue", &["job"]),
        RespValue::Integer(1),
    )
    .await;
    TestUtils::send_command_and_receive(
        &mut pusher,
        &mut pusher_buffer,
        TestUtils::llen_command("queue"),
        RespValue::Integer(1),
    )
    .await;
}
