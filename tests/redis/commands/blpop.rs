use std::time::Duration;

use redis_lite::commands::CommandError;

use crate::test_utils::{TestEnv, TestUtils};

#[test]
fn test_handle_blpop_command_immediate() {
    let mut env = TestEnv::new();

    env.exec_command_immediate_success_response(
        TestUtils::rpush_command("second", &["mango", "apple"]),
        1,
        &TestUtils::expected_integer(2),
    );

    env.exec_command_immediate_success_response(
        TestUtils::blpop_command(&["first", "second"], "0"),
        2,
        &TestUtils::expected_bulk_string_array(&["second", "mango"]),
    );
    assert_eq!(env.blocked_clients(), 0);
}

#[test]
fn test_handle_blpop_command_is_woken_by_lpush() {
    let mut env = TestEnv::new();

    let mut blocked = env.exec_command_blocking(TestUtils::blpop_command(&["grape"], "0"), 1);

    env.exec_command_immediate_success_response(
        TestUtils::lpush_command("grape", &["mango"]),
        2,
        &TestUtils::expected_integer(1),
    );

    TestUtils::expect_reply(
        &mut blocked,
        &TestUtils::expected_bulk_string_array(&["grape", "mango"]),
    );

    // The popped element is gone and the emptied list with it.
    env.exec_command_immediate_success_response(
        TestUtils::type_command("grape"),
        2,
        &TestUtils::expected_simple_string("none"),
    );
}

#[test]
fn test_handle_blpop_command_timeout() {
    let mut env = TestEnv::new();

    let mut blocked = env.exec_command_blocking(TestUtils::blpop_command(&["grape"], "0.5"), 1);

    assert_eq!(env.sweep_after(Duration::from_millis(100)), 0);
    TestUtils::expect_no_reply(&mut blocked);

    assert_eq!(env.sweep_after(Duration::from_secs(1)), 1);
    TestUtils::expect_reply(&mut blocked, &TestUtils::expected_null_array());

    // A later push no longer reaches the timed out client.
    env.exec_command_immediate_success_response(
        TestUtils::rpush_command("grape", &["mango"]),
        2,
        &TestUtils::expected_integer(1),
    );
    env.exec_command_immediate_success_response(
        TestUtils::llen_command("grape"),
        2,
        &TestUtils::expected_integer(1),
    );
}

#[test]
fn test_handle_blpop_command_invalid() {
    let mut env = TestEnv::new();

    let test_cases = vec![
        (
            TestUtils::command(&["BLPOP", "grape"]),
            CommandError::TooFewArguments {
                name: "blpop".to_string(),
                min: 2,
            },
        ),
        (
            TestUtils::blpop_command(&["grape"], "-1"),
            CommandError::NegativeTimeout,
        ),
        (
            TestUtils::blpop_command(&["grape"], "soon"),
            CommandError::InvalidTimeout,
        ),
    ];

    for (command, expected_error) in test_cases {
        env.exec_command_immediate_error_response(command, 1, expected_error);
    }

    assert_eq!(env.blocked_clients(), 0);
}
