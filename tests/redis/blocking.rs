use std::time::Duration;

use crate::test_utils::{TestEnv, TestUtils};

#[test]
fn test_blocked_clients_are_served_in_arrival_order() {
    let mut env = TestEnv::new();

    let mut first = env.exec_command_blocking(TestUtils::blpop_command(&["queue"], "0"), 1);
    let mut second = env.exec_command_blocking(TestUtils::blpop_command(&["queue"], "0"), 2);
    let mut third = env.exec_command_blocking(TestUtils::blpop_command(&["queue"], "0"), 3);
    assert_eq!(env.blocked_clients(), 3);

    // One push wakes exactly one waiter, the oldest.
    env.exec_command_immediate_success_response(
        TestUtils::rpush_command("queue", &["a", "b"]),
        4,
        &TestUtils::expected_integer(2),
    );

    TestUtils::expect_reply(
        &mut first,
        &TestUtils::expected_bulk_string_array(&["queue", "a"]),
    );
    TestUtils::expect_no_reply(&mut second);
    TestUtils::expect_no_reply(&mut third);

    env.exec_command_immediate_success_response(
        TestUtils::rpush_command("queue", &["c"]),
        4,
        &TestUtils::expected_integer(2),
    );

    TestUtils::expect_reply(
        &mut second,
        &TestUtils::expected_bulk_string_array(&["queue", "b"]),
    );
    TestUtils::expect_no_reply(&mut third);
    assert_eq!(env.blocked_clients(), 1);
}

#[test]
fn test_multi_key_waiter_is_released_from_every_key() {
    let mut env = TestEnv::new();

    let mut both = env.exec_command_blocking(TestUtils::blpop_command(&["left", "right"], "0"), 1);
    let mut right_only = env.exec_command_blocking(TestUtils::blpop_command(&["right"], "0"), 2);

    env.exec_command_immediate_success_response(
        TestUtils::lpush_command("left", &["x"]),
        3,
        &TestUtils::expected_integer(1),
    );
    TestUtils::expect_reply(
        &mut both,
        &TestUtils::expected_bulk_string_array(&["left", "x"]),
    );

    // Client 1 must not be found again under "right".
    env.exec_command_immediate_success_response(
        TestUtils::lpush_command("right", &["y"]),
        3,
        &TestUtils::expected_integer(1),
    );
    TestUtils::expect_reply(
        &mut right_only,
        &TestUtils::expected_bulk_string_array(&["right", "y"]),
    );
    assert_eq!(env.blocked_clients(), 0);
}

#[test]
fn test_disconnected_client_stops_waiting() {
    let mut env = TestEnv::new();

    let gone = env.exec_command_blocking(TestUtils::blpop_command(&["queue"], "0"), 1);
    let mut waiting = env.exec_command_blocking(TestUtils::blpop_command(&["queue"], "0"), 2);

    drop(gone);
    assert_eq!(env.disconnect(1), 1);

    env.exec_command_immediate_success_response(
        TestUtils::rpush_command("queue", &["a"]),
        3,
        &TestUtils::expected_integer(1),
    );
    TestUtils::expect_reply(
        &mut waiting,
        &TestUtils::expected_bulk_string_array(&["queue", "a"]),
    );
}

#[test]
fn test_timed_out_waiter_is_removed_from_every_key() {
    let mut env = TestEnv::new();

    let mut timed = env.exec_command_blocking(TestUtils::blpop_command(&["a", "b"], "0.2"), 1);
    let mut forever = env.exec_command_blocking(TestUtils::blpop_command(&["b"], "0"), 2);

    assert_eq!(env.sweep_after(Duration::from_secs(1)), 1);
    TestUtils::expect_reply(&mut timed, &TestUtils::expected_null_array());

    env.exec_command_immediate_success_response(
        TestUtils::rpush_command("b", &["z"]),
        3,
        &TestUtils::expected_integer(1),
    );
    TestUtils::expect_reply(
        &mut forever,
        &TestUtils::expected_bulk_string_array(&["b", "z"]),
    );
}

#[test]
fn test_blpop_and_xread_share_the_wake_path() {
    let mut env = TestEnv::new();

    let mut list_waiter = env.exec_command_blocking(TestUtils::blpop_command(&["events"], "0"), 1);

    // A stream write on another key leaves the list waiter alone.
    env.exec_command_immediate_success_response(
        TestUtils::xadd_command("weather", "1-1", &["temperature", "36"]),
        2,
        &TestUtils::expected_bulk_string("1-1"),
    );
    TestUtils::expect_no_reply(&mut list_waiter);

    let mut stream_waiter = env.exec_command_blocking(
        TestUtils::xread_blocking_command("0", &["weather"], &["1-1"]),
        3,
    );

    env.exec_command_immediate_success_response(
        TestUtils::xadd_command("weather", "1-2", &["temperature", "37"]),
        2,
        &TestUtils::expected_bulk_string("1-2"),
    );
    TestUtils::expect_reply(
        &mut stream_waiter,
        &TestUtils::expected_xread(&[("weather", vec![("1-2", vec!["temperature", "37"])])]),
    );
    TestUtils::expect_no_reply(&mut list_waiter);
}
