use crate::test_utils::{TestEnv, TestUtils};

#[test]
fn test_handle_lpush_command_prepends_in_turn() {
    let mut env = TestEnv::new();

    env.exec_command_immediate_success_response(
        TestUtils::rpush_command("letters", &["d"]),
        1,
        &TestUtils::expected_integer(1),
    );

    env.exec_command_immediate_success_response(
        TestUtils::lpush_command("letters", &["a", "b", "c"]),
        1,
        &TestUtils::expected_integer(4),
    );

    env.exec_command_immediate_success_response(
        TestUtils::lrange_command("letters", 0, -1),
        1,
        &TestUtils::expected_bulk_string_array(&["c", "b", "a", "d"]),
    );
}
