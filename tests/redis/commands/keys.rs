use crate::test_utils::{TestEnv, TestUtils};

#[test]
fn test_handle_del_and_exists_commands() {
    let mut env = TestEnv::new();

    env.exec_command_immediate_success_response(
        TestUtils::set_command("grape", "mango"),
        1,
        &TestUtils::expected_simple_string("OK"),
    );
    env.exec_command_immediate_success_response(
        TestUtils::rpush_command("fruits", &["mango"]),
        1,
        &TestUtils::expected_integer(1),
    );

    env.exec_command_immediate_success_response(
        TestUtils::command(&["EXISTS", "grape", "fruits", "grape", "missing"]),
        1,
        &TestUtils::expected_integer(3),
    );

    env.exec_command_immediate_success_response(
        TestUtils::command(&["DEL", "grape", "missing"]),
        1,
        &TestUtils::expected_integer(1),
    );

    env.exec_command_immediate_success_response(
        TestUtils::command(&["EXISTS", "grape"]),
        1,
        &TestUtils::expected_integer(0),
    );
    env.exec_command_immediate_success_response(
        TestUtils::type_command("fruits"),
        1,
        &TestUtils::expected_simple_string("list"),
    );
}
