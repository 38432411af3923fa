use crate::test_utils::{TestEnv, TestUtils};

#[test]
fn test_handle_type_command() {
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
        TestUtils::xadd_command("weather", "1-1", &["temperature", "36"]),
        1,
        &TestUtils::expected_bulk_string("1-1"),
    );

    let test_cases = vec![
        ("grape", "string"),
        ("fruits", "list"),
        ("weather", "stream"),
        ("missing", "none"),
    ];

    for (key, expected_type) in test_cases {
        env.exec_command_immediate_success_response(
            TestUtils::type_command(key),
            1,
            &TestUtils::expected_simple_string(expected_type),
        );
    }
}
