use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    resp::RespValue,
};

/// `EXISTS key [key ...]`: counts live keys. A key named twice counts twice.
pub struct Exists;

impl Command for Exists {
    fn name(&self) -> &'static str {
        "exists"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(1)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let found = arguments
            .iter()
            .filter(|key| keyspace.exists(key))
            .count();

        Ok(CommandOutcome::Immediate(RespValue::Integer(found as i64)))
    }
}
