use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    resp::RespValue,
};

/// `DEL key [key ...]`: replies with the number of keys that were removed.
pub struct Del;

impl Command for Del {
    fn name(&self) -> &'static str {
        "del"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(1)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let removed = arguments
            .iter()
            .filter(|key| keyspace.delete(key))
            .count();

        Ok(CommandOutcome::Immediate(RespValue::Integer(removed as i64)))
    }
}
