use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    ops::strings,
    resp::RespValue,
};

pub struct Incr;

impl Command for Incr {
    fn name(&self) -> &'static str {
        "incr"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let incremented = strings::incr(keyspace, &arguments[0])?;
        Ok(CommandOutcome::Immediate(RespValue::Integer(incremented)))
    }
}
