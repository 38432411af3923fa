use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    resp::RespValue,
};

/// `TYPE key`: `string`, `list`, `stream` or `none`.
pub struct Type;

impl Command for Type {
    fn name(&self) -> &'static str {
        "type"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn execute(
        &self,
        keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let type_name = keyspace.type_of(&arguments[0]);
        Ok(CommandOutcome::Immediate(RespValue::SimpleString(
            type_name.to_string(),
        )))
    }
}
