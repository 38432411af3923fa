use crate::{
    commands::{Arity, Command, CommandError, CommandOutcome},
    key_value_store::KeySpace,
    resp::RespValue,
};

/// `PING [message]`: replies `PONG`, or echoes the message back.
pub struct Ping;

impl Command for Ping {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn arity(&self) -> Arity {
        Arity::between(0, 1)
    }

    fn execute(
        &self,
        _keyspace: &mut KeySpace,
        arguments: &[String],
    ) -> Result<CommandOutcome, CommandError> {
        let reply = match arguments.first() {
            Some(message) => RespValue::BulkString(message.clone()),
            None => RespValue::SimpleString("PONG".to_string()),
        };

        Ok(CommandOutcome::Immediate(reply))
    }
}
