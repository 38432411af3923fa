//! The single control flow that owns all server state.
//!
//! Connection tasks never touch the keyspace. They send [`EngineEvent`]s over
//! one channel and the engine handles them strictly in arrival order, so a
//! command, the wake it triggers and the timeout sweep never interleave with
//! anything else.

use std::time::Duration;

use tokio::{
    sync::{mpsc, oneshot},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    blocking::BlockingRegistry,
    commands::{CommandOutcome, CommandRegistry},
    key_value_store::KeySpace,
    resp::RespValue,
};

/// Identifies one client connection for the lifetime of the process.
pub type ClientId = u64;

#[derive(Debug)]
pub enum EngineEvent {
    /// A decoded request. The reply is sent through `reply` once available,
    /// which may be much later for a blocking command.
    Request {
        client: ClientId,
        input: RespValue,
        reply: oneshot::Sender<RespValue>,
    },
    /// The client's connection is gone; forget anything it was waiting for.
    Disconnected { client: ClientId },
}

pub struct Engine {
    keyspace: KeySpace,
    commands: CommandRegistry,
    blocking: BlockingRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_commands(CommandRegistry::with_default_commands())
    }

    pub fn with_commands(commands: CommandRegistry) -> Self {
        Self {
            keyspace: KeySpace::new(),
            commands,
            blocking: BlockingRegistry::new(),
        }
    }

    pub fn keyspace_mut(&mut self) -> &mut KeySpace {
        &mut self.keyspace
    }

    /// Number of clients currently parked on a blocking command.
    pub fn blocked_clients(&self) -> usize {
        self.blocking.len()
    }

    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Request {
                client,
                input,
                reply,
            } => self.handle_request(client, input, reply),
            EngineEvent::Disconnected { client } => {
                self.handle_disconnect(client);
            }
        }
    }

    /// Runs one request to completion, or parks it.
    ///
    /// A write that reports a key to wake gets its own reply first; then the
    /// earliest client blocked on that key gets exactly one chance to finish,
    /// before any other event is looked at.
    pub fn handle_request(
        &mut self,
        client: ClientId,
        input: RespValue,
        reply: oneshot::Sender<RespValue>,
    ) {
        match self.commands.dispatch(input, &mut self.keyspace) {
            Ok(CommandOutcome::Immediate(value)) => send_reply(client, reply, value),
            Ok(CommandOutcome::ImmediateAndWake { reply: value, key }) => {
                send_reply(client, reply, value);
                self.blocking.wake(&key, &mut self.keyspace);
            }
            Ok(CommandOutcome::Suspend(suspension)) => {
                self.blocking.add(client, suspension, reply);
            }
            Err(error) => {
                debug!(client, %error, "command failed");
                send_reply(client, reply, error.as_resp());
            }
        }
    }

    /// Returns how many waiters the client left behind.
    pub fn handle_disconnect(&mut self, client: ClientId) -> usize {
        let removed = self.blocking.remove_client(client);

        if removed > 0 {
            debug!(client, removed, "dropped waiters of disconnected client");
        }

        removed
    }

    /// Times out every waiter whose deadline is at or before `now`.
    pub fn sweep(&mut self, now: Instant) -> usize {
        self.blocking.sweep(now)
    }

    /// Handles events until every sender is gone, sweeping expired waiters
    /// after each event and on every tick of `sweep_interval`.
    pub async fn run(mut self, mut events: mpsc::Receiver<EngineEvent>, sweep_interval: Duration) {
        let mut ticker = time::interval(sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut commands = self.commands.names().collect::<Vec<_>>();
        commands.sort_unstable();
        info!(?commands, "engine started");

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
                _ = ticker.tick() => {}
            }

            self.sweep(Instant::now());
        }

        if self.keyspace.is_empty() {
            info!("engine stopped");
        } else {
            info!(keys = self.keyspace.len(), "engine stopped, discarding in-memory keys");
        }
    }
}

fn send_reply(client: ClientId, reply: oneshot::Sender<RespValue>, value: RespValue) {
    if reply.send(value).is_err() {
        debug!(client, "client went away before its reply was ready");
    }
}
