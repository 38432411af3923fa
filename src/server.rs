use std::{
    io,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use thiserror::Error;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::{debug, error, info};

use crate::{
    connection::{handle_connection, BufferLimits},
    engine::Engine,
};

/// Requests queued for the engine before connection tasks have to wait.
const ENGINE_QUEUE_CAPACITY: usize = 1024;

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Error, Debug, PartialEq, Clone)]
pub enum CliError {
    #[error("Invalid command line flag: {0}")]
    InvalidCommandLineFlag(String),
    #[error("Invalid value for command line flag {0}")]
    InvalidCommandLineFlagValue(String),
}

#[derive(Debug, Clone)]
pub struct RedisServer {
    pub host: String,
    pub port: u16,
    /// Per-connection read buffer sizing.
    pub buffer_limits: BufferLimits,
    /// How often blocked clients are checked for timeouts.
    pub sweep_interval: Duration,
}

impl Default for RedisServer {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            buffer_limits: BufferLimits::default(),
            sweep_interval: Duration::from_millis(100),
        }
    }
}

impl RedisServer {
    /// Builds the configuration from command line arguments, the first of
    /// which is the program name.
    ///
    /// Supported flags: `--port <1-65535>` and `--host <address>`.
    pub fn new<I: IntoIterator<Item = String>>(command_line_args: I) -> Result<Self, CliError> {
        let mut iter = command_line_args.into_iter().skip(1);
        let mut server = RedisServer::default();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--port" => {
                    let Some(port_str) = iter.next() else {
                        return Err(CliError::InvalidCommandLineFlagValue(arg));
                    };

                    let port_number = port_str
                        .parse::<u32>()
                        .map_err(|_| CliError::InvalidCommandLineFlagValue(arg.clone()))?;

                    if !(1..=65535).contains(&port_number) {
                        return Err(CliError::InvalidCommandLineFlagValue(arg));
                    }

                    server.port = port_number as u16;
                }
                "--host" => {
                    let Some(host) = iter.next() else {
                        return Err(CliError::InvalidCommandLineFlagValue(arg));
                    };

                    server.host = host;
                }
                _ => return Err(CliError::InvalidCommandLineFlag(arg)),
            }
        }

        Ok(server)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Binds the configured address and serves clients until the task is
    /// dropped.
    pub async fn run(&self) -> io::Result<()> {
        let listener = TcpListener::bind(self.address()).await?;
        info!(address = %self.address(), "redis server listening");

        self.serve(listener).await;
        Ok(())
    }

    /// Accepts clients on an already bound listener. The engine task lives as
    /// long as this future.
    pub async fn serve(&self, listener: TcpListener) {
        let (events_tx, events_rx) = mpsc::channel(ENGINE_QUEUE_CAPACITY);
        tokio::spawn(Engine::new().run(events_rx, self.sweep_interval));

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let client = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
                    debug!(client, %peer, "accepted connection");

                    tokio::spawn(handle_connection(
                        stream,
                        client,
                        events_tx.clone(),
                        self.buffer_limits,
                    ));
                }
                Err(e) => error!(?e, "accept error"),
            }
        }
    }
}
