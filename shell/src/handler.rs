//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Shell handler: command registry and the per-connection session loop

use crate::{HelpProducer, PipeReader, Producer, ShellConfig};
use async_trait::async_trait;
use iacnet_codec::{CodecError, DataReader, DataWriter};
use iacnet_service::{Context, Handler, RawReader, RawWriter};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, instrument, trace, warn};

/// Name to producer table shared by every session of a shell.
#[derive(Default)]
pub(crate) struct Registry {
    producers: HashMap<String, Arc<dyn Producer>>,
    fallback: Option<Arc<dyn Producer>>,
}

impl Registry {
    fn read(lock: &RwLock<Registry>) -> RwLockReadGuard<'_, Registry> {
        lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(lock: &RwLock<Registry>) -> RwLockWriteGuard<'_, Registry> {
        lock.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registered names in no particular order
    pub(crate) fn names(lock: &RwLock<Registry>) -> Vec<String> {
        Self::read(lock).producers.keys().cloned().collect()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.producers.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// A [`Handler`] that runs a line-oriented command shell on each connection.
///
/// A session writes the welcome message and a prompt, then reads one line at a time.
/// The first word of a line names the command and the rest are its arguments. Blank lines
/// only re-prompt. The exit command ends the session. Any other name is looked up in the
/// registry, falling back to the producer set with
/// [`register_else`](ShellHandler::register_else); when neither yields a command the
/// session reports `<name>: command not found`.
///
/// A found command runs while its standard output and standard error are copied onto the
/// connection. The next prompt is written only after the command and both copies have
/// finished. When the client goes away, or the exit command is given, the exit message
/// is the last thing written.
///
/// The registry may be changed while sessions are running.
///
/// # Example
///
/// ```no_run
/// use iacnet_service::{Server, ServerConfig};
/// use iacnet_shell::{FnProducer, ShellHandler};
/// use std::sync::Arc;
/// use tokio::io::AsyncWriteExt;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let shell = ShellHandler::new().must_register(
///     "ping",
///     FnProducer::new(|_stdin, mut stdout, _stderr| async move {
///         stdout.write_all(b"pong\r\n").await?;
///         Ok(())
///     }),
/// );
/// let server = Server::with_handler(ServerConfig::new("0.0.0.0:2323".parse()?), Arc::new(shell));
/// server.listen_and_serve().await?;
/// # Ok(())
/// # }
/// ```
pub struct ShellHandler {
    config: ShellConfig,
    registry: Arc<RwLock<Registry>>,
}

impl Default for ShellHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellHandler {
    /// Create a shell with the default configuration and no commands
    pub fn new() -> Self {
        Self::with_config(ShellConfig::default())
    }

    /// Create a shell with `config` and no commands
    pub fn with_config(config: ShellConfig) -> Self {
        Self {
            config,
            registry: Arc::new(RwLock::new(Registry::default())),
        }
    }

    /// Get the shell configuration
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Register `producer` under `name`, replacing any previous one
    pub fn register<P: Producer + 'static>(&self, name: impl Into<String>, producer: P) {
        let name = name.into();
        debug!(command = %name, "registering command");
        Registry::write(&self.registry)
            .producers
            .insert(name, Arc::new(producer));
    }

    /// Set the producer used for names that are not registered
    pub fn register_else<P: Producer + 'static>(&self, producer: P) {
        Registry::write(&self.registry).fallback = Some(Arc::new(producer));
    }

    /// Builder form of [`register`](ShellHandler::register)
    pub fn must_register<P: Producer + 'static>(
        self,
        name: impl Into<String>,
        producer: P,
    ) -> Self {
        self.register(name, producer);
        self
    }

    /// Builder form of [`register_else`](ShellHandler::register_else)
    pub fn must_register_else<P: Producer + 'static>(self, producer: P) -> Self {
        self.register_else(producer);
        self
    }

    /// Registered command names, sorted
    pub fn command_names(&self) -> Vec<String> {
        let mut names = Registry::names(&self.registry);
        names.sort();
        names
    }

    /// A producer for the `help` command of this shell
    pub fn help_producer(&self) -> HelpProducer {
        HelpProducer::new(
            Arc::downgrade(&self.registry),
            self.config.exit_command_name.clone(),
        )
    }

    fn lookup(&self, name: &str) -> Option<Arc<dyn Producer>> {
        let registry = Registry::read(&self.registry);
        registry
            .producers
            .get(name)
            .or(registry.fallback.as_ref())
            .cloned()
    }

    async fn session<W, R>(
        &self,
        ctx: &Context,
        writer: &Mutex<DataWriter<W>>,
        mut reader: R,
    ) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
        R: AsyncBufRead + Unpin,
    {
        let config = &self.config;
        emit(writer, config.welcome_message.as_bytes()).await?;
        emit(writer, config.prompt.as_bytes()).await?;

        let mut line = Vec::new();
        loop {
            match reader.read_until(b'\n', &mut line).await {
                Ok(_) if line.last() == Some(&b'\n') => {}
                Ok(_) => {
                    if !line.is_empty() {
                        trace!(bytes = line.len(), "discarding unterminated line");
                    }
                    break;
                }
                Err(error) if CodecError::is_protocol_error(&error) => {
                    warn!(%error, "ignoring malformed telnet command");
                    continue;
                }
                Err(error) => {
                    debug!(%error, "read failed");
                    break;
                }
            }

            let raw = std::mem::take(&mut line);
            let mut fields = raw
                .split(|b| b.is_ascii_whitespace())
                .filter(|field| !field.is_empty());
            let Some(name) = fields.next() else {
                emit(writer, config.prompt.as_bytes()).await?;
                continue;
            };

            if name == config.exit_command_name.as_bytes() {
                debug!("exit requested");
                return emit(writer, config.exit_message.as_bytes()).await;
            }

            // Producers are keyed by text, so a name that is not UTF-8 can never match one.
            let Ok(name_text) = std::str::from_utf8(name) else {
                debug!(name = ?String::from_utf8_lossy(name), "command name is not UTF-8");
                not_found(writer, name).await?;
                emit(writer, config.prompt.as_bytes()).await?;
                continue;
            };
            let args = fields
                .map(|field| std::str::from_utf8(field).map(str::to_owned))
                .collect::<Result<Vec<String>, _>>();
            match args {
                Ok(args) => self.dispatch(ctx, name_text, &args, writer).await?,
                Err(error) => {
                    debug!(name = name_text, %error, "rejecting non UTF-8 arguments");
                    let message = format!("{}: arguments must be valid UTF-8\r\n", name_text);
                    emit(writer, message.as_bytes()).await?;
                }
            }
            emit(writer, config.prompt.as_bytes()).await?;
        }

        emit(writer, config.exit_message.as_bytes()).await
    }

    #[instrument(level = "debug", skip(self, ctx, writer))]
    async fn dispatch<W>(
        &self,
        ctx: &Context,
        name: &str,
        args: &[String],
        writer: &Mutex<DataWriter<W>>,
    ) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let command = self
            .lookup(name)
            .and_then(|producer| producer.produce(ctx, name, args));
        let Some(mut command) = command else {
            debug!("command not found");
            return not_found(writer, name.as_bytes()).await;
        };

        // Nothing feeds standard input; dropping it gives the command end-of-input.
        if let Err(error) = command.stdin_pipe() {
            debug!(%error, "stdin unavailable");
        }
        let stdout = command
            .stdout_pipe()
            .inspect_err(|error| debug!(%error, "stdout unavailable"))
            .ok();
        let stderr = command
            .stderr_pipe()
            .inspect_err(|error| debug!(%error, "stderr unavailable"))
            .ok();

        let (result, copied_out, copied_err) = tokio::join!(
            command.run(),
            bridge(stdout, writer),
            bridge(stderr, writer)
        );
        match result {
            Ok(()) => trace!("command finished"),
            Err(error) => warn!(%error, "command failed"),
        }
        let (copied_out, copied_err) = (copied_out?, copied_err?);
        trace!(stdout = copied_out, stderr = copied_err, "output bridged");
        Ok(())
    }
}

impl fmt::Debug for ShellHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellHandler")
            .field("config", &self.config)
            .field("commands", &self.command_names())
            .finish()
    }
}

#[async_trait]
impl Handler for ShellHandler {
    #[instrument(name = "shell_session", skip_all, fields(connection_id = %ctx.id()))]
    async fn serve(&self, ctx: &Context, writer: &mut RawWriter<'_>, reader: &mut RawReader<'_>) {
        let writer = Mutex::new(DataWriter::new(writer));
        let reader = BufReader::new(DataReader::new(reader));

        debug!("session started");
        match self.session(ctx, &writer, reader).await {
            Ok(()) => debug!("session ended"),
            Err(error) => debug!(%error, "session ended early"),
        }
    }
}

/// Write `bytes` to the connection and flush them
async fn emit<W>(writer: &Mutex<DataWriter<W>>, bytes: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = writer.lock().await;
    writer.write_all(bytes).await?;
    writer.flush().await
}

/// Report `<name>: command not found`, keeping the name's bytes as received
async fn not_found<W>(writer: &Mutex<DataWriter<W>>, name: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut message = Vec::with_capacity(name.len() + 21);
    message.extend_from_slice(name);
    message.extend_from_slice(b": command not found\r\n");
    emit(writer, &message).await
}

/// Copy a command's output pipe onto the connection until the command closes it
async fn bridge<W>(pipe: Option<PipeReader>, writer: &Mutex<DataWriter<W>>) -> io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let Some(mut pipe) = pipe else {
        return Ok(0);
    };

    let mut buffer = [0u8; 1024];
    let mut total = 0;
    loop {
        let n = pipe.read(&mut buffer).await?;
        if n == 0 {
            return Ok(total);
        }
        emit(writer, &buffer[..n]).await?;
        total += n as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer_fn;
    use bytes::Bytes;
    use iacnet_service::ConnectionId;
    use tokio_util::io::StreamReader;
    use tracing_test::traced_test;

    async fn run(shell: &ShellHandler, chunks: Vec<&'static [u8]>) -> Vec<u8> {
        let chunks: Vec<io::Result<Bytes>> =
            chunks.into_iter().map(|c| Ok(Bytes::from_static(c))).collect();
        let mut reader = StreamReader::new(futures::stream::iter(chunks));
        let mut output = Vec::new();
        let ctx = Context::new(ConnectionId::new(9));
        shell.serve(&ctx, &mut output, &mut reader).await;
        output
    }

    #[tokio::test]
    #[traced_test]
    async fn test_malformed_input_is_logged() {
        run(&ShellHandler::new(), vec![&b"a"[..], &[255, 0x20], b"\r\n"]).await;
        assert!(logs_contain("ignoring malformed telnet command"));
        assert!(logs_contain("conn-9"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_dispatch_is_traced() {
        let shell = ShellHandler::new().must_register("nil", producer_fn(|_, _, _| None));
        run(&shell, vec![&b"nil arg\r\n"[..]]).await;
        assert!(logs_contain("command not found"));
        assert!(logs_contain("name=\"nil\""));
    }

    #[test]
    fn test_lookup_prefers_registered_name() {
        let shell = ShellHandler::new()
            .must_register("a", producer_fn(|_, _, _| None))
            .must_register_else(producer_fn(|_, _, _| None));
        let direct = shell.lookup("a").unwrap();
        let fallback = shell.lookup("zzz").unwrap();
        assert!(!Arc::ptr_eq(&direct, &fallback));
        assert!(ShellHandler::new().lookup("a").is_none());
    }

    #[test]
    fn test_command_names_sorted() {
        let shell = ShellHandler::new();
        for name in ["zeta", "alpha", "mid"] {
            shell.register(name, producer_fn(|_, _, _| None));
        }
        assert_eq!(shell.command_names(), vec!["alpha", "mid", "zeta"]);
    }
}
