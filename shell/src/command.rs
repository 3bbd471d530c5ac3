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

//! Commands run by the shell

use crate::{PipeReader, PipeWriter, ShellError, ShellResult, pipe};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// A unit of work started by a shell line.
///
/// A command looks like a child process from the outside: the caller feeds it through the
/// writable [`stdin_pipe`](Command::stdin_pipe) and drains the readable
/// [`stdout_pipe`](Command::stdout_pipe) and [`stderr_pipe`](Command::stderr_pipe) while
/// [`run`](Command::run) executes. Each pipe endpoint is handed out once and `run` may be
/// called once.
///
/// Output pipes are bounded, so a command that writes more than a pipe holds needs its
/// output drained concurrently with `run`.
#[async_trait]
pub trait Command: Send {
    /// Run the command to completion
    async fn run(&mut self) -> ShellResult<()>;

    /// Writable end of the command's standard input
    fn stdin_pipe(&mut self) -> ShellResult<PipeWriter>;

    /// Readable end of the command's standard output
    fn stdout_pipe(&mut self) -> ShellResult<PipeReader>;

    /// Readable end of the command's standard error
    fn stderr_pipe(&mut self) -> ShellResult<PipeReader>;
}

type BodyFuture = Pin<Box<dyn Future<Output = ShellResult<()>> + Send>>;
type BoxedBody = Box<dyn FnOnce(PipeReader, PipeWriter, PipeWriter) -> BodyFuture + Send>;

/// A [`Command`] backed by an async function.
///
/// The function receives the command side of the three pipes: standard input to read
/// from, standard output and standard error to write to. They are closed when the function
/// returns, which is what ends the caller's view of the output streams.
///
/// # Example
///
/// ```
/// use iacnet_shell::FnCommand;
/// use tokio::io::AsyncWriteExt;
///
/// let command = FnCommand::new(|_stdin, mut stdout, _stderr| async move {
///     stdout.write_all(b"hello\r\n").await?;
///     Ok(())
/// });
/// ```
pub struct FnCommand {
    body: Option<BoxedBody>,
    stdin: Option<PipeReader>,
    stdout: Option<PipeWriter>,
    stderr: Option<PipeWriter>,
    stdin_pipe: Option<PipeWriter>,
    stdout_pipe: Option<PipeReader>,
    stderr_pipe: Option<PipeReader>,
}

impl FnCommand {
    /// Wrap `body` as a command with fresh pipes
    pub fn new<F, Fut>(body: F) -> Self
    where
        F: FnOnce(PipeReader, PipeWriter, PipeWriter) -> Fut + Send + 'static,
        Fut: Future<Output = ShellResult<()>> + Send + 'static,
    {
        let (stdin_pipe, stdin) = pipe();
        let (stdout, stdout_pipe) = pipe();
        let (stderr, stderr_pipe) = pipe();
        Self {
            body: Some(Box::new(move |i, o, e| -> BodyFuture { Box::pin(body(i, o, e)) })),
            stdin: Some(stdin),
            stdout: Some(stdout),
            stderr: Some(stderr),
            stdin_pipe: Some(stdin_pipe),
            stdout_pipe: Some(stdout_pipe),
            stderr_pipe: Some(stderr_pipe),
        }
    }
}

/// Promote an async function into a boxed [`Command`]
pub fn promote<F, Fut>(body: F) -> Box<dyn Command>
where
    F: FnOnce(PipeReader, PipeWriter, PipeWriter) -> Fut + Send + 'static,
    Fut: Future<Output = ShellResult<()>> + Send + 'static,
{
    Box::new(FnCommand::new(body))
}

#[async_trait]
impl Command for FnCommand {
    async fn run(&mut self) -> ShellResult<()> {
        let body = self.body.take().ok_or(ShellError::AlreadyRun)?;
        let (Some(stdin), Some(stdout), Some(stderr)) =
            (self.stdin.take(), self.stdout.take(), self.stderr.take())
        else {
            return Err(ShellError::AlreadyRun);
        };
        body(stdin, stdout, stderr).await
    }

    fn stdin_pipe(&mut self) -> ShellResult<PipeWriter> {
        self.stdin_pipe.take().ok_or(ShellError::PipeTaken("stdin"))
    }

    fn stdout_pipe(&mut self) -> ShellResult<PipeReader> {
        self.stdout_pipe.take().ok_or(ShellError::PipeTaken("stdout"))
    }

    fn stderr_pipe(&mut self) -> ShellResult<PipeReader> {
        self.stderr_pipe.take().ok_or(ShellError::PipeTaken("stderr"))
    }
}

impl fmt::Debug for FnCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCommand")
            .field("ran", &self.body.is_none())
            .finish_non_exhaustive()
    }
}
