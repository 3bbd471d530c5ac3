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

//! Producers turn a parsed shell line into a command

use crate::{Command, FnCommand, PipeReader, PipeWriter, ShellResult};
use iacnet_service::Context;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Factory for the command registered under a name.
///
/// `produce` is called once per dispatched line with the session context, the command name
/// and its arguments. Returning `None` makes the shell report the command as not found.
pub trait Producer: Send + Sync {
    /// Build a command for `name` with `args`
    fn produce(&self, ctx: &Context, name: &str, args: &[String]) -> Option<Box<dyn Command>>;
}

/// A [`Producer`] backed by a closure
pub struct ProducerFn<F> {
    f: F,
}

/// Wrap a closure as a [`Producer`].
///
/// # Example
///
/// ```
/// use iacnet_shell::{FnCommand, producer_fn};
/// use tokio::io::AsyncWriteExt;
///
/// let echo = producer_fn(|_ctx, _name, args| {
///     let line = format!("{}\r\n", args.join(" "));
///     Some(Box::new(FnCommand::new(move |_stdin, mut stdout, _stderr| async move {
///         stdout.write_all(line.as_bytes()).await?;
///         Ok(())
///     })))
/// });
/// ```
pub fn producer_fn<F>(f: F) -> ProducerFn<F>
where
    F: Fn(&Context, &str, &[String]) -> Option<Box<dyn Command>> + Send + Sync,
{
    ProducerFn { f }
}

impl<F> Producer for ProducerFn<F>
where
    F: Fn(&Context, &str, &[String]) -> Option<Box<dyn Command>> + Send + Sync,
{
    fn produce(&self, ctx: &Context, name: &str, args: &[String]) -> Option<Box<dyn Command>> {
        (self.f)(ctx, name, args)
    }
}

impl<F> fmt::Debug for ProducerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProducerFn").finish_non_exhaustive()
    }
}

/// A [`Producer`] that runs the same async function for every invocation.
///
/// Each produced command is a fresh [`FnCommand`] around the function. The function only
/// sees the pipes; use [`producer_fn`] when the arguments matter.
pub struct FnProducer<F> {
    body: Arc<F>,
}

impl<F, Fut> FnProducer<F>
where
    F: Fn(PipeReader, PipeWriter, PipeWriter) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ShellResult<()>> + Send + 'static,
{
    /// Wrap `body`
    pub fn new(body: F) -> Self {
        Self {
            body: Arc::new(body),
        }
    }
}

impl<F, Fut> Producer for FnProducer<F>
where
    F: Fn(PipeReader, PipeWriter, PipeWriter) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ShellResult<()>> + Send + 'static,
{
    fn produce(&self, _ctx: &Context, _name: &str, _args: &[String]) -> Option<Box<dyn Command>> {
        let body = self.body.clone();
        Some(Box::new(FnCommand::new(move |stdin, stdout, stderr| {
            body(stdin, stdout, stderr)
        })))
    }
}

impl<F> fmt::Debug for FnProducer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProducer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iacnet_service::ConnectionId;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn ctx() -> Context {
        Context::new(ConnectionId::new(1))
    }

    #[test]
    fn test_producer_fn_sees_name_and_args() {
        let producer = producer_fn(|_, name, args| {
            assert_eq!(name, "greet");
            assert_eq!(args, ["a".to_string(), "b".to_string()]);
            None
        });
        let args = vec!["a".to_string(), "b".to_string()];
        assert!(producer.produce(&ctx(), "greet", &args).is_none());
    }

    #[tokio::test]
    async fn test_fn_producer_makes_fresh_commands() {
        let producer = FnProducer::new(|_stdin, mut stdout: PipeWriter, _stderr| async move {
            stdout.write_all(b"tick").await?;
            Ok(())
        });

        for _ in 0..2 {
            let mut command = producer.produce(&ctx(), "tick", &[]).unwrap();
            let mut stdout = command.stdout_pipe().unwrap();
            command.run().await.unwrap();

            let mut out = String::new();
            stdout.read_to_string(&mut out).await.unwrap();
            assert_eq!(out, "tick");
        }
    }
}
