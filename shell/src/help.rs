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

//! The `help` command

use crate::handler::Registry;
use crate::{Command, FnCommand, Producer, ShellHandler};
use iacnet_service::Context;
use std::sync::{RwLock, Weak};
use tokio::io::AsyncWriteExt;

/// Lists every registered command name plus the exit command, sorted, one per line.
///
/// Create it with [`ShellHandler::help_producer`] or [`help`]. It reads the registry when
/// the command is produced, so commands registered later are listed too.
#[derive(Debug, Clone)]
pub struct HelpProducer {
    registry: Weak<RwLock<Registry>>,
    exit_command_name: String,
}

/// Create a help producer for `shell`
pub fn help(shell: &ShellHandler) -> HelpProducer {
    shell.help_producer()
}

impl HelpProducer {
    pub(crate) fn new(registry: Weak<RwLock<Registry>>, exit_command_name: String) -> Self {
        Self {
            registry,
            exit_command_name,
        }
    }
}

impl Producer for HelpProducer {
    fn produce(&self, _ctx: &Context, _name: &str, _args: &[String]) -> Option<Box<dyn Command>> {
        let registry = self.registry.upgrade()?;
        let mut names = Registry::names(&registry);
        names.push(self.exit_command_name.clone());
        names.sort();
        names.dedup();

        Some(Box::new(FnCommand::new(move |_stdin, mut stdout, _stderr| async move {
            for name in names {
                stdout.write_all(name.as_bytes()).await?;
                stdout.write_all(b"\r\n").await?;
            }
            Ok(())
        })))
    }
}
