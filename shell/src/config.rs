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

//! Shell configuration

/// Default name of the command that ends a session
pub const DEFAULT_EXIT_COMMAND_NAME: &str = "exit";
/// Default prompt
pub const DEFAULT_PROMPT: &str = "$ ";
/// Default text sent when a session starts
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome!\r\n";
/// Default text sent when a session ends
pub const DEFAULT_EXIT_MESSAGE: &str = "Goodbye!\r\n";

/// Shell configuration
///
/// # Example
///
/// ```
/// use iacnet_shell::ShellConfig;
///
/// let config = ShellConfig::default()
///     .with_prompt("> ")
///     .with_welcome_message("Hello there.\r\n")
///     .with_exit_command_name("quit");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Name of the command that ends a session
    pub exit_command_name: String,
    /// Prompt written before every line is read
    pub prompt: String,
    /// Text written when a session starts
    pub welcome_message: String,
    /// Text written when a session ends
    pub exit_message: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            exit_command_name: DEFAULT_EXIT_COMMAND_NAME.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            exit_message: DEFAULT_EXIT_MESSAGE.to_string(),
        }
    }
}

impl ShellConfig {
    /// Set the exit command name
    pub fn with_exit_command_name(mut self, name: impl Into<String>) -> Self {
        self.exit_command_name = name.into();
        self
    }

    /// Set the prompt
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the welcome message
    pub fn with_welcome_message(mut self, message: impl Into<String>) -> Self {
        self.welcome_message = message.into();
        self
    }

    /// Set the exit message
    pub fn with_exit_message(mut self, message: impl Into<String>) -> Self {
        self.exit_message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.exit_command_name, "exit");
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.welcome_message, "Welcome!\r\n");
        assert_eq!(config.exit_message, "Goodbye!\r\n");
    }

    #[test]
    fn test_builder_overrides() {
        let config = ShellConfig::default()
            .with_exit_command_name("quit")
            .with_prompt("> ")
            .with_welcome_message("hi\r\n")
            .with_exit_message("bye\r\n");
        assert_eq!(config.exit_command_name, "quit");
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.welcome_message, "hi\r\n");
        assert_eq!(config.exit_message, "bye\r\n");
    }
}
