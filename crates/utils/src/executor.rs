/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::fmt::{self, Display, Formatter};

use async_trait::async_trait;
use mockall::automock;

/// A fully-specified external command: program, arguments and any
/// environment overrides. Built once and handed to an [`Executor`], so the
/// exact invocation can also be logged or embedded in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl Display for CommandSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The stderr stream with surrounding whitespace removed. Callers treat
    /// a non-empty value as a failure signal even on exit 0.
    pub fn trimmed_stderr(&self) -> &str {
        self.stderr.trim()
    }
}

#[automock]
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run the command to completion and capture both output streams.
    /// An `Err` means the process could not be spawned at all; a non-zero
    /// exit is reported through [`CommandOutput::exit_code`].
    async fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput>;
}

/// Runs commands on the host with `tokio::process`.
#[derive(Debug, Default, Clone)]
pub struct SystemExecutor;

#[async_trait]
impl Executor for SystemExecutor {
    async fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        tracing::debug!(command = %spec, "executing");
        let mut command = tokio::process::Command::new(&spec.program);
        command.args(&spec.args);
        for (key, value) in &spec.envs {
            command.env(key, value);
        }
        let output = command.output().await?;
        Ok(CommandOutput {
            // A missing code means the process died from a signal.
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_spec_display_includes_args() {
        let spec = CommandSpec::new("apt-get").args(["update", "-q"]);
        assert_eq!(spec.to_string(), "apt-get update -q");
    }

    #[tokio::test]
    async fn system_executor_captures_stdout_and_exit_code() {
        let output = SystemExecutor
            .run(&CommandSpec::new("/bin/echo").arg("hello"))
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
        assert!(output.trimmed_stderr().is_empty());
    }

    #[tokio::test]
    async fn system_executor_reports_spawn_failure() {
        let result = SystemExecutor
            .run(&CommandSpec::new("/nonexistent/binary"))
            .await;
        assert!(result.is_err());
    }
}
