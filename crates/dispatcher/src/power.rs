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

use std::sync::Arc;

use basalt_utils::{CommandSpec, Executor};

use crate::error::{DispatcherError, DispatcherResult};

const REBOOT_BIN: &str = "/usr/sbin/reboot";
const SHUTDOWN_BIN: &str = "/usr/sbin/shutdown";

#[derive(Clone)]
pub struct PowerControl {
    executor: Arc<dyn Executor>,
}

impl PowerControl {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    pub async fn reboot(&self) -> DispatcherResult<()> {
        self.invoke(CommandSpec::new(REBOOT_BIN)).await
    }

    pub async fn shutdown(&self) -> DispatcherResult<()> {
        self.invoke(CommandSpec::new(SHUTDOWN_BIN).args(["-h", "now"]))
            .await
    }

    async fn invoke(&self, spec: CommandSpec) -> DispatcherResult<()> {
        let output = self.executor.run(&spec).await?;
        if !output.success() {
            return Err(DispatcherError::CommandFailed {
                command: spec.to_string(),
                stderr: output.trimmed_stderr().to_string(),
            });
        }
        Ok(())
    }
}
