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

use basalt_rpc::status_code;

#[derive(thiserror::Error, Debug)]
pub enum DispatcherError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Operation not supported on this distribution: {0}")]
    UnsupportedDistro(&'static str),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Untrusted repository: {0}")]
    UntrustedRepository(String),

    #[error("Insufficient disk space: {needed} bytes required, {available} available")]
    InsufficientDiskSpace { needed: u64, available: u64 },

    /// An external tool exited non-zero or wrote to stderr. The quoted
    /// stderr is the user-visible detail.
    #[error("Command `{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DispatcherError {
    /// Application-level status code carried in the RPC response message.
    pub fn status_code(&self) -> i32 {
        match self {
            DispatcherError::BadRequest(_)
            | DispatcherError::UntrustedRepository(_)
            | DispatcherError::InsufficientDiskSpace { .. } => status_code::BAD_REQUEST,
            DispatcherError::UnsupportedDistro(_) => status_code::UNSUPPORTED_DISTRO,
            DispatcherError::NotImplemented(_) => status_code::NOT_IMPLEMENTED,
            DispatcherError::CommandFailed { .. }
            | DispatcherError::Snapshot(_)
            | DispatcherError::Download(_)
            | DispatcherError::Config(_)
            | DispatcherError::Io(_)
            | DispatcherError::Json(_) => status_code::INTERNAL,
        }
    }
}

pub type DispatcherResult<T> = Result<T, DispatcherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_convention() {
        assert_eq!(
            DispatcherError::BadRequest("empty url".into()).status_code(),
            400
        );
        assert_eq!(
            DispatcherError::UnsupportedDistro("source updates").status_code(),
            415
        );
        assert_eq!(DispatcherError::NotImplemented("swbom").status_code(), 501);
        assert_eq!(
            DispatcherError::Snapshot("tool missing".into()).status_code(),
            500
        );
    }
}
