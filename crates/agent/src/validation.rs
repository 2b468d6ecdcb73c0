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

//! Distro-specific validation of orchestrator responses. An invalid
//! response is dropped with a logged reason; it never reaches the
//! scheduler.

use basalt_rpc::basalt::{OsType, PlatformUpdateStatusResponse};

use crate::config::DistroKind;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("response carries no {0}")]
    MissingField(&'static str),

    #[error("response targets another distribution kind")]
    OsTypeMismatch,

    #[error("kernel command violates safe kernel settings")]
    UnsafeKernelCommand,
}

/// Kernel command lines may only use `[A-Za-z0-9-_=.,/ ]`.
pub fn is_safe_kernel_command(command: &str) -> bool {
    command
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_=.,/ ".contains(c))
}

pub fn validate_response(
    node: DistroKind,
    response: &PlatformUpdateStatusResponse,
) -> Result<(), ValidationError> {
    match node {
        DistroKind::Mutable => {
            let source = response
                .update_source
                .as_ref()
                .ok_or(ValidationError::MissingField("updateSource"))?;
            response
                .update_schedule
                .as_ref()
                .ok_or(ValidationError::MissingField("updateSchedule"))?;
            if response.os_type() == OsType::Immutable {
                return Err(ValidationError::OsTypeMismatch);
            }
            if !is_safe_kernel_command(&source.kernel_command) {
                return Err(ValidationError::UnsafeKernelCommand);
            }
        }
        DistroKind::Immutable => {
            response
                .os_profile_update_source
                .as_ref()
                .ok_or(ValidationError::MissingField("osProfileUpdateSource"))?;
            response
                .update_schedule
                .as_ref()
                .ok_or(ValidationError::MissingField("updateSchedule"))?;
            if response.os_type() == OsType::Mutable {
                return Err(ValidationError::OsTypeMismatch);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use basalt_rpc::basalt::{
        OsProfileUpdateSource, SingleSchedule, UpdateSchedule, UpdateSource,
    };

    use super::*;

    fn mutable_response(kernel_command: &str) -> PlatformUpdateStatusResponse {
        PlatformUpdateStatusResponse {
            update_source: Some(UpdateSource {
                kernel_command: kernel_command.to_string(),
                os_repo_url: "https://repo.example.com".to_string(),
                custom_repos: vec![],
                updated_packages: vec![],
            }),
            os_profile_update_source: None,
            update_schedule: Some(UpdateSchedule {
                single_schedule: Some(SingleSchedule {
                    start_seconds: 100,
                    end_seconds: 200,
                }),
                repeated_schedules: vec![],
            }),
            installed_packages: vec![],
            os_type: OsType::Mutable as i32,
        }
    }

    #[test]
    fn safe_kernel_commands_pass() {
        for command in ["", "quiet splash", "root=/dev/sda1 ro,quiet", "a-b_c=d.e/f 1"] {
            assert!(is_safe_kernel_command(command), "{command:?}");
        }
    }

    #[test]
    fn shell_metacharacters_are_unsafe() {
        for command in ["rm -rf /; echo", "$(reboot)", "a|b", "x&y", "tick`", "new\nline"] {
            assert!(!is_safe_kernel_command(command), "{command:?}");
        }
    }

    #[test]
    fn valid_mutable_response_is_accepted() {
        assert!(validate_response(DistroKind::Mutable, &mutable_response("quiet splash")).is_ok());
    }

    #[test]
    fn unsafe_kernel_command_drops_the_response() {
        let err =
            validate_response(DistroKind::Mutable, &mutable_response("rm -rf /")).unwrap_err();
        assert_eq!(err, ValidationError::UnsafeKernelCommand);
        assert!(err.to_string().contains("kernel command violates safe kernel settings"));
    }

    #[test]
    fn mutable_rejects_missing_source_or_schedule() {
        let mut response = mutable_response("quiet");
        response.update_source = None;
        assert_eq!(
            validate_response(DistroKind::Mutable, &response),
            Err(ValidationError::MissingField("updateSource"))
        );

        let mut response = mutable_response("quiet");
        response.update_schedule = None;
        assert_eq!(
            validate_response(DistroKind::Mutable, &response),
            Err(ValidationError::MissingField("updateSchedule"))
        );
    }

    #[test]
    fn immutable_only_responses_are_dropped_on_mutable_nodes() {
        let mut response = mutable_response("quiet");
        response.os_type = OsType::Immutable as i32;
        assert_eq!(
            validate_response(DistroKind::Mutable, &response),
            Err(ValidationError::OsTypeMismatch)
        );
    }

    #[test]
    fn immutable_requires_a_profile_source() {
        let response = PlatformUpdateStatusResponse {
            update_source: None,
            os_profile_update_source: Some(OsProfileUpdateSource {
                profile_name: "edge".to_string(),
                profile_version: "2.0".to_string(),
                os_image_id: "img".to_string(),
                os_image_url: "https://images.example.com/img".to_string(),
                os_image_sha: "abc".to_string(),
            }),
            update_schedule: Some(UpdateSchedule {
                single_schedule: None,
                repeated_schedules: vec![],
            }),
            installed_packages: vec![],
            os_type: OsType::Immutable as i32,
        };
        assert!(validate_response(DistroKind::Immutable, &response).is_ok());

        let mut missing = response.clone();
        missing.os_profile_update_source = None;
        assert_eq!(
            validate_response(DistroKind::Immutable, &missing),
            Err(ValidationError::MissingField("osProfileUpdateSource"))
        );
    }
}
