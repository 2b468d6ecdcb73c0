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

//! Wire types shared by the basalt agents: the orchestrator-facing
//! `PlatformUpdate` service, the node-local `NodeStatus` service and the
//! dispatcher surface served over the UNIX domain socket.

pub mod granular;
pub mod socket;
pub mod update;

#[allow(clippy::large_enum_variant)]
pub mod basalt {
    include!("generated/basalt.rs");
}

pub use basalt::*;

/// Application-level status codes carried in dispatcher responses.
pub mod status_code {
    pub const OK: i32 = 200;
    pub const BAD_REQUEST: i32 = 400;
    pub const UNSUPPORTED_DISTRO: i32 = 415;
    pub const INTERNAL: i32 = 500;
    pub const NOT_IMPLEMENTED: i32 = 501;

    pub fn is_success(code: i32) -> bool {
        (200..300).contains(&code)
    }
}
