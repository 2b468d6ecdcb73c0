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

//! The privileged update dispatcher (`inbd`): a gRPC service on a
//! root-owned UNIX domain socket that owns update execution on the node.
//! OS package updates on mutable distributions, snapshot-backed image
//! updates on immutable ones, firmware updates, package source and
//! configuration management, plus the post-reboot verifier that
//! classifies an update outcome across a reboot.

pub mod apt;
pub mod config;
pub mod configops;
pub mod download;
pub mod error;
pub mod firmware;
pub mod granular;
pub mod osimage;
pub mod power;
pub mod query;
pub mod schema;
pub mod server;
pub mod snapshot;
pub mod socket;
pub mod sources;
pub mod state;
pub mod verifier;

pub use error::{DispatcherError, DispatcherResult};
