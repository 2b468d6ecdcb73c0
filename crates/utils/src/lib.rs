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

//! Narrow capabilities that wrap every effect the agents perform against the
//! host: process execution, file access, wall-clock time and network
//! reachability. Components take these as trait objects so tests can
//! substitute behaviors without touching the machine.

pub mod clock;
pub mod executor;
pub mod filesystem;
pub mod network;

pub use clock::{Clock, MockClock, SystemClock};
pub use executor::{CommandOutput, CommandSpec, Executor, MockExecutor, SystemExecutor};
pub use filesystem::{FileSystem, MockFileSystem, RealFileSystem, write_atomic};
pub use network::{MockNetworkProbe, NetworkProbe, SystemNetworkProbe};
