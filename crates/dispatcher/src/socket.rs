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

//! Dispatcher socket preparation. The socket is created under a 0177
//! umask so it is never observable with open permissions, then handed to
//! `root:inbc` with mode 0660: the daemon runs as root, the `inbc` group
//! gains send-only access.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use basalt_rpc::socket::DISPATCHER_SOCKET_GROUP;
use nix::sys::stat::{Mode, umask};
use nix::unistd::{Gid, Uid, chown};

use crate::error::{DispatcherError, DispatcherResult};

pub fn prepare_socket(path: &Path) -> DispatcherResult<tokio::net::UnixListener> {
    // A stale socket from a previous run is expected; any other stat
    // failure aborts startup.
    match std::fs::symlink_metadata(path) {
        Ok(_) => std::fs::remove_file(path)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    let previous = umask(Mode::from_bits_truncate(0o177));
    let bound = std::os::unix::net::UnixListener::bind(path);
    umask(previous);
    let listener = bound?;

    match uzers::get_group_by_name(DISPATCHER_SOCKET_GROUP) {
        Some(group) => {
            if let Err(err) = chown(
                path,
                Some(Uid::from_raw(0)),
                Some(Gid::from_raw(group.gid())),
            ) {
                tracing::warn!(
                    group = DISPATCHER_SOCKET_GROUP,
                    error = %err,
                    "could not chown dispatcher socket"
                );
            }
        }
        None => {
            tracing::warn!(
                group = DISPATCHER_SOCKET_GROUP,
                "socket group does not exist; clients outside root will be refused"
            );
        }
    }
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o660))?;

    listener.set_nonblocking(true)?;
    tokio::net::UnixListener::from_std(listener).map_err(DispatcherError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_with_restricted_mode_and_replaces_stale_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inbd.sock");

        let first = prepare_socket(&path).unwrap();
        drop(first);

        // The stale socket file is still on disk; a second prepare must
        // replace it rather than fail to bind.
        let _second = prepare_socket(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o660);
    }
}
