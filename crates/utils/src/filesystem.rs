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

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use mockall::automock;

/// Replace `path` with `contents` atomically: write to a temp file in the
/// same directory, fsync, then rename over the target. Readers either see
/// the old file or the new one, never a torn write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no parent directory", path.display()),
        )
    })?;
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[automock]
pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    /// Atomic replacement, see [`write_atomic`].
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn exists(&self, path: &Path) -> bool;
    /// True when the path itself is a symlink (does not follow).
    fn is_symlink(&self, path: &Path) -> io::Result<bool>;
    /// Entry names (not full paths) of a directory.
    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>>;
    /// Fully resolved path, following every symlink.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
    /// Bytes available to unprivileged callers on the filesystem holding
    /// `path` (statvfs `f_bavail * f_frsize`).
    fn free_space_bytes(&self, path: &Path) -> io::Result<u64>;
    /// Raw statfs magic of the filesystem holding `path`.
    fn filesystem_magic(&self, path: &Path) -> io::Result<i64>;
}

#[derive(Debug, Default, Clone)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        write_atomic(path, contents)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_symlink(&self, path: &Path) -> io::Result<bool> {
        Ok(std::fs::symlink_metadata(path)?.file_type().is_symlink())
    }

    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn free_space_bytes(&self, path: &Path) -> io::Result<u64> {
        let stat = nix::sys::statvfs::statvfs(path).map_err(io::Error::from)?;
        Ok(stat.blocks_available() as u64 * stat.fragment_size() as u64)
    }

    fn filesystem_magic(&self, path: &Path) -> io::Result<i64> {
        let stat = nix::sys::statfs::statfs(path).map_err(io::Error::from)?;
        Ok(stat.filesystem_type().0 as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("state.json");

        write_atomic(&target, b"first").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"first");

        write_atomic(&target, b"second").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"second");
    }

    #[test]
    fn write_atomic_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("meta.json");
        write_atomic(&target, b"{}").unwrap();

        let names = RealFileSystem.read_dir_names(dir.path()).unwrap();
        assert_eq!(names, vec!["meta.json".to_string()]);
    }

    #[test]
    fn symlink_detection_does_not_follow() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        let link = dir.path().join("link");
        std::fs::write(&file, b"x").unwrap();
        std::os::unix::fs::symlink(&file, &link).unwrap();

        let fs = RealFileSystem;
        assert!(!fs.is_symlink(&file).unwrap());
        assert!(fs.is_symlink(&link).unwrap());
    }

    #[test]
    fn free_space_is_nonzero_on_tempdir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RealFileSystem.free_space_bytes(dir.path()).unwrap() > 0);
    }
}
