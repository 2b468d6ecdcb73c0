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

//! Package source management on mutable distros: the system source list,
//! application source stanzas under sources.list.d, GPG keys, and the
//! forward-proxy rewrite for `#ReleaseService` repositories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use basalt_utils::{CommandSpec, Executor, FileSystem};

use crate::config::DispatcherConfig;
use crate::download::validate_url;
use crate::error::{DispatcherError, DispatcherResult};

pub const RELEASE_SERVICE_TAG: &str = "#ReleaseService";
const BACKUP_SUFFIX: &str = ".bak";

pub struct SourceManager {
    fs: Arc<dyn FileSystem>,
    executor: Arc<dyn Executor>,
    sources_list: PathBuf,
    sources_dir: PathBuf,
    gpg_key_dir: PathBuf,
    proxy_url: Option<String>,
    proxy_config_file: Option<PathBuf>,
    proxy_reload_command: Vec<String>,
}

impl SourceManager {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        executor: Arc<dyn Executor>,
        config: &DispatcherConfig,
    ) -> Self {
        Self {
            fs,
            executor,
            sources_list: config.apt_sources_list.clone(),
            sources_dir: config.apt_sources_dir.clone(),
            gpg_key_dir: config.gpg_key_dir.clone(),
            proxy_url: config.proxy_url.clone(),
            proxy_config_file: config.proxy_config_file.clone(),
            proxy_reload_command: config.proxy_reload_command.clone(),
        }
    }

    /// Replace the system source list, keeping the previous contents in a
    /// `.bak` sibling.
    pub fn update_os_sources(&self, source_list: &[String]) -> DispatcherResult<()> {
        if source_list.is_empty() {
            return Err(DispatcherError::BadRequest(
                "empty source list".to_string(),
            ));
        }
        if self.fs.exists(&self.sources_list) {
            if self.fs.is_symlink(&self.sources_list)? {
                return Err(DispatcherError::BadRequest(format!(
                    "{} is a symlink; refusing to rewrite",
                    self.sources_list.display()
                )));
            }
            let backup = backup_path(&self.sources_list);
            self.fs.copy(&self.sources_list, &backup)?;
        }
        let mut contents = source_list.join("\n");
        contents.push('\n');
        self.fs
            .write_atomic(&self.sources_list, contents.as_bytes())?;
        Ok(())
    }

    pub async fn add_application_source(
        &self,
        filename: &str,
        source_lines: &[String],
        gpg_key_uri: Option<&str>,
        gpg_key_name: Option<&str>,
    ) -> DispatcherResult<()> {
        validate_source_filename(filename)?;
        if source_lines.is_empty() {
            return Err(DispatcherError::BadRequest("empty source stanza".to_string()));
        }

        if let (Some(uri), Some(name)) = (gpg_key_uri, gpg_key_name) {
            self.install_gpg_key(uri, name).await?;
        }

        let lines = if source_lines
            .iter()
            .any(|line| line.contains(RELEASE_SERVICE_TAG))
        {
            let (rewritten, original_uri) = self.rewrite_release_service(source_lines)?;
            self.register_with_proxy(&original_uri).await?;
            rewritten
        } else {
            source_lines.to_vec()
        };

        let mut contents = lines.join("\n");
        contents.push('\n');
        self.fs.create_dir_all(&self.sources_dir)?;
        self.fs
            .write_atomic(&self.sources_dir.join(filename), contents.as_bytes())?;
        Ok(())
    }

    pub fn remove_application_source(
        &self,
        filename: &str,
        gpg_key_name: Option<&str>,
    ) -> DispatcherResult<()> {
        validate_source_filename(filename)?;
        let path = self.sources_dir.join(filename);
        match self.fs.remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        if let Some(name) = gpg_key_name {
            validate_source_filename(name)?;
            let key_path = self.gpg_key_dir.join(name);
            match self.fs.remove_file(&key_path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Rewrite the stanza's `URIs:` line to the forward proxy, returning
    /// the rewritten stanza and the original URI. Exactly one URI is
    /// required.
    fn rewrite_release_service(
        &self,
        source_lines: &[String],
    ) -> DispatcherResult<(Vec<String>, String)> {
        let proxy_url = self.proxy_url.as_deref().ok_or_else(|| {
            DispatcherError::Config(
                "repository carries #ReleaseService but no proxy is configured".to_string(),
            )
        })?;

        let uri_lines: Vec<usize> = source_lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.trim_start().starts_with("URIs:"))
            .map(|(index, _)| index)
            .collect();
        let [index] = uri_lines.as_slice() else {
            return Err(DispatcherError::BadRequest(
                "a #ReleaseService stanza must carry exactly one URIs line".to_string(),
            ));
        };

        let uris: Vec<&str> = source_lines[*index]
            .trim_start()
            .trim_start_matches("URIs:")
            .split_whitespace()
            .collect();
        let [original_uri] = uris.as_slice() else {
            return Err(DispatcherError::BadRequest(
                "a #ReleaseService stanza must carry exactly one URI".to_string(),
            ));
        };
        validate_url(original_uri)?;

        let mut rewritten = source_lines.to_vec();
        rewritten[*index] = format!("URIs: {proxy_url}");
        Ok((rewritten, original_uri.to_string()))
    }

    /// Insert the original repository URL at the proxy's `reverse_proxy`
    /// directive and reload the proxy.
    async fn register_with_proxy(&self, original_uri: &str) -> DispatcherResult<()> {
        let config_file = self.proxy_config_file.as_deref().ok_or_else(|| {
            DispatcherError::Config("no proxy configuration file configured".to_string())
        })?;
        let contents = self.fs.read_to_string(config_file)?;
        let rewritten = insert_reverse_proxy(&contents, original_uri)?;
        self.fs.write_atomic(config_file, rewritten.as_bytes())?;

        let mut parts = self.proxy_reload_command.iter();
        let program = parts.next().ok_or_else(|| {
            DispatcherError::Config("empty proxy reload command".to_string())
        })?;
        let spec = CommandSpec::new(program).args(parts.cloned());
        let output = self.executor.run(&spec).await?;
        if !output.success() {
            return Err(DispatcherError::CommandFailed {
                command: spec.to_string(),
                stderr: output.trimmed_stderr().to_string(),
            });
        }
        Ok(())
    }

    async fn install_gpg_key(&self, uri: &str, name: &str) -> DispatcherResult<()> {
        validate_source_filename(name)?;
        let url = validate_url(uri)?;
        let response = reqwest::get(url.clone())
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| DispatcherError::Download(format!("GET {url}: {err}")))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| DispatcherError::Download(format!("reading {url}: {err}")))?;

        self.fs.create_dir_all(&self.gpg_key_dir)?;
        // Stage the armored key beside its destination; gpg dearmors it
        // into the keyring file.
        let armored_path = self.gpg_key_dir.join(format!("{name}.armored"));
        self.fs.write_atomic(&armored_path, &body)?;

        let destination = self.gpg_key_dir.join(name);
        let spec = CommandSpec::new("gpg")
            .args(["--dearmor", "--yes", "--output"])
            .arg(destination.to_string_lossy().into_owned())
            .arg(armored_path.to_string_lossy().into_owned());
        let output = self.executor.run(&spec).await;

        match self.fs.remove_file(&armored_path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(
                    path = %armored_path.display(),
                    error = %err,
                    "could not remove staged key"
                );
            }
        }

        let output = output?;
        if !output.success() {
            return Err(DispatcherError::CommandFailed {
                command: spec.to_string(),
                stderr: output.trimmed_stderr().to_string(),
            });
        }
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Source file names land directly under sources.list.d; anything that
/// could traverse out of it is rejected.
fn validate_source_filename(filename: &str) -> DispatcherResult<()> {
    if filename.is_empty() {
        return Err(DispatcherError::BadRequest("empty file name".to_string()));
    }
    if filename.contains('/') || filename.contains("..") || filename.starts_with('.') {
        return Err(DispatcherError::BadRequest(format!(
            "invalid source file name {filename:?}"
        )));
    }
    Ok(())
}

/// Append the repository URL to the proxy's `reverse_proxy` directive.
pub fn insert_reverse_proxy(config: &str, url: &str) -> DispatcherResult<String> {
    let mut found = false;
    let lines: Vec<String> = config
        .lines()
        .map(|line| {
            if !found && line.trim_start().starts_with("reverse_proxy") {
                found = true;
                if line.contains(url) {
                    line.to_string()
                } else {
                    format!("{line} {url}")
                }
            } else {
                line.to_string()
            }
        })
        .collect();
    if !found {
        return Err(DispatcherError::Config(
            "proxy configuration carries no reverse_proxy directive".to_string(),
        ));
    }
    let mut rewritten = lines.join("\n");
    rewritten.push('\n');
    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use basalt_utils::{MockExecutor, RealFileSystem, SystemExecutor};

    use super::*;
    use crate::config::DistroKind;

    fn config(dir: &Path) -> DispatcherConfig {
        serde_json::from_value(serde_json::json!({
            "osType": "mutable",
            "aptSourcesList": dir.join("sources.list"),
            "aptSourcesDir": dir.join("sources.list.d"),
            "gpgKeyDir": dir.join("keyrings"),
            "proxyUrl": "https://localhost:8899",
            "proxyConfigFile": dir.join("Caddyfile"),
        }))
        .unwrap()
    }

    fn manager(dir: &Path) -> SourceManager {
        let cfg = config(dir);
        assert_eq!(cfg.os_type, DistroKind::Mutable);
        SourceManager::new(Arc::new(RealFileSystem), Arc::new(SystemExecutor), &cfg)
    }

    #[test]
    fn os_source_update_backs_up_and_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        let sources_list = dir.path().join("sources.list");
        std::fs::write(&sources_list, "deb https://old.example.com stable main\n").unwrap();

        let new_list = vec![
            "deb https://new.example.com stable main".to_string(),
            "deb https://new.example.com stable universe".to_string(),
        ];
        manager.update_os_sources(&new_list).unwrap();

        assert_eq!(
            std::fs::read_to_string(&sources_list).unwrap(),
            "deb https://new.example.com stable main\ndeb https://new.example.com stable universe\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("sources.list.bak")).unwrap(),
            "deb https://old.example.com stable main\n"
        );
    }

    #[test]
    fn symlinked_sources_list_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        let real = dir.path().join("real.list");
        std::fs::write(&real, "deb x\n").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("sources.list")).unwrap();

        let err = manager
            .update_os_sources(&["deb y".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("symlink"));
    }

    #[tokio::test]
    async fn add_then_remove_restores_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        let sources_dir = dir.path().join("sources.list.d");
        std::fs::create_dir_all(&sources_dir).unwrap();
        std::fs::write(sources_dir.join("existing.list"), "deb keepme\n").unwrap();
        let before = std::fs::read_dir(&sources_dir).unwrap().count();

        let stanza = vec![
            "Types: deb".to_string(),
            "URIs: https://apps.example.com/deb".to_string(),
            "Suites: stable".to_string(),
        ];
        manager
            .add_application_source("app.sources", &stanza, None, None)
            .await
            .unwrap();
        assert!(sources_dir.join("app.sources").exists());

        manager
            .remove_application_source("app.sources", None)
            .unwrap();
        assert_eq!(std::fs::read_dir(&sources_dir).unwrap().count(), before);
        assert_eq!(
            std::fs::read_to_string(sources_dir.join("existing.list")).unwrap(),
            "deb keepme\n"
        );
    }

    #[test]
    fn traversal_in_filenames_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        for bad in ["../evil.list", "a/b.list", ".hidden", ""] {
            assert!(
                manager.remove_application_source(bad, None).is_err(),
                "{bad:?} must be rejected"
            );
        }
    }

    #[tokio::test]
    async fn release_service_stanza_is_rewritten_and_registered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Caddyfile"),
            ":8899 {\n    reverse_proxy\n}\n",
        )
        .unwrap();

        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|spec| {
            assert_eq!(spec.program, "systemctl");
            Ok(basalt_utils::CommandOutput::default())
        });
        let manager = SourceManager::new(
            Arc::new(RealFileSystem),
            Arc::new(executor),
            &config(dir.path()),
        );

        let stanza = vec![
            "Types: deb #ReleaseService".to_string(),
            "URIs: https://releases.example.com/deb".to_string(),
            "Suites: stable".to_string(),
        ];
        manager
            .add_application_source("rs.sources", &stanza, None, None)
            .await
            .unwrap();

        let written =
            std::fs::read_to_string(dir.path().join("sources.list.d").join("rs.sources")).unwrap();
        assert!(written.contains("URIs: https://localhost:8899"));
        assert!(!written.contains("releases.example.com"));

        let proxy = std::fs::read_to_string(dir.path().join("Caddyfile")).unwrap();
        assert!(proxy.contains("reverse_proxy https://releases.example.com/deb"));
    }

    #[test]
    fn multiple_uris_in_release_service_stanza_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(dir.path());
        let stanza = vec![
            "Types: deb #ReleaseService".to_string(),
            "URIs: https://a.example.com https://b.example.com".to_string(),
        ];
        let err = manager.rewrite_release_service(&stanza).unwrap_err();
        assert!(err.to_string().contains("exactly one URI"));
    }

    #[test]
    fn proxy_config_without_directive_fails() {
        assert!(insert_reverse_proxy("{}\n", "https://x.example.com").is_err());
    }
}
