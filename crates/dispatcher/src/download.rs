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

//! URL validation, the trusted-repository policy and artifact fetching.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use basalt_rpc::basalt::HashAlgorithm;
use basalt_utils::FileSystem;
use sha2::{Digest, Sha256, Sha384, Sha512};
use url::Url;

use crate::error::{DispatcherError, DispatcherResult};

/// Requests must parse, use https and carry a host.
pub fn validate_url(raw: &str) -> DispatcherResult<Url> {
    if raw.trim().is_empty() {
        return Err(DispatcherError::BadRequest("empty URL".to_string()));
    }
    let url = Url::parse(raw)
        .map_err(|err| DispatcherError::BadRequest(format!("unparseable URL {raw:?}: {err}")))?;
    if url.scheme() != "https" {
        return Err(DispatcherError::BadRequest(format!(
            "URL {raw:?} must use https"
        )));
    }
    if url.host_str().is_none() {
        return Err(DispatcherError::BadRequest(format!(
            "URL {raw:?} carries no host"
        )));
    }
    Ok(url)
}

/// A URL is trusted iff some configured prefix is a prefix of it.
pub fn check_trusted(url: &Url, trusted_repositories: &[String]) -> DispatcherResult<()> {
    let raw = url.as_str();
    if trusted_repositories
        .iter()
        .any(|prefix| raw.starts_with(prefix.as_str()))
    {
        Ok(())
    } else {
        Err(DispatcherError::UntrustedRepository(raw.to_string()))
    }
}

pub fn digest_hex(algorithm: HashAlgorithm, data: &[u8]) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(data)),
        // sha384 is the default when unspecified.
        HashAlgorithm::Sha384 | HashAlgorithm::Unspecified => hex::encode(Sha384::digest(data)),
    }
}

/// Compare a hex signature against the digest of `data`, case-insensitively.
pub fn verify_signature(
    algorithm: HashAlgorithm,
    data: &[u8],
    signature: &str,
) -> DispatcherResult<()> {
    let digest = digest_hex(algorithm, data);
    if digest.eq_ignore_ascii_case(signature.trim()) {
        Ok(())
    } else {
        Err(DispatcherError::BadRequest(
            "signature does not match downloaded content".to_string(),
        ))
    }
}

pub fn filename_from_url(url: &Url) -> DispatcherResult<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            DispatcherError::BadRequest(format!("URL {url} carries no file name"))
        })
}

#[derive(Clone)]
pub struct ArtifactFetcher {
    fs: Arc<dyn FileSystem>,
    download_dir: PathBuf,
}

impl ArtifactFetcher {
    pub fn new(fs: Arc<dyn FileSystem>, download_dir: PathBuf) -> Self {
        Self { fs, download_dir }
    }

    pub fn local_path(&self, url: &Url) -> DispatcherResult<PathBuf> {
        Ok(self.download_dir.join(filename_from_url(url)?))
    }

    /// Download `url` into the download directory, checking free space
    /// against the advertised content length first.
    pub async fn fetch(&self, url: &Url) -> DispatcherResult<PathBuf> {
        let destination = self.local_path(url)?;
        self.fs.create_dir_all(&self.download_dir)?;

        let response = reqwest::get(url.clone())
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| DispatcherError::Download(format!("GET {url}: {err}")))?;

        if let Some(length) = response.content_length() {
            let available = self.fs.free_space_bytes(&self.download_dir)?;
            if available < length {
                return Err(DispatcherError::InsufficientDiskSpace {
                    needed: length,
                    available,
                });
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| DispatcherError::Download(format!("reading {url}: {err}")))?;
        self.fs.write_atomic(&destination, &body)?;
        Ok(destination)
    }

    pub fn read(&self, path: &Path) -> DispatcherResult<Vec<u8>> {
        Ok(self.fs.read(path)?)
    }
}
