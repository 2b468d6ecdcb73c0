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

//! The pre-downloader: given the next maintenance window, pick a
//! randomized download moment ahead of it and stage the image through the
//! dispatcher. Downloads take the operation lock non-blockingly and are
//! skipped outright while an update holds it.

use std::sync::Arc;
use std::time::Duration;

use basalt_rpc::basalt::{DownloadMode, UpdateSystemSoftwareRequest};
use basalt_rpc::status_code;
use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::client::DispatcherHandle;
use crate::config::AgentConfig;
use crate::metadata::{MetadataStore, ProfileRecord, UpdateStatusKind, profiles_equal};

/// Re-planning input from the scheduler: the desired source, the next
/// firing, and what is currently booted.
#[derive(Debug, Clone)]
pub struct DownloadNotify {
    pub source: Option<ProfileRecord>,
    pub next_run: Option<DateTime<Utc>>,
    pub booted: Option<ProfileRecord>,
}

/// The closed range inside which the download moment is drawn.
///
/// With `i = immediate_window` and `w = download_window` ahead of the
/// update start `u`:
///   now ≤ u−i−w          → [u−i−w, u−i]
///   u−i−w < now < u−i    → [now, u−i]
///   otherwise            → [now, now]   (download immediately)
pub fn calculate_download_range(
    now: DateTime<Utc>,
    update_start: DateTime<Utc>,
    immediate_window: Duration,
    download_window: Duration,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let immediate = chrono::Duration::from_std(immediate_window)
        .unwrap_or_else(|_| chrono::Duration::seconds(0));
    let window = chrono::Duration::from_std(download_window)
        .unwrap_or_else(|_| chrono::Duration::seconds(0));

    let immediate_start = update_start - immediate;
    let download_start = immediate_start - window;

    if now <= download_start {
        (download_start, immediate_start)
    } else if now < immediate_start {
        (now, immediate_start)
    } else {
        (now, now)
    }
}

/// Uniform random point inside the range.
pub fn pick_download_time(
    range: (DateTime<Utc>, DateTime<Utc>),
    rng: &mut impl Rng,
) -> DateTime<Utc> {
    let (start, end) = range;
    let span = (end - start).num_seconds();
    if span <= 0 {
        return start;
    }
    start + chrono::Duration::seconds(rng.random_range(0..=span))
}

pub struct DownloaderDeps {
    pub config: Arc<AgentConfig>,
    pub metadata: MetadataStore,
    pub clock: Arc<dyn basalt_utils::Clock>,
    pub dispatcher: DispatcherHandle,
    pub op_lock: Arc<Mutex<()>>,
    pub cancel: CancellationToken,
}

pub async fn run_downloader(deps: DownloaderDeps, mut notifications: mpsc::Receiver<DownloadNotify>) {
    let mut planned: Option<(DateTime<Utc>, ProfileRecord)> = None;

    loop {
        let delay = planned
            .as_ref()
            .map(|(at, _)| (*at - deps.clock.now_utc()).to_std().unwrap_or(Duration::ZERO))
            .unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = deps.cancel.cancelled() => break,
            notify = notifications.recv() => {
                match notify {
                    // Any notification cancels the pending timer.
                    Some(notify) => planned = plan(&deps, notify),
                    None => break,
                }
            }
            _ = tokio::time::sleep(delay), if planned.is_some() => {
                let (_, source) = planned.take().expect("guarded by planned.is_some()");
                tokio::select! {
                    _ = deps.cancel.cancelled() => break,
                    _ = perform_download(&deps, &source) => {}
                }
            }
        }
    }
}

fn plan(deps: &DownloaderDeps, notify: DownloadNotify) -> Option<(DateTime<Utc>, ProfileRecord)> {
    let next_run = notify.next_run?;
    let source = notify.source?;
    if profiles_equal(Some(&source), notify.booted.as_ref()) {
        tracing::debug!("desired image already booted, no download planned");
        return None;
    }

    let range = calculate_download_range(
        deps.clock.now_utc(),
        next_run,
        deps.config.immediate_window,
        deps.config.download_window,
    );
    let at = pick_download_time(range, &mut rand::rng());
    tracing::info!(download_at = %at, update_at = %next_run, "download planned");
    Some((at, source))
}

async fn perform_download(deps: &DownloaderDeps, source: &ProfileRecord) {
    // Non-blocking: if an update holds the lock, skip; a later
    // notification re-plans.
    let Ok(_guard) = deps.op_lock.try_lock() else {
        tracing::info!("operation lock busy, skipping download");
        return;
    };

    let _ = deps.metadata.mutate(|m| {
        m.update_status = UpdateStatusKind::Downloading;
        m.update_log = format!("downloading {}", source.os_image_url);
    });

    let request = UpdateSystemSoftwareRequest {
        mode: DownloadMode::DownloadOnly as i32,
        package_list: vec![],
        url: Some(source.os_image_url.clone()),
        do_not_reboot: true,
        release_date: None,
        signature: Some(source.os_image_sha.clone()),
    };

    match deps.dispatcher.update_system_software(request).await {
        Ok(response) if status_code::is_success(response.status_code) => {
            let _ = deps.metadata.mutate(|m| {
                m.update_status = UpdateStatusKind::Downloaded;
                m.update_log = "image downloaded".to_string();
                m.os_profile_update_source_downloaded = Some(source.clone());
            });
        }
        Ok(response) => {
            tracing::warn!(code = response.status_code, error = %response.error, "download failed");
            let _ = deps.metadata.mutate(|m| {
                m.update_status = UpdateStatusKind::Failed;
                m.update_log = response.error.clone();
            });
        }
        Err(err) => {
            tracing::warn!(error = %err, "download dispatch failed");
            let _ = deps.metadata.mutate(|m| {
                m.update_status = UpdateStatusKind::Failed;
                m.update_log = format!("download dispatch failed: {err}");
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use proptest::prelude::*;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn far_ahead_uses_the_whole_download_window() {
        // update at t=10000, immediate=1000s, window=4000s
        let (a, b) = calculate_download_range(
            at(0),
            at(10_000),
            Duration::from_secs(1_000),
            Duration::from_secs(4_000),
        );
        assert_eq!(a, at(5_000));
        assert_eq!(b, at(9_000));
    }

    #[test]
    fn inside_the_window_starts_now() {
        let (a, b) = calculate_download_range(
            at(6_000),
            at(10_000),
            Duration::from_secs(1_000),
            Duration::from_secs(4_000),
        );
        assert_eq!(a, at(6_000));
        assert_eq!(b, at(9_000));
    }

    #[test]
    fn inside_the_immediate_window_fires_now() {
        let (a, b) = calculate_download_range(
            at(9_500),
            at(10_000),
            Duration::from_secs(1_000),
            Duration::from_secs(4_000),
        );
        assert_eq!(a, at(9_500));
        assert_eq!(b, at(9_500));
    }

    proptest! {
        /// For any now ≤ updateStart the range is well-formed: a ≤ b,
        /// a ≥ now, b ≤ updateStart.
        #[test]
        fn range_is_well_formed(
            now in 0i64..2_000_000,
            ahead in 0i64..2_000_000,
            immediate in 0u64..1_000_000,
            window in 0u64..1_000_000,
        ) {
            let now = at(now);
            let update_start = now + chrono::Duration::seconds(ahead);
            let (a, b) = calculate_download_range(
                now,
                update_start,
                Duration::from_secs(immediate),
                Duration::from_secs(window),
            );
            prop_assert!(a <= b);
            prop_assert!(a >= now);
            prop_assert!(b <= update_start);
        }

        #[test]
        fn picked_time_stays_in_range(
            ahead in 0i64..2_000_000,
            immediate in 0u64..1_000_000,
            window in 0u64..1_000_000,
            seed in any::<u64>(),
        ) {
            use rand::SeedableRng;
            let now = at(1_000);
            let update_start = now + chrono::Duration::seconds(ahead);
            let range = calculate_download_range(
                now,
                update_start,
                Duration::from_secs(immediate),
                Duration::from_secs(window),
            );
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let picked = pick_download_time(range, &mut rng);
            prop_assert!(picked >= range.0);
            prop_assert!(picked <= range.1);
        }
    }
}
