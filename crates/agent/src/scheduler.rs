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

//! Maintenance-window scheduling: one optional one-shot window plus any
//! number of repeated cron windows. A new orchestrator response replaces
//! the whole schedule set. The single schedule never re-fires inside its
//! window once an update has reached the dispatcher, even across agent
//! restarts.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use basalt_rpc::basalt::{
    DownloadMode, PlatformUpdateStatusResponse, UpdateSchedule, UpdateSystemSoftwareRequest,
};
use basalt_rpc::granular::{GranularLog, UpdatePhase};
use basalt_rpc::status_code;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::client::DispatcherHandle;
use crate::config::{AgentConfig, DistroKind};
use crate::downloader::DownloadNotify;
use crate::metadata::{
    AgentMetadata, MetadataStore, ProfileRecord, RepeatedScheduleRecord, SingleScheduleRecord,
    UpdateInProgress, UpdateSourceRecord, UpdateStatusKind, profiles_equal,
};

impl RepeatedScheduleRecord {
    fn cron_expression(&self) -> String {
        // The cron crate wants a seconds field; windows are minute-grained.
        format!(
            "0 {} {} {} {} {}",
            self.cron_minutes,
            self.cron_hours,
            self.cron_day_month,
            self.cron_month,
            self.cron_day_week
        )
    }

    /// The next moment this schedule should fire. When a window opened
    /// earlier, is still running and has not fired yet (`last_fired`
    /// predates its opening), that is now.
    pub fn next_run(
        &self,
        now: DateTime<Utc>,
        last_fired: Option<DateTime<Utc>>,
    ) -> Option<DateTime<Utc>> {
        let schedule = match cron::Schedule::from_str(&self.cron_expression()) {
            Ok(schedule) => schedule,
            Err(err) => {
                tracing::warn!(
                    expression = %self.cron_expression(),
                    error = %err,
                    "unusable repeated schedule"
                );
                return None;
            }
        };
        if self.duration_seconds > 0 {
            let duration = chrono::Duration::seconds(self.duration_seconds);
            if let Some(opened) = schedule.after(&(now - duration)).next()
                && opened <= now
                && now < opened + duration
                && last_fired.is_none_or(|fired| fired < opened)
            {
                return Some(now);
            }
        }
        schedule.after(&now).next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Single,
    Repeated(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledJob {
    pub fire_at: DateTime<Utc>,
    pub kind: JobKind,
}

#[derive(Debug, Default)]
struct RepeatedJob {
    record: RepeatedScheduleRecord,
    last_fired: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    single: Option<SingleScheduleRecord>,
    /// In-memory only: a one-shot window already dispatched this run must
    /// not spin even when the dispatcher was unreachable. The persisted
    /// `single_schedule_finished` marker still governs restarts.
    single_fired: bool,
    repeated: Vec<RepeatedJob>,
}

impl Scheduler {
    /// Restore the schedule set persisted in the metadata.
    pub fn from_metadata(metadata: &AgentMetadata) -> Self {
        Self {
            single: metadata.single_schedule,
            single_fired: false,
            repeated: metadata
                .repeated_schedules
                .iter()
                .cloned()
                .map(|record| RepeatedJob {
                    record,
                    last_fired: None,
                })
                .collect(),
        }
    }

    /// Replace the schedule set. `None` clears any pending jobs.
    pub fn apply(&mut self, schedule: Option<&UpdateSchedule>) {
        self.single_fired = false;
        match schedule {
            Some(schedule) => {
                self.single = schedule
                    .single_schedule
                    .as_ref()
                    .map(SingleScheduleRecord::from);
                self.repeated = schedule
                    .repeated_schedules
                    .iter()
                    .map(|record| RepeatedJob {
                        record: RepeatedScheduleRecord::from(record),
                        last_fired: None,
                    })
                    .collect();
            }
            None => {
                self.single = None;
                self.repeated = Vec::new();
            }
        }
    }

    pub fn mark_fired(&mut self, job: ScheduledJob, now: DateTime<Utc>) {
        match job.kind {
            JobKind::Single => self.single_fired = true,
            JobKind::Repeated(index) => {
                if let Some(repeated) = self.repeated.get_mut(index) {
                    repeated.last_fired = Some(now);
                }
            }
        }
    }

    /// The earliest pending job, if any. `single_schedule_finished`
    /// suppresses the one-shot window.
    pub fn next_job(&self, now: DateTime<Utc>, single_finished: bool) -> Option<ScheduledJob> {
        let mut best: Option<ScheduledJob> = None;
        let mut consider = |candidate: ScheduledJob| {
            if best.is_none_or(|b| candidate.fire_at < b.fire_at) {
                best = Some(candidate);
            }
        };

        if let Some(single) = &self.single
            && !single_finished
            && !self.single_fired
        {
            let window = single.to_rpc();
            if let Some(start) = window.start_time() {
                if now < start {
                    consider(ScheduledJob {
                        fire_at: start,
                        kind: JobKind::Single,
                    });
                } else if window.contains(now) {
                    consider(ScheduledJob {
                        fire_at: now,
                        kind: JobKind::Single,
                    });
                }
            }
        }

        for (index, repeated) in self.repeated.iter().enumerate() {
            if let Some(fire_at) = repeated.record.next_run(now, repeated.last_fired) {
                consider(ScheduledJob {
                    fire_at,
                    kind: JobKind::Repeated(index),
                });
            }
        }
        best
    }
}

pub struct SchedulerDeps {
    pub config: Arc<AgentConfig>,
    pub metadata: MetadataStore,
    pub fs: Arc<dyn basalt_utils::FileSystem>,
    pub clock: Arc<dyn basalt_utils::Clock>,
    pub dispatcher: DispatcherHandle,
    /// The per-process operation lock serializing downloads and updates.
    pub op_lock: Arc<Mutex<()>>,
    pub downloader_tx: mpsc::Sender<DownloadNotify>,
    pub cancel: CancellationToken,
}

pub async fn run_scheduler(
    deps: SchedulerDeps,
    mut responses: mpsc::Receiver<PlatformUpdateStatusResponse>,
) {
    let mut scheduler = Scheduler::from_metadata(&deps.metadata.load());

    loop {
        let metadata = deps.metadata.load();
        let next = scheduler.next_job(deps.clock.now_utc(), metadata.single_schedule_finished);
        let delay = next
            .map(|job| until(deps.clock.now_utc(), job.fire_at))
            .unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = deps.cancel.cancelled() => break,
            response = responses.recv() => {
                match response {
                    Some(response) => apply_response(&deps, &mut scheduler, response).await,
                    None => break,
                }
            }
            _ = tokio::time::sleep(delay), if next.is_some() => {
                let job = next.expect("guarded by next.is_some()");
                fire(&deps, job).await;
                scheduler.mark_fired(job, deps.clock.now_utc());
            }
        }
    }
}

fn until(now: DateTime<Utc>, fire_at: DateTime<Utc>) -> Duration {
    (fire_at - now).to_std().unwrap_or(Duration::ZERO)
}

/// Persist the source, reprogram the schedule, then notify the
/// pre-downloader, in that order.
async fn apply_response(
    deps: &SchedulerDeps,
    scheduler: &mut Scheduler,
    response: PlatformUpdateStatusResponse,
) {
    let persisted = deps.metadata.mutate(|metadata| {
        if let Some(source) = &response.update_source {
            metadata.update_source = Some(UpdateSourceRecord::from(source));
        }
        if let Some(profile) = &response.os_profile_update_source {
            metadata.os_profile_update_source_desired = Some(ProfileRecord::from(profile));
        }
        metadata.installed_packages = response.installed_packages.clone();

        let new_single = response
            .update_schedule
            .as_ref()
            .and_then(|schedule| schedule.single_schedule.as_ref())
            .map(SingleScheduleRecord::from);
        // A different one-shot window re-arms; repeating the same window
        // mid-flight must not (the finished marker is monotonic within a
        // window).
        if metadata.single_schedule != new_single {
            metadata.single_schedule_finished = false;
        }
        metadata.single_schedule = new_single;
        metadata.repeated_schedules = response
            .update_schedule
            .as_ref()
            .map(|schedule| {
                schedule
                    .repeated_schedules
                    .iter()
                    .map(RepeatedScheduleRecord::from)
                    .collect()
            })
            .unwrap_or_default();
    });
    if let Err(err) = persisted {
        tracing::error!(error = %err, "could not persist orchestrator response");
        return;
    }

    scheduler.apply(response.update_schedule.as_ref());

    let metadata = deps.metadata.load();
    let next = scheduler.next_job(deps.clock.now_utc(), metadata.single_schedule_finished);
    let notify = DownloadNotify {
        source: metadata.os_profile_update_source_desired.clone(),
        next_run: next.map(|job| job.fire_at),
        booted: metadata.os_profile_update_source_actual.clone(),
    };
    // Dropping is fine: the next response re-plans.
    if deps.downloader_tx.try_send(notify).is_err() {
        tracing::debug!("pre-downloader busy, notification dropped");
    }
}

fn build_update_request(config: &AgentConfig, metadata: &AgentMetadata) -> UpdateSystemSoftwareRequest {
    match config.os_type {
        DistroKind::Mutable => UpdateSystemSoftwareRequest {
            mode: DownloadMode::Full as i32,
            package_list: metadata
                .update_source
                .as_ref()
                .map(|source| source.updated_packages.clone())
                .unwrap_or_default(),
            url: None,
            do_not_reboot: false,
            release_date: None,
            signature: None,
        },
        DistroKind::Immutable => {
            let desired = metadata.os_profile_update_source_desired.as_ref();
            // Skip the download when the staged image already matches.
            let mode = if profiles_equal(
                desired,
                metadata.os_profile_update_source_downloaded.as_ref(),
            ) && desired.is_some()
            {
                DownloadMode::NoDownload
            } else {
                DownloadMode::Full
            };
            UpdateSystemSoftwareRequest {
                mode: mode as i32,
                package_list: vec![],
                url: desired.map(|profile| profile.os_image_url.clone()),
                do_not_reboot: false,
                release_date: None,
                signature: desired.map(|profile| profile.os_image_sha.clone()),
            }
        }
    }
}

async fn fire(deps: &SchedulerDeps, job: ScheduledJob) {
    // Blocking acquire: a download holding the lock is superseded, the
    // update waits for it to wind down.
    let _guard = deps.op_lock.lock().await;

    tracing::info!(kind = ?job.kind, "maintenance window reached, dispatching update");

    let metadata = deps.metadata.load();
    let transition = deps.metadata.mutate(|m| {
        m.set_in_progress(UpdateInProgress::Os).map(|()| {
            m.update_status = UpdateStatusKind::Started;
            m.update_log = "update dispatched".to_string();
        })
    });
    match transition {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            tracing::error!(error = %err, "refusing to dispatch update");
            return;
        }
        Err(err) => {
            tracing::error!(error = %err, "could not persist update start");
            return;
        }
    }

    let request = build_update_request(&deps.config, &metadata);
    match deps.dispatcher.update_system_software(request).await {
        Ok(response) => {
            // The firing reached the dispatcher: the one-shot window must
            // not re-fire, whatever the outcome.
            if job.kind == JobKind::Single {
                let _ = deps.metadata.mutate(|m| m.single_schedule_finished = true);
            }
            if status_code::is_success(response.status_code) {
                finalize_if_terminal(deps).await;
            } else {
                tracing::warn!(
                    code = response.status_code,
                    error = %response.error,
                    "dispatcher rejected the update"
                );
                let _ = deps.metadata.mutate(|m| {
                    m.update_status = UpdateStatusKind::Failed;
                    m.update_log = response.error.clone();
                    m.update_in_progress = UpdateInProgress::None;
                });
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "dispatcher unreachable");
            let _ = deps.metadata.mutate(|m| {
                m.update_status = UpdateStatusKind::Failed;
                m.update_log = format!("dispatcher unreachable: {err}");
                m.update_in_progress = UpdateInProgress::None;
            });
        }
    }
}

/// A dispatched update that completed without a reboot leaves a terminal
/// granular log behind; fold it into the metadata now. An update that
/// spans a reboot stays `OS`-in-progress and is classified at the next
/// startup.
async fn finalize_if_terminal(deps: &SchedulerDeps) {
    let log = deps
        .fs
        .read_to_string(&deps.config.granular_log_file)
        .ok()
        .and_then(|contents| GranularLog::parse(&contents).ok());
    let Some(log) = log else {
        return;
    };
    if !log.status.is_terminal() {
        return;
    }
    let _ = deps.metadata.mutate(|m| {
        match log.status {
            UpdatePhase::Updated => {
                m.update_status = UpdateStatusKind::Updated;
                m.update_log = log.detail.clone();
                m.update_in_progress = UpdateInProgress::None;
            }
            UpdatePhase::Failed | UpdatePhase::RollingBack => {
                m.update_status = UpdateStatusKind::Failed;
                m.update_log = log.detail.clone();
                m.update_in_progress = UpdateInProgress::None;
            }
            _ => {}
        };
    });
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn single(start: i64, end: i64) -> SingleScheduleRecord {
        SingleScheduleRecord {
            start_seconds: start,
            end_seconds: end,
        }
    }

    fn with_single(start: i64, end: i64) -> Scheduler {
        Scheduler {
            single: Some(single(start, end)),
            ..Default::default()
        }
    }

    #[test]
    fn single_before_start_arms_at_start() {
        let scheduler = with_single(1_000, 2_000);
        let job = scheduler.next_job(at(500), false).unwrap();
        assert_eq!(job.fire_at, at(1_000));
        assert_eq!(job.kind, JobKind::Single);
    }

    #[test]
    fn single_inside_window_fires_immediately() {
        let scheduler = with_single(1_000, 2_000);
        let job = scheduler.next_job(at(1_500), false).unwrap();
        assert_eq!(job.fire_at, at(1_500));
    }

    #[test]
    fn finished_single_does_not_refire_within_its_window() {
        let scheduler = with_single(1_000, 2_000);
        assert!(scheduler.next_job(at(1_500), true).is_none());
    }

    #[test]
    fn dispatched_single_does_not_spin_even_unfinished() {
        let mut scheduler = with_single(1_000, 2_000);
        let job = scheduler.next_job(at(1_500), false).unwrap();
        scheduler.mark_fired(job, at(1_500));
        assert!(scheduler.next_job(at(1_500), false).is_none());
    }

    #[test]
    fn expired_single_does_nothing() {
        let scheduler = with_single(1_000, 2_000);
        assert!(scheduler.next_job(at(3_000), false).is_none());
    }

    #[test]
    fn repeated_schedule_computes_next_cron_occurrence() {
        let record = RepeatedScheduleRecord {
            duration_seconds: 600,
            cron_minutes: "0".to_string(),
            cron_hours: "3".to_string(),
            cron_day_month: "*".to_string(),
            cron_month: "*".to_string(),
            cron_day_week: "*".to_string(),
        };
        // 2023-11-14 00:00:00 UTC
        let now = Utc.with_ymd_and_hms(2023, 11, 14, 0, 0, 0).unwrap();
        let next = record.next_run(now, None).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2023, 11, 14, 3, 0, 0).unwrap());
    }

    #[test]
    fn repeated_schedule_fires_inside_an_open_window() {
        let record = RepeatedScheduleRecord {
            duration_seconds: 3_600,
            cron_minutes: "0".to_string(),
            cron_hours: "3".to_string(),
            cron_day_month: "*".to_string(),
            cron_month: "*".to_string(),
            cron_day_week: "*".to_string(),
        };
        let now = Utc.with_ymd_and_hms(2023, 11, 14, 3, 20, 0).unwrap();
        assert_eq!(record.next_run(now, None).unwrap(), now);

        // Already fired in this window: wait for the next occurrence.
        let fired = Utc.with_ymd_and_hms(2023, 11, 14, 3, 5, 0).unwrap();
        let next = record.next_run(now, Some(fired)).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2023, 11, 15, 3, 0, 0).unwrap());
    }

    #[test]
    fn bad_cron_fields_disable_the_schedule() {
        let record = RepeatedScheduleRecord {
            duration_seconds: 60,
            cron_minutes: "nonsense".to_string(),
            cron_hours: "*".to_string(),
            cron_day_month: "*".to_string(),
            cron_month: "*".to_string(),
            cron_day_week: "*".to_string(),
        };
        assert!(
            record
                .next_run(Utc.timestamp_opt(0, 0).unwrap(), None)
                .is_none()
        );
    }

    #[test]
    fn earliest_job_wins() {
        let scheduler = Scheduler {
            single: Some(single(5_000, 6_000)),
            single_fired: false,
            repeated: vec![RepeatedJob {
                record: RepeatedScheduleRecord {
                    duration_seconds: 60,
                    cron_minutes: "*".to_string(),
                    cron_hours: "*".to_string(),
                    cron_day_month: "*".to_string(),
                    cron_month: "*".to_string(),
                    cron_day_week: "*".to_string(),
                },
                last_fired: None,
            }],
        };
        let job = scheduler.next_job(at(1_000), false).unwrap();
        assert!(matches!(job.kind, JobKind::Repeated(0)));
        assert!(job.fire_at <= at(5_000));
    }

    #[test]
    fn empty_schedule_clears_jobs() {
        let mut scheduler = with_single(1_000, 2_000);
        scheduler.apply(None);
        assert!(scheduler.next_job(at(1_500), false).is_none());
    }

    #[test]
    fn immutable_request_skips_download_when_already_staged() {
        let config = AgentConfig {
            os_type: DistroKind::Immutable,
            ..Default::default()
        };
        let profile = ProfileRecord {
            os_image_url: "https://images.example.com/edge.img".to_string(),
            os_image_sha: "abc".to_string(),
            ..Default::default()
        };
        let mut metadata = AgentMetadata {
            os_profile_update_source_desired: Some(profile.clone()),
            os_profile_update_source_downloaded: Some(profile),
            ..Default::default()
        };

        let request = build_update_request(&config, &metadata);
        assert_eq!(request.mode, DownloadMode::NoDownload as i32);
        assert_eq!(request.signature.as_deref(), Some("abc"));

        metadata.os_profile_update_source_downloaded = None;
        let request = build_update_request(&config, &metadata);
        assert_eq!(request.mode, DownloadMode::Full as i32);
    }

    #[test]
    fn mutable_request_carries_the_package_list() {
        let config = AgentConfig::default();
        let metadata = AgentMetadata {
            update_source: Some(UpdateSourceRecord {
                updated_packages: vec!["openssl".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let request = build_update_request(&config, &metadata);
        assert_eq!(request.mode, DownloadMode::Full as i32);
        assert_eq!(request.package_list, vec!["openssl".to_string()]);
    }
}
