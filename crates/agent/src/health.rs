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

//! Health reporting to the node-local status service. READY while the
//! last successful orchestrator contact is recent enough; the factor of
//! two absorbs one missed cycle without flapping. Failures to reach the
//! status service are logged, never fatal.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use basalt_rpc::basalt::node_status_client::NodeStatusClient;
use basalt_rpc::basalt::{HealthState, NegotiateIntervalRequest, ReportHealthRequest};
use tokio_util::sync::CancellationToken;

use crate::config::AgentConfig;

pub const AGENT_NAME: &str = "platform-update-agent";
const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(10);

/// READY iff the last contact is within `2 × max(status_interval,
/// report_interval)`.
pub fn classify_health(
    elapsed_since_contact: Duration,
    status_interval: Duration,
    report_interval: Duration,
) -> HealthState {
    let threshold = 2 * status_interval.max(report_interval);
    if elapsed_since_contact <= threshold {
        HealthState::Ready
    } else {
        HealthState::NotReady
    }
}

pub struct HealthDeps {
    pub config: Arc<AgentConfig>,
    pub last_contact: Arc<ArcSwap<Instant>>,
    pub cancel: CancellationToken,
}

pub async fn run_health_loop(deps: HealthDeps) {
    let status_interval = negotiate_interval(&deps.config.status_socket).await;
    let mut ticker = tokio::time::interval(status_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = deps.cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let elapsed = deps.last_contact.load().elapsed();
        let state = classify_health(elapsed, status_interval, deps.config.status_interval);
        if let Err(err) = report(&deps.config.status_socket, state).await {
            tracing::warn!(error = %err, "could not reach the status service");
        }
    }
}

/// The status service owns the reporting cadence; fall back to the
/// default when it cannot be reached at startup.
async fn negotiate_interval(socket: &Path) -> Duration {
    match negotiate(socket).await {
        Ok(interval) if interval > Duration::ZERO => interval,
        Ok(_) => DEFAULT_STATUS_INTERVAL,
        Err(err) => {
            tracing::warn!(error = %err, "interval negotiation failed, using default");
            DEFAULT_STATUS_INTERVAL
        }
    }
}

async fn negotiate(socket: &Path) -> Result<Duration, crate::error::AgentError> {
    let channel = basalt_rpc::socket::connect_unix(socket).await?;
    let mut client = NodeStatusClient::new(channel);
    let response = client
        .negotiate_interval(NegotiateIntervalRequest {
            agent_name: AGENT_NAME.to_string(),
        })
        .await?
        .into_inner();
    Ok(Duration::from_secs(response.interval_seconds.max(0) as u64))
}

async fn report(socket: &Path, state: HealthState) -> Result<(), crate::error::AgentError> {
    let channel = basalt_rpc::socket::connect_unix(socket).await?;
    let mut client = NodeStatusClient::new(channel);
    client
        .report_health(ReportHealthRequest {
            agent_name: AGENT_NAME.to_string(),
            state: state as i32,
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_within_twice_the_larger_interval() {
        let status = Duration::from_secs(10);
        let report = Duration::from_secs(15);
        assert_eq!(
            classify_health(Duration::from_secs(30), status, report),
            HealthState::Ready
        );
        assert_eq!(
            classify_health(Duration::from_secs(31), status, report),
            HealthState::NotReady
        );
    }

    #[test]
    fn one_missed_cycle_does_not_flap() {
        let interval = Duration::from_secs(10);
        assert_eq!(
            classify_health(Duration::from_secs(19), interval, interval),
            HealthState::Ready
        );
    }
}
