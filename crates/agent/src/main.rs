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

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use basalt_agent::client::{DispatcherHandle, OrchestratorClient};
use basalt_agent::config::AgentConfig;
use basalt_agent::control_loop::{ControlLoopDeps, run_status_loop};
use basalt_agent::downloader::{DownloaderDeps, run_downloader};
use basalt_agent::health::{HealthDeps, run_health_loop};
use basalt_agent::metadata::MetadataStore;
use basalt_agent::reclassify::Reclassifier;
use basalt_agent::scheduler::{SchedulerDeps, run_scheduler};
use basalt_utils::{Clock, FileSystem, RealFileSystem, SystemClock};
use clap::Parser;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(name = "basalt-agent", about = "Basalt platform update agent")]
struct Args {
    /// Agent configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-d, -dd).
    #[arg(short = 'd', action = clap::ArgAction::Count)]
    debug: u8,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();

    let log_level = match args.debug {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();

    let config = Arc::new(AgentConfig::load(args.config.as_deref())?);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        host_guid = %config.host_guid,
        orchestrator = %config.orchestrator_url,
        "Started basalt-agent"
    );

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let metadata = MetadataStore::new(fs.clone(), config.metadata_file.clone());

    // Classify any update that was in flight before this restart, before
    // the first status report goes out.
    Reclassifier {
        config: config.clone(),
        metadata: metadata.clone(),
        fs: fs.clone(),
        clock: clock.clone(),
    }
    .run()
    .await;

    let cancel = CancellationToken::new();
    let op_lock = Arc::new(Mutex::new(()));
    let last_contact = Arc::new(ArcSwap::from_pointee(Instant::now()));
    let dispatcher = DispatcherHandle::new(config.dispatcher_socket.clone());

    // Unbuffered hand-off from the control loop to the schedule handler.
    let (responses_tx, responses_rx) = mpsc::channel(1);
    let (downloader_tx, downloader_rx) = mpsc::channel(1);

    let status_task = tokio::spawn(run_status_loop(ControlLoopDeps {
        config: config.clone(),
        metadata: metadata.clone(),
        client: OrchestratorClient::new(config.orchestrator_url.clone(), config.report_retries),
        last_contact: last_contact.clone(),
        responses_tx,
        cancel: cancel.clone(),
    }));

    let scheduler_task = tokio::spawn(run_scheduler(
        SchedulerDeps {
            config: config.clone(),
            metadata: metadata.clone(),
            fs: fs.clone(),
            clock: clock.clone(),
            dispatcher: dispatcher.clone(),
            op_lock: op_lock.clone(),
            downloader_tx,
            cancel: cancel.clone(),
        },
        responses_rx,
    ));

    let downloader_task = tokio::spawn(run_downloader(
        DownloaderDeps {
            config: config.clone(),
            metadata: metadata.clone(),
            clock,
            dispatcher,
            op_lock,
            cancel: cancel.clone(),
        },
        downloader_rx,
    ));

    let health_task = tokio::spawn(run_health_loop(HealthDeps {
        config,
        last_contact,
        cancel: cancel.clone(),
    }));

    shutdown_signal().await;
    tracing::info!("shutting down");
    cancel.cancel();

    for task in [status_task, scheduler_task, downloader_task, health_task] {
        if let Err(err) = task.await {
            tracing::warn!(error = %err, "task did not shut down cleanly");
        }
    }

    tracing::info!("Stopped basalt-agent");
    Ok(())
}

async fn shutdown_signal() {
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}
