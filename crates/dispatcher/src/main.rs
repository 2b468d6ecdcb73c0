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
use std::time::Duration;

use basalt_dispatcher::config::{
    ConfigState, DEFAULT_CONFIG_PATH, DEFAULT_CONFIG_SCHEMA_PATH,
};
use basalt_dispatcher::power::PowerControl;
use basalt_dispatcher::server::{DispatcherContext, InbdService};
use basalt_dispatcher::snapshot::Snapshotter;
use basalt_dispatcher::socket::prepare_socket;
use basalt_dispatcher::verifier::PostRebootVerifier;
use basalt_utils::{
    Clock, Executor, FileSystem, NetworkProbe, RealFileSystem, SystemClock, SystemExecutor,
    SystemNetworkProbe,
};
use clap::Parser;
use tokio_stream::wrappers::UnixListenerStream;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(name = "inbd", about = "Basalt update dispatcher")]
struct Args {
    /// Dispatcher configuration file (JSON).
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// JSON Schema the configuration must validate against.
    #[arg(long, default_value = DEFAULT_CONFIG_SCHEMA_PATH)]
    schema: PathBuf,

    /// Override the socket path from the configuration.
    #[arg(long)]
    socket: Option<PathBuf>,

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

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "Started inbd"
    );

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Schema validation failure of the on-disk config is fatal.
    let mut config = ConfigState::load(&fs, &args.config, &args.schema)
        .map_err(|err| eyre::eyre!("configuration rejected: {err}"))?;
    if let Some(socket) = args.socket {
        config.typed.socket_path = socket;
    }

    let network: Arc<dyn NetworkProbe> = Arc::new(SystemNetworkProbe::new(
        config.typed.network_check_urls.clone(),
    ));

    let socket_path = config.typed.socket_path.clone();
    let verifier_config = config.typed.clone();
    let ctx = Arc::new(DispatcherContext::new(
        fs.clone(),
        executor.clone(),
        clock,
        network.clone(),
        config,
    ));

    // Bind first so a concurrent start fails fast, then classify any
    // update that spanned the last reboot, only then serve.
    let listener = prepare_socket(&socket_path)?;

    let verifier = PostRebootVerifier {
        fs,
        network,
        state: ctx.state.clone(),
        granular: ctx.granular.clone(),
        snapshotter: Snapshotter::new(
            executor.clone(),
            ctx.fs.clone(),
            verifier_config.snapshot_tool.clone(),
            verifier_config.proceed_with_rollback,
        ),
        power: PowerControl::new(executor),
        distro: verifier_config.os_type,
        image_sha_file: verifier_config.image_sha_file.clone(),
        retries: verifier_config.verifier_retries,
        read_interval: Duration::from_secs(verifier_config.verifier_read_interval_secs),
    };
    verifier.run().await;

    let service = InbdService::new(ctx);
    tracing::info!(socket = %socket_path.display(), "serving");
    tonic::transport::Server::builder()
        .add_service(service.into_server())
        .serve_with_incoming_shutdown(UnixListenerStream::new(listener), shutdown_signal())
        .await?;

    tracing::info!("Stopped inbd");
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
