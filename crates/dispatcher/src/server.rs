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

//! The dispatcher RPC surface. Application-level status codes ride in the
//! response messages; the gRPC status stays OK unless the transport
//! itself failed.

use std::sync::Arc;

use basalt_inventory::collect::InventoryCollector;
use basalt_rpc::basalt::dispatcher_server::{Dispatcher, DispatcherServer};
use basalt_rpc::basalt::{
    AddApplicationSourceRequest, ConfigKeyValueRequest, DispatcherResponse, DownloadMode,
    GetConfigRequest, GetConfigResponse, LoadConfigRequest, PowerAction, QueryRequest,
    QueryResponse, RemoveApplicationSourceRequest, SetPowerStateRequest,
    UpdateFirmwareRequest, UpdateOsSourceRequest, UpdateSystemSoftwareRequest,
};
use basalt_rpc::granular::UpdatePhase;
use basalt_rpc::status_code;
use basalt_utils::{Clock, Executor, FileSystem, NetworkProbe};
use tokio::sync::{Mutex, RwLock};
use tonic::{Request, Response, Status};

use crate::apt::AptUpdater;
use crate::config::{ConfigState, DispatcherConfig, DistroKind};
use crate::configops;
use crate::download::{validate_url, verify_signature};
use crate::error::{DispatcherError, DispatcherResult};
use crate::firmware::FirmwareUpdater;
use crate::granular::GranularLogStore;
use crate::osimage::{ImageUpdateRequest, OsImageUpdater};
use crate::power::PowerControl;
use crate::query::QueryRunner;
use crate::snapshot::Snapshotter;
use crate::sources::SourceManager;
use crate::state::StateStore;

pub struct DispatcherContext {
    pub fs: Arc<dyn FileSystem>,
    pub executor: Arc<dyn Executor>,
    pub clock: Arc<dyn Clock>,
    pub network: Arc<dyn NetworkProbe>,
    pub config: RwLock<ConfigState>,
    pub granular: GranularLogStore,
    pub state: StateStore,
    /// Serializes update execution inside the dispatcher; one update (or
    /// firmware flash) runs at a time.
    pub update_lock: Mutex<()>,
}

impl DispatcherContext {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        executor: Arc<dyn Executor>,
        clock: Arc<dyn Clock>,
        network: Arc<dyn NetworkProbe>,
        config: ConfigState,
    ) -> Self {
        let granular = GranularLogStore::new(
            fs.clone(),
            clock.clone(),
            config.typed.granular_log_file.clone(),
        );
        let state = StateStore::new(fs.clone(), config.typed.state_file.clone());
        Self {
            fs,
            executor,
            clock,
            network,
            config: RwLock::new(config),
            granular,
            state,
            update_lock: Mutex::new(()),
        }
    }
}

#[derive(Clone)]
pub struct InbdService {
    ctx: Arc<DispatcherContext>,
}

impl InbdService {
    pub fn new(ctx: Arc<DispatcherContext>) -> Self {
        Self { ctx }
    }

    pub fn into_server(self) -> DispatcherServer<Self> {
        DispatcherServer::new(self)
    }

    fn power(&self) -> PowerControl {
        PowerControl::new(self.ctx.executor.clone())
    }

    async fn config_snapshot(&self) -> DispatcherConfig {
        self.ctx.config.read().await.typed.clone()
    }

    async fn do_update_system_software(
        &self,
        request: &UpdateSystemSoftwareRequest,
    ) -> DispatcherResult<String> {
        let _guard = self.ctx.update_lock.lock().await;
        let config = self.config_snapshot().await;
        let mode = request.mode();

        self.ctx
            .granular
            .record(UpdatePhase::Started, "system update requested");

        let outcome = match config.os_type {
            DistroKind::Mutable => {
                AptUpdater::new(self.ctx.executor.clone(), self.ctx.fs.clone())
                    .update(
                        mode,
                        &request.package_list,
                        request.do_not_reboot,
                        &self.ctx.granular,
                        &self.ctx.state,
                        &self.power(),
                    )
                    .await
            }
            DistroKind::Immutable => {
                let updater = OsImageUpdater::new(
                    self.ctx.executor.clone(),
                    self.ctx.fs.clone(),
                    self.ctx.clock.clone(),
                    config.download_dir.clone(),
                    config.image_update_tool.clone(),
                    config.trusted_repositories.clone(),
                );
                let snapshotter = Snapshotter::new(
                    self.ctx.executor.clone(),
                    self.ctx.fs.clone(),
                    config.snapshot_tool.clone(),
                    config.proceed_with_rollback,
                );
                updater
                    .update(
                        ImageUpdateRequest {
                            mode,
                            url: request.url.as_deref(),
                            image_sha: request.signature.as_deref(),
                            do_not_reboot: request.do_not_reboot,
                        },
                        &self.ctx.granular,
                        &self.ctx.state,
                        &self.power(),
                        &snapshotter,
                    )
                    .await
            }
        };

        match outcome {
            Ok(outcome) => Ok(outcome.detail),
            Err(err) => {
                self.ctx.granular.record(UpdatePhase::Failed, err.to_string());
                Err(err)
            }
        }
    }

    async fn do_update_firmware(
        &self,
        request: &UpdateFirmwareRequest,
    ) -> DispatcherResult<String> {
        let _guard = self.ctx.update_lock.lock().await;
        let config = self.config_snapshot().await;

        self.ctx
            .granular
            .record(UpdatePhase::Started, "firmware update requested");

        let product_name =
            InventoryCollector::new(self.ctx.fs.clone(), self.ctx.executor.clone())
                .system_product_name()
                .await;

        let updater = FirmwareUpdater::new(
            self.ctx.executor.clone(),
            self.ctx.fs.clone(),
            config.download_dir.clone(),
            config.firmware_tool_info.clone(),
            config.firmware_tool_schema.clone(),
            config.trusted_repositories.clone(),
        );
        match updater
            .update(request, &product_name, &self.ctx.granular, &self.power())
            .await
        {
            Ok(outcome) => Ok(outcome.detail),
            Err(err) => {
                self.ctx.granular.record(UpdatePhase::Failed, err.to_string());
                Err(err)
            }
        }
    }

    async fn sources(&self) -> DispatcherResult<SourceManager> {
        let config = self.config_snapshot().await;
        if config.os_type == DistroKind::Immutable {
            return Err(DispatcherError::UnsupportedDistro(
                "package source management on an immutable distribution",
            ));
        }
        Ok(SourceManager::new(
            self.ctx.fs.clone(),
            self.ctx.executor.clone(),
            &config,
        ))
    }

    async fn do_load_config(&self, request: &LoadConfigRequest) -> DispatcherResult<()> {
        let url = validate_url(&request.uri)?;
        if request.signature.trim().is_empty() {
            return Err(DispatcherError::BadRequest(
                "configuration signature required".to_string(),
            ));
        }
        let response = reqwest::get(url.clone())
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| DispatcherError::Download(format!("GET {url}: {err}")))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| DispatcherError::Download(format!("reading {url}: {err}")))?;
        verify_signature(request.hash_algorithm(), &body, &request.signature)?;

        let document: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|err| DispatcherError::BadRequest(format!("not valid JSON: {err}")))?;
        let mut config = self.ctx.config.write().await;
        config.replace(&self.ctx.fs, document)
    }

    async fn mutate_config(
        &self,
        mutate: impl FnOnce(&mut serde_json::Value) -> DispatcherResult<()>,
    ) -> DispatcherResult<()> {
        let mut config = self.ctx.config.write().await;
        let mut document = config.raw.clone();
        mutate(&mut document)?;
        config.replace(&self.ctx.fs, document)
    }
}

fn ok_response() -> DispatcherResponse {
    DispatcherResponse {
        status_code: status_code::OK,
        error: String::new(),
    }
}

fn to_response(result: DispatcherResult<()>) -> DispatcherResponse {
    match result {
        Ok(()) => ok_response(),
        Err(err) => {
            tracing::warn!(error = %err, code = err.status_code(), "request failed");
            DispatcherResponse {
                status_code: err.status_code(),
                error: err.to_string(),
            }
        }
    }
}

#[tonic::async_trait]
impl Dispatcher for InbdService {
    async fn update_system_software(
        &self,
        request: Request<UpdateSystemSoftwareRequest>,
    ) -> Result<Response<DispatcherResponse>, Status> {
        let request = request.into_inner();
        let result = self.do_update_system_software(&request).await.map(|_| ());
        Ok(Response::new(to_response(result)))
    }

    async fn update_firmware(
        &self,
        request: Request<UpdateFirmwareRequest>,
    ) -> Result<Response<DispatcherResponse>, Status> {
        let request = request.into_inner();
        let result = self.do_update_firmware(&request).await.map(|_| ());
        Ok(Response::new(to_response(result)))
    }

    async fn update_os_source(
        &self,
        request: Request<UpdateOsSourceRequest>,
    ) -> Result<Response<DispatcherResponse>, Status> {
        let request = request.into_inner();
        let result = match self.sources().await {
            Ok(sources) => sources.update_os_sources(&request.source_list),
            Err(err) => Err(err),
        };
        Ok(Response::new(to_response(result)))
    }

    async fn add_application_source(
        &self,
        request: Request<AddApplicationSourceRequest>,
    ) -> Result<Response<DispatcherResponse>, Status> {
        let request = request.into_inner();
        let result = match self.sources().await {
            Ok(sources) => {
                sources
                    .add_application_source(
                        &request.filename,
                        &request.source,
                        request.gpg_key_uri.as_deref(),
                        request.gpg_key_name.as_deref(),
                    )
                    .await
            }
            Err(err) => Err(err),
        };
        Ok(Response::new(to_response(result)))
    }

    async fn remove_application_source(
        &self,
        request: Request<RemoveApplicationSourceRequest>,
    ) -> Result<Response<DispatcherResponse>, Status> {
        let request = request.into_inner();
        let result = match self.sources().await {
            Ok(sources) => sources
                .remove_application_source(&request.filename, request.gpg_key_name.as_deref()),
            Err(err) => Err(err),
        };
        Ok(Response::new(to_response(result)))
    }

    async fn load_config(
        &self,
        request: Request<LoadConfigRequest>,
    ) -> Result<Response<DispatcherResponse>, Status> {
        let request = request.into_inner();
        Ok(Response::new(to_response(self.do_load_config(&request).await)))
    }

    async fn get_config(
        &self,
        request: Request<GetConfigRequest>,
    ) -> Result<Response<GetConfigResponse>, Status> {
        let request = request.into_inner();
        let config = self.ctx.config.read().await;
        let response = match configops::get_path(&config.raw, &request.path) {
            Ok(value) => GetConfigResponse {
                status_code: status_code::OK,
                error: String::new(),
                value,
            },
            Err(err) => GetConfigResponse {
                status_code: err.status_code(),
                error: err.to_string(),
                value: String::new(),
            },
        };
        Ok(Response::new(response))
    }

    async fn set_config(
        &self,
        request: Request<ConfigKeyValueRequest>,
    ) -> Result<Response<DispatcherResponse>, Status> {
        let request = request.into_inner();
        let result = self
            .mutate_config(|document| configops::set_key_value(document, &request.key_value))
            .await;
        Ok(Response::new(to_response(result)))
    }

    async fn append_config(
        &self,
        request: Request<ConfigKeyValueRequest>,
    ) -> Result<Response<DispatcherResponse>, Status> {
        let request = request.into_inner();
        let result = self
            .mutate_config(|document| configops::append_key_value(document, &request.key_value))
            .await;
        Ok(Response::new(to_response(result)))
    }

    async fn remove_config(
        &self,
        request: Request<ConfigKeyValueRequest>,
    ) -> Result<Response<DispatcherResponse>, Status> {
        let request = request.into_inner();
        let result = self
            .mutate_config(|document| configops::remove_key_value(document, &request.key_value))
            .await;
        Ok(Response::new(to_response(result)))
    }

    async fn set_power_state(
        &self,
        request: Request<SetPowerStateRequest>,
    ) -> Result<Response<DispatcherResponse>, Status> {
        let request = request.into_inner();
        let result = match request.action() {
            PowerAction::Cycle => self.power().reboot().await,
            PowerAction::Off => self.power().shutdown().await,
            PowerAction::Unspecified => Err(DispatcherError::BadRequest(
                "power action must be specified".to_string(),
            )),
        };
        Ok(Response::new(to_response(result)))
    }

    async fn query(
        &self,
        request: Request<QueryRequest>,
    ) -> Result<Response<QueryResponse>, Status> {
        let request = request.into_inner();
        let config = self.config_snapshot().await;
        let runner = QueryRunner::new(
            self.ctx.fs.clone(),
            self.ctx.executor.clone(),
            config.os_type,
        );
        let response = match runner.run(request.option()).await {
            Ok(payload) => QueryResponse {
                status_code: status_code::OK,
                error: String::new(),
                payload_json: payload.to_string(),
            },
            Err(err) => QueryResponse {
                status_code: err.status_code(),
                error: err.to_string(),
                payload_json: String::new(),
            },
        };
        Ok(Response::new(response))
    }
}

#[cfg(test)]
mod tests {
    use basalt_utils::{MockClock, MockExecutor, MockNetworkProbe, RealFileSystem};
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::config::test_support;

    fn service(os_type: &str, dir: &std::path::Path) -> InbdService {
        let mut clock = MockClock::new();
        clock
            .expect_now_utc()
            .returning(|| Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        let mut executor = MockExecutor::new();
        executor
            .expect_run()
            .returning(|_| Ok(basalt_utils::CommandOutput::default()));
        let ctx = DispatcherContext::new(
            Arc::new(RealFileSystem),
            Arc::new(executor),
            Arc::new(clock),
            Arc::new(MockNetworkProbe::new()),
            test_support::state_for(os_type, dir),
        );
        InbdService::new(Arc::new(ctx))
    }

    #[tokio::test]
    async fn unspecified_power_action_returns_400() {
        let dir = tempfile::tempdir().unwrap();
        let service = service("mutable", dir.path());
        let response = service
            .set_power_state(Request::new(SetPowerStateRequest {
                action: PowerAction::Unspecified as i32,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn source_updates_are_refused_on_immutable() {
        let dir = tempfile::tempdir().unwrap();
        let service = service("immutable", dir.path());
        let response = service
            .update_os_source(Request::new(UpdateOsSourceRequest {
                source_list: vec!["deb https://x stable main".to_string()],
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status_code, 415);
    }

    #[tokio::test]
    async fn firmware_with_http_url_returns_400() {
        let dir = tempfile::tempdir().unwrap();
        let service = service("mutable", dir.path());
        let response = service
            .update_firmware(Request::new(UpdateFirmwareRequest {
                url: "http://foo/bin.fw".to_string(),
                release_date: None,
                signature: None,
                username: None,
                do_not_reboot: true,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status_code, 400);
        assert!(response.error.contains("https"));
    }

    #[tokio::test]
    async fn immutable_update_without_url_returns_400() {
        let dir = tempfile::tempdir().unwrap();
        let service = service("immutable", dir.path());
        let response = service
            .update_system_software(Request::new(UpdateSystemSoftwareRequest {
                mode: DownloadMode::Full as i32,
                package_list: vec![],
                url: None,
                do_not_reboot: true,
                release_date: None,
                signature: None,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn config_get_set_append_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let service = service("mutable", dir.path());

        let got = service
            .get_config(Request::new(GetConfigRequest {
                path: "osType".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(got.status_code, 200);
        assert_eq!(got.value, "mutable");

        let set = service
            .append_config(Request::new(ConfigKeyValueRequest {
                key_value: "trustedRepositories:https://new.example.com/".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(set.status_code, 200);

        let got = service
            .get_config(Request::new(GetConfigRequest {
                path: "trustedRepositories".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert!(got.value.contains("new.example.com"));

        let removed = service
            .remove_config(Request::new(ConfigKeyValueRequest {
                key_value: "trustedRepositories:https://new.example.com/".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(removed.status_code, 200);

        let bad = service
            .set_config(Request::new(ConfigKeyValueRequest {
                key_value: "novalue".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(bad.status_code, 400);
    }
}
