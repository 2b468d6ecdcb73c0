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

//! `inbc` — command line front-end for the update dispatcher. Talks to
//! `inbd` over its UNIX domain socket; exits 0 only when the transport
//! succeeded and the dispatcher answered with a 2xx status code.

use std::path::PathBuf;
use std::process::ExitCode;

use basalt_rpc::basalt::dispatcher_client::DispatcherClient;
use basalt_rpc::basalt::{
    AddApplicationSourceRequest, ConfigKeyValueRequest, DispatcherResponse, DownloadMode,
    GetConfigRequest, HashAlgorithm, LoadConfigRequest, PowerAction, QueryOption, QueryRequest,
    RemoveApplicationSourceRequest, SetPowerStateRequest, UpdateFirmwareRequest,
    UpdateOsSourceRequest, UpdateSystemSoftwareRequest,
};
use basalt_rpc::socket::DEFAULT_DISPATCHER_SOCKET;
use basalt_rpc::status_code;
use clap::{Parser, Subcommand, ValueEnum};
use tonic::transport::Channel;

#[derive(Debug, Parser)]
#[command(name = "inbc", about = "Basalt dispatcher client", version)]
struct Args {
    /// Dispatcher socket path.
    #[arg(long, default_value = DEFAULT_DISPATCHER_SOCKET, global = true)]
    socket: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum SotaMode {
    #[default]
    Full,
    DownloadOnly,
    NoDownload,
}

impl From<SotaMode> for DownloadMode {
    fn from(mode: SotaMode) -> Self {
        match mode {
            SotaMode::Full => DownloadMode::Full,
            SotaMode::DownloadOnly => DownloadMode::DownloadOnly,
            SotaMode::NoDownload => DownloadMode::NoDownload,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum HashAlg {
    Sha256,
    #[default]
    Sha384,
    Sha512,
}

impl From<HashAlg> for HashAlgorithm {
    fn from(alg: HashAlg) -> Self {
        match alg {
            HashAlg::Sha256 => HashAlgorithm::Sha256,
            HashAlg::Sha384 => HashAlgorithm::Sha384,
            HashAlg::Sha512 => HashAlgorithm::Sha512,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QueryOpt {
    Hardware,
    Firmware,
    Os,
    Swbom,
    Version,
    All,
}

impl From<QueryOpt> for QueryOption {
    fn from(opt: QueryOpt) -> Self {
        match opt {
            QueryOpt::Hardware => QueryOption::Hardware,
            QueryOpt::Firmware => QueryOption::Firmware,
            QueryOpt::Os => QueryOption::Os,
            QueryOpt::Swbom => QueryOption::Swbom,
            QueryOpt::Version => QueryOption::Version,
            QueryOpt::All => QueryOption::All,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Software (OS) update.
    Sota {
        #[arg(long, value_enum, default_value_t = SotaMode::Full)]
        mode: SotaMode,
        /// Packages to install; empty means a full upgrade.
        #[arg(long = "package")]
        packages: Vec<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        signature: Option<String>,
        #[arg(long)]
        release_date: Option<String>,
        #[arg(long)]
        do_not_reboot: bool,
    },
    /// Firmware update.
    Fota {
        #[arg(long)]
        url: String,
        #[arg(long)]
        release_date: Option<String>,
        #[arg(long)]
        signature: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        do_not_reboot: bool,
    },
    /// Package source management.
    #[command(subcommand)]
    Source(SourceCommand),
    /// Dispatcher configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Reboot the node.
    Restart,
    /// Power the node off.
    Shutdown,
    /// Query node state.
    Query {
        #[arg(long, value_enum, default_value = "all")]
        option: QueryOpt,
    },
}

#[derive(Debug, Subcommand)]
enum SourceCommand {
    #[command(subcommand)]
    Os(OsSourceCommand),
    #[command(subcommand)]
    Application(ApplicationSourceCommand),
}

#[derive(Debug, Subcommand)]
enum OsSourceCommand {
    /// Replace the system source list.
    Update {
        #[arg(long = "source", required = true)]
        sources: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
enum ApplicationSourceCommand {
    Add {
        #[arg(long)]
        filename: String,
        /// Stanza lines, in order.
        #[arg(long = "source", required = true)]
        sources: Vec<String>,
        #[arg(long)]
        gpg_key_uri: Option<String>,
        #[arg(long)]
        gpg_key_name: Option<String>,
    },
    Remove {
        #[arg(long)]
        filename: String,
        #[arg(long)]
        gpg_key_name: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Fetch and install a signed configuration document.
    Load {
        #[arg(long)]
        uri: String,
        #[arg(long)]
        signature: String,
        #[arg(long, value_enum, default_value_t = HashAlg::Sha384)]
        hash_algorithm: HashAlg,
    },
    Get {
        #[arg(long)]
        path: String,
    },
    Set {
        /// key:value
        #[arg(long)]
        value: String,
    },
    Append {
        /// key:value
        #[arg(long)]
        value: String,
    },
    Remove {
        /// key:value
        #[arg(long)]
        value: String,
    },
}

#[derive(thiserror::Error, Debug)]
enum InbcError {
    #[error("Unable to connect to the dispatcher: {0}")]
    Connect(#[from] tonic::transport::Error),

    #[error("The dispatcher returned {0}")]
    Rpc(#[from] tonic::Status),

    #[error("{0}")]
    Dispatcher(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn check(response: DispatcherResponse) -> Result<(), InbcError> {
    if status_code::is_success(response.status_code) {
        println!("OK ({})", response.status_code);
        Ok(())
    } else {
        Err(InbcError::Dispatcher(format!(
            "{}: {}",
            response.status_code, response.error
        )))
    }
}

async fn run(args: Args) -> Result<(), InbcError> {
    let channel: Channel = basalt_rpc::socket::connect_unix(&args.socket).await?;
    let mut client = DispatcherClient::new(channel);

    match args.command {
        Command::Sota {
            mode,
            packages,
            url,
            signature,
            release_date,
            do_not_reboot,
        } => check(
            client
                .update_system_software(UpdateSystemSoftwareRequest {
                    mode: DownloadMode::from(mode) as i32,
                    package_list: packages,
                    url,
                    do_not_reboot,
                    release_date,
                    signature,
                })
                .await?
                .into_inner(),
        ),
        Command::Fota {
            url,
            release_date,
            signature,
            username,
            do_not_reboot,
        } => check(
            client
                .update_firmware(UpdateFirmwareRequest {
                    url,
                    release_date,
                    signature,
                    username,
                    do_not_reboot,
                })
                .await?
                .into_inner(),
        ),
        Command::Source(SourceCommand::Os(OsSourceCommand::Update { sources })) => check(
            client
                .update_os_source(UpdateOsSourceRequest {
                    source_list: sources,
                })
                .await?
                .into_inner(),
        ),
        Command::Source(SourceCommand::Application(ApplicationSourceCommand::Add {
            filename,
            sources,
            gpg_key_uri,
            gpg_key_name,
        })) => check(
            client
                .add_application_source(AddApplicationSourceRequest {
                    filename,
                    source: sources,
                    gpg_key_uri,
                    gpg_key_name,
                })
                .await?
                .into_inner(),
        ),
        Command::Source(SourceCommand::Application(ApplicationSourceCommand::Remove {
            filename,
            gpg_key_name,
        })) => check(
            client
                .remove_application_source(RemoveApplicationSourceRequest {
                    filename,
                    gpg_key_name,
                })
                .await?
                .into_inner(),
        ),
        Command::Config(ConfigCommand::Load {
            uri,
            signature,
            hash_algorithm,
        }) => check(
            client
                .load_config(LoadConfigRequest {
                    uri,
                    signature,
                    hash_algorithm: HashAlgorithm::from(hash_algorithm) as i32,
                })
                .await?
                .into_inner(),
        ),
        Command::Config(ConfigCommand::Get { path }) => {
            let response = client
                .get_config(GetConfigRequest { path })
                .await?
                .into_inner();
            if status_code::is_success(response.status_code) {
                println!("{}", response.value);
                Ok(())
            } else {
                Err(InbcError::Dispatcher(format!(
                    "{}: {}",
                    response.status_code, response.error
                )))
            }
        }
        Command::Config(ConfigCommand::Set { value }) => check(
            client
                .set_config(ConfigKeyValueRequest { key_value: value })
                .await?
                .into_inner(),
        ),
        Command::Config(ConfigCommand::Append { value }) => check(
            client
                .append_config(ConfigKeyValueRequest { key_value: value })
                .await?
                .into_inner(),
        ),
        Command::Config(ConfigCommand::Remove { value }) => check(
            client
                .remove_config(ConfigKeyValueRequest { key_value: value })
                .await?
                .into_inner(),
        ),
        Command::Restart => check(
            client
                .set_power_state(SetPowerStateRequest {
                    action: PowerAction::Cycle as i32,
                })
                .await?
                .into_inner(),
        ),
        Command::Shutdown => check(
            client
                .set_power_state(SetPowerStateRequest {
                    action: PowerAction::Off as i32,
                })
                .await?
                .into_inner(),
        ),
        Command::Query { option } => {
            let response = client
                .query(QueryRequest {
                    option: QueryOption::from(option) as i32,
                })
                .await?
                .into_inner();
            if status_code::is_success(response.status_code) {
                // Re-render compact payloads for readability.
                match serde_json::from_str::<serde_json::Value>(&response.payload_json) {
                    Ok(value) => println!(
                        "{}",
                        serde_json::to_string_pretty(&value).unwrap_or(response.payload_json)
                    ),
                    Err(_) => println!("{}", response.payload_json),
                }
                Ok(())
            } else {
                Err(InbcError::Dispatcher(format!(
                    "{}: {}",
                    response.status_code, response.error
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn sota_defaults_to_full_mode() {
        let args = Args::parse_from(["inbc", "sota"]);
        match args.command {
            Command::Sota { mode, .. } => assert!(matches!(mode, SotaMode::Full)),
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(args.socket, PathBuf::from("/var/run/inbd.sock"));
    }

    #[test]
    fn source_subcommands_parse() {
        let args = Args::parse_from([
            "inbc",
            "source",
            "application",
            "add",
            "--filename",
            "app.sources",
            "--source",
            "Types: deb",
            "--source",
            "URIs: https://apps.example.com/deb",
        ]);
        match args.command {
            Command::Source(SourceCommand::Application(ApplicationSourceCommand::Add {
                filename,
                sources,
                ..
            })) => {
                assert_eq!(filename, "app.sources");
                assert_eq!(sources.len(), 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn socket_override_is_global() {
        let args = Args::parse_from(["inbc", "query", "--option", "version", "--socket", "/tmp/x.sock"]);
        assert_eq!(args.socket, PathBuf::from("/tmp/x.sock"));
    }
}
