//
// Copyright:: Copyright (c) 2016 Chef Software, Inc.
// License:: Apache License, Version 2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use std::io;
use std::path::Path;
use std::process;

use clap::{App, Arg, ArgMatches, SubCommand};

use crate::config::{Config, Input};
use crate::errors::{Kind, ResourceError};
use crate::git::{self, VersionControl};
use crate::http::build_status::{self, BuildState, BuildStatus};
use crate::http::APIClient;
use crate::json::OutputVersion;
use crate::utils::say::sayln;

pub fn run() {
    env_logger::init();

    let app = make_app(version());
    let matches = app.get_matches();

    let cmd_result = match matches.subcommand_name() {
        // check and in have no work to do for a status-reporting resource;
        // Concourse still expects a well-formed JSON document from each.
        Some("check") => {
            println!("[]");
            Ok(())
        }
        Some("in") => {
            println!("{{}}");
            Ok(())
        }
        Some("out") => {
            let matches = matches.subcommand_matches("out").unwrap();
            clap_out(matches)
        }
        _ => {
            let mut a = make_app(version());
            a.print_help().ok().expect("failed to write help to stdout");
            sayln("white", "");
            no_matching_command()
        }
    };
    match cmd_result {
        Ok(_) => {}
        Err(e) => exit_with(e, 1),
    }
}

fn make_app<'a>(version: &'a str) -> App<'a, 'a> {
    App::new("bitbucket-status")
        .version(version)
        .about("Concourse resource that reports build status to Bitbucket")
        .subcommand(
            SubCommand::with_name("check")
                .about("No-op for this resource; emits an empty version list"),
        )
        .subcommand(
            SubCommand::with_name("in")
                .about("No-op for this resource; emits an empty version")
                .arg(Arg::from_usage(
                    "[directory] 'Destination directory handed over by Concourse (ignored)'",
                )),
        )
        .subcommand(
            SubCommand::with_name("out")
                .about("Report the status of this build against the checked out commit")
                .args_from_usage(
                    "<directory> 'Root directory containing the build artifacts'",
                ),
        )
}

fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

fn no_matching_command() -> Result<(), ResourceError> {
    Err(ResourceError {
        kind: Kind::NoMatchingCommand,
        detail: None,
    })
}

fn exit_with(e: ResourceError, i: isize) {
    sayln("red", e.description());
    match e.detail() {
        Some(deets) => sayln("red", &deets),
        None => {}
    }
    let x = i as i32;
    process::exit(x)
}

fn clap_out(matches: &ArgMatches) -> Result<(), ResourceError> {
    let root = matches.value_of("directory").unwrap();
    let input = Input::from_reader(io::stdin())?;
    let version = out(&input, Path::new(root), &git::Git)?;
    println!("{}", serde_json::to_string(&version)?);
    Ok(())
}

/// The whole put flow: merge configuration, resolve the commit under
/// `root`, and report the requested state to Bitbucket. Returns the version
/// document for stdout; everything else this prints goes to stderr.
pub fn out(
    input: &Input,
    root: &Path,
    vcs: &dyn VersionControl,
) -> Result<OutputVersion, ResourceError> {
    let config = Config::effective(&input.source)?;
    if config.debug {
        sayln("yellow", "--DEBUG MODE--");
        sayln("white", &serde_json::to_string_pretty(input)?);
    }

    let state = input.params.build_status()?.parse::<BuildState>()?;

    let workdir = root.join(input.params.repo()?);
    let commit = vcs.head_commit(&workdir)?;
    let commit = git::short_ref(&commit);
    if config.debug {
        sayln("white", &format!("Commit: {}", commit));
    }

    if config.debug && !config.verify_ssl {
        sayln("yellow", "SSL verification disabled");
    }

    let client = APIClient::from_config(&config)?;
    let status = BuildStatus::new(&config, state);
    if config.debug {
        sayln(
            "white",
            &format!(
                "Notifying {} that build {} is in status: {}",
                client.build_status_url(&commit),
                config.build_name,
                state
            ),
        );
        sayln("white", &serde_json::to_string_pretty(&status)?);
    }

    let response = client.post_build_status(&commit, &status)?;
    let code = response.status();
    if config.debug {
        sayln("white", &format!("Request result: {}", code));
    }
    if code == reqwest::StatusCode::UNAUTHORIZED {
        sayln(
            "red",
            "HTTP 401 Unauthorized - Are your bitbucket credentials correct?",
        );
    }
    if code == reqwest::StatusCode::FORBIDDEN {
        sayln(
            "red",
            "HTTP 403 Forbidden - Does your bitbucket user have rights to the repo?",
        );
    }
    if !build_status::accepted(code) {
        sayln("red", &APIClient::extract_pretty_json(response)?);
        return Err(ResourceError {
            kind: Kind::ApiError(code),
            detail: Some(format!("HTTP {}", code)),
        });
    }
    if config.debug {
        sayln("white", &APIClient::extract_pretty_json(response)?);
    }

    let version = OutputVersion::for_commit(&commit);
    if config.debug {
        sayln(
            "white",
            &format!(
                "Returning to concourse:\n{}",
                serde_json::to_string_pretty(&version)?
            ),
        );
    }
    Ok(version)
}
