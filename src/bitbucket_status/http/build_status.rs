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

use std::fmt;
use std::str::FromStr;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{Kind, ResourceError};

/// The three states Bitbucket's build-status endpoint understands.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildState {
    #[serde(rename = "INPROGRESS")]
    InProgress,
    #[serde(rename = "SUCCESSFUL")]
    Successful,
    #[serde(rename = "FAILED")]
    Failed,
}

impl FromStr for BuildState {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<BuildState, ResourceError> {
        match s {
            "INPROGRESS" => Ok(BuildState::InProgress),
            "SUCCESSFUL" => Ok(BuildState::Successful),
            "FAILED" => Ok(BuildState::Failed),
            _ => Err(ResourceError {
                kind: Kind::InvalidBuildState,
                detail: Some(format!("build_status was: {}", s)),
            }),
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            BuildState::InProgress => "INPROGRESS",
            BuildState::Successful => "SUCCESSFUL",
            BuildState::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

// The document shape is fixed by Bitbucket:
// https://developer.atlassian.com/bitbucket/server/docs/latest/how-tos/updating-build-status-for-commits.html
#[derive(Serialize, Deserialize, Debug)]
pub struct BuildStatus {
    pub state: BuildState,
    pub key: String,
    pub name: String,
    pub url: String,
    pub description: String,
}

impl BuildStatus {
    pub fn new(config: &Config, state: BuildState) -> BuildStatus {
        BuildStatus {
            state,
            key: config.job_name.clone(),
            name: config.build_name.clone(),
            url: config.build_url(),
            description: format!("Concourse build {}", config.build_id),
        }
    }
}

/// The band of response codes Bitbucket answers a good status report with.
pub fn accepted(status: StatusCode) -> bool {
    matches!(status.as_u16(), 200..=204)
}

#[cfg(test)]
mod tests {
    use super::{accepted, BuildState, BuildStatus};
    use crate::errors::Kind;
    use reqwest::StatusCode;

    #[test]
    fn build_state_parses_the_full_vocabulary() {
        assert_eq!(BuildState::InProgress, "INPROGRESS".parse().unwrap());
        assert_eq!(BuildState::Successful, "SUCCESSFUL".parse().unwrap());
        assert_eq!(BuildState::Failed, "FAILED".parse().unwrap());
    }

    #[test]
    fn build_state_rejects_everything_else() {
        for bogus in &["successful", "DONE", "IN PROGRESS", "", "SUCCESSFUL "] {
            let result = bogus.parse::<BuildState>();
            match result {
                Ok(state) => panic!("{:?} parsed as {:?}", bogus, state),
                Err(e) => match e.kind {
                    Kind::InvalidBuildState => {}
                    other => panic!("expected InvalidBuildState, got {:?}", other),
                },
            }
        }
    }

    #[test]
    fn build_state_displays_the_wire_literal() {
        assert_eq!("INPROGRESS", format!("{}", BuildState::InProgress));
        assert_eq!("SUCCESSFUL", format!("{}", BuildState::Successful));
        assert_eq!("FAILED", format!("{}", BuildState::Failed));
    }

    #[test]
    fn build_status_payload_test() {
        let status = BuildStatus {
            state: BuildState::Successful,
            key: "unit".to_string(),
            name: "42".to_string(),
            url: "https://ci.example.com/pipelines/main/jobs/unit/builds/42".to_string(),
            description: "Concourse build 1234".to_string(),
        };
        let payload = serde_json::to_string(&status).unwrap();
        let expect = "{\"state\":\"SUCCESSFUL\",\"key\":\"unit\",\"name\":\"42\",\
                      \"url\":\"https://ci.example.com/pipelines/main/jobs/unit/builds/42\",\
                      \"description\":\"Concourse build 1234\"}";
        assert_eq!(expect, payload);
    }

    #[test]
    fn accepted_covers_the_success_band() {
        for code in &[200u16, 201, 202, 203, 204] {
            assert!(accepted(StatusCode::from_u16(*code).unwrap()));
        }
        for code in &[205u16, 301, 400, 401, 403, 404, 500] {
            assert!(!accepted(StatusCode::from_u16(*code).unwrap()));
        }
    }
}
