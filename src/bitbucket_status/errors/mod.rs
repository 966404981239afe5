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

use std::error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Kind {
    NoMatchingCommand,
    MissingConfig,
    InvalidBuildState,
    FailedToExecute,
    GitFailed,
    BadGitOutputMatch,
    ApiError(reqwest::StatusCode),
    HttpError(reqwest::Error),
    JsonError(serde_json::Error),
    IoError(io::Error),
}

#[derive(Debug)]
pub struct ResourceError {
    pub kind: Kind,
    pub detail: Option<String>,
}

impl ResourceError {
    pub fn detail(&self) -> Option<String> {
        self.detail.clone()
    }

    pub fn description(&self) -> &str {
        match self.kind {
            Kind::NoMatchingCommand => "No command matches your arguments - likely unimplemented feature",
            Kind::MissingConfig => "A configuration value is missing",
            Kind::InvalidBuildState => "Invalid build status, must be: INPROGRESS, SUCCESSFUL, or FAILED",
            Kind::FailedToExecute => "Tried to fork a process, and failed",
            Kind::GitFailed => "Git command failed!",
            Kind::BadGitOutputMatch => "Git did not print a commit id where one was expected",
            Kind::ApiError(_) => "Bitbucket did not accept the build status",
            Kind::HttpError(_) => "An HTTP Error occured",
            Kind::JsonError(_) => "A JSON Parser error occured",
            Kind::IoError(_) => "An I/O Error occured",
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.kind {
            Kind::HttpError(ref err) => Some(err),
            Kind::JsonError(ref err) => Some(err),
            Kind::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ResourceError {
    fn from(err: io::Error) -> ResourceError {
        let detail = Some(err.to_string());
        ResourceError {
            kind: Kind::IoError(err),
            detail,
        }
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(err: serde_json::Error) -> ResourceError {
        let detail = Some(err.to_string());
        ResourceError {
            kind: Kind::JsonError(err),
            detail,
        }
    }
}

impl From<reqwest::Error> for ResourceError {
    fn from(err: reqwest::Error) -> ResourceError {
        let detail = Some(err.to_string());
        ResourceError {
            kind: Kind::HttpError(err),
            detail,
        }
    }
}
