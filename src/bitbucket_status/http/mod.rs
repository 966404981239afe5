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

use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, Response};

use crate::config::Config;
use crate::errors::ResourceError;
use crate::http::build_status::BuildStatus;

pub mod build_status;

// A status POST is tiny; if Bitbucket has not answered in 30 seconds the
// build is better served by failing than by hanging.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct APIClient {
    base: String,
    org: String,
    repo: String,
    auth: APIAuth,
    client: Client,
}

impl APIClient {
    /// Create a new `APIClient` from the specified `Config` instance.
    /// Certificate verification is only relaxed when the source
    /// configuration explicitly opts out with `verify_ssl: false`.
    pub fn from_config(config: &Config) -> Result<APIClient, ResourceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()?;
        Ok(APIClient {
            base: config.base_url.clone(),
            org: config.org.clone(),
            repo: config.repo.clone(),
            auth: APIAuth {
                user: config.username.clone(),
                password: config.password.clone(),
            },
            client,
        })
    }

    pub fn build_status_url(&self, commit: &str) -> String {
        format!(
            "{}/2.0/repositories/{}/{}/commit/{}/statuses/build",
            self.base, self.org, self.repo, commit
        )
    }

    /// Report `status` against `commit`. Returns the raw response; the
    /// caller decides what each status code means.
    pub fn post_build_status(
        &self,
        commit: &str,
        status: &BuildStatus,
    ) -> Result<Response, ResourceError> {
        let url = self.build_status_url(commit);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.auth.user, Some(&self.auth.password))
            .json(status)
            .send()?;
        debug!("Response status: {}", response.status());
        Ok(response)
    }

    /// Pull the response body back out, pretty-printed when the server sent
    /// JSON and verbatim when it did not.
    pub fn extract_pretty_json(response: Response) -> Result<String, ResourceError> {
        let body = response.text()?;
        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => Ok(serde_json::to_string_pretty(&json)?),
            Err(_) => Ok(body),
        }
    }
}

#[derive(Debug)]
struct APIAuth {
    user: String,
    password: String,
}
