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

use std::env;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::errors::{Kind, ResourceError};

/// The resource descriptor Concourse writes to stdin: a `source` block from
/// the pipeline's resource declaration and a `params` block from the put
/// step. Every field is optional at parse time; a missing value only becomes
/// an error once something asks for it.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Input {
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub params: Params,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Source {
    pub bitbucket_username: Option<String>,
    pub bitbucket_password: Option<String>,
    pub bitbucket_org: Option<String>,
    pub bitbucket_repo: Option<String>,
    pub bitbucket_url: Option<String>,
    pub verify_ssl: Option<bool>,
    pub debug: Option<bool>,
    pub atc_external: Option<String>,
    pub pipeline: Option<String>,
    pub job_name: Option<String>,
    pub build_name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Params {
    pub build_status: Option<String>,
    pub repo: Option<String>,
}

impl Input {
    pub fn from_reader<R: Read>(reader: R) -> Result<Input, ResourceError> {
        let input: Input = serde_json::from_reader(reader)?;
        Ok(input)
    }
}

macro_rules! config_accessor_for {
    ($struct_name:ident, $name:ident, $err_msg:expr) => {
        impl $struct_name {
            pub fn $name(&self) -> Result<String, ResourceError> {
                match self.$name {
                    Some(ref v) => Ok(v.clone()),
                    None => Err(ResourceError {
                        kind: Kind::MissingConfig,
                        detail: Some(String::from($err_msg)),
                    }),
                }
            }
        }
    };
}

config_accessor_for!(Source, bitbucket_username, "bitbucket_username not set; add it to the resource source configuration");
config_accessor_for!(Source, bitbucket_password, "bitbucket_password not set; add it to the resource source configuration");
config_accessor_for!(Source, bitbucket_org, "bitbucket_org not set; add it to the resource source configuration");
config_accessor_for!(Source, bitbucket_repo, "bitbucket_repo not set; add it to the resource source configuration");
config_accessor_for!(Source, bitbucket_url, "bitbucket_url not set; add it to the resource source configuration");
config_accessor_for!(Source, atc_external, "atc_external not set and ATC_EXTERNAL_URL is absent from the environment");
config_accessor_for!(Source, pipeline, "pipeline not set and BUILD_PIPELINE_NAME is absent from the environment");
config_accessor_for!(Source, job_name, "job_name not set and BUILD_JOB_NAME is absent from the environment");
config_accessor_for!(Source, build_name, "build_name not set and BUILD_NAME is absent from the environment");
config_accessor_for!(Params, build_status, "build_status not set; add it to the put step params");
config_accessor_for!(Params, repo, "repo not set; add it to the put step params");

/// The effective configuration for one run: environment variables layered
/// over the source block, defaults applied, everything resolved up front.
#[derive(Clone, Debug)]
pub struct Config {
    pub username: String,
    pub password: String,
    pub org: String,
    pub repo: String,
    pub base_url: String,
    pub verify_ssl: bool,
    pub debug: bool,
    pub atc_external_url: String,
    pub pipeline: String,
    pub job_name: String,
    pub build_name: String,
    pub build_id: String,
}

impl Config {
    pub fn effective(source: &Source) -> Result<Config, ResourceError> {
        Config::effective_with(source, |key| env::var(key).ok())
    }

    /// Merge `source` with an environment lookup. Concourse metadata
    /// variables win over the matching source fields; BUILD_ID has no
    /// source counterpart and falls back to "?".
    pub fn effective_with<E>(source: &Source, env: E) -> Result<Config, ResourceError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let atc_external_url = match env("ATC_EXTERNAL_URL") {
            Some(v) => v,
            None => source.atc_external()?,
        };
        let pipeline = match env("BUILD_PIPELINE_NAME") {
            Some(v) => v,
            None => source.pipeline()?,
        };
        let job_name = match env("BUILD_JOB_NAME") {
            Some(v) => v,
            None => source.job_name()?,
        };
        let build_name = match env("BUILD_NAME") {
            Some(v) => v,
            None => source.build_name()?,
        };
        Ok(Config {
            username: source.bitbucket_username()?,
            password: source.bitbucket_password()?,
            org: source.bitbucket_org()?,
            repo: source.bitbucket_repo()?,
            base_url: source.bitbucket_url()?,
            verify_ssl: source.verify_ssl.unwrap_or(true),
            debug: source.debug.unwrap_or(false),
            atc_external_url,
            pipeline,
            job_name,
            build_name,
            build_id: env("BUILD_ID").unwrap_or_else(|| String::from("?")),
        })
    }

    /// The Concourse build page the reported status links back to.
    pub fn build_url(&self) -> String {
        format!(
            "{}/pipelines/{}/jobs/{}/builds/{}",
            self.atc_external_url, self.pipeline, self.job_name, self.build_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Input, Source};
    use crate::errors::Kind;

    fn full_source() -> Source {
        Source {
            bitbucket_username: Some("concourse".to_string()),
            bitbucket_password: Some("hunter2".to_string()),
            bitbucket_org: Some("acme".to_string()),
            bitbucket_repo: Some("widgets".to_string()),
            bitbucket_url: Some("https://bb.example.com".to_string()),
            verify_ssl: None,
            debug: None,
            atc_external: Some("https://ci.example.com".to_string()),
            pipeline: Some("main".to_string()),
            job_name: Some("unit".to_string()),
            build_name: Some("42".to_string()),
        }
    }

    fn no_env(_key: &str) -> Option<String> {
        None
    }

    #[test]
    fn parse_input() {
        let json = r#"
            {
                "source": {
                    "bitbucket_username": "concourse",
                    "bitbucket_password": "hunter2",
                    "bitbucket_org": "acme",
                    "bitbucket_repo": "widgets",
                    "bitbucket_url": "https://bb.example.com",
                    "atc_external": "https://ci.example.com",
                    "pipeline": "main",
                    "job_name": "unit",
                    "build_name": "42"
                },
                "params": { "build_status": "SUCCESSFUL", "repo": "widgets" }
            }"#;
        let input = Input::from_reader(json.as_bytes()).unwrap();
        assert_eq!("concourse", input.source.bitbucket_username().unwrap());
        assert_eq!("https://bb.example.com", input.source.bitbucket_url().unwrap());
        assert_eq!("SUCCESSFUL", input.params.build_status().unwrap());
        assert_eq!("widgets", input.params.repo().unwrap());
        assert_eq!(None, input.source.verify_ssl);
        assert_eq!(None, input.source.debug);
    }

    #[test]
    fn parse_input_rejects_garbage() {
        let result = Input::from_reader("not json at all".as_bytes());
        assert!(result.is_err());
        match result.unwrap_err().kind {
            Kind::JsonError(_) => {}
            other => panic!("expected JsonError, got {:?}", other),
        }
    }

    #[test]
    fn parse_input_rejects_non_object() {
        let result = Input::from_reader("[1, 2, 3]".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn missing_key_surfaces_on_access() {
        let json = r#"{ "source": {}, "params": {} }"#;
        let input = Input::from_reader(json.as_bytes()).unwrap();
        let err = input.params.build_status().unwrap_err();
        match err.kind {
            Kind::MissingConfig => {}
            other => panic!("expected MissingConfig, got {:?}", other),
        }
        assert!(err.detail().unwrap().contains("build_status"));
    }

    #[test]
    fn effective_applies_defaults() {
        let config = Config::effective_with(&full_source(), no_env).unwrap();
        assert_eq!(true, config.verify_ssl);
        assert_eq!(false, config.debug);
        assert_eq!("?", config.build_id);
        assert_eq!("https://ci.example.com", config.atc_external_url);
    }

    #[test]
    fn effective_env_wins_over_source() {
        let config = Config::effective_with(&full_source(), |key| match key {
            "ATC_EXTERNAL_URL" => Some("https://atc.example.com".to_string()),
            "BUILD_PIPELINE_NAME" => Some("release".to_string()),
            "BUILD_JOB_NAME" => Some("integration".to_string()),
            "BUILD_NAME" => Some("7".to_string()),
            "BUILD_ID" => Some("1234".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!("https://atc.example.com", config.atc_external_url);
        assert_eq!("release", config.pipeline);
        assert_eq!("integration", config.job_name);
        assert_eq!("7", config.build_name);
        assert_eq!("1234", config.build_id);
    }

    #[test]
    fn effective_env_covers_missing_source() {
        let mut source = full_source();
        source.pipeline = None;
        source.job_name = None;
        let config = Config::effective_with(&source, |key| match key {
            "BUILD_PIPELINE_NAME" => Some("release".to_string()),
            "BUILD_JOB_NAME" => Some("integration".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!("release", config.pipeline);
        assert_eq!("integration", config.job_name);
    }

    #[test]
    fn effective_errors_when_nothing_provides_a_value() {
        let mut source = full_source();
        source.job_name = None;
        let err = Config::effective_with(&source, no_env).unwrap_err();
        match err.kind {
            Kind::MissingConfig => {}
            other => panic!("expected MissingConfig, got {:?}", other),
        }
        assert!(err.detail().unwrap().contains("BUILD_JOB_NAME"));
    }

    #[test]
    fn test_build_url() {
        let config = Config::effective_with(&full_source(), no_env).unwrap();
        assert_eq!(
            "https://ci.example.com/pipelines/main/jobs/unit/builds/42",
            config.build_url()
        );
    }
}
