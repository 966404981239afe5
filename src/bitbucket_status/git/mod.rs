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

use std::path::Path;
use std::process::Command;

use log::debug;
use regex::Regex;

use crate::errors::{Kind, ResourceError};

pub struct GitResult {
    pub stdout: String,
    pub stderr: String,
}

pub fn git_command<P: ?Sized>(args: &[&str], c: &P) -> Result<GitResult, ResourceError>
where
    P: AsRef<Path>,
{
    let cwd = c.as_ref();
    let mut command = Command::new("git");
    command.args(args);
    command.current_dir(cwd);
    debug!("Git command: {:?}", command);
    let output = match command.output() {
        Ok(o) => o,
        Err(e) => {
            return Err(ResourceError {
                kind: Kind::FailedToExecute,
                detail: Some(format!("failed to execute git: {}", e)),
            })
        }
    };
    debug!("Git exited: {}", output.status);
    if !output.status.success() {
        return Err(ResourceError {
            kind: Kind::GitFailed,
            detail: Some(format!(
                "STDOUT: {}\nSTDERR: {}\n",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            )),
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    debug!("Git stdout: {}", stdout);
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    debug!("Git stderr: {}", stderr);
    Ok(GitResult { stdout, stderr })
}

/// The one capability the resource needs from a version-control tool.
/// Tests substitute a fake so the `out` flow can run without a repository.
pub trait VersionControl {
    fn head_commit(&self, path: &Path) -> Result<String, ResourceError>;
}

pub struct Git;

impl VersionControl for Git {
    // Reading .git directly is unreliable across garbage collection; ask
    // the git binary instead.
    fn head_commit(&self, path: &Path) -> Result<String, ResourceError> {
        let gitr = git_command(&["rev-parse", "HEAD"], path)?;
        parse_head_commit(&gitr.stdout)
    }
}

fn parse_head_commit(stdout: &str) -> Result<String, ResourceError> {
    let r = Regex::new(r"^(?i)[0-9a-f]{40}(?:[0-9a-f]{24})?$").unwrap();
    let commit = stdout.trim();
    if r.is_match(commit) {
        Ok(commit.to_lowercase())
    } else {
        Err(ResourceError {
            kind: Kind::BadGitOutputMatch,
            detail: Some(format!("Failed to match: {}", stdout)),
        })
    }
}

/// The six character prefix Bitbucket statuses are keyed against.
pub fn short_ref(commit: &str) -> String {
    commit.chars().take(6).collect()
}
