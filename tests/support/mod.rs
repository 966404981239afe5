#![allow(dead_code)]

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use bitbucket_status::git::git_command;

/// Returns a Command set to the bitbucket-status binary created when you
/// ran `cargo test`, with any Concourse metadata scrubbed from the
/// environment so tests see only what they pass in.
pub fn resource_cmd() -> Command {
    let mut path = env::current_exe().unwrap();
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    let mut command = Command::new(bin_path(&path));
    for key in &[
        "ATC_EXTERNAL_URL",
        "BUILD_PIPELINE_NAME",
        "BUILD_JOB_NAME",
        "BUILD_NAME",
        "BUILD_ID",
    ] {
        command.env_remove(key);
    }
    command
}

fn bin_path(dir: &Path) -> PathBuf {
    dir.join(format!("bitbucket-status{}", env::consts::EXE_SUFFIX))
}

/// Turns `dir` into a git repository with one commit and returns the full
/// commit id of HEAD.
pub fn init_repo(dir: &Path) -> String {
    panic_on_error(git_command(&["init", "-q"], dir));
    panic_on_error(git_command(&["config", "user.email", "ci@example.com"], dir));
    panic_on_error(git_command(&["config", "user.name", "ci"], dir));
    {
        let mut f = File::create(dir.join("README.md")).unwrap();
        f.write_all(b"I like cookies\n").unwrap();
    }
    panic_on_error(git_command(&["add", "."], dir));
    panic_on_error(git_command(&["commit", "-q", "-m", "Initial Commit"], dir));
    let gitr = panic_on_error(git_command(&["rev-parse", "HEAD"], dir));
    gitr.stdout.trim().to_string()
}

fn panic_on_error<T>(result: Result<T, bitbucket_status::errors::ResourceError>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{}: {:?}", e.description(), e.detail()),
    }
}
