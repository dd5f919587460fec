use std::{fmt::Display, io, path::PathBuf};

use crate::{
    adapter::session::Connector,
    config::{ConfigFile, SyncConfig},
    error::{Result, SyncError},
    sync::Syncer,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    PullTree,
    PushTree,
    PullFiles(Vec<String>),
    PushFiles(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct SyncRequest {
    pub operation: Operation,
    pub local: PathBuf,
    pub remote: String,
}

impl Display for SyncRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (verb, arrow) = match &self.operation {
            Operation::PullTree => ("Pulling tree".to_string(), "<-"),
            Operation::PushTree => ("Pushing tree".to_string(), "->"),
            Operation::PullFiles(files) => (format!("Pulling {} files", files.len()), "<-"),
            Operation::PushFiles(files) => (format!("Pushing {} files", files.len()), "->"),
        };
        write!(f, "{verb} {} {arrow} {}", self.local.display(), self.remote)
    }
}

/// Values given on the command line. They take precedence over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub username: Option<String>,
    pub ignore: Vec<String>,
    pub verbose: bool,
}

/// Merges file, command line and ssh config into a [`SyncConfig`], asking
/// for whatever is still missing.
///
/// `prompt` gets `(hidden, message)` and returns the typed answer.
pub fn resolve_config(
    server: &str,
    file: ConfigFile,
    overrides: Overrides,
    configured_user: Option<&str>,
    mut prompt: impl FnMut(bool, &str) -> io::Result<String>,
) -> Result<SyncConfig> {
    let prompt_error = |err: io::Error| SyncError::Config(format!("could not read answer: {err}"));

    let username = match overrides
        .username
        .or(file.username)
        .or(configured_user.map(str::to_string))
    {
        Some(username) => username,
        None => prompt(false, "Username: ").map_err(prompt_error)?,
    };
    if username.is_empty() {
        return Err(SyncError::Config("no username given".to_string()));
    }

    let password = match file.password {
        Some(password) => password,
        None => prompt(true, &format!("[{}@{}] Password: ", username, server))
            .map_err(prompt_error)?,
    };

    let mut ignore = file.ignore.unwrap_or_default();
    if !ignore.is_empty() && !ignore.ends_with('\n') {
        ignore.push('\n');
    }
    for pattern in overrides.ignore {
        ignore.push_str(&pattern);
        ignore.push('\n');
    }

    let ignore = (!ignore.is_empty()).then_some(ignore);
    Ok(
        SyncConfig::new(server, &username, &password, ignore.as_deref())
            .with_verbose(overrides.verbose || file.verbose),
    )
}

pub fn run_sync<C: Connector>(syncer: &Syncer<C>, request: &SyncRequest) -> Result<()> {
    tracing::info!(request = %request, "starting");

    match &request.operation {
        Operation::PullTree => syncer.pull_tree(&request.local, &request.remote),
        Operation::PushTree => syncer.push_tree(&request.local, &request.remote),
        Operation::PullFiles(files) => syncer.pull_files(&request.local, &request.remote, files),
        Operation::PushFiles(files) => syncer.push_files(&request.local, &request.remote, files),
    }
}
