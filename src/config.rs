use std::{fs::File, io::BufReader, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

pub const DEFAULT_CONFIG_FILE: &str = "./treesync.yaml";

/// Always part of the ignore set, whatever the caller adds.
pub const DEFAULT_IGNORE: &str = ".git/\n";

/// Connection and behaviour settings of a [`Syncer`](crate::sync::Syncer).
#[derive(Clone)]
pub struct SyncConfig {
    server: String,
    username: String,
    password: String,
    ignore: String,
    verbose: bool,
}

impl SyncConfig {
    pub fn new(server: &str, username: &str, password: &str, ignore: Option<&str>) -> Self {
        let mut patterns = DEFAULT_IGNORE.to_string();
        if let Some(extra) = ignore {
            patterns.push_str(extra);
        }

        Self {
            server: server.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            ignore: patterns,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Newline separated ignore patterns, default first.
    pub fn ignore(&self) -> &str {
        &self.ignore
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("ignore", &self.ignore)
            .field("verbose", &self.verbose)
            .finish()
    }
}

pub struct ConfigContext {
    pub config_file: PathBuf,
    pub config: ConfigFile,
}

/// On-disk form of the settings. Every field may be overridden from the
/// command line.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<String>,
    #[serde(alias = "user")]
    pub username: Option<String>,
    pub password: Option<String>,
    pub ignore: Option<String>,
    #[serde(default)]
    pub verbose: bool,
}

/// Reads the YAML config. A missing default file is not an error, an
/// explicitly requested one is.
pub fn read_config(path: Option<PathBuf>) -> Result<ConfigContext> {
    let explicit = path.is_some();
    let path = path.unwrap_or(DEFAULT_CONFIG_FILE.into());

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ConfigContext {
                config_file: path,
                config: ConfigFile::default(),
            });
        }
        Err(err) => return Err(SyncError::local_io(&path, err)),
    };

    let config = serde_yaml::from_reader(BufReader::new(file))
        .map_err(|err| SyncError::Config(format!("{}: {}", path.display(), err)))?;

    Ok(ConfigContext {
        config_file: path,
        config,
    })
}
