//! SFTP transport over `ssh2`.

use std::path::Path;

use ssh2::{ErrorCode, Session, Sftp};
use ssh2_config::HostParams;

use crate::{
    adapter::session::{Connector, EntryKind, MkdirOutcome, RemoteEntry, RemoteSession},
    config::SyncConfig,
    error::{Result, SyncError},
};

use self::connect::{authenticate, configure_session, dial_address, load_host_params, try_connection};

mod connect;
mod transfer;

// libssh2 SFTP status codes
const FX_FAILURE: i32 = 4;
const FX_PERMISSION_DENIED: i32 = 3;
const FX_FILE_ALREADY_EXISTS: i32 = 11;

const DIR_MODE: i32 = 0o755;

/// Opens SFTP sessions to one host, honouring `~/.ssh/config`.
pub struct SshConnector {
    hostname: String,
    params: HostParams,
}

impl SshConnector {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            params: load_host_params(hostname),
        }
    }

    /// `User` configured for this host in the ssh config, if any.
    pub fn configured_user(&self) -> Option<&str> {
        self.params.user.as_deref()
    }
}

impl Connector for SshConnector {
    fn connect(&self, config: &SyncConfig) -> Result<Box<dyn RemoteSession>> {
        let address = dial_address(&self.hostname, &self.params);
        let connection_error = |err: ssh2::Error| SyncError::Connection {
            server: address.clone(),
            reason: err.message().to_string(),
        };

        let stream = try_connection(&address)?;
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or("[host]".to_string());
        tracing::debug!(peer = %peer, "tcp connected");

        let mut session = Session::new().map_err(connection_error)?;
        configure_session(&mut session, &self.params);
        session.set_tcp_stream(stream);
        session.handshake().map_err(connection_error)?;

        authenticate(&session, &address, config.username(), config.password())?;

        if let Some(banner) = session.banner() {
            tracing::info!(banner, "server banner");
        }

        let sftp = session.sftp().map_err(connection_error)?;

        Ok(Box::new(SftpSession {
            server: address,
            session,
            sftp,
        }))
    }
}

pub struct SftpSession {
    server: String,
    session: Session,
    sftp: Sftp,
}

fn sftp_status(err: &ssh2::Error) -> Option<i32> {
    match err.code() {
        ErrorCode::SFTP(code) => Some(code),
        ErrorCode::Session(_) => None,
    }
}

impl RemoteSession for SftpSession {
    fn list(&mut self, remote: &str) -> Result<Vec<RemoteEntry>> {
        let listing = self
            .sftp
            .readdir(Path::new(remote))
            .map_err(|err| SyncError::remote_io(remote, err.message()))?;

        Ok(listing
            .into_iter()
            .filter_map(|(path, stat)| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                if name == "." || name == ".." {
                    return None;
                }

                let kind = if stat.is_dir() {
                    EntryKind::Dir
                } else if stat.is_file() {
                    EntryKind::File
                } else {
                    EntryKind::Other
                };
                Some(RemoteEntry::new(name, kind))
            })
            .collect())
    }

    fn get(&mut self, remote: &str, local: &Path) -> Result<()> {
        transfer::download(&self.sftp, remote, local)
    }

    fn put(&mut self, local: &Path, remote: &str) -> Result<()> {
        transfer::upload(&self.sftp, local, remote)
    }

    fn mkdir(&mut self, remote: &str) -> Result<MkdirOutcome> {
        let path = Path::new(remote);
        let Err(err) = self.sftp.mkdir(path, DIR_MODE) else {
            return Ok(MkdirOutcome::Created);
        };

        match sftp_status(&err) {
            Some(FX_FILE_ALREADY_EXISTS) => Ok(MkdirOutcome::Exists),
            // Plenty of servers answer a plain FAILURE for an existing path
            Some(FX_FAILURE) if self.sftp.stat(path).is_ok_and(|stat| stat.is_dir()) => {
                Ok(MkdirOutcome::Exists)
            }
            Some(FX_PERMISSION_DENIED) => Err(SyncError::Permission {
                path: remote.to_string(),
            }),
            _ => Err(SyncError::remote_io(remote, err.message())),
        }
    }

    fn close(self: Box<Self>) -> Result<()> {
        let Self {
            server,
            session,
            sftp,
        } = *self;
        drop(sftp);

        session
            .disconnect(None, "treesync done", None)
            .map_err(|err| SyncError::Connection {
                server,
                reason: err.message().to_string(),
            })
    }
}
