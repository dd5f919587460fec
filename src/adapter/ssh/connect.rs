use std::{
    fs::File,
    io::BufReader,
    net::{TcpStream, ToSocketAddrs},
    path::PathBuf,
    time::Duration,
};

use ssh2::{MethodType, Session};
use ssh2_config::{HostParams, ParseRule, SshConfig};

use crate::{
    check,
    error::{Result, SyncError},
};

pub(super) const DEFAULT_PORT: u16 = 22;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

fn user_ssh_config() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".ssh").join("config"))
}

/// Host parameters for `hostname` from `~/.ssh/config`. A missing or
/// unreadable file yields the defaults.
pub(super) fn load_host_params(hostname: &str) -> HostParams {
    let config = user_ssh_config()
        .and_then(|path| File::open(path).ok())
        .and_then(|file| {
            let mut reader = BufReader::new(file);
            match SshConfig::default().parse(&mut reader, ParseRule::ALLOW_UNKNOWN_FIELDS) {
                Ok(config) => Some(config),
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring unparsable ssh config");
                    None
                }
            }
        })
        .unwrap_or_default();

    config.query(hostname)
}

/// `host:port` to dial. An explicit port in `hostname` wins over the config.
pub(super) fn dial_address(hostname: &str, params: &HostParams) -> String {
    let host = params.host_name.as_deref().unwrap_or(hostname);

    if host.contains(':') {
        check!(
            params.port.is_none(),
            "Port {} is ignored, because hostname seems to contain port (it has ':')",
            params.port.unwrap_or(DEFAULT_PORT)
        );
        host.to_string()
    } else {
        format!("{}:{}", host, params.port.unwrap_or(DEFAULT_PORT))
    }
}

pub(super) fn try_connection(address: &str) -> Result<TcpStream> {
    let connection_error = |reason: String| SyncError::Connection {
        server: address.to_string(),
        reason,
    };

    let addrs = address
        .to_socket_addrs()
        .map_err(|err| connection_error(err.to_string()))?;

    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_error = Some(err),
        }
    }

    Err(connection_error(
        last_error
            .map(|err| err.to_string())
            .unwrap_or("no address resolved".to_string()),
    ))
}

pub(super) fn authenticate(session: &Session, server: &str, user: &str, password: &str) -> Result<()> {
    session
        .userauth_password(user, password)
        .map_err(|err| SyncError::Auth {
            server: server.to_string(),
            user: user.to_string(),
            reason: err.message().to_string(),
        })?;

    if !session.authenticated() {
        return Err(SyncError::Auth {
            server: server.to_string(),
            user: user.to_string(),
            reason: "server did not accept the password".to_string(),
        });
    }

    Ok(())
}

// Used mostly the same logic to https://github.com/veeso/ssh2-config/blob/main/examples/client.rs
pub(super) fn configure_session(session: &mut Session, params: &HostParams) {
    if let Some(compress) = params.compression {
        session.set_compress(compress);
    }
    if params.tcp_keep_alive.unwrap_or(false) {
        if let Some(interval) = params.server_alive_interval {
            session.set_keepalive(true, interval.as_secs() as u32);
        }
    }

    macro_rules! report_if_fail {
        ($op: expr, $err: expr) => {{
            if let Err(err) = $op {
                check!(false, "{}: {}", $err, err);
            }
        }};
    }

    // algos
    if let Some(algos) = params.kex_algorithms.as_deref() {
        report_if_fail!(
            session.method_pref(MethodType::Kex, algos.join(",").as_str()),
            "Could not set KEX algorithms"
        );
    }
    if let Some(algos) = params.host_key_algorithms.as_deref() {
        report_if_fail!(
            session.method_pref(MethodType::HostKey, algos.join(",").as_str()),
            "Could not set host key algorithms"
        );
    }
    if let Some(algos) = params.ciphers.as_deref() {
        report_if_fail!(
            session.method_pref(MethodType::CryptCs, algos.join(",").as_str()),
            "Could not set crypt algorithms (client-server)"
        );
        report_if_fail!(
            session.method_pref(MethodType::CryptSc, algos.join(",").as_str()),
            "Could not set crypt algorithms (server-client)"
        );
    }
    if let Some(algos) = params.mac.as_deref() {
        report_if_fail!(
            session.method_pref(MethodType::MacCs, algos.join(",").as_str()),
            "Could not set MAC algorithms (client-server)"
        );
        report_if_fail!(
            session.method_pref(MethodType::MacSc, algos.join(",").as_str()),
            "Could not set MAC algorithms (server-client)"
        )
    }
}
