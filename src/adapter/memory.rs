//! In-process remote file tree.
//!
//! Behaves like a remote server for the engine: listings come back in
//! insertion order, `mkdir` is not recursive, and every call is recorded so
//! callers can inspect what the engine did. Failures can be injected per
//! path.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    config::SyncConfig,
    error::{Result, SyncError},
};

use super::session::{Connector, EntryKind, MkdirOutcome, RemoteEntry, RemoteSession};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Connect,
    List(String),
    Get(String),
    Put(String),
    Mkdir(String),
    Close,
}

#[derive(Clone, Debug)]
enum Node {
    Dir,
    File(Vec<u8>),
    Other,
}

#[derive(Default)]
struct State {
    nodes: BTreeMap<String, Node>,
    order: Vec<String>,
    ops: Vec<Op>,
    deny_mkdir: HashSet<String>,
    fail_get: HashSet<String>,
    fail_put: HashSet<String>,
    fail_list: HashSet<String>,
}

impl State {
    fn insert(&mut self, path: &str, node: Node) {
        if !self.nodes.contains_key(path) {
            self.order.push(path.to_string());
        }
        self.nodes.insert(path.to_string(), node);
    }

    fn is_dir(&self, path: &str) -> bool {
        is_root(path) || matches!(self.nodes.get(path), Some(Node::Dir))
    }

    fn parent_is_dir(&self, path: &str) -> bool {
        parent(path).map_or(true, |parent| self.is_dir(parent))
    }
}

fn normalize(path: &str) -> String {
    match path.trim_end_matches('/') {
        "" if path.starts_with('/') => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn is_root(path: &str) -> bool {
    path.is_empty() || path == "/"
}

fn parent(path: &str) -> Option<&str> {
    match path.rsplit_once('/')? {
        ("", _) => None,
        (parent, _) => Some(parent),
    }
}

fn parent_or_root(path: &str) -> &str {
    match parent(path) {
        Some(parent) => parent,
        None if path.starts_with('/') => "/",
        None => "",
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Shared handle on the fake server. Clones see the same tree.
#[derive(Clone, Default)]
pub struct MemoryServer {
    state: Arc<Mutex<State>>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a directory and all of its missing ancestors.
    pub fn add_dir(&self, path: &str) {
        let path = normalize(path);
        let mut state = self.state();

        let mut ancestors = Vec::new();
        let mut current = Some(path.as_str());
        while let Some(dir) = current {
            if is_root(dir) {
                break;
            }
            ancestors.push(dir.to_string());
            current = parent(dir);
        }

        for dir in ancestors.into_iter().rev() {
            if !state.nodes.contains_key(&dir) {
                state.insert(&dir, Node::Dir);
            }
        }
    }

    pub fn add_file(&self, path: &str, content: impl AsRef<[u8]>) {
        let path = normalize(path);
        if let Some(parent) = parent(&path) {
            self.add_dir(parent);
        }
        self.state().insert(&path, Node::File(content.as_ref().to_vec()));
    }

    /// Adds an entry that is neither file nor directory, like a symlink.
    pub fn add_other(&self, path: &str) {
        let path = normalize(path);
        if let Some(parent) = parent(&path) {
            self.add_dir(parent);
        }
        self.state().insert(&path, Node::Other);
    }

    pub fn deny_mkdir(&self, path: &str) {
        self.state().deny_mkdir.insert(normalize(path));
    }

    pub fn fail_get(&self, path: &str) {
        self.state().fail_get.insert(normalize(path));
    }

    pub fn fail_put(&self, path: &str) {
        self.state().fail_put.insert(normalize(path));
    }

    pub fn fail_list(&self, path: &str) {
        self.state().fail_list.insert(normalize(path));
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.state().is_dir(&normalize(path))
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        match self.state().nodes.get(&normalize(path)) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.state().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state().ops.clear();
    }

    pub fn mkdirs(&self) -> Vec<String> {
        self.filter_ops(|op| match op {
            Op::Mkdir(path) => Some(path.clone()),
            _ => None,
        })
    }

    pub fn puts(&self) -> Vec<String> {
        self.filter_ops(|op| match op {
            Op::Put(path) => Some(path.clone()),
            _ => None,
        })
    }

    pub fn gets(&self) -> Vec<String> {
        self.filter_ops(|op| match op {
            Op::Get(path) => Some(path.clone()),
            _ => None,
        })
    }

    pub fn count(&self, wanted: &Op) -> usize {
        self.state().ops.iter().filter(|op| *op == wanted).count()
    }

    fn filter_ops(&self, pick: impl Fn(&Op) -> Option<String>) -> Vec<String> {
        self.state().ops.iter().filter_map(pick).collect()
    }

    /// Session that skips authentication.
    pub fn session(&self) -> MemorySession {
        MemorySession {
            server: self.clone(),
        }
    }
}

/// Connector accepting exactly one username/password pair.
pub struct MemoryConnector {
    server: MemoryServer,
    username: String,
    password: String,
}

impl MemoryConnector {
    pub fn new(server: &MemoryServer, username: &str, password: &str) -> Self {
        Self {
            server: server.clone(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl Connector for MemoryConnector {
    fn connect(&self, config: &SyncConfig) -> Result<Box<dyn RemoteSession>> {
        self.server.state().ops.push(Op::Connect);

        if config.username() != self.username || config.password() != self.password {
            return Err(SyncError::Auth {
                server: config.server().to_string(),
                user: config.username().to_string(),
                reason: "invalid credentials".to_string(),
            });
        }

        Ok(Box::new(self.server.session()))
    }
}

pub struct MemorySession {
    server: MemoryServer,
}

impl RemoteSession for MemorySession {
    fn list(&mut self, remote: &str) -> Result<Vec<RemoteEntry>> {
        let remote = normalize(remote);
        let mut state = self.server.state();
        state.ops.push(Op::List(remote.clone()));

        if state.fail_list.contains(&remote) || !state.is_dir(&remote) {
            return Err(SyncError::remote_io(&remote, "no such directory"));
        }

        let entries = state
            .order
            .iter()
            .filter(|path| parent_or_root(path) == remote.as_str())
            .map(|path| {
                let kind = match state.nodes[path] {
                    Node::Dir => EntryKind::Dir,
                    Node::File(_) => EntryKind::File,
                    Node::Other => EntryKind::Other,
                };
                RemoteEntry::new(base_name(path), kind)
            })
            .collect();

        Ok(entries)
    }

    fn get(&mut self, remote: &str, local: &Path) -> Result<()> {
        let remote = normalize(remote);
        let mut state = self.server.state();
        state.ops.push(Op::Get(remote.clone()));

        if state.fail_get.contains(&remote) {
            return Err(SyncError::transfer(local, &remote, "injected failure"));
        }
        let Some(Node::File(content)) = state.nodes.get(&remote) else {
            return Err(SyncError::transfer(local, &remote, "no such file"));
        };

        fs::write(local, content).map_err(|err| SyncError::local_io(local, err))
    }

    fn put(&mut self, local: &Path, remote: &str) -> Result<()> {
        let remote = normalize(remote);
        let mut state = self.server.state();
        state.ops.push(Op::Put(remote.clone()));

        if state.fail_put.contains(&remote) {
            return Err(SyncError::transfer(local, &remote, "injected failure"));
        }
        if !state.parent_is_dir(&remote) {
            return Err(SyncError::transfer(local, &remote, "no such directory"));
        }

        let content = fs::read(local).map_err(|err| SyncError::local_io(local, err))?;
        state.insert(&remote, Node::File(content));
        Ok(())
    }

    fn mkdir(&mut self, remote: &str) -> Result<MkdirOutcome> {
        let remote = normalize(remote);
        let mut state = self.server.state();
        state.ops.push(Op::Mkdir(remote.clone()));

        if state.deny_mkdir.contains(&remote) {
            return Err(SyncError::Permission { path: remote });
        }
        match state.nodes.get(&remote) {
            Some(Node::Dir) => return Ok(MkdirOutcome::Exists),
            Some(_) => return Err(SyncError::remote_io(&remote, "not a directory")),
            None if is_root(&remote) => return Ok(MkdirOutcome::Exists),
            None => {}
        }
        if !state.parent_is_dir(&remote) {
            return Err(SyncError::remote_io(&remote, "no such parent directory"));
        }

        state.insert(&remote, Node::Dir);
        Ok(MkdirOutcome::Created)
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.server.state().ops.push(Op::Close);
        Ok(())
    }
}
