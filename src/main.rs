use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use treesync::{
    adapter::ssh::SshConnector,
    config::read_config,
    progress::ProgressView,
    services::run_sync::{resolve_config, run_sync, Operation, Overrides, SyncRequest},
    util::{parse_file_list, read_from_stdin},
    Syncer,
};

#[derive(Debug, Parser)]
#[command(name = "treesync", version, about = "Mirror directory trees to and from an SFTP server")]
struct Cli {
    /// Config file (defaults to ./treesync.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print every transferred file (-v); more for debug logs (-vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Remote host, optionally with :port
    #[arg(long, global = true)]
    server: Option<String>,

    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Extra ignore pattern for push-tree (repeatable)
    #[arg(long, global = true)]
    ignore: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Mirror a remote tree into a local directory
    PullTree(TreeArgs),
    /// Mirror a local tree onto the server
    PushTree(TreeArgs),
    /// Fetch an explicit list of files
    PullFiles(FileArgs),
    /// Store an explicit list of files
    PushFiles(FileArgs),
}

#[derive(Debug, Args)]
struct TreeArgs {
    local: PathBuf,
    remote: String,
}

#[derive(Debug, Args)]
struct FileArgs {
    local: PathBuf,
    remote: String,
    /// Paths relative to both roots
    files: Vec<String>,
    /// Read more paths from this file, one per line
    #[arg(long)]
    files_from: Option<PathBuf>,
}

impl FileArgs {
    fn into_files(self) -> Result<(PathBuf, String, Vec<String>)> {
        let mut files = self.files;
        if let Some(list) = &self.files_from {
            let content = fs::read_to_string(list)
                .with_context(|| format!("Could not read file list {}", list.display()))?;
            files.extend(parse_file_list(&content));
        }
        if files.is_empty() {
            bail!("No files given");
        }
        Ok((self.local, self.remote, files))
    }
}

impl Commands {
    fn into_request(self) -> Result<SyncRequest> {
        let (operation, local, remote) = match self {
            Commands::PullTree(args) => (Operation::PullTree, args.local, args.remote),
            Commands::PushTree(args) => (Operation::PushTree, args.local, args.remote),
            Commands::PullFiles(args) => {
                let (local, remote, files) = args.into_files()?;
                (Operation::PullFiles(files), local, remote)
            }
            Commands::PushFiles(args) => {
                let (local, remote, files) = args.into_files()?;
                (Operation::PushFiles(files), local, remote)
            }
        };

        Ok(SyncRequest {
            operation,
            local,
            remote,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 | 1 => "warn",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let request = cli.command.into_request()?;

    let mut ctx = read_config(cli.config)?;
    let Some(server) = cli.server.or(ctx.config.server.take()) else {
        bail!(
            "No server given; pass --server or set `server` in {}",
            ctx.config_file.display()
        );
    };

    let connector = SshConnector::new(&server);
    let overrides = Overrides {
        username: cli.user,
        ignore: cli.ignore,
        verbose: cli.verbose > 0,
    };
    let config = resolve_config(
        &server,
        ctx.config,
        overrides,
        connector.configured_user(),
        read_from_stdin,
    )?;

    let mut progress = (!config.verbose()).then(|| {
        let mut view = ProgressView::new(&request);
        view.start();
        view
    });

    let syncer = Syncer::new(config, connector);
    let result = tokio::task::spawn_blocking(move || run_sync(&syncer, &request)).await?;

    if let Some(progress) = progress.as_mut() {
        match &result {
            Ok(()) => progress.success(None),
            Err(err) => progress.failure(Some(&err.to_string())),
        }
    }

    Ok(result?)
}
