use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use ssh2::Sftp;

use crate::error::{Result, SyncError};

pub(super) fn download(sftp: &Sftp, remote: &str, local: &Path) -> Result<()> {
    let mut source = sftp
        .open(Path::new(remote))
        .map_err(|err| SyncError::transfer(local, remote, err.message()))?;
    let dest = File::create(local).map_err(|err| SyncError::local_io(local, err))?;

    let mut writer = BufWriter::new(dest);
    io::copy(&mut source, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|err| SyncError::transfer(local, remote, err))?;

    Ok(())
}

pub(super) fn upload(sftp: &Sftp, local: &Path, remote: &str) -> Result<()> {
    let source = File::open(local).map_err(|err| SyncError::local_io(local, err))?;
    let mut dest = sftp
        .create(Path::new(remote))
        .map_err(|err| SyncError::transfer(local, remote, err.message()))?;

    io::copy(&mut BufReader::new(source), &mut dest)
        .and_then(|_| dest.flush())
        .map_err(|err| SyncError::transfer(local, remote, err))?;

    Ok(())
}
