use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

pub const TEMP_INPUT_PREFIX: &str = "temp_input_";
pub const TEMP_OUTPUT_PREFIX: &str = "temp_output_";

const TEMP_ID_LEN: usize = 8;
const MAX_CREATE_ATTEMPTS: usize = 16;

/// Owns a scratch file path and removes the file when dropped.
///
/// The file does not have to exist: a guard can be taken out for a path that
/// a later step is expected to create. Removal failures other than
/// `NotFound` are logged and swallowed.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed temp file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Could not remove temp file"
            ),
        }
    }
}

/// Short random identifier shared by the input and output artifacts of one call.
pub fn temp_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(TEMP_ID_LEN);
    id
}

/// Writes `bytes` to `temp_input_{id}.{extension}` under `dir`.
///
/// The file is created with create-new semantics and a fresh id is drawn on
/// collision, so no two live calls share an id.
pub async fn materialize_input(
    dir: &Path,
    extension: &str,
    bytes: &[u8],
) -> io::Result<(String, TempArtifact)> {
    tokio::fs::create_dir_all(dir).await?;

    for _ in 0..MAX_CREATE_ATTEMPTS {
        let id = temp_id();
        let path = dir.join(format!("{TEMP_INPUT_PREFIX}{id}.{extension}"));

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        };

        let artifact = TempArtifact::new(path);
        file.write_all(bytes).await?;
        file.flush().await?;

        return Ok((id, artifact));
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "could not allocate a unique temp file name",
    ))
}

pub fn output_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{TEMP_OUTPUT_PREFIX}{id}.wav"))
}
