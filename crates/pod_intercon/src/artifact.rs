//! Writing generated Intercons to disk.
//!
//! Each Intercon lands at `<dir>/<instance>/hdl/<instance>.vhd`. A file
//! whose content hash already matches is left untouched; any other file
//! at that path is replaced.

use std::path::{Path, PathBuf};

use pod_common::ContentHash;
use serde::Serialize;

use crate::error::InterconError;
use crate::generators::GeneratedText;

/// What writing an artifact did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    /// The file was created or replaced.
    Written,
    /// The file already held this content.
    Unchanged,
}

/// A VHDL file on disk.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    /// Where the file is.
    pub path: PathBuf,
    /// Whether it was written.
    pub status: ArtifactStatus,
    /// Hash of its content.
    pub hash: ContentHash,
}

/// `<dir>/<instance>/hdl/<instance>.vhd`.
pub fn artifact_path(dir: &Path, instance: &str) -> PathBuf {
    dir.join(instance).join("hdl").join(format!("{instance}.vhd"))
}

/// Writes `text` under `dir`, replacing any previous version.
pub fn write_artifact(dir: &Path, text: &GeneratedText) -> Result<Artifact, InterconError> {
    let path = artifact_path(dir, &text.instance);
    let io = |path: &Path| {
        let path = path.to_path_buf();
        move |source| InterconError::Io { path, source }
    };

    if path.is_file() {
        let existing = std::fs::read_to_string(&path).map_err(io(&path))?;
        if ContentHash::from_text(&existing) == text.content_hash {
            log::debug!("{} is up to date", path.display());
            return Ok(Artifact {
                path,
                status: ArtifactStatus::Unchanged,
                hash: text.content_hash,
            });
        }
        std::fs::remove_file(&path).map_err(io(&path))?;
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io(parent))?;
    }
    std::fs::write(&path, &text.code).map_err(io(&path))?;
    log::info!("wrote {}", path.display());
    Ok(Artifact {
        path,
        status: ArtifactStatus::Written,
        hash: text.content_hash,
    })
}
