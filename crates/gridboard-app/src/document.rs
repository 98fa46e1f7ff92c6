// Dashboard document I/O. The layout engine never touches the filesystem;
// this is the only place a dashboard is read or written.

use std::path::{Path, PathBuf};

use gridboard_core::Dashboard;
use gridboard_layout::canonicalize_rows;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a valid dashboard: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize dashboard: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub fn load(path: &Path) -> Result<Dashboard, DocumentError> {
    let data = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `dashboard` as pretty JSON, normalizing row metadata first when
/// `canonicalize` is set.
pub fn save(path: &Path, dashboard: &Dashboard, canonicalize: bool) -> Result<(), DocumentError> {
    let json = if canonicalize {
        serde_json::to_string_pretty(&canonicalize_rows(dashboard))
    } else {
        serde_json::to_string_pretty(dashboard)
    }
    .map_err(DocumentError::Serialize)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DocumentError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, json + "\n").map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Saved {} panels to {}", dashboard.panels.len(), path.display());
    Ok(())
}
