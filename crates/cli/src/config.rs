//! Locating the project config for an IDL file.

use std::path::{Path, PathBuf};

use bytesnap_codegen::{CodegenError, ProjectConfig};

pub(crate) const CONFIG_FILE_NAME: &str = "bytesnap.toml";

/// An explicit `--config` must exist. Otherwise `bytesnap.toml` beside the
/// IDL file is used when present, and defaults apply when it is not. The
/// project name falls back to the IDL file stem.
pub(crate) fn resolve(idl: &Path, explicit: Option<&Path>) -> Result<ProjectConfig, CodegenError> {
    let stem = idl
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bytesnap".to_string());

    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => Some(sibling_config(idl)).filter(|p| p.is_file()),
    };

    match path {
        Some(p) => {
            tracing::debug!("loading config from {}", p.display());
            ProjectConfig::load(&p, &stem)
        }
        None => Ok(ProjectConfig::named(stem)),
    }
}

fn sibling_config(idl: &Path) -> PathBuf {
    idl.parent()
        .unwrap_or_else(|| Path::new("."))
        .join(CONFIG_FILE_NAME)
}
