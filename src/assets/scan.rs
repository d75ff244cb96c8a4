use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{MorphError, MorphResult};

/// File name suffixes accepted as input images. Matching is case-sensitive.
pub const IMAGE_SUFFIXES: [&str; 3] = [".png", ".jpg", ".jpeg"];

pub fn is_supported_image_name(name: &str) -> bool {
    IMAGE_SUFFIXES.iter().any(|s| name.ends_with(s))
}

/// List the input images of `dir`, sorted lexicographically by file name.
///
/// Sub-directories, other files and non-UTF-8 names are ignored. An empty result is an error.
pub fn scan_images(dir: &Path) -> MorphResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read input directory '{}'", dir.display()))?;

    let mut found = Vec::<(String, PathBuf)>::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("list input directory '{}'", dir.display()))?;
        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!(path = %entry.path().display(), "skipping non-utf8 file name");
            continue;
        };
        if !is_supported_image_name(&name) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        found.push((name, path));
    }

    if found.is_empty() {
        return Err(MorphError::EmptyInput(dir.to_path_buf()));
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found.into_iter().map(|(_, p)| p).collect())
}
