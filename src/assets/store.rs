//! Storage for normalized RGBA frames between the prepare and render stages.

use std::path::{Path, PathBuf};

use crate::foundation::error::{MorphError, MorphResult};
use crate::frame::{RgbFrame, RgbaFrame};

/// Where normalized frames live until the timeline is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageStrategy {
    /// Keep every frame in memory. Peak memory grows with the image count.
    InMemory,
    /// Write frames as lossless PNGs into a temporary directory, read back on demand.
    #[default]
    Spool,
}

/// Ordered store of normalized frames, indexed by input position.
pub trait FrameStore: Send + Sync {
    /// Append the frame for input image `name`.
    fn put(&mut self, name: &str, frame: &RgbaFrame) -> MorphResult<()>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Load frame `index`, alpha discarded.
    fn load_rgb(&self, index: usize) -> MorphResult<RgbFrame>;
}

/// Open a store for `strategy`. Spool directories are created under `spool_root` (or the system
/// temp directory) and removed when the store is dropped.
pub fn open_store(
    strategy: StorageStrategy,
    spool_root: Option<&Path>,
) -> MorphResult<Box<dyn FrameStore>> {
    Ok(match strategy {
        StorageStrategy::InMemory => Box::new(InMemoryStore::default()),
        StorageStrategy::Spool => Box::new(SpoolStore::new(spool_root)?),
    })
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    frames: Vec<RgbaFrame>,
}

impl FrameStore for InMemoryStore {
    fn put(&mut self, _name: &str, frame: &RgbaFrame) -> MorphResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn len(&self) -> usize {
        self.frames.len()
    }

    fn load_rgb(&self, index: usize) -> MorphResult<RgbFrame> {
        self.frames
            .get(index)
            .map(RgbaFrame::to_rgb)
            .ok_or_else(|| out_of_range(index, self.frames.len()))
    }
}

/// Frames spooled to `<tempdir>/<input file name>.png`.
#[derive(Debug)]
pub struct SpoolStore {
    dir: tempfile::TempDir,
    entries: Vec<PathBuf>,
}

impl SpoolStore {
    pub fn new(root: Option<&Path>) -> MorphResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("morphreel-");
        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(|e| {
                    MorphError::storage(format!(
                        "failed to create spool root '{}': {e}",
                        root.display()
                    ))
                })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| MorphError::storage(format!("failed to create spool directory: {e}")))?;
        tracing::debug!(dir = %dir.path().display(), "spool directory created");
        Ok(Self {
            dir,
            entries: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

impl FrameStore for SpoolStore {
    fn put(&mut self, name: &str, frame: &RgbaFrame) -> MorphResult<()> {
        let file_name = spool_file_name(name)?;
        let path = self.dir.path().join(file_name);
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| {
            MorphError::storage(format!("failed to spool '{}': {e}", path.display()))
        })?;
        self.entries.push(path);
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn load_rgb(&self, index: usize) -> MorphResult<RgbFrame> {
        let path = self
            .entries
            .get(index)
            .ok_or_else(|| out_of_range(index, self.entries.len()))?;
        let img = image::open(path).map_err(|e| {
            MorphError::storage(format!("failed to read spooled '{}': {e}", path.display()))
        })?;
        Ok(RgbFrame::from(img.to_rgb8()))
    }
}

/// Spool file name for an input image: its own file name with `.png` appended, which keeps names
/// from one directory distinct.
pub(crate) fn spool_file_name(name: &str) -> MorphResult<String> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(MorphError::storage(format!(
            "invalid frame name '{name}' for spooling"
        )));
    }
    Ok(format!("{name}.png"))
}

fn out_of_range(index: usize, len: usize) -> MorphError {
    MorphError::storage(format!("frame {index} out of range (store holds {len})"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
