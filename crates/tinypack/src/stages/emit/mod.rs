use std::path::Path;

use tinypack_common::OutputAsset;
use tinypack_error::{BuildDiagnostic, BuildResult};
use tinypack_fs::SharedFileSystem;
use tinypack_utils::rayon::{IntoParallelRefIterator, ParallelIterator};

use crate::types::SharedOptions;

/// Writes finalized assets to the output directory. Each file goes through a
/// temp file and an atomic rename, so a crashed build never leaves a
/// half-written chunk behind.
pub struct EmitStage {
  fs: SharedFileSystem,
  options: SharedOptions,
}

impl EmitStage {
  pub fn new(fs: SharedFileSystem, options: SharedOptions) -> Self {
    Self { fs, options }
  }

  pub fn emit(&self, assets: &[OutputAsset]) -> BuildResult<()> {
    let out_dir = self.options.out_dir();
    self.fs.create_dir_all(&out_dir).map_err(|err| {
      anyhow::Error::from(BuildDiagnostic::config(format!(
        "Output directory {} is not writable: {err}",
        out_dir.display()
      )))
    })?;

    let errors: Vec<anyhow::Error> = assets
      .par_iter()
      .filter_map(|asset| self.write_asset(&out_dir, asset).err())
      .collect();

    if errors.is_empty() {
      Ok(())
    } else {
      Err(errors.into())
    }
  }

  fn write_asset(&self, out_dir: &Path, asset: &OutputAsset) -> anyhow::Result<()> {
    let dest = out_dir.join(&asset.filename);
    if let Some(parent) = dest.parent() {
      self.fs.create_dir_all(parent)?;
    }
    let tmp = out_dir.join(format!("{}.tmp", asset.filename));
    self.fs.write(&tmp, asset.content_as_bytes())?;
    self.fs.rename(&tmp, &dest)?;
    tracing::debug!(file = asset.filename.as_str(), bytes = asset.content.len(), "emitted");
    Ok(())
  }
}
