use std::path::PathBuf;

use crate::{DevServerOptions, InputItem, Mode, ModuleRule};

/// The immutable build plan. Produced once by `normalize_options` and shared
/// (`Arc`) by every stage; nothing in the pipeline reads ambient state.
#[derive(Debug)]
pub struct NormalizedBundlerOptions {
  // --- Input
  pub input: Vec<InputItem>,
  pub cwd: PathBuf,
  pub mode: Mode,

  // --- Output
  pub dir: String,
  pub entry_filenames: String,
  pub chunk_filenames: String,
  pub css_entry_filenames: String,
  pub css_chunk_filenames: String,
  pub asset_filenames: String,

  // --- Module rules, in declared order
  pub rules: Vec<ModuleRule>,

  // --- Resolve
  pub resolve_extensions: Vec<String>,

  // --- Optimization
  pub treeshake: bool,

  // --- Cache
  pub cache: bool,
  pub cache_path: String,

  // --- Carried for external collaborators
  pub devtool: Option<String>,
  pub dev_server: Option<DevServerOptions>,
}

impl NormalizedBundlerOptions {
  pub fn out_dir(&self) -> PathBuf {
    self.cwd.join(&self.dir)
  }

  pub fn cache_file(&self) -> PathBuf {
    self.cwd.join(&self.cache_path)
  }
}
