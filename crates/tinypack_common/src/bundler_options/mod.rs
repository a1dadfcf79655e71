pub mod dev_server;
pub mod filename_template;
pub mod input_item;
pub mod mode;
pub mod module_rule;
pub mod normalized_bundler_options;

use std::path::PathBuf;

use serde::Deserialize;

use crate::{DevServerOptions, InputItem, Mode, ModuleRule};

/// Raw user configuration. Every field is optional; `normalize_options`
/// fills in the defaults and rejects invalid combinations.
///
/// Deserializable so the CLI can read the same shape from a JSON config file.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundlerOptions {
  // --- Input
  pub input: Option<Vec<InputItem>>,
  pub cwd: Option<PathBuf>,
  pub mode: Option<Mode>,

  // --- Output
  pub dir: Option<String>,
  pub entry_filenames: Option<String>,
  pub chunk_filenames: Option<String>,
  pub css_entry_filenames: Option<String>,
  pub css_chunk_filenames: Option<String>,
  pub asset_filenames: Option<String>,

  // --- Module rules
  pub rules: Option<Vec<ModuleRule>>,

  // --- Resolve
  pub resolve_extensions: Option<Vec<String>>,

  // --- Optimization
  pub treeshake: Option<bool>,

  // --- Cache
  pub cache: Option<bool>,
  pub cache_path: Option<String>,

  // --- Carried for external collaborators, unused by the core
  pub devtool: Option<String>,
  pub dev_server: Option<DevServerOptions>,
}
