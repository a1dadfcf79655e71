use tinypack_common::{ModuleRule, NormalizedBundlerOptions, TransformKind};

/// Turns raw user options into the immutable build plan. Pure: the same raw
/// options always normalize to the same plan, nothing is read from the
/// environment except the fallback cwd.
pub fn normalize_options(mut raw_options: crate::BundlerOptions) -> NormalizedBundlerOptions {
  let mode = raw_options.mode.unwrap_or_default();

  let rules = std::mem::take(&mut raw_options.rules).unwrap_or_else(default_rules);

  NormalizedBundlerOptions {
    input: raw_options.input.unwrap_or_default(),
    cwd: raw_options
      .cwd
      .unwrap_or_else(|| std::env::current_dir().expect("Failed to get current dir")),
    mode,
    dir: raw_options.dir.unwrap_or_else(|| "dist".to_string()),
    entry_filenames: raw_options.entry_filenames.unwrap_or_else(|| "[name].js".to_string()),
    chunk_filenames: raw_options.chunk_filenames.unwrap_or_else(|| "[name]-[hash].js".to_string()),
    css_entry_filenames: raw_options
      .css_entry_filenames
      .unwrap_or_else(|| "[name].css".to_string()),
    css_chunk_filenames: raw_options
      .css_chunk_filenames
      .unwrap_or_else(|| "[name]-[hash].css".to_string()),
    asset_filenames: raw_options
      .asset_filenames
      .unwrap_or_else(|| "[hash:10][ext]".to_string()),
    rules,
    resolve_extensions: raw_options.resolve_extensions.unwrap_or_else(|| {
      vec![".js".to_string(), ".mjs".to_string(), ".cjs".to_string(), ".json".to_string(), ".css".to_string()]
    }),
    // Tree-shaking needs static module structure and is only worth the
    // analysis in production; an explicit flag still wins either way.
    treeshake: raw_options.treeshake.unwrap_or(mode.is_production()),
    cache: raw_options.cache.unwrap_or(true),
    cache_path: raw_options.cache_path.unwrap_or_else(|| ".tinypack/cache.json".to_string()),
    devtool: raw_options.devtool,
    dev_server: raw_options.dev_server,
  }
}

fn default_rules() -> Vec<ModuleRule> {
  vec![
    ModuleRule::with_extensions(&[".js", ".mjs", ".cjs"], vec![TransformKind::Identity]),
    ModuleRule::with_extensions(&[".css"], vec![TransformKind::CssExtract]),
    ModuleRule::with_extensions(&[".json"], vec![TransformKind::JsonModule]),
    ModuleRule::with_extensions(
      &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".ttf", ".woff", ".woff2", ".eot"],
      vec![TransformKind::AssetFile { out_dir: "assets".to_string() }],
    ),
  ]
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use tinypack_common::{BundlerOptions, Mode};

  use super::*;

  fn raw() -> BundlerOptions {
    BundlerOptions {
      input: Some(vec!["./src/index.js".into()]),
      cwd: Some(PathBuf::from("/project")),
      mode: Some(Mode::Production),
      ..BundlerOptions::default()
    }
  }

  #[test]
  fn normalizing_twice_yields_identical_plans() {
    let first = normalize_options(raw());
    let second = normalize_options(raw());
    assert_eq!(format!("{first:?}"), format!("{second:?}"));
  }

  #[test]
  fn production_enables_treeshake_by_default() {
    assert!(normalize_options(raw()).treeshake);

    let development = BundlerOptions { mode: Some(Mode::Development), ..raw() };
    assert!(!normalize_options(development).treeshake);

    let overridden = BundlerOptions { treeshake: Some(false), ..raw() };
    assert!(!normalize_options(overridden).treeshake);
  }
}
