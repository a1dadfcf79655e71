use std::sync::Arc;

use arcstr::ArcStr;
use tinypack_common::ResolvedId;
use tinypack_error::{BuildDiagnostic, BuildResult};
use tinypack_fs::SharedFileSystem;

use crate::{
  cache::BuildCache,
  cancel::CancelToken,
  module_loader::{ModuleLoader, ModuleLoaderOutput},
  types::{SharedOptions, SharedResolver},
  utils::resolve_id::resolve_id,
};

pub type ScanStageOutput = ModuleLoaderOutput;

pub struct ScanStage {
  fs: SharedFileSystem,
  options: SharedOptions,
  resolver: SharedResolver,
  cache: Arc<BuildCache>,
  cancel: CancelToken,
}

impl ScanStage {
  pub fn new(
    fs: SharedFileSystem,
    options: SharedOptions,
    resolver: SharedResolver,
    cache: Arc<BuildCache>,
    cancel: CancelToken,
  ) -> Self {
    Self { fs, options, resolver, cache, cancel }
  }

  pub async fn scan(&self) -> BuildResult<ScanStageOutput> {
    if self.options.input.is_empty() {
      return Err(
        BuildDiagnostic::config("\"input\" is required and must name at least one entry").into(),
      );
    }

    let user_entries = self.resolve_user_defined_entries()?;

    let module_loader = ModuleLoader::new(
      Arc::clone(&self.fs),
      Arc::clone(&self.options),
      Arc::clone(&self.resolver),
      Arc::clone(&self.cache),
      self.cancel.clone(),
    );
    let output = module_loader.fetch_all_modules(user_entries).await?;

    Ok(output)
  }

  /// Entry resolution failures are configuration errors, not build errors:
  /// the build has not started yet and the fix is in the options.
  fn resolve_user_defined_entries(&self) -> BuildResult<Vec<(Option<ArcStr>, ResolvedId)>> {
    let mut ret = Vec::with_capacity(self.options.input.len());
    let mut errors: Vec<anyhow::Error> = Vec::new();

    for input_item in &self.options.input {
      match resolve_id(&self.resolver, &input_item.import, None, true) {
        Ok(resolved) => {
          if resolved.is_external {
            errors.push(
              BuildDiagnostic::config(format!(
                "Entry {:?} cannot be external",
                input_item.import
              ))
              .into(),
            );
            continue;
          }
          ret.push((input_item.name.clone().map(ArcStr::from), resolved));
        }
        Err(errs) => {
          for err in errs.0 {
            errors.push(
              BuildDiagnostic::config(format!(
                "Could not resolve entry {:?}: {err}",
                input_item.import
              ))
              .into(),
            );
          }
        }
      }
    }

    if !errors.is_empty() {
      return Err(errors.into());
    }

    Ok(ret)
  }
}

#[cfg(test)]
mod tests {
  use tinypack_common::BundlerOptions;
  use tinypack_fs::MemoryFileSystem;
  use tinypack_resolver::Resolver;

  use super::*;
  use crate::utils::normalize_options::normalize_options;

  #[tokio::test]
  async fn cache_hits_skip_retransformation() {
    let fs: SharedFileSystem = Arc::new(MemoryFileSystem::new(&[
      ("/p/src/main.js", "import { v } from './util.js';\nconsole.log(v);\n"),
      ("/p/src/util.js", "export const v = 1;\n"),
    ]));
    let options: SharedOptions = Arc::new(normalize_options(BundlerOptions {
      input: Some(vec!["./src/main.js".into()]),
      cwd: Some("/p".into()),
      ..BundlerOptions::default()
    }));
    let resolver: SharedResolver = Arc::new(Resolver::new(
      options.resolve_extensions.clone(),
      options.cwd.clone(),
      Arc::clone(&fs),
    ));
    let stage = |cache: Arc<BuildCache>| {
      ScanStage::new(
        Arc::clone(&fs),
        Arc::clone(&options),
        Arc::clone(&resolver),
        cache,
        CancelToken::default(),
      )
    };

    let cold = stage(Arc::new(BuildCache::default())).scan().await.unwrap();
    assert!(cold.module_table.modules.iter().all(|module| !module.from_cache));

    // A matching source hash short-circuits transform and import scanning.
    let warm_cache = Arc::new(BuildCache::from_modules(cold.module_table.modules.iter()));
    let warm = stage(warm_cache).scan().await.unwrap();
    assert_eq!(warm.module_table.modules.len(), cold.module_table.modules.len());
    assert!(warm.module_table.modules.iter().all(|module| module.from_cache));
  }
}
