use std::sync::Arc;

use tinypack_common::BundlerOptions;
use tinypack_error::{BuildDiagnostic, BuildResult};
use tinypack_fs::{OsFileSystem, SharedFileSystem};
use tinypack_plugin::{HookArgs, PluginDriver, SharedPlugin, SharedPluginDriver};
use tinypack_resolver::Resolver;

use crate::{
  cache::BuildCache,
  cancel::CancelToken,
  stages::{
    emit::EmitStage,
    generate::GenerateStage,
    link::LinkStage,
    scan::ScanStage,
  },
  tracing_init,
  types::{bundle_output::BundleOutput, SharedOptions, SharedResolver},
  utils::{normalize_options::normalize_options, unique_filenames::ensure_unique_filenames},
};

pub struct Bundler {
  pub closed: bool,
  pub(crate) fs: SharedFileSystem,
  pub(crate) options: SharedOptions,
  pub(crate) resolver: SharedResolver,
  pub(crate) plugin_driver: SharedPluginDriver,
  pub(crate) cancel: CancelToken,
}

impl Bundler {
  pub fn new(options: BundlerOptions) -> Self {
    Self::with_plugins(options, Vec::new())
  }

  pub fn with_plugins(options: BundlerOptions, plugins: Vec<SharedPlugin>) -> Self {
    Self::with_fs(options, plugins, Arc::new(OsFileSystem))
  }

  /// Entry point for tests running against an in-memory filesystem.
  pub fn with_fs(
    options: BundlerOptions,
    plugins: Vec<SharedPlugin>,
    fs: SharedFileSystem,
  ) -> Self {
    tracing_init::init();

    let options = Arc::new(normalize_options(options));
    let resolver: SharedResolver = Arc::new(Resolver::new(
      options.resolve_extensions.clone(),
      options.cwd.clone(),
      Arc::clone(&fs),
    ));
    let plugin_driver = PluginDriver::new(&plugins).into_shared();

    Self { closed: false, fs, options, resolver, plugin_driver, cancel: CancelToken::default() }
  }

  pub fn options(&self) -> &SharedOptions {
    &self.options
  }

  /// Token for cooperative cancellation, e.g. from a watch loop that wants
  /// to supersede an in-flight build.
  pub fn cancel_token(&self) -> CancelToken {
    self.cancel.clone()
  }

  /// Runs the full pipeline without touching the output directory.
  pub async fn generate(&mut self) -> BuildResult<BundleOutput> {
    self.build(false).await
  }

  /// Runs the full pipeline and writes the assets out.
  pub async fn write(&mut self) -> BuildResult<BundleOutput> {
    self.build(true).await
  }

  async fn build(&mut self, is_write: bool) -> BuildResult<BundleOutput> {
    if self.closed {
      return Err(
        BuildDiagnostic::config("Bundler is closed and cannot start another build").into(),
      );
    }
    self.cancel.reset();
    self.plugin_driver.reset();

    self
      .plugin_driver
      .call(HookArgs::BeforeGraph { options: &self.options, fs: self.fs.as_ref() })?;

    let cache = Arc::new(if self.options.cache {
      BuildCache::load(&self.fs, &self.options.cache_file())
    } else {
      BuildCache::default()
    });

    let scan_stage = ScanStage::new(
      Arc::clone(&self.fs),
      Arc::clone(&self.options),
      Arc::clone(&self.resolver),
      cache,
      self.cancel.clone(),
    );
    let scan_stage_output = scan_stage.scan().await?;

    if self.cancel.is_cancelled() {
      return Err(BuildDiagnostic::cancelled().into());
    }

    self.plugin_driver.call(HookArgs::AfterGraph {
      options: &self.options,
      module_count: scan_stage_output.module_table.modules.len(),
      entry_count: scan_stage_output.entry_points.len(),
    })?;

    let mut link_stage_output = LinkStage::new(scan_stage_output, &self.options).link();

    let mut output = GenerateStage::new(&mut link_stage_output, &self.options).generate()?;

    self.plugin_driver.call(HookArgs::BeforeEmit {
      options: &self.options,
      fs: self.fs.as_ref(),
      assets: &mut output.assets,
    })?;

    // Plugins may have added or renamed assets; no two writers may target
    // the same output path.
    ensure_unique_filenames(&mut output.assets)?;

    if is_write {
      if self.cancel.is_cancelled() {
        return Err(BuildDiagnostic::cancelled().into());
      }
      EmitStage::new(Arc::clone(&self.fs), Arc::clone(&self.options)).emit(&output.assets)?;

      if self.options.cache {
        let cache =
          BuildCache::from_modules(link_stage_output.module_table.modules.iter());
        if let Err(err) = BuildCache::save(&self.fs, &self.options.cache_file(), &cache) {
          tracing::warn!("Failed to persist build cache: {err}");
        }
      }
    }

    self
      .plugin_driver
      .call(HookArgs::AfterEmit { options: &self.options, assets: &output.assets })?;

    Ok(output)
  }

  pub fn close(&mut self) {
    self.closed = true;
  }
}
