use std::sync::{
  atomic::{AtomicU32, Ordering},
  Arc, Mutex,
};

use arcstr::ArcStr;
use tinypack_error::{BuildDiagnostic, BuildResult};

use crate::{plugin::HookRegistry, HookArgs, HookStage, SharedPlugin};

pub type SharedPluginDriver = Arc<PluginDriver>;

/// Invokes registered hooks strictly in registration order per stage.
/// `stage` only ever advances; a callback that triggers an earlier stage
/// (directly or through a helper it calls) fails with PluginOrderError.
pub struct PluginDriver {
  registry: HookRegistry,
  stage: AtomicU32,
  running: Mutex<Option<ArcStr>>,
}

impl PluginDriver {
  pub fn new(plugins: &[SharedPlugin]) -> Self {
    let mut registry = HookRegistry::default();
    for plugin in plugins {
      registry.registering = ArcStr::from(plugin.name().as_ref());
      plugin.apply(&mut registry);
    }
    registry.registering = ArcStr::default();

    Self { registry, stage: AtomicU32::new(0), running: Mutex::new(None) }
  }

  pub fn into_shared(self) -> SharedPluginDriver {
    Arc::new(self)
  }

  /// Resets the stage counter for a fresh build of the same driver.
  pub fn reset(&self) {
    self.stage.store(0, Ordering::SeqCst);
  }

  pub fn call(&self, mut args: HookArgs) -> BuildResult<()> {
    let stage = args.stage();
    let ordinal = stage.ordinal();
    let previous = self.stage.fetch_max(ordinal, Ordering::SeqCst);
    if ordinal < previous {
      let running = self
        .running
        .lock()
        .ok()
        .and_then(|name| name.clone())
        .map_or_else(|| "unknown".to_string(), |name| name.to_string());
      let from = stage_name_by_ordinal(previous);
      return Err(BuildDiagnostic::plugin_order(&running, from, stage.name()).into());
    }

    for registered in &self.registry.hooks[ordinal as usize] {
      tracing::trace!(plugin = %registered.plugin, hook = stage.name(), "running hook");
      if let Ok(mut running) = self.running.lock() {
        *running = Some(registered.plugin.clone());
      }
      let ret = (registered.hook)(&mut args);
      if let Ok(mut running) = self.running.lock() {
        *running = None;
      }
      ret.map_err(|err| {
        err.context(format!("Plugin {:?} failed in hook {:?}", registered.plugin, stage.name()))
      })?;
    }

    Ok(())
  }
}

fn stage_name_by_ordinal(ordinal: u32) -> &'static str {
  match ordinal {
    0 => HookStage::BeforeGraph.name(),
    1 => HookStage::AfterGraph.name(),
    2 => HookStage::BeforeEmit.name(),
    _ => HookStage::AfterEmit.name(),
  }
}

#[cfg(test)]
mod tests {
  use tinypack_error::ErrorKind;

  use super::*;
  use crate::{HookRegistry, Plugin, PluginName};

  #[derive(Debug)]
  struct NoopPlugin;

  impl Plugin for NoopPlugin {
    fn name(&self) -> PluginName {
      "noop".into()
    }

    fn apply(&self, registry: &mut HookRegistry) {
      registry.on(HookStage::AfterEmit, |_args| Ok(()));
    }
  }

  fn dummy_options() -> tinypack_common::NormalizedBundlerOptions {
    tinypack_common::NormalizedBundlerOptions {
      input: vec![],
      cwd: std::path::PathBuf::from("/"),
      mode: tinypack_common::Mode::Development,
      dir: "dist".to_string(),
      entry_filenames: "[name].js".to_string(),
      chunk_filenames: "[name]-[hash].js".to_string(),
      css_entry_filenames: "[name].css".to_string(),
      css_chunk_filenames: "[name]-[hash].css".to_string(),
      asset_filenames: "assets/[hash][ext]".to_string(),
      rules: vec![],
      resolve_extensions: vec![],
      treeshake: false,
      cache: false,
      cache_path: String::new(),
      devtool: None,
      dev_server: None,
    }
  }

  #[test]
  fn hook_stage_must_advance() {
    let driver = PluginDriver::new(&[Arc::new(NoopPlugin)]);
    let options = dummy_options();

    driver
      .call(HookArgs::AfterGraph { options: &options, module_count: 0, entry_count: 0 })
      .unwrap();

    // Re-entering an earlier stage is a programming error.
    let assets = &[];
    let err = driver.call(HookArgs::AfterEmit { options: &options, assets }).err();
    assert!(err.is_none());

    let err = driver
      .call(HookArgs::AfterGraph { options: &options, module_count: 0, entry_count: 0 })
      .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::PluginOrder));
  }
}
