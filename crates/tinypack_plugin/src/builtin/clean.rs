use crate::{HookArgs, HookRegistry, HookStage, Plugin, PluginName};

/// Removes the output directory right before emission, so stale hashed
/// filenames from earlier builds never linger.
#[derive(Debug, Default)]
pub struct CleanOutputPlugin;

impl Plugin for CleanOutputPlugin {
  fn name(&self) -> PluginName {
    "tinypack:clean-output".into()
  }

  fn apply(&self, registry: &mut HookRegistry) {
    registry.on(HookStage::BeforeEmit, |args| {
      if let HookArgs::BeforeEmit { options, fs, .. } = args {
        let out_dir = options.out_dir();
        if fs.is_dir(&out_dir) {
          fs.remove_dir_all(&out_dir)?;
        }
      }
      Ok(())
    });
  }
}
