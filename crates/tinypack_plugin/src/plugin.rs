use std::{borrow::Cow, fmt::Debug, sync::Arc};

use arcstr::ArcStr;

use crate::{HookArgs, HookStage};

pub type PluginName = Cow<'static, str>;
pub type SharedPlugin = Arc<dyn Plugin>;

pub type HookFn = Box<dyn Fn(&mut HookArgs) -> anyhow::Result<()> + Send + Sync>;

/// The sole contract between the core and the plugin ecosystem: a plugin is
/// anything that can register callbacks against named hook stages.
pub trait Plugin: Debug + Send + Sync {
  fn name(&self) -> PluginName;

  fn apply(&self, registry: &mut HookRegistry);
}

pub(crate) struct RegisteredHook {
  pub plugin: ArcStr,
  pub hook: HookFn,
}

/// Callback storage, one ordered list per stage. Registration order is
/// invocation order; plugins rely on it for ordering dependencies.
#[derive(Default)]
pub struct HookRegistry {
  pub(crate) hooks: [Vec<RegisteredHook>; 4],
  pub(crate) registering: ArcStr,
}

impl HookRegistry {
  pub fn on(
    &mut self,
    stage: HookStage,
    hook: impl Fn(&mut HookArgs) -> anyhow::Result<()> + Send + Sync + 'static,
  ) {
    self.hooks[stage.ordinal() as usize]
      .push(RegisteredHook { plugin: self.registering.clone(), hook: Box::new(hook) });
  }
}
