mod builtin;
mod hook;
mod plugin;
mod plugin_driver;

pub use crate::{
  builtin::{clean::CleanOutputPlugin, html::HtmlPlugin},
  hook::{HookArgs, HookStage},
  plugin::{HookFn, HookRegistry, Plugin, PluginName, SharedPlugin},
  plugin_driver::{PluginDriver, SharedPluginDriver},
};
