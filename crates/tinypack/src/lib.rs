mod bundler;
mod cache;
mod cancel;
mod graph;
mod module_loader;
mod stages;
mod tracing_init;
mod types;
mod utils;

pub use crate::{
  bundler::Bundler,
  cancel::CancelToken,
  types::bundle_output::BundleOutput,
};
pub use tinypack_common::*;
pub use tinypack_error::{BuildDiagnostic, BuildError, BuildResult, ErrorKind};
pub use tinypack_plugin::{
  CleanOutputPlugin, HookArgs, HookRegistry, HookStage, HtmlPlugin, Plugin, PluginName,
  SharedPlugin,
};
