use std::sync::Arc;

use tinypack_common::ModuleLoaderMsg;
use tinypack_fs::SharedFileSystem;
use tokio::sync::mpsc::Sender;

use crate::{
  cache::BuildCache,
  cancel::CancelToken,
  types::{SharedOptions, SharedResolver},
};

/// Shared by every module task of one build.
pub struct TaskContext {
  pub fs: SharedFileSystem,
  pub resolver: SharedResolver,
  pub options: SharedOptions,
  pub tx: Sender<ModuleLoaderMsg>,
  pub cache: Arc<BuildCache>,
  pub cancel: CancelToken,
}
