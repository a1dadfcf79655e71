use tinypack_common::{NormalizedBundlerOptions, OutputAsset};
use tinypack_fs::FileSystem;

/// Lifecycle hook points, in pipeline order. The driver only ever advances
/// through these; re-entering an earlier stage is a plugin programming error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HookStage {
  BeforeGraph,
  AfterGraph,
  BeforeEmit,
  AfterEmit,
}

impl HookStage {
  pub fn ordinal(self) -> u32 {
    match self {
      Self::BeforeGraph => 0,
      Self::AfterGraph => 1,
      Self::BeforeEmit => 2,
      Self::AfterEmit => 3,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Self::BeforeGraph => "beforeGraph",
      Self::AfterGraph => "afterGraph",
      Self::BeforeEmit => "beforeEmit",
      Self::AfterEmit => "afterEmit",
    }
  }
}

/// Payload handed to hook callbacks. `BeforeEmit` is the mutation point:
/// plugins may add, rewrite or drop pending assets there.
pub enum HookArgs<'a> {
  BeforeGraph {
    options: &'a NormalizedBundlerOptions,
    fs: &'a dyn FileSystem,
  },
  AfterGraph {
    options: &'a NormalizedBundlerOptions,
    module_count: usize,
    entry_count: usize,
  },
  BeforeEmit {
    options: &'a NormalizedBundlerOptions,
    fs: &'a dyn FileSystem,
    assets: &'a mut Vec<OutputAsset>,
  },
  AfterEmit {
    options: &'a NormalizedBundlerOptions,
    assets: &'a [OutputAsset],
  },
}

impl HookArgs<'_> {
  pub fn stage(&self) -> HookStage {
    match self {
      Self::BeforeGraph { .. } => HookStage::BeforeGraph,
      Self::AfterGraph { .. } => HookStage::AfterGraph,
      Self::BeforeEmit { .. } => HookStage::BeforeEmit,
      Self::AfterEmit { .. } => HookStage::AfterEmit,
    }
  }
}
