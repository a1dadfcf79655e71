mod bundler_options;
mod chunk;
mod module;
mod module_loader;
mod types;

pub use bundler_options::{
  dev_server::DevServerOptions,
  filename_template::{FileNameRenderOptions, FilenameTemplate},
  input_item::InputItem,
  mode::Mode,
  module_rule::{ModuleRule, RuleTest, TransformKind},
  normalized_bundler_options::NormalizedBundlerOptions,
  BundlerOptions,
};

pub use crate::{
  chunk::Chunk,
  module::{AssetView, Module},
  module_loader::{task_result::NormalModuleTaskResult, ModuleLoaderMsg},
  types::{
    asset_content::AssetContent,
    chunk_kind::ChunkKind,
    entry_point::{EntryPoint, EntryPointKind},
    import_kind::ImportKind,
    import_record::{RawImportRecord, ResolvedImportRecord},
    instantiated_chunk::InstantiatedChunk,
    module_id::ModuleId,
    module_table::{IndexModules, ModuleTable},
    output_asset::OutputAsset,
    raw_idx::{ChunkIdx, ImportRecordIdx, ModuleIdx},
    resolved_id::ResolvedId,
  },
};
