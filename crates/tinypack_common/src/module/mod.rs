use arcstr::ArcStr;
use oxc_index::IndexVec;
use tinypack_utils::indexmap::FxIndexSet;

use crate::{ImportRecordIdx, ModuleId, ModuleIdx, ResolvedImportRecord};

/// A resolved, transformed module. Immutable once the scan stage finishes,
/// except for the analysis fields the link stage fills in.
#[derive(Debug)]
pub struct Module {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  /// Calculated from `id` to be stable across machines, used in output and
  /// diagnostics.
  pub stable_id: String,
  pub repr_name: String,
  pub exec_order: u32,
  pub is_user_defined_entry: bool,
  /// Conservative default is `true`; rules may mark a module side-effect
  /// free, which makes it a tree-shaking candidate.
  pub side_effects: bool,
  /// xxh3 of the raw source, the incremental-cache key component.
  pub source_hash: ArcStr,
  /// The module's contribution to its JS chunk.
  pub js_content: ArcStr,
  /// Present when a CssExtract transform ran.
  pub css_content: Option<ArcStr>,
  /// Present when an AssetFile transform ran.
  pub asset_view: Option<AssetView>,
  pub exported_names: FxIndexSet<String>,
  /// Filled by the link stage when treeshake is enabled.
  pub unused_exports: FxIndexSet<String>,
  /// Cleared by the link stage for dropped modules.
  pub included: bool,
  pub from_cache: bool,
  pub import_records: IndexVec<ImportRecordIdx, ResolvedImportRecord>,
}

impl Module {
  pub fn static_dependencies(&self) -> impl Iterator<Item = ModuleIdx> + '_ {
    self
      .import_records
      .iter()
      .filter(|record| !record.kind.is_dynamic())
      .map(|record| record.resolved_module)
  }

  pub fn is_included(&self) -> bool {
    self.included
  }
}

/// A media file copied to the output directory. The hashed public path is
/// known at transform time, since asset hashes depend only on the raw bytes.
#[derive(Debug)]
pub struct AssetView {
  pub bytes: Vec<u8>,
  pub filename: String,
}
