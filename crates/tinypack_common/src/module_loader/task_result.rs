use oxc_index::IndexVec;

use crate::{ImportRecordIdx, Module, ModuleIdx, RawImportRecord, ResolvedId};

/// Sent over the loader channel when a module task finishes. `module` still
/// has empty import records; the loader turns `resolved_deps` into module
/// indices (spawning new tasks for unseen ids) and fills them in.
pub struct NormalModuleTaskResult {
  pub idx: ModuleIdx,
  pub module: Module,
  pub raw_import_records: IndexVec<ImportRecordIdx, RawImportRecord>,
  pub resolved_deps: IndexVec<ImportRecordIdx, ResolvedId>,
  pub warnings: Vec<anyhow::Error>,
}
