use std::{path::Path, sync::Arc};

use arcstr::ArcStr;
use oxc_index::IndexVec;
use tinypack_common::{
  ImportRecordIdx, Module, ModuleId, ModuleIdx, ModuleLoaderMsg, NormalModuleTaskResult,
  ResolvedId,
};
use tinypack_error::{BuildDiagnostic, BuildResult};
use tinypack_utils::{indexmap::FxIndexSet, path_ext::PathExt, xxhash::xxhash_hex};

use super::task_context::TaskContext;
use crate::utils::{
  apply_rules::{apply_transforms, matched_transforms, TransformOutput},
  resolve_id::resolve_id,
  scan_imports::{scan_exports, scan_imports},
};

/// Loads, transforms and scans one module, then reports back over the loader
/// channel. Tasks run concurrently; everything order-sensitive is deferred to
/// the link stage.
pub struct ModuleTask {
  ctx: Arc<TaskContext>,
  idx: ModuleIdx,
  resolved_id: ResolvedId,
  /// Stable id of the importer, for load diagnostics. `None` for entries.
  owner: Option<ArcStr>,
  is_user_defined_entry: bool,
}

impl ModuleTask {
  pub fn new(
    ctx: Arc<TaskContext>,
    idx: ModuleIdx,
    resolved_id: ResolvedId,
    owner: Option<ArcStr>,
    is_user_defined_entry: bool,
  ) -> Self {
    Self { ctx, idx, resolved_id, owner, is_user_defined_entry }
  }

  pub async fn run(self) {
    let msg = match self.run_inner() {
      Ok(result) => ModuleLoaderMsg::NormalModuleDone(result),
      Err(errs) => ModuleLoaderMsg::BuildErrors(errs.0),
    };
    // The loader may have stopped listening after a failure elsewhere.
    let _ = self.ctx.tx.send(msg).await;
  }

  fn run_inner(&self) -> BuildResult<NormalModuleTaskResult> {
    if self.ctx.cancel.is_cancelled() {
      return Err(BuildDiagnostic::cancelled().into());
    }

    let id = self.resolved_id.id.clone();
    let path = Path::new(id.as_str());

    let source = self.ctx.fs.read(path).map_err(|err| {
      let importer = self.owner.as_deref().unwrap_or("<entry>");
      anyhow::Error::from(BuildDiagnostic::new(
        tinypack_error::ErrorKind::Resolution,
        format!("Could not load {id:?} imported by {importer:?}: {err}"),
      ))
    })?;
    let source_hash = xxhash_hex(&source);

    tracing::debug!(module = id.as_str(), "loading module");

    let cached = self
      .ctx
      .options
      .cache
      .then(|| self.ctx.cache.get(&id, &source_hash))
      .flatten();

    let (output, raw_import_records, exported_names, side_effects, from_cache) = match cached {
      Some(cached) => {
        tracing::debug!(module = id.as_str(), "cache hit, skipping transform and scan");
        let output = TransformOutput {
          js_content: cached.js_content.clone(),
          css_content: cached.css_content.clone(),
          asset_view: None,
        };
        let exported_names: FxIndexSet<String> = cached.exported_names.iter().cloned().collect();
        (output, cached.to_raw_import_records(), exported_names, cached.side_effects, true)
      }
      None => {
        let transforms = matched_transforms(&self.ctx.options.rules, &id);
        let output =
          apply_transforms(&id, &source, &transforms, &self.ctx.options.asset_filenames)
            .map_err(anyhow::Error::from)?;
        let raw_import_records = scan_imports(&output.js_content);
        let exported_names: FxIndexSet<String> =
          scan_exports(&output.js_content).into_iter().collect();
        // A module without exports is assumed to run for its effects; css and
        // asset modules always count as effectful.
        let side_effects = exported_names.is_empty()
          || output.css_content.is_some()
          || output.asset_view.is_some();
        (output, raw_import_records, exported_names, side_effects, false)
      }
    };

    let mut resolved_deps: IndexVec<ImportRecordIdx, ResolvedId> =
      IndexVec::with_capacity(raw_import_records.len());
    let mut errors: Vec<anyhow::Error> = Vec::new();
    for record in &raw_import_records {
      match resolve_id(&self.ctx.resolver, &record.specifier, Some(&id), false) {
        Ok(resolved) => {
          resolved_deps.push(resolved);
        }
        Err(errs) => errors.extend(errs.0),
      }
    }
    if !errors.is_empty() {
      return Err(errors.into());
    }

    let module_id = ModuleId::new(id.clone());
    let stable_id = module_id.stabilize(&self.ctx.options.cwd);
    let repr_name = path.representative_file_name().into_owned();

    let module = Module {
      idx: self.idx,
      id: module_id,
      stable_id,
      repr_name,
      exec_order: u32::MAX,
      is_user_defined_entry: self.is_user_defined_entry,
      side_effects,
      source_hash: source_hash.into(),
      js_content: output.js_content.into(),
      css_content: output.css_content.map(ArcStr::from),
      asset_view: output.asset_view,
      exported_names,
      unused_exports: FxIndexSet::default(),
      included: true,
      from_cache,
      import_records: IndexVec::default(),
    };

    Ok(NormalModuleTaskResult {
      idx: self.idx,
      module,
      raw_import_records,
      resolved_deps,
      warnings: Vec::new(),
    })
  }
}
