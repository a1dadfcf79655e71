mod module_task;
mod task_context;

use std::sync::Arc;

use arcstr::ArcStr;
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;
use tinypack_common::{
  EntryPoint, EntryPointKind, ImportRecordIdx, Module, ModuleIdx, ModuleLoaderMsg, ModuleTable,
  ResolvedId, ResolvedImportRecord,
};
use tinypack_error::{BuildDiagnostic, BuildResult};
use tinypack_fs::SharedFileSystem;
use tokio::sync::mpsc::{channel, Receiver, Sender};

use self::{module_task::ModuleTask, task_context::TaskContext};
use crate::{
  cache::BuildCache,
  cancel::CancelToken,
  types::{SharedOptions, SharedResolver},
};

pub struct ModuleLoaderOutput {
  pub module_table: ModuleTable,
  pub entry_points: Vec<EntryPoint>,
  pub warnings: Vec<anyhow::Error>,
}

/// Spawns one task per discovered module and collects the results into a
/// module table. Task completion order is arbitrary; deterministic ordering is
/// reconstructed later from `exec_order`.
pub struct ModuleLoader {
  rx: Receiver<ModuleLoaderMsg>,
  shared_context: Arc<TaskContext>,
  remaining: u32,
  visited: FxHashMap<ArcStr, ModuleIdx>,
  intermediate_modules: IndexVec<ModuleIdx, Option<Module>>,
}

impl ModuleLoader {
  pub fn new(
    fs: SharedFileSystem,
    options: SharedOptions,
    resolver: SharedResolver,
    cache: Arc<BuildCache>,
    cancel: CancelToken,
  ) -> Self {
    let (tx, rx): (Sender<ModuleLoaderMsg>, Receiver<ModuleLoaderMsg>) = channel(1024);

    let shared_context =
      Arc::new(TaskContext { fs, resolver, options, tx, cache, cancel });

    Self {
      rx,
      shared_context,
      remaining: 0,
      visited: FxHashMap::default(),
      intermediate_modules: IndexVec::new(),
    }
  }

  fn try_spawn_new_task(
    &mut self,
    resolved_id: ResolvedId,
    owner: Option<ArcStr>,
    is_user_defined_entry: bool,
  ) -> ModuleIdx {
    match self.visited.entry(resolved_id.id.clone()) {
      std::collections::hash_map::Entry::Occupied(visited) => *visited.get(),
      std::collections::hash_map::Entry::Vacant(not_visited) => {
        let idx = self.intermediate_modules.push(None);
        not_visited.insert(idx);
        self.remaining += 1;
        let task =
          ModuleTask::new(Arc::clone(&self.shared_context), idx, resolved_id, owner, is_user_defined_entry);
        tokio::spawn(task.run());
        idx
      }
    }
  }

  pub async fn fetch_all_modules(
    mut self,
    user_defined_entries: Vec<(Option<ArcStr>, ResolvedId)>,
  ) -> BuildResult<ModuleLoaderOutput> {
    let mut errors: Vec<anyhow::Error> = Vec::new();
    let mut warnings: Vec<anyhow::Error> = Vec::new();

    let mut entry_points: Vec<EntryPoint> = user_defined_entries
      .into_iter()
      .map(|(name, resolved_id)| EntryPoint {
        idx: self.try_spawn_new_task(resolved_id, None, true),
        name,
        kind: EntryPointKind::UserDefined,
      })
      .collect();

    let mut dynamic_entry_modules: Vec<ModuleIdx> = Vec::new();

    while self.remaining > 0 {
      if self.shared_context.cancel.is_cancelled() {
        errors.push(BuildDiagnostic::cancelled().into());
        break;
      }
      let Some(msg) = self.rx.recv().await else { break };
      match msg {
        ModuleLoaderMsg::NormalModuleDone(result) => {
          self.remaining -= 1;
          let mut module = result.module;
          let importer_id: ArcStr = module.id.inner().clone();

          let mut import_records: IndexVec<ImportRecordIdx, ResolvedImportRecord> =
            IndexVec::with_capacity(result.raw_import_records.len());
          for (raw, resolved) in
            result.raw_import_records.into_iter().zip(result.resolved_deps)
          {
            if resolved.is_external {
              // External ids stay out of the graph; the import statement is
              // left in the rendered output untouched.
              tracing::trace!(specifier = raw.specifier.as_str(), "keeping import external");
              continue;
            }
            let dep_idx =
              self.try_spawn_new_task(resolved, Some(importer_id.clone()), false);
            if raw.kind.is_dynamic() {
              dynamic_entry_modules.push(dep_idx);
            }
            import_records.push(ResolvedImportRecord::from_raw(raw, dep_idx));
          }
          module.import_records = import_records;
          self.intermediate_modules[result.idx] = Some(module);
          warnings.extend(result.warnings);
        }
        ModuleLoaderMsg::BuildErrors(errs) => {
          self.remaining -= 1;
          errors.extend(errs);
        }
      }
    }

    if !errors.is_empty() {
      return Err(errors.into());
    }

    let modules: IndexVec<ModuleIdx, Module> = self
      .intermediate_modules
      .into_iter()
      .map(|module| module.expect("all module tasks should have completed"))
      .collect();

    // Dynamic split points become their own entries, unless the module is
    // already a user-defined entry. Sorted by stable id so entry numbering
    // does not depend on task completion order.
    dynamic_entry_modules.sort_by(|a, b| modules[*a].stable_id.cmp(&modules[*b].stable_id));
    dynamic_entry_modules.dedup();
    for idx in dynamic_entry_modules {
      let already_entry =
        entry_points.iter().any(|entry| entry.idx == idx);
      if !already_entry {
        entry_points.push(EntryPoint { idx, name: None, kind: EntryPointKind::DynamicImport });
      }
    }

    Ok(ModuleLoaderOutput {
      module_table: ModuleTable { modules },
      entry_points,
      warnings,
    })
  }
}
