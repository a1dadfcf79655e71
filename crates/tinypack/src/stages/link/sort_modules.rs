use oxc_index::{index_vec, IndexVec};
use tinypack_common::ModuleIdx;

use super::LinkStage;

#[derive(Clone, Copy)]
enum Status {
  ToBeExecuted(ModuleIdx),
  WaitForExit(ModuleIdx),
}

impl LinkStage<'_> {
  /// Assigns `exec_order` with a post-order depth-first walk from the entry
  /// points, in entry order, following import records in source order. The
  /// result only depends on the graph shape, never on the arbitrary order in
  /// which the loader tasks finished. Cycles are tolerated; a back edge
  /// simply does not revisit the module.
  pub fn sort_modules(&mut self) {
    let modules = &mut self.module_table.modules;
    let mut visited: IndexVec<ModuleIdx, bool> = index_vec![false; modules.len()];
    let mut next_exec_order: u32 = 0;

    let mut stack: Vec<Status> = self
      .entry_points
      .iter()
      .map(|entry| Status::ToBeExecuted(entry.idx))
      .rev()
      .collect();

    while let Some(status) = stack.pop() {
      match status {
        Status::ToBeExecuted(idx) => {
          if visited[idx] {
            continue;
          }
          visited[idx] = true;
          stack.push(Status::WaitForExit(idx));
          // Pushed in reverse so the first record is visited first.
          let deps: Vec<ModuleIdx> =
            modules[idx].import_records.iter().map(|record| record.resolved_module).collect();
          stack.extend(deps.into_iter().rev().map(Status::ToBeExecuted));
        }
        Status::WaitForExit(idx) => {
          modules[idx].exec_order = next_exec_order;
          next_exec_order += 1;
        }
      }
    }
  }
}
