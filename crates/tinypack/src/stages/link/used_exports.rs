use oxc_index::{index_vec, IndexVec};
use rustc_hash::FxHashSet;
use tinypack_common::{ImportKind, ModuleIdx};

use super::LinkStage;

#[derive(Default, Clone)]
struct UsedExports {
  all: bool,
  names: FxHashSet<String>,
}

impl LinkStage<'_> {
  /// Computes `unused_exports` for every module by walking the imported
  /// names recorded at each import site. A namespace import, a `require`,
  /// or a re-export-all in the module itself makes the usage unknowable,
  /// so those cases conservatively mark everything as used.
  pub fn analyze_used_exports(&mut self) {
    let modules = &mut self.module_table.modules;
    let mut used: IndexVec<ModuleIdx, UsedExports> =
      index_vec![UsedExports::default(); modules.len()];

    for entry in &self.entry_points {
      used[entry.idx].all = true;
    }

    for module in modules.iter() {
      for record in &module.import_records {
        let importee = &mut used[record.resolved_module];
        if record.imports_namespace() || record.kind == ImportKind::Require {
          importee.all = true;
        } else {
          importee.names.extend(record.imported_names.iter().cloned());
        }
      }
    }

    for (idx, module) in modules.iter_mut_enumerated() {
      let used = &used[idx];
      if used.all || module.exported_names.contains("*") {
        continue;
      }
      module.unused_exports = module
        .exported_names
        .iter()
        .filter(|name| !used.names.contains(*name))
        .cloned()
        .collect();
    }
  }
}
