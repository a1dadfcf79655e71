use rustc_hash::FxHashSet;
use tinypack_common::ModuleIdx;

use super::LinkStage;

impl LinkStage<'_> {
  /// Drops modules whose removal is provably unobservable: not an entry, no
  /// side effects, and every export unused. Runs after the used-export
  /// analysis, so `unused_exports` is already final.
  pub fn tree_shake(&mut self) {
    if !self.options.treeshake {
      return;
    }

    let entry_modules: FxHashSet<ModuleIdx> =
      self.entry_points.iter().map(|entry| entry.idx).collect();

    for module in &mut self.module_table.modules {
      if entry_modules.contains(&module.idx) || module.side_effects {
        continue;
      }
      let all_exports_unused = !module.exported_names.is_empty()
        && module.unused_exports.len() == module.exported_names.len();
      if all_exports_unused {
        tracing::debug!(module = module.stable_id.as_str(), "dropped by tree-shaking");
        module.included = false;
      }
    }
  }
}
