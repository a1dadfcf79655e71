mod sort_modules;
mod tree_shake;
mod used_exports;

use tinypack_common::{EntryPoint, ModuleTable};

use super::scan::ScanStageOutput;
use crate::types::SharedOptions;

#[derive(Debug)]
pub struct LinkStageOutput {
  pub module_table: ModuleTable,
  pub entry_points: Vec<EntryPoint>,
  pub warnings: Vec<anyhow::Error>,
}

/// Turns the unordered scan result into a deterministic module graph:
/// execution order, export usage, and the included flags tree-shaking
/// derives from them.
pub struct LinkStage<'a> {
  pub module_table: ModuleTable,
  pub entry_points: Vec<EntryPoint>,
  pub warnings: Vec<anyhow::Error>,
  pub options: &'a SharedOptions,
}

impl<'a> LinkStage<'a> {
  pub fn new(scan_stage_output: ScanStageOutput, options: &'a SharedOptions) -> Self {
    Self {
      module_table: scan_stage_output.module_table,
      entry_points: scan_stage_output.entry_points,
      warnings: scan_stage_output.warnings,
      options,
    }
  }

  pub fn link(mut self) -> LinkStageOutput {
    self.sort_modules();
    self.analyze_used_exports();
    self.tree_shake();

    LinkStageOutput {
      module_table: self.module_table,
      entry_points: self.entry_points,
      warnings: self.warnings,
    }
  }
}
