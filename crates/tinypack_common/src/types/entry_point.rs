use arcstr::ArcStr;

use crate::ModuleIdx;

#[derive(Debug, Clone)]
pub struct EntryPoint {
  pub idx: ModuleIdx,
  pub name: Option<ArcStr>,
  pub kind: EntryPointKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPointKind {
  UserDefined,
  /// A `import(...)` split point discovered during the graph build.
  DynamicImport,
}
