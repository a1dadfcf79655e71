use arcstr::ArcStr;

use crate::{ImportKind, ModuleIdx};

/// Produced by the import scanner before the importee has an index.
/// `imported_names` feeds the unused-export analysis; a namespace import is
/// recorded as `*` and marks every export of the importee as used.
#[derive(Debug, Clone)]
pub struct RawImportRecord {
  pub specifier: ArcStr,
  pub kind: ImportKind,
  pub imported_names: Vec<String>,
}

impl RawImportRecord {
  pub fn new(specifier: impl Into<ArcStr>, kind: ImportKind) -> Self {
    Self { specifier: specifier.into(), kind, imported_names: Vec::new() }
  }

  pub fn with_names(mut self, imported_names: Vec<String>) -> Self {
    self.imported_names = imported_names;
    self
  }
}

#[derive(Debug, Clone)]
pub struct ResolvedImportRecord {
  pub specifier: ArcStr,
  pub kind: ImportKind,
  pub resolved_module: ModuleIdx,
  pub imported_names: Vec<String>,
}

impl ResolvedImportRecord {
  pub fn from_raw(raw: RawImportRecord, resolved_module: ModuleIdx) -> Self {
    Self {
      specifier: raw.specifier,
      kind: raw.kind,
      resolved_module,
      imported_names: raw.imported_names,
    }
  }

  pub fn imports_namespace(&self) -> bool {
    self.imported_names.iter().any(|name| name == "*")
  }
}
