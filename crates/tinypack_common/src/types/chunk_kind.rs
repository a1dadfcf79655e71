use crate::ModuleIdx;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChunkKind {
  EntryPoint { is_user_defined: bool, module: ModuleIdx },
  /// Holds modules reachable from more than one entry.
  #[default]
  Common,
}

impl ChunkKind {
  pub fn is_entry(&self) -> bool {
    matches!(self, Self::EntryPoint { .. })
  }

  pub fn is_user_defined_entry(&self) -> bool {
    matches!(self, Self::EntryPoint { is_user_defined: true, .. })
  }
}
