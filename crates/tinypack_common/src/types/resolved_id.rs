use arcstr::ArcStr;

/// Outcome of resolving an import specifier to a concrete file.
#[derive(Debug, Clone)]
pub struct ResolvedId {
  pub id: ArcStr,
  /// External ids (http/data URLs) are kept out of the module graph.
  pub is_external: bool,
}

impl ResolvedId {
  pub fn new(id: impl Into<ArcStr>) -> Self {
    Self { id: id.into(), is_external: false }
  }

  pub fn external(id: impl Into<ArcStr>) -> Self {
    Self { id: id.into(), is_external: true }
  }
}
