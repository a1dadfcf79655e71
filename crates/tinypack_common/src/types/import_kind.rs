#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
  /// Static `import ... from` or `export ... from`.
  Import,
  /// `import(...)`, creates an async split point.
  DynamicImport,
  /// CommonJS `require(...)`.
  Require,
}

impl ImportKind {
  pub fn is_dynamic(self) -> bool {
    matches!(self, Self::DynamicImport)
  }
}
