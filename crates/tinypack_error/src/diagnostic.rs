use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed or missing required configuration. Aborts before any build work.
  Config,
  /// An import specifier could not be resolved to a file.
  Resolution,
  /// A rule's transform step failed for a module.
  Transform,
  /// A plugin attempted to re-enter an earlier hook stage.
  PluginOrder,
  /// Two emitted files ended up with the same filename but different content.
  HashCollision,
  /// The build was cancelled cooperatively, e.g. by a newer watch build.
  Cancelled,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Config => "ConfigError",
      Self::Resolution => "ResolutionError",
      Self::Transform => "TransformError",
      Self::PluginOrder => "PluginOrderError",
      Self::HashCollision => "HashCollisionError",
      Self::Cancelled => "BuildCancelled",
    };
    f.write_str(name)
  }
}

/// A typed build failure. Stored inside `anyhow::Error` so callers can
/// `downcast_ref::<BuildDiagnostic>()` and branch on the kind.
#[derive(Debug)]
pub struct BuildDiagnostic {
  kind: ErrorKind,
  message: String,
}

impl BuildDiagnostic {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self { kind, message: message.into() }
  }

  pub fn config(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Config, message)
  }

  pub fn resolution(specifier: &str, importer: &str) -> Self {
    Self::new(
      ErrorKind::Resolution,
      format!("Could not resolve {specifier:?} imported by {importer:?}"),
    )
  }

  pub fn transform(id: &str, detail: impl fmt::Display) -> Self {
    Self::new(ErrorKind::Transform, format!("Failed to transform {id:?}: {detail}"))
  }

  pub fn plugin_order(plugin: &str, from: &str, to: &str) -> Self {
    Self::new(
      ErrorKind::PluginOrder,
      format!("Plugin {plugin:?} illegally re-entered hook {to:?} from {from:?}"),
    )
  }

  pub fn hash_collision(filename: &str) -> Self {
    Self::new(
      ErrorKind::HashCollision,
      format!("Two chunks with different content were assigned the filename {filename:?}"),
    )
  }

  pub fn cancelled() -> Self {
    Self::new(ErrorKind::Cancelled, "Build was cancelled")
  }

  pub fn kind(&self) -> ErrorKind {
    self.kind
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

impl fmt::Display for BuildDiagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.kind, self.message)
  }
}

impl std::error::Error for BuildDiagnostic {}

#[test]
fn test_downcast_kind() {
  let err: anyhow::Error = BuildDiagnostic::resolution("./missing", "/src/index.js").into();
  let diagnostic = err.downcast_ref::<BuildDiagnostic>().unwrap();
  assert_eq!(diagnostic.kind(), ErrorKind::Resolution);
  assert!(diagnostic.message().contains("./missing"));
  assert!(diagnostic.message().contains("/src/index.js"));
}
