use serde::Deserialize;

/// The slice of package.json the entry lookup cares about.
#[derive(Debug, Default, Deserialize)]
pub struct PackageJson {
  pub module: Option<String>,
  pub main: Option<String>,
}

impl PackageJson {
  /// ESM entry wins over the legacy one.
  pub fn entry(&self) -> Option<&str> {
    self.module.as_deref().or(self.main.as_deref())
  }
}
