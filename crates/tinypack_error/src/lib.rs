mod diagnostic;

use std::ops::{Deref, DerefMut};

pub use crate::diagnostic::{BuildDiagnostic, ErrorKind};

#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  /// Kind of the first diagnostic, if the error chain carries one.
  pub fn kind(&self) -> Option<ErrorKind> {
    self.0.iter().find_map(|err| err.downcast_ref::<BuildDiagnostic>().map(BuildDiagnostic::kind))
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl From<BuildDiagnostic> for BuildError {
  fn from(diagnostic: BuildDiagnostic) -> Self {
    Self(vec![diagnostic.into()])
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;
