use serde::Deserialize;

/// Build mode. Never read from ambient process state; it lives on the build
/// plan and is threaded through every component explicitly.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  #[default]
  Development,
  Production,
}

impl Mode {
  pub fn is_production(self) -> bool {
    matches!(self, Self::Production)
  }
}

impl std::str::FromStr for Mode {
  type Err = String;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "development" => Ok(Self::Development),
      "production" => Ok(Self::Production),
      _ => Err(format!("Unknown mode: {value:?}, expected `development` or `production`")),
    }
  }
}
