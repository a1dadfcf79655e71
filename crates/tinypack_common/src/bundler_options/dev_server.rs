use serde::Deserialize;

/// Options for the external dev-server collaborator. The core only carries
/// them on the build plan; serving and hot updates happen out of process.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DevServerOptions {
  pub port: u16,
  pub host: String,
  pub open: bool,
  pub hot: bool,
  pub compress: bool,
}

impl Default for DevServerOptions {
  fn default() -> Self {
    Self { port: 3000, host: "localhost".to_string(), open: false, hot: false, compress: false }
  }
}
