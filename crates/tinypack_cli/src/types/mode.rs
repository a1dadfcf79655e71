use clap::ValueEnum;

#[derive(PartialEq, Eq, Clone, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum Mode {
  Development,
  Production,
}

impl From<Mode> for tinypack::Mode {
  fn from(value: Mode) -> Self {
    match value {
      Mode::Development => tinypack::Mode::Development,
      Mode::Production => tinypack::Mode::Production,
    }
  }
}
