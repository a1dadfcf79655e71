use std::path::PathBuf;

use clap::Args;

use crate::types::mode::Mode;

#[derive(Args)]
pub struct InputArgs {
  #[clap(long)]
  pub cwd: Option<PathBuf>,

  #[clap(long, action = clap::ArgAction::Append)]
  pub input: Option<Vec<PathBuf>>,

  /// JSON options file; command line flags win over it.
  #[clap(long, short = 'c')]
  pub config: Option<PathBuf>,

  #[clap(long, short = 'm')]
  pub mode: Option<Mode>,
}

#[derive(Args)]
pub struct OutputArgs {
  #[clap(long, short = 'd')]
  pub dir: Option<String>,

  #[clap(long)]
  pub entry_filenames: Option<String>,

  #[clap(long)]
  pub chunk_filenames: Option<String>,

  #[clap(long)]
  pub asset_filenames: Option<String>,

  #[clap(long)]
  pub css_entry_filenames: Option<String>,

  #[clap(long)]
  pub css_chunk_filenames: Option<String>,
}

#[derive(Args)]
pub struct EnhanceArgs {
  #[clap(long)]
  pub treeshake: Option<bool>,

  #[clap(long)]
  pub cache: Option<bool>,

  #[clap(long)]
  pub silent: bool,
}
