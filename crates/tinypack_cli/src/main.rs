mod args;
mod types;

use std::time::Instant;

use ansi_term::Colour;
use args::{EnhanceArgs, InputArgs, OutputArgs};
use clap::Parser;

use tinypack::{Bundler, BundlerOptions, OutputAsset};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  input: InputArgs,

  #[clap(flatten)]
  output: OutputArgs,

  #[clap(flatten)]
  enhance: EnhanceArgs,
}

fn print_output_assets(outputs: Vec<OutputAsset>) {
  let mut left = 0;
  let mut right = 0;

  let mut assets = Vec::with_capacity(outputs.len());

  for output in outputs {
    let size = format!("{:.2}", output.content.len() as f64 / 1024.0);

    if size.len() > right {
      right = size.len();
    }

    if output.filename.len() > left {
      left = output.filename.len();
    }

    assets.push((output.filename, size));
  }

  let dim = Colour::White.dimmed();
  let color = Colour::Cyan;

  for (filename, size) in assets {
    let filename_len = filename.len();

    println!(
      "{}{}{:left$} {}{:right$}{} kB",
      dim.paint("<DIR>/"),
      color.paint(filename),
      "",
      dim.paint("size: "),
      "",
      size,
      left = left - filename_len,
      right = right - size.len()
    );
  }
}

fn load_options(args: &Commands) -> Result<BundlerOptions, String> {
  let mut options: BundlerOptions = match &args.input.config {
    Some(path) => {
      let content = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read config {}: {err}", path.display()))?;
      serde_json::from_str(&content)
        .map_err(|err| format!("Failed to parse config {}: {err}", path.display()))?
    }
    None => BundlerOptions::default(),
  };

  if let Some(input) = &args.input.input {
    options.input = Some(input.iter().map(|p| p.to_string_lossy().into()).collect());
  }
  if let Some(cwd) = &args.input.cwd {
    options.cwd = Some(cwd.clone());
  }
  if let Some(mode) = args.input.mode.clone() {
    options.mode = Some(mode.into());
  }
  if args.output.dir.is_some() {
    options.dir.clone_from(&args.output.dir);
  }
  if args.output.entry_filenames.is_some() {
    options.entry_filenames.clone_from(&args.output.entry_filenames);
  }
  if args.output.chunk_filenames.is_some() {
    options.chunk_filenames.clone_from(&args.output.chunk_filenames);
  }
  if args.output.asset_filenames.is_some() {
    options.asset_filenames.clone_from(&args.output.asset_filenames);
  }
  if args.output.css_entry_filenames.is_some() {
    options.css_entry_filenames.clone_from(&args.output.css_entry_filenames);
  }
  if args.output.css_chunk_filenames.is_some() {
    options.css_chunk_filenames.clone_from(&args.output.css_chunk_filenames);
  }
  if args.enhance.treeshake.is_some() {
    options.treeshake = args.enhance.treeshake;
  }
  if args.enhance.cache.is_some() {
    options.cache = args.enhance.cache;
  }

  Ok(options)
}

#[tokio::main]
async fn main() {
  let args = Commands::parse();

  let options = match load_options(&args) {
    Ok(options) => options,
    Err(message) => {
      eprintln!("{} {message}", Colour::Red.paint("Error:"));
      return;
    }
  };

  let mut bundler = Bundler::new(options);

  let start = Instant::now();
  match bundler.write().await {
    Ok(output) => {
      if !args.enhance.silent {
        for warning in output.warnings {
          eprintln!("{} {warning}", Colour::Yellow.paint("Warning:"));
        }

        if !output.assets.is_empty() {
          print_output_assets(output.assets);
        }
      }

      let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
      println!(
        "\n{} Finished in {}",
        Colour::Green.paint("✔"),
        Colour::White.bold().paint(elapsed)
      );
    }
    Err(errors) => {
      for error in &*errors {
        eprintln!("{} {error}", Colour::Red.paint("Error:"));
      }
    }
  }
}
