use crate::{AssetContent, OutputAsset};

/// `InstantiatedChunk`s are derived from `Chunk`s. One chunk can produce
/// several of them, e.g. a JS file plus an extracted CSS file.
#[derive(Debug)]
pub struct InstantiatedChunk {
  pub content: AssetContent,
  pub preliminary_filename: String,
}

impl InstantiatedChunk {
  pub fn finalize(self, filename: String) -> OutputAsset {
    OutputAsset { filename, content: self.content }
  }
}
