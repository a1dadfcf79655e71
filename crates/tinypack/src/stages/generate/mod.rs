mod code_splitting;
mod render_chunk_to_assets;

use tinypack_error::BuildResult;

use super::link::LinkStageOutput;
use crate::types::{bundle_output::BundleOutput, SharedOptions};

pub struct GenerateStage<'a> {
  link_output: &'a mut LinkStageOutput,
  options: &'a SharedOptions,
}

impl<'a> GenerateStage<'a> {
  pub fn new(link_output: &'a mut LinkStageOutput, options: &'a SharedOptions) -> Self {
    Self { link_output, options }
  }

  pub fn generate(&mut self) -> BuildResult<BundleOutput> {
    let mut chunk_graph = self.generate_chunks();
    self.name_chunks(&mut chunk_graph);
    self.render_chunk_to_assets(&chunk_graph)
  }
}
