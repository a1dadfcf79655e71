use tinypack_common::OutputAsset;

#[derive(Debug)]
pub struct BundleOutput {
  pub assets: Vec<OutputAsset>,
  pub warnings: Vec<anyhow::Error>,
}
