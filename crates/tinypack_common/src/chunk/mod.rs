use arcstr::ArcStr;
use tinypack_utils::bitset::BitSet;

use crate::{ChunkKind, FilenameTemplate, ModuleIdx, NormalizedBundlerOptions};

#[derive(Debug, Default)]
pub struct Chunk {
  pub exec_order: u32,
  pub kind: ChunkKind,
  /// In first-discovery order; rendering joins module contents in this order.
  pub modules: Vec<ModuleIdx>,
  pub name: Option<ArcStr>,
  /// Which entry points can reach the modules of this chunk. Shared chunks
  /// are keyed by this bit pattern.
  pub bits: BitSet,
}

impl Chunk {
  pub fn new(name: Option<ArcStr>, bits: BitSet, modules: Vec<ModuleIdx>, kind: ChunkKind) -> Self {
    Self { exec_order: u32::MAX, modules, name, bits, kind }
  }

  pub fn filename_template(&self, options: &NormalizedBundlerOptions) -> FilenameTemplate {
    let ret = if self.kind.is_user_defined_entry() {
      options.entry_filenames.clone()
    } else {
      options.chunk_filenames.clone()
    };

    FilenameTemplate::new(ret)
  }

  pub fn css_filename_template(&self, options: &NormalizedBundlerOptions) -> FilenameTemplate {
    let ret = if self.kind.is_user_defined_entry() {
      options.css_entry_filenames.clone()
    } else {
      options.css_chunk_filenames.clone()
    };

    FilenameTemplate::new(ret)
  }
}
