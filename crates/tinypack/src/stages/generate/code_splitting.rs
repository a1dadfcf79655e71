use arcstr::ArcStr;
use oxc_index::{index_vec, IndexVec};
use rustc_hash::FxHashMap;
use tinypack_common::{Chunk, ChunkIdx, ChunkKind, EntryPointKind, ModuleIdx};
use tinypack_utils::{bitset::BitSet, sanitize_file_name::sanitize_file_name};

use super::GenerateStage;
use crate::graph::ChunkGraph;

impl GenerateStage<'_> {
  /// Partitions included modules into chunks. Every module is tagged with the
  /// set of entry points that can reach it through static imports; modules
  /// reachable from exactly one entry land in that entry's chunk, any other
  /// distinct bit pattern becomes one shared chunk.
  pub fn generate_chunks(&self) -> ChunkGraph {
    let modules = &self.link_output.module_table.modules;
    let entry_points = &self.link_output.entry_points;
    let entry_count = u32::try_from(entry_points.len()).unwrap_or(u32::MAX);

    let mut module_bits: IndexVec<ModuleIdx, BitSet> =
      index_vec![BitSet::new(entry_count); modules.len()];

    for (i, entry) in entry_points.iter().enumerate() {
      let bit = u32::try_from(i).unwrap_or_default();
      let mut stack = vec![entry.idx];
      while let Some(idx) = stack.pop() {
        if module_bits[idx].has_bit(bit) {
          continue;
        }
        module_bits[idx].set_bit(bit);
        let module = &modules[idx];
        // A tree-shaken module neither joins a chunk nor pulls in its deps.
        if module.is_included() {
          stack.extend(module.static_dependencies());
        }
      }
    }

    let mut chunk_graph = ChunkGraph::new(modules);
    let mut bits_to_chunk: FxHashMap<BitSet, ChunkIdx> =
      FxHashMap::with_capacity_and_hasher(entry_points.len(), Default::default());

    for (i, entry) in entry_points.iter().enumerate() {
      let mut bits = BitSet::new(entry_count);
      bits.set_bit(u32::try_from(i).unwrap_or_default());
      let name: Option<ArcStr> = entry
        .name
        .clone()
        .or_else(|| Some(sanitize_file_name(&modules[entry.idx].repr_name).into()));
      let chunk = Chunk::new(
        name,
        bits.clone(),
        Vec::new(),
        ChunkKind::EntryPoint {
          is_user_defined: entry.kind == EntryPointKind::UserDefined,
          module: entry.idx,
        },
      );
      let chunk_idx = chunk_graph.add_chunk(chunk);
      bits_to_chunk.insert(bits, chunk_idx);
      chunk_graph.entry_module_to_entry_chunk.insert(entry.idx, chunk_idx);
    }

    // Walking in execution order keeps each chunk's module list sorted and
    // makes shared-chunk numbering independent of loader timing.
    let mut sorted_modules: Vec<ModuleIdx> = modules
      .iter()
      .filter(|module| module.is_included() && module.exec_order != u32::MAX)
      .map(|module| module.idx)
      .collect();
    sorted_modules.sort_by_key(|idx| modules[*idx].exec_order);

    for idx in sorted_modules {
      let bits = &module_bits[idx];
      if bits.is_empty() {
        continue;
      }
      let chunk_idx = match bits_to_chunk.get(bits) {
        Some(chunk_idx) => *chunk_idx,
        None => {
          let chunk_idx =
            chunk_graph.add_chunk(Chunk::new(None, bits.clone(), Vec::new(), ChunkKind::Common));
          bits_to_chunk.insert(bits.clone(), chunk_idx);
          chunk_idx
        }
      };
      chunk_graph.add_module_to_chunk(idx, chunk_idx);
    }

    for chunk in &mut chunk_graph.chunk_table {
      chunk.exec_order =
        chunk.modules.first().map_or(u32::MAX, |idx| modules[*idx].exec_order);
    }

    chunk_graph
  }

  /// Gives every chunk a unique name. Entry chunks keep their user-supplied
  /// or file-derived name; shared chunks are numbered in creation order.
  pub fn name_chunks(&self, chunk_graph: &mut ChunkGraph) {
    let mut used_names: FxHashMap<String, u32> = FxHashMap::default();
    let mut shared_count: u32 = 0;

    for chunk in &mut chunk_graph.chunk_table {
      let base = match &chunk.name {
        Some(name) => name.to_string(),
        None => {
          shared_count += 1;
          if shared_count == 1 { "shared".to_string() } else { format!("shared{shared_count}") }
        }
      };
      let occurrences = used_names.entry(base.clone()).or_insert(0);
      *occurrences += 1;
      let unique =
        if *occurrences == 1 { base } else { format!("{base}{occurrence}", occurrence = *occurrences) };
      chunk.name = Some(unique.into());
    }
  }
}
