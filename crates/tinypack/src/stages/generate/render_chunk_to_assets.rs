use std::{path::Path, sync::LazyLock};

use oxc_index::{index_vec, IndexVec};
use regex::Regex;
use sugar_path::SugarPath;
use tinypack_common::{
  AssetContent, ChunkIdx, FileNameRenderOptions, ImportKind, InstantiatedChunk, Module, ModuleIdx,
  OutputAsset,
};
use tinypack_error::BuildResult;
use tinypack_utils::{indexmap::FxIndexSet, xxhash::xxhash_hex};

use super::GenerateStage;
use crate::{
  graph::ChunkGraph,
  types::bundle_output::BundleOutput,
  utils::{scan_imports::static_import_specifier, unique_filenames::ensure_unique_filenames},
};

static CHUNK_REF_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"__TINYPACK_CHUNK_(\d+)__").unwrap());

fn chunk_placeholder(chunk_idx: ChunkIdx) -> String {
  format!("__TINYPACK_CHUNK_{}__", chunk_idx.raw())
}

/// Relative specifier from the directory of `from` to `to`, both given
/// relative to the output directory.
fn import_path(from: &str, to: &str) -> String {
  let from_dir = Path::new(from).parent().unwrap_or_else(|| Path::new(""));
  let rel = Path::new(to).relative(from_dir);
  let rel = rel.to_slash_lossy();
  if rel.starts_with('.') {
    rel.into_owned()
  } else {
    format!("./{rel}")
  }
}

impl GenerateStage<'_> {
  /// Renders every chunk into its output files and assigns final hashed
  /// filenames. Each file is hashed over its own content only, with
  /// cross-chunk references still in placeholder form; substituting them
  /// afterwards keeps a chunk's hash unaffected by its dependencies'
  /// filenames.
  pub fn render_chunk_to_assets(&mut self, chunk_graph: &ChunkGraph) -> BuildResult<BundleOutput> {
    let modules = &self.link_output.module_table.modules;
    let mut instantiated: Vec<InstantiatedChunk> = Vec::new();
    let mut js_filenames: IndexVec<ChunkIdx, Option<String>> =
      index_vec![None; chunk_graph.chunk_table.len()];

    for (chunk_idx, chunk) in chunk_graph.chunk_table.iter_enumerated() {
      let name = chunk.name.as_deref().unwrap_or("chunk");

      let mut imported_chunks: FxIndexSet<ChunkIdx> = FxIndexSet::default();
      let mut body = String::new();
      let mut css = String::new();

      for module_idx in &chunk.modules {
        let module = &modules[*module_idx];

        if let Some(view) = &module.asset_view {
          instantiated.push(InstantiatedChunk {
            content: AssetContent::Bytes(view.bytes.clone()),
            preliminary_filename: view.filename.clone(),
          });
        }

        if let Some(content) = &module.css_content {
          if !content.is_empty() {
            css.push_str(content);
            if !content.ends_with('\n') {
              css.push('\n');
            }
          }
        }

        if module.js_content.is_empty() {
          continue;
        }
        let rendered = render_module_js(module, chunk_idx, chunk_graph, &mut imported_chunks);
        if !rendered.trim().is_empty() {
          body.push_str(&format!("// {}\n", module.stable_id));
          body.push_str(&rendered);
          if !body.ends_with('\n') {
            body.push('\n');
          }
        }
      }

      let mut js = String::new();
      for target in &imported_chunks {
        js.push_str(&format!("import \"{}\";\n", chunk_placeholder(*target)));
      }
      js.push_str(&body);

      if !js.is_empty() || chunk.kind.is_entry() {
        let hash = xxhash_hex(js.as_bytes());
        let filename = chunk.filename_template(self.options).render(&FileNameRenderOptions {
          name: Some(name),
          hash: Some(&hash),
          ext: None,
        });
        js_filenames[chunk_idx] = Some(filename.clone());
        instantiated.push(InstantiatedChunk {
          content: AssetContent::Text(js),
          preliminary_filename: filename,
        });
      }

      if !css.is_empty() {
        let hash = xxhash_hex(css.as_bytes());
        let filename = chunk.css_filename_template(self.options).render(
          &FileNameRenderOptions { name: Some(name), hash: Some(&hash), ext: None },
        );
        instantiated.push(InstantiatedChunk {
          content: AssetContent::Text(css),
          preliminary_filename: filename,
        });
      }
    }

    let mut assets: Vec<OutputAsset> = instantiated
      .into_iter()
      .map(|mut chunk| {
        let substituted = match &chunk.content {
          AssetContent::Text(text) if CHUNK_REF_RE.is_match(text) => {
            let filename = &chunk.preliminary_filename;
            let replaced = CHUNK_REF_RE.replace_all(text, |caps: &regex::Captures| {
              let raw: u32 = caps[1].parse().unwrap_or_default();
              js_filenames[ChunkIdx::from_raw(raw)]
                .as_deref()
                .map_or_else(String::new, |target_filename| import_path(filename, target_filename))
            });
            Some(replaced.into_owned())
          }
          _ => None,
        };
        if let Some(text) = substituted {
          chunk.content = AssetContent::Text(text);
        }
        let filename = chunk.preliminary_filename.clone();
        chunk.finalize(filename)
      })
      .collect();

    assets.sort_by(|a, b| a.filename.cmp(&b.filename));
    ensure_unique_filenames(&mut assets)?;

    Ok(BundleOutput { assets, warnings: std::mem::take(&mut self.link_output.warnings) })
  }
}

/// Emits one module's contribution to its chunk's JS file. Import statements
/// resolved within the chunk disappear, imports of other chunks are hoisted
/// into a placeholder import, and dynamic `import(...)` call sites are
/// rewritten to the target chunk's placeholder.
fn render_module_js(
  module: &Module,
  chunk_idx: ChunkIdx,
  chunk_graph: &ChunkGraph,
  imported_chunks: &mut FxIndexSet<ChunkIdx>,
) -> String {
  let mut out = String::with_capacity(module.js_content.len());

  let target_chunk_of = |resolved_module: ModuleIdx| chunk_graph.module_to_chunk[resolved_module];

  for line in module.js_content.lines() {
    if let Some(specifier) = static_import_specifier(line) {
      let record = module
        .import_records
        .iter()
        .find(|record| !record.kind.is_dynamic() && record.specifier == specifier);
      match record {
        Some(record) => match target_chunk_of(record.resolved_module) {
          // Same chunk or tree-shaken importee; the statement just vanishes.
          Some(target) if target != chunk_idx => {
            imported_chunks.insert(target);
          }
          _ => {}
        },
        // Externals keep their original import statement.
        None => {
          out.push_str(line);
          out.push('\n');
        }
      }
    } else {
      out.push_str(line);
      out.push('\n');
    }
  }

  for record in &module.import_records {
    if record.kind != ImportKind::DynamicImport {
      continue;
    }
    let target = chunk_graph
      .entry_module_to_entry_chunk
      .get(&record.resolved_module)
      .copied()
      .or_else(|| target_chunk_of(record.resolved_module));
    if let Some(target) = target {
      let placeholder = chunk_placeholder(target);
      out = out
        .replace(&format!("import('{}')", record.specifier), &format!("import(\"{placeholder}\")"))
        .replace(
          &format!("import(\"{}\")", record.specifier),
          &format!("import(\"{placeholder}\")"),
        );
    }
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn import_path_is_relative_to_the_importer_dir() {
    assert_eq!(import_path("js/main.js", "js/other.js"), "./other.js");
    assert_eq!(import_path("main.js", "js/other.js"), "./js/other.js");
    assert_eq!(import_path("js/main.js", "shared.js"), "../shared.js");
  }
}
