use std::path::Path;

use oxc_index::IndexVec;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tinypack_common::{ImportKind, ImportRecordIdx, Module, RawImportRecord};
use tinypack_fs::SharedFileSystem;

/// Persisted incremental-build cache, keyed by module id. A module whose
/// source hash still matches skips its transform and import scan on the next
/// build; dependencies are re-resolved from the stored raw specifiers so
/// on-disk renames stay correct.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BuildCache {
  pub modules: FxHashMap<String, CachedModule>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CachedModule {
  pub source_hash: String,
  pub js_content: String,
  pub css_content: Option<String>,
  pub exported_names: Vec<String>,
  pub side_effects: bool,
  pub imports: Vec<CachedImport>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CachedImport {
  pub specifier: String,
  pub kind: CachedImportKind,
  pub imported_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachedImportKind {
  Import,
  DynamicImport,
  Require,
}

impl From<ImportKind> for CachedImportKind {
  fn from(kind: ImportKind) -> Self {
    match kind {
      ImportKind::Import => Self::Import,
      ImportKind::DynamicImport => Self::DynamicImport,
      ImportKind::Require => Self::Require,
    }
  }
}

impl From<CachedImportKind> for ImportKind {
  fn from(kind: CachedImportKind) -> Self {
    match kind {
      CachedImportKind::Import => Self::Import,
      CachedImportKind::DynamicImport => Self::DynamicImport,
      CachedImportKind::Require => Self::Require,
    }
  }
}

impl BuildCache {
  /// A read failure is never fatal; the affected modules just go through the
  /// full transform again.
  pub fn load(fs: &SharedFileSystem, path: &Path) -> Self {
    if !fs.is_file(path) {
      return Self::default();
    }
    match fs.read_to_string(path).map_err(anyhow::Error::from).and_then(|content| {
      serde_json::from_str::<Self>(&content).map_err(anyhow::Error::from)
    }) {
      Ok(cache) => cache,
      Err(err) => {
        tracing::warn!("Discarding unreadable build cache at {}: {err}", path.display());
        Self::default()
      }
    }
  }

  pub fn save(fs: &SharedFileSystem, path: &Path, cache: &Self) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
      fs.create_dir_all(parent)?;
    }
    let content = serde_json::to_string(cache)?;
    fs.write(path, content.as_bytes())?;
    Ok(())
  }

  /// Looks up a module by id and source hash.
  pub fn get(&self, id: &str, source_hash: &str) -> Option<&CachedModule> {
    self.modules.get(id).filter(|cached| cached.source_hash == source_hash)
  }

  /// Rebuilds the cache content from a finished module table. Asset modules
  /// are skipped; copying bytes is as cheap as caching them.
  pub fn from_modules<'a>(modules: impl Iterator<Item = &'a Module>) -> Self {
    let mut ret = Self::default();
    for module in modules {
      if module.asset_view.is_some() {
        continue;
      }
      ret.modules.insert(
        module.id.to_string(),
        CachedModule {
          source_hash: module.source_hash.to_string(),
          js_content: module.js_content.to_string(),
          css_content: module.css_content.as_ref().map(ToString::to_string),
          exported_names: module.exported_names.iter().cloned().collect(),
          side_effects: module.side_effects,
          imports: module
            .import_records
            .iter()
            .map(|record| CachedImport {
              specifier: record.specifier.to_string(),
              kind: record.kind.into(),
              imported_names: record.imported_names.clone(),
            })
            .collect(),
        },
      );
    }
    ret
  }
}

impl CachedModule {
  pub fn to_raw_import_records(&self) -> IndexVec<ImportRecordIdx, RawImportRecord> {
    self
      .imports
      .iter()
      .map(|import| {
        RawImportRecord::new(import.specifier.as_str(), import.kind.into())
          .with_names(import.imported_names.clone())
      })
      .collect()
  }
}
