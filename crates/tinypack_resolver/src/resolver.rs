use std::{
  fmt,
  path::{Path, PathBuf},
};

use arcstr::ArcStr;
use dashmap::DashMap;
use sugar_path::SugarPath;
use tinypack_fs::SharedFileSystem;

use crate::package_json::PackageJson;

#[derive(Debug)]
pub struct Resolver {
  cwd: PathBuf,
  extensions: Vec<String>,
  fs: SharedFileSystem,
  // Keyed by (importer dir, specifier). Only hits are cached; misses are
  // cheap and watch builds may create the file in between.
  cache: DashMap<(ArcStr, ArcStr), ArcStr>,
}

#[derive(Debug)]
pub struct ResolveReturn {
  pub path: ArcStr,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveError {
  NotFound,
  PackageEntryMissing { package: String },
  InvalidPackageJson { path: String, detail: String },
}

impl fmt::Display for ResolveError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotFound => f.write_str("no matching file on disk"),
      Self::PackageEntryMissing { package } => {
        write!(f, "package {package:?} has no usable `module`/`main` entry")
      }
      Self::InvalidPackageJson { path, detail } => {
        write!(f, "malformed package.json at {path:?}: {detail}")
      }
    }
  }
}

impl Resolver {
  pub fn new(extensions: Vec<String>, cwd: PathBuf, fs: SharedFileSystem) -> Self {
    Self { cwd, extensions, fs, cache: DashMap::default() }
  }

  pub fn resolve(
    &self,
    importer: Option<&Path>,
    specifier: &str,
    is_user_defined_entry: bool,
  ) -> Result<ResolveReturn, ResolveError> {
    let dir = importer
      .and_then(Path::parent)
      .filter(|inner| inner.components().next().is_some())
      .unwrap_or(self.cwd.as_path());

    let cache_key = (ArcStr::from(dir.to_string_lossy()), ArcStr::from(specifier));
    if let Some(hit) = self.cache.get(&cache_key) {
      return Ok(ResolveReturn { path: hit.clone() });
    }

    let mut resolution = self.resolve_inner(dir, specifier);

    // Handle `{ input: 'main' }` -> `<CWD>/main.{js,...}` for bare entries.
    if resolution.is_err() && is_user_defined_entry {
      let is_specifier_path_like = specifier.starts_with('.') || specifier.starts_with('/');
      if !is_specifier_path_like {
        let normalized_specifier = self.cwd.join(specifier).normalize();
        if let Some(found) = self.load_as_file_or_directory(&normalized_specifier)? {
          resolution = Ok(found);
        }
      }
    }

    let path = resolution?;
    self.cache.insert(cache_key, path.clone());
    Ok(ResolveReturn { path })
  }

  fn resolve_inner(&self, dir: &Path, specifier: &str) -> Result<ArcStr, ResolveError> {
    if specifier.starts_with('.') || Path::new(specifier).is_absolute() {
      let target = if Path::new(specifier).is_absolute() {
        Path::new(specifier).normalize()
      } else {
        dir.join(specifier).normalize()
      };
      return self.load_as_file_or_directory(&target)?.ok_or(ResolveError::NotFound);
    }

    self.resolve_package(dir, specifier)
  }

  /// File lookup order: the exact path, extension inference, then directory
  /// resolution (package.json entry, `index.*` fallback).
  fn load_as_file_or_directory(&self, target: &Path) -> Result<Option<ArcStr>, ResolveError> {
    if self.fs.is_file(target) {
      return Ok(Some(path_to_id(target)));
    }

    for ext in &self.extensions {
      let with_ext = append_extension(target, ext);
      if self.fs.is_file(&with_ext) {
        return Ok(Some(path_to_id(&with_ext)));
      }
    }

    if self.fs.is_dir(target) {
      return self.load_directory(target);
    }

    Ok(None)
  }

  fn load_directory(&self, dir: &Path) -> Result<Option<ArcStr>, ResolveError> {
    let manifest = dir.join("package.json");
    if self.fs.is_file(&manifest) {
      if let Some(entry) = self.read_package_entry(&manifest)? {
        let target = dir.join(entry).normalize();
        // Package entries get the same inference; `"main": "./lib"` is common.
        if let Some(found) = self.load_as_file_or_directory(&target)? {
          return Ok(Some(found));
        }
      }
    }

    let index = dir.join("index");
    for ext in &self.extensions {
      let candidate = append_extension(&index, ext);
      if self.fs.is_file(&candidate) {
        return Ok(Some(path_to_id(&candidate)));
      }
    }

    Ok(None)
  }

  /// Walks `node_modules` directories from `dir` up to the filesystem root.
  fn resolve_package(&self, dir: &Path, specifier: &str) -> Result<ArcStr, ResolveError> {
    let mut current = Some(dir);
    while let Some(base) = current {
      let candidate = base.join("node_modules").join(specifier);
      if let Some(found) = self.load_as_file_or_directory(&candidate)? {
        return Ok(found);
      }
      if self.fs.is_dir(&base.join("node_modules").join(package_name(specifier))) {
        // The package exists but exposes nothing usable for this specifier.
        return Err(ResolveError::PackageEntryMissing { package: specifier.to_string() });
      }
      current = base.parent();
    }
    Err(ResolveError::NotFound)
  }

  fn read_package_entry(&self, manifest: &Path) -> Result<Option<String>, ResolveError> {
    let content = self.fs.read_to_string(manifest).map_err(|err| {
      ResolveError::InvalidPackageJson {
        path: manifest.to_string_lossy().into_owned(),
        detail: err.to_string(),
      }
    })?;
    let package_json: PackageJson =
      serde_json::from_str(&content).map_err(|err| ResolveError::InvalidPackageJson {
        path: manifest.to_string_lossy().into_owned(),
        detail: err.to_string(),
      })?;
    Ok(package_json.entry().map(ToString::to_string))
  }
}

fn package_name(specifier: &str) -> &str {
  if specifier.starts_with('@') {
    let mut parts = specifier.splitn(3, '/');
    let scope_len = parts.next().map_or(0, str::len);
    let name_len = parts.next().map_or(0, str::len);
    &specifier[..(scope_len + name_len + 1).min(specifier.len())]
  } else {
    specifier.split('/').next().unwrap_or(specifier)
  }
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
  let mut ret = path.as_os_str().to_os_string();
  ret.push(ext);
  PathBuf::from(ret)
}

fn path_to_id(path: &Path) -> ArcStr {
  ArcStr::from(path.to_string_lossy())
}
