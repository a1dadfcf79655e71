use std::{
  io,
  path::{Path, PathBuf},
};

use dashmap::{DashMap, DashSet};
use sugar_path::SugarPath;

use crate::FileSystem;

/// In-memory filesystem for tests. Paths are normalized on every access so
/// `/a/./b` and `/a/b` refer to the same entry.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
  files: DashMap<PathBuf, Vec<u8>>,
  dirs: DashSet<PathBuf>,
}

impl MemoryFileSystem {
  /// ```ignore
  /// MemoryFileSystem::new(&[("/src/index.js", "import './util.js'")])
  /// ```
  pub fn new(files: &[(&str, &str)]) -> Self {
    let fs = Self::default();
    for (path, content) in files {
      fs.add_file(Path::new(path), content);
    }
    fs
  }

  pub fn add_file(&self, path: &Path, content: &str) {
    let path = path.normalize();
    let mut dir = path.parent();
    while let Some(parent) = dir {
      self.dirs.insert(parent.to_path_buf());
      dir = parent.parent();
    }
    self.files.insert(path, content.as_bytes().to_vec());
  }

}

fn not_found(path: &Path) -> io::Error {
  io::Error::new(io::ErrorKind::NotFound, format!("No such file: {}", path.display()))
}

impl FileSystem for MemoryFileSystem {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    let path = path.normalize();
    self.files.get(&path).map(|content| content.clone()).ok_or_else(|| not_found(&path))
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let content = self.read(path)?;
    String::from_utf8(content)
      .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "Non UTF-8 content"))
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    let path = path.normalize();
    if path.parent().is_some_and(|parent| !self.is_dir(parent)) {
      return Err(not_found(&path));
    }
    self.files.insert(path, content.to_vec());
    Ok(())
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    let path = path.normalize();
    let mut dir = Some(path.as_path());
    while let Some(current) = dir {
      self.dirs.insert(current.to_path_buf());
      dir = current.parent();
    }
    Ok(())
  }

  fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
    let path = path.normalize();
    self.files.retain(|file, _| !file.starts_with(&path));
    self.dirs.retain(|dir| !dir.starts_with(&path));
    Ok(())
  }

  fn remove_file(&self, path: &Path) -> io::Result<()> {
    let path = path.normalize();
    self.files.remove(&path).map(|_| ()).ok_or_else(|| not_found(&path))
  }

  fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
    let from = from.normalize();
    let content = self.files.remove(&from).ok_or_else(|| not_found(&from))?.1;
    self.files.insert(to.normalize(), content);
    Ok(())
  }

  fn is_file(&self, path: &Path) -> bool {
    self.files.contains_key(&path.normalize())
  }

  fn is_dir(&self, path: &Path) -> bool {
    self.dirs.contains(&path.normalize())
  }
}

#[test]
fn test_memory_file_system() {
  let fs = MemoryFileSystem::new(&[("/src/index.js", "let a = 1;")]);
  assert!(fs.is_file(Path::new("/src/index.js")));
  assert!(fs.is_dir(Path::new("/src")));
  assert!(!fs.is_file(Path::new("/src/missing.js")));

  fs.create_dir_all(Path::new("/dist")).unwrap();
  fs.write(Path::new("/dist/out.js.tmp"), b"content").unwrap();
  fs.rename(Path::new("/dist/out.js.tmp"), Path::new("/dist/out.js")).unwrap();
  assert_eq!(fs.read_to_string(Path::new("/dist/out.js")).unwrap(), "content");

  fs.remove_dir_all(Path::new("/dist")).unwrap();
  assert!(!fs.is_file(Path::new("/dist/out.js")));
}
