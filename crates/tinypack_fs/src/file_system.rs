use std::{fmt::Debug, io, path::Path, sync::Arc};

/// Object-safe filesystem surface shared by the resolver, the module loader
/// and the emitter. `rename` must be atomic for paths on the same device,
/// since the emitter relies on write-to-temp-then-rename.
pub trait FileSystem: Debug + Send + Sync {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

  fn read_to_string(&self, path: &Path) -> io::Result<String>;

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

  fn create_dir_all(&self, path: &Path) -> io::Result<()>;

  fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

  fn remove_file(&self, path: &Path) -> io::Result<()>;

  fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

  fn is_file(&self, path: &Path) -> bool;

  fn is_dir(&self, path: &Path) -> bool;
}

pub type SharedFileSystem = Arc<dyn FileSystem>;
