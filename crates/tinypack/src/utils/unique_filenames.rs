use rustc_hash::FxHashMap;
use tinypack_common::OutputAsset;
use tinypack_error::{BuildDiagnostic, BuildResult};

/// Deduplicates assets that are byte-identical under the same filename (the
/// same media file imported from several modules) and rejects the rest: a
/// filename claimed twice with different content means a content-hash
/// collision or a misconfigured template.
pub fn ensure_unique_filenames(assets: &mut Vec<OutputAsset>) -> BuildResult<()> {
  let mut seen: FxHashMap<String, Vec<u8>> = FxHashMap::default();
  let mut errors: Vec<anyhow::Error> = Vec::new();

  assets.retain(|asset| match seen.get(asset.filename()) {
    Some(content) => {
      if content != asset.content_as_bytes() {
        errors.push(BuildDiagnostic::hash_collision(asset.filename()).into());
      }
      false
    }
    None => {
      seen.insert(asset.filename.clone(), asset.content_as_bytes().to_vec());
      true
    }
  });

  if errors.is_empty() {
    Ok(())
  } else {
    Err(errors.into())
  }
}

#[cfg(test)]
mod tests {
  use tinypack_common::AssetContent;

  use super::*;

  fn asset(filename: &str, content: &str) -> OutputAsset {
    OutputAsset { filename: filename.to_string(), content: AssetContent::Text(content.to_string()) }
  }

  #[test]
  fn identical_duplicates_are_merged() {
    let mut assets = vec![asset("a.js", "x"), asset("a.js", "x"), asset("b.js", "y")];
    ensure_unique_filenames(&mut assets).unwrap();
    assert_eq!(assets.len(), 2);
  }

  #[test]
  fn conflicting_duplicates_are_an_error() {
    let mut assets = vec![asset("a.js", "x"), asset("a.js", "y")];
    let err = ensure_unique_filenames(&mut assets).unwrap_err();
    assert_eq!(err.kind(), Some(tinypack_error::ErrorKind::HashCollision));
  }
}
