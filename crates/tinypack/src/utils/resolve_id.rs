use std::path::Path;

use tinypack_common::ResolvedId;
use tinypack_error::{BuildDiagnostic, BuildResult};
use tinypack_resolver::Resolver;

#[inline]
fn is_http_url(s: &str) -> bool {
  s.starts_with("http://") || s.starts_with("https://") || s.starts_with("//")
}

#[inline]
fn is_data_url(s: &str) -> bool {
  s.trim_start().starts_with("data:")
}

pub fn resolve_id(
  resolver: &Resolver,
  specifier: &str,
  importer: Option<&str>,
  is_user_defined_entry: bool,
) -> BuildResult<ResolvedId> {
  // Auto external http url or data url
  if is_http_url(specifier) || is_data_url(specifier) {
    return Ok(ResolvedId::external(specifier));
  }

  let resolved = resolver.resolve(importer.map(Path::new), specifier, is_user_defined_entry);

  match resolved {
    Ok(resolved) => Ok(ResolvedId::new(resolved.path)),
    Err(err) => {
      let importer = importer.unwrap_or("<entry>");
      Err(
        BuildDiagnostic::new(
          tinypack_error::ErrorKind::Resolution,
          format!("Could not resolve {specifier:?} imported by {importer:?}: {err}"),
        )
        .into(),
      )
    }
  }
}
