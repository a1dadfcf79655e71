use std::path::Path;

use serde::Deserialize;

/// A loader rule from the build plan. A rule is either a plain rule
/// (`test` + `transforms`, every matching rule applies) or a `one_of`
/// container whose first matching sub-rule wins.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleRule {
  pub test: Option<RuleTest>,
  pub exclude: Option<RuleTest>,
  #[serde(rename = "use")]
  pub transforms: Vec<TransformKind>,
  pub one_of: Vec<ModuleRule>,
}

impl ModuleRule {
  pub fn with_extensions(extensions: &[&str], transforms: Vec<TransformKind>) -> Self {
    Self {
      test: Some(RuleTest::Extensions(extensions.iter().map(ToString::to_string).collect())),
      transforms,
      ..Self::default()
    }
  }

  pub fn one_of(rules: Vec<ModuleRule>) -> Self {
    Self { one_of: rules, ..Self::default() }
  }

  pub fn matches(&self, id: &str) -> bool {
    let Some(test) = &self.test else {
      // A bare `one_of` container matches everything; its sub-rules decide.
      return !self.one_of.is_empty();
    };
    if !test.matches(id) {
      return false;
    }
    self.exclude.as_ref().is_none_or(|exclude| !exclude.matches(id))
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleTest {
  /// Extension list, each entry with its leading dot, e.g. `[".css", ".less"]`.
  Extensions(Vec<String>),
  /// `fast-glob` pattern matched against the resolved module id.
  Glob(String),
}

impl RuleTest {
  pub fn matches(&self, id: &str) -> bool {
    match self {
      Self::Extensions(extensions) => {
        let ext = Path::new(id).extension().and_then(|ext| ext.to_str());
        ext.is_some_and(|ext| {
          extensions.iter().any(|candidate| candidate.strip_prefix('.') == Some(ext))
        })
      }
      Self::Glob(pattern) => fast_glob::glob_match(pattern, id),
    }
  }
}

/// Built-in structural transforms. Loader internals (Babel, PostCSS, ...)
/// are external collaborators; the core only knows how a transform reshapes
/// a module's contribution to the output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformKind {
  /// Pass the source through untouched.
  Identity,
  /// Move the module's content into the chunk's extracted CSS file.
  CssExtract,
  /// Wrap a JSON document as an ES module with a default export.
  JsonModule,
  /// Copy the file to the output dir and export its hashed public path.
  AssetFile { out_dir: String },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extension_test_matches() {
    let rule = ModuleRule::with_extensions(&[".css", ".less"], vec![TransformKind::CssExtract]);
    assert!(rule.matches("/src/styles.css"));
    assert!(rule.matches("/src/theme.less"));
    assert!(!rule.matches("/src/index.js"));
  }

  #[test]
  fn exclude_wins_over_test() {
    let mut rule = ModuleRule::with_extensions(&[".js"], vec![TransformKind::Identity]);
    rule.exclude = Some(RuleTest::Glob("**/node_modules/**".to_string()));
    assert!(rule.matches("/src/index.js"));
    assert!(!rule.matches("/src/node_modules/lib/index.js"));
  }

  #[test]
  fn bare_one_of_matches_everything() {
    let rule = ModuleRule::one_of(vec![ModuleRule::with_extensions(
      &[".js"],
      vec![TransformKind::Identity],
    )]);
    assert!(rule.matches("/src/anything.xyz"));
  }
}
