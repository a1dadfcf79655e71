use std::path::Path;

use tinypack_common::{
  AssetView, FileNameRenderOptions, FilenameTemplate, ModuleRule, TransformKind,
};
use tinypack_error::BuildDiagnostic;
use tinypack_utils::xxhash::xxhash_hex;

/// Collects the transforms to run for `id`, walking rules in declared order.
/// A `one_of` container is gated by its own `test`/`exclude` and contributes
/// only its first matching sub-rule; plain rules all apply. A file no rule
/// claims falls back to the identity transform.
pub fn matched_transforms(rules: &[ModuleRule], id: &str) -> Vec<TransformKind> {
  let mut transforms = Vec::new();

  for rule in rules {
    if !rule.matches(id) {
      continue;
    }
    if rule.one_of.is_empty() {
      transforms.extend(rule.transforms.iter().cloned());
    } else if let Some(sub_rule) = rule.one_of.iter().find(|sub_rule| sub_rule.matches(id)) {
      transforms.extend(sub_rule.transforms.iter().cloned());
    }
  }

  if transforms.is_empty() {
    transforms.push(TransformKind::Identity);
  }

  transforms
}

#[derive(Debug, Default)]
pub struct TransformOutput {
  pub js_content: String,
  pub css_content: Option<String>,
  pub asset_view: Option<AssetView>,
}

/// Runs the matched transforms over the raw source, in declared order.
/// `asset_filenames` is the template hashed media files are named with.
pub fn apply_transforms(
  id: &str,
  source: &[u8],
  transforms: &[TransformKind],
  asset_filenames: &str,
) -> Result<TransformOutput, BuildDiagnostic> {
  let mut output = TransformOutput::default();
  let mut text: Option<String> = None;

  for transform in transforms {
    match transform {
      TransformKind::Identity => {
        output.js_content = text_of(id, source, &mut text)?.to_string();
      }
      TransformKind::CssExtract => {
        output.css_content = Some(text_of(id, source, &mut text)?.to_string());
        output.js_content = String::new();
      }
      TransformKind::JsonModule => {
        let text = text_of(id, source, &mut text)?;
        serde_json::from_str::<serde_json::Value>(text)
          .map_err(|err| BuildDiagnostic::transform(id, err))?;
        output.js_content = format!("export default {};\n", text.trim());
      }
      TransformKind::AssetFile { out_dir } => {
        let path = Path::new(id);
        let hash = xxhash_hex(source);
        let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or("bin");
        let name = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("asset");
        let rendered = FilenameTemplate::new(asset_filenames.to_string()).render(
          &FileNameRenderOptions {
            name: Some(name),
            hash: Some(&hash),
            ext: Some(&format!(".{ext}")),
          },
        );
        let filename =
          if out_dir.is_empty() { rendered } else { format!("{out_dir}/{rendered}") };
        output.js_content = format!("export default {filename:?};\n");
        output.asset_view = Some(AssetView { bytes: source.to_vec(), filename });
      }
    }
  }

  Ok(output)
}

fn text_of<'a>(
  id: &str,
  source: &[u8],
  text: &'a mut Option<String>,
) -> Result<&'a str, BuildDiagnostic> {
  if text.is_none() {
    let decoded = std::str::from_utf8(source)
      .map_err(|err| BuildDiagnostic::transform(id, format!("invalid utf-8 source: {err}")))?;
    *text = Some(decoded.to_string());
  }
  Ok(text.as_deref().unwrap_or_default())
}

#[cfg(test)]
mod tests {
  use tinypack_common::RuleTest;

  use super::*;

  fn css_rule() -> ModuleRule {
    ModuleRule::with_extensions(&[".css"], vec![TransformKind::CssExtract])
  }

  fn js_rule() -> ModuleRule {
    ModuleRule::with_extensions(&[".js"], vec![TransformKind::Identity])
  }

  #[test]
  fn one_of_applies_exactly_one_sub_rule() {
    // Both sub-rules match a `.css` file via the glob; only the first runs.
    let glob_rule = ModuleRule {
      test: Some(RuleTest::Glob("**/*.css".to_string())),
      transforms: vec![TransformKind::Identity],
      ..ModuleRule::default()
    };
    let rules = vec![ModuleRule::one_of(vec![css_rule(), glob_rule])];

    let transforms = matched_transforms(&rules, "/src/styles.css");
    assert_eq!(transforms, vec![TransformKind::CssExtract]);
  }

  #[test]
  fn one_of_container_test_gates_its_sub_rules() {
    // The sub-rule matches everything, but the container only claims `.css`.
    let container = ModuleRule {
      test: Some(RuleTest::Extensions(vec![".css".to_string()])),
      one_of: vec![ModuleRule {
        test: Some(RuleTest::Glob("**/*".to_string())),
        transforms: vec![TransformKind::CssExtract],
        ..ModuleRule::default()
      }],
      ..ModuleRule::default()
    };

    assert_eq!(matched_transforms(&[container.clone()], "/src/a.css"), vec![
      TransformKind::CssExtract
    ]);
    assert_eq!(matched_transforms(&[container], "/src/a.js"), vec![TransformKind::Identity]);
  }

  #[test]
  fn sibling_rules_all_apply() {
    let rules = vec![js_rule(), css_rule()];
    assert_eq!(matched_transforms(&rules, "/src/a.js"), vec![TransformKind::Identity]);
    assert_eq!(matched_transforms(&rules, "/src/a.css"), vec![TransformKind::CssExtract]);
  }

  #[test]
  fn unmatched_file_gets_identity() {
    assert_eq!(matched_transforms(&[], "/src/a.xyz"), vec![TransformKind::Identity]);
  }

  const ASSET_FILENAMES: &str = "[hash:10][ext]";

  #[test]
  fn css_extract_moves_content_out_of_js() {
    let output = apply_transforms(
      "/src/a.css",
      b"body { color: red }",
      &[TransformKind::CssExtract],
      ASSET_FILENAMES,
    )
    .unwrap();
    assert_eq!(output.js_content, "");
    assert_eq!(output.css_content.as_deref(), Some("body { color: red }"));
  }

  #[test]
  fn json_module_rejects_invalid_json() {
    let err = apply_transforms("/src/a.json", b"{ nope", &[TransformKind::JsonModule], ASSET_FILENAMES)
      .unwrap_err();
    assert_eq!(err.kind(), tinypack_error::ErrorKind::Transform);
  }

  #[test]
  fn asset_file_exports_hashed_path() {
    let output = apply_transforms(
      "/src/logo.png",
      &[1, 2, 3],
      &[TransformKind::AssetFile { out_dir: "imgs".to_string() }],
      ASSET_FILENAMES,
    )
    .unwrap();
    let view = output.asset_view.unwrap();
    assert!(view.filename.starts_with("imgs/"));
    assert!(view.filename.ends_with(".png"));
    assert!(output.js_content.contains(&view.filename));
  }
}
