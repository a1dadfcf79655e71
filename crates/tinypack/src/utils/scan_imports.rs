use std::sync::LazyLock;

use oxc_index::IndexVec;
use regex::Regex;
use tinypack_common::{ImportKind, ImportRecordIdx, RawImportRecord};

static IMPORT_FROM_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?m)^\s*import\s+([^'"();]+?)\s+from\s+['"]([^'"]+)['"]"#).unwrap()
});
static IMPORT_BARE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?m)^\s*import\s*['"]([^'"]+)['"]"#).unwrap());
static EXPORT_FROM_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?m)^\s*export\s+([^'"();]*?)\s*from\s+['"]([^'"]+)['"]"#).unwrap()
});
static DYNAMIC_IMPORT_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());
static REQUIRE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

static EXPORT_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?m)^\s*export\s+(?:async\s+)?(?:function|class|const|let|var)\s+([A-Za-z_$][\w$]*)")
    .unwrap()
});
static EXPORT_DEFAULT_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^\s*export\s+default\b").unwrap());
static EXPORT_NAMED_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^\s*export\s*\{([^}]*)\}").unwrap());
static EXPORT_STAR_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^\s*export\s*\*").unwrap());

/// Detects import specifiers in transformed JS source. This is a structural
/// scanner, not a parser: comments and template bodies are blanked out first
/// so a specifier inside either never produces a phantom dependency.
pub fn scan_imports(source: &str) -> IndexVec<ImportRecordIdx, RawImportRecord> {
  let source = strip_comments(source);
  let mut records: IndexVec<ImportRecordIdx, RawImportRecord> = IndexVec::new();
  let mut push = |record: RawImportRecord| {
    // The same specifier may occur several times; each occurrence keeps its
    // own record so imported-name analysis stays per-site.
    records.push(record);
  };

  for capture in IMPORT_FROM_RE.captures_iter(&source) {
    let names = parse_import_clause(&capture[1]);
    push(RawImportRecord::new(&capture[2], ImportKind::Import).with_names(names));
  }
  for capture in IMPORT_BARE_RE.captures_iter(&source) {
    push(RawImportRecord::new(&capture[1], ImportKind::Import));
  }
  for capture in EXPORT_FROM_RE.captures_iter(&source) {
    let names = parse_export_from_clause(&capture[1]);
    push(RawImportRecord::new(&capture[2], ImportKind::Import).with_names(names));
  }
  for capture in DYNAMIC_IMPORT_RE.captures_iter(&source) {
    push(RawImportRecord::new(&capture[1], ImportKind::DynamicImport));
  }
  for capture in REQUIRE_RE.captures_iter(&source) {
    push(RawImportRecord::new(&capture[1], ImportKind::Require).with_names(vec!["*".to_string()]));
  }

  records
}

/// Exported binding names of a module; `*` stands for a re-export-all, which
/// makes the export surface unknowable statically.
pub fn scan_exports(source: &str) -> Vec<String> {
  let source = strip_comments(source);
  let mut names = Vec::new();

  for capture in EXPORT_DECL_RE.captures_iter(&source) {
    names.push(capture[1].to_string());
  }
  if EXPORT_DEFAULT_RE.is_match(&source) {
    names.push("default".to_string());
  }
  for capture in EXPORT_NAMED_RE.captures_iter(&source) {
    for entry in capture[1].split(',') {
      // `a as b` exports `b`.
      let name = entry.split_whitespace().last().unwrap_or("").trim();
      if !name.is_empty() {
        names.push(name.to_string());
      }
    }
  }
  if EXPORT_STAR_RE.is_match(&source) {
    names.push("*".to_string());
  }

  names.sort_unstable();
  names.dedup();
  names
}

/// Classifies a rendered source line: if it is a whole static import (or
/// re-export) statement, returns its specifier so the renderer can drop or
/// rewrite the line.
pub fn static_import_specifier(line: &str) -> Option<String> {
  IMPORT_FROM_RE
    .captures(line)
    .map(|capture| capture[2].to_string())
    .or_else(|| IMPORT_BARE_RE.captures(line).map(|capture| capture[1].to_string()))
    .or_else(|| EXPORT_FROM_RE.captures(line).map(|capture| capture[2].to_string()))
}

fn parse_import_clause(clause: &str) -> Vec<String> {
  let mut names = Vec::new();
  let mut rest = clause.trim();

  if let Some(brace_start) = rest.find('{') {
    let before = rest[..brace_start].trim().trim_end_matches(',').trim();
    if !before.is_empty() {
      names.extend(parse_simple_import(before));
    }
    let inner = rest[brace_start + 1..].trim_end_matches('}');
    for entry in inner.split(',') {
      // `a as b` binds `b` locally but imports `a`.
      let name = entry.split_whitespace().next().unwrap_or("").trim();
      if !name.is_empty() {
        names.push(name.to_string());
      }
    }
    rest = "";
  }

  if !rest.is_empty() {
    names.extend(parse_simple_import(rest));
  }

  names
}

fn parse_simple_import(clause: &str) -> Vec<String> {
  clause
    .split(',')
    .filter_map(|part| {
      let part = part.trim();
      if part.is_empty() {
        None
      } else if part.starts_with('*') {
        Some("*".to_string())
      } else {
        Some("default".to_string())
      }
    })
    .collect()
}

fn parse_export_from_clause(clause: &str) -> Vec<String> {
  let clause = clause.trim();
  if clause.starts_with('*') {
    return vec!["*".to_string()];
  }
  let inner = clause.trim_start_matches('{').trim_end_matches('}');
  inner
    .split(',')
    .filter_map(|entry| {
      let name = entry.split_whitespace().next().unwrap_or("").trim();
      (!name.is_empty()).then(|| name.to_string())
    })
    .collect()
}

/// Blanks out comments and template-literal bodies. Plain string literals
/// are kept verbatim, since import specifiers live in exactly those.
fn strip_comments(source: &str) -> String {
  #[derive(PartialEq)]
  enum State {
    Normal,
    LineComment,
    BlockComment,
    Template,
  }

  let mut out = String::with_capacity(source.len());
  let mut state = State::Normal;
  let mut chars = source.chars().peekable();

  while let Some(ch) = chars.next() {
    match state {
      State::Normal => match ch {
        '/' if chars.peek() == Some(&'/') => {
          chars.next();
          out.push_str("  ");
          state = State::LineComment;
        }
        '/' if chars.peek() == Some(&'*') => {
          chars.next();
          out.push_str("  ");
          state = State::BlockComment;
        }
        '`' => {
          out.push(' ');
          state = State::Template;
        }
        '\'' | '"' => {
          // Copy the whole string literal through; import specifiers live in
          // exactly these.
          out.push(ch);
          let quote = ch;
          for inner in chars.by_ref() {
            out.push(inner);
            if inner == quote || inner == '\n' {
              break;
            }
          }
        }
        _ => out.push(ch),
      },
      State::LineComment => {
        if ch == '\n' {
          out.push('\n');
          state = State::Normal;
        } else {
          out.push(' ');
        }
      }
      State::BlockComment => {
        if ch == '*' && chars.peek() == Some(&'/') {
          chars.next();
          out.push_str("  ");
          state = State::Normal;
        } else {
          out.push(if ch == '\n' { '\n' } else { ' ' });
        }
      }
      State::Template => {
        if ch == '`' {
          out.push(' ');
          state = State::Normal;
        } else {
          out.push(if ch == '\n' { '\n' } else { ' ' });
        }
      }
    }
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn static_imports() {
    let records = scan_imports(
      "import foo from './foo.js';\nimport { a, b as c } from './bar.js';\nimport './side.css';\n",
    );
    assert_eq!(records.len(), 3);
    assert_eq!(records[ImportRecordIdx::from_raw(0)].specifier, "./foo.js");
    assert_eq!(records[ImportRecordIdx::from_raw(0)].imported_names, vec!["default"]);
    assert_eq!(records[ImportRecordIdx::from_raw(1)].imported_names, vec!["a", "b"]);
    assert_eq!(records[ImportRecordIdx::from_raw(2)].specifier, "./side.css");
  }

  #[test]
  fn dynamic_and_require() {
    let records = scan_imports("const p = import('./lazy.js');\nconst u = require('./util.js');\n");
    assert_eq!(records.len(), 2);
    assert_eq!(records[ImportRecordIdx::from_raw(0)].kind, ImportKind::DynamicImport);
    assert_eq!(records[ImportRecordIdx::from_raw(1)].kind, ImportKind::Require);
  }

  #[test]
  fn comments_and_strings_are_ignored() {
    let records = scan_imports(
      "// import fake from './fake.js'\n/* import('./fake2.js') */\nconst s = `import x from './fake3.js'`;\nimport real from './real.js';\n",
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[ImportRecordIdx::from_raw(0)].specifier, "./real.js");
  }

  #[test]
  fn namespace_import() {
    let records = scan_imports("import * as util from './util.js';\n");
    assert_eq!(records[ImportRecordIdx::from_raw(0)].imported_names, vec!["*"]);
  }

  #[test]
  fn export_scanning() {
    let names = scan_exports(
      "export const a = 1;\nexport function bee() {}\nexport default class {}\nexport { c, d as e };\n",
    );
    assert_eq!(names, vec!["a", "bee", "c", "default", "e"]);
  }

  #[test]
  fn export_from_records_reexports() {
    let records = scan_imports("export { x } from './x.js';\nexport * from './y.js';\n");
    assert_eq!(records.len(), 2);
    assert_eq!(records[ImportRecordIdx::from_raw(0)].imported_names, vec!["x"]);
    assert_eq!(records[ImportRecordIdx::from_raw(1)].imported_names, vec!["*"]);
  }
}
