use std::{
  path::Path,
  sync::{Arc, Mutex},
};

use tinypack::{
  Bundler, BundlerOptions, CancelToken, CleanOutputPlugin, ErrorKind, HookRegistry, HookStage,
  HtmlPlugin, InputItem, Mode, ModuleRule, Plugin, PluginName, RuleTest, TransformKind,
};
use tinypack_fs::{FileSystem, MemoryFileSystem, SharedFileSystem};

fn memory_fs(files: &[(&str, &str)]) -> Arc<MemoryFileSystem> {
  Arc::new(MemoryFileSystem::new(files))
}

fn options(input: &[(&str, &str)]) -> BundlerOptions {
  BundlerOptions {
    input: Some(
      input
        .iter()
        .map(|(name, import)| InputItem {
          name: Some((*name).to_string()),
          import: (*import).to_string(),
        })
        .collect(),
    ),
    cwd: Some("/project".into()),
    ..BundlerOptions::default()
  }
}

fn bundler(fs: &Arc<MemoryFileSystem>, options: BundlerOptions) -> Bundler {
  let shared: SharedFileSystem = Arc::clone(fs) as SharedFileSystem;
  Bundler::with_fs(options, Vec::new(), shared)
}

fn asset_text<'a>(output: &'a tinypack::BundleOutput, filename: &str) -> &'a str {
  output
    .assets
    .iter()
    .find(|asset| asset.filename == filename)
    .unwrap_or_else(|| panic!("missing asset {filename}"))
    .content
    .as_text()
    .unwrap()
}

#[tokio::test]
async fn bundles_a_single_entry_graph() {
  let fs = memory_fs(&[
    ("/project/src/main.js", "import { greet } from './util.js';\nconsole.log(greet('x'));\n"),
    ("/project/src/util.js", "export function greet(name) {\n  return name;\n}\n"),
  ]);
  let output = bundler(&fs, options(&[("main", "./src/main.js")])).write().await.unwrap();

  let js = asset_text(&output, "main.js");
  assert!(js.contains("function greet"));
  assert!(js.contains("console.log"));
  // The in-chunk import statement must not survive rendering.
  assert!(!js.contains("from './util.js'"));

  // And the file actually landed in the output directory.
  assert!(fs.is_file(Path::new("/project/dist/main.js")));
}

#[tokio::test]
async fn content_hash_filenames_are_reproducible() {
  let files = [
    ("/project/src/main.js", "import './app.css';\nconsole.log(1);\n"),
    ("/project/src/app.css", "body { margin: 0 }\n"),
  ];
  let opts = || BundlerOptions {
    entry_filenames: Some("js/built.[contenthash:10].js".to_string()),
    css_entry_filenames: Some("css/built.[contenthash:10].css".to_string()),
    mode: Some(Mode::Production),
    ..options(&[("built", "./src/main.js")])
  };

  let first = bundler(&memory_fs(&files), opts()).write().await.unwrap();
  let second = bundler(&memory_fs(&files), opts()).write().await.unwrap();

  let mut first_names: Vec<&str> = first.assets.iter().map(|a| a.filename.as_str()).collect();
  let mut second_names: Vec<&str> = second.assets.iter().map(|a| a.filename.as_str()).collect();
  first_names.sort_unstable();
  second_names.sort_unstable();
  assert_eq!(first_names, second_names);

  let js_name = first_names.iter().find(|name| name.starts_with("js/built.")).unwrap();
  assert!(js_name.ends_with(".js"));
  // [contenthash:10] renders exactly ten hex chars.
  let hash = js_name.trim_start_matches("js/built.").trim_end_matches(".js");
  assert_eq!(hash.len(), 10);
  assert!(hash.bytes().all(|b| b.is_ascii_hexdigit()));
  assert!(first_names.iter().any(|name| name.starts_with("css/built.")));
}

#[tokio::test]
async fn editing_one_entry_only_rehashes_its_own_chunk() {
  let base = [
    ("/project/src/a.js", "console.log('a');\n"),
    ("/project/src/b.js", "console.log('b');\n"),
  ];
  let edited = [
    ("/project/src/a.js", "console.log('a');\n"),
    ("/project/src/b.js", "console.log('b, edited');\n"),
  ];
  let opts = || BundlerOptions {
    entry_filenames: Some("[name]-[hash].js".to_string()),
    ..options(&[("a", "./src/a.js"), ("b", "./src/b.js")])
  };

  let before = bundler(&memory_fs(&base), opts()).write().await.unwrap();
  let after = bundler(&memory_fs(&edited), opts()).write().await.unwrap();

  let name_of = |output: &tinypack::BundleOutput, prefix: &str| {
    output
      .assets
      .iter()
      .map(|asset| asset.filename.clone())
      .find(|name| name.starts_with(prefix))
      .unwrap()
  };

  assert_eq!(name_of(&before, "a-"), name_of(&after, "a-"));
  assert_ne!(name_of(&before, "b-"), name_of(&after, "b-"));
}

#[tokio::test]
async fn cyclic_imports_terminate() {
  let fs = memory_fs(&[
    ("/project/src/main.js", "import { a } from './a.js';\nconsole.log(a);\n"),
    ("/project/src/a.js", "import { b } from './b.js';\nexport const a = b + 1;\n"),
    ("/project/src/b.js", "import { a } from './a.js';\nexport const b = 2;\n"),
  ]);
  let output = bundler(&fs, options(&[("main", "./src/main.js")])).write().await.unwrap();

  let js = asset_text(&output, "main.js");
  assert!(js.contains("const a = b + 1"));
  assert!(js.contains("const b = 2"));
}

#[tokio::test]
async fn missing_import_names_the_importer() {
  let fs = memory_fs(&[("/project/src/main.js", "import './missing.js';\n")]);
  let err = bundler(&fs, options(&[("main", "./src/main.js")])).write().await.unwrap_err();

  assert_eq!(err.kind(), Some(ErrorKind::Resolution));
  let message = err[0].to_string();
  assert!(message.contains("./missing.js"));
  assert!(message.contains("/project/src/main.js"));
}

#[tokio::test]
async fn empty_input_is_a_config_error() {
  let fs = memory_fs(&[]);
  let err = bundler(&fs, options(&[])).write().await.unwrap_err();
  assert_eq!(err.kind(), Some(ErrorKind::Config));
}

#[tokio::test]
async fn unresolvable_entry_is_a_config_error() {
  let fs = memory_fs(&[]);
  let err = bundler(&fs, options(&[("main", "./src/main.js")])).write().await.unwrap_err();
  assert_eq!(err.kind(), Some(ErrorKind::Config));
  assert!(err[0].to_string().contains("./src/main.js"));
}

#[tokio::test]
async fn one_of_rules_apply_only_the_first_match() {
  let fs = memory_fs(&[
    ("/project/src/main.js", "import './app.css';\nconsole.log(1);\n"),
    ("/project/src/app.css", ".app { color: red }\n"),
  ]);
  // Both sub-rules match `.css`; only the extracting one may run.
  let rules = vec![
    ModuleRule::with_extensions(&[".js"], vec![TransformKind::Identity]),
    ModuleRule::one_of(vec![
      ModuleRule::with_extensions(&[".css"], vec![TransformKind::CssExtract]),
      ModuleRule {
        test: Some(RuleTest::Glob("**/*.css".to_string())),
        transforms: vec![TransformKind::Identity],
        ..ModuleRule::default()
      },
    ]),
  ];
  let output = bundler(
    &fs,
    BundlerOptions { rules: Some(rules), ..options(&[("main", "./src/main.js")]) },
  )
  .write()
  .await
  .unwrap();

  let css = asset_text(&output, "main.css");
  assert!(css.contains(".app"));
  let js = asset_text(&output, "main.js");
  assert!(!js.contains(".app"));
}

#[tokio::test]
async fn shared_modules_get_their_own_chunk() {
  let fs = memory_fs(&[
    ("/project/src/a.js", "import { shared } from './common.js';\nconsole.log('a', shared);\n"),
    ("/project/src/b.js", "import { shared } from './common.js';\nconsole.log('b', shared);\n"),
    ("/project/src/common.js", "export const shared = 42;\n"),
  ]);
  let output = bundler(&fs, options(&[("a", "./src/a.js"), ("b", "./src/b.js")]))
    .write()
    .await
    .unwrap();

  let shared_name = output
    .assets
    .iter()
    .map(|asset| asset.filename.clone())
    .find(|name| name.starts_with("shared-"))
    .expect("a shared chunk should exist");
  assert!(asset_text(&output, &shared_name).contains("const shared = 42"));

  // Both entries reference the shared chunk by its final hashed name.
  for entry in ["a.js", "b.js"] {
    let js = asset_text(&output, entry);
    assert!(js.contains(&format!("import \"./{shared_name}\"")), "{entry}: {js}");
    assert!(!js.contains("const shared = 42"));
  }
}

#[tokio::test]
async fn dynamic_imports_split_and_reference_the_target_chunk() {
  let fs = memory_fs(&[
    ("/project/src/main.js", "const lazy = import('./lazy.js');\nconsole.log(lazy);\n"),
    ("/project/src/lazy.js", "export default 'lazy loaded';\n"),
  ]);
  let output = bundler(&fs, options(&[("main", "./src/main.js")])).write().await.unwrap();

  let lazy_name = output
    .assets
    .iter()
    .map(|asset| asset.filename.clone())
    .find(|name| name.starts_with("lazy-"))
    .expect("dynamic import should produce a chunk");
  let js = asset_text(&output, "main.js");
  assert!(js.contains(&format!("import(\"./{lazy_name}\")")), "{js}");
  assert!(!js.contains("'./lazy.js'"));
}

#[tokio::test]
async fn external_urls_stay_external() {
  let fs = memory_fs(&[(
    "/project/src/main.js",
    "import 'https://cdn.example.com/lib.js';\nconsole.log(1);\n",
  )]);
  let output = bundler(&fs, options(&[("main", "./src/main.js")])).write().await.unwrap();
  assert!(asset_text(&output, "main.js").contains("https://cdn.example.com/lib.js"));
}

#[tokio::test]
async fn treeshake_drops_side_effect_free_unused_modules() {
  let files = [
    ("/project/src/main.js", "import './helper.js';\nconsole.log('kept');\n"),
    ("/project/src/helper.js", "export const helper = 'droppable';\n"),
  ];

  let kept = bundler(
    &memory_fs(&files),
    BundlerOptions { treeshake: Some(false), ..options(&[("main", "./src/main.js")]) },
  )
  .write()
  .await
  .unwrap();
  assert!(asset_text(&kept, "main.js").contains("droppable"));

  let shaken = bundler(
    &memory_fs(&files),
    BundlerOptions { treeshake: Some(true), ..options(&[("main", "./src/main.js")]) },
  )
  .write()
  .await
  .unwrap();
  assert!(!asset_text(&shaken, "main.js").contains("droppable"));
}

#[tokio::test]
async fn json_and_asset_modules() {
  let fs = memory_fs(&[
    (
      "/project/src/main.js",
      "import config from './config.json';\nimport logo from './logo.png';\nconsole.log(config, logo);\n",
    ),
    ("/project/src/config.json", "{\"name\":\"app\"}"),
    ("/project/src/logo.png", "not-really-a-png"),
  ]);
  let output = bundler(&fs, options(&[("main", "./src/main.js")])).write().await.unwrap();

  let js = asset_text(&output, "main.js");
  assert!(js.contains("export default {\"name\":\"app\"}"));

  let image = output
    .assets
    .iter()
    .find(|asset| asset.filename.starts_with("assets/") && asset.filename.ends_with(".png"))
    .expect("the image should be copied out");
  assert_eq!(image.content.as_bytes(), b"not-really-a-png");
  // The importing module sees the final public path.
  assert!(js.contains(&image.filename));
}

#[tokio::test]
async fn second_build_reuses_the_cache_and_invalidates_on_edit() {
  let fs = memory_fs(&[
    ("/project/src/main.js", "import { v } from './util.js';\nconsole.log(v);\n"),
    ("/project/src/util.js", "export const v = 'first';\n"),
  ]);

  let opts = || options(&[("main", "./src/main.js")]);
  bundler(&fs, opts()).write().await.unwrap();
  assert!(fs.is_file(Path::new("/project/.tinypack/cache.json")));

  // Unchanged source: cache hit, identical output.
  let again = bundler(&fs, opts()).write().await.unwrap();
  assert!(asset_text(&again, "main.js").contains("first"));

  // Edited source: the stale entry must not leak into the output.
  fs.add_file(Path::new("/project/src/util.js"), "export const v = 'second';\n");
  let rebuilt = bundler(&fs, opts()).write().await.unwrap();
  let js = asset_text(&rebuilt, "main.js");
  assert!(js.contains("second"));
  assert!(!js.contains("first"));
}

#[tokio::test]
async fn corrupt_cache_falls_back_to_a_full_build() {
  let fs = memory_fs(&[("/project/src/main.js", "console.log('ok');\n")]);
  fs.create_dir_all(Path::new("/project/.tinypack")).unwrap();
  fs.write(Path::new("/project/.tinypack/cache.json"), b"{ not json").unwrap();

  let output = bundler(&fs, options(&[("main", "./src/main.js")])).write().await.unwrap();
  assert!(asset_text(&output, "main.js").contains("ok"));
}

#[tokio::test]
async fn conflicting_filenames_are_a_hash_collision_error() {
  let fs = memory_fs(&[
    ("/project/src/a.js", "console.log('a');\n"),
    ("/project/src/b.js", "console.log('b');\n"),
  ]);
  // A template without placeholders funnels both entries onto one filename.
  let err = bundler(
    &fs,
    BundlerOptions {
      entry_filenames: Some("app.js".to_string()),
      ..options(&[("a", "./src/a.js"), ("b", "./src/b.js")])
    },
  )
  .write()
  .await
  .unwrap_err();
  assert_eq!(err.kind(), Some(ErrorKind::HashCollision));
}

/// Fires the bundler's own cancel token from inside a hook, the way a watch
/// loop superseded by a newer change would.
#[derive(Debug)]
struct CancelAtStage {
  stage: HookStage,
  token: Arc<Mutex<Option<CancelToken>>>,
}

impl Plugin for CancelAtStage {
  fn name(&self) -> PluginName {
    "test:cancel".into()
  }

  fn apply(&self, registry: &mut HookRegistry) {
    let token = Arc::clone(&self.token);
    registry.on(self.stage, move |_| {
      if let Some(token) = token.lock().unwrap().as_ref() {
        token.cancel();
      }
      Ok(())
    });
  }
}

#[tokio::test]
async fn cancelling_during_the_graph_build_abandons_it() {
  let fs = memory_fs(&[("/project/src/main.js", "console.log('never built');\n")]);
  let slot = Arc::new(Mutex::new(None));
  let shared: SharedFileSystem = Arc::clone(&fs) as SharedFileSystem;
  let mut bundler = Bundler::with_fs(
    options(&[("main", "./src/main.js")]),
    vec![Arc::new(CancelAtStage { stage: HookStage::BeforeGraph, token: Arc::clone(&slot) })],
    shared,
  );
  *slot.lock().unwrap() = Some(bundler.cancel_token());

  let err = bundler.write().await.unwrap_err();
  assert_eq!(err.kind(), Some(ErrorKind::Cancelled));
  assert!(!fs.is_dir(Path::new("/project/dist")));
}

#[tokio::test]
async fn cancelling_before_emission_writes_nothing() {
  let fs = memory_fs(&[("/project/src/main.js", "console.log('never emitted');\n")]);
  let slot = Arc::new(Mutex::new(None));
  let shared: SharedFileSystem = Arc::clone(&fs) as SharedFileSystem;
  let mut bundler = Bundler::with_fs(
    options(&[("main", "./src/main.js")]),
    vec![Arc::new(CancelAtStage { stage: HookStage::BeforeEmit, token: Arc::clone(&slot) })],
    shared,
  );
  *slot.lock().unwrap() = Some(bundler.cancel_token());

  let err = bundler.write().await.unwrap_err();
  assert_eq!(err.kind(), Some(ErrorKind::Cancelled));
  // The cancel must land before the emit stage and the cache save.
  assert!(!fs.is_dir(Path::new("/project/dist")));
  assert!(!fs.is_file(Path::new("/project/.tinypack/cache.json")));
}

#[tokio::test]
async fn plugin_asset_colliding_with_a_chunk_is_rejected() {
  let fs = memory_fs(&[("/project/src/main.js", "console.log(1);\n")]);
  let shared: SharedFileSystem = Arc::clone(&fs) as SharedFileSystem;
  let err = Bundler::with_fs(
    options(&[("main", "./src/main.js")]),
    vec![Arc::new(HtmlPlugin { filename: "main.js".to_string(), title: "app".to_string() })],
    shared,
  )
  .write()
  .await
  .unwrap_err();

  assert_eq!(err.kind(), Some(ErrorKind::HashCollision));
  // The collision surfaces before anything reaches the output directory.
  assert!(!fs.is_file(Path::new("/project/dist/main.js")));
}

#[tokio::test]
async fn html_plugin_injects_emitted_files() {
  let fs = memory_fs(&[
    ("/project/src/main.js", "import './app.css';\nconsole.log(1);\n"),
    ("/project/src/app.css", "body { margin: 0 }\n"),
  ]);
  let shared: SharedFileSystem = Arc::clone(&fs) as SharedFileSystem;
  let output = Bundler::with_fs(
    options(&[("main", "./src/main.js")]),
    vec![Arc::new(HtmlPlugin::new("app"))],
    shared,
  )
  .write()
  .await
  .unwrap();

  let html = asset_text(&output, "index.html");
  assert!(html.contains("<title>app</title>"));
  assert!(html.contains("<script src=\"main.js\"></script>"));
  assert!(html.contains("<link rel=\"stylesheet\" href=\"main.css\">"));
  assert!(fs.is_file(Path::new("/project/dist/index.html")));
}

#[tokio::test]
async fn clean_plugin_removes_stale_output() {
  let fs = memory_fs(&[
    ("/project/src/main.js", "console.log('fresh');\n"),
    ("/project/dist/stale.js", "console.log('stale');\n"),
  ]);
  let shared: SharedFileSystem = Arc::clone(&fs) as SharedFileSystem;
  Bundler::with_fs(
    options(&[("main", "./src/main.js")]),
    vec![Arc::new(CleanOutputPlugin)],
    shared,
  )
  .write()
  .await
  .unwrap();

  assert!(!fs.is_file(Path::new("/project/dist/stale.js")));
  assert!(fs.is_file(Path::new("/project/dist/main.js")));
}
