use tinypack_common::{AssetContent, OutputAsset};

use crate::{HookArgs, HookRegistry, HookStage, Plugin, PluginName};

/// Injects an HTML shell referencing every emitted JS and CSS chunk, the
/// counterpart of the usual html plugin in webpack-style setups.
#[derive(Debug, Clone)]
pub struct HtmlPlugin {
  pub filename: String,
  pub title: String,
}

impl Default for HtmlPlugin {
  fn default() -> Self {
    Self { filename: "index.html".to_string(), title: "tinypack app".to_string() }
  }
}

impl HtmlPlugin {
  pub fn new(title: impl Into<String>) -> Self {
    Self { title: title.into(), ..Self::default() }
  }

  fn render(&self, assets: &[OutputAsset]) -> String {
    let mut links = String::new();
    let mut scripts = String::new();

    for asset in assets {
      if asset.filename.ends_with(".css") {
        links.push_str(&format!("    <link rel=\"stylesheet\" href=\"{}\">\n", asset.filename));
      } else if asset.filename.ends_with(".js") {
        scripts.push_str(&format!("    <script src=\"{}\"></script>\n", asset.filename));
      }
    }

    format!(
      "<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"utf-8\">\n    <title>{}</title>\n{}  </head>\n  <body>\n{}  </body>\n</html>\n",
      self.title, links, scripts
    )
  }
}

impl Plugin for HtmlPlugin {
  fn name(&self) -> PluginName {
    "tinypack:html".into()
  }

  fn apply(&self, registry: &mut HookRegistry) {
    let plugin = self.clone();
    registry.on(HookStage::BeforeEmit, move |args| {
      if let HookArgs::BeforeEmit { assets, .. } = args {
        let html = plugin.render(assets);
        assets
          .push(OutputAsset { filename: plugin.filename.clone(), content: AssetContent::Text(html) });
      }
      Ok(())
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn references_js_and_css_chunks() {
    let plugin = HtmlPlugin::default();
    let assets = vec![
      OutputAsset {
        filename: "js/built.123.js".to_string(),
        content: AssetContent::Text(String::new()),
      },
      OutputAsset {
        filename: "css/built.456.css".to_string(),
        content: AssetContent::Text(String::new()),
      },
    ];
    let html = plugin.render(&assets);
    assert!(html.contains("<script src=\"js/built.123.js\"></script>"));
    assert!(html.contains("<link rel=\"stylesheet\" href=\"css/built.456.css\">"));
  }
}
