use std::borrow::Cow;

/// Output filename template, e.g. `js/built.[contenthash:10].js`.
///
/// Recognized placeholders: `[name]`, `[ext]`, `[hash]` / `[hash:N]` and the
/// `[contenthash]` spelling used by webpack-style configs (an alias here,
/// since our hashes are always content hashes).
#[derive(Debug, Clone)]
pub struct FilenameTemplate {
  template: String,
}

pub struct FileNameRenderOptions<'me> {
  pub name: Option<&'me str>,
  pub hash: Option<&'me str>,
  pub ext: Option<&'me str>,
}

impl FilenameTemplate {
  pub fn new(template: String) -> Self {
    Self { template }
  }

  pub fn render(&self, options: &FileNameRenderOptions) -> String {
    let mut rendered = self.template.clone();
    if let Some(name) = options.name {
      rendered = rendered.replace("[name]", name);
    }
    if let Some(ext) = options.ext {
      rendered = rendered.replace("[ext]", ext);
    }
    if let Some(hash) = options.hash {
      rendered = Self::replace_hash(&rendered, "[hash", hash).into_owned();
      rendered = Self::replace_hash(&rendered, "[contenthash", hash).into_owned();
    }
    rendered
  }

  /// Replaces `[hash]` and length-limited `[hash:N]` forms.
  fn replace_hash<'a>(rendered: &'a str, marker: &str, hash: &str) -> Cow<'a, str> {
    let Some(start) = rendered.find(marker) else {
      return Cow::Borrowed(rendered);
    };
    let Some(end) = rendered[start..].find(']').map(|offset| start + offset) else {
      return Cow::Borrowed(rendered);
    };

    let placeholder = &rendered[start..=end];
    let len = placeholder[marker.len()..placeholder.len() - 1]
      .strip_prefix(':')
      .and_then(|digits| digits.parse::<usize>().ok())
      .unwrap_or(hash.len())
      .min(hash.len());

    let mut ret = String::with_capacity(rendered.len() + len);
    ret.push_str(&rendered[..start]);
    ret.push_str(&hash[..len]);
    ret.push_str(&rendered[end + 1..]);
    Cow::Owned(ret)
  }
}

impl From<String> for FilenameTemplate {
  fn from(template: String) -> Self {
    Self::new(template)
  }
}
