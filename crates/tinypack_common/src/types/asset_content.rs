#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetContent {
  Text(String),
  /// Copied media files (images, fonts) stay as raw bytes.
  Bytes(Vec<u8>),
}

impl AssetContent {
  pub fn as_bytes(&self) -> &[u8] {
    match self {
      Self::Text(text) => text.as_bytes(),
      Self::Bytes(bytes) => bytes,
    }
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(text) => Some(text),
      Self::Bytes(_) => None,
    }
  }

  pub fn len(&self) -> usize {
    self.as_bytes().len()
  }

  pub fn is_empty(&self) -> bool {
    self.as_bytes().is_empty()
  }
}

impl From<String> for AssetContent {
  fn from(text: String) -> Self {
    Self::Text(text)
  }
}

impl From<Vec<u8>> for AssetContent {
  fn from(bytes: Vec<u8>) -> Self {
    Self::Bytes(bytes)
  }
}
