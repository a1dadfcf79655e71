use xxhash_rust::xxh3::xxh3_128;

/// Hex digest of the xxh3-128 hash. Filename `[hash:N]` placeholders slice a
/// prefix of this, so the full digest must stay stable across releases.
pub fn xxhash_hex(input: &[u8]) -> String {
  let hash = xxh3_128(input);
  format!("{hash:032x}")
}

#[test]
fn test_xxhash_hex() {
  assert_eq!(xxhash_hex(b"hello").len(), 32);
  assert_eq!(xxhash_hex(b"hello"), xxhash_hex(b"hello"));
  assert_ne!(xxhash_hex(b"hello"), xxhash_hex(b"hello!"));
}
