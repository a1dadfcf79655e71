/// A fixed-width bitset used to track which entry points can reach a module.
/// Chunks are keyed by the bit pattern, so `Hash`/`Eq` must only depend on
/// the bit content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitSet {
  entries: Vec<u8>,
}

impl BitSet {
  pub fn new(max_bit_count: u32) -> Self {
    Self { entries: vec![0; max_bit_count.div_ceil(8) as usize] }
  }

  pub fn set_bit(&mut self, bit: u32) {
    let index = (bit / 8) as usize;
    self.entries[index] |= 1 << (bit % 8);
  }

  pub fn has_bit(&self, bit: u32) -> bool {
    let index = (bit / 8) as usize;
    self.entries.get(index).is_some_and(|byte| byte & (1 << (bit % 8)) != 0)
  }

  pub fn is_empty(&self) -> bool {
    self.entries.iter().all(|byte| *byte == 0)
  }
}

#[test]
fn test_bitset() {
  let mut bits = BitSet::new(10);
  assert!(bits.is_empty());
  bits.set_bit(0);
  bits.set_bit(9);
  assert!(bits.has_bit(0));
  assert!(!bits.has_bit(1));
  assert!(bits.has_bit(9));
  assert!(!bits.is_empty());

  let mut same = BitSet::new(10);
  same.set_bit(0);
  same.set_bit(9);
  assert_eq!(bits, same);
}
