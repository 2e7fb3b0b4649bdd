//! An owned, growable, byte-indexed buffer with capacity doubling.
//!
//! This is little more than a thin wrapper around `Vec<u8>`, but it pins
//! down the growth policy (capacity floor of 8, doubling thereafter) that
//! the rest of the crate relies on for amortized append cost, the way the
//! reference codec family keeps its own small buffer/word types rather than
//! reaching for ad-hoc `Vec::push` calls scattered across the stages.

const MIN_CAPACITY: usize = 8;

#[derive(Clone, Debug, Default)]
pub struct ByteBuffer {
  bytes: Vec<u8>,
}

impl ByteBuffer {
  pub fn new() -> Self {
    Self { bytes: Vec::new() }
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      bytes: Vec::with_capacity(capacity.max(MIN_CAPACITY)),
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }

  #[inline]
  pub fn as_slice(&self) -> &[u8] {
    &self.bytes
  }

  #[inline]
  pub fn as_mut_slice(&mut self) -> &mut [u8] {
    &mut self.bytes
  }

  /// Ensures at least `additional` more bytes can be appended without a
  /// further reallocation, doubling capacity (from a floor of `MIN_CAPACITY`)
  /// rather than growing exactly to fit.
  pub fn reserve(&mut self, additional: usize) {
    let needed = self.bytes.len() + additional;
    if needed <= self.bytes.capacity() {
      return;
    }
    let mut new_capacity = self.bytes.capacity().max(MIN_CAPACITY);
    while new_capacity < needed {
      new_capacity *= 2;
    }
    self.bytes.reserve(new_capacity - self.bytes.len());
  }

  #[inline]
  pub fn push(&mut self, byte: u8) {
    if self.bytes.len() == self.bytes.capacity() {
      self.reserve(1);
    }
    self.bytes.push(byte);
  }

  #[inline]
  pub fn extend_from_slice(&mut self, other: &[u8]) {
    self.reserve(other.len());
    self.bytes.extend_from_slice(other);
  }

  pub fn into_vec(self) -> Vec<u8> {
    self.bytes
  }
}

impl From<Vec<u8>> for ByteBuffer {
  fn from(bytes: Vec<u8>) -> Self {
    Self { bytes }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_capacity_floor() {
    let buf = ByteBuffer::with_capacity(0);
    assert!(buf.bytes.capacity() >= MIN_CAPACITY);
  }

  #[test]
  fn test_push_and_extend() {
    let mut buf = ByteBuffer::new();
    buf.push(1);
    buf.extend_from_slice(&[2, 3, 4]);
    assert_eq!(buf.as_slice(), &[1, 2, 3, 4]);
    assert_eq!(buf.len(), 4);
  }

  #[test]
  fn test_reserve_doubles() {
    let mut buf = ByteBuffer::with_capacity(8);
    let cap0 = buf.bytes.capacity();
    buf.reserve(9);
    assert!(buf.bytes.capacity() >= cap0 * 2);
  }
}
