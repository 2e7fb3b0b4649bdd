//! A 32-bit non-cryptographic fingerprint over decompressed bytes, computed
//! by the encoder and optionally verified by the decoder.
//!
//! Not a hash in any security sense -- a striped multiplicative accumulator:
//! four running sums folded over 4-byte groups, then combined and folded
//! once more over any trailing remainder bytes. Cheap, branch-free per
//! byte, parallelizable across stripes.

use crate::constants::{CHECKSUM_PRIME, CHECKSUM_SEED};

/// Computes the checksum of `bytes`. A return value of `0` is possible (if
/// astronomically unlikely) and is treated by the container as "unchecked";
/// see [`crate::container`].
pub fn checksum(bytes: &[u8]) -> u32 {
  let mut acc = [0u32; 4];
  for (j, a) in acc.iter_mut().enumerate() {
    *a = CHECKSUM_SEED.wrapping_add(j as u32);
  }

  let mut chunks = bytes.chunks_exact(4);
  for chunk in &mut chunks {
    for (j, &byte) in chunk.iter().enumerate() {
      acc[j] = acc[j].wrapping_add(byte as u32).wrapping_mul(CHECKSUM_PRIME);
    }
  }

  let mut total = CHECKSUM_SEED;
  for &a in &acc {
    total = total.wrapping_add(a).wrapping_mul(CHECKSUM_PRIME);
  }

  for &byte in chunks.remainder() {
    total = total.wrapping_add(byte as u32).wrapping_mul(CHECKSUM_PRIME);
  }

  total.wrapping_add(bytes.len() as u32)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_is_deterministic() {
    assert_eq!(checksum(&[]), checksum(&[]));
  }

  #[test]
  fn test_differs_by_content() {
    assert_ne!(checksum(b"hello world"), checksum(b"hello worlD"));
  }

  #[test]
  fn test_differs_by_length() {
    assert_ne!(checksum(b"aaaa"), checksum(b"aaaaa"));
  }

  #[test]
  fn test_remainder_path() {
    // exercises the chunks_exact remainder for lengths not a multiple of 4
    let _ = checksum(b"abcdefg");
  }
}
