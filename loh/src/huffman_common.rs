//! Shared canonical-Huffman plumbing used by both
//! [`crate::huffman_encoder`] and [`crate::huffman_decoder`]: frequency
//! counting, length-limiting by frequency inflation, and the min-heap tree
//! build that turns frequencies into code lengths. Modeled on the
//! reference codec family's `HuffmanItem` (min-heap via a flipped `Ord`,
//! `BinaryHeap`-driven pairwise merge), generalized from a leaf-per-prefix
//! tree over typed values to a leaf-per-byte tree with an explicit
//! length-limiting pass the original didn't need (it bounds depth by
//! construction; we bound it at 15 bits by inflating sparse frequencies).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::constants::{HUFFMAN_FLOOR_SHIFT, MAX_HUFFMAN_CODE_LEN};

pub fn count_frequencies(bytes: &[u8]) -> [u64; 256] {
  let mut freqs = [0u64; 256];
  for &b in bytes {
    freqs[b as usize] += 1;
  }
  freqs
}

/// Raises every nonzero frequency below a floor up to that floor,
/// recomputing the floor as frequencies rise, until the smallest nonzero
/// frequency clears it. `floor = ceil(total / 2^14)`. Guarantees the
/// resulting tree has depth at most [`MAX_HUFFMAN_CODE_LEN`]: a floor of
/// `total / 2^14` bounds the tree to at most 14 levels of "real" weight
/// plus a constant, by the usual Huffman-depth-vs-minimum-weight argument.
fn inflate_frequencies(freqs: &mut [u64; 256]) {
  loop {
    let total: u64 = freqs.iter().sum();
    if total == 0 {
      return;
    }
    let floor = total.div_ceil(1 << HUFFMAN_FLOOR_SHIFT);
    let min_nonzero = freqs.iter().copied().filter(|&f| f > 0).min();
    match min_nonzero {
      None => return,
      Some(m) if m >= floor => return,
      Some(_) => {
        let mut indices: Vec<usize> = (0..256).filter(|&i| freqs[i] > 0).collect();
        indices.sort_by_key(|&i| freqs[i]);
        for i in indices {
          if freqs[i] >= floor {
            break;
          }
          freqs[i] = floor;
        }
      }
    }
  }
}

enum Node {
  Leaf(u8),
  Internal(Box<Node>, Box<Node>),
}

struct HeapItem {
  weight: u64,
  id: usize,
  node: Node,
}

impl PartialEq for HeapItem {
  fn eq(&self, other: &Self) -> bool {
    self.weight == other.weight && self.id == other.id
  }
}
impl Eq for HeapItem {}

impl Ord for HeapItem {
  fn cmp(&self, other: &Self) -> Ordering {
    // flipped so BinaryHeap behaves as a min-heap; id breaks ties so
    // construction is fully deterministic for identical frequency input
    other
      .weight
      .cmp(&self.weight)
      .then_with(|| other.id.cmp(&self.id))
  }
}
impl PartialOrd for HeapItem {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

fn record_depths(node: &Node, depth: u8, lengths: &mut [u8; 256]) {
  match node {
    Node::Leaf(symbol) => lengths[*symbol as usize] = depth,
    Node::Internal(left, right) => {
      record_depths(left, depth + 1, lengths);
      record_depths(right, depth + 1, lengths);
    }
  }
}

/// Builds a code-length table (0 = absent, else `1..=15`) for `bytes`.
/// Returns `[0u8; 256]` for empty input.
pub fn build_lengths(bytes: &[u8]) -> [u8; 256] {
  let mut freqs = count_frequencies(bytes);
  inflate_frequencies(&mut freqs);

  let present: Vec<usize> = (0..256).filter(|&i| freqs[i] > 0).collect();
  let mut lengths = [0u8; 256];

  if present.is_empty() {
    return lengths;
  }
  if present.len() == 1 {
    lengths[present[0]] = 1;
    return lengths;
  }

  let mut heap = BinaryHeap::with_capacity(present.len());
  let mut next_id = 0usize;
  for &symbol in &present {
    heap.push(HeapItem {
      weight: freqs[symbol],
      id: next_id,
      node: Node::Leaf(symbol as u8),
    });
    next_id += 1;
  }

  while heap.len() > 1 {
    let a = heap.pop().unwrap();
    let b = heap.pop().unwrap();
    let weight = a.weight + b.weight;
    let id = next_id;
    next_id += 1;
    heap.push(HeapItem {
      weight,
      id,
      node: Node::Internal(Box::new(a.node), Box::new(b.node)),
    });
  }

  let root = heap.pop().unwrap();
  record_depths(&root.node, 0, &mut lengths);
  debug_assert!(lengths.iter().all(|&l| l as u32 <= MAX_HUFFMAN_CODE_LEN));
  lengths
}

/// Symbols present in `lengths`, sorted in canonical order: code length
/// ascending, then symbol value ascending.
pub fn canonical_order(lengths: &[u8; 256]) -> Vec<(u8, u8)> {
  let mut order: Vec<(u8, u8)> = (0..256u32)
    .filter(|&s| lengths[s as usize] > 0)
    .map(|s| (s as u8, lengths[s as usize]))
    .collect();
  order.sort_by_key(|&(symbol, length)| (length, symbol));
  order
}

/// Canonical (un-reversed) code values, parallel to `order`: first symbol
/// gets code `0`; each next code is `prev + 1`, left-shifted if length grew.
pub fn assign_codes(order: &[(u8, u8)]) -> Vec<u32> {
  let mut codes = Vec::with_capacity(order.len());
  if order.is_empty() {
    return codes;
  }
  let mut code: u32 = 0;
  let mut prev_length = order[0].1;
  for &(_, length) in order {
    code <<= length - prev_length;
    codes.push(code);
    code += 1;
    prev_length = length;
  }
  codes
}

/// Reverses the low `length` bits of `code`. The stored code word is bit
/// reversed relative to the canonical value so a plain LSB-first bit
/// writer emits the canonical code's most-significant bit first, which is
/// what the decoder's shift-and-compare loop expects.
pub fn reverse_bits(code: u32, length: u8) -> u32 {
  let mut r = 0u32;
  for i in 0..length {
    if (code >> i) & 1 == 1 {
      r |= 1 << (length - 1 - i);
    }
  }
  r
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_single_symbol_forces_length_one() {
    let lengths = build_lengths(&[7, 7, 7, 7]);
    assert_eq!(lengths[7], 1);
    assert_eq!(lengths.iter().filter(|&&l| l > 0).count(), 1);
  }

  #[test]
  fn test_empty_is_all_zero() {
    assert_eq!(build_lengths(&[]), [0u8; 256]);
  }

  #[test]
  fn test_lengths_bounded_by_fifteen() {
    let mut bytes = Vec::new();
    // one dominant symbol, 255 symbols with frequency 1 each: forces deep
    // tree that inflation must flatten back under the depth bound
    bytes.extend(std::iter::repeat(0u8).take(1_000_000));
    for s in 1..=255u8 {
      bytes.push(s);
    }
    let lengths = build_lengths(&bytes);
    assert!(lengths.iter().all(|&l| l as u32 <= MAX_HUFFMAN_CODE_LEN));
  }

  #[test]
  fn test_canonical_order_is_sorted() {
    let lengths = build_lengths(b"aaaaaaaabbbbccd");
    let order = canonical_order(&lengths);
    for w in order.windows(2) {
      assert!((w[0].1, w[0].0) <= (w[1].1, w[1].0));
    }
  }

  #[test]
  fn test_assign_codes_kraft_inequality() {
    let lengths = build_lengths(b"the quick brown fox jumps over the lazy dog the quick brown fox");
    let order = canonical_order(&lengths);
    let sum: u64 = order.iter().map(|&(_, l)| 1u64 << (15 - l as u32)).sum();
    assert!(sum <= 1 << 15);
  }

  #[test]
  fn test_reverse_bits_roundtrip() {
    for length in 1..=15u8 {
      for code in 0..(1u32 << length) {
        assert_eq!(reverse_bits(reverse_bits(code, length), length), code);
      }
    }
  }
}
