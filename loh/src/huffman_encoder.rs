//! Per-chunk canonical Huffman encoder. Operates on 32 KiB sub-chunks,
//! each independently tabled, with an incompressible-verbatim fallback.

use log::trace;

use crate::bit_writer::BitWriter;
use crate::constants::SUB_CHUNK_SIZE;
use crate::huffman_common::{assign_codes, build_lengths, canonical_order, reverse_bits};

fn write_unary_run(writer: &mut BitWriter, ones: u8) {
  for _ in 0..ones {
    writer.write_bit(true);
  }
  writer.write_bit(false);
}

/// `{0->1, 10->2, 110->3, 1110->4, 1111+8bits->raw}`.
fn write_symbol_delta(writer: &mut BitWriter, delta: i32, symbol: u8) {
  match delta {
    1 => writer.write_bit(false),
    2 => {
      writer.write_bit(true);
      writer.write_bit(false);
    }
    3 => {
      writer.write_bit(true);
      writer.write_bit(true);
      writer.write_bit(false);
    }
    4 => {
      writer.write_bit(true);
      writer.write_bit(true);
      writer.write_bit(true);
      writer.write_bit(false);
    }
    _ => {
      writer.write_bits(0b1111, 4);
      writer.write_bits(symbol as u64, 8);
    }
  }
}

fn write_table(writer: &mut BitWriter, order: &[(u8, u8)]) {
  writer.write_bits((order.len() - 1) as u64, 8);
  let mut running_length = 0u8;
  let mut prev_symbol: i32 = -1;
  for &(symbol, length) in order {
    write_unary_run(writer, length - running_length);
    running_length = length;
    let delta = symbol as i32 - prev_symbol;
    write_symbol_delta(writer, delta, symbol);
    prev_symbol = symbol as i32;
  }
}

/// Encodes one sub-chunk (at most [`SUB_CHUNK_SIZE`] bytes, nonempty) as a
/// standalone bit sequence starting with the compressible flag bit.
/// Returns `None` if Huffman coding didn't beat verbatim storage.
fn encode_subchunk_compressed(sub: &[u8]) -> Option<Vec<u8>> {
  let lengths = build_lengths(sub);
  let order = canonical_order(&lengths);
  let canonical_codes = assign_codes(&order);

  let mut code_by_symbol = [(0u32, 0u8); 256];
  for (&(symbol, length), &code) in order.iter().zip(canonical_codes.iter()) {
    code_by_symbol[symbol as usize] = (reverse_bits(code, length), length);
  }

  let mut writer = BitWriter::new();
  writer.write_bit(false); // compressible
  write_table(&mut writer, &order);
  writer.finish_byte();
  for &byte in sub {
    let (code, length) = code_by_symbol[byte as usize];
    writer.write_bits(code as u64, length as u32);
  }
  let bytes = writer.into_bytes();
  if bytes.len() >= sub.len() {
    None
  } else {
    Some(bytes)
  }
}

/// Returns `true` if the sub-chunk was stored verbatim (incompressible).
fn encode_subchunk(writer: &mut BitWriter, sub: &[u8]) -> bool {
  writer.write_aligned_bytes(&(sub.len() as u32).to_le_bytes());
  if sub.is_empty() {
    writer.write_bit(true);
    writer.finish_byte();
    return true;
  }

  match encode_subchunk_compressed(sub) {
    Some(compressed) => {
      writer.write_aligned_bytes(&compressed);
      false
    }
    None => {
      writer.write_bit(true); // incompressible
      writer.finish_byte();
      writer.write_aligned_bytes(sub);
      true
    }
  }
}

/// Encodes `bytes` as the Huffman sub-stream format: an 8-byte
/// decompressed length, then one record per 32 KiB sub-chunk.
pub fn encode(bytes: &[u8]) -> Vec<u8> {
  let mut writer = BitWriter::new();
  writer.write_aligned_bytes(&(bytes.len() as u64).to_le_bytes());

  let mut sub_chunks = 0usize;
  let mut incompressible = 0usize;
  for sub in bytes.chunks(SUB_CHUNK_SIZE.max(1)) {
    sub_chunks += 1;
    if encode_subchunk(&mut writer, sub) {
      incompressible += 1;
    }
  }
  trace!("huffman: {sub_chunks} sub-chunks, {incompressible} stored verbatim");

  writer.into_bytes()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::huffman_decoder::decode;

  #[test]
  fn test_empty_input() {
    let encoded = encode(&[]);
    assert_eq!(decode(&encoded).unwrap(), Vec::<u8>::new());
  }

  #[test]
  fn test_single_symbol_roundtrip() {
    let data = vec![42u8; 10_000];
    let encoded = encode(&data);
    assert_eq!(decode(&encoded).unwrap(), data);
  }

  #[test]
  fn test_skewed_text_compresses() {
    let data = "the quick brown fox jumps over the lazy dog ".repeat(2000);
    let encoded = encode(data.as_bytes());
    assert!(encoded.len() < data.len());
    assert_eq!(decode(&encoded).unwrap(), data.as_bytes());
  }

  #[test]
  fn test_incompressible_fallback_roundtrips() {
    let mut state = 0x243F6A8885A308D3u64;
    let data: Vec<u8> = (0..5000)
      .map(|_| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 256) as u8
      })
      .collect();
    let encoded = encode(&data);
    assert_eq!(decode(&encoded).unwrap(), data);
  }

  #[test]
  fn test_multi_sub_chunk_roundtrip() {
    let data: Vec<u8> = (0..SUB_CHUNK_SIZE * 3 + 17).map(|i| (i % 200) as u8).collect();
    let encoded = encode(&data);
    assert_eq!(decode(&encoded).unwrap(), data);
  }
}
