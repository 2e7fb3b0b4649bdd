//! Mirror of [`crate::huffman_encoder`]: reconstructs each sub-chunk's
//! canonical table from its bit-packed description, then runs the
//! shift-and-compare decode loop.

use crate::bit_reader::BitReader;
use crate::constants::MAX_HUFFMAN_CODE_LEN;
use crate::errors::{LohError, LohResult};

fn read_unary_run(reader: &mut BitReader) -> u8 {
  let mut ones = 0u8;
  while reader.read_bit() {
    ones += 1;
  }
  ones
}

/// Mirrors `write_symbol_delta`: three bounded unary codes for deltas
/// 1..=4, or a `1111` escape followed by a raw 8-bit absolute symbol.
enum SymbolStep {
  Delta(i32),
  Absolute(u8),
}

fn read_symbol_delta(reader: &mut BitReader) -> SymbolStep {
  let mut ones = 0u8;
  while ones < 4 && reader.read_bit() {
    ones += 1;
  }
  if ones < 4 {
    SymbolStep::Delta(ones as i32 + 1)
  } else {
    SymbolStep::Absolute(reader.read_bits(8) as u8)
  }
}

struct CanonicalTable {
  symbols_by_length: [Vec<u8>; 16],
  first_code: [u32; 16],
}

impl CanonicalTable {
  fn decode_one(&self, reader: &mut BitReader) -> LohResult<u8> {
    let mut code: u32 = 0;
    let mut length: usize = 1;
    loop {
      code = (code << 1) | (reader.read_bit() as u32);
      let bucket = &self.symbols_by_length[length];
      let maxcode = self.first_code[length] + bucket.len() as u32;
      if code < maxcode {
        let rank = (code - self.first_code[length]) as usize;
        return Ok(bucket[rank]);
      }
      length += 1;
      if length as u32 > MAX_HUFFMAN_CODE_LEN {
        return Err(LohError::bad_huffman_table(
          "huffman decode: no code matched within 15 bits",
        ));
      }
    }
  }
}

fn read_table(reader: &mut BitReader) -> LohResult<CanonicalTable> {
  let symbol_count = reader.read_bits(8) as usize + 1;

  let mut symbols_by_length: [Vec<u8>; 16] = Default::default();
  let mut running_length = 0u8;
  let mut prev_symbol: i32 = -1;

  for _ in 0..symbol_count {
    let delta_len = read_unary_run(reader);
    running_length += delta_len;
    if running_length as u32 > MAX_HUFFMAN_CODE_LEN {
      return Err(LohError::bad_huffman_table(format!(
        "huffman table: code length {running_length} exceeds {MAX_HUFFMAN_CODE_LEN}"
      )));
    }
    let symbol = match read_symbol_delta(reader) {
      SymbolStep::Delta(d) => prev_symbol + d,
      SymbolStep::Absolute(s) => s as i32,
    };
    if !(0..256).contains(&symbol) {
      return Err(LohError::bad_huffman_table("huffman table: symbol out of range"));
    }
    symbols_by_length[running_length as usize].push(symbol as u8);
    prev_symbol = symbol;
  }

  let mut first_code = [0u32; 16];
  for length in 1..16 {
    let count = symbols_by_length[length].len() as u32;
    if length < 15 {
      first_code[length + 1] = (first_code[length] + count) << 1;
    }
  }

  Ok(CanonicalTable {
    symbols_by_length,
    first_code,
  })
}

fn decode_subchunk(data: &[u8], pos: &mut usize) -> LohResult<Vec<u8>> {
  let len_bytes = data
    .get(*pos..*pos + 4)
    .ok_or_else(|| LohError::truncated("huffman sub-chunk: missing length prefix"))?;
  let sub_len = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
  *pos += 4;

  if sub_len == 0 {
    // encoder writes a single "incompressible" flag bit then aligns
    *pos += 1;
    return Ok(Vec::new());
  }

  let rest = data
    .get(*pos..)
    .ok_or_else(|| LohError::truncated("huffman sub-chunk: truncated body"))?;
  let mut reader = BitReader::new(rest);
  let incompressible = reader.read_bit();

  let out = if incompressible {
    reader.finish_byte();
    reader.read_aligned_bytes(sub_len)
  } else {
    let table = read_table(&mut reader)?;
    reader.finish_byte();
    let mut out = Vec::with_capacity(sub_len);
    for _ in 0..sub_len {
      out.push(table.decode_one(&mut reader)?);
    }
    out
  };

  reader.finish_byte();
  *pos += reader.byte_idx();
  Ok(out)
}

/// Decodes a Huffman sub-stream produced by [`crate::huffman_encoder::encode`].
pub fn decode(data: &[u8]) -> LohResult<Vec<u8>> {
  let decomp_len_bytes = data
    .get(0..8)
    .ok_or_else(|| LohError::truncated("huffman stream: missing decompressed length"))?;
  let decomp_len = u64::from_le_bytes(decomp_len_bytes.try_into().unwrap()) as usize;
  let mut pos = 8usize;

  let mut out = Vec::with_capacity(decomp_len);
  while out.len() < decomp_len {
    out.extend_from_slice(&decode_subchunk(data, &mut pos)?);
  }
  if out.len() != decomp_len {
    return Err(LohError::truncated("huffman stream: sub-chunks overran declared length"));
  }
  Ok(out)
}
