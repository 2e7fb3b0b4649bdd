//! Mirror of [`crate::lookback_encoder`]. Reads the token stream and
//! rebuilds the original bytes, copying match bytes one at a time so that
//! overlapping copies (distance shorter than the match length) correctly
//! replicate a repeating run. A token's distance field, not its
//! match-length field, says whether it carries a real match: `distance ==
//! 0` means literal-only, and a real match's wire length is
//! `MIN_MATCH_LEN` less than the bytes actually copied.

use crate::constants::MIN_MATCH_LEN;
use crate::errors::{LohError, LohResult};
use crate::varint::read_varint;

fn read_u64_le(data: &[u8], pos: &mut usize) -> LohResult<u64> {
  let bytes = data
    .get(*pos..*pos + 8)
    .ok_or_else(|| LohError::truncated("lookback header: missing decompressed length"))?;
  *pos += 8;
  Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_u32_le(data: &[u8], pos: &mut usize) -> LohResult<u32> {
  let bytes = data
    .get(*pos..*pos + 4)
    .ok_or_else(|| LohError::truncated("lookback header: missing max distance"))?;
  *pos += 4;
  Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_byte(data: &[u8], pos: &mut usize) -> LohResult<u8> {
  let b = *data
    .get(*pos)
    .ok_or_else(|| LohError::truncated("lookback stream ended before declared length"))?;
  *pos += 1;
  Ok(b)
}

/// Decodes a lookback sub-stream produced by [`crate::lookback_encoder::encode`].
pub fn decode(data: &[u8]) -> LohResult<Vec<u8>> {
  let mut pos = 0usize;
  let decomp_len = read_u64_le(data, &mut pos)?;
  let max_distance = read_u32_le(data, &mut pos)? as u64;

  let mut out: Vec<u8> = Vec::with_capacity(decomp_len as usize);
  let mut prev_lit_len: Option<usize> = None;

  while (out.len() as u64) < decomp_len {
    let header = read_byte(data, &mut pos)?;
    let same_length_mode = header & 1 == 1;

    // `wire_match_len` is read before the distance varint in both modes and
    // is only meaningful (and only `+= MIN_MATCH_LEN`'d) once we know below
    // that `distance > 0`; a distance of `0` means this token carries no
    // match at all, and `wire_match_len` is simply unused in that case.
    let (lit_len, wire_match_len, distance) = if same_length_mode {
      let match_short = ((header >> 1) & 0x1F) as u64;
      let wire_match_len = if match_short == 31 {
        31 + read_varint(data, &mut pos)
      } else {
        match_short
      };
      let distance = (read_varint(data, &mut pos) << 2) | ((header >> 6) as u64);
      let lit_len = prev_lit_len
        .ok_or_else(|| LohError::truncated("same-length token with no preceding literal run"))?;
      (lit_len, wire_match_len, distance)
    } else {
      let lit_short = (header >> 5) as u64;
      let match_short = ((header >> 1) & 0xF) as u64;
      let lit_len = if lit_short == 7 {
        7 + read_varint(data, &mut pos)
      } else {
        lit_short
      };
      let wire_match_len = if match_short == 15 {
        15 + read_varint(data, &mut pos)
      } else {
        match_short
      };
      let distance = read_varint(data, &mut pos);
      (lit_len as usize, wire_match_len, distance)
    };

    let lit_bytes = data
      .get(pos..pos + lit_len)
      .ok_or_else(|| LohError::truncated("lookback literal run ran past end of input"))?;
    out.extend_from_slice(lit_bytes);
    pos += lit_len;
    prev_lit_len = Some(lit_len);

    if distance > 0 {
      if distance > max_distance || distance as usize > out.len() {
        return Err(LohError::bad_distance(format!(
          "match distance {distance} invalid at output offset {} (max_distance {max_distance})",
          out.len()
        )));
      }
      let match_len = wire_match_len + MIN_MATCH_LEN as u64;
      let start = out.len() - distance as usize;
      for k in 0..match_len as usize {
        let b = out[start + k];
        out.push(b);
      }
    }
  }

  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lookback_encoder::encode;

  #[test]
  fn test_bad_distance_is_rejected() {
    // header byte: fresh mode, lit_short=0, wire match_short=4 (a real
    // match of 8 bytes once MIN_MATCH_LEN is added back); then a distance
    // varint larger than anything emitted yet (nothing has, lit_len=0).
    let mut data = Vec::new();
    data.extend_from_slice(&10u64.to_le_bytes());
    data.extend_from_slice(&1_000_000u32.to_le_bytes());
    data.push((4u8) << 1); // match_short=4, fresh mode, lit_short=0
    crate::varint::write_varint(&mut data, 999);
    let err = decode(&data).unwrap_err();
    assert_eq!(err.kind, crate::errors::ErrorKind::BadDistance);
  }

  #[test]
  fn test_truncated_stream_errors() {
    let data = vec![5u8; 4]; // too short to even hold the header
    let err = decode(&data).unwrap_err();
    assert_eq!(err.kind, crate::errors::ErrorKind::Truncated);
  }

  #[test]
  fn test_roundtrip_via_encoder() {
    let data = b"the quick brown fox the quick brown fox jumps over".to_vec();
    let encoded = encode(&data, 9);
    assert_eq!(decode(&encoded).unwrap(), data);
  }
}
