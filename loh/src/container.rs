//! Top-level container format: magic, checksum, chunk offset table, then
//! per-chunk `{stride, lookback_level, huffman_flag, reserved}` headers
//! followed by each chunk's compressed payload. Ties together delta,
//! lookback and Huffman into the fixed three-stage pipeline and schedules
//! chunks across [`crate::worker_pool::WorkerPool`].

use log::{debug, trace};

use crate::checksum::checksum;
use crate::config::LohConfig;
use crate::constants::{
  LOOKBACK_MARGINAL_RATIO_PLAIN, LOOKBACK_MARGINAL_RATIO_WITH_DELTA, MAGIC_HEADER, MIN_CHUNK_SIZE,
  TARGET_PARALLELISM,
};
use crate::delta;
use crate::errors::{LohError, LohResult};
use crate::huffman_decoder;
use crate::huffman_encoder;
use crate::lookback_decoder;
use crate::lookback_encoder;
use crate::worker_pool::WorkerPool;

fn compute_chunk_count(len: usize) -> usize {
  if len == 0 {
    return 0;
  }
  let by_size = len.div_ceil(MIN_CHUNK_SIZE).max(1);
  TARGET_PARALLELISM.min(by_size)
}

fn chunk_bounds(len: usize, chunk_count: usize) -> Vec<(usize, usize)> {
  if chunk_count == 0 {
    return Vec::new();
  }
  let chunk_size = len.div_ceil(chunk_count);
  let mut bounds = Vec::with_capacity(chunk_count);
  let mut start = 0;
  while start < len {
    let end = (start + chunk_size).min(len);
    bounds.push((start, end));
    start = end;
  }
  bounds
}

struct EncodedChunk {
  stride: u8,
  lookback_level: i8,
  huffman_flag: u8,
  payload: Vec<u8>,
}

fn encode_chunk(bytes: &[u8], config: &LohConfig) -> EncodedChunk {
  let effective_stride = if config.stride == 0 {
    if config.autodetect_stride {
      delta::autodetect_stride(bytes)
    } else {
      0
    }
  } else {
    config.stride
  };

  let mut post_delta = bytes.to_vec();
  if effective_stride > 0 {
    delta::encode_in_place(&mut post_delta, effective_stride);
  }

  let mut lookback_applied = false;
  let mut lookback_level_used = 0i32;
  let mut best_buffer = post_delta.clone();

  if config.lookback_level != 0 {
    let candidate = lookback_encoder::encode(&post_delta, config.lookback_level);
    if candidate.len() < post_delta.len() {
      lookback_applied = true;
      lookback_level_used = config.lookback_level;
      best_buffer = candidate;
    }
  }

  let mut huffman_flag = false;
  let final_buffer = if config.huffman {
    let mut best_huffman = {
      let candidate = huffman_encoder::encode(&best_buffer);
      (candidate.len() < best_buffer.len()).then_some(candidate)
    };

    let ratio = best_buffer.len() as f64 / post_delta.len().max(1) as f64;
    let threshold = if effective_stride > 0 {
      LOOKBACK_MARGINAL_RATIO_WITH_DELTA
    } else {
      LOOKBACK_MARGINAL_RATIO_PLAIN
    };
    let try_pre_lookback = lookback_applied && ratio > threshold;

    if try_pre_lookback {
      let candidate = huffman_encoder::encode(&post_delta);
      let pre_is_smaller = candidate.len() < post_delta.len();
      let pre_is_better = pre_is_smaller
        && best_huffman.as_ref().map(|b| candidate.len() < b.len()).unwrap_or(true);
      if pre_is_better {
        lookback_applied = false;
        lookback_level_used = 0;
        best_buffer = post_delta.clone();
        best_huffman = Some(candidate);
      }
    }

    match best_huffman {
      Some(h) => {
        huffman_flag = true;
        h
      }
      None => best_buffer.clone(),
    }
  } else {
    best_buffer.clone()
  };

  trace!(
    "chunk: {} bytes -> {} bytes (stride={effective_stride}, lookback={}, huffman={huffman_flag})",
    bytes.len(),
    final_buffer.len(),
    if lookback_applied { lookback_level_used } else { 0 },
  );

  EncodedChunk {
    stride: effective_stride as u8,
    lookback_level: if lookback_applied { lookback_level_used as i8 } else { 0 },
    huffman_flag: huffman_flag as u8,
    payload: final_buffer,
  }
}

fn decode_chunk(payload: &[u8], stride: u8, lookback_level: i8, huffman_flag: u8) -> LohResult<Vec<u8>> {
  let mut buf = if huffman_flag != 0 {
    huffman_decoder::decode(payload)?
  } else {
    payload.to_vec()
  };
  if lookback_level != 0 {
    buf = lookback_decoder::decode(&buf)?;
  }
  if stride != 0 {
    delta::decode_in_place(&mut buf, stride as usize);
  }
  Ok(buf)
}

/// Compresses `input` into the LOH container format using `threads`
/// worker threads (`1` runs sequentially). Returns [`crate::errors::ErrorKind::InvalidArgument`]
/// if `config` is out of range.
pub fn compress(input: &[u8], config: &LohConfig, threads: usize) -> LohResult<Vec<u8>> {
  config.validate()?;

  let chunk_count = compute_chunk_count(input.len());
  let bounds = chunk_bounds(input.len(), chunk_count);
  debug!("compress: {} bytes into {} chunk(s)", input.len(), bounds.len());

  let pool = WorkerPool::new(threads);
  let config = *config;
  let jobs: Vec<_> = bounds
    .iter()
    .map(|&(start, end)| {
      let slice = input[start..end].to_vec();
      move || encode_chunk(&slice, &config)
    })
    .collect();
  let encoded = pool.map(jobs);

  let mut out = Vec::with_capacity(input.len() / 2 + 64);
  out.extend_from_slice(&MAGIC_HEADER);
  out.extend_from_slice(&checksum(input).to_le_bytes());
  out.extend_from_slice(&(encoded.len() as u64).to_le_bytes());

  let mut offset_table = Vec::with_capacity(encoded.len() + 1);
  let mut comp_off = 0u64;
  let mut decomp_off = 0u64;
  let header_block_len = 4u64; // stride, level, huffman_flag, reserved
  for (chunk, &(start, end)) in encoded.iter().zip(bounds.iter()) {
    offset_table.push((comp_off, decomp_off));
    comp_off += header_block_len + chunk.payload.len() as u64;
    decomp_off += (end - start) as u64;
  }
  offset_table.push((comp_off, decomp_off));

  for &(c, d) in &offset_table {
    out.extend_from_slice(&c.to_le_bytes());
    out.extend_from_slice(&d.to_le_bytes());
  }

  for chunk in &encoded {
    out.push(chunk.stride);
    out.push(chunk.lookback_level as u8);
    out.push(chunk.huffman_flag);
    out.push(0);
    out.extend_from_slice(&chunk.payload);
  }

  Ok(out)
}

fn read_u64_le(data: &[u8], pos: usize) -> LohResult<u64> {
  data
    .get(pos..pos + 8)
    .map(|b| u64::from_le_bytes(b.try_into().unwrap()))
    .ok_or_else(|| LohError::truncated("container: truncated while reading a 64-bit field"))
}

fn read_u32_le(data: &[u8], pos: usize) -> LohResult<u32> {
  data
    .get(pos..pos + 4)
    .map(|b| u32::from_le_bytes(b.try_into().unwrap()))
    .ok_or_else(|| LohError::truncated("container: truncated while reading a 32-bit field"))
}

/// Decompresses an LOH container. If `verify_checksum` is set and the
/// stored checksum is nonzero, mismatches return [`crate::errors::ErrorKind::ChecksumMismatch`].
pub fn decompress(input: &[u8], verify_checksum: bool, threads: usize) -> LohResult<Vec<u8>> {
  if input.len() < 4 || input[0..4] != MAGIC_HEADER {
    return Err(LohError::bad_magic("container does not start with the LOH magic header"));
  }
  let stored_checksum = read_u32_le(input, 4)?;
  let chunk_count = read_u64_le(input, 8)? as usize;

  let offsets_start = 16usize;
  let mut offsets = Vec::with_capacity(chunk_count + 1);
  for i in 0..=chunk_count {
    let base = offsets_start + i * 16;
    let comp_off = read_u64_le(input, base)?;
    let decomp_off = read_u64_le(input, base + 8)?;
    offsets.push((comp_off, decomp_off));
  }

  let payload_start = offsets_start + (chunk_count + 1) * 16;
  let total_compressed_len = offsets.last().map(|&(c, _)| c).unwrap_or(0);
  let total_decompressed_len = offsets.last().map(|&(_, d)| d).unwrap_or(0) as usize;

  let payload = input
    .get(payload_start..)
    .ok_or_else(|| LohError::truncated("container: missing chunk payload section"))?;
  if (payload.len() as u64) < total_compressed_len {
    return Err(LohError::truncated("container: payload shorter than declared compressed length"));
  }

  let mut jobs: Vec<Box<dyn FnOnce() -> LohResult<Vec<u8>> + Send>> = Vec::with_capacity(chunk_count);
  for i in 0..chunk_count {
    let (chunk_comp_start, _) = offsets[i];
    let (chunk_comp_end, _) = offsets[i + 1];
    let header = payload
      .get(chunk_comp_start as usize..chunk_comp_start as usize + 4)
      .ok_or_else(|| LohError::truncated("container: missing chunk flags"))?;
    let (stride, lookback_level, huffman_flag) = (header[0], header[1] as i8, header[2]);
    let body_start = chunk_comp_start as usize + 4;
    let body_end = chunk_comp_end as usize;
    let body = payload
      .get(body_start..body_end)
      .ok_or_else(|| LohError::truncated("container: chunk payload out of range"))?
      .to_vec();
    jobs.push(Box::new(move || decode_chunk(&body, stride, lookback_level, huffman_flag)));
  }

  let pool = WorkerPool::new(threads);
  let results = pool.map(jobs);

  let mut out = Vec::with_capacity(total_decompressed_len);
  for result in results {
    out.extend_from_slice(&result?);
  }

  if verify_checksum && stored_checksum != 0 {
    let recomputed = checksum(&out);
    if recomputed != stored_checksum {
      return Err(LohError::checksum_mismatch(format!(
        "stored checksum {stored_checksum:#010x} != recomputed {recomputed:#010x}"
      )));
    }
  }

  Ok(out)
}
