//! The byte-stride delta pre-filter: `b[i] -= b[i-stride]` on encode,
//! `b[i] += b[i-stride]` on decode, plus autodetection of a profitable
//! stride for multichannel numeric data (PCM audio, RGB/RGBA rows).

use log::trace;

use crate::constants::{MAX_STRIDE, MIN_STRIDE};

/// Applies the forward delta filter in place. Iterates high-to-low so each
/// `b[i]` is adjusted using the still-original `b[i-stride]`.
pub fn encode_in_place(bytes: &mut [u8], stride: usize) {
  if stride == 0 || bytes.len() <= stride {
    return;
  }
  for i in (stride..bytes.len()).rev() {
    bytes[i] = bytes[i].wrapping_sub(bytes[i - stride]);
  }
}

/// Applies the inverse delta filter in place. Iterates low-to-high so each
/// `b[i]` is reconstructed using the already-reconstructed `b[i-stride]`.
pub fn decode_in_place(bytes: &mut [u8], stride: usize) {
  if stride == 0 || bytes.len() <= stride {
    return;
  }
  for i in stride..bytes.len() {
    bytes[i] = bytes[i].wrapping_add(bytes[i - stride]);
  }
}

const PROBE_SAMPLES: usize = 4096;
const DISTINCT_VALUE_PROBE: usize = 4096;
const MIN_DISTINCT_VALUES: usize = 128;

/// A small, explicitly seeded splitmix64-style generator. Using a fixed,
/// input-derived seed (rather than a thread-local `rand::thread_rng`) keeps
/// `compress` reproducible for identical input and config, the way the
/// reference codec family prefers explicit, seedable randomness
/// (`rand_xoshiro` is a direct, non-dev dependency of `pco`) over ambient
/// global RNG state.
struct SplitMix64 {
  state: u64,
}

impl SplitMix64 {
  fn new(seed: u64) -> Self {
    Self { state: seed }
  }

  fn next(&mut self) -> u64 {
    self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = self.state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
  }

  fn next_index(&mut self, bound: usize) -> usize {
    if bound == 0 {
      0
    } else {
      (self.next() % bound as u64) as usize
    }
  }
}

fn has_enough_distinct_values(bytes: &[u8], rng: &mut SplitMix64) -> bool {
  let mut seen = [false; 256];
  let mut distinct = 0usize;
  let samples = DISTINCT_VALUE_PROBE.min(bytes.len());
  for _ in 0..samples {
    let idx = rng.next_index(bytes.len());
    let b = bytes[idx] as usize;
    if !seen[b] {
      seen[b] = true;
      distinct += 1;
      if distinct >= MIN_DISTINCT_VALUES {
        return true;
      }
    }
  }
  distinct >= MIN_DISTINCT_VALUES
}

fn mean_abs_diff<F>(bytes: &[u8], rng: &mut SplitMix64, pick: F) -> f64
where
  F: Fn(usize, &mut SplitMix64) -> Option<(usize, usize)>,
{
  let mut total = 0u64;
  let mut count = 0u64;
  for _ in 0..PROBE_SAMPLES {
    if let Some((a, b)) = pick(bytes.len(), rng) {
      let diff = (bytes[a] as i32 - bytes[b] as i32).unsigned_abs();
      total += diff as u64;
      count += 1;
    }
  }
  if count == 0 {
    0.0
  } else {
    total as f64 / count as f64
  }
}

/// Tries strides `1..=16` and returns the one whose mean absolute
/// `b[i]-b[i+stride]` difference is strictly lower than both the baseline
/// (random-pair) probe and every previously accepted candidate, and lower
/// than half the baseline -- hysteresis against selecting a delta on noisy
/// data where it would not pay for itself.
///
/// Returns `0` (meaning "no stride selected") if the input doesn't look
/// like structured multichannel data at all, or no candidate clears the
/// bar.
pub fn autodetect_stride(bytes: &[u8]) -> usize {
  if bytes.len() <= MAX_STRIDE {
    return 0;
  }

  let mut rng = SplitMix64::new(bytes.len() as u64 ^ 0xD1B5_4A32_D192_ED03);

  if !has_enough_distinct_values(bytes, &mut rng) {
    trace!("delta autodetect: fewer than {MIN_DISTINCT_VALUES} distinct byte values, skipping");
    return 0;
  }

  let baseline = mean_abs_diff(bytes, &mut rng, |len, rng| {
    if len < 2 {
      return None;
    }
    let a = rng.next_index(len);
    let b = rng.next_index(len);
    Some((a, b))
  });

  if baseline == 0.0 {
    trace!("delta autodetect: baseline probe is zero, skipping");
    return 0;
  }

  let mut best_stride = 0usize;
  let mut best_probe = baseline;

  for stride in MIN_STRIDE..=MAX_STRIDE {
    if bytes.len() <= stride {
      continue;
    }
    let probe = mean_abs_diff(bytes, &mut rng, |len, rng| {
      if len <= stride {
        return None;
      }
      let i = rng.next_index(len - stride);
      Some((i, i + stride))
    });

    if probe < best_probe && probe < baseline / 2.0 {
      best_probe = probe;
      best_stride = stride;
    }
  }

  if best_stride == 0 {
    trace!("delta autodetect: no stride selected (baseline={baseline})");
  } else {
    trace!("delta autodetect: selected stride={best_stride} (probe={best_probe}, baseline={baseline})");
  }
  best_stride
}
