//! End-to-end tests against the public `compress`/`decompress` API, covering
//! the round-trip/checksum/determinism properties and the concrete scenarios
//! these were derived from.

use loh::{compress, decompress, ErrorKind, LohConfig};

fn config_for(stride: usize, lookback_level: i32, huffman: bool) -> LohConfig {
  let mut config = LohConfig::default().with_lookback_level(lookback_level).with_huffman(huffman);
  config.stride = stride;
  config.autodetect_stride = false;
  config
}

fn sample_inputs() -> Vec<Vec<u8>> {
  vec![
    Vec::new(),
    b"hello hello hello hello world".to_vec(),
    vec![0x41u8; 256],
    (0..=255u8).chain(0..=255u8).collect(),
    {
      let mut v = Vec::with_capacity(4096);
      let mut state = 0x1234_5678u32;
      for _ in 0..4096 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        v.push((state & 0xFF) as u8);
      }
      v
    },
    (0u32..1024).flat_map(|x| [(x % 256) as u8, ((x + 7) % 256) as u8]).collect(),
  ]
}

#[test]
fn test_roundtrip_over_full_config_product() {
  let strides = [0, 1, 2, 3, 4, 8, 16];
  let levels = [-12, -1, 0, 1, 4, 9, 12];
  let inputs = sample_inputs();

  for input in &inputs {
    for &stride in &strides {
      for &level in &levels {
        for &huffman in &[false, true] {
          let config = config_for(stride, level, huffman);
          let encoded = compress(input, &config, 1)
            .unwrap_or_else(|e| panic!("compress failed for stride={stride} level={level} huffman={huffman}: {e}"));
          let decoded = decompress(&encoded, true, 1)
            .unwrap_or_else(|e| panic!("decompress failed for stride={stride} level={level} huffman={huffman}: {e}"));
          assert_eq!(&decoded, input, "roundtrip mismatch: stride={stride} level={level} huffman={huffman}");
        }
      }
    }
  }
}

#[test]
fn test_checksum_corruption_is_detected() {
  let config = LohConfig::default();
  let data = vec![7u8; 5000];
  let mut encoded = compress(&data, &config, 1).unwrap();

  // corrupt a byte well inside the chunk payload section
  let idx = encoded.len() - 10;
  encoded[idx] ^= 0xFF;

  let result = decompress(&encoded, true, 1);
  assert!(result.is_err(), "corrupted container should fail verification");
}

#[test]
fn test_checksum_matches_when_uncorrupted() {
  let config = LohConfig::default();
  let data: Vec<u8> = (0..10_000u32).map(|i| (i * 31 % 256) as u8).collect();
  let encoded = compress(&data, &config, 1).unwrap();
  assert_eq!(decompress(&encoded, true, 1).unwrap(), data);
}

#[test]
fn test_determinism_across_thread_counts() {
  let config = LohConfig::default();
  let data: Vec<u8> = (0..300_000u32).map(|i| ((i * 37) % 251) as u8).collect();
  let reference = compress(&data, &config, 1).unwrap();
  for threads in [1, 2, 3, 8, 16] {
    let encoded = compress(&data, &config, threads).unwrap();
    assert_eq!(encoded, reference, "output differs with threads={threads}");
  }
}

#[test]
fn test_determinism_single_threaded_repeat() {
  let config = LohConfig::default();
  let data = b"the quick brown fox jumps over the lazy dog".repeat(50);
  let a = compress(&data, &config, 1).unwrap();
  let b = compress(&data, &config, 1).unwrap();
  assert_eq!(a, b);
}

// Concrete end-to-end scenarios.

#[test]
fn test_scenario_empty_input() {
  let config = config_for(0, 0, false);
  let encoded = compress(&[], &config, 1).unwrap();
  assert_eq!(&encoded[0..4], b"LOHz");
  let chunk_count = u64::from_le_bytes(encoded[8..16].try_into().unwrap());
  assert_eq!(chunk_count, 0);
  assert_eq!(decompress(&encoded, true, 1).unwrap(), Vec::<u8>::new());
}

#[test]
fn test_scenario_repeated_byte_run() {
  let config = config_for(0, 4, true);
  let data = vec![0x41u8; 256];
  let encoded = compress(&data, &config, 1).unwrap();
  assert_eq!(decompress(&encoded, true, 1).unwrap(), data);
}

#[test]
fn test_scenario_doubled_byte_sequence() {
  let config = config_for(0, 4, false);
  let data: Vec<u8> = (0..=255u8).chain(0..=255u8).collect();
  let encoded = compress(&data, &config, 1).unwrap();
  assert_eq!(decompress(&encoded, true, 1).unwrap(), data);
}

#[test]
fn test_scenario_random_bytes_incompressible_fallback() {
  let config = config_for(0, 0, true);
  let mut data = Vec::with_capacity(4096);
  let mut state = 0xC0FF_EEu32;
  for _ in 0..4096 {
    state ^= state << 13;
    state ^= state >> 17;
    state ^= state << 5;
    data.push((state & 0xFF) as u8);
  }
  let encoded = compress(&data, &config, 1).unwrap();
  assert_eq!(decompress(&encoded, true, 1).unwrap(), data);
}

#[test]
fn test_scenario_stride_autodetect_beats_no_delta() {
  let data: Vec<u8> = (0u32..1024).flat_map(|x| [(x % 256) as u8, ((x + 7) % 256) as u8]).collect();

  let mut autodetect = LohConfig::default().with_lookback_level(4);
  autodetect.stride = 0;
  autodetect.autodetect_stride = true;
  let with_autodetect = compress(&data, &autodetect, 1).unwrap();

  let no_delta = config_for(0, 4, true);
  let without_delta = compress(&data, &no_delta, 1).unwrap();

  assert!(
    with_autodetect.len() < without_delta.len(),
    "autodetected stride ({} bytes) should beat no delta ({} bytes)",
    with_autodetect.len(),
    without_delta.len(),
  );
  assert_eq!(decompress(&with_autodetect, true, 1).unwrap(), data);
}

#[test]
fn test_scenario_corrupt_byte_seventeen_fails_deterministically() {
  let config = LohConfig::default();
  let data = b"some reasonably long payload to compress for this scenario".repeat(20);
  let mut encoded = compress(&data, &config, 1).unwrap();
  encoded[17] ^= 0xFF;
  assert!(decompress(&encoded, true, 1).is_err());
}

#[test]
fn test_invalid_config_surfaces_invalid_argument() {
  let config = LohConfig::default().with_stride(200);
  let err = compress(b"abc", &config, 1).unwrap_err();
  assert_eq!(err.kind, ErrorKind::InvalidArgument);
}
