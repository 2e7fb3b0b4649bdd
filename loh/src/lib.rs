//! LOH ("Lookback + Huffman"): a chunked, thread-parallel, lossless
//! byte-stream codec. Three fixed pipeline stages -- byte-stride delta,
//! LZ77-style lookback matching, canonical length-limited Huffman coding
//! -- wrapped in a container format that lets chunks be produced and
//! consumed independently across worker threads.
//!
//! ```
//! use loh::{compress, decompress, LohConfig};
//!
//! let input = b"hello hello hello world".repeat(100);
//! let config = LohConfig::default();
//! let compressed = compress(&input, &config, 1).unwrap();
//! let restored = decompress(&compressed, true, 1).unwrap();
//! assert_eq!(restored, input);
//! ```

mod bit_reader;
mod bit_writer;
mod byte_buffer;
mod checksum;
mod config;
mod constants;
mod container;
mod delta;
mod errors;
mod huffman_common;
mod huffman_decoder;
mod huffman_encoder;
mod lookback_decoder;
mod lookback_encoder;
mod lookback_hash;
mod varint;
mod worker_pool;

pub use config::LohConfig;
pub use errors::{ErrorKind, LohError, LohResult};

/// Compresses `input` into the LOH container format.
///
/// `threads` controls how many worker threads handle chunk encoding; `1`
/// takes a sequential fast path. Fails only with
/// [`ErrorKind::InvalidArgument`] if `config`'s fields are out of range --
/// the container format and pipeline are otherwise infallible for any
/// input short of an allocation failure, which the default global
/// allocator aborts the process on rather than surfacing as an error.
pub fn compress(input: &[u8], config: &LohConfig, threads: usize) -> LohResult<Vec<u8>> {
  container::compress(input, config, threads)
}

/// Decompresses an LOH container produced by [`compress`].
///
/// `threads` controls how many worker threads handle chunk decoding. If
/// `verify_checksum` is set and the container's stored checksum is
/// nonzero, a mismatch after reassembly returns
/// [`ErrorKind::ChecksumMismatch`].
pub fn decompress(input: &[u8], verify_checksum: bool, threads: usize) -> LohResult<Vec<u8>> {
  container::decompress(input, verify_checksum, threads)
}
