use crate::constants::{DEFAULT_LOOKBACK_LEVEL, MAX_LOOKBACK_LEVEL, MAX_STRIDE, MIN_LOOKBACK_LEVEL};
use crate::errors::{LohError, LohResult};

/// Configures a single `compress` call.
///
/// `stride = 0` disables the delta filter (and, if nonzero, enables
/// autodetection of a profitable stride when the input looks like
/// multichannel numeric data). `lookback_level = 0` disables the LZ77-style
/// lookback stage. `huffman = false` disables the Huffman stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LohConfig {
  /// Byte stride used by the delta pre-filter, `0..=16`. `0` means "try to
  /// autodetect a good stride", not "no delta" -- see
  /// [`with_stride`][LohConfig::with_stride] for the escape hatch.
  pub stride: usize,
  /// Whether stride `0` should run autodetection at all. Defaults to `true`.
  /// Set to `false` along with `stride = 0` to force delta off entirely.
  pub autodetect_stride: bool,
  /// Controls both the chain-search depth and the maximum back-reference
  /// distance of the lookback stage, `-12..=12` (default `9`). `0` disables
  /// lookback entirely.
  pub lookback_level: i32,
  /// Whether the Huffman stage runs after lookback (default `true`).
  pub huffman: bool,
}

impl Default for LohConfig {
  fn default() -> Self {
    Self {
      stride: 0,
      autodetect_stride: true,
      lookback_level: DEFAULT_LOOKBACK_LEVEL,
      huffman: true,
    }
  }
}

impl LohConfig {
  /// Disables every stage; `compress` becomes the identity function plus
  /// container framing.
  pub fn uncompressed() -> Self {
    Self {
      stride: 0,
      autodetect_stride: false,
      lookback_level: 0,
      huffman: false,
    }
  }

  /// Sets [`stride`][LohConfig::stride] to an exact value and disables
  /// autodetection.
  pub fn with_stride(mut self, stride: usize) -> Self {
    self.stride = stride;
    self.autodetect_stride = false;
    self
  }

  /// Sets [`lookback_level`][LohConfig::lookback_level].
  pub fn with_lookback_level(mut self, level: i32) -> Self {
    self.lookback_level = level;
    self
  }

  /// Sets [`huffman`][LohConfig::huffman].
  pub fn with_huffman(mut self, huffman: bool) -> Self {
    self.huffman = huffman;
    self
  }

  pub(crate) fn validate(&self) -> LohResult<()> {
    if self.stride > MAX_STRIDE {
      return Err(LohError::invalid_argument(format!(
        "stride must be at most {} (was {})",
        MAX_STRIDE, self.stride,
      )));
    }
    if self.lookback_level < MIN_LOOKBACK_LEVEL || self.lookback_level > MAX_LOOKBACK_LEVEL {
      return Err(LohError::invalid_argument(format!(
        "lookback_level must be within {}..={} (was {})",
        MIN_LOOKBACK_LEVEL, MAX_LOOKBACK_LEVEL, self.lookback_level,
      )));
    }
    Ok(())
  }
}
