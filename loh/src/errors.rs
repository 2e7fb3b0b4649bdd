use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// The different kinds of errors the library can return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
  /// The 4-byte container prefix did not match `"LOHz"`.
  BadMagic,
  /// A read reached past the end of the input before finishing.
  Truncated,
  /// A lookback token's distance exceeded the bytes decoded so far.
  BadDistance,
  /// A Huffman table would require a code length greater than 15 bits.
  BadHuffmanTable,
  /// Verification was requested, the stored checksum was nonzero, and it
  /// did not match the recomputed checksum.
  ChecksumMismatch,
  /// The parameters provided to `compress` were out of range.
  InvalidArgument,
}

/// The error type used in results for all `loh` functionality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LohError {
  pub kind: ErrorKind,
  pub message: String,
}

impl LohError {
  pub(crate) fn new<S: AsRef<str>>(kind: ErrorKind, message: S) -> Self {
    LohError {
      kind,
      message: message.as_ref().to_string(),
    }
  }

  pub(crate) fn bad_magic<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::BadMagic, message)
  }

  pub(crate) fn truncated<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::Truncated, message)
  }

  pub(crate) fn bad_distance<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::BadDistance, message)
  }

  pub(crate) fn bad_huffman_table<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::BadHuffmanTable, message)
  }

  pub(crate) fn checksum_mismatch<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::ChecksumMismatch, message)
  }

  pub(crate) fn invalid_argument<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::InvalidArgument, message)
  }
}

impl Display for LohError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "loh {:?} error: {}", self.kind, &self.message)
  }
}

impl Error for LohError {}

pub type LohResult<T> = Result<T, LohError>;
