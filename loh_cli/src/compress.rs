use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use loh::LohConfig;

fn default_lookback_level() -> i32 {
  LohConfig::default().lookback_level
}

#[derive(Clone, Debug, Parser)]
pub struct CompressOpt {
  /// Path to the input file to compress.
  pub input: PathBuf,
  /// Path to write the compressed output to.
  pub output: PathBuf,
  /// Byte stride for the delta pre-filter, 0..=16. 0 autodetects a stride.
  #[arg(long, default_value_t = 0)]
  pub stride: usize,
  /// Lookback search level, -12..=12. 0 disables lookback matching.
  #[arg(long, default_value_t = default_lookback_level())]
  pub lookback_level: i32,
  /// Whether to run the Huffman coding stage: 0 disables it, nonzero enables it.
  #[arg(long, default_value_t = 1)]
  pub huffman: u8,
  /// Number of worker threads to use.
  #[arg(long, default_value_t = 1)]
  pub threads: usize,
}

pub fn compress(opt: CompressOpt) -> Result<()> {
  let input = fs::read(&opt.input)
    .with_context(|| format!("failed to read input file {:?}", opt.input))?;

  let config = LohConfig::default()
    .with_stride(opt.stride)
    .with_lookback_level(opt.lookback_level)
    .with_huffman(opt.huffman != 0);

  let compressed = loh::compress(&input, &config, opt.threads)
    .with_context(|| "failed to compress input")?;

  fs::write(&opt.output, compressed)
    .with_context(|| format!("failed to write output file {:?}", opt.output))?;

  log::info!(
    "compressed {} bytes from {:?} into {:?}",
    input.len(),
    opt.input,
    opt.output,
  );
  Ok(())
}
