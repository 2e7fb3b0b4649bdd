use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Clone, Debug, Parser)]
pub struct DecompressOpt {
  /// Path to the compressed input file.
  pub input: PathBuf,
  /// Path to write the decompressed output to.
  pub output: PathBuf,
  /// Number of worker threads to use.
  #[arg(long, default_value_t = 1)]
  pub threads: usize,
  /// Reject the input if its stored checksum doesn't match the decompressed
  /// bytes.
  #[arg(long, default_value_t = false)]
  pub verify: bool,
}

pub fn decompress(opt: DecompressOpt) -> Result<()> {
  let input = fs::read(&opt.input)
    .with_context(|| format!("failed to read input file {:?}", opt.input))?;

  let decompressed = loh::decompress(&input, opt.verify, opt.threads)
    .with_context(|| "failed to decompress input")?;

  fs::write(&opt.output, &decompressed)
    .with_context(|| format!("failed to write output file {:?}", opt.output))?;

  log::info!(
    "decompressed {:?} into {} bytes at {:?}",
    opt.input,
    decompressed.len(),
    opt.output,
  );
  Ok(())
}
