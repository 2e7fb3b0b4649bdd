use clap::{Parser, Subcommand};

use crate::compress::CompressOpt;
use crate::decompress::DecompressOpt;

#[derive(Clone, Debug, Parser)]
#[command(about = "compress and decompress files with the LOH codec")]
pub struct OptWrapper {
  #[command(subcommand)]
  pub opt: Opt,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Opt {
  Compress(CompressOpt),
  Decompress(DecompressOpt),
}
