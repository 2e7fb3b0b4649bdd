use anyhow::Result;
use clap::Parser;

use crate::opt::{Opt, OptWrapper};

mod compress;
mod decompress;
mod opt;

fn main() -> Result<()> {
  env_logger::init();
  let opt = OptWrapper::parse().opt;
  match opt {
    Opt::Compress(compress_opt) => compress::compress(compress_opt),
    Opt::Decompress(decompress_opt) => decompress::decompress(decompress_opt),
  }
}
