pub const MAGIC_HEADER: [u8; 4] = [0x4C, 0x4F, 0x48, 0x7A]; // ascii "LOHz"

pub const MIN_STRIDE: usize = 1;
pub const MAX_STRIDE: usize = 16;

pub const MIN_LOOKBACK_LEVEL: i32 = -12;
pub const MAX_LOOKBACK_LEVEL: i32 = 12;

pub const MIN_MATCH_LEN: usize = 4;
pub const HASH_SIZE_LOG: u32 = 17;
pub const HASH_SIZE: usize = 1 << HASH_SIZE_LOG;
pub const PREV_SIZE_LOG: u32 = 17;
pub const PREV_SIZE: usize = 1 << PREV_SIZE_LOG;
pub const HASH_MULTIPLIER: u32 = 0xA68B_B0D5;

pub const LAZY_MATCH_EARLY_EXIT_LEN: usize = 128;
pub const LAZY_MATCH_HALVE_BUDGET_LEN: usize = 48;

pub const SUB_CHUNK_SIZE: usize = 32 * 1024;
pub const MIN_CHUNK_SIZE: usize = 32 * 1024;

pub const MAX_HUFFMAN_CODE_LEN: u32 = 15;
pub const HUFFMAN_FLOOR_SHIFT: u32 = 14;

pub const CHECKSUM_SEED: u32 = 0x8765_4321;
pub const CHECKSUM_PRIME: u32 = 0x1011_B0D5;

pub const DEFAULT_LOOKBACK_LEVEL: i32 = 9;

/// Chunk count is computed from input length alone (capped by this target),
/// never from the caller's requested thread count, so container output is
/// thread-count-invariant.
pub const TARGET_PARALLELISM: usize = 8;

pub const LOOKBACK_MARGINAL_RATIO_PLAIN: f64 = 0.80;
pub const LOOKBACK_MARGINAL_RATIO_WITH_DELTA: f64 = 0.30;
