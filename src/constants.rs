pub mod limits {
	pub const MIN_SCALE: u32 = 1;
	pub const MAX_SCALE: u32 = 8;
	pub const MIN_TOTAL_ITER: u64 = 1;
	pub const MAX_PORT: u32 = 65535;
}

pub mod degradation {
	/// Tolerance when checking that a probability array sums to 1.0.
	pub const PROB_SUM_TOLERANCE: f64 = 1e-6;
}

pub mod template {
	pub const DEFAULT_SCALE: u32 = 4;
	pub const DEFAULT_TOTAL_ITER: u64 = 400_000;
	pub const DEFAULT_LEARNING_RATE: f64 = 1e-4;
	pub const DEFAULT_EMA_DECAY: f64 = 0.999;
	pub const DEFAULT_BATCH_SIZE_PER_GPU: u32 = 12;
	pub const DEFAULT_NUM_WORKER_PER_GPU: u32 = 6;
	pub const DEFAULT_GT_SIZE: u32 = 256;
	pub const DEFAULT_DIST_PORT: u32 = 29500;
}

pub mod file {
	pub const YML_EXTENSION: &str = "yml";
	pub const YAML_EXTENSION: &str = "yaml";
}
