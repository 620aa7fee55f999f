//! Tunables and fixed strings for the weight analysis.

/// Number of ranked entries printed when `--top` is not given
pub const DEFAULT_TOP: usize = 10;

/// Sizes are reported in decimal megabytes
pub const BYTES_PER_MB: f64 = 1_000_000.0;

/// Graphviz executable used to render the dependency graph
pub const GRAPHVIZ_PROGRAM: &str = "dot";

pub const WEIGHT_HEADER: &str = "Top packages by total weight added to the project";
pub const DEPENDENTS_HEADER: &str = "Top packages by number of dependent modules";

