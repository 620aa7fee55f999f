//! Dependency weight analysis for installed npm projects.
//!
//! This crate walks the `node_modules` tree of a project to find which
//! dependencies contribute the most disk weight and which ones are
//! load-bearing: modules that every path from the project to some other
//! module must go through. Removing a load-bearing module necessarily
//! removes everything it dominates.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use pokedeps_weight::{Config, print_report, run_weight_analysis};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     path: Some(std::path::PathBuf::from("/path/to/project")),
//!     top: Some(5),
//!     ..Default::default()
//! };
//!
//! let analysis = run_weight_analysis(cfg.clone())?;
//!
//! // Use buffered output for better performance
//! let mut stdout = BufWriter::new(std::io::stdout());
//! print_report(&mut stdout, &analysis, &cfg)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod constants;
mod dominators;
mod error;
mod export;
mod graph;
mod reporter;
mod types;
mod weight;

// Re-export public API
pub use checker::{run_weight_analysis, run_weight_analysis_with};
pub use config::{Config, RankBy};
pub use constants::DEFAULT_TOP;
pub use dominators::{Dominators, compute_dominators};
pub use error::WeightError;
pub use export::{Graphviz, Renderer, edge_list, export_graph, graph_file_name, to_dot};
pub use graph::build_graph;
pub use reporter::{
    RankedModule, percentage, pretty_size, print_missing, print_module_detail, print_ranking,
    print_report, rank_modules,
};
pub use types::{Analysis, DependencyGraph, Module, ModuleId, ModuleMap};
pub use weight::propagate_weights;
