use anyhow::Result;
use log::{debug, info};

use crate::{
    config::Config,
    dominators::compute_dominators,
    error::WeightError,
    export::{Graphviz, Renderer, export_graph},
    graph::build_graph,
    types::Analysis,
    weight::propagate_weights,
};

/// Runs the whole analysis, rendering graphs with Graphviz.
pub fn run_weight_analysis(cfg: Config) -> Result<Analysis> {
    run_weight_analysis_with(cfg, &Graphviz::default())
}

/// Builds the graph, computes critical ancestors, propagates weights and,
/// when requested, exports the graph.
///
/// Every fatal condition (bad flags, unreadable root manifest, unknown
/// `--specific` module, bad graph directory) surfaces here, before anything
/// is printed.
pub fn run_weight_analysis_with<R: Renderer>(mut cfg: Config, renderer: &R) -> Result<Analysis> {
    info!("Starting weight analysis");

    cfg.initialize()?;
    let root = cfg.root()?.clone();
    let project_name = cfg.project_name()?.to_string();

    let mut graph = build_graph(&root, &project_name, cfg.dev)?;
    info!("Built graph with {} modules ({} missing)", graph.modules.len(), graph.missing.len());

    let dominators = compute_dominators(&graph.modules);
    propagate_weights(&mut graph.modules, &dominators);

    if let Some(name) = &cfg.specific
        && graph.modules.get(name).is_none()
    {
        return Err(WeightError::ModuleNotFound(name.clone()).into());
    }

    let graph_file = match &cfg.graph {
        Some(dir) => Some(export_graph(renderer, &graph.modules, &project_name, cfg.dev, dir)?),
        None => None,
    };

    debug!("Project total: {} bytes", graph.modules.root().dep_size);
    info!("Weight analysis complete");
    Ok(Analysis { graph, dominators, graph_file })
}
