use anyhow::{Result, anyhow};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

use crate::{constants::DEFAULT_TOP, error::WeightError};

/// Ordering used for the ranked report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    /// Cumulative size a module is responsible for
    Weight,
    /// Number of modules that would disappear with it
    Dependents,
}

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "pokedeps", version)]
#[command(about = "Find the heaviest and most load-bearing dependencies of an npm project")]
pub struct Config {
    /// Path of the project to analyze (defaults to the current working directory)
    #[arg(short, long, value_name = "DIRECTORY")]
    pub path: Option<PathBuf>,

    /// How many of the heaviest modules to list [default: 10]
    #[arg(short, long, value_name = "NUMBER", conflicts_with = "specific")]
    pub top: Option<usize>,

    /// Include the project's devDependencies
    #[arg(short, long)]
    pub dev: bool,

    /// Sort results by number of dependent modules
    #[arg(short, long, visible_alias = "dependents")]
    pub collaterals: bool,

    /// Only print info about a specific module
    #[arg(short, long, value_name = "MODULE")]
    pub specific: Option<String>,

    /// Create an SVG graph of the dependencies in this directory
    #[arg(short, long, value_name = "DIRECTORY")]
    pub graph: Option<PathBuf>,

    #[clap(skip)]
    pub root: Option<PathBuf>,

    #[clap(skip)]
    pub project_name: Option<String>,
}

impl Config {
    /// Checks flag combinations and resolves the project root and name.
    pub fn initialize(&mut self) -> Result<()> {
        self.validate()?;

        let root = pokedeps_core::resolve_project_root(self.path.as_deref())?;
        let name = pokedeps_core::project_name(&root)?;
        info!("Analyzing project {} at {}", name, root.display());

        if let Some(dir) = self.graph.take() {
            let dir = pokedeps_core::resolve_path(&dir)?;
            debug!("Graph output directory: {}", dir.display());
            self.graph = Some(dir);
        }

        self.root = Some(root);
        self.project_name = Some(name);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        if self.top.is_some() && self.specific.is_some() {
            return Err(WeightError::ConfigurationConflict(
                "--top cannot be used with --specific".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }

    /// Get the project name, returning an error if not initialized
    pub fn project_name(&self) -> Result<&str> {
        self.project_name
            .as_deref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }

    pub fn top(&self) -> usize {
        self.top.unwrap_or(DEFAULT_TOP)
    }

    pub fn rank_by(&self) -> RankBy {
        if self.collaterals { RankBy::Dependents } else { RankBy::Weight }
    }
}
