use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use log::debug;

use crate::{
    config::{Config, RankBy},
    constants::{BYTES_PER_MB, DEPENDENTS_HEADER, WEIGHT_HEADER},
    error::WeightError,
    types::{Analysis, ModuleId, ModuleMap},
};

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedModule {
    pub id: ModuleId,
    pub name: String,
    pub dependents: usize,
    pub dep_size: u64,
}

/// Human readable size in decimal megabytes, e.g. `1.50 MB`.
pub fn pretty_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB)
}

/// Share of `value` in `total` as a percentage with two decimals.
pub fn percentage(total: u64, value: u64) -> String {
    if total == 0 {
        return format!("{:.2}", 0.0);
    }
    format!("{:.2}", value as f64 / total as f64 * 100.0)
}

/// Every module, root included, ordered by the requested criterion
/// (descending). Ties keep creation order.
pub fn rank_modules(modules: &ModuleMap, by: RankBy) -> Vec<RankedModule> {
    let mut ranked: Vec<RankedModule> = modules
        .iter()
        .map(|(id, m)| RankedModule {
            id,
            name: m.name.clone(),
            dependents: m.dependents.len(),
            dep_size: m.dep_size,
        })
        .collect();

    match by {
        RankBy::Weight => ranked.sort_by(|a, b| b.dep_size.cmp(&a.dep_size)),
        RankBy::Dependents => ranked.sort_by(|a, b| b.dependents.cmp(&a.dependents)),
    }
    ranked
}

/// Prints the top `top` modules, skipping the project itself.
pub fn print_ranking<W: Write>(
    writer: &mut W,
    analysis: &Analysis,
    by: RankBy,
    top: usize,
) -> io::Result<()> {
    let total = analysis.total_size();
    let ranked = rank_modules(analysis.modules(), by);
    debug!("Printing top {} of {} ranked modules", top, ranked.len());

    let header = match by {
        RankBy::Weight => WEIGHT_HEADER,
        RankBy::Dependents => DEPENDENTS_HEADER,
    };
    writeln!(writer, "{}", header.bold())?;

    for (idx, entry) in ranked.iter().filter(|r| r.id != ModuleId::ROOT).take(top).enumerate() {
        writeln!(
            writer,
            "{}) {} : {} dependents, {} ({}%)",
            idx + 1,
            entry.name.bright_white().bold(),
            entry.dependents,
            pretty_size(entry.dep_size).cyan(),
            percentage(total, entry.dep_size)
        )?;
    }
    Ok(())
}

/// Prints what removing `name` would take away with it.
pub fn print_module_detail<W: Write>(writer: &mut W, analysis: &Analysis, name: &str) -> Result<()> {
    let modules = analysis.modules();
    let module = modules.get(name).ok_or_else(|| WeightError::ModuleNotFound(name.to_string()))?;
    debug!("Printing detail for {}", name);

    if module.dependents.is_empty() {
        writeln!(writer, "{} has 0 dependents", name.bright_white().bold())?;
    } else {
        writeln!(
            writer,
            "{} has {} dependents :\n",
            name.bright_white().bold(),
            module.dependents.len()
        )?;
        for &dependent in &module.dependents {
            writeln!(writer, "{}", modules.name(dependent))?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "Cutting it would reduce size by ~{}", pretty_size(module.dep_size).cyan())?;
    writeln!(
        writer,
        "({}% of the total project size)",
        percentage(analysis.total_size(), module.dep_size)
    )?;
    Ok(())
}

/// Lists declared dependencies that are not installed. Prints nothing when
/// there are none.
pub fn print_missing<W: Write>(writer: &mut W, analysis: &Analysis) -> io::Result<()> {
    let missing = &analysis.graph.missing;
    if missing.is_empty() {
        return Ok(());
    }
    writeln!(writer)?;
    writeln!(writer, "{} dependencies not found:", missing.len().to_string().yellow().bold())?;
    for name in missing {
        writeln!(writer, "{}", name)?;
    }
    Ok(())
}

/// Full report for a run: the ranking or the single-module detail, followed
/// by the missing dependencies.
pub fn print_report<W: Write>(writer: &mut W, analysis: &Analysis, cfg: &Config) -> Result<()> {
    match &cfg.specific {
        Some(name) => print_module_detail(writer, analysis, name)?,
        None => print_ranking(writer, analysis, cfg.rank_by(), cfg.top())?,
    }
    print_missing(writer, analysis)?;
    writer.flush()?;
    Ok(())
}
