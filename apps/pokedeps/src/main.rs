use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use log::{debug, info};
use pokedeps_weight::Config;
use std::io::{BufWriter, Write};
use std::process;
use std::time::Instant;

fn main() {
    env_logger::init();

    let cfg = match Config::try_parse() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Usage errors exit with 1, --help and --version with 0
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };
    debug!("Parsed CLI arguments: {:?}", cfg);

    if let Err(e) = run(cfg) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cfg: Config) -> Result<()> {
    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let start = Instant::now();
    info!("Running weight analysis (top: {}, ranking: {:?})", cfg.top(), cfg.rank_by());

    let analysis = pokedeps_weight::run_weight_analysis(cfg.clone())?;
    if let Some(file) = &analysis.graph_file {
        info!("Dependency graph written to {}", file.display());
    }

    writeln!(stdout)?;
    pokedeps_weight::print_report(&mut stdout, &analysis, &cfg)?;
    writeln!(stdout)?;
    stdout.flush()?;

    info!(
        "Finished in {}ms on {} modules",
        start.elapsed().as_millis(),
        analysis.modules().len()
    );
    Ok(())
}
