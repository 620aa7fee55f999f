use anyhow::{Context, Result};
use log::{debug, info, trace};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

use crate::{constants::GRAPHVIZ_PROGRAM, error::WeightError, types::ModuleMap};

/// Turns a DOT document into an image.
pub trait Renderer {
    fn render(&self, dot: &str) -> Result<Vec<u8>>;
}

/// Renders SVG through the Graphviz `dot` executable.
#[derive(Debug, Clone)]
pub struct Graphviz {
    program: String,
}

impl Default for Graphviz {
    fn default() -> Self {
        Self { program: GRAPHVIZ_PROGRAM.to_string() }
    }
}

impl Renderer for Graphviz {
    fn render(&self, dot: &str) -> Result<Vec<u8>> {
        debug!("Rendering {} bytes of DOT with {}", dot.len(), self.program);
        let mut child = Command::new(&self.program)
            .arg("-Tsvg")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| WeightError::RenderFailed(format!("cannot run `{}`: {}", self.program, e)))?;

        // Feed stdin from another thread so a large graph cannot fill both pipes
        let mut stdin = child.stdin.take().context("graphviz stdin unavailable")?;
        let input = dot.to_owned();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        // Always wait for the render to finish before the caller writes the file
        let output = child.wait_with_output().context("failed waiting for graphviz")?;
        let sent = writer
            .join()
            .map_err(|_| WeightError::RenderFailed("graphviz input writer panicked".to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WeightError::RenderFailed(format!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            ))
            .into());
        }
        sent.context("failed to send graph to graphviz")?;
        Ok(output.stdout)
    }
}

fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// One `"parent" -> "child"` entry per recorded ancestor relation, critical
/// or not.
pub fn edge_list(modules: &ModuleMap) -> Vec<String> {
    modules
        .edges()
        .map(|(parent, child)| format!("{} -> {}", quote(modules.name(parent)), quote(modules.name(child))))
        .collect()
}

pub fn to_dot(edges: &[String]) -> String {
    let mut dot = String::from("digraph {\n    ranksep=2.5;\n    sep=0.5;\n");
    for edge in edges {
        dot.push_str("    ");
        dot.push_str(edge);
        dot.push_str(";\n");
    }
    dot.push_str("}\n");
    dot
}

pub fn graph_file_name(project_name: &str, include_dev: bool) -> String {
    if include_dev {
        format!("{}_depsAndDevDepsGraph.svg", project_name)
    } else {
        format!("{}_depsGraph.svg", project_name)
    }
}

/// Renders the full ancestor graph into `dir` and returns the written file.
pub fn export_graph<R: Renderer>(
    renderer: &R,
    modules: &ModuleMap,
    project_name: &str,
    include_dev: bool,
    dir: &Path,
) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(WeightError::OutputPathInvalid(dir.to_path_buf()).into());
    }
    let target = dir.join(graph_file_name(project_name, include_dev));

    let edges = edge_list(modules);
    trace!("Exporting {} edges", edges.len());
    let svg = renderer.render(&to_dot(&edges))?;

    fs::write(&target, svg).map_err(|e| {
        debug!("Writing {} failed: {}", target.display(), e);
        WeightError::OutputPathInvalid(target.clone())
    })?;
    info!("Wrote dependency graph to {}", target.display());
    Ok(target)
}
