pub mod brief;
pub mod csv;
pub mod graph;
pub mod text;
pub mod traits;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::PathscopeConfig;
use crate::error::ExportError;
use crate::pipeline::PathwayReport;

pub use brief::MarkdownBrief;
pub use csv::{EnrichmentCsv, GeneCsv};
pub use graph::{GraphFormat, GraphRenderer};
pub use traits::Renderer;

/// File name of the full JSON report written by [`write_all`].
pub const REPORT_JSON: &str = "report.json";

/// Every export artifact, configured from `config`.
pub fn renderers(config: &PathscopeConfig) -> Vec<Box<dyn Renderer>> {
    vec![
        Box::new(GeneCsv {
            decorate_roles: config.export.decorate_roles,
        }),
        Box::new(EnrichmentCsv {
            p_floor: config.enrichment.p_floor,
        }),
        Box::new(GraphRenderer {
            format: GraphFormat::Json,
        }),
        Box::new(GraphRenderer {
            format: GraphFormat::Dot,
        }),
        Box::new(GraphRenderer {
            format: GraphFormat::Mermaid,
        }),
        Box::new(MarkdownBrief {
            decorate_roles: config.export.decorate_roles,
        }),
    ]
}

/// Write every artifact plus `report.json` into `dir`.
pub fn write_all(
    report: &PathwayReport,
    config: &PathscopeConfig,
    dir: &Path,
) -> crate::error::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for renderer in renderers(config) {
        let path = renderer.write(report, dir)?;
        info!(renderer = renderer.name(), path = %path.display(), "Wrote export");
        written.push(path);
    }

    let json = serde_json::to_string_pretty(report).map_err(ExportError::from)?;
    let path = dir.join(REPORT_JSON);
    std::fs::write(&path, json).map_err(ExportError::Io)?;
    written.push(path);
    Ok(written)
}
