use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::pipeline::PathwayReport;

/// Common interface for export artifact generators.
pub trait Renderer: Send + Sync {
    /// Human-readable name for this renderer.
    fn name(&self) -> &'static str;

    /// Output file name relative to the export directory.
    fn file_name(&self) -> &'static str;

    /// Generate the artifact content.
    fn render(&self, report: &PathwayReport) -> crate::error::Result<String>;

    /// Render and write the artifact into `dir`, creating it if needed.
    /// Returns the written path.
    fn write(&self, report: &PathwayReport, dir: &Path) -> crate::error::Result<PathBuf> {
        let content = self.render(report)?;
        std::fs::create_dir_all(dir).map_err(ExportError::Io)?;
        let output = dir.join(self.file_name());
        std::fs::write(&output, content).map_err(ExportError::Io)?;
        Ok(output)
    }
}
