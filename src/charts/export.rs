//! Saving charts to disk.
//!
//! HTML documents are written directly from the figure. Static images go
//! through an [`ImageExporter`]; the default one drives Kaleido.

use plotly::{ImageFormat, Plot};
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::Chart;
use crate::error::{ChartError, Result};

/// Renders a figure to a static image file.
pub trait ImageExporter {
    /// Writes `plot` as a PNG of the given size to `path`.
    fn export(&self, plot: &Plot, path: &Path, width: usize, height: usize) -> Result<()>;
}

/// PNG export through the Kaleido renderer.
#[derive(Debug, Clone)]
pub struct KaleidoExporter {
    scale: f64,
}

impl KaleidoExporter {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl Default for KaleidoExporter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ImageExporter for KaleidoExporter {
    fn export(&self, plot: &Plot, path: &Path, width: usize, height: usize) -> Result<()> {
        // plotly panics instead of returning an error when Kaleido is missing or fails.
        panic::catch_unwind(AssertUnwindSafe(|| {
            plot.write_image(path, ImageFormat::PNG, width, height, self.scale)
        }))
        .map_err(|payload| {
            ChartError::render(format!(
                "Static export of {} failed: {}",
                path.display(),
                panic_message(payload.as_ref())
            ))
        })?;

        if !path.exists() {
            return Err(ChartError::render(format!(
                "Static export did not produce {}",
                path.display()
            )));
        }
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("renderer panicked")
}

/// Files written for one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub html: PathBuf,
    pub image: Option<PathBuf>,
}

impl Artifacts {
    /// Written paths, HTML first.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.html.as_path()).chain(self.image.as_deref())
    }
}

/// Writes charts into an output directory.
pub struct ArtifactWriter {
    dir: PathBuf,
    images: Option<Box<dyn ImageExporter>>,
}

impl ArtifactWriter {
    /// Writes HTML and PNG files, using Kaleido for the images.
    pub fn new(dir: impl Into<PathBuf>, scale: f64) -> Self {
        Self::with_exporter(dir, Box::new(KaleidoExporter::new(scale)))
    }

    /// Writes HTML and PNG files, using the given exporter for the images.
    pub fn with_exporter(dir: impl Into<PathBuf>, exporter: Box<dyn ImageExporter>) -> Self {
        Self {
            dir: dir.into(),
            images: Some(exporter),
        }
    }

    /// Writes HTML files only.
    pub fn html_only(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            images: None,
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves one chart, creating the output directory if needed.
    pub fn write(&self, chart: &Chart) -> Result<Artifacts> {
        fs::create_dir_all(&self.dir)?;

        let html = self.dir.join(chart.html_file_name());
        fs::write(&html, chart.plot.to_html())?;
        debug!("Wrote {}", html.display());

        let image = match &self.images {
            Some(exporter) => {
                let path = self.dir.join(chart.image_file_name());
                exporter.export(&chart.plot, &path, chart.width, chart.height)?;
                debug!("Wrote {}", path.display());
                Some(path)
            }
            None => None,
        };

        Ok(Artifacts { html, image })
    }
}
