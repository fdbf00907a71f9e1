//! Chart templates for the five MART views.
//!
//! Each template turns one typed table into a [`Chart`]: a plotly figure with
//! fixed styling plus the file stem and pixel size of its static export.
//! [`ArtifactWriter`] saves charts as interactive HTML and static PNG files.

mod churn;
mod discount;
mod export;
pub mod format;
mod product;
mod regional;
mod segments;

pub use churn::churn_risk_chart;
pub use discount::discount_impact_chart;
pub use export::{ArtifactWriter, Artifacts, ImageExporter, KaleidoExporter};
pub use product::product_performance_chart;
pub use regional::regional_performance_chart;
pub use segments::customer_segments_chart;

use plotly::common::Font;
use plotly::layout::Annotation;
use plotly::Plot;

pub(crate) const BLUE: &str = "#3498db";
pub(crate) const GREEN: &str = "#2ecc71";
pub(crate) const RED: &str = "#e74c3c";
pub(crate) const GREY: &str = "#95a5a6";

/// Base font size for every chart.
pub(crate) const FONT_SIZE: usize = 12;

/// Height of panel titles above the plotting area, in paper coordinates.
const PANEL_TITLE_Y: f64 = 1.05;

/// A title centred over one panel of a multi-panel figure.
pub(crate) fn panel_title(text: &str, x: f64) -> Annotation {
    Annotation::new()
        .text(text)
        .x_ref("paper")
        .y_ref("paper")
        .x(x)
        .y(PANEL_TITLE_Y)
        .show_arrow(false)
        .font(Font::new().size(FONT_SIZE + 2))
}

/// A rendered figure and how to save it.
pub struct Chart {
    /// File name without extension.
    pub stem: &'static str,
    /// Static export width in pixels.
    pub width: usize,
    /// Static export height in pixels.
    pub height: usize,
    /// The figure.
    pub plot: Plot,
}

impl Chart {
    /// File name of the interactive document.
    pub fn html_file_name(&self) -> String {
        format!("{}.html", self.stem)
    }

    /// File name of the static image.
    pub fn image_file_name(&self) -> String {
        format!("{}.png", self.stem)
    }

    /// The figure as plotly JSON (`data` traces and `layout`).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.plot.to_json()).unwrap_or(serde_json::Value::Null)
    }
}
