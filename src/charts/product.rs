//! Question 2: which product categories drive revenue vs volume?

use plotly::common::{
    ColorBar, ColorScale, ColorScalePalette, DashType, Font, HoverInfo, Line, Marker, Mode,
    Position, Title,
};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

use super::format::titled;
use super::{Chart, FONT_SIZE};
use crate::marts::ProductPerformance;

/// Smallest extent of the revenue = volume reference line, in percent.
const MIN_REFERENCE_EXTENT: f64 = 40.0;

const HOVER_TEMPLATE: &str =
    "<b>%{text}</b><br>Volume: %{x:.1f}%<br>Revenue: %{y:.1f}%<br><extra></extra>";

/// Bubble scatter of volume share against revenue share, sized and coloured by margin.
pub fn product_performance_chart(rows: &[ProductPerformance]) -> Chart {
    let volume: Vec<f64> = rows.iter().map(|r| r.volume_contribution_pct).collect();
    let revenue: Vec<f64> = rows.iter().map(|r| r.revenue_contribution_pct).collect();
    let margin: Vec<f64> = rows.iter().map(|r| r.avg_profit_margin_pct).collect();
    let categories: Vec<String> = rows.iter().map(|r| r.product_category.clone()).collect();
    let sizes: Vec<usize> = margin.iter().map(|m| bubble_size(*m)).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(volume, revenue)
            .mode(Mode::MarkersText)
            .marker(
                Marker::new()
                    .size_array(sizes)
                    .color_array(margin)
                    .color_scale(ColorScale::Palette(ColorScalePalette::Viridis))
                    .show_scale(true)
                    .color_bar(ColorBar::new().title(Title::with_text("Profit<br>Margin %")))
                    .line(Line::new().width(2.0).color("white")),
            )
            .text_array(categories)
            .text_position(Position::TopCenter)
            .text_font(Font::new().size(FONT_SIZE).color("black"))
            .hover_template(HOVER_TEMPLATE),
    );

    let extent = reference_extent(rows);
    plot.add_trace(
        Scatter::new(vec![0.0, extent], vec![0.0, extent])
            .mode(Mode::Lines)
            .line(Line::new().color("gray").dash(DashType::Dash))
            .show_legend(false)
            .hover_info(HoverInfo::Skip),
    );

    let title = titled(
        "Product Performance: Revenue vs Volume Contribution",
        Some("Bubble size = Profit Margin | Above line = Revenue-driven | Below line = Volume-driven"),
    );
    let layout = Layout::new()
        .title(Title::with_text(&title))
        .x_axis(Axis::new().title(Title::with_text("Volume Contribution (%)")))
        .y_axis(Axis::new().title(Title::with_text("Revenue Contribution (%)")))
        .height(600)
        .width(900)
        .show_legend(false)
        .font(Font::new().size(FONT_SIZE));
    plot.set_layout(layout);

    Chart {
        stem: "product_performance",
        width: 900,
        height: 600,
        plot,
    }
}

/// Marker diameter for a margin percentage: twice the margin, at least one pixel.
fn bubble_size(margin_pct: f64) -> usize {
    let size = (margin_pct * 2.0).round();
    if size.is_finite() && size >= 1.0 {
        size as usize
    } else {
        1
    }
}

/// End of the diagonal: 40%, or the next multiple of ten covering every point.
fn reference_extent(rows: &[ProductPerformance]) -> f64 {
    let max = rows
        .iter()
        .flat_map(|r| [r.volume_contribution_pct, r.revenue_contribution_pct])
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    ((max / 10.0).ceil() * 10.0).max(MIN_REFERENCE_EXTENT)
}
