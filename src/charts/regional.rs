//! Question 1: are we actually profitable per region?

use plotly::common::{Font, Marker, TextPosition, Title};
use plotly::layout::{Axis, Layout};
use plotly::{Bar, Plot};

use super::format::{millions, percent};
use super::{panel_title, Chart, BLUE, FONT_SIZE, GREEN, RED};
use crate::marts::RegionalPerformance;

/// Revenue and profit bars per region on the left, margin bars on the right.
pub fn regional_performance_chart(rows: &[RegionalPerformance]) -> Chart {
    let regions: Vec<String> = rows.iter().map(|r| r.region.clone()).collect();
    let revenue: Vec<f64> = rows.iter().map(|r| r.net_revenue).collect();
    let profit: Vec<f64> = rows.iter().map(|r| r.gross_profit).collect();
    let margin: Vec<f64> = rows.iter().map(|r| r.overall_profit_margin_pct).collect();

    let revenue_labels: Vec<String> = revenue.iter().map(|v| millions(*v)).collect();
    let profit_labels: Vec<String> = profit.iter().map(|v| millions(*v)).collect();
    let margin_labels: Vec<String> = margin.iter().map(|v| percent(*v)).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Bar::new(regions.clone(), revenue)
            .name("Net Revenue")
            .marker(Marker::new().color(BLUE))
            .text_array(revenue_labels)
            .text_position(TextPosition::Outside),
    );
    plot.add_trace(
        Bar::new(regions.clone(), profit)
            .name("Gross Profit")
            .marker(Marker::new().color(GREEN))
            .text_array(profit_labels)
            .text_position(TextPosition::Outside),
    );
    plot.add_trace(
        Bar::new(regions, margin)
            .name("Profit Margin %")
            .marker(Marker::new().color(RED))
            .text_array(margin_labels)
            .text_position(TextPosition::Outside)
            .show_legend(false)
            .x_axis("x2")
            .y_axis("y2"),
    );

    let layout = Layout::new()
        .title(Title::with_text("Regional Profitability Analysis"))
        .annotations(vec![
            panel_title("Regional Revenue & Profit", 0.225),
            panel_title("Profit Margins by Region", 0.775),
        ])
        .height(500)
        .show_legend(true)
        .font(Font::new().size(FONT_SIZE))
        .x_axis(
            Axis::new()
                .title(Title::with_text("Region"))
                .domain(&[0.0, 0.45]),
        )
        .y_axis(Axis::new().title(Title::with_text("Amount ($)")))
        .x_axis2(
            Axis::new()
                .title(Title::with_text("Region"))
                .domain(&[0.55, 1.0])
                .anchor("y2"),
        )
        .y_axis2(
            Axis::new()
                .title(Title::with_text("Profit Margin (%)"))
                .anchor("x2"),
        );
    plot.set_layout(layout);

    Chart {
        stem: "regional_performance",
        width: 1400,
        height: 500,
        plot,
    }
}
