//! Question 4: which customer segments are most valuable?

use plotly::common::{Domain, Font, Position, Title};
use plotly::layout::{Layout, LayoutGrid};
use plotly::{Pie, Plot};

use super::format::titled;
use super::{panel_title, Chart, BLUE, FONT_SIZE, GREEN, GREY};
use crate::marts::CustomerSegment;

const SEGMENT_COLOURS: [&str; 3] = [GREEN, BLUE, GREY];

/// Two donuts side by side: share of customers and share of lifetime value.
pub fn customer_segments_chart(rows: &[CustomerSegment]) -> Chart {
    let labels: Vec<&str> = rows.iter().map(|r| r.customer_segment.as_str()).collect();
    let customers: Vec<i64> = rows.iter().map(|r| r.total_customers).collect();
    let clv_share: Vec<f64> = rows.iter().map(|r| r.clv_contribution_pct).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Pie::new(customers)
            .labels(labels.clone())
            .name("Customer Count by Segment")
            .hole(0.4)
            .text_info("label+percent")
            .text_position(Position::Outside)
            .domain(Domain::new().column(0)),
    );
    plot.add_trace(
        Pie::new(clv_share)
            .labels(labels)
            .name("CLV Contribution by Segment")
            .hole(0.4)
            .text_info("label+percent")
            .text_position(Position::Outside)
            .domain(Domain::new().column(1)),
    );

    let title = titled(
        "Customer Segmentation: Size vs Value",
        value_concentration(rows).as_deref(),
    );
    let layout = Layout::new()
        .title(Title::with_text(&title))
        .grid(LayoutGrid::new().rows(1).columns(2))
        .annotations(vec![
            panel_title("Customer Count by Segment", 0.225),
            panel_title("CLV Contribution by Segment", 0.775),
        ])
        .colorway(SEGMENT_COLOURS.to_vec())
        .height(500)
        .show_legend(false)
        .font(Font::new().size(FONT_SIZE));
    plot.set_layout(layout);

    Chart {
        stem: "customer_segments",
        width: 1200,
        height: 500,
        plot,
    }
}

/// "Premium customers are 22% of base but drive 45% of value" for the top-CLV segment.
fn value_concentration(rows: &[CustomerSegment]) -> Option<String> {
    let total: i64 = rows.iter().map(|r| r.total_customers).sum();
    let top = rows.first()?;
    if total <= 0 {
        return None;
    }

    let base_share = top.total_customers as f64 * 100.0 / total as f64;
    Some(format!(
        "{} customers are {:.0}% of base but drive {:.0}% of value",
        top.customer_segment, base_share, top.clv_contribution_pct
    ))
}
