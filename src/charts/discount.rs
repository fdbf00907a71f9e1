//! Question 3: is discounting hurting margins?

use plotly::common::{Font, Line, Marker, Mode, Orientation, Position, TextPosition, Title};
use plotly::layout::{Axis, AxisSide, Layout, Legend};
use plotly::{Bar, Plot, Scatter};

use super::format::{count, percent};
use super::{Chart, BLUE, FONT_SIZE, RED};
use crate::marts::DiscountImpact;

/// Order counts as bars with the average margin as a line on a secondary axis.
pub fn discount_impact_chart(rows: &[DiscountImpact]) -> Chart {
    let buckets: Vec<String> = rows.iter().map(|r| r.discount_bucket.clone()).collect();
    let orders: Vec<i64> = rows.iter().map(|r| r.total_orders).collect();
    let margin: Vec<f64> = rows.iter().map(|r| r.avg_profit_margin_pct).collect();

    let order_labels: Vec<String> = orders.iter().map(|o| count(*o)).collect();
    let margin_labels: Vec<String> = margin.iter().map(|m| percent(*m)).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Bar::new(buckets.clone(), orders)
            .name("Total Orders")
            .marker(Marker::new().color(BLUE))
            .text_array(order_labels)
            .text_position(TextPosition::Outside),
    );
    plot.add_trace(
        Scatter::new(buckets, margin)
            .name("Avg Profit Margin %")
            .mode(Mode::LinesMarkersText)
            .line(Line::new().color(RED).width(3.0))
            .marker(Marker::new().size(10))
            .text_array(margin_labels)
            .text_position(Position::TopCenter)
            .y_axis("y2"),
    );

    let layout = Layout::new()
        .title(Title::with_text(
            "Discount Impact on Order Volume and Profitability",
        ))
        .height(500)
        .show_legend(true)
        .legend(
            Legend::new()
                .x(0.7)
                .y(1.1)
                .orientation(Orientation::Horizontal),
        )
        .font(Font::new().size(FONT_SIZE))
        .x_axis(Axis::new().title(Title::with_text("Discount Level")))
        .y_axis(Axis::new().title(Title::with_text("Number of Orders")))
        .y_axis2(
            Axis::new()
                .title(Title::with_text("Profit Margin (%)"))
                .overlaying("y")
                .side(AxisSide::Right),
        );
    plot.set_layout(layout);

    Chart {
        stem: "discount_impact",
        width: 1000,
        height: 500,
        plot,
    }
}
