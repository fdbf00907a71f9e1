//! Question 5: how can we reduce churn?

use plotly::common::{Font, Marker, Orientation, TextPosition, Title};
use plotly::layout::{Axis, BarMode, Layout, Legend};
use plotly::{Bar, Plot};

use super::format::{count, titled};
use super::{Chart, BLUE, FONT_SIZE, GREEN, GREY};
use crate::marts::{ChurnRisk, LOW_RISK};

/// Customers per risk level, stacked by segment.
pub fn churn_risk_chart(rows: &[ChurnRisk]) -> Chart {
    let levels: Vec<String> = rows.iter().map(|r| r.churn_risk.clone()).collect();
    let series: [(&str, &str, fn(&ChurnRisk) -> i64); 3] = [
        ("Premium", GREEN, |r| r.premium_customers),
        ("Regular", BLUE, |r| r.regular_customers),
        ("Budget", GREY, |r| r.budget_customers),
    ];

    let mut plot = Plot::new();
    for (name, colour, pick) in series {
        let values: Vec<i64> = rows.iter().map(pick).collect();
        let labels: Vec<String> = values.iter().map(|v| count(*v)).collect();
        plot.add_trace(
            Bar::new(levels.clone(), values)
                .name(name)
                .marker(Marker::new().color(colour))
                .text_array(labels)
                .text_position(TextPosition::Inside),
        );
    }

    let title = titled(
        "Churn Risk Distribution by Customer Segment",
        low_risk_share(rows).as_deref(),
    );
    let layout = Layout::new()
        .title(Title::with_text(&title))
        .x_axis(Axis::new().title(Title::with_text("Churn Risk Level")))
        .y_axis(Axis::new().title(Title::with_text("Number of Customers")))
        .bar_mode(BarMode::Stack)
        .height(500)
        .show_legend(true)
        .legend(
            Legend::new()
                .x(0.75)
                .y(1.1)
                .orientation(Orientation::Horizontal),
        )
        .font(Font::new().size(FONT_SIZE));
    plot.set_layout(layout);

    Chart {
        stem: "churn_risk",
        width: 900,
        height: 500,
        plot,
    }
}

/// "98.8% of customers are low-risk (active)" when a low-risk bucket is present.
fn low_risk_share(rows: &[ChurnRisk]) -> Option<String> {
    rows.iter()
        .find(|r| r.churn_risk == LOW_RISK)
        .map(|r| {
            format!(
                "{:.1}% of customers are low-risk (active)",
                r.pct_of_customer_base
            )
        })
}
