//! SVG chart rendering with `plotters`.
//!
//! Each renderer draws into an in-memory SVG string so the report can
//! inline the markup and also write it out as a standalone file.

use anyhow::Result;
use plotters::prelude::*;
use serde::Serialize;

use crate::analyzers::analyzer::Analysis;
use crate::analyzers::types::{BoxSummary, DerivedDay, GroupMean, Tab};
use crate::records::{month_label, weather_label};

const FONT: &str = "sans-serif";

/// Matplotlib `Blues(0.6)`.
pub const CASUAL_COLOR: RGBColor = RGBColor(107, 174, 214);
/// Matplotlib `Greens(0.6)`.
pub const REGISTERED_COLOR: RGBColor = RGBColor(116, 196, 118);
/// Seaborn `Set2`, first four entries.
const BOX_PALETTE: [RGBColor; 4] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
];
const GRID: RGBColor = RGBColor(220, 220, 220);

/// A rendered chart and where it goes on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    /// File stem, e.g. `rentals_by_hour`.
    pub name: &'static str,
    /// `None` for charts shown above the tabs.
    pub tab: Option<Tab>,
    pub caption: String,
    pub svg: String,
}

/// One stacked bar: casual at the bottom, registered on top.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedBar {
    pub label: String,
    pub casual: f64,
    pub registered: f64,
}

impl StackedBar {
    pub fn from_groups<K>(groups: &[GroupMean<K>], label: impl Fn(&K) -> String) -> Vec<Self> {
        groups
            .iter()
            .map(|g| StackedBar {
                label: label(&g.key),
                casual: g.casual,
                registered: g.registered,
            })
            .collect()
    }
}

/// Renders every chart of the dashboard, in display order.
#[tracing::instrument(skip_all)]
pub fn render_charts(analysis: &Analysis) -> Result<Vec<Chart>> {
    let charts = vec![
        Chart {
            name: "rentals_over_time",
            tab: None,
            caption: "Daily bike rentals, 7-day centered moving average".into(),
            svg: rentals_over_time(&analysis.derived)?,
        },
        Chart {
            name: "rentals_by_month",
            tab: Some(Tab::MonthsAndSeason),
            caption: "Average hourly rentals per month".into(),
            svg: stacked_bars(
                "Total Bike Rentals per Hour",
                "Month",
                "Total Bike Rentals",
                &StackedBar::from_groups(&analysis.by_month, |m| month_label(*m)),
                (900, 300),
            )?,
        },
        Chart {
            name: "rentals_by_season",
            tab: Some(Tab::MonthsAndSeason),
            caption: "Distribution of daily rentals by season".into(),
            svg: box_plot(
                "Data Distribution by Season",
                "Season",
                "Rental Bikes Count",
                &analysis.by_season,
                (900, 400),
            )?,
        },
        Chart {
            name: "rentals_by_hour",
            tab: Some(Tab::TimeOfDay),
            caption: "Average rentals per hour of the day".into(),
            svg: stacked_bars(
                "Bike Rentals per Hour",
                "Hour",
                "Bike Rentals",
                &StackedBar::from_groups(&analysis.by_hour, |h| hour_label(*h)),
                (1000, 350),
            )?,
        },
        Chart {
            name: "temperature_regression",
            tab: Some(Tab::Temperature),
            caption: "Daily rentals against temperature with the least-squares line".into(),
            svg: temperature_regression(&analysis.derived)?,
        },
        Chart {
            name: "rentals_by_temperature",
            tab: Some(Tab::Temperature),
            caption: "Distribution of daily rentals by temperature quartile".into(),
            svg: box_plot(
                "Data Distribution by Temperature",
                "Temperature",
                "Rental Bikes Count",
                &analysis.by_temperature,
                (1000, 500),
            )?,
        },
        Chart {
            name: "rentals_by_weather",
            tab: Some(Tab::Weather),
            caption: "Average hourly rentals by weather condition".into(),
            svg: stacked_bars(
                "Bike Rentals by Weather Condition",
                "Weather condition",
                "Bike Rentals",
                &StackedBar::from_groups(&analysis.by_weather, |w| {
                    format!("{w} ({})", weather_label(*w))
                }),
                (1000, 600),
            )?,
        },
    ];

    Ok(charts)
}

/// Axis label of an hour of the day; hours are shown 1-based.
pub fn hour_label(hour: u8) -> String {
    (u16::from(hour) + 1).to_string()
}

/// Line chart of the moving-average trend; days without a full window are skipped.
pub fn rentals_over_time(days: &[DerivedDay]) -> Result<String> {
    let points: Vec<(f64, f64)> = days
        .iter()
        .enumerate()
        .filter_map(|(i, d)| d.cnt_moving_avg.map(|v| (i as f64, v)))
        .collect();

    let x_max = days.len().saturating_sub(1).max(1) as f64;
    let y_max = points.iter().map(|p| p.1).fold(0.0, f64::max).max(1.0) * 1.1;

    let date_label = |x: &f64| {
        let i = x.round();
        if i < 0.0 {
            return String::new();
        }
        days.get(i as usize)
            .map(|d| d.date.format("%b %Y").to_string())
            .unwrap_or_default()
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (1200, 400)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Rental Bikes Over the Years", (FONT, 22).into_font())
            .margin(15)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(&WHITE)
            .bold_line_style(&GRID)
            .x_labels(12)
            .x_label_formatter(&date_label)
            .y_desc("Rentals per day")
            .draw()?;

        chart.draw_series(LineSeries::new(points, BLUE.stroke_width(2)))?;

        root.present()?;
    }

    Ok(svg)
}

/// Stacked casual/registered bar chart, one bar per entry of `bars`.
pub fn stacked_bars(
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[StackedBar],
    size: (u32, u32),
) -> Result<String> {
    let n = bars.len().max(1);
    let y_max = bars
        .iter()
        .map(|b| b.casual + b.registered)
        .fold(0.0, f64::max)
        .max(1.0)
        * 1.15;

    let bar_label = |x: &f64| {
        let i = x.round();
        if (x - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        bars.get(i as usize)
            .map(|b| b.label.clone())
            .unwrap_or_default()
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 20).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(&WHITE)
            .bold_line_style(&GRID)
            .x_labels(n + 1)
            .x_label_formatter(&bar_label)
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()?;

        let half = 0.4;
        chart
            .draw_series(bars.iter().enumerate().map(|(i, b)| {
                let x = i as f64;
                Rectangle::new([(x - half, 0.0), (x + half, b.casual)], CASUAL_COLOR.filled())
            }))?
            .label("Casual")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], CASUAL_COLOR.filled()));

        chart
            .draw_series(bars.iter().enumerate().map(|(i, b)| {
                let x = i as f64;
                Rectangle::new(
                    [(x - half, b.casual), (x + half, b.casual + b.registered)],
                    REGISTERED_COLOR.filled(),
                )
            }))?
            .label("Registered")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 12, y + 5)], REGISTERED_COLOR.filled())
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
    }

    Ok(svg)
}

/// Box plot, one box per summary, with 1.5 × IQR whiskers and outlier dots.
pub fn box_plot(
    title: &str,
    x_desc: &str,
    y_desc: &str,
    boxes: &[BoxSummary],
    size: (u32, u32),
) -> Result<String> {
    let n = boxes.len().max(1);
    let y_max = boxes.iter().map(|b| b.max).fold(0.0, f64::max).max(1.0) * 1.1;
    let y_min = boxes.iter().map(|b| b.min).fold(0.0, f64::min);

    let box_label = |x: &f64| {
        let i = x.round();
        if (x - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        boxes
            .get(i as usize)
            .map(|b| b.label.clone())
            .unwrap_or_default()
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 20).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(&WHITE)
            .bold_line_style(&GRID)
            .x_labels(n + 1)
            .x_label_formatter(&box_label)
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()?;

        // seaborn width=0.2
        let half = 0.1;
        let cap = 0.05;

        chart.draw_series(boxes.iter().enumerate().map(|(i, b)| {
            let x = i as f64;
            let color = BOX_PALETTE[i % BOX_PALETTE.len()];
            Rectangle::new([(x - half, b.q1), (x + half, b.q3)], color.filled())
        }))?;

        chart.draw_series(boxes.iter().enumerate().map(|(i, b)| {
            let x = i as f64;
            Rectangle::new([(x - half, b.q1), (x + half, b.q3)], BLACK.stroke_width(1))
        }))?;

        chart.draw_series(boxes.iter().enumerate().flat_map(|(i, b)| {
            let x = i as f64;
            vec![
                PathElement::new(vec![(x - half, b.median), (x + half, b.median)], BLACK.stroke_width(2)),
                PathElement::new(vec![(x, b.q3), (x, b.upper_whisker)], BLACK.stroke_width(1)),
                PathElement::new(vec![(x, b.q1), (x, b.lower_whisker)], BLACK.stroke_width(1)),
                PathElement::new(
                    vec![(x - cap, b.upper_whisker), (x + cap, b.upper_whisker)],
                    BLACK.stroke_width(1),
                ),
                PathElement::new(
                    vec![(x - cap, b.lower_whisker), (x + cap, b.lower_whisker)],
                    BLACK.stroke_width(1),
                ),
            ]
        }))?;

        chart.draw_series(boxes.iter().enumerate().flat_map(|(i, b)| {
            let x = i as f64;
            b.outliers
                .iter()
                .map(move |v| Circle::new((x, *v), 3, BLACK.stroke_width(1)))
        }))?;

        root.present()?;
    }

    Ok(svg)
}

/// Scatter of daily rentals against °C with the fitted regression line.
pub fn temperature_regression(days: &[DerivedDay]) -> Result<String> {
    let x_max = days.iter().map(|d| d.temp_celsius).fold(0.0, f64::max).max(1.0) * 1.05;
    let x_min = days.iter().map(|d| d.temp_celsius).fold(0.0, f64::min);
    let y_max = days
        .iter()
        .map(|d| f64::from(d.cnt).max(d.predicted_cnt))
        .fold(0.0, f64::max)
        .max(1.0)
        * 1.1;
    let y_min = days.iter().map(|d| d.predicted_cnt).fold(0.0, f64::min);

    let mut line: Vec<(f64, f64)> = days
        .iter()
        .map(|d| (d.temp_celsius, d.predicted_cnt))
        .collect();
    line.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (1000, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Scatter Plot with Regression Line between Temperature and Rental Bikes",
                (FONT, 20).into_font(),
            )
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .light_line_style(&WHITE)
            .bold_line_style(&GRID)
            .x_desc("Temperature in Celsius")
            .y_desc("Rental Bikes")
            .draw()?;

        chart
            .draw_series(days.iter().map(|d| {
                Circle::new((d.temp_celsius, f64::from(d.cnt)), 3, BLUE.mix(0.7).filled())
            }))?
            .label("Data Points")
            .legend(|(x, y)| Circle::new((x + 6, y), 3, BLUE.mix(0.7).filled()));

        chart
            .draw_series(LineSeries::new(line, RED.stroke_width(2)))?
            .label("Regression Line")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 14, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
    }

    Ok(svg)
}
