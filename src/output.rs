//! Formatting of projection results and estimates for display.
use crate::census::Census;
use crate::finance::{CostBreakdown, LossEstimate, treatment_balance};
use crate::projection::ProjectionComparison;
use crate::units::{Money, MoneyPerYear};
use std::fmt::Write;

/// Column headings for the projection table
const TABLE_HEADINGS: [&str; 5] = [
    "Year",
    "Controlled (t)",
    "Uncontrolled (t)",
    "Difference (t)",
    "Value (RM)",
];

/// Format an amount of money
fn format_money(value: Money, decimal_places: usize) -> String {
    format!("RM {:.decimal_places$}", value.value())
}

/// Format a comparison of projections as a table, one row per year.
///
/// # Arguments
///
/// * `comparison` - The projections to show
/// * `values` - The value of the yield saved by treatment for each year
/// * `decimal_places` - Number of decimal places to show
pub fn format_projection_table(
    comparison: &ProjectionComparison,
    values: &[MoneyPerYear],
    decimal_places: usize,
) -> String {
    let rows: Vec<[String; 5]> = comparison
        .rows()
        .zip(values)
        .map(|(row, value)| {
            [
                row.year.to_string(),
                format!("{:.decimal_places$}", row.controlled.value()),
                format!("{:.decimal_places$}", row.uncontrolled.value()),
                format!("{:.decimal_places$}", row.difference().value()),
                format!("{:.decimal_places$}", value.value()),
            ]
        })
        .collect();

    // Each column is as wide as its widest cell
    let mut widths = TABLE_HEADINGS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let mut write_row = |cells: &[&str]| {
        let line: Vec<_> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:>width$}"))
            .collect();
        writeln!(&mut out, "{}", line.join("  ")).unwrap();
    };

    write_row(&TABLE_HEADINGS);
    for row in &rows {
        write_row(&row.each_ref().map(String::as_str));
    }

    out
}

/// Format a summary of a census and the associated costs and losses
pub fn format_census_summary(
    census: &Census,
    costs: &CostBreakdown,
    loss: &LossEstimate,
    decimal_places: usize,
) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| {
        writeln!(&mut out, "{label:<40}{value}").unwrap();
    };

    line("Healthy palms:", census.healthy().to_string());
    line("Unhealthy palms:", census.unhealthy().to_string());
    line("Palms needing soil mounding:", census.soil_mounding().to_string());
    line("Palms needing sanitation:", census.sanitation().to_string());
    line(
        "Soil mounding cost:",
        format_money(costs.soil_mounding, decimal_places),
    );
    line(
        "Sanitation cost:",
        format_money(costs.sanitation, decimal_places),
    );
    line("Total cost:", format_money(costs.total(), decimal_places));
    line(
        "Yield loss:",
        format!("{:.decimal_places$} t", loss.tonnage.value()),
    );
    line("Yield loss value:", format_money(loss.value, decimal_places));

    let balance = treatment_balance(loss, costs);
    if balance > Money(0.0) {
        line(
            "Treatment costs less than the loss by:",
            format_money(balance, decimal_places),
        );
    } else {
        line(
            "Treatment costs more than the loss by:",
            format_money(Money(-balance.value()), decimal_places),
        );
    }

    out
}
