//! Terminal and JSON output for a page of test rows.

use colored::*;

use crate::dashboard::{BuilderLoadStatus, LoadReport, TestOverview};
use crate::model::ResultCode;
use crate::query::Page;

fn paint(code: ResultCode, color: bool) -> String {
    let letter = code.code().to_string();
    if !color {
        return letter;
    }
    match code {
        ResultCode::Pass => letter.green().to_string(),
        ResultCode::NoData | ResultCode::Skip => letter.dimmed().to_string(),
        c if c.is_failure() => letter.red().bold().to_string(),
        _ => letter,
    }
}

fn percent(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.0}%", r * 100.0),
        None => "-".to_string(),
    }
}

/// One block per test: a header line with aggregate pass rates, then one
/// line per builder with its result letters, newest run first.
pub fn render_text(page: &Page<TestOverview>, color: bool) -> String {
    let mut out = String::new();
    let width = page
        .items
        .iter()
        .flat_map(|row| row.builders.iter().map(|b| b.builder.len()))
        .max()
        .unwrap_or(0);

    for row in &page.items {
        let name = if color {
            row.test.name().bold().to_string()
        } else {
            row.test.name().to_string()
        };
        out.push_str(&format!(
            "{name}  avg {} median {}\n",
            percent(row.average_pass_rate),
            percent(row.median_pass_rate)
        ));
        for column in &row.builders {
            let letters: String = column
                .results
                .results()
                .iter()
                .map(|c| paint(*c, color))
                .collect();
            out.push_str(&format!("  {:<width$}  {letters}\n", column.builder));
        }
    }

    out.push_str(&format!(
        "page {} of {} ({} tests)\n",
        page.page + 1,
        page.page_count.max(1),
        page.total
    ));
    out
}

pub fn render_json(page: &Page<TestOverview>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(page)
}

/// One line per builder that failed to load, for stderr.
pub fn render_load_failures(report: &LoadReport) -> String {
    report
        .failed()
        .map(|b| match &b.status {
            BuilderLoadStatus::Failed { error } => {
                format!("{} {}: {}\n", "[load]".bright_red(), b.builder, error)
            }
            BuilderLoadStatus::Loaded { .. } => String::new(),
        })
        .collect()
}
