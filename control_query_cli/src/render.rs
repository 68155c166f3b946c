//! Text and JSON rendering of query results

use chrono::NaiveDateTime;
use clap::ValueEnum;
use control_query::browser::{BrowserView, ViewMode};
use control_query::model::{Control, ImplementationStatus};
use control_query::query::{Query, Segment, StatusFacets};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// A control on the rendered page with its tracker state
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    #[serde(flatten)]
    pub control: Arc<Control>,
    pub status: ImplementationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDateTime>,
}

impl Row {
    fn updated_label(&self) -> String {
        self.last_updated
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

#[derive(Serialize)]
struct SearchReport<'a> {
    query: &'a Query,
    view: ViewMode,
    page: usize,
    page_size: usize,
    total_pages: usize,
    matched: usize,
    total_controls: usize,
    controls: &'a [Row],
    status_facets: StatusFacets,
}

#[derive(Serialize)]
struct FacetReport<'a> {
    statuses: &'a StatusFacets,
    families: &'a BTreeMap<String, usize>,
}

pub fn search(
    view: &BrowserView,
    rows: &[Row],
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => {
            let report = SearchReport {
                query: &view.query,
                view: view.view_mode,
                page: view.page.page + 1,
                page_size: view.page.page_size,
                total_pages: view.page.total_pages,
                matched: view.matched(),
                total_controls: view.total_controls,
                controls: rows,
                status_facets: view.status_facets,
            };
            serde_json::to_string_pretty(&report).map(|json| json + "\n")
        }
        OutputFormat::Text => {
            let mut out = summary_line(view);
            out.push('\n');
            match view.view_mode {
                ViewMode::Card => cards(view, rows, &mut out),
                ViewMode::Table => table(view, rows, &mut out),
            }
            Ok(out)
        }
    }
}

pub fn facets(
    statuses: &StatusFacets,
    families: &BTreeMap<String, usize>,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&FacetReport { statuses, families })
            .map(|json| json + "\n"),
        OutputFormat::Text => {
            let mut out = String::from("Status\n");
            for (status, count) in statuses.iter() {
                let _ = writeln!(out, "  {:<12} {:>5}", status.as_str(), count);
            }
            let _ = writeln!(out, "  {:<12} {:>5}", "Total", statuses.total());
            out.push_str("Family\n");
            for (family, count) in families {
                let _ = writeln!(out, "  {:<12} {:>5}", family, count);
            }
            Ok(out)
        }
    }
}

fn summary_line(view: &BrowserView) -> String {
    let page = &view.page;
    let last = page.first_item_number() + page.items.len().saturating_sub(1);
    let mut line = if page.items.is_empty() {
        format!("No controls match (0 of {})", view.total_controls)
    } else {
        format!(
            "Showing {}-{} of {} matching controls ({} total), page {} of {}",
            page.first_item_number(),
            last,
            page.total_items,
            view.total_controls,
            page.page + 1,
            page.total_pages
        )
    };

    let query = &view.query;
    if !query.search.trim().is_empty() {
        let _ = write!(line, " | search \"{}\"", query.search.trim());
    }
    if let Some(family) = &query.family {
        let _ = write!(line, " | family {}", family);
    }
    if let Some(status) = query.status {
        let _ = write!(line, " | status {}", status);
    }
    let _ = writeln!(line, " | sort {} {}", query.sort_key, query.direction);
    line
}

fn marked(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        if segment.matched {
            out.push('[');
            out.push_str(segment.text);
            out.push(']');
        } else {
            out.push_str(segment.text);
        }
    }
    out
}

fn cards(view: &BrowserView, rows: &[Row], out: &mut String) {
    for row in rows {
        let control = &row.control;
        let _ = writeln!(
            out,
            "{}  {}",
            marked(&view.highlight(control.id())),
            marked(&view.highlight(control.name()))
        );
        let _ = writeln!(
            out,
            "    Family: {}  Status: {}  Updated: {}",
            control.family(),
            row.status,
            row.updated_label()
        );
        if let Some(intent) = control.intent() {
            let _ = writeln!(out, "    {}", marked(&view.highlight(intent)));
        }
        if !control.enhancements().is_empty() {
            let _ = writeln!(out, "    Enhancements: {}", control.enhancements().join(", "));
        }
        out.push('\n');
    }
}

fn table(view: &BrowserView, rows: &[Row], out: &mut String) {
    let header = ["ID", "TITLE", "FAMILY", "STATUS", "UPDATED"];
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|row| {
            [
                marked(&view.highlight(row.control.id())),
                marked(&view.highlight(row.control.name())),
                row.control.family().to_string(),
                row.status.to_string(),
                row.updated_label(),
            ]
        })
        .collect();

    let mut widths = header.map(|title| title.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_row = |values: &[&str], out: &mut String| {
        let padded: Vec<String> = values
            .iter()
            .zip(widths.iter())
            .map(|(value, width)| format!("{:<width$}", value, width = *width))
            .collect();
        let _ = writeln!(out, "{}", padded.join("  ").trim_end());
    };

    render_row(&header[..], &mut *out);
    for row in &cells {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        render_row(&values[..], &mut *out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use control_query::config::QueryPreferences;
    use control_query::query::{SortDirection, SortKey};
    use control_query::{ControlBrowser, ControlCatalog, QueryEngine};

    fn view(search: &str, mode: ViewMode) -> (BrowserView, Vec<Row>) {
        let catalog = ControlCatalog::new(vec![
            Control::new("AC-2", "Account Management").with_intent("Manage system accounts"),
            Control::new("AU-2", "Event Logging"),
        ]);
        let preferences = QueryPreferences {
            debounce_ms: 300,
            page_size: 12,
            default_sort: SortKey::Id,
            default_direction: SortDirection::Ascending,
            status_order: Vec::new(),
        };
        let mut browser = ControlBrowser::new(QueryEngine::new(catalog), &preferences);
        browser.type_search(search);
        browser.submit_search();
        browser.set_view_mode(mode);

        let view = browser.view();
        let rows = view
            .page
            .items
            .iter()
            .map(|control| Row {
                control: Arc::clone(control),
                status: ImplementationStatus::NotStarted,
                last_updated: None,
            })
            .collect();
        (view, rows)
    }

    #[test]
    fn test_card_highlights_search_term() {
        let (view, rows) = view("account", ViewMode::Card);
        let text = search(&view, &rows, OutputFormat::Text).unwrap();

        assert!(text.starts_with("Showing 1-1 of 1 matching controls (2 total), page 1 of 1"));
        assert!(text.contains("AC-2  [Account] Management"));
        assert!(text.contains("Manage system [account]s"));
        assert!(text.contains("Status: Not Started  Updated: -"));
        assert!(!text.contains("AU-2"));
    }

    #[test]
    fn test_table_has_header_and_rows() {
        let (view, rows) = view("", ViewMode::Table);
        let text = search(&view, &rows, OutputFormat::Text).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[2].starts_with("ID"));
        assert!(lines[2].contains("TITLE"));
        assert!(lines[3].starts_with("AC-2"));
        assert!(lines[4].starts_with("AU-2"));
    }

    #[test]
    fn test_json_report() {
        let (view, rows) = view("logging", ViewMode::Card);
        let json = search(&view, &rows, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["matched"], 1);
        assert_eq!(value["page"], 1);
        assert_eq!(value["controls"][0]["id"], "AU-2");
        assert_eq!(value["controls"][0]["status"], "Not Started");
        assert_eq!(value["status_facets"]["Not Started"], 2);
    }

    #[test]
    fn test_empty_result_summary() {
        let (view, rows) = view("zzz", ViewMode::Card);
        let text = search(&view, &rows, OutputFormat::Text).unwrap();
        assert!(text.starts_with("No controls match (0 of 2) | search \"zzz\""));
    }

    #[test]
    fn test_facets_text() {
        let (view, _) = view("", ViewMode::Card);
        let families = BTreeMap::from([("AC".to_string(), 1), ("AU".to_string(), 1)]);
        let text = facets(&view.status_facets, &families, OutputFormat::Text).unwrap();
        assert!(text.contains("Not Started      2"));
        assert!(text.contains("AU               1"));
    }
}
