//! Report export
//!
//! Turns the active statistics view into a tabular document with two sinks:
//! CSV and a paginated plain-text report with a title/date header. Cell
//! strings are produced by the same resolution helpers as the on-screen
//! tables, so an export always matches what the user was looking at; a row
//! whose cross-references are dangling falls back to the sentinel strings
//! instead of failing the export.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    error::ClientResult,
    models::format_date,
    stats,
    views::Snapshot,
};

/// The statistics view being exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTab {
    Fines,
    Trends,
    Utilization,
    UserActivity,
}

impl ReportTab {
    pub fn title(&self) -> &'static str {
        match self {
            ReportTab::Fines => "Fines Summary",
            ReportTab::Trends => "Borrowing Trends",
            ReportTab::Utilization => "Book Utilization",
            ReportTab::UserActivity => "User Activity",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            ReportTab::Fines => "fines",
            ReportTab::Trends => "trends",
            ReportTab::Utilization => "utilization",
            ReportTab::UserActivity => "user-activity",
        }
    }
}

/// Header row plus string cells, ready for any sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub title: String,
    pub generated_on: NaiveDate,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Render a fine amount the way every table does: two decimal places,
/// dollar sign.
pub fn format_currency(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

/// Build the export table for a tab from a snapshot's collections. All
/// cross-references resolve through the sentinel-returning lookups, so a
/// missing book or user never fails the export.
pub fn build_table(tab: ReportTab, snapshot: &Snapshot) -> ReportTable {
    let (header, rows) = match tab {
        ReportTab::Fines => fines_rows(snapshot),
        ReportTab::Trends => trends_rows(snapshot),
        ReportTab::Utilization => utilization_rows(snapshot),
        ReportTab::UserActivity => activity_rows(snapshot),
    };
    ReportTable {
        title: tab.title().to_string(),
        generated_on: chrono::Local::now().date_naive(),
        header,
        rows,
    }
}

fn fines_rows(snapshot: &Snapshot) -> (Vec<String>, Vec<Vec<String>>) {
    let header = ["User", "Book", "Amount", "Status", "Date"];
    let rows = snapshot
        .fines
        .iter()
        .map(|fine| {
            let user = fine
                .user_name
                .clone()
                .unwrap_or_else(|| stats::user_name(&snapshot.users, fine.user));
            let book = match stats::borrow_record(&snapshot.records, fine.borrow_record) {
                Some(record) => record
                    .book_title
                    .clone()
                    .unwrap_or_else(|| stats::book_title(&snapshot.books, record.book)),
                None => "No associated book".to_string(),
            };
            vec![
                user,
                book,
                format_currency(fine.amount),
                if fine.is_paid { "Paid" } else { "Unpaid" }.to_string(),
                format_date(fine.created_at.as_deref()),
            ]
        })
        .collect();
    (header.map(String::from).to_vec(), rows)
}

fn trends_rows(snapshot: &Snapshot) -> (Vec<String>, Vec<Vec<String>>) {
    let header = ["Month", "Borrow Count"];
    let rows = snapshot
        .trend
        .iter()
        .map(|point| vec![point.month.clone(), point.count.to_string()])
        .collect();
    (header.map(String::from).to_vec(), rows)
}

fn utilization_rows(snapshot: &Snapshot) -> (Vec<String>, Vec<Vec<String>>) {
    let header = ["Book", "Author", "Borrow Count", "Utilization Rate"];
    let rows = snapshot
        .utilization
        .iter()
        .map(|usage| {
            vec![
                usage.title.clone(),
                usage.author.clone(),
                usage.borrow_count.to_string(),
                format!("{}%", usage.utilization_rate),
            ]
        })
        .collect();
    (header.map(String::from).to_vec(), rows)
}

fn activity_rows(snapshot: &Snapshot) -> (Vec<String>, Vec<Vec<String>>) {
    let header = ["User", "Email", "Borrow Count", "Reservation Count", "Total Fines"];
    let rows = snapshot
        .activity
        .iter()
        .map(|row| {
            vec![
                row.name.clone(),
                row.email.clone(),
                row.borrow_count.to_string(),
                row.reservation_count.to_string(),
                format_currency(row.fine_amount),
            ]
        })
        .collect();
    (header.map(String::from).to_vec(), rows)
}

/// Download file name for a tab, carrying the generation date.
pub fn file_name(tab: ReportTab, date: NaiveDate, extension: &str) -> String {
    format!("library-report-{}-{}.{}", tab.slug(), date.format("%Y-%m-%d"), extension)
}

/// CSV sink: a title line, the header row, then the cell rows.
pub fn to_csv(table: &ReportTable) -> ClientResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record([format!(
        "Library Management System Report - Generated on: {}",
        table.generated_on.format("%Y-%m-%d")
    )])?;
    writer.write_record([table.title.as_str()])?;
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Paginated plain-text sink: fixed rows per page, each page headed by the
/// report title, generation date and page number, with columns padded to
/// their widest cell.
pub fn to_paginated_text(table: &ReportTable, rows_per_page: usize) -> String {
    let rows_per_page = rows_per_page.max(1);

    // Column widths across header and every row.
    let mut widths: Vec<usize> = table.header.iter().map(String::len).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let render_row = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let page_count = table.rows.len().div_ceil(rows_per_page).max(1);
    let separator = "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1));

    // An empty table still gets a single page with the header.
    let empty: &[Vec<String>] = &[];
    let pages: Vec<&[Vec<String>]> = if table.rows.is_empty() {
        vec![empty]
    } else {
        table.rows.chunks(rows_per_page).collect()
    };

    let mut out = String::new();
    for (page_index, chunk) in pages.into_iter().enumerate() {
        if page_index > 0 {
            out.push('\n');
        }
        out.push_str("Library Management System Report\n");
        out.push_str(&format!(
            "Generated on: {}\n",
            table.generated_on.format("%Y-%m-%d")
        ));
        out.push_str(&format!(
            "{} - Page {} of {}\n\n",
            table.title,
            page_index + 1,
            page_count
        ));
        out.push_str(&render_row(&table.header));
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');
        for row in chunk {
            out.push_str(&render_row(row));
            out.push('\n');
        }
    }
    out
}
