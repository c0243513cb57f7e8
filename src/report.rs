//! Terminal and export formatting for enriched views.
//!
//! Pure string builders plus CSV/JSON writers; the binary decides where the
//! output goes.

use std::fmt::Write as _;
use std::io::Write;

use crate::error::Result;
use crate::pipeline::processing::{EnrichedRecord, Summary};
use crate::pipeline::RecordFilter;

const BAR_WIDTH: usize = 40;
const EXPORT_HEADERS: [&str; 12] = [
    "company",
    "contact_name",
    "email",
    "phone_primary",
    "phone_secondary",
    "phone_raw",
    "phone_digits",
    "area_code",
    "domain",
    "is_corporate",
    "phone_valid",
    "score",
];

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Lead table with the columns the segmentation view shows
pub fn format_records_table(records: &[&EnrichedRecord]) -> String {
    let header = ["Company", "Contact", "Email", "Phone", "DDD", "Domain", "Score"];
    let rows: Vec<[String; 7]> = records
        .iter()
        .map(|r| {
            [
                or_dash(r.company()).to_string(),
                or_dash(r.raw.contact_name.as_deref()).to_string(),
                or_dash(r.raw.email.as_deref()).to_string(),
                if r.phone_raw.is_empty() { "-".to_string() } else { r.phone_raw.clone() },
                or_dash(r.area_code.as_deref()).to_string(),
                or_dash(r.domain.as_deref()).to_string(),
                r.score.to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let render = |out: &mut String, cells: &[&str]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    };

    render(&mut out, &header[..]);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        render(&mut out, &cells);
    }
    let _ = write!(out, "{} lead(s)", rows.len());
    out
}

/// Totals for the full table and the filtered view
pub fn format_summary(full: &Summary, view: &Summary, filter: &RecordFilter) -> String {
    let average = |s: &Summary| match s.average_score {
        Some(avg) => format!("{avg:.2}"),
        None => "n/a (no records)".to_string(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "📊 Prospect summary");
    let _ = writeln!(out, "   Total leads:        {}", full.total);
    let _ = writeln!(out, "   Corporate emails:   {}", full.corporate_count);
    let _ = writeln!(out, "   Valid phones:       {}", full.valid_phone_count);
    let _ = writeln!(out, "   Average score:      {}", average(full));

    if !filter.is_unfiltered() {
        let _ = writeln!(
            out,
            "\n🔎 Filtered view (DDD: {}, email: {})",
            filter.area_code, filter.email_kind
        );
        let _ = writeln!(out, "   Leads:              {}", view.total);
        let _ = writeln!(out, "   Corporate emails:   {}", view.corporate_count);
        let _ = writeln!(out, "   Valid phones:       {}", view.valid_phone_count);
        let _ = writeln!(out, "   Average score:      {}", average(view));
    }

    let _ = writeln!(out, "\nScore distribution");
    out.push_str(&format_score_distribution(view));
    out
}

/// Horizontal bar chart of record counts per score
pub fn format_score_distribution(summary: &Summary) -> String {
    let max = summary.score_distribution.values().copied().max().unwrap_or(0);
    let mut out = String::new();
    for (score, count) in &summary.score_distribution {
        let bar = if max == 0 { 0 } else { (count * BAR_WIDTH).div_ceil(max) };
        let _ = writeln!(out, "   {score} | {:<BAR_WIDTH$} {count}", "█".repeat(bar));
    }
    out
}

/// Detail card for one lead
pub fn format_detail(record: &EnrichedRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Company:  {}", or_dash(record.company()));
    let _ = writeln!(out, "Contact:  {}", or_dash(record.raw.contact_name.as_deref()));
    let _ = writeln!(out, "Email:    {}", or_dash(record.raw.email.as_deref()));
    let phone = if record.phone_raw.is_empty() { "-" } else { record.phone_raw.as_str() };
    let _ = writeln!(out, "Phone:    {}", phone);
    let _ = writeln!(out, "DDD:      {}", or_dash(record.area_code.as_deref()));
    let _ = writeln!(out, "Domain:   {}", or_dash(record.domain.as_deref()));
    let _ = write!(out, "Score:    {}", record.score);
    out
}

/// Write enriched rows as CSV, raw columns first.
pub fn write_records_csv<W: Write>(writer: W, records: &[&EnrichedRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;

    for r in records {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        csv_writer.write_record([
            opt(&r.raw.company),
            opt(&r.raw.contact_name),
            opt(&r.raw.email),
            opt(&r.raw.phone_primary),
            opt(&r.raw.phone_secondary),
            r.phone_raw.clone(),
            r.phone_digits.clone(),
            opt(&r.area_code),
            opt(&r.domain),
            r.is_corporate.to_string(),
            r.phone_valid.to_string(),
            r.score.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn records_to_json(records: &[&EnrichedRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
