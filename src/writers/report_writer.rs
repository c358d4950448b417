use crate::error::Result;
use crate::models::StationStatus;
use crate::utils::constants::{
    COL_LAST_UPDATE, COL_STATION, READING_COLUMNS, READING_UNITS, REPORT_SOURCE_URL,
    TIMESTAMP_FORMAT,
};
use crate::writers::atomic::write_atomically;
use chrono::{DateTime, FixedOffset};
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

/// Human-readable status page, regenerated every run
pub struct ReportWriter {
    title: String,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            title: "Datos Metereologicos de Bolivia".to_string(),
        }
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn write(
        &self,
        path: &Path,
        as_of: &DateTime<FixedOffset>,
        status: &[StationStatus],
    ) -> Result<()> {
        let report = self.render(as_of, status);
        write_atomically(path, |out| {
            out.write_all(report.as_bytes())?;
            Ok(())
        })
    }

    pub fn render(&self, as_of: &DateTime<FixedOffset>, status: &[StationStatus]) -> String {
        let mut out = String::new();

        let _ = write!(
            out,
            "### {}   \n\n#### Estado {}:   \n\n",
            self.title,
            as_of.format("%Y-%m-%d")
        );

        let status_rows: Vec<Vec<String>> = status
            .iter()
            .map(|s| {
                vec![
                    s.station.clone(),
                    s.last_update.format(TIMESTAMP_FORMAT).to_string(),
                ]
            })
            .collect();
        out.push_str(&markdown_table(&[COL_STATION, COL_LAST_UPDATE], &status_rows));
        out.push_str("\n\n");

        let _ = write!(
            out,
            "#### Meta:   \n\nFuente: {}   \nUnidades:   \n\n",
            REPORT_SOURCE_URL
        );

        let unit_rows: Vec<Vec<String>> = READING_COLUMNS
            .iter()
            .zip(READING_UNITS.iter())
            .map(|(column, unit)| vec![column.to_string(), unit.to_string()])
            .collect();
        out.push_str(&markdown_table(&["variable", "unidad"], &unit_rows));
        out.push_str("\n\n");

        out
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Left-aligned pipe table with columns padded to their widest cell
fn markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!(" {}{} ", cell, " ".repeat(pad))
            })
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut lines = vec![line(headers.to_vec())];
    let rule: Vec<String> = widths
        .iter()
        .map(|w| format!(":{}", "-".repeat((*w + 1).max(3))))
        .collect();
    lines.push(format!("|{}|", rule.join("|")));
    for row in rows {
        lines.push(line(row.iter().map(String::as_str).collect()));
    }

    lines.join("\n")
}
