//! Day and week reports for the shop owner.
//!
//! Builders turn journal state into a [`ReportTable`]; the writers in
//! [`csv_writer`] and [`pdf_writer`] put a table on disk. Building never
//! touches the journal, so exporting does not roll the day over.

pub mod csv_writer;
pub mod pdf_writer;

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    config::Config,
    core::{split::compute_day_totals, utils::ensure_dir},
    currency::{format_date_ru, format_plain, format_rubles},
    domain::AppState,
    errors::{JournalError, Result},
};

pub const TOTAL_LABEL: &str = "ИТОГО";
pub const DAY_TOTAL_LABEL: &str = "ИТОГО ЗА ДЕНЬ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    Day,
    Week,
}

impl FromStr for ReportScope {
    type Err = JournalError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "day" | "день" => Ok(ReportScope::Day),
            "week" | "неделя" => Ok(ReportScope::Week),
            other => Err(JournalError::validation(format!(
                "unknown report `{}` (expected day or week)",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportScope::Day => write!(f, "day"),
            ReportScope::Week => write!(f, "week"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Pdf,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = JournalError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "pdf" => Ok(ReportFormat::Pdf),
            other => Err(JournalError::validation(format!(
                "unknown format `{}` (expected csv or pdf)",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Body,
    /// Date banner spanning the full width; only the first cell is used.
    Group,
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub kind: RowKind,
    pub cells: Vec<String>,
}

impl ReportRow {
    fn body(cells: Vec<String>) -> Self {
        Self {
            kind: RowKind::Body,
            cells,
        }
    }

    fn total(cells: Vec<String>) -> Self {
        Self {
            kind: RowKind::Total,
            cells,
        }
    }

    fn group(label: String) -> Self {
        Self {
            kind: RowKind::Group,
            cells: vec![label],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub title: String,
    pub head: Vec<String>,
    pub rows: Vec<ReportRow>,
    pub file_name: String,
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn day_file_name(state: &AppState, shop: &str, format: ReportFormat) -> String {
    format!(
        "Отчет_{}_день_{}.{}",
        shop,
        state.last_persisted_date,
        format.extension()
    )
}

fn week_file_name(shop: &str, format: ReportFormat) -> String {
    format!("Отчет_{}_неделя.{}", shop, format.extension())
}

/// Every roster master with raw numbers, then the service total.
pub fn day_csv(state: &AppState, shop: &str) -> ReportTable {
    let totals = compute_day_totals(&state.today);
    let mut rows: Vec<ReportRow> = totals
        .masters
        .iter()
        .map(|(master, d)| {
            ReportRow::body(vec![
                master.display_name().to_string(),
                format_plain(d.total_amount),
                d.bonus_percent.to_string(),
                format_plain(d.director_share),
                format_plain(d.master_share),
                format_plain(d.cash),
                format_plain(d.card),
            ])
        })
        .collect();
    let service = totals.service;
    rows.push(ReportRow::total(vec![
        TOTAL_LABEL.to_string(),
        format_plain(service.total),
        String::new(),
        format_plain(service.director_total),
        format_plain(service.master_total),
        format_plain(service.cash),
        format_plain(service.card),
    ]));
    ReportTable {
        title: format!("Отчет за день: {}", format_date_ru(state.last_persisted_date)),
        head: labels(&[
            "Имя",
            "Общая выручка",
            "Премия, %",
            "Доля Директора",
            "З/П Мастера",
            "Наличные",
            "Карта",
        ]),
        rows,
        file_name: day_file_name(state, shop, ReportFormat::Csv),
    }
}

/// Masters with revenue only, amounts rendered as roubles.
pub fn day_pdf(state: &AppState, shop: &str) -> ReportTable {
    let totals = compute_day_totals(&state.today);
    let mut rows: Vec<ReportRow> = totals
        .with_revenue()
        .map(|(master, d)| {
            ReportRow::body(vec![
                master.display_name().to_string(),
                format_rubles(d.total_amount),
                format_rubles(d.master_share),
                format_rubles(d.cash),
                format_rubles(d.card),
            ])
        })
        .collect();
    let service = totals.service;
    rows.push(ReportRow::total(vec![
        TOTAL_LABEL.to_string(),
        format_rubles(service.total),
        format_rubles(service.master_total),
        format_rubles(service.cash),
        format_rubles(service.card),
    ]));
    ReportTable {
        title: format!("Отчет за день: {}", format_date_ru(state.last_persisted_date)),
        head: labels(&["Имя", "Выручка", "З/П Мастера", "Наличные", "Карта"]),
        rows,
        file_name: day_file_name(state, shop, ReportFormat::Pdf),
    }
}

fn ensure_history(state: &AppState) -> Result<()> {
    if state.history.is_empty() {
        return Err(JournalError::Export(
            "the week archive is empty, nothing to export".into(),
        ));
    }
    Ok(())
}

pub fn week_csv(state: &AppState, shop: &str) -> Result<ReportTable> {
    ensure_history(state)?;
    let mut rows = Vec::new();
    for (date, day) in state.history.iter() {
        let date_label = date.to_string();
        let totals = compute_day_totals(day);
        for (master, d) in totals.with_revenue() {
            rows.push(ReportRow::body(vec![
                date_label.clone(),
                master.display_name().to_string(),
                format_plain(d.total_amount),
                d.bonus_percent.to_string(),
                format_plain(d.director_share),
                format_plain(d.master_share),
            ]));
        }
        rows.push(ReportRow::total(vec![
            date_label,
            DAY_TOTAL_LABEL.to_string(),
            format_plain(totals.service.total),
            String::new(),
            format_plain(totals.service.director_total),
            format_plain(totals.service.master_total),
        ]));
    }
    Ok(ReportTable {
        title: "Отчет за неделю".into(),
        head: labels(&[
            "Дата",
            "Имя",
            "Общая выручка",
            "Премия, %",
            "Доля Директора",
            "З/П Мастера",
        ]),
        rows,
        file_name: week_file_name(shop, ReportFormat::Csv),
    })
}

pub fn week_pdf(state: &AppState, shop: &str) -> Result<ReportTable> {
    ensure_history(state)?;
    let mut rows = Vec::new();
    for (date, day) in state.history.iter() {
        let totals = compute_day_totals(day);
        rows.push(ReportRow::group(format_date_ru(date)));
        for (master, d) in totals.with_revenue() {
            rows.push(ReportRow::body(vec![
                String::new(),
                master.display_name().to_string(),
                format_rubles(d.total_amount),
                format_rubles(d.master_share),
            ]));
        }
        rows.push(ReportRow::total(vec![
            String::new(),
            TOTAL_LABEL.to_string(),
            format_rubles(totals.service.total),
            format_rubles(totals.service.master_total),
        ]));
    }
    Ok(ReportTable {
        title: "Отчет за неделю".into(),
        head: labels(&["Дата", "Имя", "Выручка", "З/П Мастера"]),
        rows,
        file_name: week_file_name(shop, ReportFormat::Pdf),
    })
}

pub fn build(
    state: &AppState,
    scope: ReportScope,
    format: ReportFormat,
    shop: &str,
) -> Result<ReportTable> {
    match (scope, format) {
        (ReportScope::Day, ReportFormat::Csv) => Ok(day_csv(state, shop)),
        (ReportScope::Day, ReportFormat::Pdf) => Ok(day_pdf(state, shop)),
        (ReportScope::Week, ReportFormat::Csv) => week_csv(state, shop),
        (ReportScope::Week, ReportFormat::Pdf) => week_pdf(state, shop),
    }
}

/// Builds the report and writes it into `dir`, returning the file path.
pub fn export(
    state: &AppState,
    scope: ReportScope,
    format: ReportFormat,
    dir: &Path,
    config: &Config,
) -> Result<PathBuf> {
    let table = build(state, scope, format, &config.shop_name)?;
    ensure_dir(dir).map_err(|err| {
        JournalError::Export(format!("cannot create {}: {}", dir.display(), err))
    })?;
    let path = dir.join(&table.file_name);
    match format {
        ReportFormat::Csv => csv_writer::write_csv(&table, &path)?,
        ReportFormat::Pdf => pdf_writer::write_pdf(&table, &path, config.pdf_font.as_deref())?,
    }
    tracing::info!(%scope, %format, path = %path.display(), rows = table.rows.len(), "report exported");
    Ok(path)
}
