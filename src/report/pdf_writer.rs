use std::{
    fs::File,
    io::BufWriter,
    path::Path,
};

use printpdf::{
    path::{PaintMode, WindingOrder},
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::errors::{JournalError, Result};

use super::{csv_writer::export_io, ReportRow, ReportTable, RowKind};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const TOP: f32 = 20.0;
const BOTTOM: f32 = 15.0;
const TITLE_GAP: f32 = 5.0;
const ROW_HEIGHT: f32 = 7.0;
const TEXT_INSET: f32 = 1.8;
const TEXT_BASELINE: f32 = 2.3;
const TITLE_SIZE: f32 = 14.0;
const CELL_SIZE: f32 = 9.5;
/// The first column carries names and is wider than the money columns.
const FIRST_COLUMN_WEIGHT: f32 = 1.6;

const HEADER_FILL: (u8, u8, u8) = (33, 37, 41);
const GROUP_FILL: (u8, u8, u8) = (240, 240, 240);
const TOTAL_FILL: (u8, u8, u8) = (226, 230, 234);
const GRID: (u8, u8, u8) = (160, 160, 160);

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn first_non_latin_text(table: &ReportTable) -> Option<&str> {
    std::iter::once(&table.title)
        .chain(table.head.iter())
        .chain(table.rows.iter().flat_map(|row| row.cells.iter()))
        .map(String::as_str)
        .find(|text| text.chars().any(|ch| ch > '\u{FF}'))
}

fn pdf_error(err: printpdf::Error) -> JournalError {
    JournalError::Export(err.to_string())
}

/// Writes `table` as an A4 portrait document with a grid table under the
/// title. `font` should point at a TrueType font with Cyrillic glyphs; the
/// built-in Helvetica only covers Latin-1, so text outside it is refused
/// when no font is given.
pub fn write_pdf(table: &ReportTable, path: &Path, font: Option<&Path>) -> Result<()> {
    if font.is_none() {
        if let Some(text) = first_non_latin_text(table) {
            return Err(JournalError::Export(format!(
                "`{}` cannot be drawn with the built-in PDF font; set a TrueType font with `config set pdf-font <file.ttf>`",
                text
            )));
        }
    }
    let (doc, page, layer) =
        PdfDocument::new(&table.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = load_font(&doc, font)?;
    let widths = column_widths(table.head.len());

    let mut canvas = Canvas {
        layer: doc.get_page(page).get_layer(layer),
        font: &font,
        widths: &widths,
        top: PAGE_HEIGHT - TOP,
    };
    canvas.layer.use_text(
        table.title.as_str(),
        TITLE_SIZE,
        Mm(MARGIN),
        Mm(canvas.top),
        canvas.font,
    );
    canvas.top -= TITLE_GAP;
    canvas.header(&table.head);

    let mut pages = 1;
    for row in &table.rows {
        if canvas.top - ROW_HEIGHT < BOTTOM {
            pages += 1;
            let (page, layer) = doc.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("Layer {}", pages),
            );
            canvas.layer = doc.get_page(page).get_layer(layer);
            canvas.top = PAGE_HEIGHT - TOP;
            canvas.header(&table.head);
        }
        canvas.row(row);
    }

    let file = File::create(path).map_err(export_io)?;
    doc.save(&mut BufWriter::new(file)).map_err(pdf_error)?;
    tracing::debug!(path = %path.display(), pages, "pdf written");
    Ok(())
}

fn load_font(doc: &PdfDocumentReference, font: Option<&Path>) -> Result<IndirectFontRef> {
    match font {
        Some(path) => {
            let file = File::open(path).map_err(|err| {
                JournalError::Export(format!("cannot open font {}: {}", path.display(), err))
            })?;
            doc.add_external_font(file).map_err(pdf_error)
        }
        None => {
            tracing::debug!("no pdf font configured, using Helvetica");
            doc.add_builtin_font(BuiltinFont::Helvetica)
                .map_err(pdf_error)
        }
    }
}

fn column_widths(columns: usize) -> Vec<f32> {
    if columns == 0 {
        return Vec::new();
    }
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    let unit = usable / (FIRST_COLUMN_WEIGHT + (columns - 1) as f32);
    (0..columns)
        .map(|idx| if idx == 0 { unit * FIRST_COLUMN_WEIGHT } else { unit })
        .collect()
}

struct Canvas<'a> {
    layer: PdfLayerReference,
    font: &'a IndirectFontRef,
    widths: &'a [f32],
    /// Upper edge of the next row, in millimetres from the page bottom.
    top: f32,
}

impl Canvas<'_> {
    fn header(&mut self, head: &[String]) {
        self.fill(rgb(HEADER_FILL));
        self.layer.set_fill_color(rgb((255, 255, 255)));
        self.cells(head);
        self.layer.set_fill_color(rgb((0, 0, 0)));
        self.grid(true);
        self.top -= ROW_HEIGHT;
    }

    fn row(&mut self, row: &ReportRow) {
        match row.kind {
            RowKind::Group => {
                self.fill(rgb(GROUP_FILL));
                self.layer.set_fill_color(rgb((0, 0, 0)));
                if let Some(label) = row.cells.first() {
                    self.text(label, MARGIN);
                }
                self.grid(false);
            }
            RowKind::Total => {
                self.fill(rgb(TOTAL_FILL));
                self.layer.set_fill_color(rgb((0, 0, 0)));
                self.cells(&row.cells);
                self.grid(true);
            }
            RowKind::Body => {
                self.layer.set_fill_color(rgb((0, 0, 0)));
                self.cells(&row.cells);
                self.grid(true);
            }
        }
        self.top -= ROW_HEIGHT;
    }

    fn cells(&self, cells: &[String]) {
        let mut left = MARGIN;
        for (cell, width) in cells.iter().zip(self.widths) {
            if !cell.is_empty() {
                self.text(cell, left);
            }
            left += width;
        }
    }

    fn text(&self, value: &str, left: f32) {
        self.layer.use_text(
            value,
            CELL_SIZE,
            Mm(left + TEXT_INSET),
            Mm(self.top - ROW_HEIGHT + TEXT_BASELINE),
            self.font,
        );
    }

    fn fill(&self, color: Color) {
        let (left, right) = (MARGIN, PAGE_WIDTH - MARGIN);
        let (top, bottom) = (self.top, self.top - ROW_HEIGHT);
        self.layer.set_fill_color(color);
        self.layer.add_polygon(Polygon {
            rings: vec![vec![
                (Point::new(Mm(left), Mm(bottom)), false),
                (Point::new(Mm(right), Mm(bottom)), false),
                (Point::new(Mm(right), Mm(top)), false),
                (Point::new(Mm(left), Mm(top)), false),
            ]],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    /// Row outline plus column separators unless the row spans all columns.
    fn grid(&self, with_columns: bool) {
        let (left, right) = (MARGIN, PAGE_WIDTH - MARGIN);
        let (top, bottom) = (self.top, self.top - ROW_HEIGHT);
        self.layer.set_outline_color(rgb(GRID));
        self.layer.set_outline_thickness(0.3);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(left), Mm(bottom)), false),
                (Point::new(Mm(right), Mm(bottom)), false),
                (Point::new(Mm(right), Mm(top)), false),
                (Point::new(Mm(left), Mm(top)), false),
            ],
            is_closed: true,
        });
        if !with_columns {
            return;
        }
        let mut x = left;
        for width in self.widths.iter().take(self.widths.len().saturating_sub(1)) {
            x += width;
            self.layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(x), Mm(bottom)), false),
                    (Point::new(Mm(x), Mm(top)), false),
                ],
                is_closed: false,
            });
        }
    }
}
