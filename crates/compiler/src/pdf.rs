//! PDF backend
//!
//! Renders the document model to PDF bytes with `genpdf`. Charts are
//! rasterized into a scratch temp dir, embedded at their fixed display
//! width, and removed with the dir when rendering finishes - on the error
//! paths too, since cleanup rides on `TempDir`'s drop.
//!
//! Rendering goes to an in-memory buffer; the caller writes the output file
//! only after the whole document rendered, so a failed run never leaves a
//! half-written report behind.

use genpdf::elements::{Break, FrameCellDecorator, Image, Paragraph, TableLayout};
use genpdf::style::Style;
use genpdf::{fonts, Alignment, Element, SimplePageDecorator};

use crate::charts;
use crate::error::CompileError;
use crate::report::{Block, ReportDoc, TableBlock};

/// Font directories to search on different platforms
const FONT_DIRS: &[&str] = &[
    "./fonts",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/truetype/dejavu",
    "/System/Library/Fonts",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
];

fn find_font_family() -> Result<fonts::FontFamily<fonts::FontData>, CompileError> {
    FONT_DIRS
        .iter()
        .map(std::path::Path::new)
        .filter(|dir| dir.exists())
        .find_map(|dir| {
            let dir = dir.to_str().unwrap_or(".");
            // embed the fonts (no builtin fallback) so non-ASCII labels survive
            fonts::from_files(dir, "LiberationSans", None).ok()
        })
        .ok_or_else(|| {
            CompileError::Pdf(format!(
                "no suitable fonts found; searched {:?} for LiberationSans",
                FONT_DIRS
            ))
        })
}

/// Renders a [`ReportDoc`] to PDF bytes.
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, doc: &ReportDoc) -> Result<Vec<u8>, CompileError> {
        let font_family = find_font_family()?;

        let mut document = genpdf::Document::new(font_family);
        document.set_title(doc.title.clone());
        document.set_minimal_conformance();
        document.set_line_spacing(1.25);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(15);
        document.set_page_decorator(decorator);

        document.push(
            Paragraph::new(doc.title.as_str()).styled(Style::new().bold().with_font_size(18)),
        );
        document.push(Break::new(0.5));

        for line in &doc.meta {
            document.push(Paragraph::new(line.as_str()).styled(Style::new().with_font_size(10)));
        }
        document.push(Break::new(1.0));

        // scratch dir for chart rasters; dropped (and deleted) on every exit
        let charts_dir = tempfile::tempdir()?;
        let mut chart_seq = 0usize;

        for section in &doc.sections {
            document.push(
                Paragraph::new(section.heading.as_str())
                    .styled(Style::new().bold().with_font_size(14)),
            );
            document.push(Break::new(0.3));

            for block in &section.blocks {
                match block {
                    Block::Paragraph(text) => {
                        document.push(
                            Paragraph::new(text.as_str()).styled(Style::new().with_font_size(11)),
                        );
                    }
                    Block::Subheading(text) => {
                        document.push(
                            Paragraph::new(text.as_str())
                                .styled(Style::new().bold().with_font_size(11)),
                        );
                    }
                    Block::Table(table) => {
                        document.push(
                            Paragraph::new(table.caption.as_str())
                                .styled(Style::new().with_font_size(11)),
                        );
                        document.push(Break::new(0.2));
                        document.push(build_table(table)?);
                        document.push(Break::new(0.5));
                    }
                    Block::Chart(chart) => {
                        chart_seq += 1;
                        let path = charts_dir
                            .path()
                            .join(format!("chart_{:02}.png", chart_seq));
                        charts::render_chart(chart, &path)?;

                        let dpi = charts::raster_width(chart.kind) as f64 / chart.display_width_in;
                        let image = Image::from_path(&path)
                            .map_err(pdf_err)?
                            .with_alignment(Alignment::Center)
                            .with_dpi(dpi);
                        document.push(image);
                        document.push(Break::new(0.5));
                    }
                }
            }
            document.push(Break::new(1.0));
        }

        let mut buffer = Vec::new();
        document.render(&mut buffer).map_err(pdf_err)?;
        Ok(buffer)
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Grid-styled table: framed cells, bold header row, stringified cells.
fn build_table(table: &TableBlock) -> Result<TableLayout, CompileError> {
    let mut layout = TableLayout::new(vec![1; table.columns.len().max(1)]);
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let mut header = layout.row();
    for name in &table.columns {
        header.push_element(
            Paragraph::new(name.as_str())
                .styled(Style::new().bold().with_font_size(10))
                .padded(1),
        );
    }
    header.push().map_err(pdf_err)?;

    for cells in &table.rows {
        let mut row = layout.row();
        for cell in cells {
            row.push_element(
                Paragraph::new(cell.as_str())
                    .styled(Style::new().with_font_size(10))
                    .padded(1),
            );
        }
        row.push().map_err(pdf_err)?;
    }

    Ok(layout)
}

fn pdf_err<E: std::fmt::Display>(err: E) -> CompileError {
    CompileError::Pdf(err.to_string())
}
