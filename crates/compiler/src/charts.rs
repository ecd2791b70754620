//! Chart rendering
//!
//! Renders the chart specs of the document model to PNG files with
//! `plotters`: horizontal bar charts for ranked categorical counts and pie
//! charts for proportion-style dimensions. The files live in a scratch
//! directory owned by the PDF backend and never survive the run.

use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::{Palette, Palette99};
use std::path::Path;

use threatlog_core::AggregateRow;

use crate::error::CompileError;
use crate::report::{ChartBlock, ChartKind};

/// Raster size of a bar chart, px.
pub const BAR_SIZE: (u32, u32) = (1000, 600);
/// Raster size of a pie chart, px.
pub const PIE_SIZE: (u32, u32) = (700, 700);

/// Raster pixel width for a chart kind; the PDF backend derives the embed
/// dpi from this and the display width.
pub fn raster_width(kind: ChartKind) -> u32 {
    match kind {
        ChartKind::Bar => BAR_SIZE.0,
        ChartKind::Pie => PIE_SIZE.0,
    }
}

pub fn render_chart(block: &ChartBlock, path: &Path) -> Result<(), CompileError> {
    match block.kind {
        ChartKind::Bar => render_bar(&block.title, &block.entries, path),
        ChartKind::Pie => render_pie(&block.title, &block.entries, path),
    }
}

fn render_bar(title: &str, entries: &[AggregateRow], path: &Path) -> Result<(), CompileError> {
    let root = BitMapBackend::new(path, BAR_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let n = entries.len();
    let max = entries.iter().map(|e| e.count).max().unwrap_or(0).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(220)
        .build_cartesian_2d(0u64..max + max / 10 + 1, (0usize..n).into_segmented())
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Count")
        .y_labels(n)
        .y_label_formatter(&|segment| {
            // slot 0 is the bottom row; entries are drawn largest on top
            let index = match segment {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => *i,
                _ => return String::new(),
            };
            n.checked_sub(index + 1)
                .and_then(|slot| entries.get(slot))
                .map(|e| e.value.clone())
                .unwrap_or_default()
        })
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(entries.iter().enumerate().map(|(i, entry)| {
            let slot = n - 1 - i;
            Rectangle::new(
                [
                    (0, SegmentValue::Exact(slot)),
                    (entry.count, SegmentValue::Exact(slot + 1)),
                ],
                palette_color(i).mix(0.85).filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn render_pie(title: &str, entries: &[AggregateRow], path: &Path) -> Result<(), CompileError> {
    let root = BitMapBackend::new(path, PIE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let root = root
        .titled(title, ("sans-serif", 28))
        .map_err(chart_err)?;

    let sizes: Vec<f64> = entries.iter().map(|e| e.count as f64).collect();
    let labels: Vec<String> = entries
        .iter()
        .map(|e| format!("{} ({:.2}%)", e.value, e.percent))
        .collect();
    let colors: Vec<RGBColor> = (0..entries.len()).map(palette_color).collect();

    let center = (PIE_SIZE.0 as i32 / 2, PIE_SIZE.1 as i32 / 2);
    let radius = PIE_SIZE.0.min(PIE_SIZE.1) as f64 * 0.32;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(90.0);
    pie.label_style(("sans-serif", 18).into_font().color(&BLACK));

    root.draw(&pie).map_err(chart_err)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

fn palette_color(index: usize) -> RGBColor {
    let (r, g, b) = Palette99::COLORS[index % Palette99::COLORS.len()];
    RGBColor(r, g, b)
}

fn chart_err<E: std::fmt::Display>(err: E) -> CompileError {
    CompileError::Chart(err.to_string())
}
