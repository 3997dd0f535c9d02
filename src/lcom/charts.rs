//! Best-effort PNG charts for the classes with the highest LCOM1.

use crate::core::visualize::encode_png;
use crate::lcom::metrics::{ClassRow, LcomTable, PRIMARY_METRIC};
use crate::utils::error::{AnalyzerError, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

pub const CHART_CLASSES: usize = 15;
pub const HEATMAP_FILE: &str = "lcom_heatmap.png";
pub const BARCHART_FILE: &str = "lcom1_barchart.png";

const CELL_W: u32 = 80;
const CELL_H: u32 = 36;
const MARGIN: u32 = 30;
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([200, 200, 200]);
const BAR: Rgb<u8> = Rgb([76, 114, 176]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);

/// Yellow → orange → red ramp for a value in `[0, 1]`.
fn heat_color(t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let green = 255.0 - 200.0 * t;
    let blue = 204.0 * (1.0 - t).powi(2);
    Rgb([255, green as u8, blue as u8])
}

/// One row per class, one column per metric; colors are normalised per column.
pub fn heatmap(table: &LcomTable, rows: &[ClassRow]) -> Result<Vec<u8>> {
    let rows = &rows[..rows.len().min(CHART_CLASSES)];
    let columns = table.metric_names.len();
    if rows.is_empty() || columns == 0 {
        return Err(AnalyzerError::ProcessingError {
            message: "no LCOM values to plot".to_string(),
        });
    }

    let width = MARGIN * 2 + CELL_W * columns as u32;
    let height = MARGIN * 2 + CELL_H * rows.len() as u32;
    let mut image = RgbImage::from_pixel(width, height, WHITE);

    for col in 0..columns {
        let values: Vec<f64> = rows.iter().filter_map(|r| r.metrics[col]).collect();
        let (lo, hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));

        for (i, row) in rows.iter().enumerate() {
            let x = (MARGIN + CELL_W * col as u32) as i32;
            let y = (MARGIN + CELL_H * i as u32) as i32;
            let cell = Rect::at(x, y).of_size(CELL_W, CELL_H);
            let color = match row.metrics[col] {
                Some(v) if hi > lo => heat_color((v - lo) / (hi - lo)),
                Some(_) => heat_color(0.5),
                None => GRID,
            };
            draw_filled_rect_mut(&mut image, cell, color);
            draw_hollow_rect_mut(&mut image, cell, WHITE);
        }
    }

    encode_png(image)
}

/// LCOM1 bars for the given rows, tallest first.
pub fn bar_chart(table: &LcomTable, rows: &[ClassRow]) -> Result<Vec<u8>> {
    let index = table.require_metric(PRIMARY_METRIC)?;
    let rows = &rows[..rows.len().min(CHART_CLASSES)];
    let values: Vec<f64> = rows.iter().map(|r| r.metrics[index].unwrap_or(0.0)).collect();
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if values.is_empty() {
        return Err(AnalyzerError::ProcessingError {
            message: "no LCOM1 values to plot".to_string(),
        });
    }

    let bar_w = 40u32;
    let gap = 12u32;
    let plot_h = 400u32;
    let width = MARGIN * 2 + (bar_w + gap) * values.len() as u32;
    let height = MARGIN * 2 + plot_h;
    let mut image = RgbImage::from_pixel(width, height, WHITE);

    let baseline = (MARGIN + plot_h) as f32;
    draw_line_segment_mut(
        &mut image,
        (MARGIN as f32, baseline),
        ((width - MARGIN) as f32, baseline),
        AXIS,
    );
    draw_line_segment_mut(&mut image, (MARGIN as f32, MARGIN as f32), (MARGIN as f32, baseline), AXIS);

    for (i, value) in values.iter().enumerate() {
        let bar_h = if max > 0.0 {
            ((value / max) * plot_h as f64).round() as u32
        } else {
            0
        };
        if bar_h == 0 {
            continue;
        }
        let x = (MARGIN + gap / 2 + (bar_w + gap) * i as u32) as i32;
        let y = (MARGIN + plot_h - bar_h) as i32;
        draw_filled_rect_mut(&mut image, Rect::at(x, y).of_size(bar_w, bar_h), BAR);
    }

    encode_png(image)
}
