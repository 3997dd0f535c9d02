//! Raster rendering of the dependency graph.
//!
//! Layout is Fruchterman–Reingold with optimal distance `k = 0.3`, starting
//! from random positions in the unit square and cooling linearly. Nodes are
//! drawn with an area of `100 + 30 × fan-in` square points at 100 dpi.

use crate::core::graph::DependencyGraph;
use crate::domain::model::PlotOptions;
use crate::utils::error::Result;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use rand::rngs::StdRng;
use rand::Rng;
use std::io::Cursor;

pub const LAYOUT_K: f64 = 0.3;
pub const DEFAULT_IMAGE_PATH: &str = "dependency_graph_analysis.png";

const DPI: f64 = 100.0;
const MARGIN: f64 = 40.0;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const EDGE_COLOR: Rgb<u8> = Rgb([160, 160, 160]);
const NODE_FILL: Rgb<u8> = Rgb([173, 216, 230]);
const NODE_OUTLINE: Rgb<u8> = Rgb([70, 110, 140]);

/// Node positions in `[-1, 1]²`, indexed like the graph's nodes.
pub fn spring_layout(graph: &DependencyGraph, iterations: usize, rng: &mut StdRng) -> Vec<(f64, f64)> {
    let n = graph.module_count();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(0.0, 0.0)];
    }

    let mut pos: Vec<(f64, f64)> = (0..n).map(|_| (rng.gen::<f64>(), rng.gen::<f64>())).collect();

    // 無向鄰接：有向邊兩端都互相吸引
    let mut adjacent = vec![vec![false; n]; n];
    for edge in graph.graph().raw_edges() {
        let (a, b) = (edge.source().index(), edge.target().index());
        adjacent[a][b] = true;
        adjacent[b][a] = true;
    }

    let span = |axis: fn(&(f64, f64)) -> f64, pos: &[(f64, f64)]| {
        let (min, max) = pos
            .iter()
            .map(axis)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        max - min
    };
    let mut temperature = span(|p| p.0, &pos).max(span(|p| p.1, &pos)) * 0.1;
    let cooling = temperature / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let mut displacement = vec![(0.0_f64, 0.0_f64); n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let distance = (dx * dx + dy * dy).sqrt().max(0.01);
                let attraction = if adjacent[i][j] { distance / LAYOUT_K } else { 0.0 };
                let force = LAYOUT_K * LAYOUT_K / (distance * distance) - attraction;
                displacement[i].0 += dx * force;
                displacement[i].1 += dy * force;
            }
        }
        for (p, d) in pos.iter_mut().zip(&displacement) {
            let length = (d.0 * d.0 + d.1 * d.1).sqrt();
            let length = if length < 0.01 { 0.1 } else { length };
            p.0 += d.0 * temperature / length;
            p.1 += d.1 * temperature / length;
        }
        temperature -= cooling;
    }

    rescale(&mut pos);
    pos
}

/// Center on the origin and scale so the largest coordinate is 1.
fn rescale(pos: &mut [(f64, f64)]) {
    let n = pos.len() as f64;
    let (cx, cy) = pos
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.0, sy + p.1));
    let (cx, cy) = (cx / n, cy / n);
    let mut lim: f64 = 0.0;
    for p in pos.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        lim = lim.max(p.0.abs()).max(p.1.abs());
    }
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= lim;
            p.1 /= lim;
        }
    }
}

/// Radius in pixels for a node with the given fan-in.
pub fn node_radius(fan_in: usize) -> f64 {
    let area_pt2 = 100.0 + 30.0 * fan_in as f64;
    area_pt2.sqrt() / 2.0 * DPI / 72.0
}

pub fn draw_graph(graph: &DependencyGraph, layout: &[(f64, f64)], options: &PlotOptions) -> RgbImage {
    let mut image = RgbImage::from_pixel(options.width, options.height, BACKGROUND);
    let (w, h) = (options.width as f64, options.height as f64);
    let to_pixel = |p: (f64, f64)| -> (f64, f64) {
        (
            MARGIN + (p.0 + 1.0) / 2.0 * (w - 2.0 * MARGIN),
            // 影像座標 y 軸向下
            MARGIN + (1.0 - (p.1 + 1.0) / 2.0) * (h - 2.0 * MARGIN),
        )
    };
    let radius: Vec<f64> = graph.nodes().map(|idx| node_radius(graph.fan_in(idx))).collect();

    for edge in graph.graph().raw_edges() {
        let (a, b) = (edge.source().index(), edge.target().index());
        if a == b {
            continue;
        }
        let (from, to) = (to_pixel(layout[a]), to_pixel(layout[b]));
        draw_arrow(&mut image, from, to, radius[b]);
    }

    for idx in graph.nodes() {
        let (x, y) = to_pixel(layout[idx.index()]);
        let center = (x.round() as i32, y.round() as i32);
        let r = radius[idx.index()].round() as i32;
        draw_filled_circle_mut(&mut image, center, r, NODE_FILL);
        draw_hollow_circle_mut(&mut image, center, r, NODE_OUTLINE);
    }

    image
}

fn draw_arrow(image: &mut RgbImage, from: (f64, f64), to: (f64, f64), target_radius: f64) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= target_radius {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);
    let tip = (to.0 - ux * target_radius, to.1 - uy * target_radius);
    draw_line_segment_mut(
        image,
        (from.0 as f32, from.1 as f32),
        (tip.0 as f32, tip.1 as f32),
        EDGE_COLOR,
    );

    let head = 8.0;
    for side in [-1.0, 1.0] {
        let wing = (
            tip.0 - ux * head - side * uy * head * 0.5,
            tip.1 - uy * head + side * ux * head * 0.5,
        );
        draw_line_segment_mut(
            image,
            (tip.0 as f32, tip.1 as f32),
            (wing.0 as f32, wing.1 as f32),
            EDGE_COLOR,
        );
    }
}

pub fn encode_png(image: RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Lay out, draw and encode the graph as PNG bytes.
pub fn render_png(graph: &DependencyGraph, options: &PlotOptions, rng: &mut StdRng) -> Result<Vec<u8>> {
    let layout = spring_layout(graph, options.iterations, rng);
    encode_png(draw_graph(graph, &layout, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::depth::seeded_rng;

    fn sample_graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        graph.add_imports("app", &["db", "utils", "models"]);
        graph.add_imports("models", &["db"]);
        graph.add_imports("utils", &["app"]);
        graph
    }

    #[test]
    fn test_layout_is_normalized() {
        let graph = sample_graph();
        let layout = spring_layout(&graph, 50, &mut seeded_rng(Some(3)));
        assert_eq!(layout.len(), 4);
        let max = layout
            .iter()
            .map(|p| p.0.abs().max(p.1.abs()))
            .fold(0.0_f64, f64::max);
        assert!((max - 1.0).abs() < 1e-9);
        assert!(layout.iter().all(|p| p.0.is_finite() && p.1.is_finite()));
    }

    #[test]
    fn test_node_size_grows_with_fan_in() {
        assert!(node_radius(4) > node_radius(0));
        // 100 pt² → 5 pt 半徑
        assert!((node_radius(0) - 5.0 * DPI / 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_render_png_produces_png_bytes() {
        let options = PlotOptions {
            width: 300,
            height: 200,
            iterations: 10,
        };
        let bytes = render_png(&sample_graph(), &options, &mut seeded_rng(Some(1))).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_empty_graph_still_renders() {
        let options = PlotOptions {
            width: 200,
            height: 200,
            iterations: 5,
        };
        let bytes = render_png(&DependencyGraph::new(), &options, &mut seeded_rng(Some(1))).unwrap();
        assert!(!bytes.is_empty());
    }
}
