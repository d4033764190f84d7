// src/chart.rs
//
// Grid of bar charts, one subplot per tier of one classification, bars over
// the tiers of the other. `.svg` gets titles, labels and values; `.png` is a
// raster of panels and bars only.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};

use crate::compare::CountMatrix;
use crate::error::{QualisError, Result};

const PANEL_W: u32 = 480;
const PANEL_H: u32 = 340;
const TITLE_H: u32 = 48;
const PAD: u32 = 36;
const BAR_FILL: f64 = 0.7;

const BG: Rgb<u8> = Rgb([255, 255, 255]);
const FRAME: Rgb<u8> = Rgb([229, 236, 246]);
const AXIS: Rgb<u8> = Rgb([90, 90, 90]);
const BAR: Rgb<u8> = Rgb([99, 110, 250]);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subplot {
    pub title: String,
    pub categories: Vec<String>,
    pub counts: Vec<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartGrid {
    pub title: String,
    pub columns: usize,
    pub subplots: Vec<Subplot>,
}

impl ChartGrid {
    pub fn rows(&self) -> usize {
        self.subplots.len().div_ceil(self.columns.max(1))
    }

    fn cols(&self) -> usize {
        self.columns.max(1).min(self.subplots.len().max(1))
    }

    fn size(&self) -> (u32, u32) {
        (
            self.cols() as u32 * PANEL_W,
            TITLE_H + self.rows().max(1) as u32 * PANEL_H,
        )
    }

    /// Top-left corner of subplot `i` (row-major).
    fn origin(&self, i: usize) -> (u32, u32) {
        let cols = self.columns.max(1);
        ((i % cols) as u32 * PANEL_W, TITLE_H + (i / cols) as u32 * PANEL_H)
    }

    /// One subplot per mapped ("new") tier; bars over the subject ("old") tiers.
    pub fn by_mapping_tier(matrix: &CountMatrix, title_prefix: &str, columns: usize) -> Self {
        let categories = matrix.subject_order().labels();
        let subplots = matrix
            .mapping_order()
            .iter()
            .map(|m| Subplot {
                title: join!(title_prefix, m.label()),
                categories: categories.clone(),
                counts: matrix.row(m).map(<[u64]>::to_vec).unwrap_or_default(),
            })
            .collect();
        Self { title: s!("Qualis: current tier by new tier"), columns, subplots }
    }

    /// One subplot per subject ("old") tier; bars over the mapped ("new") tiers.
    pub fn by_subject_tier(matrix: &CountMatrix, title_prefix: &str, columns: usize) -> Self {
        let categories = matrix.mapping_order().labels();
        let subplots = matrix
            .subject_order()
            .iter()
            .map(|s| Subplot {
                title: join!(title_prefix, s.label()),
                categories: categories.clone(),
                counts: matrix.column(s).unwrap_or_default(),
            })
            .collect();
        Self { title: s!("Qualis: new tier by current tier"), columns, subplots }
    }
}

pub trait ChartRenderer {
    fn render(&self, grid: &ChartGrid, path: &Path) -> Result<()>;
}

/// Render with the backend matching the file extension.
pub fn render(grid: &ChartGrid, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    logf!("Plotting {} subplots to {}", grid.subplots.len(), path.display());
    match ext.as_str() {
        "svg" => SvgRenderer.render(grid, path),
        "png" => PngRenderer.render(grid, path),
        other => Err(QualisError::Render(format!(
            "unsupported chart format {other:?} for {} (use .svg or .png)",
            path.display()
        ))),
    }
}

/// Bar geometry shared by both backends: `(x, y, w, h)` per category,
/// relative to the panel origin.
fn bar_rects(sp: &Subplot) -> Vec<(u32, u32, u32, u32)> {
    let n = sp.categories.len().max(1) as u32;
    let plot_w = PANEL_W - 2 * PAD;
    let plot_h = PANEL_H - 3 * PAD;
    let slot = plot_w / n;
    let bar_w = ((slot as f64) * BAR_FILL).max(1.0) as u32;
    let max = sp.counts.iter().copied().max().unwrap_or(0).max(1);

    sp.counts
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let h = ((c as f64 / max as f64) * plot_h as f64).round() as u32;
            let x = PAD + i as u32 * slot + (slot - bar_w) / 2;
            let y = PAD + plot_h - h;
            (x, y, bar_w, h)
        })
        .collect()
}

fn baseline_y() -> u32 {
    PANEL_H - 2 * PAD
}

/* ---------------- SVG ---------------- */

pub struct SvgRenderer;

impl SvgRenderer {
    pub fn to_svg(&self, grid: &ChartGrid) -> String {
        let (w, h) = grid.size();
        let mut out = s!();
        let _ = writeln!(out, r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#);
        let _ = writeln!(out, r#"<rect width="{w}" height="{h}" fill="white"/>"#);
        let _ = writeln!(out, r#"<text x="{}" y="30" font-size="20" text-anchor="middle">{}</text>"#, w / 2, xml_escape(&grid.title));

        for (i, sp) in grid.subplots.iter().enumerate() {
            let (ox, oy) = grid.origin(i);
            let _ = writeln!(out, r#"<g transform="translate({ox},{oy})">"#);
            let _ = writeln!(out, r#"<rect x="{PAD}" y="{PAD}" width="{}" height="{}" fill="rgb(229,236,246)"/>"#, PANEL_W - 2 * PAD, PANEL_H - 3 * PAD);
            let _ = writeln!(out, r#"<text x="{}" y="{}" font-size="15" text-anchor="middle">{}</text>"#, PANEL_W / 2, PAD - 10, xml_escape(&sp.title));

            let rects = bar_rects(sp);
            for ((x, y, bw, bh), (label, count)) in rects.iter().zip(sp.categories.iter().zip(&sp.counts)) {
                let cx = x + bw / 2;
                let _ = writeln!(out, r#"<rect x="{x}" y="{y}" width="{bw}" height="{bh}" fill="rgb(99,110,250)"><title>{}: {count}</title></rect>"#, xml_escape(label));
                let _ = writeln!(out, r#"<text x="{cx}" y="{}" font-size="11" text-anchor="middle">{count}</text>"#, y.saturating_sub(4));
                let _ = writeln!(out, r#"<text x="{cx}" y="{}" font-size="12" text-anchor="middle">{}</text>"#, baseline_y() + 18, xml_escape(label));
            }
            let _ = writeln!(out, "</g>");
        }
        out.push_str("</svg>\n");
        out
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(&self, grid: &ChartGrid, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        fs::write(path, self.to_svg(grid))?;
        Ok(())
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/* ---------------- PNG ---------------- */

pub struct PngRenderer;

impl PngRenderer {
    pub fn to_image(&self, grid: &ChartGrid) -> RgbImage {
        let (w, h) = grid.size();
        let mut img = RgbImage::from_pixel(w, h, BG);

        for (i, sp) in grid.subplots.iter().enumerate() {
            let (ox, oy) = grid.origin(i);
            fill_rect(&mut img, ox + PAD, oy + PAD, PANEL_W - 2 * PAD, PANEL_H - 3 * PAD, FRAME);
            fill_rect(&mut img, ox + PAD, oy + baseline_y(), PANEL_W - 2 * PAD, 1, AXIS);
            for (x, y, bw, bh) in bar_rects(sp) {
                fill_rect(&mut img, ox + x, oy + y, bw, bh, BAR);
            }
        }
        img
    }
}

impl ChartRenderer for PngRenderer {
    fn render(&self, grid: &ChartGrid, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        self.to_image(grid).save(path)?;
        Ok(())
    }
}

/// Clipped to the image bounds.
fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for yy in y..y_end {
        for xx in x..x_end {
            img.put_pixel(xx, yy, color);
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
