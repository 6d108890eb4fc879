//! Static Chart Renderer
//! Writes the publication charts to a single PNG with plotters.
//!
//! Layout, top to bottom:
//! 1. Title: year range and paper count
//! 2. Publications Over Time (vertical bars)
//! 3. Top Journals (horizontal bars, largest at the top)
//! 4. Word Cloud of Titles, or the fallback notice

use crate::charts::plotter::truncate;
use crate::charts::wordcloud::{WordCloudLayout, WORD_PALETTE};
use crate::data::YearRange;
use crate::stats::{JournalCount, PaperSummary, YearCount};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

const REPORT_WIDTH: u32 = 1200;
const PANEL_HEIGHT: u32 = 560;
const FONT: &str = "sans-serif";

const YEAR_BAR: RGBColor = RGBColor(240, 128, 128);
const JOURNAL_BAR: RGBColor = RGBColor(76, 114, 176);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err(e: impl Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the charts of one filtered view to `path` as PNG.
    pub fn render_report(
        summary: &PaperSummary,
        word_cloud: Option<&WordCloudLayout>,
        range: YearRange,
        path: &Path,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (REPORT_WIDTH, PANEL_HEIGHT * 3 + 60))
            .into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let title = format!("CORD-19 papers from {range} ({} papers)", summary.total);
        let root = root.titled(&title, (FONT, 30)).map_err(draw_err)?;
        let panels = root.split_evenly((3, 1));

        Self::draw_year_panel(&panels[0], &summary.year_counts)?;
        Self::draw_journal_panel(&panels[1], &summary.top_journals)?;
        Self::draw_word_cloud_panel(&panels[2], word_cloud)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_notice<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        caption: &str,
        notice: &str,
    ) -> Result<(), RenderError> {
        let area = area.titled(caption, (FONT, 24)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        let style = (FONT, 20)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        area.draw(&Text::new(notice, (w as i32 / 2, h as i32 / 2), style))
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_year_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        counts: &[YearCount],
    ) -> Result<(), RenderError> {
        let (Some(first), Some(last)) = (counts.first(), counts.last()) else {
            return Self::draw_notice(area, "Publications Over Time", "No papers in range");
        };
        let max_count = counts.iter().map(|c| c.count).max().unwrap_or(0);

        let mut chart = ChartBuilder::on(area)
            .caption("Publications Over Time", (FONT, 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d((first.year..last.year + 1).into_segmented(), 0u32..max_count + 1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Year")
            .y_desc("Number of Papers")
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(year) | SegmentValue::Exact(year) => year.to_string(),
                SegmentValue::Last => String::new(),
            })
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(YEAR_BAR.filled())
                    .margin(6)
                    .data(counts.iter().map(|c| (c.year, c.count))),
            )
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_journal_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        journals: &[JournalCount],
    ) -> Result<(), RenderError> {
        if journals.is_empty() {
            return Self::draw_notice(area, "Top Journals", "No journal data");
        }
        let n = journals.len();
        let max_count = journals.iter().map(|j| j.count).max().unwrap_or(0);
        // Index 0 sits at the bottom of the y axis.
        let labels: Vec<String> = journals.iter().rev().map(|j| truncate(&j.journal, 40)).collect();

        let mut chart = ChartBuilder::on(area)
            .caption("Top Journals", (FONT, 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(300)
            .build_cartesian_2d(0u32..max_count + 1, (0usize..n).into_segmented())
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .x_desc("Number of Papers")
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(idx) | SegmentValue::Exact(idx) => {
                    labels.get(*idx).cloned().unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            })
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::horizontal(&chart)
                    .style(JOURNAL_BAR.filled())
                    .margin(6)
                    .data(journals.iter().enumerate().map(|(i, j)| (n - 1 - i, j.count))),
            )
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_word_cloud_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        layout: Option<&WordCloudLayout>,
    ) -> Result<(), RenderError> {
        const CAPTION: &str = "Word Cloud of Titles";
        let Some(layout) = layout else {
            return Self::draw_notice(area, CAPTION, "No titles available for word cloud.");
        };

        let area = area.titled(CAPTION, (FONT, 24)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        let scale = (w as f32 / layout.width).min(h as f32 / layout.height);
        let offset_x = (w as f32 - layout.width * scale) / 2.0;
        let offset_y = (h as f32 - layout.height * scale) / 2.0;

        for word in &layout.words {
            let (cx, cy) = word.center();
            let (r, g, b) = WORD_PALETTE[word.rank % WORD_PALETTE.len()];
            let style = (FONT, (word.font_size * scale) as f64)
                .into_font()
                .color(&RGBColor(r, g, b))
                .pos(Pos::new(HPos::Center, VPos::Center));
            let pos = (
                (offset_x + cx * scale) as i32,
                (offset_y + cy * scale) as i32,
            );
            area.draw(&Text::new(word.text.as_str(), pos, style))
                .map_err(draw_err)?;
        }
        Ok(())
    }
}
