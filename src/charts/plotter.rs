//! Chart Plotter Module
//! Interactive publication charts, word cloud painter and sample table
//! using egui_plot.

use crate::charts::wordcloud::{WordCloudLayout, WORD_PALETTE};
use crate::data::SampleRow;
use crate::stats::{JournalCount, YearCount};
use egui::{Align2, Color32, FontId, RichText};
use egui_plot::{Bar, BarChart, GridMark, Plot};

/// Light coral, used for the papers-per-year bars.
pub const YEAR_BAR_COLOR: Color32 = Color32::from_rgb(240, 128, 128);
pub const JOURNAL_BAR_COLOR: Color32 = Color32::from_rgb(76, 114, 176);

const CHART_HEIGHT: f32 = 280.0;
const JOURNAL_LABEL_CHARS: usize = 32;
const TABLE_TEXT_CHARS: usize = 80;

/// Shorten `text` to at most `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Label for integer grid marks only.
fn integer_label(value: f64) -> Option<i64> {
    let rounded = value.round();
    ((value - rounded).abs() < 1e-6).then_some(rounded as i64)
}

/// Draws the explorer charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Word colour by frequency rank.
    pub fn word_color(rank: usize) -> Color32 {
        let (r, g, b) = WORD_PALETTE[rank % WORD_PALETTE.len()];
        Color32::from_rgb(r, g, b)
    }

    /// Vertical bar chart: x = year, y = number of papers.
    pub fn draw_year_chart(ui: &mut egui::Ui, counts: &[YearCount]) {
        let bars: Vec<Bar> = counts
            .iter()
            .map(|c| {
                Bar::new(c.year as f64, c.count as f64)
                    .name(c.year)
                    .width(0.8)
                    .fill(YEAR_BAR_COLOR)
            })
            .collect();

        Plot::new("publications_over_time")
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("Year")
            .y_axis_label("Number of Papers")
            .x_axis_formatter(|mark, _range| {
                integer_label(mark.value)
                    .map(|year| year.to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(YEAR_BAR_COLOR).name("Papers"));
            });
    }

    /// Horizontal bar chart of the top journals, the largest at the top.
    pub fn draw_journal_chart(ui: &mut egui::Ui, journals: &[JournalCount]) {
        let n = journals.len();
        let labels: Vec<String> = journals
            .iter()
            .rev()
            .map(|j| truncate(&j.journal, JOURNAL_LABEL_CHARS))
            .collect();

        let bars: Vec<Bar> = journals
            .iter()
            .enumerate()
            .map(|(i, j)| {
                Bar::new((n - 1 - i) as f64, j.count as f64)
                    .name(&j.journal)
                    .width(0.7)
                    .fill(JOURNAL_BAR_COLOR)
            })
            .collect();

        Plot::new("top_journals")
            .height(CHART_HEIGHT.max(n as f32 * 28.0))
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(0.0)
            .x_axis_label("Number of Papers")
            .y_grid_spacer(move |_input| {
                (0..n)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .y_axis_formatter(move |mark, _range| {
                integer_label(mark.value)
                    .and_then(|idx| usize::try_from(idx).ok())
                    .and_then(|idx| labels.get(idx).cloned())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .horizontal()
                        .color(JOURNAL_BAR_COLOR)
                        .name("Papers"),
                );
            });
    }

    /// Paint a word cloud layout on a white canvas scaled to the available width.
    pub fn draw_word_cloud(ui: &mut egui::Ui, layout: &WordCloudLayout) {
        let width = ui.available_width().min(layout.width);
        let height = width * layout.height / layout.width;
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, Color32::WHITE);

        let scale = rect.width() / layout.width;
        for word in &layout.words {
            let (cx, cy) = word.center();
            painter.text(
                rect.min + egui::vec2(cx * scale, cy * scale),
                Align2::CENTER_CENTER,
                &word.text,
                FontId::proportional(word.font_size * scale),
                Self::word_color(word.rank),
            );
        }
    }

    /// Striped grid of the first filtered rows.
    pub fn draw_sample_table(ui: &mut egui::Ui, rows: &[SampleRow]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::ScrollArea::horizontal().show(ui, |ui| {
                    egui::Grid::new("sample_table")
                        .striped(true)
                        .min_col_width(60.0)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            for header in ["title", "journal", "year", "abstract"] {
                                ui.label(RichText::new(header).strong().size(12.0));
                            }
                            ui.end_row();

                            for row in rows {
                                Self::text_cell(ui, row.title.as_deref());
                                Self::text_cell(ui, row.journal.as_deref());
                                let year = row.year.map(|y| y.to_string());
                                Self::text_cell(ui, year.as_deref());
                                Self::text_cell(ui, row.abstract_text.as_deref());
                                ui.end_row();
                            }
                        });
                });
            });
    }

    /// Table cell; long text is cut for display and shown in full on hover.
    fn text_cell(ui: &mut egui::Ui, text: Option<&str>) {
        match text {
            Some(t) if t.chars().count() > TABLE_TEXT_CHARS => {
                ui.label(RichText::new(truncate(t, TABLE_TEXT_CHARS)).size(11.0))
                    .on_hover_text(t);
            }
            Some(t) => {
                ui.label(RichText::new(t).size(11.0));
            }
            None => {
                ui.label(RichText::new("None").size(11.0).weak());
            }
        }
    }
}
