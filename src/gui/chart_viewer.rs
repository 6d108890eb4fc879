//! Chart Viewer Widget
//! Central scrollable panel showing the four visualizations in fixed order.

use crate::charts::{ChartPlotter, WordCloudLayout};
use crate::config::WordCloudConfig;
use crate::stats::PaperSummary;
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 18.0;

/// Scrollable display of the charts for the current filtered set.
#[derive(Default)]
pub struct ChartViewer {
    pub summary: Option<PaperSummary>,
    /// Laid out once per filtered set; `None` shows the fallback notice.
    pub word_cloud: Option<WordCloudLayout>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed summary and lay out its word cloud.
    pub fn set_summary(&mut self, summary: PaperSummary, config: &WordCloudConfig) {
        self.word_cloud = summary
            .word_frequencies
            .as_deref()
            .map(|words| WordCloudLayout::build(words, config));
        self.summary = Some(summary);
    }

    /// Error state used when the data has no valid year.
    pub fn show_error(ui: &mut egui::Ui, message: &str) {
        ui.centered_and_justified(|ui| {
            ui.label(
                RichText::new(format!("⚠ {message}"))
                    .size(18.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
        });
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(summary) = &self.summary else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("📊 Visualizations");
                ui.add_space(10.0);

                Self::section(ui, "Publications Over Time");
                ChartPlotter::draw_year_chart(ui, &summary.year_counts);
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "Top Journals");
                ChartPlotter::draw_journal_chart(ui, &summary.top_journals);
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "Word Cloud of Titles");
                match &self.word_cloud {
                    Some(layout) => ChartPlotter::draw_word_cloud(ui, layout),
                    None => {
                        ui.label("No titles available for word cloud.");
                    }
                }
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "Sample Data");
                ChartPlotter::draw_sample_table(ui, &summary.sample);
                ui.add_space(SECTION_SPACING);
            });
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(6.0);
    }
}
