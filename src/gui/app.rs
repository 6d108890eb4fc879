//! Paper Explorer Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::AppConfig;
use crate::data::{DataProcessor, ProcessorError, YearRange};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::PaperSummary;
use egui::SidePanel;
use polars::prelude::DataFrame;
use std::fs;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const NO_YEARS_MESSAGE: &str = "No valid years found. Check data cleaning.";

/// Main application window.
pub struct ExplorerApp {
    config: AppConfig,
    /// Cleaned base table, loaded once and never modified.
    base: &'static DataFrame,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    /// Base rows inside the selected year range.
    filtered: Option<DataFrame>,
    /// Range the current `filtered` set and charts were built for.
    view_range: Option<YearRange>,
}

impl ExplorerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        base: &'static DataFrame,
        config: AppConfig,
    ) -> Self {
        Self::with_base(base, config)
    }

    fn with_base(base: &'static DataFrame, config: AppConfig) -> Self {
        let domain = match DataProcessor::year_domain(base) {
            Ok(domain) => domain,
            Err(e) => {
                error!(error = %e, "failed to read year column");
                None
            }
        };
        if domain.is_none() {
            warn!("{}", NO_YEARS_MESSAGE);
        }

        let mut app = Self {
            config,
            base,
            control_panel: ControlPanel::new(domain),
            chart_viewer: ChartViewer::new(),
            filtered: None,
            view_range: None,
        };
        if domain.is_some() {
            app.refresh_view();
        }
        app
    }

    /// Recompute the filtered set and its charts for the selected range.
    fn refresh_view(&mut self) {
        let range = self.control_panel.range;
        let started = Instant::now();

        match Self::compute_view(self.base, range, &self.config) {
            Ok((filtered, summary)) => {
                info!(%range, papers = summary.total, "filtered papers");
                self.chart_viewer
                    .set_summary(summary, &self.config.word_cloud);
                self.filtered = Some(filtered);
                self.view_range = Some(range);
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "view refreshed");
            }
            Err(e) => {
                error!(%range, error = %e, "failed to filter papers");
                self.control_panel.set_status(&format!("Error: {}", e));
                // Keep the selector in step with what is on screen.
                match self.view_range {
                    Some(previous) => self.control_panel.range = previous,
                    None => self.filtered = None,
                }
            }
        }
    }

    /// Number of papers in the filtered set.
    fn shown(&self) -> usize {
        self.filtered.as_ref().map_or(0, |df| df.height())
    }

    fn dispatch(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::RangeChanged => self.refresh_view(),
            ControlPanelAction::ExportCsv => self.handle_export_csv(),
            ControlPanelAction::ExportReport => self.handle_export_report(),
            ControlPanelAction::None => {}
        }
    }

    fn compute_view(
        base: &DataFrame,
        range: YearRange,
        config: &AppConfig,
    ) -> Result<(DataFrame, PaperSummary), ProcessorError> {
        let filtered = DataProcessor::filter_by_years(base, range)?;
        let summary = PaperSummary::compute(&filtered, config)?;
        Ok((filtered, summary))
    }

    /// Handle CSV export of the filtered set
    fn handle_export_csv(&mut self) {
        let Some(filtered) = &self.filtered else {
            self.control_panel.set_status("No data to export");
            return;
        };

        let bytes = match DataProcessor::to_csv_bytes(filtered) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "failed to serialize filtered papers");
                self.control_panel.set_status(&format!("Error: {}", e));
                return;
            }
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&self.config.export_file_name)
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        let rows = filtered.height();
        match fs::write(&output_path, &bytes) {
            Ok(()) => {
                info!(path = %output_path.display(), rows, "exported filtered papers");
                self.control_panel.set_status(&format!(
                    "Saved {} papers to {}",
                    rows,
                    output_path.display()
                ));
            }
            Err(e) => {
                error!(path = %output_path.display(), error = %e, "CSV export failed");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Handle PNG export of the current charts
    fn handle_export_report(&mut self) {
        let Some(summary) = &self.chart_viewer.summary else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(&self.config.report_file_name)
            .save_file()
        {
            Some(path) => path,
            None => return,
        };

        let range = self.control_panel.range;
        match StaticChartRenderer::render_report(
            summary,
            self.chart_viewer.word_cloud.as_ref(),
            range,
            &output_path,
        ) {
            Ok(()) => {
                info!(path = %output_path.display(), %range, "saved chart report");
                self.control_panel
                    .set_status(&format!("Saved charts to {}", output_path.display()));
            }
            Err(e) => {
                error!(path = %output_path.display(), error = %e, "chart export failed");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);
                    self.dispatch(action);

                    // Counted after the range change above has been applied.
                    let shown = self.shown();
                    let action = self.control_panel.show_exports(ui, shown);
                    self.dispatch(action);
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.control_panel.domain.is_none() {
                ChartViewer::show_error(ui, NO_YEARS_MESSAGE);
            } else {
                self.chart_viewer.show(ui);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_papers, YEAR};

    fn leak(df: DataFrame) -> &'static DataFrame {
        Box::leak(Box::new(df))
    }

    fn without_years() -> &'static DataFrame {
        leak(sample_papers().drop(YEAR).unwrap())
    }

    #[test]
    fn test_compute_view_for_range() {
        let base = sample_papers();
        let (filtered, summary) =
            ExplorerApp::compute_view(&base, YearRange::new(2020, 2021), &AppConfig::default())
                .unwrap();
        assert_eq!(filtered.height(), 3);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.year_counts.len(), 2);
        assert_eq!(summary.sample.len(), 3);
    }

    #[test]
    fn test_range_change_updates_shown_count() {
        let mut app = ExplorerApp::with_base(leak(sample_papers()), AppConfig::default());
        assert_eq!(app.shown(), 4);

        app.control_panel.range = YearRange::new(2020, 2020);
        app.dispatch(ControlPanelAction::RangeChanged);
        assert_eq!(app.shown(), 2);
        assert_eq!(app.view_range, Some(YearRange::new(2020, 2020)));
    }

    #[test]
    fn test_failed_refresh_restores_previous_range() {
        let mut app = ExplorerApp::with_base(leak(sample_papers()), AppConfig::default());
        assert_eq!(app.view_range, Some(YearRange::new(2019, 2021)));

        app.base = without_years();
        app.control_panel.range = YearRange::new(2020, 2020);
        app.refresh_view();

        assert_eq!(app.control_panel.range, YearRange::new(2019, 2021));
        assert_eq!(app.shown(), 4);
        assert!(app.control_panel.status.starts_with("Error"));
    }

    #[test]
    fn test_failed_first_refresh_clears_filtered() {
        let mut app = ExplorerApp::with_base(without_years(), AppConfig::default());
        assert_eq!(app.control_panel.domain, None);

        app.control_panel.domain = Some(YearRange::new(2019, 2021));
        app.control_panel.range = YearRange::new(2019, 2021);
        app.filtered = Some(sample_papers());
        app.refresh_view();

        assert!(app.filtered.is_none());
        assert_eq!(app.view_range, None);
        assert!(app.control_panel.status.starts_with("Error"));
    }
}
