use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::color::SpeciesPalette;
use crate::config::DashboardConfig;
use crate::data::density::density_spec;
use crate::data::loader::load_file;
use crate::data::model::PenguinTable;
use crate::data::summary::species_counts;
use crate::reactive::{Artifact, RangeInput, ReactiveGraph};

/// Output names registered on the graph.
pub const SUMMARY_OUTPUT: &str = "summary";
pub const DENSITY_OUTPUT: &str = "density";

/// How long a notification stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

// ---------------------------------------------------------------------------
// Graph wiring
// ---------------------------------------------------------------------------

/// Build the recomputation graph for a freshly loaded table and register the
/// outputs the configured variant shows.
pub fn build_graph(table: Rc<PenguinTable>, config: &DashboardConfig) -> ReactiveGraph {
    let slider = config.slider;
    let mut graph = ReactiveGraph::new(table, RangeInput::new(slider.min, slider.max, slider.default));

    graph.register_output(SUMMARY_OUTPUT, |derived| {
        Artifact::Summary(species_counts(derived.source(), derived.rows()))
    });

    if config.variant.has_plot() {
        let theme = config.theme;
        graph.register_output(DENSITY_OUTPUT, move |derived| {
            let mut spec = density_spec(derived.source(), derived.rows());
            spec.theme = theme;
            Artifact::Density(spec)
        });
    }
    graph
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Recomputation graph over the loaded table (None until a file loads).
    pub graph: Option<ReactiveGraph>,

    /// Where the current table came from.
    pub data_path: Option<PathBuf>,

    /// Species colours for the plot and table swatches.
    pub palette: Option<SpeciesPalette>,

    /// Error message shown in the top bar.
    pub status_message: Option<String>,

    /// Latest notification and when it was raised.
    pub notice: Option<(String, Instant)>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            graph: None,
            data_path: None,
            palette: None,
            status_message: None,
            notice: None,
            loading: false,
        }
    }

    /// Ingest a newly loaded table and rebuild the graph around it.
    pub fn set_dataset(&mut self, table: PenguinTable, path: Option<PathBuf>) {
        self.status_message = if table.is_empty() {
            log::warn!("loaded table has no rows");
            Some("The table has no rows".to_string())
        } else {
            None
        };
        self.palette = Some(SpeciesPalette::new(&table.species));
        self.graph = Some(build_graph(Rc::new(table), &self.config));
        self.data_path = path;
        self.loading = false;
    }

    /// Load a table from disk; failures end up in `status_message`.
    pub fn load_path(&mut self, path: &Path) {
        self.loading = true;
        match load_file(path) {
            Ok(table) => self.set_dataset(table, Some(path.to_path_buf())),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                self.loading = false;
            }
        }
    }

    /// Current slider value, or the configured default before any data.
    pub fn threshold(&self) -> f64 {
        self.graph
            .as_ref()
            .map(ReactiveGraph::value)
            .unwrap_or(self.config.slider.default)
    }

    pub fn set_threshold(&mut self, value: f64) {
        if let Some(graph) = &mut self.graph {
            graph.set_input(value);
        }
    }

    pub fn reset(&mut self) {
        if let Some(graph) = &mut self.graph {
            graph.trigger_reset();
        }
        self.poll_notifications();
    }

    /// Move graph notifications into the on-screen notice.
    pub fn poll_notifications(&mut self) {
        let Some(graph) = &mut self.graph else {
            return;
        };
        if let Some(latest) = graph.take_notifications().pop() {
            self.notice = Some((latest.message, Instant::now()));
        }
    }

    /// The notice text while it is still fresh.
    pub fn active_notice(&mut self) -> Option<&str> {
        if self
            .notice
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() > NOTICE_TTL)
        {
            self.notice = None;
        }
        self.notice.as_ref().map(|(msg, _)| msg.as_str())
    }

    /// Whether a table is loaded but no penguin is lighter than the threshold.
    pub fn nothing_below_threshold(&mut self) -> bool {
        self.graph
            .as_mut()
            .is_some_and(|graph| graph.derived().is_empty())
    }

    /// Read every registered output against the current snapshot.
    pub fn outputs(&mut self) -> Vec<(String, Rc<Artifact>)> {
        self.graph
            .as_mut()
            .map(ReactiveGraph::read_all)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SliderConfig, Variant};

    fn config(variant: Variant) -> DashboardConfig {
        DashboardConfig {
            variant,
            slider: SliderConfig::for_variant(variant),
            ..DashboardConfig::default()
        }
    }

    fn table() -> PenguinTable {
        PenguinTable::from_pairs([
            ("Adelie", 3200.0),
            ("Adelie", 4100.0),
            ("Gentoo", 5000.0),
        ])
    }

    #[test]
    fn basic_variant_has_only_the_summary() {
        let mut graph = build_graph(Rc::new(table()), &config(Variant::Basic));
        let names: Vec<_> = graph.read_all().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![SUMMARY_OUTPUT]);
        assert!(graph.read_output(DENSITY_OUTPUT).is_none());
        assert_eq!(graph.value(), 3000.0);
    }

    #[test]
    fn rich_variant_adds_the_density_plot() {
        let mut graph = build_graph(Rc::new(table()), &config(Variant::Rich));
        assert_eq!(graph.value(), 6000.0);
        let density = graph.read_output(DENSITY_OUTPUT).unwrap();
        let spec = density.as_density().unwrap();
        assert_eq!(spec.curves.len(), 2);
    }

    #[test]
    fn threshold_drives_the_summary() {
        let mut state = AppState::new(config(Variant::Rich));
        assert!(state.outputs().is_empty());

        state.set_dataset(table(), None);
        state.set_threshold(4000.0);
        let outputs = state.outputs();
        assert_eq!(outputs.len(), 2);
        let (_, summary) = outputs.iter().find(|(n, _)| n == SUMMARY_OUTPUT).unwrap();
        assert_eq!(summary.as_summary().unwrap().len(), 1);
        assert_eq!(state.threshold(), 4000.0);
    }

    #[test]
    fn reset_restores_default_and_shows_notice() {
        let mut state = AppState::new(config(Variant::Rich));
        state.set_dataset(table(), None);
        state.set_threshold(2500.0);

        state.reset();
        assert_eq!(state.threshold(), 6000.0);
        assert!(state.active_notice().unwrap().contains("6000"));
    }

    #[test]
    fn empty_filter_result_is_reported() {
        let mut state = AppState::new(config(Variant::Basic));
        assert!(!state.nothing_below_threshold());

        state.set_dataset(table(), None);
        assert!(!state.nothing_below_threshold());
        state.set_threshold(2000.0);
        assert!(state.nothing_below_threshold());
    }

    #[test]
    fn empty_table_sets_a_status_message() {
        let mut state = AppState::new(config(Variant::Basic));
        state.set_dataset(PenguinTable::default(), None);
        assert!(state.status_message.is_some());
        assert!(state.nothing_below_threshold());

        state.set_dataset(table(), None);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let mut state = AppState::new(config(Variant::Basic));
        state.set_dataset(table(), None);
        state.load_path(Path::new("/nonexistent/penguins.csv"));

        assert!(state.status_message.is_some());
        assert!(!state.loading);
        assert_eq!(state.graph.as_ref().unwrap().source().len(), 3);
    }
}
