//! Per-page view controllers.
//!
//! Each controller holds UI-only state (card/chart toggle, pie dataset, size
//! class) and turns the current `FetchState` into a `ViewOutput`. Nothing in
//! here fetches; a page refetches only when it is mounted again.

use tracing::debug;

use crate::data::FetchState;
use crate::domain::{ChartPoint, StatEntry};
use crate::stats::{
    DEFAULT_EXCLUDED_KEYS, active_users_series, deposit_series, new_users_series, normalize,
    to_series,
};

pub mod theme;
pub mod viewport;

pub use theme::{Theme, ThemeMode};
pub use viewport::{ResizeSubscription, SizeClass, ViewportSource};

/// Everything a renderer needs for one frame of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewOutput {
    pub loading: bool,
    pub error: Option<String>,
    /// Card entries; empty for pages that only chart fixed fields.
    pub entries: Vec<StatEntry>,
    pub series: Vec<ChartPoint>,
}

impl ViewOutput {
    fn from_state(state: &FetchState) -> Self {
        Self {
            loading: state.loading,
            error: state.error.clone(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Cards,
    Charts,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Cards => ViewMode::Charts,
            ViewMode::Charts => ViewMode::Cards,
        }
    }
}

/// Which fixed dataset the pie page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieDataset {
    #[default]
    NewUsers = 1,
    ActiveUsers = 2,
}

impl PieDataset {
    pub fn title(self) -> &'static str {
        match self {
            PieDataset::NewUsers => "New Users Distribution",
            PieDataset::ActiveUsers => "All Users Distribution",
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// Dashboard: stat cards, or bar + pie overview of every numeric stat.
pub struct DashboardView {
    mode: ViewMode,
    resize: ResizeSubscription,
}

impl DashboardView {
    pub fn mount(viewport: &ViewportSource) -> Self {
        Self {
            mode: ViewMode::default(),
            resize: viewport.subscribe(),
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        debug!(mode = ?self.mode, "dashboard mode toggled");
    }

    pub fn size_class(&self) -> SizeClass {
        self.resize.size_class()
    }

    /// New size class if the viewport width changed since the last call.
    pub fn resized(&mut self) -> Option<SizeClass> {
        self.resize.changed()
    }

    pub fn output(&self, state: &FetchState) -> ViewOutput {
        let mut out = ViewOutput::from_state(state);
        if let Some(resp) = &state.data {
            out.entries = normalize(&resp.data, DEFAULT_EXCLUDED_KEYS);
            out.series = to_series(&out.entries);
        }
        out
    }
}

/// Pie page: one of two fixed user-count datasets.
pub struct PieView {
    dataset: PieDataset,
    resize: ResizeSubscription,
}

impl PieView {
    pub fn mount(viewport: &ViewportSource) -> Self {
        Self {
            dataset: PieDataset::default(),
            resize: viewport.subscribe(),
        }
    }

    pub fn dataset(&self) -> PieDataset {
        self.dataset
    }

    pub fn select(&mut self, dataset: PieDataset) {
        self.dataset = dataset;
        debug!(dataset = dataset.tag(), "pie dataset selected");
    }

    pub fn size_class(&self) -> SizeClass {
        self.resize.size_class()
    }

    pub fn resized(&mut self) -> Option<SizeClass> {
        self.resize.changed()
    }

    pub fn output(&self, state: &FetchState) -> ViewOutput {
        let mut out = ViewOutput::from_state(state);
        if let Some(resp) = &state.data {
            out.series = match self.dataset {
                PieDataset::NewUsers => new_users_series(&resp.data),
                PieDataset::ActiveUsers => active_users_series(&resp.data),
            };
        }
        out
    }
}

/// Area page: deposits and bonuses comparison.
pub struct AreaView {
    resize: ResizeSubscription,
}

impl AreaView {
    pub fn mount(viewport: &ViewportSource) -> Self {
        Self {
            resize: viewport.subscribe(),
        }
    }

    pub fn size_class(&self) -> SizeClass {
        self.resize.size_class()
    }

    pub fn resized(&mut self) -> Option<SizeClass> {
        self.resize.changed()
    }

    pub fn output(&self, state: &FetchState) -> ViewOutput {
        let mut out = ViewOutput::from_state(state);
        if let Some(resp) = &state.data {
            out.series = deposit_series(&resp.data);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::StatsResponse;

    fn settled(json: &str) -> FetchState {
        FetchState {
            loading: false,
            data: Some(Arc::new(StatsResponse::from_slice(json.as_bytes()).unwrap())),
            error: None,
        }
    }

    #[test]
    fn dashboard_defaults_to_cards_and_toggles() {
        let viewport = ViewportSource::new(1200);
        let mut view = DashboardView::mount(&viewport);
        assert_eq!(view.mode(), ViewMode::Cards);
        view.toggle_mode();
        assert_eq!(view.mode(), ViewMode::Charts);
        view.toggle_mode();
        assert_eq!(view.mode(), ViewMode::Cards);
    }

    #[test]
    fn dashboard_output_filters_series_but_not_entries() {
        let viewport = ViewportSource::new(1200);
        let view = DashboardView::mount(&viewport);
        let out = view.output(&settled(r#"{"data":{"totalUsers":10,"status":"ok"}}"#));
        assert_eq!(out.entries.len(), 2);
        assert_eq!(out.series, vec![ChartPoint::new("Total Users", 10.0)]);
        assert!(!out.loading);
    }

    #[test]
    fn loading_state_passes_through_without_data() {
        let viewport = ViewportSource::new(1200);
        let view = AreaView::mount(&viewport);
        let state = FetchState {
            loading: true,
            data: None,
            error: None,
        };
        let out = view.output(&state);
        assert!(out.loading);
        assert!(out.series.is_empty());
    }

    #[test]
    fn pie_selects_between_datasets() {
        let viewport = ViewportSource::new(1200);
        let mut view = PieView::mount(&viewport);
        assert_eq!(view.dataset().tag(), 1);

        let state = settled(r#"{"data":{"dailyActiveUsers":5,"todaysUserAddition":2}}"#);
        assert_eq!(view.output(&state).series[0], ChartPoint::new("todaysUserAddition", 2.0));

        view.select(PieDataset::ActiveUsers);
        assert_eq!(view.output(&state).series[0], ChartPoint::new("dailyActiveUsers", 5.0));
    }

    #[test]
    fn views_hold_one_listener_each() {
        let viewport = ViewportSource::new(640);
        let dash = DashboardView::mount(&viewport);
        let pie = PieView::mount(&viewport);
        assert_eq!(viewport.listener_count(), 2);
        assert_eq!(dash.size_class(), SizeClass::Compact);

        viewport.set_width(1600);
        assert_eq!(pie.size_class(), SizeClass::Wide);

        drop(dash);
        drop(pie);
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn error_is_exposed_with_stale_series() {
        let viewport = ViewportSource::new(1200);
        let view = AreaView::mount(&viewport);
        let mut state = settled(r#"{"data":{"totalDepositAmount":500}}"#);
        state.error = Some("Error: 500".to_string());
        let out = view.output(&state);
        assert_eq!(out.error.as_deref(), Some("Error: 500"));
        assert_eq!(out.series[0].value, 500.0);
    }
}
