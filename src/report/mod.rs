//! Reporting for the one-shot commands: which series a view charts, and how it
//! is printed.

use clap::ValueEnum;
use ratatui::style::Color;

use crate::domain::{ChartPoint, StatsPayload};
use crate::stats::{
    DASHBOARD_PALETTE, DEFAULT_EXCLUDED_KEYS, PIE_PALETTE, active_users_series, deposit_series,
    new_users_series, normalize, to_series,
};

pub mod format;

pub use format::*;

/// A chart series selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeriesView {
    /// Every numeric stat (dashboard bar/pie overview).
    Dashboard,
    /// Deposits and bonuses comparison.
    Area,
    /// New users over today / 7 days / 30 days.
    NewUsers,
    /// Daily / weekly / monthly active users.
    ActiveUsers,
}

impl SeriesView {
    pub fn title(self) -> &'static str {
        match self {
            SeriesView::Dashboard => "Dashboard Overview",
            SeriesView::Area => "Deposits and Bonuses Comparison",
            SeriesView::NewUsers => "New Users Distribution",
            SeriesView::ActiveUsers => "All Users Distribution",
        }
    }

    pub fn palette(self) -> &'static [Color] {
        match self {
            SeriesView::Dashboard | SeriesView::Area => &DASHBOARD_PALETTE,
            SeriesView::NewUsers | SeriesView::ActiveUsers => &PIE_PALETTE,
        }
    }

    pub fn build(self, payload: &StatsPayload) -> Vec<ChartPoint> {
        match self {
            SeriesView::Dashboard => to_series(&normalize(payload, DEFAULT_EXCLUDED_KEYS)),
            SeriesView::Area => deposit_series(payload),
            SeriesView::NewUsers => new_users_series(payload),
            SeriesView::ActiveUsers => active_users_series(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatsResponse;

    #[test]
    fn each_view_builds_its_series() {
        let payload = StatsResponse::from_slice(
            br#"{"data":{"totalDepositAmount":5,"dailyActiveUsers":2,"note":"x"}}"#,
        )
        .unwrap()
        .data;

        assert_eq!(SeriesView::Dashboard.build(&payload).len(), 2);
        assert_eq!(SeriesView::Area.build(&payload)[0], ChartPoint::new("User Deposit", 5.0));
        assert_eq!(SeriesView::NewUsers.build(&payload).len(), 3);
        assert_eq!(SeriesView::ActiveUsers.build(&payload)[0].value, 2.0);
        assert_eq!(SeriesView::NewUsers.palette().len(), 4);
    }
}
