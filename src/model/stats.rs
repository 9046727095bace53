use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Today's attendance counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodayStats {
    pub present: usize,
    pub absent: usize,
}

impl TodayStats {
    pub fn total(&self) -> usize {
        self.present + self.absent
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_employees: usize,
    pub present_today: usize,
    pub absent_today: usize,
}

impl DashboardStats {
    /// Missing stats (not loaded yet) count as zero.
    pub fn from_parts(total_employees: usize, today: Option<TodayStats>) -> Self {
        let today = today.unwrap_or_default();
        Self {
            total_employees,
            present_today: today.present,
            absent_today: today.absent,
        }
    }
}
