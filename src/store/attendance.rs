use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::{Apply, StoreCell, Ticket, Tracked};
use crate::client::HrmsApi;
use crate::error::HrmsError;
use crate::join::{self, AttendanceFilter};
use crate::model::{Attendance, AttendanceRecord, NewAttendance, TodayStats};

#[derive(Debug, Clone, Default)]
pub struct AttendanceState {
    pub records: Arc<Vec<AttendanceRecord>>,
    pub loading: bool,
    pub error: Option<String>,
    pub today_stats: Option<TodayStats>,
}

impl Tracked for AttendanceState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Cached attendance rows, already joined with employee names.
///
/// Mutations never splice rows into the cache: after the remote call
/// succeeds the whole joined list is pulled again, so names and
/// departments always come from the current employee collection.
#[derive(Clone)]
pub struct AttendanceStore {
    api: Arc<dyn HrmsApi>,
    cell: Arc<StoreCell<AttendanceState>>,
    stats_generation: Arc<AtomicU64>,
}

impl AttendanceStore {
    pub fn new(api: Arc<dyn HrmsApi>) -> Self {
        Self {
            api,
            cell: Arc::new(StoreCell::new(AttendanceState::default())),
            stats_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn snapshot(&self) -> AttendanceState {
        self.cell.read(AttendanceState::clone)
    }

    pub fn subscribe(&self) -> watch::Receiver<AttendanceState> {
        self.cell.subscribe()
    }

    pub fn detach(&self) {
        self.cell.modify(|_| {
            self.stats_generation.fetch_add(1, Ordering::SeqCst);
            false
        });
        self.cell.detach();
    }

    #[instrument(skip(self))]
    pub async fn fetch_attendance(&self) -> Result<(), HrmsError> {
        let ticket = self.cell.begin(Apply::IfCurrent);
        let result = self.api.list_attendance().await.map(Arc::new);

        if let Err(e) = &result {
            warn!(error = %e, "Failed to load attendance");
        }
        self.settle(ticket, result).map(|_| ())
    }

    #[instrument(skip(self, new), fields(employee_id = %new.employee_id, date = %new.date))]
    pub async fn add_attendance(&self, new: NewAttendance) -> Result<Attendance, HrmsError> {
        let ticket = self.cell.begin(Apply::IfCurrent);
        let result = async {
            let created = self.api.create_attendance(new).await?;
            let records = self.api.list_attendance().await?;
            Ok::<_, HrmsError>((created, Arc::new(records)))
        }
        .await;

        match &result {
            Ok((created, _)) => info!(id = %created.id, status = %created.status, "Attendance marked"),
            Err(e) => warn!(error = %e, "Failed to mark attendance"),
        }
        self.settle_mutation(ticket, result)
    }

    #[instrument(skip(self, new), fields(status = %new.status))]
    pub async fn update_attendance(&self, id: &str, new: NewAttendance) -> Result<Attendance, HrmsError> {
        let ticket = self.cell.begin(Apply::IfCurrent);
        let result = async {
            let updated = self.api.update_attendance(id, new).await?;
            let records = self.api.list_attendance().await?;
            Ok::<_, HrmsError>((updated, Arc::new(records)))
        }
        .await;

        match &result {
            Ok((updated, _)) => info!(status = %updated.status, "Attendance updated"),
            Err(e) => warn!(error = %e, "Failed to update attendance"),
        }
        self.settle_mutation(ticket, result)
    }

    /// Refreshes today's counts. Clears the error like every action, but
    /// runs alongside the list actions, so it leaves `loading` alone.
    #[instrument(skip(self))]
    pub async fn load_today_stats(&self) -> Result<TodayStats, HrmsError> {
        let mut ticket = 0;
        self.cell.modify(|state| {
            ticket = self.stats_generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.error.take().is_some()
        });
        let result = self.api.today_stats().await;

        if let Err(e) = &result {
            warn!(error = %e, "Failed to load today's stats");
        }
        let mut superseded = false;
        self.cell.modify(|state| {
            if self.stats_generation.load(Ordering::SeqCst) != ticket {
                superseded = true;
                return false;
            }
            match &result {
                Ok(stats) => state.today_stats = Some(*stats),
                Err(e) => state.error = Some(e.to_string()),
            }
            true
        });

        if superseded {
            debug!(ticket, "Superseded stats, state left untouched");
        }
        result
    }

    /// Rows marked on `day`, keyed by employee id.
    pub fn today_index(&self, day: NaiveDate) -> Vec<(String, AttendanceRecord)> {
        self.cell.read(|state| {
            join::today_index(&state.records, day)
                .into_iter()
                .map(|(employee_id, record)| (employee_id.to_string(), record.clone()))
                .collect()
        })
    }

    /// The record `employee_id` already has on `day`, if any. Decides
    /// between "mark" and "change status" in the marking form.
    pub fn marked_on(&self, employee_id: &str, day: NaiveDate) -> Option<AttendanceRecord> {
        self.cell.read(|state| {
            join::today_index(&state.records, day)
                .get(employee_id)
                .map(|record| (*record).clone())
        })
    }

    pub fn filtered(&self, filter: &AttendanceFilter) -> Vec<AttendanceRecord> {
        self.cell
            .read(|state| filter.apply(&state.records).into_iter().cloned().collect())
    }

    pub fn recent(&self, limit: usize) -> Vec<AttendanceRecord> {
        self.cell
            .read(|state| join::recent(&state.records, limit).into_iter().cloned().collect())
    }

    fn settle(
        &self,
        ticket: Ticket,
        result: Result<Arc<Vec<AttendanceRecord>>, HrmsError>,
    ) -> Result<Arc<Vec<AttendanceRecord>>, HrmsError> {
        self.cell
            .complete(ticket, result, |state, records| {
                state.records = Arc::clone(records);
            })
    }

    fn settle_mutation(
        &self,
        ticket: Ticket,
        result: Result<(Attendance, Arc<Vec<AttendanceRecord>>), HrmsError>,
    ) -> Result<Attendance, HrmsError> {
        self.cell
            .complete(ticket, result, |state, (_, records)| {
                state.records = Arc::clone(records);
            })
            .map(|(record, _)| record)
    }
}
