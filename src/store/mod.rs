//! Client-side state stores.
//!
//! Each store caches one collection plus a loading flag and the last error
//! message. Action methods are the only writers. Readers take snapshots
//! (collections are `Arc`-shared, so a snapshot is cheap) or subscribe to
//! be woken on every change.
//!
//! Every action draws a ticket from the store's sequence counter. Results
//! that replace the whole collection are applied only while their ticket is
//! the newest whole-collection request; an older response is dropped because
//! a newer fetch is already on its way with fresher data. Incremental patches
//! (add or remove one row) never supersede a fetch. A patch that lands while
//! a fetch is in flight is journaled and replayed on top of the fetched
//! collection, so it survives a response the server built before it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;
use tokio::sync::watch;
use tracing::debug;

use crate::client::{HrmsApi, HttpApi, Latency, SimulatedApi};
use crate::config::{Config, RemoteMode};
use crate::directory::Directory;
use crate::error::HrmsError;
use crate::model::DashboardStats;

mod attendance;
mod employee;

pub use attendance::{AttendanceState, AttendanceStore};
pub use employee::{EmployeeState, EmployeeStore};

/// Loading/error bookkeeping shared by the store states.
pub(crate) trait Tracked {
    fn set_loading(&mut self, loading: bool);
    fn set_error(&mut self, error: Option<String>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Apply {
    /// replaces the collection; only the newest whole-collection ticket may do that
    IfCurrent,
    /// incremental change that commutes with other changes
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket {
    seq: u64,
    epoch: u64,
    apply: Apply,
}

pub(crate) type Patch<S> = Arc<dyn Fn(&mut S) + Send + Sync>;

/// All counters are read and written under the watch channel's lock, so a
/// `begin` cannot slip between a currency check and the update it guards.
pub(crate) struct StoreCell<S> {
    state: watch::Sender<S>,
    /// bumped by every action
    seq: AtomicU64,
    /// seq of the newest whole-collection request, 0 once it settled
    snapshot: AtomicU64,
    /// bumped by `detach`
    epoch: AtomicU64,
    /// patches applied while `snapshot` is in flight, with the seq at the time
    journal: Mutex<Vec<(u64, Patch<S>)>>,
}

impl<S: Tracked> StoreCell<S> {
    pub(crate) fn new(initial: S) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state,
            seq: AtomicU64::new(0),
            snapshot: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
            journal: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    pub(crate) fn modify(&self, f: impl FnOnce(&mut S) -> bool) {
        self.state.send_if_modified(f);
    }

    /// Starts an action: flags loading, clears the error, hands out a ticket.
    pub(crate) fn begin(&self, apply: Apply) -> Ticket {
        let mut ticket = Ticket {
            seq: 0,
            epoch: 0,
            apply,
        };
        self.state.send_modify(|state| {
            ticket.seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
            ticket.epoch = self.epoch.load(Ordering::SeqCst);
            if apply == Apply::IfCurrent {
                self.snapshot.store(ticket.seq, Ordering::SeqCst);
            }
            state.set_loading(true);
            state.set_error(None);
        });
        ticket
    }

    /// Settles a whole-collection action and hands the result back to the
    /// caller unchanged.
    pub(crate) fn complete<T>(
        &self,
        ticket: Ticket,
        result: Result<T, HrmsError>,
        update: impl FnOnce(&mut S, &T),
    ) -> Result<T, HrmsError> {
        debug_assert_eq!(ticket.apply, Apply::IfCurrent);
        let mut superseded = false;

        self.state.send_if_modified(|state| {
            let attached = self.epoch.load(Ordering::SeqCst) == ticket.epoch;
            let newest = attached && self.snapshot.load(Ordering::SeqCst) == ticket.seq;
            let mut changed = false;

            if newest {
                self.snapshot.store(0, Ordering::SeqCst);
                let journal = std::mem::take(&mut *self.journal());
                if let Ok(value) = &result {
                    update(state, value);
                    for (_, patch) in journal.iter().filter(|(seq, _)| *seq >= ticket.seq) {
                        patch(state);
                    }
                    changed = true;
                }
            } else {
                superseded = true;
            }
            changed |= self.settle(state, ticket, attached, result.as_ref().err());
            changed
        });

        if superseded {
            debug!(ticket = ticket.seq, "Superseded response, collection left untouched");
        }
        result
    }

    /// Settles an incremental action. The patch built from a successful
    /// result is applied at once and replayed over an in-flight fetch.
    pub(crate) fn complete_patch<T>(
        &self,
        ticket: Ticket,
        result: Result<T, HrmsError>,
        patch: impl FnOnce(&T) -> Patch<S>,
    ) -> Result<T, HrmsError> {
        debug_assert_eq!(ticket.apply, Apply::Always);
        let mut detached = false;

        self.state.send_if_modified(|state| {
            let attached = self.epoch.load(Ordering::SeqCst) == ticket.epoch;
            let mut changed = false;

            match &result {
                Ok(value) if attached => {
                    let patch = patch(value);
                    patch(state);
                    if self.snapshot.load(Ordering::SeqCst) != 0 {
                        self.journal()
                            .push((self.seq.load(Ordering::SeqCst), patch));
                    }
                    changed = true;
                }
                _ => detached = !attached,
            }
            changed |= self.settle(state, ticket, attached, result.as_ref().err());
            changed
        });

        if detached {
            debug!(ticket = ticket.seq, "Detached response, state left untouched");
        }
        result
    }

    /// Loading and error belong to the newest action only.
    fn settle(&self, state: &mut S, ticket: Ticket, attached: bool, error: Option<&HrmsError>) -> bool {
        if !attached || self.seq.load(Ordering::SeqCst) != ticket.seq {
            return false;
        }
        if let Some(e) = error {
            state.set_error(Some(e.to_string()));
        }
        state.set_loading(false);
        true
    }

    fn journal(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Patch<S>)>> {
        self.journal.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Invalidates every in-flight ticket and clears the loading flag.
    pub(crate) fn detach(&self) {
        self.state.send_modify(|state| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            self.snapshot.store(0, Ordering::SeqCst);
            self.journal().clear();
            state.set_loading(false);
        });
    }
}

static GLOBAL: OnceCell<Stores> = OnceCell::new();

/// Both stores over one remote.
#[derive(Clone)]
pub struct Stores {
    pub employees: EmployeeStore,
    pub attendance: AttendanceStore,
}

impl Stores {
    pub fn new(api: Arc<dyn HrmsApi>) -> Self {
        Self {
            employees: EmployeeStore::new(api.clone()),
            attendance: AttendanceStore::new(api),
        }
    }

    /// Stores over the remote variant selected in `config`.
    pub fn from_config(config: &Config) -> Result<Self, HrmsError> {
        let api: Arc<dyn HrmsApi> = match config.remote {
            RemoteMode::Simulated => {
                let directory = if config.seed_demo_data {
                    Directory::seeded()
                } else {
                    Directory::new()
                };
                let latency = Latency::from_millis(config.simulated_latency_ms);
                Arc::new(SimulatedApi::new(directory.into_shared()).with_latency(latency))
            }
            RemoteMode::Http => Arc::new(HttpApi::new(config.api_url.as_str())?),
        };
        Ok(Self::new(api))
    }

    /// Makes these stores the process-wide instance. Fails, handing the
    /// stores back, when another instance was installed first.
    pub fn install(self) -> Result<&'static Stores, Stores> {
        GLOBAL.try_insert(self).map_err(|(_, rejected)| rejected)
    }

    pub fn global() -> Option<&'static Stores> {
        GLOBAL.get()
    }

    /// Loads everything the dashboard shows.
    pub async fn refresh_dashboard(&self) -> Result<DashboardStats, HrmsError> {
        let (employees, attendance, stats) = futures::join!(
            self.employees.fetch_employees(),
            self.attendance.fetch_attendance(),
            self.attendance.load_today_stats(),
        );
        employees?;
        attendance?;
        stats?;
        Ok(self.dashboard())
    }

    pub fn dashboard(&self) -> DashboardStats {
        let total = self.employees.snapshot().employees.len();
        DashboardStats::from_parts(total, self.attendance.snapshot().today_stats)
    }
}
