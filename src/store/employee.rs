use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, instrument, warn};

use super::{Apply, Patch, StoreCell, Tracked};
use crate::client::HrmsApi;
use crate::error::HrmsError;
use crate::join::EmployeeFilter;
use crate::model::{Employee, NewEmployee};

#[derive(Debug, Clone, Default)]
pub struct EmployeeState {
    pub employees: Arc<Vec<Employee>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Tracked for EmployeeState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Cached employee directory. Mutations patch the cache by id; no re-fetch.
/// A patch landing while a fetch is in flight is replayed over the fetched
/// list, so neither can wipe out the other.
#[derive(Clone)]
pub struct EmployeeStore {
    api: Arc<dyn HrmsApi>,
    cell: Arc<StoreCell<EmployeeState>>,
}

impl EmployeeStore {
    pub fn new(api: Arc<dyn HrmsApi>) -> Self {
        Self {
            api,
            cell: Arc::new(StoreCell::new(EmployeeState::default())),
        }
    }

    pub fn snapshot(&self) -> EmployeeState {
        self.cell.read(EmployeeState::clone)
    }

    pub fn subscribe(&self) -> watch::Receiver<EmployeeState> {
        self.cell.subscribe()
    }

    /// Ignore the results of every request still in flight.
    pub fn detach(&self) {
        self.cell.detach();
    }

    #[instrument(skip(self))]
    pub async fn fetch_employees(&self) -> Result<(), HrmsError> {
        let ticket = self.cell.begin(Apply::IfCurrent);
        let result = self.api.list_employees().await.map(Arc::new);

        if let Err(e) = &result {
            warn!(error = %e, "Failed to load employees");
        }
        self.cell
            .complete(ticket, result, |state, employees| {
                state.employees = Arc::clone(employees);
            })
            .map(|_| ())
    }

    #[instrument(skip(self, new), fields(employee_id = %new.employee_id))]
    pub async fn add_employee(&self, new: NewEmployee) -> Result<Employee, HrmsError> {
        let ticket = self.cell.begin(Apply::Always);
        let result = self.api.create_employee(new).await;

        match &result {
            Ok(employee) => info!(id = %employee.id, "Employee added"),
            Err(e) => warn!(error = %e, "Failed to add employee"),
        }
        self.cell.complete_patch(ticket, result, |employee| {
            let employee = employee.clone();
            Arc::new(move |state: &mut EmployeeState| {
                if state.employees.iter().all(|e| e.id != employee.id) {
                    let mut employees = state.employees.as_ref().clone();
                    employees.push(employee.clone());
                    state.employees = Arc::new(employees);
                }
            }) as Patch<EmployeeState>
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_employee(&self, id: &str) -> Result<(), HrmsError> {
        let ticket = self.cell.begin(Apply::Always);
        let result = self.api.delete_employee(id).await;

        match &result {
            Ok(()) => info!("Employee removed"),
            Err(e) => warn!(error = %e, "Failed to delete employee"),
        }
        let id = id.to_string();
        self.cell.complete_patch(ticket, result, |_| {
            Arc::new(move |state: &mut EmployeeState| {
                if state.employees.iter().any(|e| e.id == id) {
                    let employees = state.employees.iter().filter(|e| e.id != id).cloned().collect();
                    state.employees = Arc::new(employees);
                }
            }) as Patch<EmployeeState>
        })
    }

    /// Cached employees passing `filter`.
    pub fn filtered(&self, filter: &EmployeeFilter) -> Vec<Employee> {
        self.cell
            .read(|state| filter.apply(&state.employees).into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Latency, SimulatedApi};
    use std::time::Duration;

    fn store() -> EmployeeStore {
        EmployeeStore::new(Arc::new(SimulatedApi::seeded().with_latency(Latency::none())))
    }

    fn priya() -> NewEmployee {
        NewEmployee::new("EMP003", "Priya Nair", "priya@hrms.com", "Design")
    }

    #[tokio::test]
    async fn fetch_fills_the_cache() {
        let store = store();
        store.fetch_employees().await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.employees.len(), 2);
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn add_appends_without_refetch() {
        let store = store();
        let created = store.add_employee(priya()).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.employees.len(), 1);
        assert_eq!(state.employees[0].id, created.id);
    }

    #[tokio::test]
    async fn duplicate_add_records_and_returns_the_error() {
        let store = store();
        store.fetch_employees().await.unwrap();

        let err = store
            .add_employee(NewEmployee::new("EMP001", "Clone", "clone@hrms.com", "Design"))
            .await
            .unwrap_err();

        assert!(matches!(err, HrmsError::DuplicateKey(_)));
        let state = store.snapshot();
        assert_eq!(state.error.as_deref(), Some(err.to_string().as_str()));
        assert_eq!(state.employees.len(), 2);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn delete_removes_by_id() {
        let store = store();
        store.fetch_employees().await.unwrap();

        store.delete_employee("1").await.unwrap();
        store.delete_employee("1").await.unwrap();

        let ids: Vec<_> = store.snapshot().employees.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec!["2".to_string()]);
    }

    #[tokio::test]
    async fn next_action_clears_previous_error() {
        let store = store();
        store.fetch_employees().await.unwrap();
        let _ = store
            .add_employee(NewEmployee::new("EMP001", "Clone", "clone@hrms.com", "Design"))
            .await;
        assert!(store.snapshot().error.is_some());

        store.fetch_employees().await.unwrap();
        assert!(store.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn filtered_reads_the_cache() {
        let store = store();
        store.fetch_employees().await.unwrap();

        let hr = store.filtered(&EmployeeFilter {
            search: None,
            department: Some("Human Resources".into()),
        });
        assert_eq!(hr.len(), 1);
        assert_eq!(hr[0].full_name, "Jane Smith");
    }

    #[tokio::test(start_paused = true)]
    async fn loading_is_visible_while_in_flight() {
        let api = SimulatedApi::seeded().with_latency(Latency::from_millis(600));
        let store = EmployeeStore::new(Arc::new(api));
        let mut changes = store.subscribe();

        let background = store.clone();
        let task = tokio::spawn(async move { background.fetch_employees().await });

        changes.changed().await.unwrap();
        assert!(changes.borrow_and_update().loading);

        tokio::time::sleep(Duration::from_millis(700)).await;
        task.await.unwrap().unwrap();
        let state = store.snapshot();
        assert!(!state.loading);
        assert_eq!(state.employees.len(), 2);
    }

    fn slow_store() -> EmployeeStore {
        let api = SimulatedApi::seeded().with_latency(Latency::from_millis(600));
        EmployeeStore::new(Arc::new(api))
    }

    fn ids(store: &EmployeeStore) -> Vec<String> {
        store.snapshot().employees.iter().map(|e| e.employee_id.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn add_during_first_load_keeps_the_loaded_list() {
        let store = slow_store();

        let background = store.clone();
        let fetch = tokio::spawn(async move { background.fetch_employees().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.add_employee(priya()).await.unwrap();
        fetch.await.unwrap().unwrap();

        let state = store.snapshot();
        assert_eq!(ids(&store), vec!["EMP001", "EMP002", "EMP003"]);
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn delete_during_first_load_keeps_the_rest() {
        let store = slow_store();

        let background = store.clone();
        let fetch = tokio::spawn(async move { background.fetch_employees().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.delete_employee("1").await.unwrap();
        fetch.await.unwrap().unwrap();

        assert_eq!(ids(&store), vec!["EMP002"]);
        assert!(!store.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn add_finishing_first_is_kept_by_the_fetch() {
        let store = slow_store();

        // the add lands while the fetch is still in flight
        let adder = store.clone();
        let add = tokio::spawn(async move { adder.add_employee(priya()).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let background = store.clone();
        let fetch = tokio::spawn(async move { background.fetch_employees().await });

        add.await.unwrap().unwrap();
        assert_eq!(ids(&store), vec!["EMP003"]);
        assert!(store.snapshot().loading);
        fetch.await.unwrap().unwrap();

        assert_eq!(ids(&store), vec!["EMP001", "EMP002", "EMP003"]);
        assert!(!store.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn detached_fetch_result_is_ignored() {
        let api = SimulatedApi::seeded().with_latency(Latency::from_millis(600));
        let store = EmployeeStore::new(Arc::new(api));

        let background = store.clone();
        let task = tokio::spawn(async move { background.fetch_employees().await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        store.detach();

        // the caller still sees the outcome
        task.await.unwrap().unwrap();
        let state = store.snapshot();
        assert!(state.employees.is_empty());
        assert!(!state.loading);
    }
}
