//! JSON-file backed [`Store`].
//!
//! The whole store is a [`MemoryStore`] snapshot. Reads go to memory; every
//! successful write is followed by a full snapshot save (temp file, then
//! rename over the original).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use totem_recon::{
    Employee, EmployeeId, LaborRecord, Location, LocationId, MemoryStore, NewEmployee, NewPayrollEvent,
    PayrollEvent, SaleRecord, Salary, Store, StoreError,
};
use tracing::debug;

pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let inner = if path.exists() {
            let text = fs::read_to_string(path)
                .map_err(|e| StoreError::Backend(format!("cannot read {}: {e}", path.display())))?;
            serde_json::from_str(&text)
                .map_err(|e| StoreError::Backend(format!("corrupt store {}: {e}", path.display())))?
        } else {
            debug!(path = %path.display(), "store file missing, starting empty");
            MemoryStore::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    fn persist(&self) -> Result<(), StoreError> {
        let backend = |e: std::io::Error| StoreError::Backend(format!("cannot write {}: {e}", self.path.display()));
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(backend)?;
        }
        let json = serde_json::to_string_pretty(&self.inner)
            .map_err(|e| StoreError::Backend(format!("cannot encode store: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(backend)?;
        fs::rename(&tmp, &self.path).map_err(backend)?;
        debug!(path = %self.path.display(), "saved store");
        Ok(())
    }

    fn write<T>(&mut self, op: impl FnOnce(&mut MemoryStore) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let out = op(&mut self.inner)?;
        self.persist()?;
        Ok(out)
    }
}

impl Store for FileStore {
    fn create_location(&mut self, name: &str, number: &str) -> Result<Location, StoreError> {
        self.write(|s| s.create_location(name, number))
    }

    fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        self.inner.list_locations()
    }

    fn get_location(&self, id: LocationId) -> Result<Location, StoreError> {
        self.inner.get_location(id)
    }

    fn update_location(&mut self, id: LocationId, name: &str, number: &str) -> Result<(), StoreError> {
        self.write(|s| s.update_location(id, name, number))
    }

    fn delete_location(&mut self, id: LocationId) -> Result<(), StoreError> {
        self.write(|s| s.delete_location(id))
    }

    fn list_employees(&self, location: LocationId) -> Result<Vec<Employee>, StoreError> {
        self.inner.list_employees(location)
    }

    fn get_employee(&self, id: EmployeeId) -> Result<Employee, StoreError> {
        self.inner.get_employee(id)
    }

    fn create_employee(&mut self, location: LocationId, new: NewEmployee) -> Result<Employee, StoreError> {
        self.write(|s| s.create_employee(location, new))
    }

    fn update_employee(&mut self, employee: &Employee) -> Result<(), StoreError> {
        self.write(|s| s.update_employee(employee))
    }

    fn terminate_employee(&mut self, id: EmployeeId, date: NaiveDate) -> Result<(), StoreError> {
        self.write(|s| s.terminate_employee(id, date))
    }

    fn reinstate_employee(&mut self, id: EmployeeId) -> Result<(), StoreError> {
        self.write(|s| s.reinstate_employee(id))
    }

    fn delete_employee(&mut self, id: EmployeeId) -> Result<(), StoreError> {
        self.write(|s| s.delete_employee(id))
    }

    fn save_sales_batch(
        &mut self,
        location: LocationId,
        date: NaiveDate,
        records: &[SaleRecord],
    ) -> Result<(), StoreError> {
        self.write(|s| s.save_sales_batch(location, date, records))
    }

    fn sales_by_date(&self, location: LocationId, date: NaiveDate) -> Result<Vec<SaleRecord>, StoreError> {
        self.inner.sales_by_date(location, date)
    }

    fn sales_in_range(
        &self,
        location: LocationId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SaleRecord>, StoreError> {
        self.inner.sales_in_range(location, start, end)
    }

    fn save_labor(&mut self, record: LaborRecord) -> Result<(), StoreError> {
        self.write(|s| s.save_labor(record))
    }

    fn labor_by_date(&self, location: LocationId, date: NaiveDate) -> Result<Option<LaborRecord>, StoreError> {
        self.inner.labor_by_date(location, date)
    }

    fn labor_in_range(
        &self,
        location: LocationId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LaborRecord>, StoreError> {
        self.inner.labor_in_range(location, start, end)
    }

    fn create_payroll_event(
        &mut self,
        location: LocationId,
        new: NewPayrollEvent,
    ) -> Result<PayrollEvent, StoreError> {
        self.write(|s| s.create_payroll_event(location, new))
    }

    fn payroll_events_in_range(
        &self,
        location: LocationId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PayrollEvent>, StoreError> {
        self.inner.payroll_events_in_range(location, start, end)
    }

    fn delete_payroll_event(&mut self, id: i64) -> Result<(), StoreError> {
        self.write(|s| s.delete_payroll_event(id))
    }

    fn create_salary(&mut self, location: LocationId, name: &str, annual_cents: i64) -> Result<Salary, StoreError> {
        self.write(|s| s.create_salary(location, name, annual_cents))
    }

    fn list_salaries(&self, location: LocationId) -> Result<Vec<Salary>, StoreError> {
        self.inner.list_salaries(location)
    }

    fn delete_salary(&mut self, id: i64) -> Result<(), StoreError> {
        self.write(|s| s.delete_salary(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        let loc = store.create_location("Main", "01234").unwrap();
        let emp = store
            .create_employee(
                loc.id,
                NewEmployee {
                    first_name: "John".into(),
                    last_name: "Smith".into(),
                    ..NewEmployee::default()
                },
            )
            .unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_location(loc.id).unwrap(), loc);
        assert_eq!(reopened.get_employee(emp.id).unwrap(), emp);
    }

    #[test]
    fn failed_write_does_not_touch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.delete_location(7), Err(StoreError::LocationNotFound(7)));
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Backend(_))));
    }
}
