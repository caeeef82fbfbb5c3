//! Persistence seam and the in-memory store.
//!
//! Every write is an individual call; there are no cross-row transactions.
//! Callers that issue several writes keep whatever succeeded before an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{
    Employee, EmployeeId, LaborRecord, Location, LocationId, NewEmployee, NewPayrollEvent,
    PayrollEvent, SaleRecord, Salary,
};

pub trait Store {
    // Locations
    fn create_location(&mut self, name: &str, number: &str) -> Result<Location, StoreError>;
    fn list_locations(&self) -> Result<Vec<Location>, StoreError>;
    fn get_location(&self, id: LocationId) -> Result<Location, StoreError>;
    fn update_location(&mut self, id: LocationId, name: &str, number: &str) -> Result<(), StoreError>;
    /// Removes the location and everything recorded under it.
    fn delete_location(&mut self, id: LocationId) -> Result<(), StoreError>;

    // Employees
    fn list_employees(&self, location: LocationId) -> Result<Vec<Employee>, StoreError>;
    fn get_employee(&self, id: EmployeeId) -> Result<Employee, StoreError>;
    fn create_employee(&mut self, location: LocationId, new: NewEmployee) -> Result<Employee, StoreError>;
    /// Overwrites the stored employee with the same id.
    fn update_employee(&mut self, employee: &Employee) -> Result<(), StoreError>;
    fn terminate_employee(&mut self, id: EmployeeId, date: NaiveDate) -> Result<(), StoreError>;
    fn reinstate_employee(&mut self, id: EmployeeId) -> Result<(), StoreError>;
    fn delete_employee(&mut self, id: EmployeeId) -> Result<(), StoreError>;

    // Sales
    /// Upsert keyed by (date, category, item). Records are stored under
    /// `location` and `date` regardless of their own fields.
    fn save_sales_batch(
        &mut self,
        location: LocationId,
        date: NaiveDate,
        records: &[SaleRecord],
    ) -> Result<(), StoreError>;
    fn sales_by_date(&self, location: LocationId, date: NaiveDate) -> Result<Vec<SaleRecord>, StoreError>;
    fn sales_in_range(
        &self,
        location: LocationId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SaleRecord>, StoreError>;

    // Labor
    /// One record per (location, date); a second save replaces the first.
    fn save_labor(&mut self, record: LaborRecord) -> Result<(), StoreError>;
    fn labor_by_date(&self, location: LocationId, date: NaiveDate) -> Result<Option<LaborRecord>, StoreError>;
    fn labor_in_range(
        &self,
        location: LocationId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LaborRecord>, StoreError>;

    // Payroll events
    fn create_payroll_event(
        &mut self,
        location: LocationId,
        new: NewPayrollEvent,
    ) -> Result<PayrollEvent, StoreError>;
    fn payroll_events_in_range(
        &self,
        location: LocationId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PayrollEvent>, StoreError>;
    fn delete_payroll_event(&mut self, id: i64) -> Result<(), StoreError>;

    // Salaries
    fn create_salary(&mut self, location: LocationId, name: &str, annual_cents: i64) -> Result<Salary, StoreError>;
    fn list_salaries(&self, location: LocationId) -> Result<Vec<Salary>, StoreError>;
    fn delete_salary(&mut self, id: i64) -> Result<(), StoreError>;
}

/// Vector-backed store. Serializable so a file backend can snapshot it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    next_id: i64,
    locations: Vec<Location>,
    employees: Vec<Employee>,
    sales: Vec<SaleRecord>,
    labor: Vec<LaborRecord>,
    payroll_events: Vec<PayrollEvent>,
    salaries: Vec<Salary>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_location(&self, id: LocationId) -> Result<(), StoreError> {
        if self.locations.iter().any(|l| l.id == id) {
            Ok(())
        } else {
            Err(StoreError::LocationNotFound(id))
        }
    }

    fn employee_mut(&mut self, id: EmployeeId) -> Result<&mut Employee, StoreError> {
        self.employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::EmployeeNotFound(id))
    }
}

fn in_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

impl Store for MemoryStore {
    fn create_location(&mut self, name: &str, number: &str) -> Result<Location, StoreError> {
        let location = Location {
            id: self.allocate_id(),
            name: name.to_string(),
            number: number.to_string(),
        };
        self.locations.push(location.clone());
        Ok(location)
    }

    fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        let mut out = self.locations.clone();
        out.sort_by_key(|l| l.id);
        Ok(out)
    }

    fn get_location(&self, id: LocationId) -> Result<Location, StoreError> {
        self.locations
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or(StoreError::LocationNotFound(id))
    }

    fn update_location(&mut self, id: LocationId, name: &str, number: &str) -> Result<(), StoreError> {
        let location = self
            .locations
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(StoreError::LocationNotFound(id))?;
        location.name = name.to_string();
        location.number = number.to_string();
        Ok(())
    }

    fn delete_location(&mut self, id: LocationId) -> Result<(), StoreError> {
        self.require_location(id)?;
        self.locations.retain(|l| l.id != id);
        self.employees.retain(|e| e.location_id != id);
        self.sales.retain(|s| s.location_id != id);
        self.labor.retain(|l| l.location_id != id);
        self.payroll_events.retain(|p| p.location_id != id);
        self.salaries.retain(|s| s.location_id != id);
        Ok(())
    }

    fn list_employees(&self, location: LocationId) -> Result<Vec<Employee>, StoreError> {
        self.require_location(location)?;
        let mut out: Vec<Employee> = self
            .employees
            .iter()
            .filter(|e| e.location_id == location)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            (a.last_name.to_lowercase(), a.first_name.to_lowercase(), a.id)
                .cmp(&(b.last_name.to_lowercase(), b.first_name.to_lowercase(), b.id))
        });
        Ok(out)
    }

    fn get_employee(&self, id: EmployeeId) -> Result<Employee, StoreError> {
        self.employees
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(StoreError::EmployeeNotFound(id))
    }

    fn create_employee(&mut self, location: LocationId, new: NewEmployee) -> Result<Employee, StoreError> {
        self.require_location(location)?;
        let employee = Employee {
            id: self.allocate_id(),
            location_id: location,
            first_name: new.first_name,
            last_name: new.last_name,
            time_punch_name: new.time_punch_name,
            department: new.department,
            birthday: new.birthday,
            annual_salary_cents: new.annual_salary_cents,
            termination_date: None,
        };
        self.employees.push(employee.clone());
        Ok(employee)
    }

    fn update_employee(&mut self, employee: &Employee) -> Result<(), StoreError> {
        let stored = self.employee_mut(employee.id)?;
        *stored = employee.clone();
        Ok(())
    }

    fn terminate_employee(&mut self, id: EmployeeId, date: NaiveDate) -> Result<(), StoreError> {
        self.employee_mut(id)?.termination_date = Some(date);
        Ok(())
    }

    fn reinstate_employee(&mut self, id: EmployeeId) -> Result<(), StoreError> {
        self.employee_mut(id)?.termination_date = None;
        Ok(())
    }

    fn delete_employee(&mut self, id: EmployeeId) -> Result<(), StoreError> {
        self.employee_mut(id)?;
        self.employees.retain(|e| e.id != id);
        self.payroll_events.retain(|p| p.employee_id != id);
        Ok(())
    }

    fn save_sales_batch(
        &mut self,
        location: LocationId,
        date: NaiveDate,
        records: &[SaleRecord],
    ) -> Result<(), StoreError> {
        self.require_location(location)?;
        for record in records {
            let existing = self.sales.iter_mut().find(|s| {
                s.location_id == location
                    && s.date == date
                    && s.category == record.category
                    && s.item == record.item
            });
            match existing {
                Some(stored) => stored.amount_cents = record.amount_cents,
                None => self.sales.push(SaleRecord {
                    location_id: location,
                    date,
                    ..record.clone()
                }),
            }
        }
        Ok(())
    }

    fn sales_by_date(&self, location: LocationId, date: NaiveDate) -> Result<Vec<SaleRecord>, StoreError> {
        self.sales_in_range(location, date, date)
    }

    fn sales_in_range(
        &self,
        location: LocationId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SaleRecord>, StoreError> {
        self.require_location(location)?;
        let mut out: Vec<SaleRecord> = self
            .sales
            .iter()
            .filter(|s| s.location_id == location && in_range(s.date, start, end))
            .cloned()
            .collect();
        out.sort_by(|a, b| (a.date, a.category).cmp(&(b.date, b.category)));
        Ok(out)
    }

    fn save_labor(&mut self, record: LaborRecord) -> Result<(), StoreError> {
        self.require_location(record.location_id)?;
        self.labor
            .retain(|l| !(l.location_id == record.location_id && l.date == record.date));
        self.labor.push(record);
        Ok(())
    }

    fn labor_by_date(&self, location: LocationId, date: NaiveDate) -> Result<Option<LaborRecord>, StoreError> {
        self.require_location(location)?;
        Ok(self
            .labor
            .iter()
            .find(|l| l.location_id == location && l.date == date)
            .cloned())
    }

    fn labor_in_range(
        &self,
        location: LocationId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LaborRecord>, StoreError> {
        self.require_location(location)?;
        let mut out: Vec<LaborRecord> = self
            .labor
            .iter()
            .filter(|l| l.location_id == location && in_range(l.date, start, end))
            .cloned()
            .collect();
        out.sort_by_key(|l| l.date);
        Ok(out)
    }

    fn create_payroll_event(
        &mut self,
        location: LocationId,
        new: NewPayrollEvent,
    ) -> Result<PayrollEvent, StoreError> {
        self.require_location(location)?;
        let employee = self.get_employee(new.employee_id)?;
        if employee.location_id != location {
            return Err(StoreError::EmployeeNotFound(new.employee_id));
        }
        let event = PayrollEvent {
            id: self.allocate_id(),
            location_id: location,
            employee_id: new.employee_id,
            date: new.date,
            event_type: new.event_type,
            description: new.description,
            amount_cents: new.amount_cents,
        };
        self.payroll_events.push(event.clone());
        Ok(event)
    }

    fn payroll_events_in_range(
        &self,
        location: LocationId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PayrollEvent>, StoreError> {
        self.require_location(location)?;
        let mut out: Vec<PayrollEvent> = self
            .payroll_events
            .iter()
            .filter(|p| p.location_id == location && in_range(p.date, start, end))
            .cloned()
            .collect();
        // Newest first, matching the payroll listing.
        out.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    fn delete_payroll_event(&mut self, id: i64) -> Result<(), StoreError> {
        let before = self.payroll_events.len();
        self.payroll_events.retain(|p| p.id != id);
        if self.payroll_events.len() == before {
            return Err(StoreError::PayrollEventNotFound(id));
        }
        Ok(())
    }

    fn create_salary(&mut self, location: LocationId, name: &str, annual_cents: i64) -> Result<Salary, StoreError> {
        self.require_location(location)?;
        let salary = Salary {
            id: self.allocate_id(),
            location_id: location,
            name: name.to_string(),
            annual_cents,
        };
        self.salaries.push(salary.clone());
        Ok(salary)
    }

    fn list_salaries(&self, location: LocationId) -> Result<Vec<Salary>, StoreError> {
        self.require_location(location)?;
        Ok(self
            .salaries
            .iter()
            .filter(|s| s.location_id == location)
            .cloned()
            .collect())
    }

    fn delete_salary(&mut self, id: i64) -> Result<(), StoreError> {
        let before = self.salaries.len();
        self.salaries.retain(|s| s.id != id);
        if self.salaries.len() == before {
            return Err(StoreError::SalaryNotFound(id));
        }
        Ok(())
    }
}
