// 👤 Employee Entity - Staff directory with a department foreign key
//
// "Employee id is IDENTITY, name/age/position are VALUES"
//
// department_id is a relationship, not a value: only DepartmentManager
// sets it, at the moment it places the employee in a department sequence.
// EmployeePatch has no department field.

use crate::entities::department::DepartmentId;
use crate::error::{ManagerError, Result};
use crate::events::{Event, EventLog};
use crate::repository::{Entity, KeyedRepository, Patch};
use crate::validation::positive_age;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type EmployeeId = u64;

// ============================================================================
// EMPLOYEE ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Age in years, always > 0
    pub age: u32,
    pub position: String,
    /// Department holding this employee (None = unassigned)
    pub department_id: Option<DepartmentId>,
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        age: u32,
        position: impl Into<String>,
        department_id: Option<DepartmentId>,
    ) -> Self {
        Employee {
            id,
            name: name.into(),
            age,
            position: position.into(),
            department_id,
        }
    }
}

impl Entity for Employee {
    type Id = EmployeeId;
    const KIND: &'static str = "employee";

    fn id(&self) -> EmployeeId {
        self.id
    }
}

// ============================================================================
// PATCH + PROJECTIONS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub position: Option<String>,
}

impl EmployeePatch {
    pub fn position(position: impl Into<String>) -> Self {
        EmployeePatch {
            position: Some(position.into()),
            ..Default::default()
        }
    }
}

impl Patch<Employee> for EmployeePatch {
    fn apply(&self, current: &Employee) -> Result<Employee> {
        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(age) = self.age {
            next.age = positive_age(age)?;
        }
        if let Some(position) = &self.position {
            next.position = position.clone();
        }
        Ok(next)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeBasicInfo {
    pub name: String,
    pub position: String,
}

impl From<&Employee> for EmployeeBasicInfo {
    fn from(employee: &Employee) -> Self {
        EmployeeBasicInfo {
            name: employee.name.clone(),
            position: employee.position.clone(),
        }
    }
}

// ============================================================================
// EMPLOYEE MANAGER
// ============================================================================

/// Employee directory; DepartmentManager holds a clone to coordinate moves
#[derive(Debug, Clone)]
pub struct EmployeeManager {
    employees: Arc<RwLock<KeyedRepository<Employee>>>,
    events: EventLog,
}

impl EmployeeManager {
    pub fn new() -> Self {
        EmployeeManager {
            employees: Arc::new(RwLock::new(KeyedRepository::new())),
            events: EventLog::new("employee_manager"),
        }
    }

    /// Shared storage, locked by DepartmentManager after its own lock
    pub(crate) fn store(&self) -> &Arc<RwLock<KeyedRepository<Employee>>> {
        &self.employees
    }

    /// Add to the directory unplaced. A requested `department_id` is not stored;
    /// `DepartmentManager::move_employee_to_department` (or `hire_employee`)
    /// places the employee and sets the foreign key.
    pub fn add_employee(&self, mut employee: Employee) -> Result<()> {
        positive_age(employee.age)?;
        let id = employee.id;
        let name = employee.name.clone();
        let requested = employee.department_id.take();
        let data = serde_json::json!({
            "employee": &employee,
            "requested_department": requested,
        });

        self.employees.write().add(employee).map_err(|e| {
            warn!(employee = id, "add rejected: {}", e);
            e
        })?;

        info!(employee = id, "added employee {}", name);
        if let Some(department) = requested {
            debug!(employee = id, "department {} awaits a move", department);
        }
        self.events.record("EmployeeAdded", Employee::KIND, id, data);
        Ok(())
    }

    /// Remove an unplaced employee. A placed employee is rejected with
    /// `EmployeeAssigned`; `DepartmentManager::dismiss_employee` detaches and removes it.
    pub fn remove_employee(&self, id: EmployeeId) -> Result<Employee> {
        let removed = {
            let mut employees = self.employees.write();
            if let Some(department) = employees.get(id).and_then(|e| e.department_id) {
                let err = ManagerError::EmployeeAssigned {
                    id: id.to_string(),
                    department: department.to_string(),
                };
                warn!(employee = id, "remove rejected: {}", err);
                return Err(err);
            }

            employees.remove(id).map_err(|e| {
                warn!(employee = id, "remove rejected: {}", e);
                e
            })?
        };

        info!(employee = id, "removed employee {}", id);
        self.events
            .record("EmployeeRemoved", Employee::KIND, id, serde_json::json!({}));
        Ok(removed)
    }

    pub fn get_employee(&self, id: EmployeeId) -> Option<Employee> {
        self.employees.read().get(id).cloned()
    }

    pub fn list_all_employees(&self) -> Vec<Employee> {
        self.employees.read().list_all()
    }

    pub fn update_employee(&self, id: EmployeeId, patch: &EmployeePatch) -> Result<Employee> {
        let updated = self.employees.write().update(id, patch).map_err(|e| {
            warn!(employee = id, "update rejected: {}", e);
            e
        })?;

        info!(employee = id, "updated employee {}", id);
        self.events.record(
            "EmployeeUpdated",
            Employee::KIND,
            id,
            serde_json::to_value(patch).unwrap_or_default(),
        );
        Ok(updated)
    }

    pub fn basic_info(&self, id: EmployeeId) -> Option<EmployeeBasicInfo> {
        self.employees.read().view(id)
    }

    /// Case-insensitive substring search over full names, storage order
    pub fn find_by_name(&self, name: &str) -> Vec<Employee> {
        let needle = name.to_lowercase();
        self.employees
            .read()
            .filter(|e| e.name.to_lowercase().contains(&needle))
    }

    /// Youngest first; equal ages keep their storage order
    pub fn sort_by_age(&self) -> Vec<Employee> {
        let mut sorted = self.employees.read().list_all();
        sorted.sort_by_key(|e| e.age);
        sorted
    }

    pub fn count(&self) -> usize {
        self.employees.read().len()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.events()
    }
}

impl Default for EmployeeManager {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
