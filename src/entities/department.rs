// 🏢 Department Entity - One-to-many relationship with employees
//
// "Department id is IDENTITY, name is a VALUE, membership is a RELATIONSHIP"
//
// Relationship invariants:
// - An employee id appears in at most one department's sequence
// - employee.department_id == Some(d) for the department d holding it
// - Only DepartmentManager edits the sequence (the field is private)
//
// Lock order for cross-entity operations: departments, then employees.
// Every check runs before the first write, so a failed move changes nothing.

use crate::entities::employee::{Employee, EmployeeId, EmployeeManager};
use crate::error::{ManagerError, Result};
use crate::events::{Event, EventLog};
use crate::repository::{Entity, KeyedRepository};
use crate::validation::positive_age;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type DepartmentId = u64;

// ============================================================================
// DEPARTMENT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    /// Member employee ids in placement order
    employees: Vec<EmployeeId>,
}

impl Department {
    /// New department with no employees
    pub fn new(id: DepartmentId, name: impl Into<String>) -> Self {
        Department {
            id,
            name: name.into(),
            employees: Vec::new(),
        }
    }

    pub fn employee_ids(&self) -> &[EmployeeId] {
        &self.employees
    }

    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    pub fn has_employee(&self, employee_id: EmployeeId) -> bool {
        self.employees.contains(&employee_id)
    }
}

impl Entity for Department {
    type Id = DepartmentId;
    const KIND: &'static str = "department";

    fn id(&self) -> DepartmentId {
        self.id
    }
}

/// Department without its employee sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentHeader {
    pub id: DepartmentId,
    pub name: String,
}

impl From<&Department> for DepartmentHeader {
    fn from(department: &Department) -> Self {
        DepartmentHeader {
            id: department.id,
            name: department.name.clone(),
        }
    }
}

// ============================================================================
// DEPARTMENT MANAGER
// ============================================================================

#[derive(Debug, Clone)]
pub struct DepartmentManager {
    departments: Arc<RwLock<KeyedRepository<Department>>>,
    employees: EmployeeManager,
    events: EventLog,
}

impl DepartmentManager {
    /// Coordinate departments over an existing employee directory
    pub fn new(employees: EmployeeManager) -> Self {
        DepartmentManager {
            departments: Arc::new(RwLock::new(KeyedRepository::new())),
            employees,
            events: EventLog::new("department_manager"),
        }
    }

    /// The employee directory this manager coordinates with
    pub fn employees(&self) -> &EmployeeManager {
        &self.employees
    }

    pub fn add_department(&self, department: Department) -> Result<()> {
        let id = department.id;
        let name = department.name.clone();

        self.departments.write().add(department).map_err(|e| {
            warn!(department = id, "add rejected: {}", e);
            e
        })?;

        info!(department = id, "added department {}", name);
        self.events.record(
            "DepartmentAdded",
            Department::KIND,
            id,
            serde_json::json!({ "name": name }),
        );
        Ok(())
    }

    /// Remove an empty department
    pub fn remove_department(&self, id: DepartmentId) -> Result<Department> {
        let removed = {
            let mut departments = self.departments.write();
            let department = departments
                .get(id)
                .ok_or_else(|| ManagerError::not_found(Department::KIND, id))
                .map_err(|e| {
                    warn!(department = id, "remove rejected: {}", e);
                    e
                })?;

            if department.employee_count() > 0 {
                let err = ManagerError::DepartmentNotEmpty {
                    id: id.to_string(),
                    employees: department.employee_count(),
                };
                warn!(department = id, "remove rejected: {}", err);
                return Err(err);
            }

            departments.remove(id)?
        };

        info!(department = id, "removed department {}", id);
        self.events
            .record("DepartmentRemoved", Department::KIND, id, serde_json::json!({}));
        Ok(removed)
    }

    pub fn get_department(&self, id: DepartmentId) -> Option<Department> {
        self.departments.read().get(id).cloned()
    }

    pub fn list_all_departments(&self) -> Vec<Department> {
        self.departments.read().list_all()
    }

    pub fn department_without_employees(&self, id: DepartmentId) -> Option<DepartmentHeader> {
        self.departments.read().view(id)
    }

    /// Employee records of a department, in sequence order
    pub fn list_employees_in_department(&self, id: DepartmentId) -> Result<Vec<Employee>> {
        let departments = self.departments.read();
        let department = departments
            .get(id)
            .ok_or_else(|| ManagerError::not_found(Department::KIND, id))?;

        let employees = self.employees.store().read();
        Ok(resolve_members(department, &employees))
    }

    /// Add an employee to the directory and, if it names a department, place it there
    pub fn hire_employee(&self, employee: Employee) -> Result<()> {
        let id = employee.id;
        let target = employee.department_id;

        {
            let mut departments = self.departments.write();
            let mut employees = self.employees.store().write();

            if let Some(department_id) = target {
                if !departments.contains(department_id) {
                    let err = ManagerError::not_found(Department::KIND, department_id);
                    warn!(employee = id, "hire rejected: {}", err);
                    return Err(err);
                }
            }

            positive_age(employee.age)?;
            employees.add(employee).map_err(|e| {
                warn!(employee = id, "hire rejected: {}", e);
                e
            })?;

            if let Some(department_id) = target {
                if let Some(department) = departments.get_mut(department_id) {
                    department.employees.push(id);
                }
            }
        }

        info!(employee = id, "hired employee {} into {:?}", id, target);
        self.events.record(
            "EmployeeHired",
            Employee::KIND,
            id,
            serde_json::json!({ "department_id": target }),
        );
        Ok(())
    }

    /// Detach an employee from every department, place it in `department_id`,
    /// and point its foreign key there, as one step
    pub fn move_employee_to_department(
        &self,
        employee_id: EmployeeId,
        department_id: DepartmentId,
    ) -> Result<()> {
        let previous = {
            let mut departments = self.departments.write();
            let mut employees = self.employees.store().write();

            if !departments.contains(department_id) {
                let err = ManagerError::not_found(Department::KIND, department_id);
                warn!(employee = employee_id, "move rejected: {}", err);
                return Err(err);
            }

            let employee = employees.get_mut(employee_id).ok_or_else(|| {
                let err = ManagerError::not_found(Employee::KIND, employee_id);
                warn!(employee = employee_id, "move rejected: {}", err);
                err
            })?;

            let previous = departments
                .find(|d| d.has_employee(employee_id))
                .map(|d| d.id);

            for department in departments.iter_mut() {
                department.employees.retain(|id| *id != employee_id);
                if department.id == department_id {
                    department.employees.push(employee_id);
                }
            }
            employee.department_id = Some(department_id);

            previous
        };

        info!(
            employee = employee_id,
            "moved employee {} to department {}", employee_id, department_id
        );
        self.events.record(
            "EmployeeMoved",
            Employee::KIND,
            employee_id,
            serde_json::json!({ "from": previous, "to": department_id }),
        );
        Ok(())
    }

    /// Detach an employee from its department and drop it from the directory
    pub fn dismiss_employee(&self, employee_id: EmployeeId) -> Result<Employee> {
        let removed = {
            let mut departments = self.departments.write();
            let mut employees = self.employees.store().write();

            let removed = employees.remove(employee_id).map_err(|e| {
                warn!(employee = employee_id, "dismiss rejected: {}", e);
                e
            })?;
            for department in departments.iter_mut() {
                department.employees.retain(|id| *id != employee_id);
            }
            removed
        };

        info!(employee = employee_id, "dismissed employee {}", employee_id);
        self.events.record(
            "EmployeeDismissed",
            Employee::KIND,
            employee_id,
            serde_json::json!({ "department_id": removed.department_id }),
        );
        Ok(removed)
    }

    pub fn department_employee_count(&self, id: DepartmentId) -> Result<usize> {
        self.departments
            .read()
            .get(id)
            .map(Department::employee_count)
            .ok_or_else(|| ManagerError::not_found(Department::KIND, id))
    }

    /// Mean age of the department's employees (0 when empty)
    pub fn average_employee_age(&self, id: DepartmentId) -> Result<f64> {
        let members = self.list_employees_in_department(id)?;
        if members.is_empty() {
            return Ok(0.0);
        }
        let total: u64 = members.iter().map(|e| u64::from(e.age)).sum();
        Ok(total as f64 / members.len() as f64)
    }

    /// Plain-text summary: header, count, then one line per employee
    pub fn generate_department_report(&self, id: DepartmentId) -> Result<String> {
        let departments = self.departments.read();
        let department = departments
            .get(id)
            .ok_or_else(|| ManagerError::not_found(Department::KIND, id))?;
        let members = resolve_members(department, &self.employees.store().read());

        debug!(department = id, "rendering report for {} employees", members.len());
        Ok(render_report(department, &members))
    }

    pub fn count(&self) -> usize {
        self.departments.read().len()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.events()
    }
}

/// Directory records for a department's ids, in sequence order
fn resolve_members(
    department: &Department,
    employees: &KeyedRepository<Employee>,
) -> Vec<Employee> {
    department
        .employees
        .iter()
        .filter_map(|id| employees.get(*id).cloned())
        .collect()
}

fn render_report(department: &Department, members: &[Employee]) -> String {
    let mut lines = vec![
        format!("Department report: {} (ID: {})", department.name, department.id),
        format!("Employee count: {}", members.len()),
        "Employees:".to_string(),
    ];
    lines.extend(
        members
            .iter()
            .map(|e| format!("- {} ({}, {} years old)", e.name, e.position, e.age)),
    );
    lines.join("\n")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::employee::EmployeePatch;
    use proptest::prelude::*;

    fn setup() -> DepartmentManager {
        let employees = EmployeeManager::new();
        let departments = DepartmentManager::new(employees.clone());

        departments.add_department(Department::new(1, "IT")).unwrap();
        departments.add_department(Department::new(2, "HR")).unwrap();

        employees
            .add_employee(Employee::new(101, "Nguyen Van A", 25, "Developer", Some(1)))
            .unwrap();
        employees
            .add_employee(Employee::new(102, "Tran Thi B", 30, "HR Specialist", Some(2)))
            .unwrap();
        departments
    }

    fn holders_of(manager: &DepartmentManager, employee_id: EmployeeId) -> Vec<DepartmentId> {
        manager
            .list_all_departments()
            .iter()
            .filter(|d| d.has_employee(employee_id))
            .map(|d| d.id)
            .collect()
    }

    #[test]
    fn test_department_creation() {
        let department = Department::new(1, "IT");
        assert_eq!(department.name, "IT");
        assert_eq!(department.employee_count(), 0);
        assert!(department.employee_ids().is_empty());
    }

    #[test]
    fn test_add_duplicate_department() {
        let manager = setup();
        let err = manager.add_department(Department::new(1, "Other")).unwrap_err();
        assert!(matches!(err, ManagerError::DuplicateKey { .. }));
        assert_eq!(manager.get_department(1).unwrap().name, "IT");
    }

    #[test]
    fn test_department_scenario() {
        let manager = setup();

        manager.move_employee_to_department(101, 1).unwrap();
        assert_eq!(manager.department_employee_count(1).unwrap(), 1);

        let err = manager.remove_department(1).unwrap_err();
        assert!(matches!(err, ManagerError::DepartmentNotEmpty { employees: 1, .. }));
        assert!(manager.get_department(1).is_some());
    }

    #[test]
    fn test_remove_empty_department() {
        let manager = setup();
        let removed = manager.remove_department(2).unwrap();
        assert_eq!(removed.name, "HR");
        assert!(manager.get_department(2).is_none());
        assert!(matches!(
            manager.remove_department(2),
            Err(ManagerError::NotFound { .. })
        ));
    }

    #[test]
    fn test_move_between_departments() {
        let manager = setup();
        manager.move_employee_to_department(101, 1).unwrap();
        manager.move_employee_to_department(101, 2).unwrap();

        assert_eq!(holders_of(&manager, 101), vec![2]);
        assert_eq!(manager.department_employee_count(1).unwrap(), 0);
        assert_eq!(
            manager.employees().get_employee(101).unwrap().department_id,
            Some(2)
        );
    }

    #[test]
    fn test_move_is_idempotent() {
        let manager = setup();
        manager.move_employee_to_department(101, 1).unwrap();
        manager.move_employee_to_department(101, 1).unwrap();

        assert_eq!(holders_of(&manager, 101), vec![1]);
        assert_eq!(manager.department_employee_count(1).unwrap(), 1);
        assert_eq!(
            manager.employees().get_employee(101).unwrap().department_id,
            Some(1)
        );
    }

    #[test]
    fn test_move_to_missing_department() {
        let manager = setup();
        manager.move_employee_to_department(101, 1).unwrap();

        let err = manager.move_employee_to_department(101, 9).unwrap_err();
        assert_eq!(err, ManagerError::not_found("department", 9));

        // Nothing changed
        assert_eq!(holders_of(&manager, 101), vec![1]);
        assert_eq!(
            manager.employees().get_employee(101).unwrap().department_id,
            Some(1)
        );
    }

    #[test]
    fn test_move_missing_employee() {
        let manager = setup();
        let err = manager.move_employee_to_department(999, 1).unwrap_err();
        assert_eq!(err, ManagerError::not_found("employee", 999));
        assert_eq!(manager.department_employee_count(1).unwrap(), 0);
    }

    #[test]
    fn test_hire_employee_places_into_department() {
        let manager = setup();
        manager
            .hire_employee(Employee::new(103, "Le Van C", 41, "Recruiter", Some(2)))
            .unwrap();

        assert_eq!(holders_of(&manager, 103), vec![2]);
        assert!(manager.employees().get_employee(103).is_some());

        let err = manager
            .hire_employee(Employee::new(104, "Pham D", 33, "Ops", Some(77)))
            .unwrap_err();
        assert!(matches!(err, ManagerError::NotFound { .. }));
        assert!(manager.employees().get_employee(104).is_none());
    }

    #[test]
    fn test_dismiss_employee_detaches() {
        let manager = setup();
        manager.move_employee_to_department(101, 1).unwrap();

        let dismissed = manager.dismiss_employee(101).unwrap();
        assert_eq!(dismissed.id, 101);
        assert_eq!(manager.department_employee_count(1).unwrap(), 0);
        assert!(manager.employees().get_employee(101).is_none());
        manager.remove_department(1).unwrap();
    }

    #[test]
    fn test_remove_placed_employee_keeps_department_consistent() {
        let manager = setup();
        manager.move_employee_to_department(101, 1).unwrap();

        let err = manager.employees().remove_employee(101).unwrap_err();
        assert_eq!(
            err,
            ManagerError::EmployeeAssigned {
                id: "101".to_string(),
                department: "1".to_string()
            }
        );

        assert_eq!(manager.department_employee_count(1).unwrap(), 1);
        assert_eq!(manager.list_employees_in_department(1).unwrap().len(), 1);
        let report = manager.generate_department_report(1).unwrap();
        assert_eq!(report.lines().nth(1), Some("Employee count: 1"));

        manager.dismiss_employee(101).unwrap();
        assert_eq!(manager.department_employee_count(1).unwrap(), 0);
        assert_eq!(manager.average_employee_age(1).unwrap(), 0.0);
        manager.remove_department(1).unwrap();
    }

    #[test]
    fn test_unplaced_employee_removal() {
        let manager = setup();
        let removed = manager.employees().remove_employee(102).unwrap();
        assert_eq!(removed.department_id, None);
        assert!(holders_of(&manager, 102).is_empty());
        manager.remove_department(2).unwrap();
    }

    #[test]
    fn test_added_employee_not_placed_until_moved() {
        let manager = setup();
        assert_eq!(manager.employees().get_employee(101).unwrap().department_id, None);
        assert_eq!(manager.department_employee_count(1).unwrap(), 0);

        manager.move_employee_to_department(101, 1).unwrap();
        assert_eq!(
            manager.employees().get_employee(101).unwrap().department_id,
            Some(1)
        );
        assert_eq!(holders_of(&manager, 101), vec![1]);
    }

    #[test]
    fn test_list_employees_in_department() {
        let manager = setup();
        manager.move_employee_to_department(102, 1).unwrap();
        manager.move_employee_to_department(101, 1).unwrap();

        let members = manager.list_employees_in_department(1).unwrap();
        let ids: Vec<EmployeeId> = members.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![102, 101]);

        assert!(manager.list_employees_in_department(5).is_err());
    }

    #[test]
    fn test_average_employee_age() {
        let manager = setup();
        assert_eq!(manager.average_employee_age(1).unwrap(), 0.0);

        manager.move_employee_to_department(101, 1).unwrap();
        manager.move_employee_to_department(102, 1).unwrap();
        assert_eq!(manager.average_employee_age(1).unwrap(), 27.5);

        assert!(matches!(
            manager.average_employee_age(8),
            Err(ManagerError::NotFound { .. })
        ));
    }

    #[test]
    fn test_generate_department_report() {
        let manager = setup();
        manager.move_employee_to_department(101, 1).unwrap();
        manager
            .employees()
            .update_employee(101, &EmployeePatch::position("Senior Developer"))
            .unwrap();

        let report = manager.generate_department_report(1).unwrap();
        assert_eq!(
            report,
            "Department report: IT (ID: 1)\n\
             Employee count: 1\n\
             Employees:\n\
             - Nguyen Van A (Senior Developer, 25 years old)"
        );

        assert!(manager.generate_department_report(3).is_err());
    }

    #[test]
    fn test_department_without_employees() {
        let manager = setup();
        let header = manager.department_without_employees(2).unwrap();
        assert_eq!(
            header,
            DepartmentHeader {
                id: 2,
                name: "HR".to_string()
            }
        );
        assert!(manager.department_without_employees(3).is_none());
    }

    proptest! {
        /// Any sequence of moves leaves each employee in exactly one department,
        /// matching its foreign key.
        #[test]
        fn prop_moves_keep_single_membership(
            moves in prop::collection::vec((101u64..104, 1u64..4), 1..30)
        ) {
            let employees = EmployeeManager::new();
            let manager = DepartmentManager::new(employees.clone());
            for id in 1..4 {
                manager.add_department(Department::new(id, format!("D{}", id))).unwrap();
            }
            for id in 101..104 {
                employees.add_employee(Employee::new(id, format!("E{}", id), 30, "Staff", None)).unwrap();
            }

            for (employee_id, department_id) in moves {
                manager.move_employee_to_department(employee_id, department_id).unwrap();
                let holders = holders_of(&manager, employee_id);
                prop_assert_eq!(holders.clone(), vec![department_id]);
                prop_assert_eq!(
                    employees.get_employee(employee_id).unwrap().department_id,
                    Some(department_id)
                );
            }

            for employee in employees.list_all_employees() {
                let holders = holders_of(&manager, employee.id);
                match employee.department_id {
                    Some(department_id) => {
                        prop_assert_eq!(holders, vec![department_id]);
                    }
                    None => {
                        prop_assert!(holders.is_empty());
                    }
                }
            }

            for department in manager.list_all_departments() {
                if department.employee_count() > 0 {
                    prop_assert!(manager.remove_department(department.id).is_err());
                    prop_assert!(manager.get_department(department.id).is_some());
                }
            }
        }
    }
}
