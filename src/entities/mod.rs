// Entity Models
// "Identity persists, values change"
//
// Each entity has:
// - Stable identity (a numeric id) that NEVER changes
// - Values that change only through a manager (patch or domain mutator)
// - A manager that owns the collection and enforces its invariants

pub mod account;
pub mod department;
pub mod employee;
pub mod product;

pub use account::{Account, AccountIdentity, AccountNumber, AccountPatch, AccountSummary, BankAccountManager};
pub use department::{Department, DepartmentHeader, DepartmentId, DepartmentManager};
pub use employee::{Employee, EmployeeBasicInfo, EmployeeId, EmployeeManager, EmployeePatch};
pub use product::{Product, ProductId, ProductLabel, ProductListing, ProductManager, ProductPatch};
