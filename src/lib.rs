// Entity Manager - Core Library
// Keyed in-memory managers for accounts, products, employees and departments,
// plus the user directory behind the login/registration demo

pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod logging;
pub mod repository;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use auth::{load_users_csv, NewUser, SeedUser, User, UserDirectory, UserId};
pub use config::AppConfig;
pub use entities::{
    Account, AccountIdentity, AccountNumber, AccountPatch, AccountSummary, BankAccountManager,
    Department, DepartmentHeader, DepartmentId, DepartmentManager,
    Employee, EmployeeBasicInfo, EmployeeId, EmployeeManager, EmployeePatch,
    Product, ProductId, ProductLabel, ProductListing, ProductManager, ProductPatch,
};
pub use error::{AuthError, ManagerError, Result};
pub use events::{Event, EventLog};
pub use repository::{Entity, KeyedRepository, Patch};
pub use session::{InMemorySessionStore, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
