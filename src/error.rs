// ⚠️ Error Types - Every rejected operation surfaces as a typed error
// Failed operations never leave a collection partially mutated

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ManagerError {
    #[error("{entity} {id} already exists")]
    DuplicateKey { entity: &'static str, id: String },

    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: String },

    #[error("amount must be greater than 0, got {amount}")]
    InvalidAmount { amount: f64 },

    #[error("insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: String,
        balance: f64,
        requested: f64,
    },

    #[error("department {id} still has {employees} employee(s)")]
    DepartmentNotEmpty { id: String, employees: usize },

    #[error("employee {id} is still placed in department {department}; dismiss it instead")]
    EmployeeAssigned { id: String, department: String },

    #[error("invalid {field}: {message}")]
    InvalidField { field: &'static str, message: String },
}

impl ManagerError {
    pub fn duplicate(entity: &'static str, id: impl ToString) -> Self {
        ManagerError::DuplicateKey {
            entity,
            id: id.to_string(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ManagerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        ManagerError::InvalidField {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ManagerError>;

/// Login and registration failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("all fields are required")]
    MissingFields,

    #[error("email or password is incorrect")]
    InvalidCredentials,

    #[error("email {email} is already registered")]
    DuplicateEmail { email: String },

    #[error("session store error: {0}")]
    Session(String),
}

// ============================================================================
// TESTS
// ============================================================================
