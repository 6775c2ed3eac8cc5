// ✅ Field Validation - Shared numeric and text checks for constructors and patches

use crate::error::{ManagerError, Result};

/// Deposit/withdraw amounts must be finite and strictly positive
pub fn positive_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ManagerError::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Balances and prices may be zero but never negative
pub fn non_negative(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(ManagerError::invalid_field(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ManagerError::invalid_field(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(value)
}

pub fn positive_age(age: u32) -> Result<u32> {
    if age == 0 {
        return Err(ManagerError::invalid_field("age", "must be greater than 0"));
    }
    Ok(age)
}
