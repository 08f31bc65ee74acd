use crate::error::{AppError, Result};

/// Validates a full name.
///
/// # Arguments
///
/// * `fullname` - The full name to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the name is valid.
pub fn validate_fullname(fullname: &str) -> Result<()> {
    if fullname.trim().is_empty() {
        return Err(AppError::Validation("Full name cannot be empty".to_string()));
    }

    if fullname.chars().count() > 255 {
        return Err(AppError::Validation(
            "Full name must be at most 255 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}
