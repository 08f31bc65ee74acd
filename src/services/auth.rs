use crate::crypto::token::OwnerIdentity;
use crate::error::{AppError, Result};
use crate::models::owner::{NewOwner, Owner};
use crate::state::AppState;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 6;

/// Message returned for any failed login, whichever part was wrong.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the hashed password.
pub fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut salt_bytes)
        .map_err(|e| AppError::Internal(format!("Failed to generate salt: {}", e)))?;

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    tracing::debug!("Password hashed successfully with Argon2");
    Ok(password_hash)
}

/// Verifies a password against a hash.
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `hash` - The hash to verify against.
///
/// # Returns
///
/// A `Result` containing `true` if the password is valid, `false` otherwise.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    let result = Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    tracing::debug!("Password verification completed");
    Ok(result)
}

/// Creates the first owner. Refused once any owner exists.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `fullname` - The owner's full name.
/// * `email` - The owner's email address.
/// * `password` - The owner's plaintext password; only its hash is stored.
///
/// # Returns
///
/// A `Result` containing the created `Owner`.
pub async fn create_owner(
    state: &AppState,
    fullname: String,
    email: String,
    password: String,
) -> Result<Owner> {
    if state.owners.count().await? > 0 {
        return Err(AppError::Forbidden(
            "You don't have permission to create a new owner".to_string(),
        ));
    }

    let password_hash = hash_password(&password)?;

    let owner = state
        .owners
        .insert(NewOwner {
            fullname: fullname.trim().to_string(),
            email: email.trim().to_string(),
            password_hash,
        })
        .await?;

    tracing::info!("✅ Owner created with ID: {}", owner.id);
    Ok(owner)
}

/// Checks an owner's credentials and issues a session token.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `email` - The owner's email address.
/// * `password` - The owner's password.
///
/// # Returns
///
/// A `Result` containing the authenticated `Owner` and its token.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<(Owner, String)> {
    tracing::debug!("🔐 Authenticating owner: {}", email);

    let owner = state
        .owners
        .find_by_email(email.trim())
        .await?
        .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(password, &owner.password_hash)? {
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.tokens.issue(&OwnerIdentity {
        id: owner.id.to_string(),
        email: owner.email.clone(),
    })?;

    tracing::info!("✅ Owner authenticated: {}", owner.id);
    Ok((owner, token))
}
