//! Hashing and verification of user passwords.
//!
//! Passwords are stored as PHC-encoded Argon2id hashes. Both operations are
//! CPU-bound and run on tokio's blocking pool.
use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use secrecy::{ExposeSecret, SecretString};

use crate::telemetry::spawn_blocking_with_tracing;

/// Compute the password hash using the Argon2id algorithm.
///
/// The returned hash is in the PHC string format, which includes the salt and
/// the algorithm parameters.
#[tracing::instrument(name = "Hash password", skip_all)]
pub async fn hash(password: SecretString) -> Result<String, anyhow::Error> {
    spawn_blocking_with_tracing(move || compute_password_hash(&password))
        .await
        .context("Failed to spawn blocking task.")?
}

/// Whether `candidate` matches the stored PHC hash.
///
/// A stored value that is not a valid PHC string is an error, not a mismatch.
#[tracing::instrument(name = "Verify password", skip_all)]
pub async fn verify(expected_hash: String, candidate: SecretString) -> Result<bool, anyhow::Error> {
    spawn_blocking_with_tracing(move || verify_password_hash(&expected_hash, &candidate))
        .await
        .context("Failed to spawn blocking task.")?
}

fn compute_password_hash(password: &SecretString) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let params = Params::new(15000, 2, 1, None)
        .map_err(|e| anyhow::anyhow!("invalid Argon2 parameters: {e}"))?;
    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?
        .to_string();
    Ok(hash)
}

fn verify_password_hash(expected_hash: &str, candidate: &SecretString) -> Result<bool, anyhow::Error> {
    let expected = PasswordHash::new(expected_hash)
        .map_err(|e| anyhow::anyhow!("failed to parse hash in PHC string format: {e}"))?;
    Ok(Argon2::default()
        .verify_password(candidate.expose_secret().as_bytes(), &expected)
        .is_ok())
}
