//! Account commands.
//!
//! Passwords never come from argv. They are read from
//! `SHOPVISTA_PASSWORD` / `SHOPVISTA_CONFIRM_PASSWORD`, or from stdin when
//! those are unset.

use std::io::{self, BufRead, Write};

use secrecy::SecretString;

use shopvista_storefront::error::AppError;
use shopvista_storefront::state::AppState;

const PASSWORD_VAR: &str = "SHOPVISTA_PASSWORD";
const CONFIRM_PASSWORD_VAR: &str = "SHOPVISTA_CONFIRM_PASSWORD";

/// Read a secret from `var`, or prompt for one line on stdin.
///
/// A read failure yields an empty secret, which the session service rejects
/// as a missing password.
fn read_secret(var: &str, prompt: &str) -> SecretString {
    let from_env = std::env::var(var).ok();
    if from_env.is_none() {
        prompt_on_stderr(prompt);
    }
    secret_from(from_env, io::stdin().lock())
}

fn secret_from(from_env: Option<String>, mut input: impl BufRead) -> SecretString {
    if let Some(value) = from_env {
        return SecretString::from(value);
    }

    let mut line = String::new();
    if let Err(e) = input.read_line(&mut line) {
        tracing::warn!(error = %e, "Failed to read password from stdin");
        line.clear();
    }
    let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);
    SecretString::from(line)
}

#[allow(clippy::print_stderr)]
fn prompt_on_stderr(prompt: &str) {
    eprint!("{prompt}: ");
    let _ = io::stderr().flush();
}

/// Sign in.
#[allow(clippy::print_stdout)]
pub async fn sign_in(state: &AppState, email: &str) -> Result<(), AppError> {
    let password = read_secret(PASSWORD_VAR, "Password");
    println!("Signing in...");
    let user = state.auth().sign_in(email, &password).await?;
    println!("Welcome back! Hello, {}", user.name);
    Ok(())
}

/// Create an account.
#[allow(clippy::print_stdout)]
pub async fn sign_up(
    state: &AppState,
    name: &str,
    email: &str,
) -> Result<(), AppError> {
    let password = read_secret(PASSWORD_VAR, "Password");
    let confirm_password = read_secret(CONFIRM_PASSWORD_VAR, "Confirm password");
    let auth = state.auth();
    println!("Creating account...");
    let user = auth.sign_up(name, email, &password, &confirm_password).await?;
    println!("Account created successfully! Hello, {}", user.name);
    Ok(())
}

/// Sign out.
#[allow(clippy::print_stdout)]
pub fn sign_out(state: &AppState) -> Result<(), AppError> {
    state.auth().sign_out()?;
    println!("Signed out successfully");
    Ok(())
}

/// Show the signed-in user.
#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) {
    match state.auth().current() {
        Some(user) => println!(
            "{} <{}>, member since {}",
            user.name,
            user.email,
            user.created_at.format("%Y-%m-%d")
        ),
        None => println!("Not signed in"),
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_secret_prefers_environment() {
        let secret = secret_from(Some("from-env".to_string()), "from-stdin\n".as_bytes());
        assert_eq!(secret.expose_secret(), "from-env");
    }

    #[test]
    fn test_secret_read_from_input_line() {
        let secret = secret_from(None, "hunter2\r\nignored\n".as_bytes());
        assert_eq!(secret.expose_secret(), "hunter2");
    }

    #[test]
    fn test_secret_empty_on_closed_input() {
        let secret = secret_from(None, "".as_bytes());
        assert!(secret.expose_secret().is_empty());
    }
}
