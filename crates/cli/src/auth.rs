//! Access gate for the workspace shell
//!
//! A shared access code, checked once at startup. A successful unlock is
//! persisted so later sessions skip the prompt. A wrong code shows an
//! inline error and re-prompts; there is no lockout.

use anyhow::Result;
use rustyline::{history::DefaultHistory, Editor};

use crate::config::Config;
use crate::output::OutputHandler;

/// Outcome of checking the gate against the stored configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCheck {
    /// No access code configured, or already unlocked.
    Open,
    /// A code is required before the shell starts.
    Locked,
}

pub fn check(config: &Config) -> GateCheck {
    match &config.auth.access_code {
        Some(code) if !code.is_empty() && !config.auth.authenticated => GateCheck::Locked,
        _ => GateCheck::Open,
    }
}

pub fn verify(config: &Config, entered: &str) -> bool {
    config
        .auth
        .access_code
        .as_deref()
        .is_some_and(|code| code == entered)
}

/// Prompt until the correct code is entered or input ends. Persists the
/// unlocked flag on success.
pub fn unlock(config: &mut Config, output: &OutputHandler) -> Result<bool> {
    if check(config) == GateCheck::Open {
        return Ok(true);
    }

    let mut editor: Editor<(), DefaultHistory> = Editor::new()?;
    output.print_info("Enter access code to continue");

    loop {
        match editor.readline("access code: ") {
            Ok(line) => {
                if verify(config, line.trim()) {
                    config.auth.authenticated = true;
                    config.save()?;
                    output.print_success("Access granted");
                    return Ok(true);
                }
                output.print_error("Invalid access code");
            }
            Err(_) => return Ok(false),
        }
    }
}

/// Clear the persisted unlock so the next start prompts again.
pub fn lock(config: &mut Config) -> Result<()> {
    config.auth.authenticated = false;
    config.save()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_code_means_open() {
        let config = Config::default();
        assert_eq!(check(&config), GateCheck::Open);
    }

    #[test]
    fn configured_code_locks_until_authenticated() {
        let mut config = Config::default();
        config.auth.access_code = Some("trinity".to_string());
        assert_eq!(check(&config), GateCheck::Locked);

        config.auth.authenticated = true;
        assert_eq!(check(&config), GateCheck::Open);
    }

    #[test]
    fn verify_matches_exact_code_only() {
        let mut config = Config::default();
        config.auth.access_code = Some("trinity".to_string());

        assert!(verify(&config, "trinity"));
        assert!(!verify(&config, "Trinity"));
        assert!(!verify(&config, ""));
    }

    #[test]
    fn empty_code_never_verifies_but_gate_is_open() {
        let mut config = Config::default();
        config.auth.access_code = Some(String::new());
        assert_eq!(check(&config), GateCheck::Open);
    }
}
