//! Login lifecycle.
//!
//! A token login is attempted once. A password login keeps prompting until
//! it succeeds or the operator stops answering.

use crate::config::Credentials;
use crate::error::CliError;
use lqm_client::{ControllerClient, Error as ClientError, Profile};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

/// Source of credentials the flags and settings did not supply.
pub trait CredentialPrompt {
    /// Ask for an email. `None` means input has ended.
    fn email(&mut self) -> io::Result<Option<String>>;

    /// Ask for a password. `None` means input has ended.
    fn password(&mut self) -> io::Result<Option<String>>;
}

/// Prompts on stderr and reads answers from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl StdinPrompt {
    fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        let mut stderr = io::stderr();
        write!(stderr, "{}: ", label)?;
        stderr.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl CredentialPrompt for StdinPrompt {
    fn email(&mut self) -> io::Result<Option<String>> {
        self.ask("email")
    }

    fn password(&mut self) -> io::Result<Option<String>> {
        self.ask("password")
    }
}

/// Log the client in.
///
/// # Errors
///
/// [`CliError::TokenRejected`] when a token login fails,
/// [`CliError::LoginAborted`] when the prompt runs dry, and
/// [`CliError::Client`] when the controller cannot be reached at all.
pub async fn authenticate(
    client: &mut ControllerClient,
    credentials: &Credentials,
    prompt: &mut dyn CredentialPrompt,
) -> Result<Profile, CliError> {
    if let Some(token) = credentials.token.as_deref().filter(|_| credentials.prefers_token()) {
        let profile = client
            .use_token(token)
            .await
            .map_err(CliError::TokenRejected)?;
        log_profile(&profile);
        return Ok(profile);
    }

    let mut email = credentials.email.clone();
    let mut password = credentials.password.clone();
    loop {
        let user = match email.take() {
            Some(e) => e,
            None => ask(prompt.email())?,
        };
        let secret = match password.take() {
            Some(p) => p,
            None => ask(prompt.password())?,
        };

        match client.login(&user, &secret).await {
            Ok(profile) => {
                log_profile(&profile);
                return Ok(profile);
            }
            Err(err @ ClientError::Http(_)) => return Err(err.into()),
            Err(err) => warn!("Login failed: {}", err),
        }
    }
}

fn ask(answer: io::Result<Option<String>>) -> Result<String, CliError> {
    answer.map_err(CliError::Prompt)?.ok_or(CliError::LoginAborted)
}

fn log_profile(profile: &Profile) {
    info!(
        tenant = profile.tenant_id.as_deref().unwrap_or_default(),
        "Logged in as {}",
        profile.email.as_deref().unwrap_or("<token>")
    );
}

/// End the session, logging rather than failing when logout is refused.
pub async fn logout(client: &mut ControllerClient) {
    info!("Logging out");
    if let Err(err) = client.logout().await {
        warn!("Logout failed: {}", err);
    }
}
