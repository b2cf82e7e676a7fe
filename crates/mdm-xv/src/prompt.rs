use std::io::{self, Write};

use mdm_xv_core::auth::{AuthError, CredentialPrompt, Credentials};

/// Reads credentials from the controlling terminal. The password is not echoed.
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn prompt_credentials(&mut self) -> Result<Credentials, AuthError> {
        let username = prompt_line("Enter username: ").map_err(AuthError::Prompt)?;
        let password = rpassword::prompt_password("Enter password: ").map_err(AuthError::Prompt)?;
        let base_url = prompt_line("Enter server URL: ").map_err(AuthError::Prompt)?;

        Ok(Credentials::new(username, password.trim(), base_url))
    }
}

/// Print `label` and read one trimmed line from stdin
pub fn prompt_line(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
