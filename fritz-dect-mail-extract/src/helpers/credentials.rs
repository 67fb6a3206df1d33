use crate::helpers::keyring_service::{KeyringError, KeyringService};
use anyhow::{bail, Result};
use shared_types::ServerData;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    Server,
    Username,
    Password,
}

impl CredentialField {
    pub const ALL: [CredentialField; 3] = [
        CredentialField::Server,
        CredentialField::Username,
        CredentialField::Password,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CredentialField::Server => "server",
            CredentialField::Username => "username",
            CredentialField::Password => "password",
        }
    }

    pub fn env_var(self) -> &'static str {
        match self {
            CredentialField::Server => "FRITZ_DECT_SERVER",
            CredentialField::Username => "FRITZ_DECT_USERNAME",
            CredentialField::Password => "FRITZ_DECT_PASSWORD",
        }
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values resolved so far. Later providers may need earlier fields, e.g.
/// the keychain lookup is keyed by server and username.
#[derive(Debug, Default, Clone)]
pub struct KnownCredentials {
    pub server: Option<String>,
    pub username: Option<String>,
}

/// One source of credentials. Returns `Ok(None)` to pass to the next provider.
pub trait CredentialProvider {
    fn name(&self) -> &'static str;

    fn resolve(&self, field: CredentialField, known: &KnownCredentials) -> Result<Option<String>>;
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct ExplicitProvider {
    server: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl ExplicitProvider {
    pub fn new(server: Option<String>, username: Option<String>, password: Option<String>) -> Self {
        Self {
            server,
            username,
            password,
        }
    }
}

impl CredentialProvider for ExplicitProvider {
    fn name(&self) -> &'static str {
        "command line"
    }

    fn resolve(&self, field: CredentialField, _known: &KnownCredentials) -> Result<Option<String>> {
        let value = match field {
            CredentialField::Server => self.server.as_ref(),
            CredentialField::Username => self.username.as_ref(),
            CredentialField::Password => self.password.as_ref(),
        };
        Ok(non_empty(value))
    }
}

pub struct EnvProvider {
    vars: HashMap<String, String>,
}

impl EnvProvider {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::vars().collect())
    }
}

impl CredentialProvider for EnvProvider {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn resolve(&self, field: CredentialField, _known: &KnownCredentials) -> Result<Option<String>> {
        Ok(non_empty(self.vars.get(field.env_var())))
    }
}

/// Passwords previously saved in the system keychain.
pub struct KeyringProvider;

impl CredentialProvider for KeyringProvider {
    fn name(&self) -> &'static str {
        "keychain"
    }

    fn resolve(&self, field: CredentialField, known: &KnownCredentials) -> Result<Option<String>> {
        let (CredentialField::Password, Some(server), Some(username)) =
            (field, known.server.as_deref(), known.username.as_deref())
        else {
            return Ok(None);
        };

        tracing::info!(
            "Getting secret for server: '{}', user: '{}'",
            server,
            username
        );
        match KeyringService::get_password(server, username) {
            Ok(password) if !password.is_empty() => Ok(Some(password)),
            Ok(_) | Err(KeyringError::NotFound) => Ok(None),
            Err(e) => {
                tracing::warn!("Failed to get password from keychain: {}", e);
                Ok(None)
            }
        }
    }
}

/// Asks on the terminal. Passwords are read without echo and saved to the
/// keychain for the next run.
pub struct PromptProvider {
    store_passwords: bool,
}

impl PromptProvider {
    pub fn new(store_passwords: bool) -> Self {
        Self { store_passwords }
    }
}

impl CredentialProvider for PromptProvider {
    fn name(&self) -> &'static str {
        "prompt"
    }

    fn resolve(&self, field: CredentialField, known: &KnownCredentials) -> Result<Option<String>> {
        let label = match field {
            CredentialField::Server => "Server",
            CredentialField::Username => "Username",
            CredentialField::Password => "Password",
        };
        print!("{}: ", label);
        io::stdout().flush()?;

        let value = if field == CredentialField::Password {
            rpassword::read_password()?
        } else {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        };

        if value.is_empty() {
            return Ok(None);
        }

        if field == CredentialField::Password && self.store_passwords {
            if let (Some(server), Some(username)) = (&known.server, &known.username) {
                if let Err(e) = KeyringService::set_password(server, username, &value) {
                    tracing::warn!("Failed to save password in keychain: {}", e);
                }
            }
        }

        Ok(Some(value))
    }
}

/// Providers tried in order for each field; the first value wins.
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }

    /// Command line, then environment, then (when interactive) keychain and prompt.
    pub fn standard(explicit: ExplicitProvider, interactive: bool) -> Self {
        let mut providers: Vec<Box<dyn CredentialProvider>> =
            vec![Box::new(explicit), Box::new(EnvProvider::from_env())];
        if interactive {
            providers.push(Box::new(KeyringProvider));
            providers.push(Box::new(PromptProvider::new(true)));
        }
        Self::new(providers)
    }

    pub fn resolve(&self) -> Result<ServerData> {
        let mut known = KnownCredentials::default();

        let server = self.resolve_field(CredentialField::Server, &known)?;
        known.server = Some(server.clone());

        let username = self.resolve_field(CredentialField::Username, &known)?;
        known.username = Some(username.clone());

        let password = self.resolve_field(CredentialField::Password, &known)?;

        Ok(ServerData::new(server, username, password))
    }

    fn resolve_field(&self, field: CredentialField, known: &KnownCredentials) -> Result<String> {
        for provider in &self.providers {
            if let Some(value) = provider.resolve(field, known)? {
                tracing::debug!("Resolved {} from {}", field, provider.name());
                return Ok(value);
            }
        }
        bail!("Value for '{}' was not given!", field)
    }
}
