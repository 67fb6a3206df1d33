use keyring::Entry;

#[derive(Debug)]
pub enum KeyringError {
    NotFound,
    ServiceUnavailable(String),
    OperationFailed(String),
}

impl std::fmt::Display for KeyringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyringError::NotFound => write!(f, "Credential not found in keychain"),
            KeyringError::ServiceUnavailable(msg) => {
                write!(f, "Keychain service unavailable: {}", msg)
            }
            KeyringError::OperationFailed(msg) => write!(f, "Keychain operation failed: {}", msg),
        }
    }
}

impl std::error::Error for KeyringError {}

/// IMAP passwords in the system keychain, stored under the server address
/// as service and the IMAP username as account.
pub struct KeyringService;

impl KeyringService {
    fn entry(server: &str, username: &str) -> Result<Entry, KeyringError> {
        Entry::new(server, username).map_err(|e| {
            KeyringError::ServiceUnavailable(format!("Failed to create keychain entry: {}", e))
        })
    }

    pub fn set_password(server: &str, username: &str, password: &str) -> Result<(), KeyringError> {
        let entry = Self::entry(server, username)?;

        entry.set_password(password).map_err(|e| {
            KeyringError::OperationFailed(format!("Failed to store password: {}", e))
        })?;

        Ok(())
    }

    pub fn get_password(server: &str, username: &str) -> Result<String, KeyringError> {
        let entry = Self::entry(server, username)?;

        entry.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => KeyringError::NotFound,
            other => KeyringError::OperationFailed(format!("Failed to retrieve password: {}", other)),
        })
    }
}
