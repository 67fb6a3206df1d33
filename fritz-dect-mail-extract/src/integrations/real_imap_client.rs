use crate::integrations::Mailbox;
use imap::ClientBuilder;
use shared_types::{ExtractionError, ServerData};

/// A TLS IMAP session with one mailbox selected.
pub struct RealImapClient {
    session: imap::Session<imap::Connection>,
}

impl RealImapClient {
    /// Connects, logs in and selects `mailbox`. `default_port` applies when
    /// the server address has no `:port` suffix.
    pub fn connect(
        server_data: &ServerData,
        default_port: u16,
        mailbox: &str,
    ) -> Result<Self, ExtractionError> {
        let (host, port) = split_host_port(&server_data.server, default_port);
        tracing::info!("Connecting to {}:{} as {}", host, port, server_data.username);

        let client = ClientBuilder::new(host, port).connect().map_err(|e| {
            ExtractionError::transport("Failed to connect to IMAP server", e)
        })?;

        let mut session = client
            .login(&server_data.username, &server_data.password)
            .map_err(|(e, _client)| ExtractionError::transport("IMAP login failed", e))?;

        if let Err(e) = session.select(mailbox) {
            if let Err(logout_err) = session.logout() {
                tracing::warn!("Failed to close mailbox session: {}", logout_err);
            }
            return Err(ExtractionError::transport(
                format!("Failed to select mailbox '{}'", mailbox),
                e,
            ));
        }

        Ok(Self { session })
    }
}

impl Mailbox for RealImapClient {
    fn search(&mut self, subject_marker: &str) -> Result<Vec<u32>, ExtractionError> {
        let query = format!("SUBJECT {}", quote(subject_marker));
        tracing::debug!("IMAP SEARCH query: {}", query);

        let uids = self
            .session
            .uid_search(&query)
            .map_err(|e| ExtractionError::transport("IMAP search failed", e))?;

        let mut uids: Vec<u32> = uids.into_iter().collect();
        uids.sort_unstable();
        Ok(uids)
    }

    fn fetch_raw(&mut self, uid: u32) -> Result<Vec<u8>, ExtractionError> {
        let messages = self
            .session
            .uid_fetch(uid.to_string(), "RFC822")
            .map_err(|e| {
                ExtractionError::transport(format!("Failed to fetch UID {}", uid), e)
            })?;

        let message = messages.iter().next().ok_or_else(|| {
            ExtractionError::transport(format!("Failed to fetch UID {}", uid), "Email not found")
        })?;

        let body = message.body().ok_or_else(|| {
            ExtractionError::transport(format!("Failed to fetch UID {}", uid), "Email has no body")
        })?;

        Ok(body.to_vec())
    }

    fn logout(&mut self) -> Result<(), ExtractionError> {
        self.session
            .logout()
            .map_err(|e| ExtractionError::transport("IMAP logout failed", e))
    }
}

fn split_host_port(server: &str, default_port: u16) -> (&str, u16) {
    match server.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host, port),
            Err(_) => (server, default_port),
        },
        None => (server, default_port),
    }
}

/// IMAP quoted string.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_host_port() {
        assert_eq!(split_host_port("imap.example.com", 993), ("imap.example.com", 993));
        assert_eq!(split_host_port("imap.example.com:143", 993), ("imap.example.com", 143));
        assert_eq!(split_host_port("imap.example.com:imaps", 993), ("imap.example.com:imaps", 993));
    }

    #[test]
    fn test_transport_error_keeps_imap_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = ExtractionError::transport("IMAP search failed", imap::Error::Io(io));

        let source = std::error::Error::source(&err).unwrap();
        let imap_err = source.downcast_ref::<imap::Error>().unwrap();
        assert!(matches!(imap_err, imap::Error::Io(_)));
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("FRITZ!DECT"), "\"FRITZ!DECT\"");
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }
}
