use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection details for one IMAP account.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerData {
    pub server: String,
    pub username: String,
    pub password: String,
}

impl ServerData {
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs.
impl fmt::Debug for ServerData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerData")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// A raw attachment as found in the mail. The payload is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentBlob {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl AttachmentBlob {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// The three attachment roles of a FRITZ!DECT report mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentSlot {
    DataCsv,
    TemperatureImage,
    EnergyImage,
}

impl AttachmentSlot {
    pub const ALL: [AttachmentSlot; 3] = [
        AttachmentSlot::DataCsv,
        AttachmentSlot::TemperatureImage,
        AttachmentSlot::EnergyImage,
    ];

    pub fn field(self) -> MailField {
        match self {
            AttachmentSlot::DataCsv => MailField::DataCsv,
            AttachmentSlot::TemperatureImage => MailField::TemperatureImage,
            AttachmentSlot::EnergyImage => MailField::EnergyImage,
        }
    }
}

impl fmt::Display for AttachmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.field().fmt(f)
    }
}

/// Every field a [`MailRecord`] must carry before it is handed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailField {
    Subject,
    Date,
    Html,
    TemperatureImage,
    EnergyImage,
    DataCsv,
}

impl MailField {
    pub fn as_str(self) -> &'static str {
        match self {
            MailField::Subject => "subject",
            MailField::Date => "date",
            MailField::Html => "html",
            MailField::TemperatureImage => "temperature_image",
            MailField::EnergyImage => "energy_image",
            MailField::DataCsv => "data_csv",
        }
    }
}

impl fmt::Display for MailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One complete report mail. Only constructed once every field is present.
#[derive(Debug, Clone, PartialEq)]
pub struct MailRecord {
    pub subject: String,
    /// Timestamp of the mail itself, in the offset it was sent with.
    pub date: DateTime<FixedOffset>,
    pub html: String,
    pub temperature_image: AttachmentBlob,
    pub energy_image: AttachmentBlob,
    pub data_csv: AttachmentBlob,
}

impl MailRecord {
    pub fn attachment(&self, slot: AttachmentSlot) -> &AttachmentBlob {
        match slot {
            AttachmentSlot::DataCsv => &self.data_csv,
            AttachmentSlot::TemperatureImage => &self.temperature_image,
            AttachmentSlot::EnergyImage => &self.energy_image,
        }
    }
}
