use chrono::{DateTime, FixedOffset};
use shared_types::{AttachmentBlob, AttachmentSlot, ExtractionError, MailField, MailRecord};

pub const DEFAULT_TEMPERATURE_PREFIX: &str = "ha_temp";
pub const DEFAULT_ENERGY_PREFIX: &str = "ha_stat";

/// Maps attachment filenames onto the three report slots.
#[derive(Debug, Clone)]
pub struct AttachmentClassifier {
    temperature_prefix: String,
    energy_prefix: String,
}

impl AttachmentClassifier {
    pub fn new(temperature_prefix: impl Into<String>, energy_prefix: impl Into<String>) -> Self {
        Self {
            temperature_prefix: temperature_prefix.into(),
            energy_prefix: energy_prefix.into(),
        }
    }

    pub fn classify(&self, filename: &str) -> Option<AttachmentSlot> {
        if filename.ends_with(".csv") {
            return Some(AttachmentSlot::DataCsv);
        }

        if filename.ends_with(".png") {
            if filename.starts_with(&self.temperature_prefix) {
                return Some(AttachmentSlot::TemperatureImage);
            }
            if filename.starts_with(&self.energy_prefix) {
                return Some(AttachmentSlot::EnergyImage);
            }
        }

        None
    }
}

impl Default for AttachmentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPERATURE_PREFIX, DEFAULT_ENERGY_PREFIX)
    }
}

/// A mail under classification. Every slot can be filled exactly once.
#[derive(Debug, Default)]
pub struct CandidateRecord {
    pub subject: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
    pub html: Option<String>,
    data_csv: Option<AttachmentBlob>,
    temperature_image: Option<AttachmentBlob>,
    energy_image: Option<AttachmentBlob>,
}

impl CandidateRecord {
    pub fn new(
        subject: Option<String>,
        date: Option<DateTime<FixedOffset>>,
        html: Option<String>,
    ) -> Self {
        Self {
            subject,
            date,
            html,
            ..Self::default()
        }
    }

    fn slot_mut(&mut self, slot: AttachmentSlot) -> &mut Option<AttachmentBlob> {
        match slot {
            AttachmentSlot::DataCsv => &mut self.data_csv,
            AttachmentSlot::TemperatureImage => &mut self.temperature_image,
            AttachmentSlot::EnergyImage => &mut self.energy_image,
        }
    }

    pub fn fill(&mut self, slot: AttachmentSlot, blob: AttachmentBlob) -> Result<(), ExtractionError> {
        let target = self.slot_mut(slot);
        if let Some(previous) = target.as_ref() {
            return Err(ExtractionError::DuplicateAttachment {
                slot,
                previous: previous.filename.clone(),
                current: blob.filename,
            });
        }
        *target = Some(blob);
        Ok(())
    }

    /// Classifies one attachment and stores it. Unrecognised files are ignored.
    pub fn add_attachment(
        &mut self,
        classifier: &AttachmentClassifier,
        blob: AttachmentBlob,
    ) -> Result<Option<AttachmentSlot>, ExtractionError> {
        match classifier.classify(&blob.filename) {
            Some(slot) => {
                self.fill(slot, blob)?;
                Ok(Some(slot))
            }
            None => Ok(None),
        }
    }

    pub fn missing_fields(&self) -> Vec<MailField> {
        let mut missing = Vec::new();
        if self.subject.is_none() {
            missing.push(MailField::Subject);
        }
        if self.date.is_none() {
            missing.push(MailField::Date);
        }
        if self.html.is_none() {
            missing.push(MailField::Html);
        }
        if self.temperature_image.is_none() {
            missing.push(MailField::TemperatureImage);
        }
        if self.energy_image.is_none() {
            missing.push(MailField::EnergyImage);
        }
        if self.data_csv.is_none() {
            missing.push(MailField::DataCsv);
        }
        missing
    }

    /// Turns the candidate into a record, or reports which fields are absent.
    pub fn into_record(self) -> Result<MailRecord, Vec<MailField>> {
        let missing = self.missing_fields();
        match self {
            CandidateRecord {
                subject: Some(subject),
                date: Some(date),
                html: Some(html),
                data_csv: Some(data_csv),
                temperature_image: Some(temperature_image),
                energy_image: Some(energy_image),
            } => Ok(MailRecord {
                subject,
                date,
                html,
                temperature_image,
                energy_image,
                data_csv,
            }),
            _ => Err(missing),
        }
    }
}
