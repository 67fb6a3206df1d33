use shared_types::{AttachmentSlot, ExtractionError, MailRecord};
use std::fs;
use std::path::{Path, PathBuf};

const PREFIX_FORMAT: &str = "%Y-%m-%d_%H-%M-%S_FritzDect_";

/// `YYYY-MM-DD_HH-MM-SS_FritzDect_`, taken from the mail date.
pub fn filename_prefix(record: &MailRecord) -> String {
    record.date.format(PREFIX_FORMAT).to_string()
}

fn slot_file_name(slot: AttachmentSlot) -> &'static str {
    match slot {
        AttachmentSlot::DataCsv => "data.csv",
        AttachmentSlot::TemperatureImage => "temperature.png",
        AttachmentSlot::EnergyImage => "energy.png",
    }
}

/// Writes the mail body and its three attachments into `target_folder`,
/// overwriting existing files. Returns the absolute paths written.
pub fn persist(record: &MailRecord, target_folder: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let prefix = filename_prefix(record);

    let mut files: Vec<(&str, &[u8])> = vec![("mail.html", record.html.as_bytes())];
    for slot in AttachmentSlot::ALL {
        files.push((slot_file_name(slot), record.attachment(slot).bytes.as_slice()));
    }

    let mut written = Vec::with_capacity(files.len());
    for (suffix, data) in files {
        let path = target_folder.join(format!("{}{}", prefix, suffix));
        fs::write(&path, data)?;

        let path = fs::canonicalize(&path)?;
        tracing::debug!("Saved '{}'", path.display());
        written.push(path);
    }

    Ok(written)
}
