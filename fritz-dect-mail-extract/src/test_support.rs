//! In-memory mailbox and hand-built report mails for tests.

use crate::integrations::Mailbox;
use shared_types::ExtractionError;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const DAILY_CSV: &str = "FRITZ!DECT 200 Wohnzimmer;Energie 24 Stunden;\n\
Datum/Uhrzeit;Energie in Wh;Temperatur in C;\n\
09:15;12,5;21,0;\n\
09:30;13,0;20,5;\n";

pub struct TestMail {
    subject: String,
    date: String,
    html: Option<String>,
    attachments: Vec<(String, String, Vec<u8>)>,
}

impl TestMail {
    /// A complete report mail with a daily CSV and both images.
    pub fn report(subject: &str, date: &str) -> Self {
        Self {
            subject: subject.to_string(),
            date: date.to_string(),
            html: Some("<html><body>Report</body></html>".to_string()),
            attachments: vec![
                (
                    "report.csv".to_string(),
                    "text/csv".to_string(),
                    DAILY_CSV.as_bytes().to_vec(),
                ),
                (
                    "ha_temp_24h.png".to_string(),
                    "image/png".to_string(),
                    b"PNG-temperature".to_vec(),
                ),
                (
                    "ha_stat_24h.png".to_string(),
                    "image/png".to_string(),
                    b"PNG-energy".to_vec(),
                ),
            ],
        }
    }

    pub fn with_csv(mut self, csv: &str) -> Self {
        for (name, _, content) in &mut self.attachments {
            if name.ends_with(".csv") {
                *content = csv.as_bytes().to_vec();
            }
        }
        self
    }

    pub fn with_attachment(mut self, name: &str, content_type: &str, content: &[u8]) -> Self {
        self.attachments
            .push((name.to_string(), content_type.to_string(), content.to_vec()));
        self
    }

    pub fn without_attachment(mut self, name: &str) -> Self {
        self.attachments.retain(|(n, _, _)| n != name);
        self
    }

    pub fn without_html(mut self) -> Self {
        self.html = None;
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let boundary = "REPORT-BOUNDARY";

        out.extend_from_slice(b"From: fritzbox@example.com\r\n");
        out.extend_from_slice(b"To: me@example.com\r\n");
        out.extend_from_slice(format!("Subject: {}\r\n", self.subject).as_bytes());
        out.extend_from_slice(format!("Date: {}\r\n", self.date).as_bytes());
        out.extend_from_slice(b"MIME-Version: 1.0\r\n");
        out.extend_from_slice(
            format!("Content-Type: multipart/mixed; boundary=\"{}\"\r\n\r\n", boundary).as_bytes(),
        );

        if let Some(html) = &self.html {
            out.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
            out.extend_from_slice(b"Content-Type: text/html; charset=utf-8\r\n\r\n");
            out.extend_from_slice(html.as_bytes());
            out.extend_from_slice(b"\r\n");
        } else {
            out.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
            out.extend_from_slice(b"Content-Type: text/plain; charset=utf-8\r\n\r\n");
            out.extend_from_slice(b"Report\r\n");
        }

        for (name, content_type, content) in &self.attachments {
            out.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
            out.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
            out.extend_from_slice(
                format!("Content-Disposition: attachment; filename=\"{}\"\r\n\r\n", name).as_bytes(),
            );
            out.extend_from_slice(content);
            out.extend_from_slice(b"\r\n");
        }

        out.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
        out
    }
}

/// Serves prepared messages and counts logouts.
pub struct ScriptedMailbox {
    messages: Vec<Vec<u8>>,
    pub fail_search: bool,
    pub fail_fetch: Option<u32>,
    pub logouts: Rc<Cell<usize>>,
    pub searches: Rc<RefCell<Vec<String>>>,
}

impl ScriptedMailbox {
    pub fn new(messages: Vec<Vec<u8>>) -> Self {
        Self {
            messages,
            fail_search: false,
            fail_fetch: None,
            logouts: Rc::new(Cell::new(0)),
            searches: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl Mailbox for ScriptedMailbox {
    fn search(&mut self, subject_marker: &str) -> Result<Vec<u32>, ExtractionError> {
        self.searches.borrow_mut().push(subject_marker.to_string());
        if self.fail_search {
            return Err(ExtractionError::transport("SEARCH failed", "connection reset"));
        }
        Ok((1..=self.messages.len() as u32).collect())
    }

    fn fetch_raw(&mut self, id: u32) -> Result<Vec<u8>, ExtractionError> {
        if self.fail_fetch == Some(id) {
            return Err(ExtractionError::transport("FETCH failed", "connection reset"));
        }
        self.messages
            .get(id as usize - 1)
            .cloned()
            .ok_or_else(|| ExtractionError::transport("FETCH failed", "no such message"))
    }

    fn logout(&mut self) -> Result<(), ExtractionError> {
        self.logouts.set(self.logouts.get() + 1);
        Ok(())
    }
}
