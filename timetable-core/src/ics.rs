use chrono::NaiveDateTime;

use crate::{CalendarEvent, Error, IcsOptions, Result};

/// MIME type of exported files.
pub const ICS_MIME_TYPE: &str = "text/calendar";

/// Floating local time, no `Z` and no `TZID`.
const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Writes calendar events as an ICS document.
pub struct IcsExporter {
    options: IcsOptions,
}

impl IcsExporter {
    pub const fn new(options: IcsOptions) -> Self {
        Self { options }
    }

    /// Serializes events into one calendar document. Refuses an empty event list.
    pub fn export(&self, events: &[CalendarEvent]) -> Result<String> {
        if events.is_empty() {
            return Err(Error::EmptyExport);
        }

        let mut ics_content = String::new();

        ics_content.push_str("BEGIN:VCALENDAR\r\n");
        ics_content.push_str("VERSION:2.0\r\n");
        ics_content.push_str(&format!("PRODID:{}\r\n", self.options.prod_id));
        ics_content.push_str("CALSCALE:GREGORIAN\r\n");

        if let Some(ref name) = self.options.calendar_name {
            ics_content.push_str(&format!("X-WR-CALNAME:{}\r\n", escape_text(name)));
        }

        for (index, event) in events.iter().enumerate() {
            self.add_event(&mut ics_content, index, event);
        }

        ics_content.push_str("END:VCALENDAR\r\n");

        tracing::debug!("Exported {} events", events.len());
        Ok(ics_content)
    }

    fn add_event(&self, ics_content: &mut String, index: usize, event: &CalendarEvent) {
        // UIDs follow list position, so they are only stable within one export
        let uid = format!("event-{}@{}", index, self.options.uid_domain);

        ics_content.push_str("BEGIN:VEVENT\r\n");
        ics_content.push_str(&format!("UID:{}\r\n", uid));
        ics_content.push_str(&format!("DTSTAMP:{}\r\n", format_date_time(event.start)));
        ics_content.push_str(&format!("DTSTART:{}\r\n", format_date_time(event.start)));
        ics_content.push_str(&format!("DTEND:{}\r\n", format_date_time(event.end)));
        ics_content.push_str(&format!("SUMMARY:{}\r\n", escape_text(&event.title)));
        ics_content.push_str("END:VEVENT\r\n");
    }
}

impl Default for IcsExporter {
    fn default() -> Self {
        Self::new(IcsOptions::default())
    }
}

pub fn format_date_time(value: NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Escapes TEXT values: backslash, semicolon, comma and newline.
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Inverse of [`escape_text`].
pub fn unescape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
