//! vCard 3.0 export.
//!
//! Builds the downloadable contact card offered on every profile page.
//! Only the fields the product exposes are emitted:
//!
//! ```text
//! BEGIN:VCARD
//! VERSION:3.0
//! N:Doe;Jane;;;
//! FN:Jane Doe
//! ORG:Acme
//! TITLE:Founder
//! TEL;TYPE=CELL:+971 501234567
//! TEL;TYPE=OTHER:+971 44001122
//! EMAIL;TYPE=WORK:jane@acme.test
//! ADR;TYPE=WORK:;;Street 1;;Dubai;;UAE
//! NOTE:About text
//! END:VCARD
//! ```
//!
//! The first phone number is the `CELL` entry, the first email the `WORK`
//! entry; every further one is tagged `OTHER`. Lines are CRLF-terminated.

use serde::{Deserialize, Serialize};

/// Postal address printed on the card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl PostalAddress {
    fn is_empty(&self) -> bool {
        [&self.street, &self.region, &self.country]
            .iter()
            .all(|part| part.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

/// Contact details rendered into a vCard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCard {
    pub full_name: String,
    pub organization: Option<String>,
    pub title: Option<String>,
    /// Phone numbers in display order; the first one is the mobile.
    pub phones: Vec<String>,
    /// Email addresses in display order; the first one is the work address.
    pub emails: Vec<String>,
    pub address: Option<PostalAddress>,
    pub note: Option<String>,
}

impl ContactCard {
    /// Render the card as vCard 3.0 text.
    #[must_use]
    pub fn to_vcard(&self) -> String {
        let mut lines: Vec<String> = vec!["BEGIN:VCARD".into(), "VERSION:3.0".into()];

        let (given, family) = split_name(&self.full_name);
        lines.push(format!("N:{};{};;;", escape(family), escape(&given)));
        lines.push(format!("FN:{}", escape(self.full_name.trim())));

        if let Some(org) = non_blank(self.organization.as_deref()) {
            lines.push(format!("ORG:{}", escape(org)));
        }
        if let Some(title) = non_blank(self.title.as_deref()) {
            lines.push(format!("TITLE:{}", escape(title)));
        }

        let phones = self.phones.iter().filter(|p| !p.trim().is_empty());
        for (i, phone) in phones.enumerate() {
            let kind = if i == 0 { "CELL" } else { "OTHER" };
            lines.push(format!("TEL;TYPE={kind}:{}", escape(phone.trim())));
        }

        let emails = self.emails.iter().filter(|e| !e.trim().is_empty());
        for (i, email) in emails.enumerate() {
            let kind = if i == 0 { "WORK" } else { "OTHER" };
            lines.push(format!("EMAIL;TYPE={kind}:{}", escape(email.trim())));
        }

        if let Some(address) = self.address.as_ref().filter(|a| !a.is_empty()) {
            let part = |p: &Option<String>| escape(p.as_deref().unwrap_or("").trim());
            lines.push(format!(
                "ADR;TYPE=WORK:;;{};;{};;{}",
                part(&address.street),
                part(&address.region),
                part(&address.country)
            ));
        }

        if let Some(note) = non_blank(self.note.as_deref()) {
            lines.push(format!("NOTE:{}", escape(note)));
        }

        lines.push("END:VCARD".into());

        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }

    /// File name for the download, e.g. `Jane_Doe.vcf`.
    #[must_use]
    pub fn file_name(&self) -> String {
        let stem: String = self
            .full_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(*c, '_' | '-' | '.'))
            .collect();

        if stem.is_empty() {
            "contact.vcf".to_string()
        } else {
            format!("{stem}.vcf")
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Split a display name into (given, family); the family name is the last word.
fn split_name(full_name: &str) -> (String, &str) {
    let words: Vec<&str> = full_name.split_whitespace().collect();
    match words.split_last() {
        Some((family, given)) if !given.is_empty() => (given.join(" "), *family),
        Some((only, _)) => ((*only).to_string(), ""),
        None => (String::new(), ""),
    }
}

/// Escape a text value per RFC 2426 section 4.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> ContactCard {
        ContactCard {
            full_name: "Jane Doe".to_string(),
            organization: Some("Acme".to_string()),
            title: Some("Founder".to_string()),
            phones: vec!["+971 501234567".to_string(), "+971 44001122".to_string()],
            emails: vec!["jane@acme.test".to_string()],
            address: Some(PostalAddress {
                street: Some("Street 1".to_string()),
                region: Some("Dubai".to_string()),
                country: Some("UAE".to_string()),
            }),
            note: Some("Makes things".to_string()),
        }
    }

    fn count_prefix(text: &str, prefix: &str) -> usize {
        text.lines().filter(|l| l.starts_with(prefix)).count()
    }

    #[test]
    fn test_two_phones_one_email() {
        let text = card().to_vcard();
        assert_eq!(count_prefix(&text, "TEL;TYPE=CELL"), 1);
        assert_eq!(count_prefix(&text, "TEL;TYPE=OTHER"), 1);
        assert_eq!(count_prefix(&text, "EMAIL;TYPE=WORK"), 1);
        assert_eq!(count_prefix(&text, "EMAIL;TYPE=OTHER"), 0);
        assert_eq!(text.trim_end().lines().last(), Some("END:VCARD"));
    }

    #[test]
    fn test_header_and_name_fields() {
        let text = card().to_vcard();
        assert!(text.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
        assert!(text.contains("N:Doe;Jane;;;\r\n"));
        assert!(text.contains("FN:Jane Doe\r\n"));
        assert!(text.contains("ORG:Acme\r\n"));
        assert!(text.contains("TITLE:Founder\r\n"));
        assert!(text.contains("ADR;TYPE=WORK:;;Street 1;;Dubai;;UAE\r\n"));
        assert!(text.contains("NOTE:Makes things\r\n"));
    }

    #[test]
    fn test_optional_fields_omitted() {
        let card = ContactCard {
            full_name: "Solo".to_string(),
            ..ContactCard::default()
        };
        let text = card.to_vcard();
        assert!(text.contains("N:;Solo;;;"));
        assert!(!text.contains("ORG:"));
        assert!(!text.contains("TEL;"));
        assert!(!text.contains("ADR;"));
        assert!(!text.contains("NOTE:"));
    }

    #[test]
    fn test_escapes_special_characters() {
        let card = ContactCard {
            full_name: "Jane Doe".to_string(),
            note: Some("one, two; three\nfour".to_string()),
            ..ContactCard::default()
        };
        assert!(card.to_vcard().contains("NOTE:one\\, two\\; three\\nfour"));
    }

    #[test]
    fn test_blank_entries_skipped() {
        let card = ContactCard {
            full_name: "Jane Doe".to_string(),
            phones: vec![" ".to_string(), "+1 555".to_string()],
            ..ContactCard::default()
        };
        let text = card.to_vcard();
        assert!(text.contains("TEL;TYPE=CELL:+1 555"));
        assert_eq!(count_prefix(&text, "TEL;"), 1);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(card().file_name(), "Jane_Doe.vcf");
        assert_eq!(ContactCard::default().file_name(), "contact.vcf");
    }
}
