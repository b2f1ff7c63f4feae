//! Conversions from backend documents into core types.

use cardfolio_core::{ContactCard, PostalAddress};

use super::types::Profile;

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

impl From<&Profile> for ContactCard {
    fn from(profile: &Profile) -> Self {
        let address = profile.contact_details.as_ref().map(|details| PostalAddress {
            street: non_blank(details.address.as_ref()),
            region: non_blank(details.state.as_ref()),
            country: non_blank(details.country.as_ref()),
        });

        Self {
            full_name: profile.display_name().to_string(),
            organization: non_blank(profile.company_name.as_ref()),
            title: non_blank(profile.company_designation.as_ref()),
            phones: profile
                .phone_numbers
                .iter()
                .map(super::types::PhoneNumber::display)
                .filter(|p| !p.is_empty())
                .collect(),
            emails: profile
                .emails
                .iter()
                .map(|e| e.email_address.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            address,
            note: non_blank(profile.about.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::{ContactDetails, EmailEntry, PhoneNumber};

    fn profile() -> Profile {
        Profile {
            full_name: Some(" Jane Doe ".to_string()),
            company_name: Some("Acme".to_string()),
            company_designation: Some("Founder".to_string()),
            about: Some("   ".to_string()),
            contact_details: Some(ContactDetails {
                address: Some("Street 1".to_string()),
                state: Some("Dubai".to_string()),
                country: Some("UAE".to_string()),
                google_map_link: None,
            }),
            phone_numbers: vec![
                PhoneNumber {
                    number: "501234567".to_string(),
                    country_code: Some("971".to_string()),
                },
                PhoneNumber {
                    number: "44001122".to_string(),
                    country_code: Some("+971".to_string()),
                },
            ],
            emails: vec![EmailEntry {
                email_address: "jane@acme.test".to_string(),
            }],
            ..Profile::default()
        }
    }

    #[test]
    fn test_profile_to_contact_card() {
        let card = ContactCard::from(&profile());
        assert_eq!(card.full_name, "Jane Doe");
        assert_eq!(card.organization.as_deref(), Some("Acme"));
        assert_eq!(card.phones, vec!["+971 501234567", "+971 44001122"]);
        assert_eq!(card.emails, vec!["jane@acme.test"]);
        assert!(card.note.is_none());
    }

    #[test]
    fn test_profile_vcard_export() {
        let text = ContactCard::from(&profile()).to_vcard();
        let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("TEL;TYPE=CELL"), 1);
        assert_eq!(count("TEL;TYPE=OTHER"), 1);
        assert_eq!(count("EMAIL;TYPE=WORK"), 1);
        assert!(text.trim_end().ends_with("END:VCARD"));
    }
}
