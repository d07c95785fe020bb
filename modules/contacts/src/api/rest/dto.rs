use serde::{Deserialize, Serialize};

use crate::contract::model::{Contact, PhoneNumber};

pub const FIELD_FULL_NAME: &str = "FullName";
pub const FIELD_EMAIL: &str = "Email";
pub const FIELD_PHONE_NUMBERS: &str = "PhoneNumbers";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactDto {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone_numbers: Vec<PhoneNumberDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhoneNumberDto {
    pub id: i32,
    pub contact_id: i32,
    pub number: String,
}

/// Fields of the contact form, collected from url-encoded pairs.
///
/// `PhoneNumbers` may repeat; blank entries are dropped. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub full_name: String,
    pub email: String,
    pub phone_numbers: Vec<String>,
}

impl ContactForm {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        pairs
            .into_iter()
            .fold(Self::default(), |mut form, (key, value)| {
                match key.as_str() {
                    FIELD_FULL_NAME => form.full_name = value,
                    FIELD_EMAIL => form.email = value,
                    FIELD_PHONE_NUMBERS if !value.trim().is_empty() => {
                        form.phone_numbers.push(value)
                    }
                    _ => {}
                }
                form
            })
    }
}

impl From<ContactForm> for Contact {
    fn from(form: ContactForm) -> Self {
        form.phone_numbers
            .into_iter()
            .fold(Contact::new(form.full_name, form.email), |c, n| {
                c.with_phone_number(n)
            })
    }
}

impl From<Contact> for ContactDto {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            full_name: c.full_name,
            email: c.email,
            phone_numbers: c.phone_numbers.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PhoneNumber> for PhoneNumberDto {
    fn from(p: PhoneNumber) -> Self {
        Self {
            id: p.id,
            contact_id: p.contact_id,
            number: p.number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn form_collects_repeated_phone_numbers() {
        let form = ContactForm::from_pairs(pairs(&[
            ("FullName", "Radia Perlman"),
            ("Email", "rperl001@mit.edu"),
            ("PhoneNumbers", "0488445688"),
            ("PhoneNumbers", "  "),
            ("PhoneNumbers", "+61488224568"),
            ("Unrelated", "x"),
        ]));
        assert_eq!(form.full_name, "Radia Perlman");
        assert_eq!(form.email, "rperl001@mit.edu");
        assert_eq!(form.phone_numbers, vec!["0488445688", "+61488224568"]);
    }

    #[test]
    fn form_becomes_unsaved_contact() {
        let contact: Contact = ContactForm {
            full_name: "Test".into(),
            email: String::new(),
            phone_numbers: vec!["043".into()],
        }
        .into();
        assert!(contact.is_new());
        assert_eq!(contact.phone_numbers.len(), 1);
        assert!(contact.phone_numbers[0].is_new());
    }
}
