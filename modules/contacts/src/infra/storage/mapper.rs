use crate::contract::model::{Contact, PhoneNumber};
use crate::infra::storage::entity::{contact, phone_number};

/// Phone numbers are loaded separately; the contact comes back without them.
impl From<contact::Model> for Contact {
    fn from(m: contact::Model) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            email: m.email,
            phone_numbers: Vec::new(),
        }
    }
}

impl From<phone_number::Model> for PhoneNumber {
    fn from(m: phone_number::Model) -> Self {
        Self {
            id: m.id,
            contact_id: m.contact_id,
            number: m.number,
        }
    }
}
