use crate::contract::model::Contact;

/// Contacts seeded by `ContactService::initialize_schema`.
pub fn contacts() -> Vec<Contact> {
    vec![
        Contact::new("Alex Bell", "")
            .with_phone_number("03 8578 6688")
            .with_phone_number("1800728069"),
        Contact::new("Fredrik Idestam", "").with_phone_number("+6139888998"),
        Contact::new("Radia Perlman", "rperl001@mit.edu")
            .with_phone_number("(03) 9333 7119")
            .with_phone_number("0488445688")
            .with_phone_number("+61488224568"),
    ]
}
