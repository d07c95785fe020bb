/// Identifier value of a record the database has not seen yet.
pub const UNASSIGNED_ID: i32 = 0;

/// A contact together with the phone numbers it owns.
///
/// Plain model (no serde); the REST layer has its own DTOs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    pub id: i32,
    pub full_name: String,
    /// Empty means "no email"; anything else must be a valid address.
    pub email: String,
    pub phone_numbers: Vec<PhoneNumber>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhoneNumber {
    pub id: i32,
    /// Set by the writer once the owning contact has an id.
    pub contact_id: i32,
    pub number: String,
}

impl Contact {
    /// Unsaved contact without phone numbers.
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            full_name: full_name.into(),
            email: email.into(),
            phone_numbers: Vec::new(),
        }
    }

    /// Append an unsaved phone number.
    pub fn with_phone_number(mut self, number: impl Into<String>) -> Self {
        self.phone_numbers.push(PhoneNumber::new(number));
        self
    }

    pub fn is_new(&self) -> bool {
        self.id == UNASSIGNED_ID
    }
}

impl PhoneNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            contact_id: UNASSIGNED_ID,
            number: number.into(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == UNASSIGNED_ID
    }
}
