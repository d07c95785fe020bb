use sea_orm::DbErr;
use thiserror::Error;

/// Errors returned by `ContactService::insert_new_contact`.
///
/// Faults that indicate a broken storage contract are not represented here;
/// see `domain::fault`.
#[derive(Error, Debug)]
pub enum ContactError {
    /// The record (or one of its phone numbers) already carries an id.
    /// This is a caller bug, not bad user input.
    #[error("cannot insert {entity} record that already exists")]
    DuplicateRecord { entity: &'static str, id: i32 },

    #[error("Invalid Full Name provided. Name provided is too long.")]
    InvalidFullName { len: usize },

    #[error("Invalid Email provided")]
    InvalidEmail { email: String },

    #[error("Invalid Phone Number provided")]
    InvalidPhoneNumber { number: String },

    /// Passed through from the storage layer untouched.
    #[error(transparent)]
    Storage(#[from] DbErr),
}

/// Coarse classification used by callers to pick a client-facing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad data from the end user; re-prompting can fix it.
    UserInput,
    /// The caller broke the insert contract.
    Misuse,
    Storage,
}

impl ContactError {
    pub fn contact_exists(id: i32) -> Self {
        Self::DuplicateRecord {
            entity: "Contact",
            id,
        }
    }

    pub fn phone_number_exists(id: i32) -> Self {
        Self::DuplicateRecord {
            entity: "PhoneNumber",
            id,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFullName { .. }
            | Self::InvalidEmail { .. }
            | Self::InvalidPhoneNumber { .. } => ErrorKind::UserInput,
            Self::DuplicateRecord { .. } => ErrorKind::Misuse,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn is_user_error(&self) -> bool {
        self.kind() == ErrorKind::UserInput
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(
            ContactError::InvalidFullName { len: 300 }.kind(),
            ErrorKind::UserInput
        );
        assert!(ContactError::InvalidEmail {
            email: "yo!".into()
        }
        .is_user_error());
        assert!(ContactError::InvalidPhoneNumber {
            number: "abc".into()
        }
        .is_user_error());
        assert_eq!(ContactError::contact_exists(3).kind(), ErrorKind::Misuse);
        assert_eq!(
            ContactError::phone_number_exists(4).kind(),
            ErrorKind::Misuse
        );
        assert_eq!(
            ContactError::Storage(DbErr::Custom("boom".into())).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn user_messages_are_stable() {
        assert_eq!(
            ContactError::InvalidFullName { len: 255 }.to_string(),
            "Invalid Full Name provided. Name provided is too long."
        );
        assert_eq!(
            ContactError::InvalidEmail {
                email: "x".into()
            }
            .to_string(),
            "Invalid Email provided"
        );
        assert_eq!(
            ContactError::InvalidPhoneNumber {
                number: "x".into()
            }
            .to_string(),
            "Invalid Phone Number provided"
        );
        assert_eq!(
            ContactError::contact_exists(9).to_string(),
            "cannot insert Contact record that already exists"
        );
    }

    #[test]
    fn storage_error_is_transparent() {
        let err = ContactError::from(DbErr::Custom("disk full".into()));
        assert_eq!(
            err.to_string(),
            DbErr::Custom("disk full".into()).to_string()
        );
    }
}
