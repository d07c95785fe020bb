pub mod contact;
pub mod phone_number;
