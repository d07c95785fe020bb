pub mod error;
pub mod model;

pub use error::{ContactError, ErrorKind};
pub use model::{Contact, PhoneNumber, UNASSIGNED_ID};
