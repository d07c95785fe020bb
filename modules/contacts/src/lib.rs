// === PUBLIC CONTRACT ===
// Other crates consume the record model and error taxonomy from here.
pub mod contract;

pub use contract::{error, model};

// === MODULE WIRING ===
pub mod config;
pub mod module;
pub use module::ContactsModule;

// === INTERNAL MODULES ===
// Exposed for the server binary and for tests; the stable surface is `contract`
// plus `ContactService`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

pub use domain::service::ContactService;
