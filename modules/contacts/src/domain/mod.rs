pub mod fault;
pub mod fixtures;
pub mod repo;
pub mod service;
pub mod validate;
