use async_trait::async_trait;
use sea_orm::DbErr;

use crate::contract::model::{Contact, PhoneNumber};

/// Persistence port for the contact aggregate.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait ContactsRepository: Send + Sync {
    /// Open a write transaction scoped to one aggregate.
    async fn begin(&self) -> Result<Box<dyn ContactsTransaction>, DbErr>;

    /// All contacts in storage order, without phone numbers.
    async fn list_contacts(&self) -> Result<Vec<Contact>, DbErr>;

    /// Phone numbers owned by `contact_id`, in storage order.
    async fn list_phone_numbers(&self, contact_id: i32) -> Result<Vec<PhoneNumber>, DbErr>;

    /// Create both tables. Fails if either already exists.
    async fn create_schema(&self) -> Result<(), DbErr>;

    /// Drop `phone_number` then `contact`; missing tables are skipped.
    async fn drop_schema(&self) -> Result<(), DbErr>;
}

/// An open write transaction. Dropping it without `commit` discards its writes.
#[async_trait]
pub trait ContactsTransaction: Send {
    /// Insert the contact row and return the generated id.
    async fn insert_contact(&mut self, full_name: &str, email: &str) -> Result<i32, DbErr>;

    /// Insert a phone number row for `contact_id` and return the generated id.
    async fn insert_phone_number(&mut self, contact_id: i32, number: &str) -> Result<i32, DbErr>;

    async fn commit(self: Box<Self>) -> Result<(), DbErr>;

    async fn rollback(self: Box<Self>) -> Result<(), DbErr>;
}
