//! SeaORM-backed implementation of the contacts repository port.
//!
//! Generic over `C: ConnectionTrait + TransactionTrait`, so it works with a
//! `DatabaseConnection` for both SQLite and PostgreSQL.

use async_trait::async_trait;
use sea_orm::sea_query::Table;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Schema, Set, TransactionTrait,
};
use tracing::debug;

use crate::contract::model::{Contact, PhoneNumber};
use crate::domain::repo::{ContactsRepository, ContactsTransaction};
use crate::infra::storage::entity::{contact, phone_number};

pub struct SeaOrmContactsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmContactsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> ContactsRepository for SeaOrmContactsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn begin(&self) -> Result<Box<dyn ContactsTransaction>, DbErr> {
        let txn = self.conn.begin().await?;
        Ok(Box::new(SeaOrmContactsTransaction { txn }))
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, DbErr> {
        let rows = contact::Entity::find()
            .order_by_asc(contact::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_phone_numbers(&self, contact_id: i32) -> Result<Vec<PhoneNumber>, DbErr> {
        let rows = phone_number::Entity::find()
            .filter(phone_number::Column::ContactId.eq(contact_id))
            .order_by_asc(phone_number::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_schema(&self) -> Result<(), DbErr> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        // Parent first: phone_number carries the foreign key.
        let create_contact = schema.create_table_from_entity(contact::Entity);
        self.conn.execute(backend.build(&create_contact)).await?;
        let create_phone = schema.create_table_from_entity(phone_number::Entity);
        self.conn.execute(backend.build(&create_phone)).await?;

        debug!(?backend, "created contact and phone_number tables");
        Ok(())
    }

    async fn drop_schema(&self) -> Result<(), DbErr> {
        let backend = self.conn.get_database_backend();

        // Child first so the foreign key never dangles.
        let drop_phone = Table::drop()
            .table(phone_number::Entity)
            .if_exists()
            .to_owned();
        self.conn.execute(backend.build(&drop_phone)).await?;
        let drop_contact = Table::drop().table(contact::Entity).if_exists().to_owned();
        self.conn.execute(backend.build(&drop_contact)).await?;

        debug!(?backend, "dropped contact and phone_number tables");
        Ok(())
    }
}

/// Owns the database transaction; dropping it uncommitted rolls back.
struct SeaOrmContactsTransaction {
    txn: DatabaseTransaction,
}

#[async_trait]
impl ContactsTransaction for SeaOrmContactsTransaction {
    async fn insert_contact(&mut self, full_name: &str, email: &str) -> Result<i32, DbErr> {
        let am = contact::ActiveModel {
            id: NotSet,
            full_name: Set(full_name.to_owned()),
            email: Set(email.to_owned()),
        };
        let res = contact::Entity::insert(am).exec(&self.txn).await?;
        Ok(res.last_insert_id)
    }

    async fn insert_phone_number(&mut self, contact_id: i32, number: &str) -> Result<i32, DbErr> {
        let am = phone_number::ActiveModel {
            id: NotSet,
            contact_id: Set(contact_id),
            number: Set(number.to_owned()),
        };
        let res = phone_number::Entity::insert(am).exec(&self.txn).await?;
        Ok(res.last_insert_id)
    }

    async fn commit(self: Box<Self>) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}
