use std::sync::Arc;

use phonenumber::country;
use sea_orm::DbErr;
use tracing::{debug, info, instrument, warn};

use crate::contract::error::ContactError;
use crate::contract::model::{Contact, UNASSIGNED_ID};
use crate::domain::fault;
use crate::domain::fixtures;
use crate::domain::repo::{ContactsRepository, ContactsTransaction};
use crate::domain::validate;

/// Domain service: validation, the transactional writer, the reader and the
/// schema lifecycle. Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct ContactService {
    repo: Arc<dyn ContactsRepository>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Region assumed for phone numbers written without a country code.
    pub default_region: country::Id,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_region: country::Id::AU,
        }
    }
}

/// Ids produced by one aggregate write, applied to the record after commit.
struct GeneratedIds {
    contact: i32,
    phone_numbers: Vec<i32>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactsRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    /// Validate `record`, then insert it and its phone numbers in one transaction.
    ///
    /// On success the record carries the generated ids and the E.164 form of
    /// every phone number. On any error the record is left as the caller passed it.
    #[instrument(
        name = "contacts.service.insert_new_contact",
        skip(self, record),
        fields(full_name = %record.full_name, phone_numbers = record.phone_numbers.len())
    )]
    pub async fn insert_new_contact(&self, record: &mut Contact) -> Result<(), ContactError> {
        let normalized = self.validate(record)?;

        let mut txn = self.repo.begin().await?;
        let ids = match write_aggregate(txn.as_mut(), record, &normalized).await {
            Ok(ids) => ids,
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "rollback after failed insert also failed");
                }
                return Err(err.into());
            }
        };
        txn.commit().await?;

        record.id = ids.contact;
        for ((phone, id), number) in record
            .phone_numbers
            .iter_mut()
            .zip(ids.phone_numbers)
            .zip(normalized)
        {
            phone.id = id;
            phone.contact_id = ids.contact;
            phone.number = number;
        }

        info!(contact_id = record.id, "contact inserted");
        Ok(())
    }

    /// Every contact with its phone numbers, in storage order.
    ///
    /// One query for the contacts plus one per contact for its phone numbers.
    /// A storage failure is fatal.
    #[instrument(name = "contacts.service.get_all_contacts", skip(self))]
    pub async fn get_all_contacts(&self) -> Vec<Contact> {
        let mut contacts = match self.repo.list_contacts().await {
            Ok(contacts) => contacts,
            Err(e) => fault::fatal("listing contacts", e),
        };
        for contact in &mut contacts {
            contact.phone_numbers = match self.repo.list_phone_numbers(contact.id).await {
                Ok(numbers) => numbers,
                Err(e) => fault::fatal(
                    &format!("listing phone numbers of contact {}", contact.id),
                    e,
                ),
            };
        }
        debug!("listed {} contacts", contacts.len());
        contacts
    }

    /// Create both tables and seed the fixture contacts through the writer.
    ///
    /// Fails loudly (fatal) if the tables already exist.
    #[instrument(name = "contacts.service.initialize_schema", skip(self))]
    pub async fn initialize_schema(&self) {
        if let Err(e) = self.repo.create_schema().await {
            fault::fatal("creating contact tables", e);
        }
        for (index, mut contact) in fixtures::contacts().into_iter().enumerate() {
            if let Err(e) = self.insert_new_contact(&mut contact).await {
                fault::fatal(&format!("inserting fixture contact #{index}"), e);
            }
        }
        info!("contact schema initialized");
    }

    /// Drop both tables. Missing tables are not an error; anything else is fatal.
    #[instrument(name = "contacts.service.destroy_schema", skip(self))]
    pub async fn destroy_schema(&self) {
        if let Err(e) = self.repo.drop_schema().await {
            fault::fatal("dropping contact tables", e);
        }
        info!("contact schema destroyed");
    }

    /// In-memory checks in a fixed order; the first failure wins.
    /// Returns the normalized phone numbers in record order.
    fn validate(&self, record: &Contact) -> Result<Vec<String>, ContactError> {
        if !record.is_new() {
            return Err(ContactError::contact_exists(record.id));
        }
        if !validate::is_valid_full_name(&record.full_name) {
            return Err(ContactError::InvalidFullName {
                len: record.full_name.len(),
            });
        }
        // Blank email is allowed and stored as-is.
        if !record.email.is_empty() && !validate::is_valid_email(&record.email) {
            return Err(ContactError::InvalidEmail {
                email: record.email.clone(),
            });
        }

        record
            .phone_numbers
            .iter()
            .map(|phone| {
                if !phone.is_new() {
                    return Err(ContactError::phone_number_exists(phone.id));
                }
                validate::normalize_phone_number(&phone.number, self.config.default_region)
                    .filter(|n| validate::is_valid_phone_number(n))
                    .ok_or_else(|| ContactError::InvalidPhoneNumber {
                        number: phone.number.clone(),
                    })
            })
            .collect()
    }
}

/// Parent first, then children referencing the parent id.
/// `numbers` holds the normalized phone numbers in record order.
async fn write_aggregate(
    txn: &mut dyn ContactsTransaction,
    record: &Contact,
    numbers: &[String],
) -> Result<GeneratedIds, DbErr> {
    let contact_id = txn.insert_contact(&record.full_name, &record.email).await?;
    if contact_id == UNASSIGNED_ID {
        fault::invariant_violated("contact insert succeeded but returned id 0");
    }

    let mut phone_numbers = Vec::with_capacity(numbers.len());
    for number in numbers {
        let id = txn.insert_phone_number(contact_id, number).await?;
        if id == UNASSIGNED_ID {
            fault::invariant_violated("phone number insert succeeded but returned id 0");
        }
        phone_numbers.push(id);
    }

    Ok(GeneratedIds {
        contact: contact_id,
        phone_numbers,
    })
}
