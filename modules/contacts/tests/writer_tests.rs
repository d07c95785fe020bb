//! Writer, reader and schema lifecycle against an in-memory SQLite database.

use contacts::config::ContactsConfig;
use contacts::contract::error::{ContactError, ErrorKind};
use contacts::contract::model::Contact;
use contacts::{ContactService, ContactsModule};
use db::{ConnectOpts, DbHandle};
use sea_orm::{ConnectionTrait, Statement};
use std::sync::Arc;

async fn setup() -> (DbHandle, Arc<ContactService>) {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .expect("connect to in-memory sqlite");
    let module = ContactsModule::init(db.sea(), &ContactsConfig::default()).unwrap();
    (db, module.service())
}

/// Empty tables, no fixtures.
async fn setup_empty() -> (DbHandle, Arc<ContactService>) {
    let (db, svc) = setup().await;
    svc.initialize_schema().await;
    let conn = db.sea();
    for table in ["phone_number", "contact"] {
        conn.execute_unprepared(&format!("DELETE FROM {table}"))
            .await
            .unwrap();
    }
    (db, svc)
}

async fn count(db: &DbHandle, table: &str) -> i64 {
    let conn = db.sea();
    let row = conn
        .query_one(Statement::from_string(
            conn.get_database_backend(),
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .expect("one row");
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn initialize_schema_seeds_normalized_fixtures() {
    let (_db, svc) = setup().await;
    svc.initialize_schema().await;

    let all = svc.get_all_contacts().await;
    assert_eq!(all.len(), 3);

    let alex = &all[0];
    assert_eq!(alex.full_name, "Alex Bell");
    assert_eq!(alex.email, "");
    assert_eq!(alex.phone_numbers.len(), 2);
    assert_eq!(alex.phone_numbers[0].number, "+61385786688");

    let radia = &all[2];
    assert_eq!(radia.email, "rperl001@mit.edu");
    let numbers: Vec<&str> = radia
        .phone_numbers
        .iter()
        .map(|p| p.number.as_str())
        .collect();
    assert_eq!(numbers, ["+61393337119", "+61488445688", "+61488224568"]);
    for phone in &radia.phone_numbers {
        assert_eq!(phone.contact_id, radia.id);
        assert_ne!(phone.id, 0);
    }
}

#[tokio::test]
async fn inserted_contact_round_trips() {
    let (_db, svc) = setup_empty().await;
    let mut record = Contact::new("Grace Hopper", "grace@navy.mil")
        .with_phone_number("03 8578 6688")
        .with_phone_number("+61488224568");

    svc.insert_new_contact(&mut record).await.unwrap();
    assert_ne!(record.id, 0);

    let all = svc.get_all_contacts().await;
    assert_eq!(all, vec![record]);
}

#[tokio::test]
async fn short_local_number_scenario() {
    let (_db, svc) = setup_empty().await;

    let mut ok = Contact::new("Test", "test@test.com").with_phone_number("043");
    svc.insert_new_contact(&mut ok).await.unwrap();
    assert!(ok.phone_numbers[0].number.starts_with("+61"));

    let mut bad = Contact::new("Test", "BAD_EMAIL_TO_FAIL_VALIDATION").with_phone_number("043");
    let err = svc.insert_new_contact(&mut bad).await.unwrap_err();
    assert!(matches!(err, ContactError::InvalidEmail { .. }));

    let all = svc.get_all_contacts().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].email, "test@test.com");
}

#[tokio::test]
async fn invalid_third_phone_number_writes_nothing() {
    let (db, svc) = setup_empty().await;
    let mut record = Contact::new("Alex Bell", "")
        .with_phone_number("03 8578 6688")
        .with_phone_number("1800728069")
        .with_phone_number("+999 1234");

    let err = svc.insert_new_contact(&mut record).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UserInput);
    assert!(svc.get_all_contacts().await.is_empty());
    assert_eq!(count(&db, "phone_number").await, 0);
}

#[tokio::test]
async fn long_full_name_is_rejected() {
    let (db, svc) = setup_empty().await;
    let mut record = Contact::new("n".repeat(255), "");

    let err = svc.insert_new_contact(&mut record).await.unwrap_err();

    assert!(matches!(err, ContactError::InvalidFullName { .. }));
    assert_eq!(count(&db, "contact").await, 0);
}

#[tokio::test]
async fn storage_failure_mid_transaction_rolls_back() {
    let (db, svc) = setup_empty().await;
    db.sea()
        .execute_unprepared("DROP TABLE phone_number")
        .await
        .unwrap();

    let mut record = Contact::new("Radia Perlman", "").with_phone_number("0488445688");
    let before = record.clone();
    let err = svc.insert_new_contact(&mut record).await.unwrap_err();

    assert!(matches!(err, ContactError::Storage(_)));
    assert_eq!(record, before, "numbers are only canonicalized after commit");
    assert_eq!(count(&db, "contact").await, 0, "parent row must be rolled back");
}

#[tokio::test]
async fn destroy_schema_is_idempotent() {
    let (db, svc) = setup().await;
    svc.initialize_schema().await;

    svc.destroy_schema().await;
    svc.destroy_schema().await;

    // Tables are gone, so they can be created again.
    svc.initialize_schema().await;
    assert_eq!(count(&db, "contact").await, 3);
}

#[tokio::test]
async fn destroy_schema_on_fresh_database() {
    let (_db, svc) = setup().await;
    svc.destroy_schema().await;
}

#[tokio::test]
#[should_panic(expected = "creating contact tables")]
async fn initialize_schema_twice_fails_loudly() {
    let (_db, svc) = setup().await;
    svc.initialize_schema().await;
    svc.initialize_schema().await;
}

#[tokio::test]
async fn concurrent_inserts_are_independent() {
    let (_db, svc) = setup_empty().await;

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let svc = svc.clone();
            tokio::spawn(async move {
                let mut record =
                    Contact::new(format!("Person {i}"), "").with_phone_number("0488445688");
                svc.insert_new_contact(&mut record).await?;
                Ok::<_, ContactError>(record)
            })
        })
        .collect();

    for handle in handles {
        let record = handle.await.unwrap().unwrap();
        assert_ne!(record.id, 0);
    }

    let all = svc.get_all_contacts().await;
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|c| c.phone_numbers.len() == 1));
}
