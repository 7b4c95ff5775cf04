//! Integration tests for the vault over a real SQLite database

use chrono::NaiveDate;
use passvault_core::application::{Vault, VaultStores};
use passvault_core::config::Config;
use passvault_core::domain::records::{CardType, NewCard, NewCredential, NewNote};
use passvault_core::domain::security::Identity;
use passvault_core::storage::{Database, DatabaseConfig};
use passvault_core::Error;

const SECRET: &str = "integration-secret";
const PASSWORD: &str = "S3nhaF@rt&";

fn vault_on(db: &Database) -> Vault {
    Vault::build(SECRET, &Config::default(), VaultStores::sqlite(db)).expect("Failed to build vault")
}

async fn account(vault: &Vault, email: &str) -> Identity {
    vault.identity.sign_up(email, PASSWORD).await.expect("sign-up");
    let token = vault
        .identity
        .sign_in(email, PASSWORD)
        .await
        .expect("sign-in")
        .access_token;
    vault
        .guard
        .authorize(Some(&format!("Bearer {}", token)))
        .expect("guard")
}

fn credential(title: &str) -> NewCredential {
    NewCredential {
        title: title.to_string(),
        url: "https://bank.example.com".to_string(),
        username: "owner".to_string(),
        password: PASSWORD.to_string(),
    }
}

fn card(title: &str) -> NewCard {
    NewCard {
        title: title.to_string(),
        number: "5555-4444-3333-2222".to_string(),
        name: "OWNER".to_string(),
        expiration_date: NaiveDate::from_ymd_opt(2029, 8, 31).unwrap(),
        password: "8642".to_string(),
        secure_code: "135".to_string(),
        is_virtual: false,
        card_type: CardType::Credit,
    }
}

fn note(title: &str) -> NewNote {
    NewNote {
        title: title.to_string(),
        description: "remember the milk".to_string(),
    }
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let db = Database::in_memory().await.unwrap();
    let vault = vault_on(&db);

    vault.identity.sign_up("a@x.com", PASSWORD).await.unwrap();
    assert!(matches!(
        vault.identity.sign_up("a@x.com", PASSWORD).await,
        Err(Error::Conflict(_))
    ));

    let token = vault
        .identity
        .sign_in("a@x.com", PASSWORD)
        .await
        .unwrap()
        .access_token;
    assert!(!token.is_empty());
    let me = vault.identity.validate_token(&token).unwrap();

    vault.credentials.create(credential("bank"), &me).await.unwrap();
    assert!(matches!(
        vault.credentials.create(credential("bank"), &me).await,
        Err(Error::Conflict(_))
    ));

    let all = vault.credentials.find_all(me.id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].password, PASSWORD);
}

#[tokio::test]
async fn test_secrets_never_stored_in_plaintext() {
    let db = Database::in_memory().await.unwrap();
    let vault = vault_on(&db);
    let me = account(&vault, "a@x.com").await;

    vault.credentials.create(credential("bank"), &me).await.unwrap();
    vault.cards.create(card("travel"), &me).await.unwrap();

    let (credential_pw,): (String,) = sqlx::query_as("SELECT password FROM credentials")
        .fetch_one(db.pool())
        .await
        .unwrap();
    let (card_pw,): (String,) = sqlx::query_as("SELECT password FROM cards")
        .fetch_one(db.pool())
        .await
        .unwrap();
    let (account_pw,): (String,) = sqlx::query_as("SELECT password FROM users")
        .fetch_one(db.pool())
        .await
        .unwrap();

    assert_ne!(credential_pw, PASSWORD);
    assert_ne!(card_pw, "8642");
    assert_ne!(account_pw, PASSWORD);
}

#[tokio::test]
async fn test_cross_owner_isolation() {
    let db = Database::in_memory().await.unwrap();
    let vault = vault_on(&db);
    let a = account(&vault, "a@x.com").await;
    let b = account(&vault, "b@x.com").await;

    let credential = vault.credentials.create(credential("bank"), &a).await.unwrap();
    let card = vault.cards.create(card("travel"), &a).await.unwrap();
    let note = vault.notes.create(note("todo"), &a).await.unwrap();

    assert!(matches!(vault.credentials.find_one(credential.id, b.id).await, Err(Error::Forbidden(_))));
    assert!(matches!(vault.credentials.remove(credential.id, b.id).await, Err(Error::Forbidden(_))));
    assert!(matches!(vault.cards.find_one(card.id, b.id).await, Err(Error::Forbidden(_))));
    assert!(matches!(vault.cards.remove(card.id, b.id).await, Err(Error::Forbidden(_))));
    assert!(matches!(vault.notes.find_one(note.id, b.id).await, Err(Error::Forbidden(_))));
    assert!(matches!(vault.notes.remove(note.id, b.id).await, Err(Error::Forbidden(_))));

    assert!(vault.credentials.find_all(b.id).await.unwrap().is_empty());

    // Nonexistent ids are NotFound for everyone
    for requester in [a.id, b.id] {
        assert!(matches!(vault.credentials.find_one(9999, requester).await, Err(Error::NotFound(_))));
        assert!(matches!(vault.cards.remove(9999, requester).await, Err(Error::NotFound(_))));
        assert!(matches!(vault.notes.find_one(9999, requester).await, Err(Error::NotFound(_))));
    }

    // Owner still sees everything, decrypted
    assert_eq!(vault.cards.find_one(card.id, a.id).await.unwrap().password, "8642");
}

#[tokio::test]
async fn test_titles_unique_per_owner_per_kind() {
    let db = Database::in_memory().await.unwrap();
    let vault = vault_on(&db);
    let a = account(&vault, "a@x.com").await;
    let b = account(&vault, "b@x.com").await;

    vault.notes.create(note("shared"), &a).await.unwrap();
    vault.notes.create(note("shared"), &b).await.unwrap();
    assert!(matches!(vault.notes.create(note("shared"), &a).await, Err(Error::Conflict(_))));

    // Same title under a different kind is fine
    vault.cards.create(card("shared"), &a).await.unwrap();
    vault.credentials.create(credential("shared"), &a).await.unwrap();
}

#[tokio::test]
async fn test_remove_output_shapes() {
    let db = Database::in_memory().await.unwrap();
    let vault = vault_on(&db);
    let a = account(&vault, "a@x.com").await;

    let created = vault.cards.create(card("travel"), &a).await.unwrap();
    let created_json = serde_json::to_value(&created).unwrap();
    assert_eq!(created_json["secureCode"], "135");
    assert!(created_json.get("password").is_none());

    let removed = vault.cards.remove(created.id, a.id).await.unwrap();
    let removed_json = serde_json::to_value(&removed).unwrap();
    assert!(removed_json.get("secureCode").is_none());
    assert!(removed_json.get("password").is_none());
    assert!(removed_json.get("createdAt").is_none());

    let note = vault.notes.create(note("todo"), &a).await.unwrap();
    let removed_note = serde_json::to_value(vault.notes.remove(note.id, a.id).await.unwrap()).unwrap();
    assert!(removed_note.get("description").is_none());
}

#[tokio::test]
async fn test_erase_cascades_only_own_records() {
    let db = Database::in_memory().await.unwrap();
    let vault = vault_on(&db);
    let a = account(&vault, "a@x.com").await;
    let b = account(&vault, "b@x.com").await;

    for owner in [&a, &b] {
        vault.credentials.create(credential("bank"), owner).await.unwrap();
        vault.credentials.create(credential("mail"), owner).await.unwrap();
        vault.cards.create(card("travel"), owner).await.unwrap();
        vault.notes.create(note("todo"), owner).await.unwrap();
    }

    assert!(matches!(vault.identity.erase(&a, "wrong").await, Err(Error::Unauthorized)));
    assert_eq!(vault.credentials.count_for_owner(a.id).await.unwrap(), 2);

    let erased = vault.identity.erase(&a, PASSWORD).await.unwrap();
    assert_eq!(erased.id, a.id);

    assert_eq!(vault.credentials.count_for_owner(a.id).await.unwrap(), 0);
    assert_eq!(vault.cards.count_for_owner(a.id).await.unwrap(), 0);
    assert_eq!(vault.notes.count_for_owner(a.id).await.unwrap(), 0);

    assert_eq!(vault.credentials.count_for_owner(b.id).await.unwrap(), 2);
    assert_eq!(vault.cards.count_for_owner(b.id).await.unwrap(), 1);
    assert_eq!(vault.notes.count_for_owner(b.id).await.unwrap(), 1);

    // The erased account can no longer sign in
    assert!(matches!(
        vault.identity.sign_in("a@x.com", PASSWORD).await,
        Err(Error::Unauthorized)
    ));
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.db");

    let record_id = {
        let db = Database::new(DatabaseConfig::with_path(&path)).await.unwrap();
        let vault = vault_on(&db);
        let me = account(&vault, "a@x.com").await;
        let created = vault.credentials.create(credential("bank"), &me).await.unwrap();
        db.close().await;
        created.id
    };

    let db = Database::new(DatabaseConfig::with_path(&path)).await.unwrap();
    let vault = vault_on(&db);
    let token = vault
        .identity
        .sign_in("a@x.com", PASSWORD)
        .await
        .unwrap()
        .access_token;
    let me = vault.identity.validate_token(&token).unwrap();

    let found = vault.credentials.find_one(record_id, me.id).await.unwrap();
    assert_eq!(found.password, PASSWORD);
}

#[tokio::test]
async fn test_other_secret_cannot_read_records() {
    let db = Database::in_memory().await.unwrap();
    let vault = vault_on(&db);
    let me = account(&vault, "a@x.com").await;
    let created = vault.credentials.create(credential("bank"), &me).await.unwrap();

    let other = Vault::build("another-secret", &Config::default(), VaultStores::sqlite(&db)).unwrap();
    let result = other.credentials.find_one(created.id, me.id).await;
    assert!(matches!(result, Err(Error::Cipher(_))));
}
