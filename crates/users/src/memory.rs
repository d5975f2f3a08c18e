//! In-memory storage for tests and database-less runs.

use std::collections::HashSet;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::{AddressRepository, UserRepository};
use crate::errors::UserError;
use crate::models::{Address, NewAddress, NewUser, User};

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    addresses: Vec<Address>,
}

/// Stores users and addresses in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn users(&self) -> Vec<User> {
        self.state.lock().await.users.clone()
    }

    pub async fn addresses(&self) -> Vec<Address> {
        self.state.lock().await.addresses.clone()
    }

    pub async fn find_user(&self, id: Uuid) -> Result<User, UserError> {
        self.state
            .lock()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(UserError::NotFound)
    }
}

fn ensure_unique_email(state: &State, email: &str) -> Result<(), UserError> {
    if state.users.iter().any(|u| u.email == email) {
        return Err(email_taken(email));
    }
    Ok(())
}

fn email_taken(email: &str) -> UserError {
    UserError::InvalidInput(format!("Email {email} is already taken"))
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn count_users(&self) -> Result<u64, UserError> {
        Ok(self.state.lock().await.users.len() as u64)
    }

    async fn insert_users(&self, users: &[NewUser]) -> Result<Vec<User>, UserError> {
        let mut state = self.state.lock().await;

        // All or nothing, like a multi-row INSERT hitting the unique index.
        let mut batch = HashSet::with_capacity(users.len());
        for user in users {
            ensure_unique_email(&state, &user.email)?;
            if !batch.insert(user.email.as_str()) {
                return Err(email_taken(&user.email));
            }
        }

        let created_at = OffsetDateTime::now_utc();
        let mut inserted = Vec::with_capacity(users.len());
        for user in users {
            let mut user = user.clone();
            user.address = None;
            let user = user.into_user(created_at);
            state.users.push(user.clone());
            inserted.push(user);
        }

        Ok(inserted)
    }

    async fn create_with_address(
        &self,
        mut user: NewUser,
        address: NewAddress,
    ) -> Result<User, UserError> {
        let mut state = self.state.lock().await;
        ensure_unique_email(&state, &user.email)?;

        user.address = Some(address);
        let user = user.into_user(OffsetDateTime::now_utc());

        if let Some(address) = &user.address {
            state.addresses.push(address.clone());
        }
        let mut stored = user.clone();
        stored.address = None;
        state.users.push(stored);

        Ok(user)
    }
}

#[async_trait]
impl AddressRepository for MemoryStore {
    async fn count_addresses(&self) -> Result<u64, UserError> {
        Ok(self.state.lock().await.addresses.len() as u64)
    }

    async fn insert_addresses(
        &self,
        addresses: &[(Uuid, NewAddress)],
    ) -> Result<Vec<Address>, UserError> {
        let mut state = self.state.lock().await;
        let inserted: Vec<Address> = addresses
            .iter()
            .map(|(user_id, address)| address.clone().into_address(*user_id))
            .collect();

        state.addresses.extend(inserted.iter().cloned());
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
            smartphone: None,
            username: None,
            password_hash: "hash".to_string(),
            role_key: "guest".to_string(),
            locale: "en".to_string(),
            birthday: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_insert_users_and_count() {
        let store = MemoryStore::new();
        let users = vec![new_user("a@example.com"), new_user("b@example.com")];

        let inserted = store.insert_users(&users).await.unwrap();

        assert_eq!(inserted.len(), 2);
        assert_eq!(store.count_users().await.unwrap(), 2);
        assert_eq!(store.count_addresses().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.insert_users(&[new_user("a@example.com")]).await.unwrap();

        let result = store.insert_users(&[new_user("a@example.com")]).await;
        assert!(matches!(result, Err(UserError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_failed_batch_stores_nothing() {
        let store = MemoryStore::new();
        store.insert_users(&[new_user("taken@example.com")]).await.unwrap();

        let result = store
            .insert_users(&[new_user("fresh@example.com"), new_user("taken@example.com")])
            .await;

        assert!(matches!(result, Err(UserError::InvalidInput(_))));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_within_batch_stores_nothing() {
        let store = MemoryStore::new();

        let result = store
            .insert_users(&[
                new_user("a@example.com"),
                new_user("b@example.com"),
                new_user("a@example.com"),
            ])
            .await;

        assert!(matches!(result, Err(UserError::InvalidInput(_))));
        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_with_address() {
        let store = MemoryStore::new();
        let address = NewAddress {
            city: Some("Bern".to_string()),
            ..Default::default()
        };

        let user = store
            .create_with_address(new_user("a@example.com"), address)
            .await
            .unwrap();

        assert_eq!(user.address.as_ref().unwrap().user_id, user.id);
        assert_eq!(store.count_users().await.unwrap(), 1);
        assert_eq!(store.count_addresses().await.unwrap(), 1);
        assert_eq!(store.find_user(user.id).await.unwrap().email, "a@example.com");
    }

    #[tokio::test]
    async fn test_insert_addresses_links_users() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let inserted = store
            .insert_addresses(&[(user_id, NewAddress::default())])
            .await
            .unwrap();

        assert_eq!(inserted[0].user_id, user_id);
        assert_eq!(store.addresses().await.len(), 1);
    }
}
