use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::roles::GUEST;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub smartphone: Option<String>,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_key: String,
    pub locale: String,
    pub birthday: Option<Date>,
    pub created_at: OffsetDateTime,
    /// Primary address, populated when the user is created together with one.
    #[sqlx(skip)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub salutation: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub city: Option<String>,
    pub address1: Option<String>,
    pub postcode: Option<String>,
    pub locale: Option<String>,
    pub country_key: Option<String>,
}

/// User attributes ready for insertion.
///
/// Deserializes from a flat attribute map; `password` carries the already
/// hashed password and unknown keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub smartphone: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default = "default_role_key")]
    pub role_key: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub birthday: Option<Date>,
    #[serde(default)]
    pub address: Option<NewAddress>,
}

fn default_role_key() -> String {
    GUEST.to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

impl NewUser {
    /// Builds the in-memory user without touching storage.
    pub fn into_user(self, created_at: OffsetDateTime) -> User {
        let address = self.address.map(|address| address.into_address(self.id));

        User {
            id: self.id,
            email: self.email,
            smartphone: self.smartphone,
            username: self.username,
            password_hash: self.password_hash,
            role_key: self.role_key,
            locale: self.locale,
            birthday: self.birthday,
            created_at,
            address,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewAddress {
    pub salutation: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub city: Option<String>,
    pub address1: Option<String>,
    pub postcode: Option<String>,
    pub locale: Option<String>,
    pub country_key: Option<String>,
}

impl NewAddress {
    pub fn into_address(self, user_id: Uuid) -> Address {
        Address {
            id: Uuid::new_v4(),
            user_id,
            salutation: self.salutation,
            firstname: self.firstname,
            lastname: self.lastname,
            city: self.city,
            address1: self.address1,
            postcode: self.postcode,
            locale: self.locale,
            country_key: self.country_key,
        }
    }
}
