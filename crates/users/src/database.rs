use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::UserError;
use crate::models::{Address, NewAddress, NewUser, User};

/// Rows per INSERT statement; keeps bind parameters well under the Postgres limit.
const ROWS_PER_STATEMENT: usize = 1000;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn count_users(&self) -> Result<u64, UserError>;

    /// Inserts users without addresses, returning the stored rows.
    async fn insert_users(&self, users: &[NewUser]) -> Result<Vec<User>, UserError>;

    /// Inserts a user and its primary address as one unit.
    async fn create_with_address(
        &self,
        user: NewUser,
        address: NewAddress,
    ) -> Result<User, UserError>;
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn count_addresses(&self) -> Result<u64, UserError>;

    /// Inserts `(user_id, address)` pairs, returning the stored rows.
    async fn insert_addresses(
        &self,
        addresses: &[(Uuid, NewAddress)],
    ) -> Result<Vec<Address>, UserError>;
}

/// Applies the bundled schema migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), UserError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("User migrations applied");
    Ok(())
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn push_user_values<'a>(builder: &mut QueryBuilder<'a, Postgres>, users: &'a [NewUser]) {
    builder.push(
        "INSERT INTO users (id, email, smartphone, username, password_hash, role_key, locale, birthday) ",
    );
    builder.push_values(users, |mut row, user| {
        row.push_bind(user.id)
            .push_bind(&user.email)
            .push_bind(&user.smartphone)
            .push_bind(&user.username)
            .push_bind(&user.password_hash)
            .push_bind(&user.role_key)
            .push_bind(&user.locale)
            .push_bind(user.birthday);
    });
    builder.push(
        " RETURNING id, email, smartphone, username, password_hash, role_key, locale, birthday, created_at",
    );
}

fn push_address_values<'a>(
    builder: &mut QueryBuilder<'a, Postgres>,
    addresses: &'a [(Uuid, NewAddress)],
) {
    builder.push(
        "INSERT INTO addresses (id, user_id, salutation, firstname, lastname, city, address1, postcode, locale, country_key) ",
    );
    builder.push_values(addresses, |mut row, (user_id, address)| {
        row.push_bind(Uuid::new_v4())
            .push_bind(*user_id)
            .push_bind(&address.salutation)
            .push_bind(&address.firstname)
            .push_bind(&address.lastname)
            .push_bind(&address.city)
            .push_bind(&address.address1)
            .push_bind(&address.postcode)
            .push_bind(&address.locale)
            .push_bind(&address.country_key);
    });
    builder.push(
        " RETURNING id, user_id, salutation, firstname, lastname, city, address1, postcode, locale, country_key",
    );
}

#[async_trait]
impl UserRepository for PgStore {
    async fn count_users(&self) -> Result<u64, UserError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn insert_users(&self, users: &[NewUser]) -> Result<Vec<User>, UserError> {
        let mut inserted = Vec::with_capacity(users.len());

        for chunk in users.chunks(ROWS_PER_STATEMENT) {
            let mut builder = QueryBuilder::new("");
            push_user_values(&mut builder, chunk);
            tracing::debug!("Inserting {} users", chunk.len());
            let rows: Vec<User> = builder.build_query_as().fetch_all(&self.pool).await?;
            inserted.extend(rows);
        }

        Ok(inserted)
    }

    async fn create_with_address(
        &self,
        user: NewUser,
        address: NewAddress,
    ) -> Result<User, UserError> {
        let mut tx = self.pool.begin().await?;

        let mut stored: User = sqlx::query_as(
            r#"
            INSERT INTO users (id, email, smartphone, username, password_hash, role_key, locale, birthday)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, email, smartphone, username, password_hash, role_key, locale, birthday, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.smartphone)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.role_key)
        .bind(&user.locale)
        .bind(user.birthday)
        .fetch_one(&mut *tx)
        .await?;

        let address: Address = sqlx::query_as(
            r#"
            INSERT INTO addresses (id, user_id, salutation, firstname, lastname, city, address1, postcode, locale, country_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, salutation, firstname, lastname, city, address1, postcode, locale, country_key
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(stored.id)
        .bind(&address.salutation)
        .bind(&address.firstname)
        .bind(&address.lastname)
        .bind(&address.city)
        .bind(&address.address1)
        .bind(&address.postcode)
        .bind(&address.locale)
        .bind(&address.country_key)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        stored.address = Some(address);
        Ok(stored)
    }
}

#[async_trait]
impl AddressRepository for PgStore {
    async fn count_addresses(&self) -> Result<u64, UserError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM addresses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn insert_addresses(
        &self,
        addresses: &[(Uuid, NewAddress)],
    ) -> Result<Vec<Address>, UserError> {
        let mut inserted = Vec::with_capacity(addresses.len());

        for chunk in addresses.chunks(ROWS_PER_STATEMENT) {
            let mut builder = QueryBuilder::new("");
            push_address_values(&mut builder, chunk);
            tracing::debug!("Inserting {} addresses", chunk.len());
            let rows: Vec<Address> = builder.build_query_as().fetch_all(&self.pool).await?;
            inserted.extend(rows);
        }

        Ok(inserted)
    }
}
