//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, LoginCredentials, User};

use super::diesel_error_mapping;
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

diesel::define_sql_function!(fn lower(value: Text) -> Text);

/// Reads provisioned auditors from the `users` table.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn first_matching(
        &self,
        email: &EmailAddress,
        password: Option<&str>,
        operation: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = users::table
            .filter(lower(users::user_mail).eq(email.as_str().to_lowercase()))
            .select(UserRow::as_select())
            .into_boxed();
        if let Some(password) = password {
            query = query.filter(users::password.eq(password.to_owned()));
        }

        let row = query
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, operation))?;
        Ok(row.map(User::from))
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    diesel_error_mapping::map_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> UserPersistenceError {
    diesel_error_mapping::map_diesel_error(
        error,
        operation,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.first_matching(email, None, "find user by email").await
    }

    async fn find_by_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.first_matching(
            credentials.email(),
            Some(credentials.password()),
            "find user by credentials",
        )
        .await
    }
}
