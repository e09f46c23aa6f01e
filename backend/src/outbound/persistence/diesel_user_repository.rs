//! Diesel-backed [`UserRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserStoreError};
use crate::domain::user::{NewUser, User, UserId};
use crate::outbound::persistence::models::{NewUserRow, UserRow};
use crate::outbound::persistence::pool::{DbPool, checkout, map_query_error};
use crate::outbound::persistence::schema::users;

pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(error: diesel::result::Error) -> UserStoreError {
    match error {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserStoreError::DuplicateEmail
        }
        other => map_query_error(other).into(),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserStoreError> {
        let mut conn = checkout(&self.pool).await?;
        let row = diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: Uuid::new_v4(),
                email: &user.email,
                password_hash: &user.password_hash,
            })
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .map_err(map_insert_error)?;
        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let mut conn = checkout(&self.pool).await?;
        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|error| UserStoreError::from(map_query_error(error)))?;
        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError> {
        let mut conn = checkout(&self.pool).await?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|error| UserStoreError::from(map_query_error(error)))?;
        Ok(row.map(User::from))
    }
}
