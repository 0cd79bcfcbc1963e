use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce;
use crate::store::{Filter, Order, Row, RowStore, StoreError};

const USER_ID: &str = "userId";
/// Columns a profile edit may touch. Credentials are managed elsewhere.
const EDITABLE_COLUMNS: [&str; 3] = ["email", "username", "mobile"];

/// The fields of a user row that are safe to hand back to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub mobile: Option<String>,
}

impl PublicUser {
    pub fn from_row(row: &Row) -> Self {
        let text = |column: &str| row.get(column).and_then(Value::as_str).map(str::to_string);
        Self {
            user_id: row.get(USER_ID).and_then(coerce::as_i64),
            email: text("email"),
            username: text("username"),
            mobile: text("mobile"),
        }
    }
}

pub struct ProfileService<S> {
    store: Arc<S>,
    users_table: String,
}

impl<S> ProfileService<S>
where
    S: RowStore + 'static,
{
    pub fn new(store: Arc<S>, users_table: impl Into<String>) -> Self {
        Self {
            store,
            users_table: users_table.into(),
        }
    }

    pub fn get(&self, user_id: i64) -> Result<PublicUser, ProfileError> {
        self.find(user_id).map(|row| PublicUser::from_row(&row))
    }

    /// All users, highest id first.
    pub fn list(&self) -> Result<Vec<PublicUser>, ProfileError> {
        let rows = self
            .store
            .read_rows(&self.users_table, &[], Some(&Order::desc(USER_ID)), None)?;
        Ok(rows.iter().map(PublicUser::from_row).collect())
    }

    /// Applies the non-null contact fields from `payload` to an existing user.
    pub fn update(&self, payload: &Map<String, Value>) -> Result<PublicUser, ProfileError> {
        let user_id = payload
            .get(USER_ID)
            .and_then(coerce::as_i64)
            .ok_or(ProfileError::MissingUserId)?;
        self.find(user_id)?;

        let fields: Row = EDITABLE_COLUMNS
            .iter()
            .filter_map(|column| {
                payload
                    .get(*column)
                    .filter(|value| !value.is_null())
                    .map(|value| (column.to_string(), value.clone()))
            })
            .collect();
        if fields.is_empty() {
            return Err(ProfileError::EmptyUpdate);
        }

        let updated = self
            .store
            .update_row(&self.users_table, &[Filter::eq(USER_ID, user_id)], fields)?
            .ok_or(ProfileError::UserNotFound)?;
        Ok(PublicUser::from_row(&updated))
    }

    fn find(&self, user_id: i64) -> Result<Row, ProfileError> {
        self.store
            .read_rows(
                &self.users_table,
                &[Filter::eq(USER_ID, user_id)],
                None,
                Some(1),
            )?
            .into_iter()
            .next()
            .ok_or(ProfileError::UserNotFound)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Missing userId")]
    MissingUserId,
    #[error("User not found")]
    UserNotFound,
    #[error("No fields to update")]
    EmptyUpdate,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProfileError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProfileError::MissingUserId | ProfileError::EmptyUpdate => StatusCode::BAD_REQUEST,
            ProfileError::UserNotFound => StatusCode::NOT_FOUND,
            ProfileError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
