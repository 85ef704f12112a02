use std::ops::{Deref, DerefMut};

use error_stack::Report;
use sqlx::{Connection, Error, PgConnection};

use kernel::interface::database::{DatabaseConnection, Session};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::{author::*, authorship::*, book::*};

mod author;
mod authorship;
mod book;

static POSTGRES_URL: &str = "POSTGRES_URL";

pub struct PostgresDatabase {
    url: String,
}

impl PostgresDatabase {
    pub fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        Ok(Self { url })
    }
}

#[async_trait::async_trait]
impl DatabaseConnection<PostgresConnection> for PostgresDatabase {
    async fn connect(&self) -> error_stack::Result<PostgresConnection, KernelError> {
        let con = PgConnection::connect(&self.url).await.convert_error()?;
        tracing::debug!("connected to postgres");
        Ok(PostgresConnection(con))
    }
}

pub struct PostgresConnection(PgConnection);

impl Session for PostgresConnection {}

impl Deref for PostgresConnection {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| match error {
            Error::RowNotFound | Error::ColumnNotFound(_) | Error::ColumnDecode { .. } => {
                Report::from(error).change_context(KernelError::Internal)
            }
            _ => Report::from(error).change_context(KernelError::Storage),
        })
    }
}
