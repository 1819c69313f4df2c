// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! PostgreSQL backend.

use crate::db::{Db, DbError, DbResult, Executor};
use crate::env::{get_optional_var, get_required_var};
use async_trait::async_trait;
use derivative::Derivative;
use log::warn;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgDatabaseError, PgPool, PgPoolOptions, Postgres};
use std::time::Duration;

/// SQLSTATE raised when the server refuses new connections.
const TOO_MANY_CONNECTIONS: &str = "53300";

/// Number of times to retry acquiring a connection when `<prefix>_MAX_RETRIES` is not set.
const DEFAULT_MAX_RETRIES: u16 = 60;

/// Longest pause between two connection attempts, before jitter.
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Converts a sqlx error raised by PostgreSQL into a `DbError`.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    let too_many_connections = match &e {
        sqlx::Error::Database(db_err) => db_err
            .try_downcast_ref::<PgDatabaseError>()
            .is_some_and(|pg| pg.code() == TOO_MANY_CONNECTIONS),
        _ => false,
    };
    if too_many_connections {
        return DbError::Unavailable;
    }

    match e {
        sqlx::Error::ColumnDecode { index, source } => {
            DbError::DataIntegrityError(format!("Cannot decode column {}: {}", index, source))
        }
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Connection settings for a PostgreSQL server.
#[derive(Derivative)]
#[derivative(Debug, Default)]
pub struct PostgresOptions {
    /// Server hostname.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Name of the database to use.
    pub database: String,

    /// Login name.
    pub username: String,

    /// Login password.  Never printed.
    #[derivative(Debug = "ignore")]
    pub password: String,

    /// Connections to keep open even when idle, if not the sqlx default.
    pub min_connections: Option<u32>,

    /// Upper bound on open connections, if not the sqlx default.
    pub max_connections: Option<u32>,

    /// How many times to retry acquiring a connection while the server is saturated.
    pub max_retries: u16,
}

impl PostgresOptions {
    /// Reads the options from `<prefix>_HOST`, `<prefix>_PORT`, `<prefix>_DATABASE`,
    /// `<prefix>_USERNAME` and `<prefix>_PASSWORD`, which are required, and from
    /// `<prefix>_MIN_CONNECTIONS`, `<prefix>_MAX_CONNECTIONS` and `<prefix>_MAX_RETRIES`, which are
    /// not.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            host: get_required_var(prefix, "HOST")?,
            port: get_required_var(prefix, "PORT")?,
            database: get_required_var(prefix, "DATABASE")?,
            username: get_required_var(prefix, "USERNAME")?,
            password: get_required_var(prefix, "PASSWORD")?,
            min_connections: get_optional_var(prefix, "MIN_CONNECTIONS")?,
            max_connections: get_optional_var(prefix, "MAX_CONNECTIONS")?,
            max_retries: get_optional_var(prefix, "MAX_RETRIES")?.unwrap_or(DEFAULT_MAX_RETRIES),
        })
    }
}

/// Computes the pause before the next connection attempt.  Grows with `attempt` up to
/// `MAX_BACKOFF` and adds up to one second of jitter so that saturated clients spread out.
fn backoff(attempt: u16) -> Duration {
    let base = Duration::from_millis(100).saturating_mul(u32::from(attempt) + 1).min(MAX_BACKOFF);
    base + Duration::from_millis(rand::random_range(0..1000))
}

/// Handle to a PostgreSQL database.
pub struct PostgresDb {
    /// Lazily-established connections to the server.
    pool: PgPool,

    /// How many times to retry acquiring a connection while the server is saturated.
    max_retries: u16,
}

impl PostgresDb {
    /// Prepares a handle to the server described by `opts` without connecting yet.
    pub fn connect(opts: PostgresOptions) -> DbResult<Self> {
        let connect_options = PgConnectOptions::new()
            .host(&opts.host)
            .port(opts.port)
            .database(&opts.database)
            .username(&opts.username)
            .password(&opts.password);

        let mut pool_options = PgPoolOptions::new().acquire_timeout(Duration::from_secs(2));
        if let Some(n) = opts.min_connections {
            pool_options = pool_options.min_connections(n);
        }
        if let Some(n) = opts.max_connections {
            pool_options = pool_options.max_connections(n);
        }

        let pool = pool_options.connect_lazy_with(connect_options);
        Ok(Self { pool, max_retries: opts.max_retries })
    }

    /// Obtains a connection without wrapping it in an `Executor`, waiting for the server while it
    /// reports that it is out of connections.
    pub async fn conn(&self) -> DbResult<PoolConnection<Postgres>> {
        let mut attempt = 0;
        loop {
            match self.pool.acquire().await.map_err(map_sqlx_error) {
                Err(DbError::Unavailable) if attempt < self.max_retries => {
                    let delay = backoff(attempt);
                    attempt += 1;
                    warn!(
                        "PostgreSQL unavailable; retry {}/{} in {}ms",
                        attempt,
                        self.max_retries,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }
}

impl Drop for PostgresDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("PostgreSQL handle dropped while still open; call close() first");
        }
    }
}

#[async_trait]
impl Db for PostgresDb {
    async fn ex(&self) -> DbResult<Executor> {
        Ok(Executor::Postgres(self.conn().await?))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Runs the possibly multi-statement `schema` on `conn`.
pub async fn run_schema(conn: &mut PoolConnection<Postgres>, schema: &str) -> DbResult<()> {
    sqlx::raw_sql(schema).execute(&mut **conn).await.map_err(map_sqlx_error)?;
    Ok(())
}

/// Test utilities for the PostgreSQL backend.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Connects to the server described by the `PGSQL_TEST_*` variables.
    ///
    /// The handle is limited to a single connection whose `search_path` points at `pg_temp`, so
    /// every table a test creates vanishes when the handle is closed.
    pub async fn setup() -> PostgresDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let mut opts = PostgresOptions::from_env("PGSQL_TEST").unwrap();
        opts.min_connections = Some(1);
        opts.max_connections = Some(1);
        let db = PostgresDb::connect(opts).unwrap();

        let mut conn = db.conn().await.unwrap();
        sqlx::query("SET search_path TO pg_temp").execute(&mut *conn).await.unwrap();
        db
    }
}
