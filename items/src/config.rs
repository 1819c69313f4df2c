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

//! Service configuration read from the environment.

use crud_core::db::postgres::{PostgresDb, PostgresOptions};
use crud_core::db::sqlite;
use crud_core::db::{Db, DbResult};
use crud_core::env::get_optional_var;

/// Prefix of all environment variables that configure the service.
const PREFIX: &str = "ITEMS";

/// Prefix of the environment variables that configure the production PostgreSQL database.
const PGSQL_PREFIX: &str = "PGSQL_PROD";

/// Port to listen on when `ITEMS_PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Database file to use when `ITEMS_SQLITE_PATH` is not set.
const DEFAULT_SQLITE_PATH: &str = "items.db";

/// Options to select and connect to the database backend.
#[derive(Debug)]
pub enum DbOptions {
    /// Use a SQLite database stored in the file at `path`, created if missing.
    Sqlite {
        /// Path to the database file or `:memory:`.
        path: String,
    },

    /// Use a PostgreSQL database.
    Postgres(PostgresOptions),
}

impl DbOptions {
    /// Initializes the database options from `ITEMS_DB` and the variables of the chosen backend.
    pub fn from_env() -> Result<Self, String> {
        let backend = get_optional_var::<String>(PREFIX, "DB")?;
        match backend.as_deref() {
            None | Some("sqlite") => {
                let path = get_optional_var::<String>(PREFIX, "SQLITE_PATH")?
                    .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_owned());
                Ok(DbOptions::Sqlite { path })
            }
            Some("postgres") => Ok(DbOptions::Postgres(PostgresOptions::from_env(PGSQL_PREFIX)?)),
            Some(other) => Err(format!(
                "Invalid database backend '{}' in {}_DB; must be sqlite or postgres",
                other, PREFIX
            )),
        }
    }

    /// Opens the database described by these options.  Does not set up any schema.
    pub async fn connect(self) -> DbResult<Box<dyn Db + Send + Sync>> {
        match self {
            DbOptions::Sqlite { path } => Ok(Box::new(sqlite::connect(&path).await?)),
            DbOptions::Postgres(opts) => Ok(Box::new(PostgresDb::connect(opts)?)),
        }
    }
}

/// Top-level configuration of the service.
#[derive(Debug)]
pub struct ServiceOptions {
    /// TCP port to listen on.
    pub port: u16,

    /// Database configuration.
    pub db: DbOptions,
}

impl ServiceOptions {
    /// Initializes the service options from environment variables.
    pub fn from_env() -> Result<Self, String> {
        Ok(ServiceOptions {
            port: get_optional_var::<u16>(PREFIX, "PORT")?.unwrap_or(DEFAULT_PORT),
            db: DbOptions::from_env()?,
        })
    }
}
