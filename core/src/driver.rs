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

//! Generic business logic for any service.
//!
//! Every service should implement its own `Driver` type.  In most cases, this type will hold a
//! shared handle to the database, and as such the definition will look like this:
//!
//! ```rust
//! use crud_core::db::Db;
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! pub(crate) struct Driver {
//!     /// The database that the driver uses for persistence.
//!     db: Arc<dyn Db + Send + Sync>,
//!
//!     // ... other fields here ...
//! }
//! ```
//!
//! Every operation implemented in the `Driver` should consume `self` because this is the layer
//! that decides which connection each request runs on.  Consuming `self` prevents
//! the caller from easily issuing multiple operations against the driver, as this would require a
//! clone and highlight an undesirable pattern.

use crate::db::DbError;

/// Business logic errors.
///
/// The services built on this framework perform no existence or uniqueness checks of their own,
/// so the only failures left at this layer are the ones coming from the database.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// The database failed or could not be reached.
    #[error("{0}")]
    BackendError(String),
}

impl From<DbError> for DriverError {
    fn from(e: DbError) -> Self {
        DriverError::BackendError(e.to_string())
    }
}

/// Result type for this module.
pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_db_error_keeps_message() {
        assert_eq!(
            DriverError::BackendError("Data integrity error: bad row".to_owned()),
            DriverError::from(DbError::DataIntegrityError("bad row".to_owned()))
        );
        assert_eq!(
            DriverError::BackendError("Unavailable".to_owned()),
            DriverError::from(DbError::Unavailable)
        );
    }
}
