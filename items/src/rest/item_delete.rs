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

//! API to delete an item.

use crate::driver::Driver;
use crate::model::ItemId;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use crud_core::rest::{EmptyBody, RestError, ValidPath};
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;

/// Message returned by the server after a deletion, whether the item existed or not.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub(crate) struct DeleteResponse {
    /// Human-readable confirmation.
    pub(crate) message: String,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    ValidPath(id): ValidPath<ItemId>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    driver.delete_item(id).await?;
    Ok(Json(DeleteResponse { message: "Item deleted".to_owned() }))
}
