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

//! API to replace the contents of an existing item.

use crate::driver::Driver;
use crate::model::{ItemFields, ItemId};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use crud_core::rest::{RestError, ValidJson, ValidPath};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    ValidPath(id): ValidPath<ItemId>,
    ValidJson(fields): ValidJson<ItemFields>,
) -> Result<impl IntoResponse, RestError> {
    let item = driver.update_item(id, fields).await?;
    Ok(Json(item))
}
