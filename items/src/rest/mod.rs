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

//! Entry point to the REST server.

use crate::driver::Driver;
use axum::Router;

mod count_get;
mod item_delete;
mod item_put;
mod items_post;
mod offers_get;
#[cfg(test)]
mod testutils;

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{get, post, put};
    Router::new()
        .route("/items/", post(items_post::handler))
        .route("/items/:item_id", put(item_put::handler).delete(item_delete::handler))
        .route("/items/offers/", get(offers_get::handler))
        .route("/items/count/", get(count_get::handler))
        .with_state(driver)
}
