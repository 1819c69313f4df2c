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

//! API to count all items.

use crate::driver::Driver;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use crud_core::rest::{EmptyBody, RestError};
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;

/// Message returned by the server with the number of stored items.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub(crate) struct CountResponse {
    /// Total number of items.
    pub(crate) count: u64,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let count = driver.count_items().await?;

    Ok(Json(CountResponse { count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use crud_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/items/count/".to_owned())
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_json::<CountResponse>()
            .await;
        assert_eq!(CountResponse { count: 0 }, response);
    }

    #[tokio::test]
    async fn test_after_creates() {
        let context = TestContext::setup().await;

        for i in 0..4u32 {
            context.put_item(format!("item {}", i), f64::from(i), None).await;
        }

        let response = OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_json::<CountResponse>()
            .await;
        assert_eq!(CountResponse { count: 4 }, response);
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
