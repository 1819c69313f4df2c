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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use crud_core::db::sqlite;
use crud_core::db::Db;
use std::sync::Arc;

pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    app: Router,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::new(sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        let app = app(driver);
        Self { db, app }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    pub(crate) async fn put_item<N: Into<String>>(
        &self,
        name: N,
        price: f64,
        is_offer: Option<bool>,
    ) -> Item {
        let fields = ItemFields::new(name.into(), price, is_offer);
        let id = db::put_item(&mut self.db.ex().await.unwrap(), &fields).await.unwrap();
        Item::new(id, fields)
    }

    pub(crate) async fn get_item(&self, id: ItemId) -> Option<Item> {
        db::get_item(&mut self.db.ex().await.unwrap(), id).await.unwrap()
    }

    pub(crate) async fn count_items(&self) -> u64 {
        db::count_items(&mut self.db.ex().await.unwrap()).await.unwrap()
    }
}
