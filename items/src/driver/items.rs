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

//! Operations on the collection of items.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crud_core::driver::DriverResult;

impl Driver {
    /// Gets all items that are on offer.
    pub(crate) async fn get_offers(self) -> DriverResult<Vec<Item>> {
        let items = db::get_offers(&mut self.db.ex().await?).await?;
        Ok(items)
    }

    /// Counts all items.
    pub(crate) async fn count_items(self) -> DriverResult<u64> {
        let count = db::count_items(&mut self.db.ex().await?).await?;
        Ok(count)
    }
}
