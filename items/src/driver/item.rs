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

//! Operations on one item.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crud_core::driver::DriverResult;
use log::debug;

impl Driver {
    /// Creates a new item with the given `fields` and returns it with its assigned identifier.
    pub(crate) async fn create_item(self, fields: ItemFields) -> DriverResult<Item> {
        let id = db::put_item(&mut self.db.ex().await?, &fields).await?;
        debug!("Created item {}", id);
        Ok(Item::new(id, fields))
    }

    /// Replaces the contents of item `id` with `fields`.
    ///
    /// Updating a missing item is not an error: nothing is stored but the caller still gets back
    /// the item it asked for.
    pub(crate) async fn update_item(self, id: ItemId, fields: ItemFields) -> DriverResult<Item> {
        db::update_item(&mut self.db.ex().await?, id, &fields).await?;
        debug!("Updated item {}", id);
        Ok(Item::new(id, fields))
    }

    /// Deletes item `id`, which may or may not exist.
    pub(crate) async fn delete_item(self, id: ItemId) -> DriverResult<()> {
        db::delete_item(&mut self.db.ex().await?, id).await?;
        debug!("Deleted item {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;

    #[tokio::test]
    async fn test_create_item_assigns_ids() {
        let context = TestContext::setup().await;

        let fields1 = ItemFields::new("Hammer".to_owned(), 12.5, Some(true));
        let item1 = context.driver().create_item(fields1.clone()).await.unwrap();
        let fields2 = ItemFields::new("Saw".to_owned(), 30.0, None);
        let item2 = context.driver().create_item(fields2.clone()).await.unwrap();

        assert_ne!(item1.id(), item2.id());
        assert_eq!(Item::new(*item1.id(), fields1), item1);
        assert_eq!(Item::new(*item2.id(), fields2), item2);

        let id1 = *item1.id();
        assert_eq!(Some(item1), db::get_item(&mut context.ex().await, id1).await.unwrap());
        context.close().await;
    }

    #[tokio::test]
    async fn test_update_item_ok() {
        let context = TestContext::setup().await;

        let id = db::put_item(
            &mut context.ex().await,
            &ItemFields::new("Hammer".to_owned(), 12.5, None),
        )
        .await
        .unwrap();

        let fields = ItemFields::new("Big hammer".to_owned(), 20.0, Some(false));
        let item = context.driver().update_item(id, fields.clone()).await.unwrap();
        assert_eq!(Item::new(id, fields), item);

        assert_eq!(Some(item), db::get_item(&mut context.ex().await, id).await.unwrap());
        context.close().await;
    }

    #[tokio::test]
    async fn test_update_item_missing() {
        let context = TestContext::setup().await;

        let id = ItemId::new(123);
        let fields = ItemFields::new("Ghost".to_owned(), 1.0, None);
        let item = context.driver().update_item(id, fields.clone()).await.unwrap();
        assert_eq!(Item::new(id, fields), item);

        assert_eq!(None, db::get_item(&mut context.ex().await, id).await.unwrap());
        context.close().await;
    }

    #[tokio::test]
    async fn test_delete_item_ok() {
        let context = TestContext::setup().await;

        let id = db::put_item(
            &mut context.ex().await,
            &ItemFields::new("Hammer".to_owned(), 12.5, None),
        )
        .await
        .unwrap();

        context.driver().delete_item(id).await.unwrap();

        assert_eq!(None, db::get_item(&mut context.ex().await, id).await.unwrap());
        context.close().await;
    }

    #[tokio::test]
    async fn test_delete_item_missing() {
        let context = TestContext::setup().await;

        context.driver().delete_item(ItemId::new(5)).await.unwrap();

        assert_eq!(0, db::count_items(&mut context.ex().await).await.unwrap());
        context.close().await;
    }
}
