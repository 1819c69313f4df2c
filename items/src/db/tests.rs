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

//! Database tests shared by all implementations.

use crate::db::*;
use crate::model::*;
use crud_core::db::Db;

/// Shorthand to build the contents of an item.
fn fields(name: &str, price: f64, is_offer: Option<bool>) -> ItemFields {
    ItemFields::new(name.to_owned(), price, is_offer)
}

async fn test_put_and_get_item(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let id1 = put_item(&mut ex, &fields("Hammer", 12.5, Some(true))).await.unwrap();
    let id2 = put_item(&mut ex, &fields("Saw", 30.0, None)).await.unwrap();
    assert_ne!(id1, id2);

    assert_eq!(
        Some(Item::new(id1, fields("Hammer", 12.5, Some(true)))),
        get_item(&mut ex, id1).await.unwrap()
    );
    assert_eq!(
        Some(Item::new(id2, fields("Saw", 30.0, None))),
        get_item(&mut ex, id2).await.unwrap()
    );

    drop(ex);
    db.close().await;
}

async fn test_put_item_keeps_false_offer(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let id = put_item(&mut ex, &fields("Nails", 0.1, Some(false))).await.unwrap();
    assert_eq!(
        Some(Item::new(id, fields("Nails", 0.1, Some(false)))),
        get_item(&mut ex, id).await.unwrap()
    );

    drop(ex);
    db.close().await;
}

async fn test_update_item(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let id = put_item(&mut ex, &fields("Hammer", 12.5, None)).await.unwrap();
    let other = put_item(&mut ex, &fields("Saw", 30.0, None)).await.unwrap();

    update_item(&mut ex, id, &fields("Big hammer", 20.0, Some(true))).await.unwrap();
    assert_eq!(
        Some(Item::new(id, fields("Big hammer", 20.0, Some(true)))),
        get_item(&mut ex, id).await.unwrap()
    );
    assert_eq!(
        Some(Item::new(other, fields("Saw", 30.0, None))),
        get_item(&mut ex, other).await.unwrap()
    );

    drop(ex);
    db.close().await;
}

async fn test_update_item_missing_is_noop(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let id = put_item(&mut ex, &fields("Hammer", 12.5, None)).await.unwrap();
    let missing = ItemId::new(id.as_i64() + 100);

    update_item(&mut ex, missing, &fields("Ghost", 1.0, Some(true))).await.unwrap();
    assert_eq!(None, get_item(&mut ex, missing).await.unwrap());
    assert_eq!(1, count_items(&mut ex).await.unwrap());

    drop(ex);
    db.close().await;
}

async fn test_delete_item(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let id = put_item(&mut ex, &fields("Hammer", 12.5, None)).await.unwrap();
    let other = put_item(&mut ex, &fields("Saw", 30.0, None)).await.unwrap();

    delete_item(&mut ex, id).await.unwrap();
    assert_eq!(None, get_item(&mut ex, id).await.unwrap());
    assert!(get_item(&mut ex, other).await.unwrap().is_some());

    drop(ex);
    db.close().await;
}

async fn test_delete_item_missing_is_noop(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let id = put_item(&mut ex, &fields("Hammer", 12.5, None)).await.unwrap();
    delete_item(&mut ex, ItemId::new(id.as_i64() + 100)).await.unwrap();
    delete_item(&mut ex, id).await.unwrap();
    delete_item(&mut ex, id).await.unwrap();
    assert_eq!(0, count_items(&mut ex).await.unwrap());

    drop(ex);
    db.close().await;
}

async fn test_count_items(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(0, count_items(&mut ex).await.unwrap());
    for i in 0..5u32 {
        put_item(&mut ex, &fields(&format!("Item {}", i), f64::from(i), None)).await.unwrap();
    }
    assert_eq!(5, count_items(&mut ex).await.unwrap());

    drop(ex);
    db.close().await;
}

async fn test_get_offers(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    assert!(get_offers(&mut ex).await.unwrap().is_empty());

    let id1 = put_item(&mut ex, &fields("Hammer", 12.5, Some(true))).await.unwrap();
    put_item(&mut ex, &fields("Saw", 30.0, Some(false))).await.unwrap();
    put_item(&mut ex, &fields("Drill", 99.0, None)).await.unwrap();
    let id4 = put_item(&mut ex, &fields("Nails", 0.1, Some(true))).await.unwrap();

    assert_eq!(
        vec![
            Item::new(id1, fields("Hammer", 12.5, Some(true))),
            Item::new(id4, fields("Nails", 0.1, Some(true))),
        ],
        get_offers(&mut ex).await.unwrap()
    );

    drop(ex);
    db.close().await;
}

async fn test_statements_across_executors(db: Box<dyn Db>) {
    let id = put_item(&mut db.ex().await.unwrap(), &fields("Hammer", 12.5, Some(true)))
        .await
        .unwrap();
    assert_eq!(1, count_items(&mut db.ex().await.unwrap()).await.unwrap());
    delete_item(&mut db.ex().await.unwrap(), id).await.unwrap();
    assert_eq!(0, count_items(&mut db.ex().await.unwrap()).await.unwrap());

    db.close().await;
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta])? ) => {
        crud_core::db::testutils::generate_tests!(
            $( #[$extra], )?
            $setup,
            $crate::db::tests,
            test_put_and_get_item,
            test_put_item_keeps_false_offer,
            test_update_item,
            test_update_item_missing_is_noop,
            test_delete_item,
            test_delete_item_missing_is_noop,
            test_count_items,
            test_get_offers,
            test_statements_across_executors
        );
    }
];

mod postgres {
    use super::*;
    use crud_core::db::postgres::testutils::setup;

    generate_db_tests!(
        {
            let db = setup().await;
            init_schema(&mut db.ex().await.unwrap()).await.unwrap();
            Box::new(db)
        },
        #[ignore = "Requires environment configuration and is expensive"]
    );
}

mod sqlite {
    use super::*;
    use crud_core::db::sqlite::testutils::setup;

    generate_db_tests!({
        let db = setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Box::new(db)
    });
}
