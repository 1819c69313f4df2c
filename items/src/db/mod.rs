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

//! Database abstraction in terms of the operations needed by the server.

use crate::model::{Item, ItemFields, ItemId};
use crud_core::db::postgres;
use crud_core::db::sqlite;
use crud_core::db::{DbError, DbResult, Executor};
use futures::TryStreamExt;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

#[cfg(test)]
mod tests;

/// Builds an `Item` out of a PostgreSQL row with the `id`, `name`, `price` and `is_offer` columns.
fn item_from_pg_row(row: &PgRow) -> DbResult<Item> {
    let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
    let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
    let price: f64 = row.try_get("price").map_err(postgres::map_sqlx_error)?;
    let is_offer: Option<bool> = row.try_get("is_offer").map_err(postgres::map_sqlx_error)?;
    Ok(Item::new(ItemId::new(id), ItemFields::new(name, price, is_offer)))
}

/// Builds an `Item` out of a SQLite row with the `id`, `name`, `price` and `is_offer` columns.
fn item_from_sqlite_row(row: &SqliteRow) -> DbResult<Item> {
    let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
    let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
    let price: f64 = row.try_get("price").map_err(sqlite::map_sqlx_error)?;
    let is_offer: Option<bool> = row.try_get("is_offer").map_err(sqlite::map_sqlx_error)?;
    Ok(Item::new(ItemId::new(id), ItemFields::new(name, price, is_offer)))
}

/// Validates that a statement keyed on the item `id` touched at most one row.
///
/// Touching no rows is fine: updates and deletions of missing items are no-ops.
fn ensure_at_most_one(id: ItemId, affected: u64) -> DbResult<()> {
    match affected {
        0 | 1 => Ok(()),
        _ => Err(DbError::BackendError(format!(
            "Operation on item {} affected {} rows",
            id, affected
        ))),
    }
}

/// Initializes the database schema.
pub(crate) async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        Executor::Postgres(conn) => postgres::run_schema(conn, include_str!("postgres.sql")).await,
        Executor::Sqlite(conn) => sqlite::run_schema(conn, include_str!("sqlite.sql")).await,
    }
}

/// Stores a new item with the given `fields` and returns the identifier the database assigned
/// to it.
pub(crate) async fn put_item(ex: &mut Executor, fields: &ItemFields) -> DbResult<ItemId> {
    let id = match ex {
        Executor::Postgres(conn) => {
            let query_str = "
                INSERT INTO items (name, price, is_offer)
                VALUES ($1, $2, $3)
                RETURNING id
            ";
            let row = sqlx::query(query_str)
                .bind(fields.name())
                .bind(fields.price())
                .bind(fields.is_offer())
                .fetch_one(&mut **conn)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get::<i64, _>("id").map_err(postgres::map_sqlx_error)?
        }

        Executor::Sqlite(conn) => {
            let query_str = "INSERT INTO items (name, price, is_offer) VALUES (?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(fields.name())
                .bind(fields.price())
                .bind(fields.is_offer())
                .execute(&mut **conn)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            if done.rows_affected() != 1 {
                return Err(DbError::BackendError(format!(
                    "Insert created {} rows",
                    done.rows_affected()
                )));
            }
            done.last_insert_rowid()
        }
    };
    Ok(ItemId::new(id))
}

/// Replaces the contents of the item `id` with `fields`.  Does nothing if the item does not exist.
pub(crate) async fn update_item(
    ex: &mut Executor,
    id: ItemId,
    fields: &ItemFields,
) -> DbResult<()> {
    let affected = match ex {
        Executor::Postgres(conn) => {
            let query_str = "UPDATE items SET name = $1, price = $2, is_offer = $3 WHERE id = $4";
            sqlx::query(query_str)
                .bind(fields.name())
                .bind(fields.price())
                .bind(fields.is_offer())
                .bind(id.as_i64())
                .execute(&mut **conn)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        Executor::Sqlite(conn) => {
            let query_str = "UPDATE items SET name = ?, price = ?, is_offer = ? WHERE id = ?";
            sqlx::query(query_str)
                .bind(fields.name())
                .bind(fields.price())
                .bind(fields.is_offer())
                .bind(id.as_i64())
                .execute(&mut **conn)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }
    };
    ensure_at_most_one(id, affected)
}

/// Deletes the item `id`.  Does nothing if the item does not exist.
pub(crate) async fn delete_item(ex: &mut Executor, id: ItemId) -> DbResult<()> {
    let affected = match ex {
        Executor::Postgres(conn) => {
            let query_str = "DELETE FROM items WHERE id = $1";
            sqlx::query(query_str)
                .bind(id.as_i64())
                .execute(&mut **conn)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        Executor::Sqlite(conn) => {
            let query_str = "DELETE FROM items WHERE id = ?";
            sqlx::query(query_str)
                .bind(id.as_i64())
                .execute(&mut **conn)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }
    };
    ensure_at_most_one(id, affected)
}

/// Gets all items that are on offer, sorted by identifier.
pub(crate) async fn get_offers(ex: &mut Executor) -> DbResult<Vec<Item>> {
    let mut items = vec![];
    match ex {
        Executor::Postgres(conn) => {
            let query_str = "
                SELECT id, name, price, is_offer
                FROM items
                WHERE is_offer = TRUE
                ORDER BY id
            ";
            let mut rows = sqlx::query(query_str).fetch(&mut **conn);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                items.push(item_from_pg_row(&row)?);
            }
        }

        Executor::Sqlite(conn) => {
            let query_str = "
                SELECT id, name, price, is_offer
                FROM items
                WHERE is_offer = 1
                ORDER BY id
            ";
            let mut rows = sqlx::query(query_str).fetch(&mut **conn);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                items.push(item_from_sqlite_row(&row)?);
            }
        }
    }
    Ok(items)
}

/// Counts all stored items.
pub(crate) async fn count_items(ex: &mut Executor) -> DbResult<u64> {
    let count: i64 = match ex {
        Executor::Postgres(conn) => {
            let query_str = "SELECT COUNT(*) AS count FROM items";
            let row = sqlx::query(query_str)
                .fetch_one(&mut **conn)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("count").map_err(postgres::map_sqlx_error)?
        }

        Executor::Sqlite(conn) => {
            let query_str = "SELECT COUNT(*) AS count FROM items";
            let row = sqlx::query(query_str)
                .fetch_one(&mut **conn)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("count").map_err(sqlite::map_sqlx_error)?
        }
    };
    u64::try_from(count)
        .map_err(|e| DbError::DataIntegrityError(format!("Invalid item count {}: {}", count, e)))
}

/// Gets the item `id`, or `None` if it does not exist.
#[cfg(test)]
pub(crate) async fn get_item(ex: &mut Executor, id: ItemId) -> DbResult<Option<Item>> {
    match ex {
        Executor::Postgres(conn) => {
            let query_str = "SELECT id, name, price, is_offer FROM items WHERE id = $1";
            let maybe_row = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_optional(&mut **conn)
                .await
                .map_err(postgres::map_sqlx_error)?;
            maybe_row.as_ref().map(item_from_pg_row).transpose()
        }

        Executor::Sqlite(conn) => {
            let query_str = "SELECT id, name, price, is_offer FROM items WHERE id = ?";
            let maybe_row = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_optional(&mut **conn)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.as_ref().map(item_from_sqlite_row).transpose()
        }
    }
}
