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

//! High-level data types.

use derive_getters::Getters;
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

/// Newtype pattern for the identifiers of items.  These are always assigned by the database.
#[derive(Clone, Constructor, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct ItemId(i64);

impl ItemId {
    /// Returns the identifier as an `i64`, which is what the database backends store.
    pub(crate) fn as_i64(self) -> i64 {
        self.0
    }
}

/// Client-controlled contents of an item.
///
/// This is what create and update requests carry.  Any `id` present in the payload is ignored
/// because identifiers are never chosen by clients.
#[derive(Clone, Constructor, Deserialize, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct ItemFields {
    /// Human-readable name of the item.
    name: String,

    /// Price of the item.
    price: f64,

    /// Whether the item is on offer, if known.
    #[serde(default)]
    is_offer: Option<bool>,
}

/// A persisted item.
#[derive(Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct Item {
    /// Identifier assigned by the database.
    id: ItemId,

    /// Human-readable name of the item.
    name: String,

    /// Price of the item.
    price: f64,

    /// Whether the item is on offer, if known.
    is_offer: Option<bool>,
}

impl Item {
    /// Creates an item from its database-assigned `id` and its contents.
    pub(crate) fn new(id: ItemId, fields: ItemFields) -> Self {
        Self { id, name: fields.name, price: fields.price, is_offer: fields.is_offer }
    }
}
