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

//! Typed access to the environment variables that configure a service.
//!
//! Variables are named `<prefix>_<suffix>` so that a service can keep all of its settings under
//! one prefix and a library can be pointed at different sets (say, production and test).

use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Result type for environment errors, which are plain messages meant for the operator.
type Result<T> = std::result::Result<T, String>;

/// Reads the raw value of the variable `name`, if set.
fn lookup(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(raw) => Ok(Some(raw)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            Err(format!("Environment variable {} is not valid UTF-8", name))
        }
    }
}

/// Gets the variable `<prefix>_<suffix>` parsed as a `T`, or `None` if it is not set.
///
/// A variable that is set but does not parse is an error, not a missing value.
pub fn get_optional_var<T>(prefix: &str, suffix: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let name = format!("{}_{}", prefix, suffix);
    match lookup(&name)? {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Bad value '{}' in environment variable {}: {}", raw, name, e)),
        None => Ok(None),
    }
}

/// Gets the variable `<prefix>_<suffix>` parsed as a `T`, failing if it is not set.
pub fn get_required_var<T>(prefix: &str, suffix: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    get_optional_var(prefix, suffix)?.ok_or_else(|| {
        format!("Required environment variable {}_{} not present", prefix, suffix)
    })
}
