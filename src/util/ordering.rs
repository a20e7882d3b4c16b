// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Comparison of raw PLAIN-encoded bytes under a physical type's ordering:
//! signed integers arithmetically, byte arrays lexicographically (unsigned
//! byte order), floats with NaN sorted last (so it never wins min or max),
//! booleans false < true.
//! Shared by `dictionary::bounds`, `column::writer` running min/max and
//! `file::page_index::search`, so all three agree on a single comparator.

use std::cmp::Ordering;

use crate::basic::Type as PhysicalType;

/// Compares two PLAIN-encoded values of the same physical type. Panics if
/// either slice is shorter than the type requires; callers own framing.
pub fn compare(physical_type: PhysicalType, a: &[u8], b: &[u8]) -> Ordering {
  match physical_type {
    PhysicalType::BOOLEAN => a[0].cmp(&b[0]),
    PhysicalType::INT32 => {
      i32::from_le_bytes(a[..4].try_into().unwrap()).cmp(&i32::from_le_bytes(b[..4].try_into().unwrap()))
    }
    PhysicalType::INT64 => {
      i64::from_le_bytes(a[..8].try_into().unwrap()).cmp(&i64::from_le_bytes(b[..8].try_into().unwrap()))
    }
    PhysicalType::INT96 => a.cmp(b),
    PhysicalType::FLOAT => {
      let x = f32::from_le_bytes(a[..4].try_into().unwrap());
      let y = f32::from_le_bytes(b[..4].try_into().unwrap());
      total_cmp_f32(x, y)
    }
    PhysicalType::DOUBLE => {
      let x = f64::from_le_bytes(a[..8].try_into().unwrap());
      let y = f64::from_le_bytes(b[..8].try_into().unwrap());
      total_cmp_f64(x, y)
    }
    PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY => a.cmp(b),
  }
}

/// Orders NaN after every other value, so a running min/max that folds NaN
/// in via `compare` never reports it as either bound.
fn total_cmp_f32(a: f32, b: f32) -> Ordering {
  match (a.is_nan(), b.is_nan()) {
    (true, true) => Ordering::Equal,
    (true, false) => Ordering::Greater,
    (false, true) => Ordering::Less,
    (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
  }
}

fn total_cmp_f64(a: f64, b: f64) -> Ordering {
  match (a.is_nan(), b.is_nan()) {
    (true, true) => Ordering::Equal,
    (true, false) => Ordering::Greater,
    (false, true) => Ordering::Less,
    (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
  }
}

/// True if `v` should be excluded from min/max accumulation entirely (NaN).
pub fn is_nan_bytes(physical_type: PhysicalType, v: &[u8]) -> bool {
  match physical_type {
    PhysicalType::FLOAT => f32::from_le_bytes(v[..4].try_into().unwrap()).is_nan(),
    PhysicalType::DOUBLE => f64::from_le_bytes(v[..8].try_into().unwrap()).is_nan(),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_int32_ordering() {
    let a = (-5i32).to_le_bytes();
    let b = 3i32.to_le_bytes();
    assert_eq!(compare(PhysicalType::INT32, &a, &b), Ordering::Less);
  }

  #[test]
  fn test_byte_array_lexicographic() {
    assert_eq!(compare(PhysicalType::BYTE_ARRAY, b"abc", b"abd"), Ordering::Less);
  }

  #[test]
  fn test_bool_ordering() {
    assert_eq!(compare(PhysicalType::BOOLEAN, &[0], &[1]), Ordering::Less);
  }

  #[test]
  fn test_nan_excluded() {
    assert!(is_nan_bytes(PhysicalType::FLOAT, &f32::NAN.to_le_bytes()));
    assert!(!is_nan_bytes(PhysicalType::FLOAT, &1.0f32.to_le_bytes()));
  }

  #[test]
  fn test_nan_sorts_last() {
    let nan = f64::NAN.to_le_bytes();
    let one = 1.0f64.to_le_bytes();
    assert_eq!(compare(PhysicalType::DOUBLE, &nan, &one), Ordering::Greater);
    assert_eq!(compare(PhysicalType::DOUBLE, &one, &nan), Ordering::Less);
  }
}
