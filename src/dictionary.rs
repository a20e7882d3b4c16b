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

//! The shared dictionary: the sole buffer a column chunk's dictionary page
//! and its `RLE_DICTIONARY` data pages both reference.
//! Distinct from `encodings::encoding::DictEncoder`/`DictDecoder`, which
//! handle the on-wire index stream; this is the in-memory value store both
//! of those sit on top of during a write, and the one a reader installs
//! from a decoded dictionary page before decoding any data page.

use std::collections::HashMap;

use crate::data_type::{AsBytes, DataType};
use crate::errors::{ParquetError, Result};
use crate::util::ordering;

/// Maps int32 indexes to distinct column values.
/// Order of first insertion defines index assignment, matching the
/// on-disk dictionary page's value order.
pub struct Dictionary<T: DataType> {
  values: Vec<T::T>,
  index: HashMap<Vec<u8>, i32>,
}

impl<T: DataType> Dictionary<T> {
  pub fn new() -> Self {
    Dictionary { values: Vec::new(), index: HashMap::new() }
  }

  /// Wraps an already-decoded dictionary page's values (reader path): index
  /// assignment is simply position in `values`.
  pub fn from_values(values: Vec<T::T>) -> Self {
    let mut index = HashMap::with_capacity(values.len());
    for (i, v) in values.iter().enumerate() {
      index.entry(v.as_bytes()).or_insert(i as i32);
    }
    Dictionary { values, index }
  }

  /// Returns one index per input value (writer path). Equal inputs map to
  /// equal indexes; values never seen before extend the dictionary.
  pub fn insert(&mut self, values: &[T::T]) -> Vec<i32> {
    let mut out = Vec::with_capacity(values.len());
    for v in values {
      let key = v.as_bytes();
      let idx = *self.index.entry(key).or_insert_with(|| {
        self.values.push(v.clone());
        (self.values.len() - 1) as i32
      });
      out.push(idx);
    }
    out
  }

  /// Bulk gather. Panics on an out-of-range index: a programmer error.
  pub fn lookup(&self, indexes: &[i32]) -> Vec<T::T> {
    indexes
      .iter()
      .map(|&i| {
        self
          .values
          .get(i as usize)
          .unwrap_or_else(|| panic!("dictionary index {} out of bound {}", i, self.values.len()))
          .clone()
      })
      .collect()
  }

  /// `Err(IndexOutOfBounds)` variant of `lookup`'s single-index form, for
  /// callers (e.g. decoders) that want to propagate rather than panic on
  /// wire corruption instead of a genuine programmer bug.
  pub fn try_index(&self, i: i32) -> Result<&T::T> {
    self.values.get(i as usize).ok_or_else(|| ParquetError::IndexOutOfBounds(i as usize, self.values.len()))
  }

  /// Min/max over the values referenced by `indexes`, under the column
  /// type's ordering.
  pub fn bounds(&self, indexes: &[i32]) -> Option<(T::T, T::T)> {
    let physical_type = T::get_physical_type();
    let mut min: Option<&T::T> = None;
    let mut max: Option<&T::T> = None;
    for &i in indexes {
      let v = &self.values[i as usize];
      let bytes = v.as_bytes();
      if ordering::is_nan_bytes(physical_type, &bytes) {
        continue;
      }
      if min.is_none() || ordering::compare(physical_type, &bytes, &min.unwrap().as_bytes()) == std::cmp::Ordering::Less
      {
        min = Some(v);
      }
      if max.is_none()
        || ordering::compare(physical_type, &bytes, &max.unwrap().as_bytes()) == std::cmp::Ordering::Greater
      {
        max = Some(v);
      }
    }
    match (min, max) {
      (Some(lo), Some(hi)) => Some((lo.clone(), hi.clone())),
      _ => None,
    }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn index(&self, i: usize) -> &T::T {
    &self.values[i]
  }

  pub fn values(&self) -> &[T::T] {
    &self.values
  }

  pub fn reset(&mut self) {
    self.values.clear();
    self.index.clear();
  }
}

impl<T: DataType> Default for Dictionary<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data_type::Int32Type;

  #[test]
  fn test_insert_assigns_stable_indexes() {
    let mut dict: Dictionary<Int32Type> = Dictionary::new();
    let idx = dict.insert(&[10, 20, 10, 30]);
    assert_eq!(idx, vec![0, 1, 0, 2]);
    assert_eq!(dict.len(), 3);
  }

  #[test]
  fn test_lookup_roundtrips_insert() {
    let mut dict: Dictionary<Int32Type> = Dictionary::new();
    let idx = dict.insert(&[5, 6, 5]);
    assert_eq!(dict.lookup(&idx), vec![5, 6, 5]);
  }

  #[test]
  #[should_panic]
  fn test_lookup_out_of_range_panics() {
    let dict: Dictionary<Int32Type> = Dictionary::new();
    dict.lookup(&[0]);
  }

  #[test]
  fn test_bounds_uses_arithmetic_order() {
    let mut dict: Dictionary<Int32Type> = Dictionary::new();
    let idx = dict.insert(&[-5, 100, 3]);
    let (min, max) = dict.bounds(&idx).unwrap();
    assert_eq!(min, -5);
    assert_eq!(max, 100);
  }

  #[test]
  fn test_reset_clears_dictionary() {
    let mut dict: Dictionary<Int32Type> = Dictionary::new();
    dict.insert(&[1, 2, 3]);
    dict.reset();
    assert_eq!(dict.len(), 0);
    let idx = dict.insert(&[9]);
    assert_eq!(idx, vec![0]);
  }
}
