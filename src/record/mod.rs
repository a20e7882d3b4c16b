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

//! Nested records and the Dremel shredding/assembly that translates between
//! them and flat per-column value streams. `Row`/`Field` give an untyped,
//! dynamically-shaped view of a record on top of this crate's `ByteArray`/
//! `Int96` value types, with `Result`-returning error handling throughout.
//!
//! Repetition support is bounded to one level of `REPEATED` nesting per leaf
//! path (a repeated primitive, or a repeated group of non-repeated fields) —
//! the shape the large majority of real Parquet LIST/MAP usages take.
//! Repeated-within-repeated paths are out of scope for both `shred` and
//! `reader`.

pub mod reader;
pub mod shred;

use crate::data_type::{ByteArray, Int96};

/// One leaf or nested value of a reconstructed or about-to-be-shredded
/// record.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
  Null,
  Bool(bool),
  Int32(i32),
  Int64(i64),
  Int96(Int96),
  Float(f32),
  Double(f64),
  ByteArray(ByteArray),
  Group(Row),
  /// The elements of a `REPEATED` path. Each element is either a leaf
  /// `Field` (repeated primitive) or `Field::Group` (repeated group); an
  /// empty `Vec` denotes zero occurrences, distinct from `Field::Null`
  /// meaning an absent optional ancestor above the repetition.
  ListField(Vec<Field>),
}

/// A named, ordered set of fields — one nested record, or the value of one
/// `Field::Group`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
  fields: Vec<(String, Field)>,
}

impl Row {
  pub fn new(fields: Vec<(String, Field)>) -> Self {
    Row { fields }
  }

  pub fn get(&self, name: &str) -> Option<&Field> {
    self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
  }

  pub fn fields(&self) -> &[(String, Field)] {
    &self.fields
  }
}
