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

//! Schema conversion: given a target schema and a source
//! schema, build a static per-leaf plan for reshaping rows from one into the
//! other. A `Conversion` never touches data itself; `record::reader` drives
//! it while reassembling rows.
//!
//! Every target leaf is classified once, up front, into one of three
//! strategies (direct copy, type-coercing rewrite, or fill-with-null), and
//! rows are then reshaped by replaying that classification rather than by
//! comparing schemas leaf-by-leaf on every row.

use std::sync::Arc;

use crate::errors::{ParquetError, Result};
use crate::file::metadata::SortingColumn;
use crate::schema::types::{ColumnDescriptor, ConvertedType, LogicalType, SchemaDescriptor, Type};
use crate::basic::Type as PhysicalType;

/// A value-level rewrite needed when a target leaf's physical type differs
/// from its matching source leaf: the rewrite validates that each source
/// value fits in the target's range before converting its physical payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
  Int32ToInt64,
  Int64ToInt32,
  Int32ToUtf8,
  Utf8ToInt32,
  Int64ToUtf8,
  Utf8ToInt64,
  ByteArrayToFixedLenByteArray,
  FixedLenByteArrayToByteArray,
}

impl Coercion {
  pub fn coerce_i32_to_i64(v: i32) -> i64 {
    v as i64
  }

  pub fn coerce_i64_to_i32(v: i64) -> Result<i32> {
    i32::try_from(v).map_err(|_| general_err!("value {} out of range for INT32", v))
  }

  pub fn coerce_i32_to_utf8(v: i32) -> Vec<u8> {
    v.to_string().into_bytes()
  }

  pub fn coerce_utf8_to_i32(bytes: &[u8]) -> Result<i32> {
    std::str::from_utf8(bytes)
      .ok()
      .and_then(|s| s.parse::<i32>().ok())
      .ok_or_else(|| general_err!("could not parse {:?} as INT32", bytes))
  }

  pub fn coerce_i64_to_utf8(v: i64) -> Vec<u8> {
    v.to_string().into_bytes()
  }

  pub fn coerce_utf8_to_i64(bytes: &[u8]) -> Result<i64> {
    std::str::from_utf8(bytes)
      .ok()
      .and_then(|s| s.parse::<i64>().ok())
      .ok_or_else(|| general_err!("could not parse {:?} as INT64", bytes))
  }

  pub fn coerce_byte_array_to_fixed_len(bytes: &[u8], length: i32) -> Result<Vec<u8>> {
    if bytes.len() as i32 != length {
      return Err(ParquetError::ConvertNotSupported(format!(
        "byte array of length {} does not match fixed length {}",
        bytes.len(),
        length
      )));
    }
    Ok(bytes.to_vec())
  }

  pub fn coerce_fixed_len_to_byte_array(bytes: &[u8]) -> Vec<u8> {
    bytes.to_vec()
  }
}

fn is_stringish(descr: &ColumnDescriptor) -> bool {
  let info = descr.self_type().basic_info();
  info.converted_type() == ConvertedType::UTF8 || matches!(info.logical_type(), Some(LogicalType::String))
}

/// What to do for one target leaf when assembling a row from a source row.
#[derive(Debug, Clone)]
pub enum ColumnMapping {
  /// Same path, same physical kind: copy the source leaf's values verbatim.
  Direct { source_index: usize },
  /// Same path, differing physical kind: apply `coercion` to each value.
  Coerce { source_index: usize, coercion: Coercion },
  /// No matching path in the source schema: synthesize `numRows` nulls at
  /// the closest surviving ancestor's repetition/definition levels.
  Fill { ancestor_max_rep_level: i16, ancestor_max_def_level: i16 },
}

/// A precomputed plan for reshaping rows shaped as `source` into rows
/// shaped as `target`.
#[derive(Debug, Clone)]
pub struct Conversion {
  target: Arc<SchemaDescriptor>,
  source: Arc<SchemaDescriptor>,
  mappings: Vec<ColumnMapping>,
}

impl Conversion {
  /// Builds the mapping for every leaf of `target`. Paths present in
  /// `source` but absent from `target` are simply never visited — they are
  /// dropped.
  pub fn new(target: Arc<SchemaDescriptor>, source: Arc<SchemaDescriptor>) -> Result<Self> {
    let mut mappings = Vec::with_capacity(target.num_columns());
    for i in 0..target.num_columns() {
      let target_leaf = target.column(i);
      mappings.push(match source.column_index_of(target_leaf.path()) {
        Some(source_index) => {
          let source_leaf = source.column(source_index);
          match detect_coercion(source_leaf, target_leaf)? {
            None => ColumnMapping::Direct { source_index },
            Some(coercion) => ColumnMapping::Coerce { source_index, coercion },
          }
        }
        None => {
          let (ancestor_max_rep_level, ancestor_max_def_level) =
            ancestor_levels(source.root_type(), target_leaf.path());
          ColumnMapping::Fill { ancestor_max_rep_level, ancestor_max_def_level }
        }
      });
    }
    Ok(Conversion { target, source, mappings })
  }

  pub fn target_schema(&self) -> &Arc<SchemaDescriptor> {
    &self.target
  }

  pub fn source_schema(&self) -> &Arc<SchemaDescriptor> {
    &self.source
  }

  pub fn mapping(&self, target_index: usize) -> &ColumnMapping {
    &self.mappings[target_index]
  }

  pub fn mappings(&self) -> &[ColumnMapping] {
    &self.mappings
  }

  /// Carries `source_sorting` across the conversion, truncating at the
  /// first column whose path does not survive into the target schema.
  pub fn convert_sorting_columns(&self, source_sorting: &[SortingColumn]) -> Vec<SortingColumn> {
    let mut converted = Vec::new();
    for sc in source_sorting {
      let path = self.source.column(sc.column_idx as usize).path();
      match self.target.column_index_of(path) {
        Some(target_index) => converted.push(SortingColumn {
          column_idx: target_index as i32,
          descending: sc.descending,
          nulls_first: sc.nulls_first,
        }),
        None => break,
      }
    }
    converted
  }
}

fn detect_coercion(source: &ColumnDescriptor, target: &ColumnDescriptor) -> Result<Option<Coercion>> {
  let (sp, tp) = (source.physical_type(), target.physical_type());
  if sp == tp {
    if sp == PhysicalType::FIXED_LEN_BYTE_ARRAY && source.type_length() != target.type_length() {
      return Err(ParquetError::ConvertNotSupported(format!(
        "fixed-length byte array length mismatch: source {} vs target {}",
        source.type_length(),
        target.type_length()
      )));
    }
    return Ok(None);
  }
  use PhysicalType::*;
  let coercion = match (sp, tp) {
    (INT32, INT64) => Coercion::Int32ToInt64,
    (INT64, INT32) => Coercion::Int64ToInt32,
    (INT32, BYTE_ARRAY) if is_stringish(target) => Coercion::Int32ToUtf8,
    (BYTE_ARRAY, INT32) if is_stringish(source) => Coercion::Utf8ToInt32,
    (INT64, BYTE_ARRAY) if is_stringish(target) => Coercion::Int64ToUtf8,
    (BYTE_ARRAY, INT64) if is_stringish(source) => Coercion::Utf8ToInt64,
    (BYTE_ARRAY, FIXED_LEN_BYTE_ARRAY) => Coercion::ByteArrayToFixedLenByteArray,
    (FIXED_LEN_BYTE_ARRAY, BYTE_ARRAY) => Coercion::FixedLenByteArrayToByteArray,
    _ => {
      return Err(ParquetError::ConvertNotSupported(format!(
        "cannot convert {:?} column {:?} to {:?} column {:?}",
        sp,
        source.path(),
        tp,
        target.path()
      )))
    }
  };
  Ok(Some(coercion))
}

/// Walks `path` down the source tree as far as matching field names exist,
/// accumulating repetition/definition levels along the way, and returns the
/// levels of the deepest ancestor actually present (inheriting the closest
/// surviving ancestor's repetition
/// structure).
fn ancestor_levels(source_root: &Type, path: &[String]) -> (i16, i16) {
  let mut node = source_root;
  let mut max_rep_level = 0i16;
  let mut max_def_level = 0i16;
  for (depth, segment) in path.iter().enumerate() {
    let Type::Group { fields, .. } = node else {
      break;
    };
    let Some(next) = fields.iter().find(|f| f.name() == segment.as_str()) else {
      break;
    };
    match next.basic_info().repetition() {
      Some(crate::basic::Repetition::OPTIONAL) => max_def_level += 1,
      Some(crate::basic::Repetition::REPEATED) => {
        max_def_level += 1;
        max_rep_level += 1;
      }
      _ => {}
    }
    if depth + 1 == path.len() || next.is_primitive() {
      break;
    }
    node = next.as_ref();
  }
  (max_rep_level, max_def_level)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::Repetition;
  use crate::schema::types::{GroupTypeBuilder, PrimitiveTypeBuilder};

  fn schema(fields: Vec<Type>) -> Arc<SchemaDescriptor> {
    let fields = fields.into_iter().map(Arc::new).collect();
    let root = GroupTypeBuilder::new("schema").with_fields(fields).build();
    Arc::new(SchemaDescriptor::new(Arc::new(root)))
  }

  fn primitive(name: &str, physical_type: PhysicalType, repetition: Repetition) -> Type {
    PrimitiveTypeBuilder::new(name, physical_type).with_repetition(repetition).build().unwrap()
  }

  #[test]
  fn test_direct_mapping() {
    let source = schema(vec![primitive("a", PhysicalType::INT32, Repetition::REQUIRED)]);
    let target = schema(vec![primitive("a", PhysicalType::INT32, Repetition::REQUIRED)]);
    let conversion = Conversion::new(target, source).unwrap();
    assert!(matches!(conversion.mapping(0), ColumnMapping::Direct { source_index: 0 }));
  }

  #[test]
  fn test_int_widening_coercion() {
    let source = schema(vec![primitive("a", PhysicalType::INT32, Repetition::REQUIRED)]);
    let target = schema(vec![primitive("a", PhysicalType::INT64, Repetition::REQUIRED)]);
    let conversion = Conversion::new(target, source).unwrap();
    assert!(matches!(
      conversion.mapping(0),
      ColumnMapping::Coerce { source_index: 0, coercion: Coercion::Int32ToInt64 }
    ));
  }

  #[test]
  fn test_unsupported_coercion_errors() {
    let source = schema(vec![primitive("a", PhysicalType::FLOAT, Repetition::REQUIRED)]);
    let target = schema(vec![primitive("a", PhysicalType::BOOLEAN, Repetition::REQUIRED)]);
    assert!(matches!(Conversion::new(target, source), Err(ParquetError::ConvertNotSupported(_))));
  }

  #[test]
  fn test_missing_column_fills_with_ancestor_levels() {
    let source = schema(vec![primitive("a", PhysicalType::INT32, Repetition::REQUIRED)]);
    let target = schema(vec![
      primitive("a", PhysicalType::INT32, Repetition::REQUIRED),
      primitive("b", PhysicalType::INT32, Repetition::OPTIONAL),
    ]);
    let conversion = Conversion::new(target, source).unwrap();
    match conversion.mapping(1) {
      ColumnMapping::Fill { ancestor_max_rep_level, ancestor_max_def_level } => {
        assert_eq!(*ancestor_max_rep_level, 0);
        assert_eq!(*ancestor_max_def_level, 0);
      }
      other => panic!("expected Fill mapping, got {:?}", other),
    }
  }

  #[test]
  fn test_sorting_columns_truncated_at_first_missing() {
    let source = schema(vec![
      primitive("a", PhysicalType::INT32, Repetition::REQUIRED),
      primitive("b", PhysicalType::INT32, Repetition::REQUIRED),
    ]);
    let target = schema(vec![primitive("a", PhysicalType::INT32, Repetition::REQUIRED)]);
    let conversion = Conversion::new(target, source).unwrap();
    let source_sorting = vec![
      SortingColumn { column_idx: 0, descending: false, nulls_first: false },
      SortingColumn { column_idx: 1, descending: false, nulls_first: false },
    ];
    let converted = conversion.convert_sorting_columns(&source_sorting);
    assert_eq!(converted.len(), 1);
    assert_eq!(converted[0].column_idx, 0);
  }
}
