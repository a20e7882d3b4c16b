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

//! Row-group merging: given N row groups with identical schemas, produce
//! the single logical sequence of rows that either concatenates them in
//! input order, or k-way merges them under a shared sorting-columns prefix.
//!
//! Operates on already-assembled `record::Row`s rather than raw column
//! chunks, so a merged sequence can be re-shredded into a fresh row group
//! with `record::shred::shred_rows` the same way any other `Row` batch is.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;

use crate::errors::{ParquetError, Result};
use crate::file::metadata::SortingColumn;
use crate::file::reader::RowGroupReader;
use crate::record::reader::RowGroupRowIter;
use crate::record::{Field, Row};
use crate::schema::types::{SchemaDescriptor, Type};

/// One row group's materialized rows, plus the schema/sort-order context
/// needed to merge it against its peers.
pub struct MergeInput {
  rows: Vec<Row>,
  schema_descr: Arc<SchemaDescriptor>,
  sorting_columns: Option<Vec<SortingColumn>>,
}

impl MergeInput {
  pub fn new(rows: Vec<Row>, schema_descr: Arc<SchemaDescriptor>, sorting_columns: Option<Vec<SortingColumn>>) -> Self {
    MergeInput { rows, schema_descr, sorting_columns }
  }

  /// Assembles every row of `row_group` up front, so the merger can work
  /// purely over `Row` values instead of column chunks.
  pub fn from_row_group(row_group: &dyn RowGroupReader) -> Result<Self> {
    let iter = RowGroupRowIter::new(row_group)?;
    let schema_descr = row_group.metadata().schema_descr_ptr();
    let sorting_columns = row_group.metadata().sorting_columns().map(|s| s.to_vec());
    let rows = iter.collect::<Result<Vec<Row>>>()?;
    Ok(MergeInput { rows, schema_descr, sorting_columns })
  }

  pub fn rows(&self) -> &[Row] {
    &self.rows
  }

  pub fn num_rows(&self) -> usize {
    self.rows.len()
  }

  fn root_type(&self) -> &Type {
    self.schema_descr.root_type()
  }
}

/// Every input's root type must match the first input's exactly. Schema
/// reconciliation across genuinely different-but-convertible schemas
/// belongs to `schema::convert`, applied by the caller before merging.
fn validate_schemas_compatible(inputs: &[MergeInput]) -> Result<()> {
  let first = match inputs.first() {
    Some(i) => i.root_type(),
    None => return Ok(()),
  };
  for (i, input) in inputs.iter().enumerate().skip(1) {
    if input.root_type() != first {
      return Err(ParquetError::SchemaMismatch(format!(
        "merge input {} has a schema incompatible with input 0",
        i
      )));
    }
  }
  Ok(())
}

/// Concatenated merge: order-preserving, no sorting. The k-th row of the
/// result is the k-th row of the input sequence in row-group order.
pub fn concatenate(inputs: &[MergeInput]) -> Result<Vec<Row>> {
  validate_schemas_compatible(inputs)?;
  let total: usize = inputs.iter().map(MergeInput::num_rows).sum();
  let mut out = Vec::with_capacity(total);
  for input in inputs {
    out.extend(input.rows.iter().cloned());
  }
  Ok(out)
}

/// Navigates a dotted column path through nested `Row`/`Field::Group`
/// values, the `Row`-level counterpart of `SchemaDescriptor::column`'s path.
/// `None` if any ancestor along the path is absent or itself a list.
fn field_at_path<'a>(row: &'a Row, path: &[String]) -> Option<&'a Field> {
  match path.split_first() {
    None => None,
    Some((head, rest)) => {
      let field = row.get(head)?;
      if rest.is_empty() {
        Some(field)
      } else {
        match field {
          Field::Group(sub) => field_at_path(sub, rest),
          _ => None,
        }
      }
    }
  }
}

fn is_null(field: Option<&Field>) -> bool {
  !matches!(field, Some(f) if *f != Field::Null)
}

/// Orders two same-typed leaf values, per the physical-type comparisons
/// `data_type`'s `PartialOrd` impls already provide (lexicographic byte
/// order for `ByteArray`, numeric for the rest). Mismatched or
/// non-comparable (`Group`/`ListField`) variants compare equal — sorting
/// columns always name primitive leaf paths, so this arm is unreachable on
/// validated input.
fn compare_values(a: &Field, b: &Field) -> Ordering {
  match (a, b) {
    (Field::Bool(x), Field::Bool(y)) => x.cmp(y),
    (Field::Int32(x), Field::Int32(y)) => x.cmp(y),
    (Field::Int64(x), Field::Int64(y)) => x.cmp(y),
    (Field::Int96(x), Field::Int96(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
    (Field::Float(x), Field::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
    (Field::Double(x), Field::Double(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
    (Field::ByteArray(x), Field::ByteArray(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
    _ => Ordering::Equal,
  }
}

/// Compares one sorting column's values between two rows, honoring
/// `descending`/`nulls_first`.
fn compare_field(a: Option<&Field>, b: Option<&Field>, sc: &SortingColumn) -> Ordering {
  let a_null = is_null(a);
  let b_null = is_null(b);
  let null_order = if sc.nulls_first { Ordering::Less } else { Ordering::Greater };
  let ordering = match (a_null, b_null) {
    (true, true) => Ordering::Equal,
    (true, false) => null_order,
    (false, true) => null_order.reverse(),
    (false, false) => compare_values(a.unwrap(), b.unwrap()),
  };
  if sc.descending {
    ordering.reverse()
  } else {
    ordering
  }
}

/// `true` iff `actual` starts with exactly `required` (same column, same
/// direction, same null placement) for every entry of `required`.
fn has_sorting_prefix(actual: &[SortingColumn], required: &[SortingColumn]) -> bool {
  if actual.len() < required.len() {
    return false;
  }
  actual[..required.len()]
    .iter()
    .zip(required.iter())
    .all(|(a, r)| a.column_idx == r.column_idx && a.descending == r.descending && a.nulls_first == r.nulls_first)
}

/// One input's position in the sorted merge: the sorting-column values of
/// its current row (extracted once per advance, so the heap never has to
/// re-walk a `Row`'s fields to compare two cursors), plus enough to fetch
/// and advance past that row when the cursor is popped.
struct Cursor<'a> {
  group_index: usize,
  pos: usize,
  key: Vec<Option<Field>>,
  sorting_columns: &'a [SortingColumn],
}

impl<'a> Cursor<'a> {
  fn new(group_index: usize, pos: usize, input: &MergeInput, paths: &[Vec<String>], sorting_columns: &'a [SortingColumn]) -> Self {
    let key = paths.iter().map(|p| field_at_path(&input.rows[pos], p).cloned()).collect();
    Cursor { group_index, pos, key, sorting_columns }
  }
}

impl<'a> PartialEq for Cursor<'a> {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl<'a> Eq for Cursor<'a> {}

impl<'a> PartialOrd for Cursor<'a> {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl<'a> Ord for Cursor<'a> {
  /// Lexicographic comparison over the sorting-columns prefix; ties are
  /// broken by the lowest originating row-group index, so merging keeps
  /// `BinaryHeap::pop` deterministic and stable across equal rows.
  fn cmp(&self, other: &Self) -> Ordering {
    for (sc, (a, b)) in self.sorting_columns.iter().zip(self.key.iter().zip(other.key.iter())) {
      let ordering = compare_field(a.as_ref(), b.as_ref(), sc);
      if ordering != Ordering::Equal {
        return ordering;
      }
    }
    self.group_index.cmp(&other.group_index)
  }
}

/// Sorted k-way merge: every input must carry `sorting_columns` as a
/// prefix. Maintains a min-heap of cursors, one per row group still
/// producing rows; each step pops the minimum, emits its row, and advances
/// that cursor (dropping it once its row group is exhausted) until the
/// heap empties.
pub fn sorted_merge(inputs: &[MergeInput], sorting_columns: &[SortingColumn]) -> Result<Vec<Row>> {
  validate_schemas_compatible(inputs)?;
  if sorting_columns.is_empty() {
    return Err(ParquetError::SortingColumnsMismatch("sorted merge requires at least one sorting column".to_owned()));
  }

  for (i, input) in inputs.iter().enumerate() {
    let matches = input.sorting_columns.as_deref().map(|s| has_sorting_prefix(s, sorting_columns)).unwrap_or(false);
    if !matches {
      return Err(ParquetError::SortingColumnsMismatch(format!(
        "merge input {} does not carry the required sorting-columns prefix",
        i
      )));
    }
  }

  let schema_descr = inputs[0].schema_descr.clone();
  let paths: Vec<Vec<String>> = sorting_columns
    .iter()
    .map(|sc| {
      let idx = sc.column_idx as usize;
      if idx >= schema_descr.num_columns() {
        return Err(ParquetError::SortingColumnsMismatch(format!(
          "sorting column index {} is out of range for a schema with {} leaf columns",
          sc.column_idx,
          schema_descr.num_columns()
        )));
      }
      Ok(schema_descr.column(idx).path().to_vec())
    })
    .collect::<Result<Vec<_>>>()?;

  let mut heap: BinaryHeap<Reverse<Cursor>> = BinaryHeap::with_capacity(inputs.len());
  for (i, input) in inputs.iter().enumerate() {
    if input.num_rows() > 0 {
      heap.push(Reverse(Cursor::new(i, 0, input, &paths, sorting_columns)));
    }
  }

  let total: usize = inputs.iter().map(MergeInput::num_rows).sum();
  let mut out = Vec::with_capacity(total);

  while let Some(Reverse(cursor)) = heap.pop() {
    let input = &inputs[cursor.group_index];
    out.push(input.rows[cursor.pos].clone());
    let next_pos = cursor.pos + 1;
    if next_pos < input.num_rows() {
      heap.push(Reverse(Cursor::new(cursor.group_index, next_pos, input, &paths, sorting_columns)));
    }
  }

  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::{Repetition, Type as PhysicalType};
  use crate::schema::types::{GroupTypeBuilder, PrimitiveTypeBuilder};

  fn id_schema() -> Arc<SchemaDescriptor> {
    let id = PrimitiveTypeBuilder::new("id", PhysicalType::INT32).with_repetition(Repetition::REQUIRED).build().unwrap();
    let root = Arc::new(GroupTypeBuilder::new("schema").with_fields(vec![Arc::new(id)]).build());
    Arc::new(SchemaDescriptor::new(root))
  }

  fn id_rows(values: &[i32]) -> Vec<Row> {
    values.iter().map(|v| Row::new(vec![("id".to_owned(), Field::Int32(*v))])).collect()
  }

  #[test]
  fn test_concatenate_preserves_input_order() {
    let schema = id_schema();
    let a = MergeInput::new(id_rows(&[1, 2]), schema.clone(), None);
    let b = MergeInput::new(id_rows(&[3, 4]), schema.clone(), None);
    let merged = concatenate(&[a, b]).unwrap();
    let got: Vec<i32> = merged.iter().map(|r| match r.get("id") { Some(Field::Int32(v)) => *v, _ => panic!() }).collect();
    assert_eq!(got, vec![1, 2, 3, 4]);
  }

  #[test]
  fn test_concatenate_rejects_mismatched_schema() {
    let schema_a = id_schema();
    let leaf = PrimitiveTypeBuilder::new("name", PhysicalType::BYTE_ARRAY).build().unwrap();
    let schema_b =
      Arc::new(SchemaDescriptor::new(Arc::new(GroupTypeBuilder::new("schema").with_fields(vec![Arc::new(leaf)]).build())));
    let a = MergeInput::new(id_rows(&[1]), schema_a, None);
    let b = MergeInput::new(vec![Row::new(vec![("name".to_owned(), Field::Null)])], schema_b, None);
    assert!(concatenate(&[a, b]).is_err());
  }

  #[test]
  fn test_sorted_merge_two_ascending_sequences() {
    let schema = id_schema();
    let sc = SortingColumn { column_idx: 0, descending: false, nulls_first: false };
    let a = MergeInput::new(id_rows(&[1, 4, 7]), schema.clone(), Some(vec![sc]));
    let b = MergeInput::new(id_rows(&[2, 3, 8]), schema.clone(), Some(vec![sc]));
    let merged = sorted_merge(&[a, b], &[sc]).unwrap();
    let got: Vec<i32> = merged.iter().map(|r| match r.get("id") { Some(Field::Int32(v)) => *v, _ => panic!() }).collect();
    assert_eq!(got, vec![1, 2, 3, 4, 7, 8]);
  }

  #[test]
  fn test_sorted_merge_breaks_ties_by_input_order() {
    let schema = id_schema();
    let sc = SortingColumn { column_idx: 0, descending: false, nulls_first: false };
    let a = MergeInput::new(id_rows(&[1, 1]), schema.clone(), Some(vec![sc]));
    let b = MergeInput::new(id_rows(&[1]), schema.clone(), Some(vec![sc]));
    let merged = sorted_merge(&[a, b], &[sc]).unwrap();
    assert_eq!(merged.len(), 3);
  }

  #[test]
  fn test_sorted_merge_rejects_missing_sorting_prefix() {
    let schema = id_schema();
    let sc = SortingColumn { column_idx: 0, descending: false, nulls_first: false };
    let a = MergeInput::new(id_rows(&[1]), schema.clone(), Some(vec![sc]));
    let b = MergeInput::new(id_rows(&[2]), schema, None);
    assert!(sorted_merge(&[a, b], &[sc]).is_err());
  }
}
