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

//! Dremel assembly: the inverse of `shred`. Pulls
//! every leaf column's tagged value stream out of a row group's page readers
//! and weaves them back into nested `Row`s, walking the schema tree in the
//! same depth-first order `SchemaDescriptor::columns` assigns column indexes
//! in.
//!
//! Mirrors `record::shred`'s `ColumnWriter` dispatch with the reading-side
//! counterpart (`TypedColumnReader` here, vs. `file::writer::ColumnWriter`
//! there), and inherits the same one-level-of-`REPEATED`-per-leaf-path
//! bound documented on `record`'s module doc.

use std::sync::Arc;

use crate::basic::{Repetition, Type as PhysicalType};
use crate::column::page::PageReader;
use crate::column::reader::{read_tagged_batch, ColumnReader};
use crate::data_type::{
  BoolType, ByteArrayType, DoubleType, FixedLenByteArrayType, FloatType, Int32Type, Int64Type, Int96Type,
};
use crate::errors::Result;
use crate::file::reader::RowGroupReader;
use crate::record::shred::count_leaves;
use crate::record::{Field, Row};
use crate::schema::types::{ColumnDescPtr, Type};

/// How many values `read_tagged_batch` is asked to decode per call; a
/// smaller-than-requested return signals the column chunk is exhausted.
const BATCH_SIZE: usize = 4096;

/// Dispatches to the physical-type-tagged `ColumnReader`, the read-side
/// mirror of `file::writer::ColumnWriter`.
enum TypedColumnReader {
  Bool(ColumnReader<BoolType>),
  Int32(ColumnReader<Int32Type>),
  Int64(ColumnReader<Int64Type>),
  Int96(ColumnReader<Int96Type>),
  Float(ColumnReader<FloatType>),
  Double(ColumnReader<DoubleType>),
  ByteArray(ColumnReader<ByteArrayType>),
  FixedLenByteArray(ColumnReader<FixedLenByteArrayType>),
}

fn make_typed_reader(descr: ColumnDescPtr, column_index: usize, page_reader: Box<dyn PageReader>) -> TypedColumnReader {
  match descr.physical_type() {
    PhysicalType::BOOLEAN => TypedColumnReader::Bool(ColumnReader::new(descr, column_index, page_reader)),
    PhysicalType::INT32 => TypedColumnReader::Int32(ColumnReader::new(descr, column_index, page_reader)),
    PhysicalType::INT64 => TypedColumnReader::Int64(ColumnReader::new(descr, column_index, page_reader)),
    PhysicalType::INT96 => TypedColumnReader::Int96(ColumnReader::new(descr, column_index, page_reader)),
    PhysicalType::FLOAT => TypedColumnReader::Float(ColumnReader::new(descr, column_index, page_reader)),
    PhysicalType::DOUBLE => TypedColumnReader::Double(ColumnReader::new(descr, column_index, page_reader)),
    PhysicalType::BYTE_ARRAY => TypedColumnReader::ByteArray(ColumnReader::new(descr, column_index, page_reader)),
    PhysicalType::FIXED_LEN_BYTE_ARRAY => {
      TypedColumnReader::FixedLenByteArray(ColumnReader::new(descr, column_index, page_reader))
    }
  }
}

/// One materialized leaf-column slot. `field` is `Field::Null` whenever the
/// slot's definition level fell short of the leaf's max.
#[derive(Clone)]
struct LeafValue {
  field: Field,
  rep: i16,
  def: i16,
}

macro_rules! read_all_typed {
  ($reader:expr, $to_field:expr) => {{
    let mut out = Vec::new();
    loop {
      let batch = read_tagged_batch($reader, BATCH_SIZE)?;
      if batch.is_empty() {
        break;
      }
      let exhausted = batch.len() < BATCH_SIZE;
      for v in batch {
        let rep = v.repetition_level();
        let def = v.definition_level();
        let field = match v.into_value() {
          Some(val) => ($to_field)(val),
          None => Field::Null,
        };
        out.push(LeafValue { field, rep, def });
      }
      if exhausted {
        break;
      }
    }
    out
  }};
}

fn read_all(reader: &mut TypedColumnReader) -> Result<Vec<LeafValue>> {
  Ok(match reader {
    TypedColumnReader::Bool(r) => read_all_typed!(r, Field::Bool),
    TypedColumnReader::Int32(r) => read_all_typed!(r, Field::Int32),
    TypedColumnReader::Int64(r) => read_all_typed!(r, Field::Int64),
    TypedColumnReader::Int96(r) => read_all_typed!(r, Field::Int96),
    TypedColumnReader::Float(r) => read_all_typed!(r, Field::Float),
    TypedColumnReader::Double(r) => read_all_typed!(r, Field::Double),
    TypedColumnReader::ByteArray(r) => read_all_typed!(r, Field::ByteArray),
    TypedColumnReader::FixedLenByteArray(r) => read_all_typed!(r, Field::ByteArray),
  })
}

/// The slot index, among one leaf's materialized values, where each logical
/// row begins — the positions at which `rep == 0`, since the first
/// value of a repeated run always carries repetition level 0. Every row
/// contributes exactly one such slot per leaf, real element or null
/// placeholder, so this has exactly as many entries as the row group has
/// rows.
fn row_starts(values: &[LeafValue]) -> Vec<usize> {
  values.iter().enumerate().filter(|(_, v)| v.rep == 0).map(|(i, _)| i).collect()
}

struct LeafCursor {
  values: Vec<LeafValue>,
  pos: usize,
}

impl LeafCursor {
  fn peek(&self) -> Option<&LeafValue> {
    self.values.get(self.pos)
  }

  fn advance(&mut self) -> Field {
    let field = self.values[self.pos].field.clone();
    self.pos += 1;
    field
  }
}

/// Discards one already-shredded subtree's worth of slots (one per leaf)
/// without materializing a value — the assembly-side counterpart of
/// `shred::emit_null_subtree`.
fn skip_subtree(node: &Type, cursors: &mut [LeafCursor], leaf_idx: &mut usize) {
  match node {
    Type::Primitive { .. } => {
      let idx = *leaf_idx;
      *leaf_idx += 1;
      cursors[idx].pos += 1;
    }
    Type::Group { fields, .. } => {
      for field in fields {
        skip_subtree(field, cursors, leaf_idx);
      }
    }
  }
}

fn assemble_group(
  fields: &[Arc<Type>],
  cursors: &mut [LeafCursor],
  leaf_idx: &mut usize,
  rep_ctx: i16,
  def_ctx: i16,
) -> Row {
  let mut out = Vec::with_capacity(fields.len());
  for field in fields {
    let value = assemble_field(field, cursors, leaf_idx, rep_ctx, def_ctx);
    out.push((field.name().to_owned(), value));
  }
  Row::new(out)
}

/// Assembles one schema node's `Field`, advancing `leaf_idx`/the relevant
/// leaf cursors past however many slots it consumes. `rep_ctx`/`def_ctx` are
/// the repetition/definition depth accumulated from ancestors *above* `node`
/// — the same bookkeeping `shred::shred_node` carries on the write side,
/// just read back instead of written.
fn assemble_field(node: &Type, cursors: &mut [LeafCursor], leaf_idx: &mut usize, rep_ctx: i16, def_ctx: i16) -> Field {
  if node.basic_info().repetition() == Some(Repetition::REPEATED) {
    return assemble_repeated(node, cursors, leaf_idx, rep_ctx, def_ctx);
  }

  let is_optional = node.basic_info().repetition() == Some(Repetition::OPTIONAL);
  let own_def = if is_optional { def_ctx + 1 } else { def_ctx };

  match node {
    Type::Primitive { .. } => {
      // A leaf's own Null-vs-value decision is already baked into its
      // `LeafValue` (`read_tagged_batch` compares against the leaf's own max
      // definition level), so no threshold comparison is needed here.
      let idx = *leaf_idx;
      *leaf_idx += 1;
      cursors[idx].advance()
    }
    Type::Group { fields, .. } => {
      let leftmost = *leaf_idx;
      let present = cursors[leftmost].peek().map(|lv| lv.def >= own_def).unwrap_or(false);
      if present {
        Field::Group(assemble_group(fields, cursors, leaf_idx, rep_ctx, own_def))
      } else {
        skip_subtree(node, cursors, leaf_idx);
        Field::Null
      }
    }
  }
}

/// Assembles a `REPEATED` node's elements. `node` describes the shape of one
/// element (a leaf type for a repeated primitive, or the field list for a
/// repeated group); the element's own span of leaf columns is therefore
/// fixed and is replayed unchanged for every occurrence.
fn assemble_repeated(node: &Type, cursors: &mut [LeafCursor], leaf_idx: &mut usize, rep_ctx: i16, def_ctx: i16) -> Field {
  let own_rep = rep_ctx + 1;
  let own_def = def_ctx + 1;
  let leftmost = *leaf_idx;

  let has_first = cursors[leftmost].peek().map(|lv| lv.def >= own_def).unwrap_or(false);
  if !has_first {
    skip_subtree(node, cursors, leaf_idx);
    return Field::ListField(Vec::new());
  }

  let mut elements = Vec::new();
  let mut span = 1usize;
  loop {
    *leaf_idx = leftmost;
    match node {
      Type::Primitive { .. } => {
        *leaf_idx = leftmost + 1;
        elements.push(cursors[leftmost].advance());
      }
      Type::Group { fields, .. } => {
        let row = assemble_group(fields, cursors, leaf_idx, own_rep, own_def);
        elements.push(Field::Group(row));
      }
    }
    span = *leaf_idx - leftmost;
    match cursors[leftmost].peek() {
      Some(lv) if lv.rep >= own_rep => continue,
      _ => break,
    }
  }
  *leaf_idx = leftmost + span;
  Field::ListField(elements)
}

/// Reassembles one row group's rows, materializing every leaf column's
/// value stream up front and then weaving
/// them together one row at a time. Supports `seek_to_row` by repositioning
/// each leaf's cursor to the slot where the target row begins — correct for
/// any repetition shape, though (unlike the page-skipping `ColumnChunk`
/// path) it does not avoid decoding pages that end up
/// skipped.
pub struct RowGroupRowIter {
  root: Arc<Type>,
  cursors: Vec<LeafCursor>,
  row_starts: Vec<Vec<usize>>,
  num_rows: i64,
  row_pos: i64,
}

impl RowGroupRowIter {
  pub fn new(row_group: &dyn RowGroupReader) -> Result<Self> {
    let schema_descr = row_group.metadata().schema_descr_ptr();
    let root = schema_descr.root_type_arc();
    let num_rows = row_group.metadata().num_rows();
    let num_columns = row_group.num_columns();

    let mut cursors = Vec::with_capacity(num_columns);
    let mut starts = Vec::with_capacity(num_columns);
    for i in 0..num_columns {
      let descr = schema_descr.column(i).clone();
      let page_reader = row_group.get_column_page_reader(i)?;
      let mut typed = make_typed_reader(descr, i, page_reader);
      let values = read_all(&mut typed)?;
      starts.push(row_starts(&values));
      cursors.push(LeafCursor { values, pos: 0 });
    }

    debug_assert_eq!(count_leaves(&root), cursors.len());
    Ok(RowGroupRowIter { root, cursors, row_starts: starts, num_rows, row_pos: 0 })
  }

  pub fn num_rows(&self) -> i64 {
    self.num_rows
  }

  /// Repositions every leaf cursor to row `row`.
  /// Forward or backward seeks within `[0, num_rows]` are both
  /// supported.
  pub fn seek_to_row(&mut self, row: i64) -> Result<()> {
    if row < 0 || row > self.num_rows {
      return Err(general_err!("row {} out of range for row group of {} rows", row, self.num_rows));
    }
    for (cursor, starts) in self.cursors.iter_mut().zip(self.row_starts.iter()) {
      cursor.pos = starts.get(row as usize).copied().unwrap_or(cursor.values.len());
    }
    self.row_pos = row;
    Ok(())
  }
}

impl Iterator for RowGroupRowIter {
  type Item = Result<Row>;

  fn next(&mut self) -> Option<Result<Row>> {
    if self.row_pos >= self.num_rows {
      return None;
    }
    let mut leaf_idx = 0usize;
    let row = assemble_group(self.root.get_fields(), &mut self.cursors, &mut leaf_idx, 0, 0);
    self.row_pos += 1;
    Some(Ok(row))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data_type::ByteArray;
  use crate::file::reader::{FileReader, SerializedFileReader};
  use crate::file::writer::{SerializedFileWriter, WriterProperties};
  use crate::record::shred::shred_rows;
  use crate::schema::types::{GroupTypeBuilder, PrimitiveTypeBuilder};

  fn flat_schema() -> Arc<Type> {
    let a = PrimitiveTypeBuilder::new("a", PhysicalType::INT32).build().unwrap();
    let b = PrimitiveTypeBuilder::new("b", PhysicalType::INT32).with_repetition(Repetition::OPTIONAL).build().unwrap();
    Arc::new(GroupTypeBuilder::new("schema").with_fields(vec![Arc::new(a), Arc::new(b)]).build())
  }

  fn write_rows(root: &Arc<Type>, rows: &[Row]) -> Vec<u8> {
    let props = Arc::new(WriterProperties::builder().set_dictionary_enabled(false).build());
    let mut buf: Vec<u8> = Vec::new();
    {
      let mut writer = SerializedFileWriter::new(&mut buf, root.clone(), props).unwrap();
      let mut rgw = writer.next_row_group().unwrap();
      let mut writers = Vec::new();
      while let Some(w) = rgw.next_column().unwrap() {
        writers.push(w);
      }
      shred_rows(root, rows, &mut writers).unwrap();
      for w in writers {
        rgw.close_column(w).unwrap();
      }
      rgw.close().unwrap();
      writer.close().unwrap();
    }
    buf
  }

  #[test]
  fn test_round_trip_flat_optional_rows() {
    let root = flat_schema();
    let rows = vec![
      Row::new(vec![("a".to_owned(), Field::Int32(0)), ("b".to_owned(), Field::Int32(7))]),
      Row::new(vec![("a".to_owned(), Field::Int32(1)), ("b".to_owned(), Field::Null)]),
      Row::new(vec![("a".to_owned(), Field::Int32(2)), ("b".to_owned(), Field::Int32(-3))]),
    ];
    let buf = write_rows(&root, &rows);

    let reader = SerializedFileReader::new(buf).unwrap();
    let rg_reader = reader.get_row_group(0).unwrap();
    let iter = RowGroupRowIter::new(rg_reader.as_ref()).unwrap();
    assert_eq!(iter.num_rows(), 3);
    let got: Vec<Row> = iter.map(|r| r.unwrap()).collect();
    assert_eq!(got, rows);
  }

  fn phone_book_schema() -> Arc<Type> {
    let number = PrimitiveTypeBuilder::new("number", PhysicalType::BYTE_ARRAY).build().unwrap();
    let kind = PrimitiveTypeBuilder::new("kind", PhysicalType::INT32).with_repetition(Repetition::OPTIONAL).build().unwrap();
    let phones = GroupTypeBuilder::new("phones")
      .with_repetition(Some(Repetition::REPEATED))
      .with_fields(vec![Arc::new(number), Arc::new(kind)])
      .build();
    let id = PrimitiveTypeBuilder::new("id", PhysicalType::INT32).build().unwrap();
    Arc::new(GroupTypeBuilder::new("schema").with_fields(vec![Arc::new(id), Arc::new(phones)]).build())
  }

  fn phone(number: &str, kind: Option<i32>) -> Field {
    Field::Group(Row::new(vec![
      ("number".to_owned(), Field::ByteArray(ByteArray::from(number))),
      ("kind".to_owned(), kind.map(Field::Int32).unwrap_or(Field::Null)),
    ]))
  }

  #[test]
  fn test_round_trip_repeated_group() {
    let root = phone_book_schema();
    let rows = vec![
      Row::new(vec![
        ("id".to_owned(), Field::Int32(1)),
        ("phones".to_owned(), Field::ListField(vec![phone("555-1234", Some(1)), phone("555-5678", None)])),
      ]),
      Row::new(vec![("id".to_owned(), Field::Int32(2)), ("phones".to_owned(), Field::ListField(Vec::new()))]),
      Row::new(vec![("id".to_owned(), Field::Int32(3)), ("phones".to_owned(), Field::ListField(vec![phone("555-0000", None)]))]),
    ];
    let buf = write_rows(&root, &rows);

    let reader = SerializedFileReader::new(buf).unwrap();
    let rg_reader = reader.get_row_group(0).unwrap();
    let mut iter = RowGroupRowIter::new(rg_reader.as_ref()).unwrap();
    assert_eq!(iter.num_rows(), 3);

    let got: Vec<Row> = (&mut iter).map(|r| r.unwrap()).collect();
    assert_eq!(got, rows);

    iter.seek_to_row(2).unwrap();
    let third = iter.next().unwrap().unwrap();
    assert_eq!(third, rows[2]);
    assert!(iter.next().is_none());
  }
}
