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

//! Dremel shredding: walks a nested `Row` beside
//! the schema tree, producing a per-leaf sequence of (value, repetition
//! level, definition level) slots in schema order, then hands each leaf's
//! slots to its `ColumnWriter`.

use crate::basic::Repetition;
use crate::errors::Result;
use crate::file::writer::ColumnWriter;
use crate::record::{Field, Row};
use crate::schema::types::Type;

/// One shredded slot for a single leaf column: `None` denotes a null (an
/// absent optional/repeated ancestor, or an explicit `Field::Null`).
struct Slot {
  value: Option<Field>,
  rep: i16,
  def: i16,
}

/// Shreds `rows` against `root` (the message/group type the rows are
/// shaped as) into one `Vec<Slot>` per leaf column, in the same
/// depth-first order as `SchemaDescriptor::columns`.
fn shred_into_slots(root: &Type, rows: &[Row]) -> Vec<Vec<Slot>> {
  let num_leaves = count_leaves(root);
  let mut columns: Vec<Vec<Slot>> = (0..num_leaves).map(|_| Vec::with_capacity(rows.len())).collect();
  for row in rows {
    let mut column_index = 0usize;
    for field in root_fields(root) {
      shred_node(field.as_ref(), &mut column_index, row.get(field.name()), 0, 0, &mut columns);
    }
  }
  columns
}

pub(crate) fn count_leaves(node: &Type) -> usize {
  match node {
    Type::Primitive { .. } => 1,
    Type::Group { fields, .. } => fields.iter().map(|f| count_leaves(f)).sum(),
  }
}

fn root_fields(root: &Type) -> &[std::sync::Arc<Type>] {
  match root {
    Type::Group { fields, .. } => fields,
    Type::Primitive { .. } => &[],
  }
}

fn shred_node(
  node: &Type,
  column_index: &mut usize,
  field: Option<&Field>,
  rep_level: i16,
  def_level: i16,
  columns: &mut [Vec<Slot>],
) {
  if node.basic_info().repetition() == Some(Repetition::REPEATED) {
    let elements: &[Field] = match field {
      Some(Field::ListField(v)) if !v.is_empty() => v,
      _ => {
        emit_null_subtree(node, column_index, rep_level, def_level, columns);
        return;
      }
    };
    let own_rep_depth = rep_level + 1;
    for (i, elem) in elements.iter().enumerate() {
      let element_rep = if i == 0 { rep_level } else { own_rep_depth };
      let element_def = def_level + 1;
      match node {
        Type::Primitive { .. } => {
          let idx = *column_index;
          *column_index += 1;
          columns[idx].push(Slot { value: Some(elem.clone()), rep: element_rep, def: element_def });
        }
        Type::Group { fields, .. } => {
          let row = match elem {
            Field::Group(r) => Some(r),
            _ => None,
          };
          for child in fields {
            shred_node(child.as_ref(), column_index, row.and_then(|r| r.get(child.name())), element_rep, element_def, columns);
          }
        }
      }
    }
    return;
  }

  match node {
    Type::Primitive { .. } => {
      let idx = *column_index;
      *column_index += 1;
      let is_optional = node.basic_info().repetition() == Some(Repetition::OPTIONAL);
      match field {
        None | Some(Field::Null) => columns[idx].push(Slot { value: None, rep: rep_level, def: def_level }),
        Some(v) => {
          let def = if is_optional { def_level + 1 } else { def_level };
          columns[idx].push(Slot { value: Some(v.clone()), rep: rep_level, def });
        }
      }
    }
    Type::Group { fields, .. } => {
      let is_optional = node.basic_info().repetition() == Some(Repetition::OPTIONAL);
      match field {
        Some(Field::Group(row)) => {
          let def = if is_optional { def_level + 1 } else { def_level };
          for child in fields {
            shred_node(child.as_ref(), column_index, row.get(child.name()), rep_level, def, columns);
          }
        }
        _ => emit_null_subtree(node, column_index, rep_level, def_level, columns),
      }
    }
  }
}

fn emit_null_subtree(node: &Type, column_index: &mut usize, rep_level: i16, def_level: i16, columns: &mut [Vec<Slot>]) {
  match node {
    Type::Primitive { .. } => {
      let idx = *column_index;
      *column_index += 1;
      columns[idx].push(Slot { value: None, rep: rep_level, def: def_level });
    }
    Type::Group { fields, .. } => {
      for child in fields {
        emit_null_subtree(child.as_ref(), column_index, rep_level, def_level, columns);
      }
    }
  }
}

macro_rules! write_typed_column {
  ($writer:expr, $variant:ident, $slots:expr, $extract:expr) => {{
    let w = $crate::get_typed_column_writer_mut!($writer, $variant);
    let max_rep = $slots.iter().map(|s: &Slot| s.rep).max().unwrap_or(0);
    let def_levels: Vec<i16> = $slots.iter().map(|s| s.def).collect();
    let rep_levels: Vec<i16> = $slots.iter().map(|s| s.rep).collect();
    let mut values = Vec::new();
    for slot in $slots.iter() {
      if let Some(v) = &slot.value {
        values.push(($extract)(v)?);
      }
    }
    let rep_arg = if max_rep > 0 { Some(rep_levels.as_slice()) } else { None };
    w.write_batch(&values, Some(def_levels.as_slice()), rep_arg)?;
  }};
}

/// Shreds `rows` (shaped as `root`) and writes every leaf's slots into its
/// matching `ColumnWriter`, in schema order. `writers` must have one entry
/// per leaf column, in the same order as `SchemaDescriptor::columns`.
pub fn shred_rows(root: &Type, rows: &[Row], writers: &mut [ColumnWriter]) -> Result<()> {
  let columns = shred_into_slots(root, rows);
  if columns.len() != writers.len() {
    return Err(general_err!(
      "schema has {} leaf columns but {} writers were supplied",
      columns.len(),
      writers.len()
    ));
  }
  for (writer, slots) in writers.iter_mut().zip(columns.iter()) {
    match writer {
      ColumnWriter::BoolColumnWriter(_) => write_typed_column!(writer, BoolColumnWriter, slots, |v: &Field| match v {
        Field::Bool(b) => Ok::<bool, crate::errors::ParquetError>(*b),
        other => Err(general_err!("expected Bool field, found {:?}", other)),
      }),
      ColumnWriter::Int32ColumnWriter(_) => write_typed_column!(writer, Int32ColumnWriter, slots, |v: &Field| match v {
        Field::Int32(n) => Ok::<i32, crate::errors::ParquetError>(*n),
        other => Err(general_err!("expected Int32 field, found {:?}", other)),
      }),
      ColumnWriter::Int64ColumnWriter(_) => write_typed_column!(writer, Int64ColumnWriter, slots, |v: &Field| match v {
        Field::Int64(n) => Ok::<i64, crate::errors::ParquetError>(*n),
        other => Err(general_err!("expected Int64 field, found {:?}", other)),
      }),
      ColumnWriter::Int96ColumnWriter(_) => {
        write_typed_column!(writer, Int96ColumnWriter, slots, |v: &Field| match v {
          Field::Int96(n) => Ok::<crate::data_type::Int96, crate::errors::ParquetError>(n.clone()),
          other => Err(general_err!("expected Int96 field, found {:?}", other)),
        })
      }
      ColumnWriter::FloatColumnWriter(_) => write_typed_column!(writer, FloatColumnWriter, slots, |v: &Field| match v {
        Field::Float(n) => Ok::<f32, crate::errors::ParquetError>(*n),
        other => Err(general_err!("expected Float field, found {:?}", other)),
      }),
      ColumnWriter::DoubleColumnWriter(_) => write_typed_column!(writer, DoubleColumnWriter, slots, |v: &Field| match v {
        Field::Double(n) => Ok::<f64, crate::errors::ParquetError>(*n),
        other => Err(general_err!("expected Double field, found {:?}", other)),
      }),
      ColumnWriter::ByteArrayColumnWriter(_) => {
        write_typed_column!(writer, ByteArrayColumnWriter, slots, |v: &Field| match v {
          Field::ByteArray(b) => Ok::<crate::data_type::ByteArray, crate::errors::ParquetError>(b.clone()),
          other => Err(general_err!("expected ByteArray field, found {:?}", other)),
        })
      }
      ColumnWriter::FixedLenByteArrayColumnWriter(_) => {
        write_typed_column!(writer, FixedLenByteArrayColumnWriter, slots, |v: &Field| match v {
          Field::ByteArray(b) => Ok::<crate::data_type::ByteArray, crate::errors::ParquetError>(b.clone()),
          other => Err(general_err!("expected ByteArray field, found {:?}", other)),
        })
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::Type as PhysicalType;
  use crate::file::writer::{get_column_writer, ColumnProperties};
  use crate::schema::types::{GroupTypeBuilder, PrimitiveTypeBuilder, SchemaDescriptor};
  use std::sync::Arc;

  #[test]
  fn test_shred_flat_optional_row() {
    let a = PrimitiveTypeBuilder::new("a", PhysicalType::INT32).build().unwrap();
    let b = PrimitiveTypeBuilder::new("b", PhysicalType::INT32).with_repetition(Repetition::OPTIONAL).build().unwrap();
    let root = GroupTypeBuilder::new("schema").with_fields(vec![Arc::new(a), Arc::new(b)]).build();
    let schema_descr = SchemaDescriptor::new(Arc::new(root.clone()));

    let rows = vec![
      Row::new(vec![("a".to_owned(), Field::Int32(1)), ("b".to_owned(), Field::Int32(10))]),
      Row::new(vec![("a".to_owned(), Field::Int32(2)), ("b".to_owned(), Field::Null)]),
    ];

    let mut writers = Vec::new();
    for i in 0..schema_descr.num_columns() {
      writers.push(get_column_writer(schema_descr.column(i).clone(), ColumnProperties::default(), 1024, 1).unwrap());
    }
    shred_rows(&root, &rows, &mut writers).unwrap();

    let results: Vec<_> = writers.into_iter().map(|w| w.close().unwrap()).collect();
    assert_eq!(results[0].num_rows, 2);
    assert_eq!(results[1].num_rows, 2);
  }
}
