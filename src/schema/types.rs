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

//! The schema tree: groups, leaves, their logical annotations, and the
//! per-leaf derived quantities (path, column index, max repetition/
//! definition level) a schema computes once at construction time.
//!
//! `Type` models the raw group/primitive tree as parsed from (or destined
//! for) Thrift `SchemaElement`s; `SchemaDescriptor` wraps it with the
//! flattened leaf list and per-leaf derived quantities that column readers
//! and writers actually index into.

use std::collections::HashMap;
use std::sync::Arc;

use parquet_format as parquet;

use crate::basic::{ColumnOrder, Repetition, SortOrder, Type as PhysicalType};
use crate::errors::{ParquetError, Result};

/// Logical annotation refining how a physical value should be interpreted
/// (presentation and comparison order).
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalType {
  String,
  Enum,
  Uuid,
  Json,
  Bson,
  Date,
  Time { unit: TimeUnit, is_adjusted_to_utc: bool },
  Timestamp { unit: TimeUnit, is_adjusted_to_utc: bool },
  Integer { bit_width: u8, is_signed: bool },
  Decimal { precision: i32, scale: i32 },
  List,
  Map,
  Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
  Millis,
  Micros,
  Nanos,
}

/// Legacy annotation carried alongside (and, for older files, instead of)
/// `LogicalType`. Kept distinct because old files only populate this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertedType {
  NONE,
  UTF8,
  MAP,
  MAP_KEY_VALUE,
  LIST,
  ENUM,
  DECIMAL,
  DATE,
  TIME_MILLIS,
  TIME_MICROS,
  TIMESTAMP_MILLIS,
  TIMESTAMP_MICROS,
  UINT_8,
  UINT_16,
  UINT_32,
  UINT_64,
  INT_8,
  INT_16,
  INT_32,
  INT_64,
  JSON,
  BSON,
  INTERVAL,
}

/// Precision/scale pair for DECIMAL-annotated leaves (either via
/// `LogicalType::Decimal` or the legacy `ConvertedType::DECIMAL` +
/// `scale`/`precision` SchemaElement fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalInfo {
  pub precision: i32,
  pub scale: i32,
}

/// Fields shared by every node, group or leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicTypeInfo {
  name: String,
  repetition: Option<Repetition>,
  id: Option<i32>,
  logical_type: Option<LogicalType>,
  converted_type: ConvertedType,
}

impl BasicTypeInfo {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn repetition(&self) -> Option<Repetition> {
    self.repetition
  }

  pub fn id(&self) -> Option<i32> {
    self.id
  }

  pub fn logical_type(&self) -> Option<&LogicalType> {
    self.logical_type.as_ref()
  }

  pub fn converted_type(&self) -> ConvertedType {
    self.converted_type
  }
}

/// A node of the schema tree: either a group with named children, or a
/// primitive leaf with a physical type. Modeled as a tagged variant rather
/// than an inheritance hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
  Primitive {
    basic_info: BasicTypeInfo,
    physical_type: PhysicalType,
    type_length: i32,
    decimal_info: Option<DecimalInfo>,
  },
  Group {
    basic_info: BasicTypeInfo,
    fields: Vec<Arc<Type>>,
  },
}

impl Type {
  pub fn name(&self) -> &str {
    self.basic_info().name()
  }

  pub fn basic_info(&self) -> &BasicTypeInfo {
    match self {
      Type::Primitive { basic_info, .. } => basic_info,
      Type::Group { basic_info, .. } => basic_info,
    }
  }

  pub fn is_primitive(&self) -> bool {
    matches!(self, Type::Primitive { .. })
  }

  pub fn is_group(&self) -> bool {
    matches!(self, Type::Group { .. })
  }

  pub fn is_root(&self) -> bool {
    self.basic_info().repetition().is_none()
  }

  pub fn get_fields(&self) -> &[Arc<Type>] {
    match self {
      Type::Group { fields, .. } => fields,
      Type::Primitive { .. } => &[],
    }
  }

  pub fn get_physical_type(&self) -> Option<PhysicalType> {
    match self {
      Type::Primitive { physical_type, .. } => Some(*physical_type),
      Type::Group { .. } => None,
    }
  }

  /// Sort order for this leaf's comparisons, derived from its logical
  /// annotation (falling back to the physical type), per the format's
  /// `ColumnOrder` rules.
  pub fn column_order(&self) -> ColumnOrder {
    let physical = match self.get_physical_type() {
      Some(p) => p,
      None => return ColumnOrder::Undefined,
    };
    let sort_order = match self.basic_info().logical_type() {
      Some(LogicalType::String) | Some(LogicalType::Enum) | Some(LogicalType::Json)
      | Some(LogicalType::Bson) => SortOrder::UNSIGNED,
      Some(LogicalType::Integer { is_signed, .. }) => {
        if *is_signed {
          SortOrder::SIGNED
        } else {
          SortOrder::UNSIGNED
        }
      }
      Some(LogicalType::Decimal { .. }) => SortOrder::SIGNED,
      Some(LogicalType::Uuid) => SortOrder::UNSIGNED,
      _ => match physical {
        PhysicalType::BOOLEAN
        | PhysicalType::INT32
        | PhysicalType::INT64
        | PhysicalType::FLOAT
        | PhysicalType::DOUBLE => SortOrder::SIGNED,
        PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY => SortOrder::UNSIGNED,
        PhysicalType::INT96 => SortOrder::UNDEFINED,
      },
    };
    ColumnOrder::TypeDefinedOrder(sort_order)
  }
}

/// Builder for a group (message/struct) node.
pub struct GroupTypeBuilder {
  name: String,
  repetition: Option<Repetition>,
  id: Option<i32>,
  fields: Vec<Arc<Type>>,
}

impl GroupTypeBuilder {
  pub fn new(name: &str) -> Self {
    GroupTypeBuilder { name: name.to_owned(), repetition: Some(Repetition::REQUIRED), id: None, fields: Vec::new() }
  }

  pub fn with_repetition(mut self, repetition: Option<Repetition>) -> Self {
    self.repetition = repetition;
    self
  }

  pub fn with_id(mut self, id: i32) -> Self {
    self.id = Some(id);
    self
  }

  pub fn with_fields(mut self, fields: Vec<Arc<Type>>) -> Self {
    self.fields = fields;
    self
  }

  pub fn build(self) -> Type {
    Type::Group {
      basic_info: BasicTypeInfo {
        name: self.name,
        repetition: self.repetition,
        id: self.id,
        logical_type: None,
        converted_type: ConvertedType::NONE,
      },
      fields: self.fields,
    }
  }
}

/// Builder for a primitive (leaf) node.
pub struct PrimitiveTypeBuilder {
  name: String,
  repetition: Repetition,
  physical_type: PhysicalType,
  type_length: i32,
  id: Option<i32>,
  logical_type: Option<LogicalType>,
  converted_type: ConvertedType,
  decimal_info: Option<DecimalInfo>,
}

impl PrimitiveTypeBuilder {
  pub fn new(name: &str, physical_type: PhysicalType) -> Self {
    PrimitiveTypeBuilder {
      name: name.to_owned(),
      repetition: Repetition::REQUIRED,
      physical_type,
      type_length: -1,
      id: None,
      logical_type: None,
      converted_type: ConvertedType::NONE,
      decimal_info: None,
    }
  }

  pub fn with_repetition(mut self, repetition: Repetition) -> Self {
    self.repetition = repetition;
    self
  }

  pub fn with_length(mut self, length: i32) -> Self {
    self.type_length = length;
    self
  }

  pub fn with_logical_type(mut self, logical_type: Option<LogicalType>) -> Self {
    self.logical_type = logical_type;
    self
  }

  pub fn with_converted_type(mut self, converted_type: ConvertedType) -> Self {
    self.converted_type = converted_type;
    self
  }

  pub fn with_id(mut self, id: i32) -> Self {
    self.id = Some(id);
    self
  }

  pub fn with_decimal_info(mut self, info: DecimalInfo) -> Self {
    self.decimal_info = Some(info);
    self
  }

  pub fn build(self) -> Result<Type> {
    if self.physical_type == PhysicalType::FIXED_LEN_BYTE_ARRAY && self.type_length < 0 {
      return Err(general_err!(
        "Invalid FIXED_LEN_BYTE_ARRAY length: {}",
        self.type_length
      ));
    }
    Ok(Type::Primitive {
      basic_info: BasicTypeInfo {
        name: self.name,
        repetition: Some(self.repetition),
        id: self.id,
        logical_type: self.logical_type,
        converted_type: self.converted_type,
      },
      physical_type: self.physical_type,
      type_length: self.type_length,
      decimal_info: self.decimal_info,
    })
  }
}

/// A descriptor for one leaf column: its type, derived max repetition/
/// definition level, dotted path, and the root (top-level) node it descends
/// from — needed by the row-group merger to validate sorting-column roots.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
  primitive_type: Arc<Type>,
  max_def_level: i16,
  max_rep_level: i16,
  path: Vec<String>,
  root: Arc<Type>,
}

impl ColumnDescriptor {
  pub fn max_def_level(&self) -> i16 {
    self.max_def_level
  }

  pub fn max_rep_level(&self) -> i16 {
    self.max_rep_level
  }

  pub fn path(&self) -> &[String] {
    &self.path
  }

  pub fn self_type(&self) -> &Type {
    &self.primitive_type
  }

  pub fn root_type(&self) -> &Type {
    &self.root
  }

  pub fn name(&self) -> &str {
    self.primitive_type.name()
  }

  pub fn physical_type(&self) -> PhysicalType {
    self.primitive_type.get_physical_type().expect("leaf column must be primitive")
  }

  /// The declared length of a `FIXED_LEN_BYTE_ARRAY` column, or `-1` for any
  /// other physical type.
  pub fn type_length(&self) -> i32 {
    match self.primitive_type.as_ref() {
      Type::Primitive { type_length, .. } => *type_length,
      Type::Group { .. } => -1,
    }
  }
}

pub type ColumnDescPtr = Arc<ColumnDescriptor>;
pub type TypePtr = Arc<Type>;

/// The whole schema: the root message type plus its leaves in left-to-right
/// depth-first order, the traversal order column indexes are assigned in.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
  root: Arc<Type>,
  leaves: Vec<ColumnDescPtr>,
  leaf_to_root: Vec<Arc<Type>>,
  path_to_leaf: HashMap<Vec<String>, usize>,
}

impl SchemaDescriptor {
  pub fn new(root: Arc<Type>) -> Self {
    assert!(root.is_group(), "schema root must be a group");
    let mut leaves = Vec::new();
    let mut leaf_to_root = Vec::new();
    for field in root.get_fields() {
      let mut path = Vec::new();
      build_tree(field.clone(), field.clone(), 0, 0, &mut leaves, &mut leaf_to_root, &mut path);
    }
    let path_to_leaf = leaves
      .iter()
      .enumerate()
      .map(|(i, d)| (d.path().to_vec(), i))
      .collect();
    SchemaDescriptor { root, leaves, leaf_to_root, path_to_leaf }
  }

  pub fn root_type(&self) -> &Type {
    &self.root
  }

  /// Same as `root_type`, but a cheap `Arc` clone — for callers (row
  /// assembly) that need to hold the root past the descriptor's own
  /// lifetime.
  pub fn root_type_arc(&self) -> Arc<Type> {
    self.root.clone()
  }

  pub fn num_columns(&self) -> usize {
    self.leaves.len()
  }

  pub fn column(&self, i: usize) -> &ColumnDescPtr {
    &self.leaves[i]
  }

  pub fn columns(&self) -> &[ColumnDescPtr] {
    &self.leaves
  }

  pub fn get_column_root(&self, i: usize) -> &Type {
    &self.leaf_to_root[i]
  }

  pub fn column_index_of(&self, path: &[String]) -> Option<usize> {
    self.path_to_leaf.get(path).copied()
  }

  pub fn name(&self) -> &str {
    self.root.name()
  }
}

fn build_tree(
  node: Arc<Type>,
  root: Arc<Type>,
  mut max_rep_level: i16,
  mut max_def_level: i16,
  leaves: &mut Vec<ColumnDescPtr>,
  leaf_to_root: &mut Vec<Arc<Type>>,
  path_so_far: &mut Vec<String>,
) {
  path_so_far.push(node.name().to_owned());
  match node.basic_info().repetition() {
    Some(Repetition::OPTIONAL) => max_def_level += 1,
    Some(Repetition::REPEATED) => {
      max_def_level += 1;
      max_rep_level += 1;
    }
    _ => {}
  }

  match node.as_ref() {
    Type::Primitive { .. } => {
      leaves.push(Arc::new(ColumnDescriptor {
        primitive_type: node.clone(),
        max_def_level,
        max_rep_level,
        path: path_so_far.clone(),
        root: root.clone(),
      }));
      leaf_to_root.push(root);
    }
    Type::Group { fields, .. } => {
      for field in fields {
        build_tree(field.clone(), root.clone(), max_rep_level, max_def_level, leaves, leaf_to_root, path_so_far);
        path_so_far.pop();
      }
    }
  }
}

// ----------------------------------------------------------------------
// Thrift round-trip: `parquet_format::SchemaElement` flattened list <->
// the tree above. Elements are consumed by num_children DFS; every
// element with no children is a leaf.

/// Converts a flattened list of Thrift `SchemaElement`s (root first, DFS
/// pre-order) into a schema tree.
pub fn from_thrift(elements: &[parquet::SchemaElement]) -> Result<TypePtr> {
  if elements.is_empty() {
    return Err(general_err!("Schema elements list is empty"));
  }
  let mut index = 0;
  let root = from_thrift_helper(elements, &mut index)?;
  if index != elements.len() {
    return Err(general_err!(
      "Schema element list did not consume all {} elements ({} left unread)",
      elements.len(),
      elements.len() - index
    ));
  }
  Ok(Arc::new(root))
}

fn from_thrift_helper(elements: &[parquet::SchemaElement], index: &mut usize) -> Result<Type> {
  if *index >= elements.len() {
    return Err(general_err!("Index out of bound reading schema elements"));
  }
  let element = &elements[*index];
  let name = element.name.clone();
  let repetition = element.repetition_type.map(Repetition::from);
  let converted_type = element
    .converted_type
    .map(convert_converted_type)
    .unwrap_or(ConvertedType::NONE);
  let logical_type = element.logical_type.as_ref().map(convert_logical_type);
  *index += 1;

  match element.num_children {
    None | Some(0) if element.type_.is_some() => {
      let physical_type = PhysicalType::from(element.type_.unwrap());
      let type_length = element.type_length.unwrap_or(-1);
      let decimal_info = match (element.precision, element.scale) {
        (Some(precision), Some(scale)) => Some(DecimalInfo { precision, scale }),
        _ => None,
      };
      let mut builder = PrimitiveTypeBuilder::new(&name, physical_type)
        .with_repetition(repetition.unwrap_or(Repetition::REQUIRED))
        .with_length(type_length)
        .with_converted_type(converted_type)
        .with_logical_type(logical_type);
      if let Some(id) = element.field_id {
        builder = builder.with_id(id);
      }
      if let Some(info) = decimal_info {
        builder = builder.with_decimal_info(info);
      }
      builder.build()
    }
    num_children => {
      let num_children = num_children.unwrap_or(0) as usize;
      let mut fields = Vec::with_capacity(num_children);
      for _ in 0..num_children {
        fields.push(Arc::new(from_thrift_helper(elements, index)?));
      }
      let mut builder = GroupTypeBuilder::new(&name).with_repetition(repetition).with_fields(fields);
      if let Some(id) = element.field_id {
        builder = builder.with_id(id);
      }
      Ok(builder.build())
    }
  }
}

/// Flattens a schema tree back into the DFS pre-order list Thrift expects.
pub fn to_thrift(root: &Type) -> Vec<parquet::SchemaElement> {
  let mut elements = Vec::new();
  to_thrift_helper(root, &mut elements);
  elements
}

fn to_thrift_helper(node: &Type, out: &mut Vec<parquet::SchemaElement>) {
  match node {
    Type::Primitive { basic_info, physical_type, type_length, decimal_info } => {
      out.push(parquet::SchemaElement {
        type_: Some((*physical_type).into()),
        type_length: if *type_length >= 0 { Some(*type_length) } else { None },
        repetition_type: basic_info.repetition().map(Into::into),
        name: basic_info.name().to_owned(),
        num_children: None,
        converted_type: converted_type_to_thrift(basic_info.converted_type()),
        scale: decimal_info.map(|d| d.scale),
        precision: decimal_info.map(|d| d.precision),
        field_id: basic_info.id(),
        logical_type: basic_info.logical_type().map(logical_type_to_thrift),
      });
    }
    Type::Group { basic_info, fields } => {
      out.push(parquet::SchemaElement {
        type_: None,
        type_length: None,
        repetition_type: basic_info.repetition().map(Into::into),
        name: basic_info.name().to_owned(),
        num_children: Some(fields.len() as i32),
        converted_type: None,
        scale: None,
        precision: None,
        field_id: basic_info.id(),
        logical_type: None,
      });
      for field in fields {
        to_thrift_helper(field, out);
      }
    }
  }
}

fn convert_converted_type(c: parquet::ConvertedType) -> ConvertedType {
  match c {
    parquet::ConvertedType::UTF8 => ConvertedType::UTF8,
    parquet::ConvertedType::MAP => ConvertedType::MAP,
    parquet::ConvertedType::MAP_KEY_VALUE => ConvertedType::MAP_KEY_VALUE,
    parquet::ConvertedType::LIST => ConvertedType::LIST,
    parquet::ConvertedType::ENUM => ConvertedType::ENUM,
    parquet::ConvertedType::DECIMAL => ConvertedType::DECIMAL,
    parquet::ConvertedType::DATE => ConvertedType::DATE,
    parquet::ConvertedType::TIME_MILLIS => ConvertedType::TIME_MILLIS,
    parquet::ConvertedType::TIME_MICROS => ConvertedType::TIME_MICROS,
    parquet::ConvertedType::TIMESTAMP_MILLIS => ConvertedType::TIMESTAMP_MILLIS,
    parquet::ConvertedType::TIMESTAMP_MICROS => ConvertedType::TIMESTAMP_MICROS,
    parquet::ConvertedType::UINT_8 => ConvertedType::UINT_8,
    parquet::ConvertedType::UINT_16 => ConvertedType::UINT_16,
    parquet::ConvertedType::UINT_32 => ConvertedType::UINT_32,
    parquet::ConvertedType::UINT_64 => ConvertedType::UINT_64,
    parquet::ConvertedType::INT_8 => ConvertedType::INT_8,
    parquet::ConvertedType::INT_16 => ConvertedType::INT_16,
    parquet::ConvertedType::INT_32 => ConvertedType::INT_32,
    parquet::ConvertedType::INT_64 => ConvertedType::INT_64,
    parquet::ConvertedType::JSON => ConvertedType::JSON,
    parquet::ConvertedType::BSON => ConvertedType::BSON,
    parquet::ConvertedType::INTERVAL => ConvertedType::INTERVAL,
  }
}

fn converted_type_to_thrift(c: ConvertedType) -> Option<parquet::ConvertedType> {
  match c {
    ConvertedType::NONE => None,
    ConvertedType::UTF8 => Some(parquet::ConvertedType::UTF8),
    ConvertedType::MAP => Some(parquet::ConvertedType::MAP),
    ConvertedType::MAP_KEY_VALUE => Some(parquet::ConvertedType::MAP_KEY_VALUE),
    ConvertedType::LIST => Some(parquet::ConvertedType::LIST),
    ConvertedType::ENUM => Some(parquet::ConvertedType::ENUM),
    ConvertedType::DECIMAL => Some(parquet::ConvertedType::DECIMAL),
    ConvertedType::DATE => Some(parquet::ConvertedType::DATE),
    ConvertedType::TIME_MILLIS => Some(parquet::ConvertedType::TIME_MILLIS),
    ConvertedType::TIME_MICROS => Some(parquet::ConvertedType::TIME_MICROS),
    ConvertedType::TIMESTAMP_MILLIS => Some(parquet::ConvertedType::TIMESTAMP_MILLIS),
    ConvertedType::TIMESTAMP_MICROS => Some(parquet::ConvertedType::TIMESTAMP_MICROS),
    ConvertedType::UINT_8 => Some(parquet::ConvertedType::UINT_8),
    ConvertedType::UINT_16 => Some(parquet::ConvertedType::UINT_16),
    ConvertedType::UINT_32 => Some(parquet::ConvertedType::UINT_32),
    ConvertedType::UINT_64 => Some(parquet::ConvertedType::UINT_64),
    ConvertedType::INT_8 => Some(parquet::ConvertedType::INT_8),
    ConvertedType::INT_16 => Some(parquet::ConvertedType::INT_16),
    ConvertedType::INT_32 => Some(parquet::ConvertedType::INT_32),
    ConvertedType::INT_64 => Some(parquet::ConvertedType::INT_64),
    ConvertedType::JSON => Some(parquet::ConvertedType::JSON),
    ConvertedType::BSON => Some(parquet::ConvertedType::BSON),
    ConvertedType::INTERVAL => Some(parquet::ConvertedType::INTERVAL),
  }
}

fn convert_time_unit(u: &parquet::TimeUnit) -> TimeUnit {
  match u {
    parquet::TimeUnit::MILLIS(_) => TimeUnit::Millis,
    parquet::TimeUnit::MICROS(_) => TimeUnit::Micros,
    parquet::TimeUnit::NANOS(_) => TimeUnit::Nanos,
  }
}

fn time_unit_to_thrift(u: TimeUnit) -> parquet::TimeUnit {
  match u {
    TimeUnit::Millis => parquet::TimeUnit::MILLIS(parquet::MilliSeconds {}),
    TimeUnit::Micros => parquet::TimeUnit::MICROS(parquet::MicroSeconds {}),
    TimeUnit::Nanos => parquet::TimeUnit::NANOS(parquet::NanoSeconds {}),
  }
}

fn convert_logical_type(l: &parquet::LogicalType) -> LogicalType {
  match l {
    parquet::LogicalType::STRING(_) => LogicalType::String,
    parquet::LogicalType::ENUM(_) => LogicalType::Enum,
    parquet::LogicalType::UUID(_) => LogicalType::Uuid,
    parquet::LogicalType::JSON(_) => LogicalType::Json,
    parquet::LogicalType::BSON(_) => LogicalType::Bson,
    parquet::LogicalType::DATE(_) => LogicalType::Date,
    parquet::LogicalType::TIME(t) => LogicalType::Time {
      unit: convert_time_unit(&t.unit),
      is_adjusted_to_utc: t.is_adjusted_to_u_t_c,
    },
    parquet::LogicalType::TIMESTAMP(t) => LogicalType::Timestamp {
      unit: convert_time_unit(&t.unit),
      is_adjusted_to_utc: t.is_adjusted_to_u_t_c,
    },
    parquet::LogicalType::INTEGER(i) => {
      LogicalType::Integer { bit_width: i.bit_width as u8, is_signed: i.is_signed }
    }
    parquet::LogicalType::DECIMAL(d) => {
      LogicalType::Decimal { precision: d.precision, scale: d.scale }
    }
    parquet::LogicalType::LIST(_) => LogicalType::List,
    parquet::LogicalType::MAP(_) => LogicalType::Map,
    _ => LogicalType::Unknown,
  }
}

fn logical_type_to_thrift(l: &LogicalType) -> parquet::LogicalType {
  match l {
    LogicalType::String => parquet::LogicalType::STRING(parquet::StringType {}),
    LogicalType::Enum => parquet::LogicalType::ENUM(parquet::EnumType {}),
    LogicalType::Uuid => parquet::LogicalType::UUID(parquet::UUIDType {}),
    LogicalType::Json => parquet::LogicalType::JSON(parquet::JsonType {}),
    LogicalType::Bson => parquet::LogicalType::BSON(parquet::BsonType {}),
    LogicalType::Date => parquet::LogicalType::DATE(parquet::DateType {}),
    LogicalType::Time { unit, is_adjusted_to_utc } => {
      parquet::LogicalType::TIME(parquet::TimeType {
        is_adjusted_to_u_t_c: *is_adjusted_to_utc,
        unit: time_unit_to_thrift(*unit),
      })
    }
    LogicalType::Timestamp { unit, is_adjusted_to_utc } => {
      parquet::LogicalType::TIMESTAMP(parquet::TimestampType {
        is_adjusted_to_u_t_c: *is_adjusted_to_utc,
        unit: time_unit_to_thrift(*unit),
      })
    }
    LogicalType::Integer { bit_width, is_signed } => {
      parquet::LogicalType::INTEGER(parquet::IntType { bit_width: *bit_width as i8, is_signed: *is_signed })
    }
    LogicalType::Decimal { precision, scale } => {
      parquet::LogicalType::DECIMAL(parquet::DecimalType { scale: *scale, precision: *precision })
    }
    LogicalType::List => parquet::LogicalType::LIST(parquet::ListType {}),
    LogicalType::Map => parquet::LogicalType::MAP(parquet::MapType {}),
    LogicalType::Unknown => parquet::LogicalType::UNKNOWN(parquet::NullType {}),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn int32_leaf(name: &str, repetition: Repetition) -> Arc<Type> {
    Arc::new(
      PrimitiveTypeBuilder::new(name, PhysicalType::INT32)
        .with_repetition(repetition)
        .build()
        .unwrap(),
    )
  }

  #[test]
  fn test_schema_descriptor_levels() {
    let a = int32_leaf("a", Repetition::REQUIRED);
    let b = int32_leaf("b", Repetition::OPTIONAL);
    let root = Arc::new(GroupTypeBuilder::new("schema").with_fields(vec![a, b]).build());
    let descr = SchemaDescriptor::new(root);
    assert_eq!(descr.num_columns(), 2);
    assert_eq!(descr.column(0).max_def_level(), 0);
    assert_eq!(descr.column(0).max_rep_level(), 0);
    assert_eq!(descr.column(1).max_def_level(), 1);
    assert_eq!(descr.column(1).path(), &["b".to_owned()]);
  }

  #[test]
  fn test_nested_repeated_levels() {
    let leaf = int32_leaf("value", Repetition::REPEATED);
    let group = Arc::new(
      GroupTypeBuilder::new("inner")
        .with_repetition(Some(Repetition::OPTIONAL))
        .with_fields(vec![leaf])
        .build(),
    );
    let root = Arc::new(GroupTypeBuilder::new("schema").with_fields(vec![group]).build());
    let descr = SchemaDescriptor::new(root);
    assert_eq!(descr.column(0).max_rep_level(), 1);
    assert_eq!(descr.column(0).max_def_level(), 2);
    assert_eq!(descr.column(0).path(), &["inner".to_owned(), "value".to_owned()]);
  }

  #[test]
  fn test_fixed_len_byte_array_requires_length() {
    let result = PrimitiveTypeBuilder::new("f", PhysicalType::FIXED_LEN_BYTE_ARRAY).build();
    assert!(result.is_err());
  }

  #[test]
  fn test_column_order_signed_for_int32() {
    let leaf = PrimitiveTypeBuilder::new("a", PhysicalType::INT32).build().unwrap();
    assert_eq!(leaf.column_order(), ColumnOrder::TypeDefinedOrder(SortOrder::SIGNED));
  }
}
