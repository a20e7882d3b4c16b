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

//! The crate's own metadata types (`FileMetaData`, `RowGroupMetaData`,
//! `ColumnChunkMetaData`, `Statistics`, `SortingColumn`, `KeyValue`, and the
//! page-index sidecar types), plus their Thrift compact-protocol round-trip.
//! `file::footer`/`file::writer` are the only modules that see the
//! `parquet_format` wire structs; everything downstream uses these.

use std::sync::Arc;

use parquet_format as parquet;

use crate::basic::{Compression, Encoding, Type as PhysicalType};
use crate::errors::{ParquetError, Result};
use crate::schema::types::{self, SchemaDescriptor, TypePtr};

/// A single user-supplied key/value metadata entry, set via
/// `WriterProperties::key_value_metadata`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct KeyValue {
  pub key: String,
  pub value: Option<String>,
}

impl KeyValue {
  pub fn new(key: String, value: Option<String>) -> Self {
    KeyValue { key, value }
  }
}

impl From<&parquet::KeyValue> for KeyValue {
  fn from(kv: &parquet::KeyValue) -> Self {
    KeyValue { key: kv.key.clone(), value: kv.value.clone() }
  }
}

impl From<&KeyValue> for parquet::KeyValue {
  fn from(kv: &KeyValue) -> Self {
    parquet::KeyValue { key: kv.key.clone(), value: kv.value.clone() }
  }
}

/// One column of an asserted sort order, set via
/// `WriterProperties::sorting_columns` and checked as a merge precondition
/// by `merge::sorted_merge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortingColumn {
  /// Index into the flattened leaf-column list (`SchemaDescriptor::column`).
  pub column_idx: i32,
  pub descending: bool,
  pub nulls_first: bool,
}

impl From<&parquet::SortingColumn> for SortingColumn {
  fn from(s: &parquet::SortingColumn) -> Self {
    SortingColumn { column_idx: s.column_idx, descending: s.descending, nulls_first: s.nulls_first }
  }
}

impl From<&SortingColumn> for parquet::SortingColumn {
  fn from(s: &SortingColumn) -> Self {
    parquet::SortingColumn { column_idx: s.column_idx, descending: s.descending, nulls_first: s.nulls_first }
  }
}

/// Per-page/per-column-chunk min/max/null-count, carried as raw
/// PLAIN-encoded bytes (type-erased) the way the wire format stores them.
/// Resolved into a typed value only where a comparison is actually needed
/// (`column::writer`'s running min/max, `file::page_index::search`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
  pub min_value: Option<Vec<u8>>,
  pub max_value: Option<Vec<u8>>,
  pub null_count: Option<i64>,
  pub distinct_count: Option<i64>,
  pub is_max_value_exact: Option<bool>,
  pub is_min_value_exact: Option<bool>,
}

impl Statistics {
  pub fn is_empty(&self) -> bool {
    self.min_value.is_none() && self.max_value.is_none() && self.null_count.is_none()
  }

  /// Converts a page header's optional Thrift `Statistics`.
  pub fn from_thrift_opt(t: Option<&parquet::Statistics>) -> Option<Statistics> {
    t.map(Statistics::from)
  }
}

/// Reads both the legacy (`min`/`max`) and modern (`min_value`/`max_value`)
/// fields: the modern field wins when both are present and disagree, with a
/// `log::warn!`.
impl From<&parquet::Statistics> for Statistics {
  fn from(s: &parquet::Statistics) -> Self {
    let min_value = s.min_value.clone().or_else(|| s.min.clone());
    let max_value = s.max_value.clone().or_else(|| s.max.clone());
    if let (Some(legacy), Some(modern)) = (&s.min, &s.min_value) {
      if legacy != modern {
        log::warn!("Statistics.min and Statistics.min_value disagree; preferring min_value");
      }
    }
    if let (Some(legacy), Some(modern)) = (&s.max, &s.max_value) {
      if legacy != modern {
        log::warn!("Statistics.max and Statistics.max_value disagree; preferring max_value");
      }
    }
    Statistics {
      min_value,
      max_value,
      null_count: s.null_count,
      distinct_count: s.distinct_count,
      is_max_value_exact: s.is_max_value_exact,
      is_min_value_exact: s.is_min_value_exact,
    }
  }
}

/// Writers only ever populate `min_value`/`max_value` ("writers must
/// produce min_value/max_value and may omit the legacy
/// fields").
impl From<&Statistics> for parquet::Statistics {
  fn from(s: &Statistics) -> Self {
    parquet::Statistics {
      max: None,
      min: None,
      null_count: s.null_count,
      distinct_count: s.distinct_count,
      max_value: s.max_value.clone(),
      min_value: s.min_value.clone(),
      is_max_value_exact: s.is_max_value_exact,
      is_min_value_exact: s.is_min_value_exact,
    }
  }
}

/// Per-column-chunk metadata: codec, encodings used, path, sizes, and page
/// offsets, assembled when the column writer closes.
#[derive(Debug, Clone)]
pub struct ColumnChunkMetaData {
  column_type: PhysicalType,
  column_path: Vec<String>,
  encodings: Vec<Encoding>,
  codec: Compression,
  num_values: i64,
  total_uncompressed_size: i64,
  total_compressed_size: i64,
  data_page_offset: i64,
  index_page_offset: Option<i64>,
  dictionary_page_offset: Option<i64>,
  statistics: Option<Statistics>,
  offset_index_offset: Option<i64>,
  offset_index_length: Option<i32>,
  column_index_offset: Option<i64>,
  column_index_length: Option<i32>,
}

impl ColumnChunkMetaData {
  pub fn column_type(&self) -> PhysicalType {
    self.column_type
  }

  pub fn column_path(&self) -> &[String] {
    &self.column_path
  }

  pub fn encodings(&self) -> &[Encoding] {
    &self.encodings
  }

  pub fn compression(&self) -> Compression {
    self.codec
  }

  pub fn num_values(&self) -> i64 {
    self.num_values
  }

  pub fn total_uncompressed_size(&self) -> i64 {
    self.total_uncompressed_size
  }

  pub fn total_compressed_size(&self) -> i64 {
    self.total_compressed_size
  }

  pub fn data_page_offset(&self) -> i64 {
    self.data_page_offset
  }

  pub fn dictionary_page_offset(&self) -> Option<i64> {
    self.dictionary_page_offset
  }

  pub fn statistics(&self) -> Option<&Statistics> {
    self.statistics.as_ref()
  }

  pub fn offset_index_offset(&self) -> Option<i64> {
    self.offset_index_offset
  }

  pub fn offset_index_length(&self) -> Option<i32> {
    self.offset_index_length
  }

  pub fn column_index_offset(&self) -> Option<i64> {
    self.column_index_offset
  }

  pub fn column_index_length(&self) -> Option<i32> {
    self.column_index_length
  }

  /// `(start, length)` of this chunk's page data, dictionary page included
  /// when present.
  pub fn byte_range(&self) -> (u64, u64) {
    let start = self.dictionary_page_offset.unwrap_or(self.data_page_offset);
    (start as u64, self.total_compressed_size as u64)
  }

  pub fn from_thrift(column: &parquet::ColumnChunk) -> Result<Self> {
    let meta = column
      .meta_data
      .as_ref()
      .ok_or_else(|| general_err!("Column chunk is missing ColumnMetaData"))?;
    Ok(ColumnChunkMetaData {
      column_type: meta.type_.into(),
      column_path: meta.path_in_schema.clone(),
      encodings: meta.encodings.iter().map(|e| (*e).into()).collect(),
      codec: meta.codec.into(),
      num_values: meta.num_values,
      total_uncompressed_size: meta.total_uncompressed_size,
      total_compressed_size: meta.total_compressed_size,
      data_page_offset: meta.data_page_offset,
      index_page_offset: meta.index_page_offset,
      dictionary_page_offset: meta.dictionary_page_offset,
      statistics: meta.statistics.as_ref().map(Statistics::from),
      offset_index_offset: column.offset_index_offset,
      offset_index_length: column.offset_index_length,
      column_index_offset: column.column_index_offset,
      column_index_length: column.column_index_length,
    })
  }

  pub fn to_thrift(&self) -> parquet::ColumnChunk {
    let meta = parquet::ColumnMetaData {
      type_: self.column_type.into(),
      encodings: self.encodings.iter().map(|e| (*e).into()).collect(),
      path_in_schema: self.column_path.clone(),
      codec: self.codec.into(),
      num_values: self.num_values,
      total_uncompressed_size: self.total_uncompressed_size,
      total_compressed_size: self.total_compressed_size,
      key_value_metadata: None,
      data_page_offset: self.data_page_offset,
      index_page_offset: self.index_page_offset,
      dictionary_page_offset: self.dictionary_page_offset,
      statistics: self.statistics.as_ref().map(parquet::Statistics::from),
      encoding_stats: None,
      bloom_filter_offset: None,
      bloom_filter_length: None,
    };
    parquet::ColumnChunk {
      file_path: None,
      file_offset: self.data_page_offset,
      meta_data: Some(meta),
      offset_index_offset: self.offset_index_offset,
      offset_index_length: self.offset_index_length,
      column_index_offset: self.column_index_offset,
      column_index_length: self.column_index_length,
      crypto_metadata: None,
      encrypted_column_metadata: None,
    }
  }
}

/// Builder for `ColumnChunkMetaData`, used by `column::writer` at row-group
/// finalization time.
pub struct ColumnChunkMetaDataBuilder {
  inner: ColumnChunkMetaData,
}

impl ColumnChunkMetaDataBuilder {
  pub fn new(column_type: PhysicalType, column_path: Vec<String>) -> Self {
    ColumnChunkMetaDataBuilder {
      inner: ColumnChunkMetaData {
        column_type,
        column_path,
        encodings: Vec::new(),
        codec: Compression::UNCOMPRESSED,
        num_values: 0,
        total_uncompressed_size: 0,
        total_compressed_size: 0,
        data_page_offset: 0,
        index_page_offset: None,
        dictionary_page_offset: None,
        statistics: None,
        offset_index_offset: None,
        offset_index_length: None,
        column_index_offset: None,
        column_index_length: None,
      },
    }
  }

  pub fn set_encodings(mut self, encodings: Vec<Encoding>) -> Self {
    self.inner.encodings = encodings;
    self
  }

  pub fn set_compression(mut self, codec: Compression) -> Self {
    self.inner.codec = codec;
    self
  }

  pub fn set_num_values(mut self, num_values: i64) -> Self {
    self.inner.num_values = num_values;
    self
  }

  pub fn set_total_uncompressed_size(mut self, size: i64) -> Self {
    self.inner.total_uncompressed_size = size;
    self
  }

  pub fn set_total_compressed_size(mut self, size: i64) -> Self {
    self.inner.total_compressed_size = size;
    self
  }

  pub fn set_data_page_offset(mut self, offset: i64) -> Self {
    self.inner.data_page_offset = offset;
    self
  }

  pub fn set_dictionary_page_offset(mut self, offset: Option<i64>) -> Self {
    self.inner.dictionary_page_offset = offset;
    self
  }

  pub fn set_statistics(mut self, stats: Option<Statistics>) -> Self {
    self.inner.statistics = stats;
    self
  }

  pub fn set_offset_index(mut self, offset: i64, length: i32) -> Self {
    self.inner.offset_index_offset = Some(offset);
    self.inner.offset_index_length = Some(length);
    self
  }

  pub fn set_column_index(mut self, offset: i64, length: i32) -> Self {
    self.inner.column_index_offset = Some(offset);
    self.inner.column_index_length = Some(length);
    self
  }

  pub fn build(self) -> ColumnChunkMetaData {
    self.inner
  }
}

/// One row group: its column chunks, row/byte counts, and optional sorting
/// columns.
#[derive(Debug, Clone)]
pub struct RowGroupMetaData {
  columns: Vec<ColumnChunkMetaData>,
  num_rows: i64,
  total_byte_size: i64,
  sorting_columns: Option<Vec<SortingColumn>>,
  schema_descr: Arc<SchemaDescriptor>,
}

impl RowGroupMetaData {
  pub fn num_columns(&self) -> usize {
    self.columns.len()
  }

  pub fn column(&self, i: usize) -> &ColumnChunkMetaData {
    &self.columns[i]
  }

  pub fn columns(&self) -> &[ColumnChunkMetaData] {
    &self.columns
  }

  pub fn num_rows(&self) -> i64 {
    self.num_rows
  }

  pub fn total_byte_size(&self) -> i64 {
    self.total_byte_size
  }

  pub fn sorting_columns(&self) -> Option<&[SortingColumn]> {
    self.sorting_columns.as_deref()
  }

  pub fn schema_descr(&self) -> &SchemaDescriptor {
    &self.schema_descr
  }

  pub fn schema_descr_ptr(&self) -> Arc<SchemaDescriptor> {
    self.schema_descr.clone()
  }

  pub fn from_thrift(schema_descr: Arc<SchemaDescriptor>, rg: &parquet::RowGroup) -> Result<Self> {
    let columns = rg
      .columns
      .iter()
      .map(ColumnChunkMetaData::from_thrift)
      .collect::<Result<Vec<_>>>()?;
    if columns.len() != schema_descr.num_columns() {
      return Err(general_err!(
        "Row group has {} columns but schema has {}",
        columns.len(),
        schema_descr.num_columns()
      ));
    }
    Ok(RowGroupMetaData {
      columns,
      num_rows: rg.num_rows,
      total_byte_size: rg.total_byte_size,
      sorting_columns: rg.sorting_columns.as_ref().map(|v| v.iter().map(SortingColumn::from).collect()),
      schema_descr,
    })
  }

  pub fn to_thrift(&self) -> parquet::RowGroup {
    parquet::RowGroup {
      columns: self.columns.iter().map(ColumnChunkMetaData::to_thrift).collect(),
      total_byte_size: self.total_byte_size,
      num_rows: self.num_rows,
      sorting_columns: self.sorting_columns.as_ref().map(|v| v.iter().map(parquet::SortingColumn::from).collect()),
      file_offset: self.columns.first().map(|c| c.data_page_offset()),
      total_compressed_size: Some(self.columns.iter().map(|c| c.total_compressed_size()).sum()),
      ordinal: None,
    }
  }
}

pub struct RowGroupMetaDataBuilder {
  columns: Vec<ColumnChunkMetaData>,
  num_rows: i64,
  sorting_columns: Option<Vec<SortingColumn>>,
  schema_descr: Arc<SchemaDescriptor>,
}

impl RowGroupMetaDataBuilder {
  pub fn new(schema_descr: Arc<SchemaDescriptor>) -> Self {
    RowGroupMetaDataBuilder { columns: Vec::new(), num_rows: 0, sorting_columns: None, schema_descr }
  }

  pub fn add_column_metadata(mut self, column: ColumnChunkMetaData) -> Self {
    self.columns.push(column);
    self
  }

  pub fn set_num_rows(mut self, num_rows: i64) -> Self {
    self.num_rows = num_rows;
    self
  }

  pub fn set_sorting_columns(mut self, sorting_columns: Option<Vec<SortingColumn>>) -> Self {
    self.sorting_columns = sorting_columns;
    self
  }

  pub fn build(self) -> RowGroupMetaData {
    let total_byte_size = self.columns.iter().map(|c| c.total_uncompressed_size()).sum();
    RowGroupMetaData {
      columns: self.columns,
      num_rows: self.num_rows,
      total_byte_size,
      sorting_columns: self.sorting_columns,
      schema_descr: self.schema_descr,
    }
  }
}

/// Whole-file metadata: schema, row groups, and user key/value metadata.
#[derive(Debug, Clone)]
pub struct FileMetaData {
  version: i32,
  num_rows: i64,
  created_by: Option<String>,
  key_value_metadata: Option<Vec<KeyValue>>,
  schema_descr: Arc<SchemaDescriptor>,
}

impl FileMetaData {
  pub fn new(
    version: i32,
    num_rows: i64,
    created_by: Option<String>,
    key_value_metadata: Option<Vec<KeyValue>>,
    schema_descr: Arc<SchemaDescriptor>,
  ) -> Self {
    FileMetaData { version, num_rows, created_by, key_value_metadata, schema_descr }
  }

  pub fn version(&self) -> i32 {
    self.version
  }

  pub fn num_rows(&self) -> i64 {
    self.num_rows
  }

  pub fn created_by(&self) -> Option<&str> {
    self.created_by.as_deref()
  }

  /// Sorted by `(key, value)` for deterministic lookup regardless of the
  /// order the writer received them in.
  pub fn key_value_metadata(&self) -> Option<&[KeyValue]> {
    self.key_value_metadata.as_deref()
  }

  pub fn schema(&self) -> &types::Type {
    self.schema_descr.root_type()
  }

  pub fn schema_descr(&self) -> Arc<SchemaDescriptor> {
    self.schema_descr.clone()
  }
}

/// The whole parsed file: `FileMetaData`, per-row-group metadata, and the
/// optional page-index sidecar.
#[derive(Debug, Clone)]
pub struct ParquetMetaData {
  file_metadata: FileMetaData,
  row_groups: Vec<RowGroupMetaData>,
  column_index: Option<Vec<Vec<ColumnIndex>>>,
  offset_index: Option<Vec<Vec<OffsetIndex>>>,
}

impl ParquetMetaData {
  pub fn new(
    file_metadata: FileMetaData,
    row_groups: Vec<RowGroupMetaData>,
    column_index: Option<Vec<Vec<ColumnIndex>>>,
    offset_index: Option<Vec<Vec<OffsetIndex>>>,
  ) -> Self {
    ParquetMetaData { file_metadata, row_groups, column_index, offset_index }
  }

  pub fn file_metadata(&self) -> &FileMetaData {
    &self.file_metadata
  }

  pub fn num_row_groups(&self) -> usize {
    self.row_groups.len()
  }

  pub fn row_group(&self, i: usize) -> &RowGroupMetaData {
    &self.row_groups[i]
  }

  pub fn row_groups(&self) -> &[RowGroupMetaData] {
    &self.row_groups
  }

  /// `column_index()[row_group_idx][column_idx]`, present only if the
  /// caller didn't set `skip_page_index` and the sidecar decoded cleanly.
  pub fn column_index(&self) -> Option<&[Vec<ColumnIndex>]> {
    self.column_index.as_deref()
  }

  pub fn offset_index(&self) -> Option<&[Vec<OffsetIndex>]> {
    self.offset_index.as_deref()
  }
}

// ----------------------------------------------------------------------
// Page-index sidecar types

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOrder {
  Unordered,
  Ascending,
  Descending,
}

impl From<parquet::BoundaryOrder> for BoundaryOrder {
  fn from(b: parquet::BoundaryOrder) -> Self {
    match b {
      parquet::BoundaryOrder::UNORDERED => BoundaryOrder::Unordered,
      parquet::BoundaryOrder::ASCENDING => BoundaryOrder::Ascending,
      parquet::BoundaryOrder::DESCENDING => BoundaryOrder::Descending,
    }
  }
}

impl From<BoundaryOrder> for parquet::BoundaryOrder {
  fn from(b: BoundaryOrder) -> Self {
    match b {
      BoundaryOrder::Unordered => parquet::BoundaryOrder::UNORDERED,
      BoundaryOrder::Ascending => parquet::BoundaryOrder::ASCENDING,
      BoundaryOrder::Descending => parquet::BoundaryOrder::DESCENDING,
    }
  }
}

/// Per-page min/max/null-count/null-page for one column chunk.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
  pub null_pages: Vec<bool>,
  pub min_values: Vec<Vec<u8>>,
  pub max_values: Vec<Vec<u8>>,
  pub boundary_order: Option<BoundaryOrder>,
  pub null_counts: Option<Vec<i64>>,
}

impl From<&parquet::ColumnIndex> for ColumnIndex {
  fn from(c: &parquet::ColumnIndex) -> Self {
    ColumnIndex {
      null_pages: c.null_pages.clone(),
      min_values: c.min_values.clone(),
      max_values: c.max_values.clone(),
      boundary_order: Some(c.boundary_order.into()),
      null_counts: c.null_counts.clone(),
    }
  }
}

impl From<&ColumnIndex> for parquet::ColumnIndex {
  fn from(c: &ColumnIndex) -> Self {
    parquet::ColumnIndex {
      null_pages: c.null_pages.clone(),
      min_values: c.min_values.clone(),
      max_values: c.max_values.clone(),
      boundary_order: c.boundary_order.unwrap_or(BoundaryOrder::Unordered).into(),
      null_counts: c.null_counts.clone(),
    }
  }
}

/// One page's byte offset, compressed size, and first row index within its
/// column chunk; the first-row-index values are what `seek_to_row` binary
/// searches over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLocation {
  pub offset: i64,
  pub compressed_page_size: i32,
  pub first_row_index: i64,
}

impl From<&parquet::PageLocation> for PageLocation {
  fn from(p: &parquet::PageLocation) -> Self {
    PageLocation { offset: p.offset, compressed_page_size: p.compressed_page_size, first_row_index: p.first_row_index }
  }
}

impl From<&PageLocation> for parquet::PageLocation {
  fn from(p: &PageLocation) -> Self {
    parquet::PageLocation { offset: p.offset, compressed_page_size: p.compressed_page_size, first_row_index: p.first_row_index }
  }
}

#[derive(Debug, Clone, Default)]
pub struct OffsetIndex {
  pub page_locations: Vec<PageLocation>,
}

impl From<&parquet::OffsetIndex> for OffsetIndex {
  fn from(o: &parquet::OffsetIndex) -> Self {
    OffsetIndex { page_locations: o.page_locations.iter().map(PageLocation::from).collect() }
  }
}

impl From<&OffsetIndex> for parquet::OffsetIndex {
  fn from(o: &OffsetIndex) -> Self {
    parquet::OffsetIndex { page_locations: o.page_locations.iter().map(parquet::PageLocation::from).collect() }
  }
}

pub(crate) fn build_file_metadata(
  root: TypePtr,
  t_meta: &parquet::FileMetaData,
) -> Result<(FileMetaData, Arc<SchemaDescriptor>)> {
  let schema_descr = Arc::new(SchemaDescriptor::new(root));
  let mut kv: Vec<KeyValue> = t_meta
    .key_value_metadata
    .as_ref()
    .map(|v| v.iter().map(KeyValue::from).collect())
    .unwrap_or_default();
  kv.sort();
  let file_metadata = FileMetaData::new(
    t_meta.version,
    t_meta.num_rows,
    t_meta.created_by.clone(),
    if kv.is_empty() { None } else { Some(kv) },
    schema_descr.clone(),
  );
  Ok((file_metadata, schema_descr))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::Repetition;
  use crate::schema::types::{GroupTypeBuilder, PrimitiveTypeBuilder};

  fn simple_schema() -> Arc<SchemaDescriptor> {
    let leaf = PrimitiveTypeBuilder::new("a", PhysicalType::INT32)
      .with_repetition(Repetition::REQUIRED)
      .build()
      .unwrap();
    let root = Arc::new(GroupTypeBuilder::new("schema").with_fields(vec![Arc::new(leaf)]).build());
    Arc::new(SchemaDescriptor::new(root))
  }

  #[test]
  fn test_column_chunk_metadata_roundtrip() {
    let meta = ColumnChunkMetaDataBuilder::new(PhysicalType::INT32, vec!["a".to_owned()])
      .set_encodings(vec![Encoding::PLAIN, Encoding::RLE])
      .set_compression(Compression::SNAPPY)
      .set_num_values(10)
      .set_total_uncompressed_size(100)
      .set_total_compressed_size(80)
      .set_data_page_offset(4)
      .build();
    let thrift = meta.to_thrift();
    let back = ColumnChunkMetaData::from_thrift(&thrift).unwrap();
    assert_eq!(back.num_values(), 10);
    assert_eq!(back.compression(), Compression::SNAPPY);
    assert_eq!(back.column_path(), &["a".to_owned()]);
  }

  #[test]
  fn test_row_group_metadata_builder() {
    let schema_descr = simple_schema();
    let col = ColumnChunkMetaDataBuilder::new(PhysicalType::INT32, vec!["a".to_owned()])
      .set_total_uncompressed_size(42)
      .build();
    let rg = RowGroupMetaDataBuilder::new(schema_descr)
      .add_column_metadata(col)
      .set_num_rows(3)
      .build();
    assert_eq!(rg.num_rows(), 3);
    assert_eq!(rg.num_columns(), 1);
    assert_eq!(rg.total_byte_size(), 42);
  }

  #[test]
  fn test_statistics_prefers_modern_field() {
    let t_stats = parquet::Statistics {
      max: Some(vec![9]),
      min: Some(vec![1]),
      null_count: Some(2),
      distinct_count: None,
      max_value: Some(vec![8]),
      min_value: Some(vec![1]),
      is_max_value_exact: None,
      is_min_value_exact: None,
    };
    let stats = Statistics::from(&t_stats);
    assert_eq!(stats.max_value, Some(vec![8]));
    assert_eq!(stats.min_value, Some(vec![1]));
  }
}
