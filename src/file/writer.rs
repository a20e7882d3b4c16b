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

//! Writer-side properties and the file/row-group assembly on top of
//! `column::writer`: `WriterProperties` (with its
//! per-column-path `ColumnProperties` overrides) and the
//! `SerializedFileWriter`/`SerializedRowGroupWriter` pair that turns a
//! sequence of closed column chunks into one positioned file, rebasing each
//! chunk's self-relative offsets against its true place in the stream.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use parquet_format as parquet;

use crate::basic::{Compression, Encoding, Type as PhysicalType};
use crate::column::writer::{ColumnCloseResult, ColumnWriterImpl};
use crate::data_type::{BoolType, ByteArrayType, DoubleType, FixedLenByteArrayType, FloatType, Int32Type, Int64Type, Int96Type};
use crate::errors::Result;
use crate::file::footer;
use crate::file::metadata::{
  self, ColumnChunkMetaData, ColumnChunkMetaDataBuilder, FileMetaData, KeyValue, OffsetIndex, PageLocation,
  RowGroupMetaData, RowGroupMetaDataBuilder, SortingColumn,
};
use crate::file::page_index;
use crate::schema::types::{self, ColumnDescPtr, SchemaDescriptor, TypePtr};

const DEFAULT_PAGE_SIZE: usize = 1024 * 1024;
const DEFAULT_DICTIONARY_PAGE_SIZE_LIMIT: usize = DEFAULT_PAGE_SIZE;
const DEFAULT_WRITE_BATCH_SIZE: usize = 1024;
const DEFAULT_DATA_PAGE_VERSION: i32 = 1;
const DEFAULT_CREATED_BY: &str = "parquet-core";

// ----------------------------------------------------------------------
// Writer properties

/// Per-column-path writer behavior: dictionary use, codec, encoding, and
/// whether to skip the page-index sidecar for that column.
/// `column::writer::ColumnWriterImpl` takes one of these directly; a
/// `WriterProperties` hands out a clone per column, falling back to its
/// defaults for any path without an override.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProperties {
  pub dictionary_enabled: bool,
  pub dictionary_page_size_limit: usize,
  pub codec: Compression,
  pub encoding: Option<Encoding>,
  pub skip_page_index: bool,
}

impl Default for ColumnProperties {
  fn default() -> Self {
    ColumnProperties {
      dictionary_enabled: true,
      dictionary_page_size_limit: DEFAULT_DICTIONARY_PAGE_SIZE_LIMIT,
      codec: Compression::UNCOMPRESSED,
      encoding: None,
      skip_page_index: false,
    }
  }
}

/// File-level writer options: page-cut size, batch size, the data page
/// version to emit, a default `ColumnProperties`, per-column-path overrides,
/// the asserted sort order, and user key/value metadata.
#[derive(Debug, Clone)]
pub struct WriterProperties {
  page_size: usize,
  write_batch_size: usize,
  data_page_version: i32,
  default_column_properties: ColumnProperties,
  column_properties: HashMap<Vec<String>, ColumnProperties>,
  sorting_columns: Option<Vec<SortingColumn>>,
  key_value_metadata: Option<Vec<KeyValue>>,
  created_by: String,
}

impl WriterProperties {
  pub fn builder() -> WriterPropertiesBuilder {
    WriterPropertiesBuilder::new()
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  pub fn write_batch_size(&self) -> usize {
    self.write_batch_size
  }

  pub fn data_page_version(&self) -> i32 {
    self.data_page_version
  }

  /// The effective `ColumnProperties` for a leaf at `path`: its override if
  /// one was registered, else the file's default.
  pub fn column_properties(&self, path: &[String]) -> &ColumnProperties {
    self.column_properties.get(path).unwrap_or(&self.default_column_properties)
  }

  pub fn sorting_columns(&self) -> Option<&[SortingColumn]> {
    self.sorting_columns.as_deref()
  }

  pub fn key_value_metadata(&self) -> Option<&[KeyValue]> {
    self.key_value_metadata.as_deref()
  }

  pub fn created_by(&self) -> &str {
    &self.created_by
  }
}

impl Default for WriterProperties {
  fn default() -> Self {
    WriterPropertiesBuilder::new().build()
  }
}

pub struct WriterPropertiesBuilder {
  page_size: usize,
  write_batch_size: usize,
  data_page_version: i32,
  default_column_properties: ColumnProperties,
  column_properties: HashMap<Vec<String>, ColumnProperties>,
  sorting_columns: Option<Vec<SortingColumn>>,
  key_value_metadata: Option<Vec<KeyValue>>,
  created_by: String,
}

impl WriterPropertiesBuilder {
  fn new() -> Self {
    WriterPropertiesBuilder {
      page_size: DEFAULT_PAGE_SIZE,
      write_batch_size: DEFAULT_WRITE_BATCH_SIZE,
      data_page_version: DEFAULT_DATA_PAGE_VERSION,
      default_column_properties: ColumnProperties::default(),
      column_properties: HashMap::new(),
      sorting_columns: None,
      key_value_metadata: None,
      created_by: DEFAULT_CREATED_BY.to_owned(),
    }
  }

  pub fn set_page_size(mut self, value: usize) -> Self {
    self.page_size = value;
    self
  }

  pub fn set_write_batch_size(mut self, value: usize) -> Self {
    self.write_batch_size = value;
    self
  }

  pub fn set_data_page_version(mut self, value: i32) -> Self {
    self.data_page_version = value;
    self
  }

  pub fn set_dictionary_enabled(mut self, value: bool) -> Self {
    self.default_column_properties.dictionary_enabled = value;
    self
  }

  pub fn set_dictionary_page_size_limit(mut self, value: usize) -> Self {
    self.default_column_properties.dictionary_page_size_limit = value;
    self
  }

  pub fn set_compression(mut self, value: Compression) -> Self {
    self.default_column_properties.codec = value;
    self
  }

  pub fn set_encoding(mut self, value: Encoding) -> Self {
    self.default_column_properties.encoding = Some(value);
    self
  }

  pub fn set_skip_page_index(mut self, value: bool) -> Self {
    self.default_column_properties.skip_page_index = value;
    self
  }

  /// Overrides one `ColumnProperties` field for a single column path,
  /// seeding it from the current default if this is the path's first
  /// override.
  pub fn set_column_dictionary_enabled(mut self, path: Vec<String>, value: bool) -> Self {
    let default = self.default_column_properties.clone();
    self.column_properties.entry(path).or_insert(default).dictionary_enabled = value;
    self
  }

  pub fn set_column_compression(mut self, path: Vec<String>, value: Compression) -> Self {
    let default = self.default_column_properties.clone();
    self.column_properties.entry(path).or_insert(default).codec = value;
    self
  }

  pub fn set_column_encoding(mut self, path: Vec<String>, value: Encoding) -> Self {
    let default = self.default_column_properties.clone();
    self.column_properties.entry(path).or_insert(default).encoding = Some(value);
    self
  }

  pub fn set_sorting_columns(mut self, value: Option<Vec<SortingColumn>>) -> Self {
    self.sorting_columns = value;
    self
  }

  pub fn set_key_value_metadata(mut self, value: Option<Vec<KeyValue>>) -> Self {
    self.key_value_metadata = value;
    self
  }

  pub fn set_created_by(mut self, value: String) -> Self {
    self.created_by = value;
    self
  }

  pub fn build(self) -> WriterProperties {
    WriterProperties {
      page_size: self.page_size,
      write_batch_size: self.write_batch_size,
      data_page_version: self.data_page_version,
      default_column_properties: self.default_column_properties,
      column_properties: self.column_properties,
      sorting_columns: self.sorting_columns,
      key_value_metadata: self.key_value_metadata,
      created_by: self.created_by,
    }
  }
}

// ----------------------------------------------------------------------
// Column writer dispatch

/// One column chunk's writer, tagged by the physical type it was
/// constructed for. A schema's leaf types are only known at run time, so
/// `get_column_writer` dispatches to the matching `ColumnWriterImpl<T>`
/// variant the same way `column::page::Page` tags its payload by page kind.
pub enum ColumnWriter {
  BoolColumnWriter(ColumnWriterImpl<BoolType>),
  Int32ColumnWriter(ColumnWriterImpl<Int32Type>),
  Int64ColumnWriter(ColumnWriterImpl<Int64Type>),
  Int96ColumnWriter(ColumnWriterImpl<Int96Type>),
  FloatColumnWriter(ColumnWriterImpl<FloatType>),
  DoubleColumnWriter(ColumnWriterImpl<DoubleType>),
  ByteArrayColumnWriter(ColumnWriterImpl<ByteArrayType>),
  FixedLenByteArrayColumnWriter(ColumnWriterImpl<FixedLenByteArrayType>),
}

impl ColumnWriter {
  pub fn close(self) -> Result<ColumnCloseResult> {
    match self {
      ColumnWriter::BoolColumnWriter(w) => w.close(),
      ColumnWriter::Int32ColumnWriter(w) => w.close(),
      ColumnWriter::Int64ColumnWriter(w) => w.close(),
      ColumnWriter::Int96ColumnWriter(w) => w.close(),
      ColumnWriter::FloatColumnWriter(w) => w.close(),
      ColumnWriter::DoubleColumnWriter(w) => w.close(),
      ColumnWriter::ByteArrayColumnWriter(w) => w.close(),
      ColumnWriter::FixedLenByteArrayColumnWriter(w) => w.close(),
    }
  }
}

/// Extracts the concrete `ColumnWriterImpl<T>` out of a `ColumnWriter`,
/// panicking if it doesn't hold the expected variant. For callers (e.g. row
/// assembly) that already know a leaf's physical type from the schema and
/// just obtained its writer from `next_column`.
#[macro_export]
macro_rules! get_typed_column_writer_mut {
  ($col_writer:expr, $variant:ident) => {
    match $col_writer {
      $crate::file::writer::ColumnWriter::$variant(ref mut w) => w,
      _ => panic!("expected {} column writer", stringify!($variant)),
    }
  };
}

/// Constructs the column writer matching `descr`'s physical type.
pub fn get_column_writer(
  descr: ColumnDescPtr,
  props: ColumnProperties,
  page_size: usize,
  data_page_version: i32,
) -> Result<ColumnWriter> {
  Ok(match descr.physical_type() {
    PhysicalType::BOOLEAN => {
      ColumnWriter::BoolColumnWriter(ColumnWriterImpl::new(descr, props, page_size, data_page_version)?)
    }
    PhysicalType::INT32 => {
      ColumnWriter::Int32ColumnWriter(ColumnWriterImpl::new(descr, props, page_size, data_page_version)?)
    }
    PhysicalType::INT64 => {
      ColumnWriter::Int64ColumnWriter(ColumnWriterImpl::new(descr, props, page_size, data_page_version)?)
    }
    PhysicalType::INT96 => {
      ColumnWriter::Int96ColumnWriter(ColumnWriterImpl::new(descr, props, page_size, data_page_version)?)
    }
    PhysicalType::FLOAT => {
      ColumnWriter::FloatColumnWriter(ColumnWriterImpl::new(descr, props, page_size, data_page_version)?)
    }
    PhysicalType::DOUBLE => {
      ColumnWriter::DoubleColumnWriter(ColumnWriterImpl::new(descr, props, page_size, data_page_version)?)
    }
    PhysicalType::BYTE_ARRAY => {
      ColumnWriter::ByteArrayColumnWriter(ColumnWriterImpl::new(descr, props, page_size, data_page_version)?)
    }
    PhysicalType::FIXED_LEN_BYTE_ARRAY => {
      ColumnWriter::FixedLenByteArrayColumnWriter(ColumnWriterImpl::new(descr, props, page_size, data_page_version)?)
    }
  })
}

// ----------------------------------------------------------------------
// File/row-group assembly

/// Counts bytes written through a sink, so a row group writer can rebase a
/// just-closed column chunk's self-relative offsets against its true
/// position in the file, since pages were written against offsets relative
/// to the start of the row group.
struct TrackedWrite<W: Write> {
  inner: W,
  bytes_written: u64,
}

impl<W: Write> TrackedWrite<W> {
  fn new(inner: W) -> Self {
    TrackedWrite { inner, bytes_written: 0 }
  }

  fn bytes_written(&self) -> u64 {
    self.bytes_written
  }
}

impl<W: Write> Write for TrackedWrite<W> {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    let n = self.inner.write(buf)?;
    self.bytes_written += n as u64;
    Ok(n)
  }

  fn flush(&mut self) -> std::io::Result<()> {
    self.inner.flush()
  }
}

/// Writes one row group: hands out a `ColumnWriter` per leaf in schema
/// order, and on `close_column` writes that chunk's bytes to the file and
/// rebases its metadata/page-index offsets against where it actually landed
/// once every column is closed.
pub struct SerializedRowGroupWriter<'a, W: Write> {
  schema_descr: Arc<SchemaDescriptor>,
  properties: Arc<WriterProperties>,
  file_writer: &'a mut SerializedFileWriter<W>,
  column_index: usize,
  column_chunks: Vec<ColumnChunkMetaData>,
  total_rows_written: Option<i64>,
}

impl<'a, W: Write> SerializedRowGroupWriter<'a, W> {
  fn new(
    schema_descr: Arc<SchemaDescriptor>,
    properties: Arc<WriterProperties>,
    file_writer: &'a mut SerializedFileWriter<W>,
  ) -> Self {
    SerializedRowGroupWriter {
      schema_descr,
      properties,
      file_writer,
      column_index: 0,
      column_chunks: Vec::new(),
      total_rows_written: None,
    }
  }

  /// The next column's writer in schema (depth-first leaf) order, or `None`
  /// once every leaf has been written.
  pub fn next_column(&mut self) -> Result<Option<ColumnWriter>> {
    if self.column_index >= self.schema_descr.num_columns() {
      return Ok(None);
    }
    let descr = self.schema_descr.column(self.column_index).clone();
    let props = self.properties.column_properties(descr.path()).clone();
    let page_size = self.properties.page_size();
    let data_page_version = self.properties.data_page_version();
    self.column_index += 1;
    Ok(Some(get_column_writer(descr, props, page_size, data_page_version)?))
  }

  /// Finishes one column: writes its dictionary/data pages and (unless
  /// skipped) its page-index sidecar entries to the file, at whatever
  /// offset the sink is currently positioned at.
  pub fn close_column(&mut self, column_writer: ColumnWriter) -> Result<()> {
    let result = column_writer.close()?;
    self.write_column_chunk(result)
  }

  fn write_column_chunk(&mut self, result: ColumnCloseResult) -> Result<()> {
    match self.total_rows_written {
      Some(expected) if expected != result.num_rows => {
        return Err(general_err!(
          "column chunk has {} rows but row group already has {}",
          result.num_rows,
          expected
        ));
      }
      None => self.total_rows_written = Some(result.num_rows),
      _ => {}
    }

    let chunk_start_offset = self.file_writer.sink.bytes_written() as i64;
    self.file_writer.sink.write_all(&result.bytes)?;

    let offset_index = result.offset_index.map(|oi| OffsetIndex {
      page_locations: oi
        .page_locations
        .into_iter()
        .map(|p| PageLocation {
          offset: p.offset + chunk_start_offset,
          compressed_page_size: p.compressed_page_size,
          first_row_index: p.first_row_index,
        })
        .collect(),
    });

    let mut builder =
      ColumnChunkMetaDataBuilder::new(result.metadata.column_type(), result.metadata.column_path().to_vec())
        .set_encodings(result.metadata.encodings().to_vec())
        .set_compression(result.metadata.compression())
        .set_num_values(result.metadata.num_values())
        .set_total_uncompressed_size(result.metadata.total_uncompressed_size())
        .set_total_compressed_size(result.metadata.total_compressed_size())
        .set_data_page_offset(result.metadata.data_page_offset() + chunk_start_offset)
        .set_dictionary_page_offset(result.metadata.dictionary_page_offset().map(|o| o + chunk_start_offset))
        .set_statistics(result.metadata.statistics().cloned());

    if let Some(ci) = &result.column_index {
      let bytes = page_index::encode_column_index(ci)?;
      let offset = self.file_writer.sink.bytes_written() as i64;
      self.file_writer.sink.write_all(&bytes)?;
      builder = builder.set_column_index(offset, bytes.len() as i32);
    }
    if let Some(oi) = &offset_index {
      let bytes = page_index::encode_offset_index(oi)?;
      let offset = self.file_writer.sink.bytes_written() as i64;
      self.file_writer.sink.write_all(&bytes)?;
      builder = builder.set_offset_index(offset, bytes.len() as i32);
    }

    self.column_chunks.push(builder.build());
    Ok(())
  }

  /// Finalizes the row group, registering its metadata with the parent file
  /// writer. Errs if fewer columns were written than the schema declares.
  pub fn close(self) -> Result<RowGroupMetaData> {
    if self.column_index != self.schema_descr.num_columns() {
      return Err(general_err!(
        "row group writer closed with {} of {} columns written",
        self.column_index,
        self.schema_descr.num_columns()
      ));
    }
    let num_rows = self.total_rows_written.unwrap_or(0);
    let mut builder = RowGroupMetaDataBuilder::new(self.schema_descr.clone())
      .set_num_rows(num_rows)
      .set_sorting_columns(self.properties.sorting_columns().map(|s| s.to_vec()));
    for column in self.column_chunks {
      builder = builder.add_column_metadata(column);
    }
    let row_group = builder.build();
    self.file_writer.row_groups.push(row_group.clone());
    Ok(row_group)
  }
}

/// Opens a new Parquet file over any `Write` sink: writes the leading
/// `PAR1` magic immediately, then hands out one `SerializedRowGroupWriter`
/// at a time until the caller calls `close`, which appends the page-index
/// sidecar already embedded in each chunk's metadata, the Thrift footer,
/// its length, and the trailing magic.
pub struct SerializedFileWriter<W: Write> {
  sink: TrackedWrite<W>,
  schema: TypePtr,
  schema_descr: Arc<SchemaDescriptor>,
  properties: Arc<WriterProperties>,
  row_groups: Vec<RowGroupMetaData>,
  is_closed: bool,
}

impl<W: Write> SerializedFileWriter<W> {
  pub fn new(mut sink: W, schema: TypePtr, properties: Arc<WriterProperties>) -> Result<Self> {
    sink.write_all(&footer::MAGIC)?;
    let schema_descr = Arc::new(SchemaDescriptor::new(schema.clone()));
    Ok(SerializedFileWriter {
      sink: TrackedWrite::new(sink),
      schema,
      schema_descr,
      properties,
      row_groups: Vec::new(),
      is_closed: false,
    })
  }

  pub fn schema_descr(&self) -> Arc<SchemaDescriptor> {
    self.schema_descr.clone()
  }

  pub fn properties(&self) -> &WriterProperties {
    &self.properties
  }

  pub fn next_row_group(&mut self) -> Result<SerializedRowGroupWriter<'_, W>> {
    if self.is_closed {
      return Err(general_err!("cannot start a row group on a closed file writer"));
    }
    Ok(SerializedRowGroupWriter::new(self.schema_descr.clone(), self.properties.clone(), self))
  }

  /// Writes the footer and trailing magic, consuming the writer. Returns
  /// the assembled `FileMetaData` so a caller can inspect what was written
  /// without reopening the file.
  pub fn close(mut self) -> Result<FileMetaData> {
    if self.is_closed {
      return Err(general_err!("file writer is already closed"));
    }
    self.is_closed = true;

    let num_rows = self.row_groups.iter().map(RowGroupMetaData::num_rows).sum();
    let t_meta = parquet::FileMetaData {
      version: 2,
      schema: types::to_thrift(&self.schema),
      num_rows,
      row_groups: self.row_groups.iter().map(RowGroupMetaData::to_thrift).collect(),
      key_value_metadata: self.properties.key_value_metadata().map(|kv| kv.iter().map(parquet::KeyValue::from).collect()),
      created_by: Some(self.properties.created_by().to_owned()),
      column_orders: None,
      encryption_algorithm: None,
      footer_signing_key_metadata: None,
    };

    let footer_bytes = footer::write_metadata_bytes(&t_meta)?;
    self.sink.write_all(&footer_bytes)?;
    self.sink.write_all(&(footer_bytes.len() as u32).to_le_bytes())?;
    self.sink.write_all(&footer::MAGIC)?;
    self.sink.flush()?;

    let (file_metadata, _schema_descr) = metadata::build_file_metadata(self.schema.clone(), &t_meta)?;
    Ok(file_metadata)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::{Repetition, Type as PhysicalType};
  use crate::column::reader::ColumnReader;
  use crate::data_type::Int32Type;
  use crate::file::reader::{FileReader, RowGroupReader, SerializedFileReader};
  use crate::schema::types::{GroupTypeBuilder, PrimitiveTypeBuilder};

  fn int_schema() -> TypePtr {
    let a = PrimitiveTypeBuilder::new("a", PhysicalType::INT32)
      .with_repetition(Repetition::REQUIRED)
      .build()
      .unwrap();
    let b = PrimitiveTypeBuilder::new("b", PhysicalType::INT32)
      .with_repetition(Repetition::OPTIONAL)
      .build()
      .unwrap();
    Arc::new(GroupTypeBuilder::new("schema").with_fields(vec![Arc::new(a), Arc::new(b)]).build())
  }

  #[test]
  fn test_roundtrip_single_row_group() {
    let schema = int_schema();
    let props = Arc::new(WriterProperties::builder().set_dictionary_enabled(false).build());
    let mut writer: SerializedFileWriter<Vec<u8>> = SerializedFileWriter::new(Vec::new(), schema, props).unwrap();

    let mut row_group_writer = writer.next_row_group().unwrap();

    let col_a = row_group_writer.next_column().unwrap().unwrap();
    let w = get_typed_column_writer_mut!(col_a, Int32ColumnWriter);
    w.write_batch(&[1, 2, 3], None, None).unwrap();
    row_group_writer.close_column(col_a).unwrap();

    let col_b = row_group_writer.next_column().unwrap().unwrap();
    let w = get_typed_column_writer_mut!(col_b, Int32ColumnWriter);
    w.write_batch(&[10, 30], Some(&[1, 0, 1]), None).unwrap();
    row_group_writer.close_column(col_b).unwrap();

    assert!(row_group_writer.next_column().unwrap().is_none());
    let rg = row_group_writer.close().unwrap();
    assert_eq!(rg.num_rows(), 3);

    let file_metadata = writer.close().unwrap();
    assert_eq!(file_metadata.num_rows(), 3);
    assert_eq!(file_metadata.created_by(), Some(DEFAULT_CREATED_BY));
  }

  #[test]
  fn test_written_file_reads_back_correctly() {
    let schema = int_schema();
    let props = Arc::new(WriterProperties::builder().set_dictionary_enabled(false).build());
    let mut buf: Vec<u8> = Vec::new();
    {
      let mut writer = SerializedFileWriter::new(&mut buf, schema, props).unwrap();
      let mut row_group_writer = writer.next_row_group().unwrap();

      let col_a = row_group_writer.next_column().unwrap().unwrap();
      let w = get_typed_column_writer_mut!(col_a, Int32ColumnWriter);
      w.write_batch(&[1, 2, 3], None, None).unwrap();
      row_group_writer.close_column(col_a).unwrap();

      let col_b = row_group_writer.next_column().unwrap().unwrap();
      let w = get_typed_column_writer_mut!(col_b, Int32ColumnWriter);
      w.write_batch(&[10, 30], Some(&[1, 0, 1]), None).unwrap();
      row_group_writer.close_column(col_b).unwrap();

      row_group_writer.close().unwrap();
      writer.close().unwrap();
    }

    let reader = SerializedFileReader::new(buf).unwrap();
    assert_eq!(reader.num_row_groups(), 1);
    let rg_reader = reader.get_row_group(0).unwrap();
    assert_eq!(rg_reader.num_columns(), 2);

    let descr_a = reader.metadata().file_metadata().schema_descr().column(0).clone();
    let page_reader_a = rg_reader.get_column_page_reader(0).unwrap();
    let mut col_reader_a: ColumnReader<Int32Type> = ColumnReader::new(descr_a, 0, page_reader_a);
    let mut values_a = vec![0i32; 3];
    let (n, _) = col_reader_a.read_batch(3, None, None, &mut values_a).unwrap();
    assert_eq!(n, 3);
    assert_eq!(values_a, vec![1, 2, 3]);

    let descr_b = reader.metadata().file_metadata().schema_descr().column(1).clone();
    let page_reader_b = rg_reader.get_column_page_reader(1).unwrap();
    let mut col_reader_b: ColumnReader<Int32Type> = ColumnReader::new(descr_b, 1, page_reader_b);
    let mut def_out = vec![0i16; 3];
    let mut values_b = vec![0i32; 3];
    let (n, levels) = col_reader_b.read_batch(3, Some(&mut def_out), None, &mut values_b).unwrap();
    assert_eq!(levels, 3);
    assert_eq!(n, 2);
    assert_eq!(def_out, vec![1, 0, 1]);
    assert_eq!(values_b[0], 10);
    assert_eq!(values_b[2], 30);
  }

  #[test]
  fn test_close_before_all_columns_written_errors() {
    let schema = int_schema();
    let props = Arc::new(WriterProperties::default());
    let mut writer: SerializedFileWriter<Vec<u8>> = SerializedFileWriter::new(Vec::new(), schema, props).unwrap();
    let mut row_group_writer = writer.next_row_group().unwrap();
    let col_a = row_group_writer.next_column().unwrap().unwrap();
    row_group_writer.close_column(col_a).unwrap();
    assert!(row_group_writer.close().is_err());
  }
}
