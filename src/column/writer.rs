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

//! Buffers one column chunk's values and emits its page stream. Row groups
//! are buffered in memory then committed atomically as one sequential
//! write, so every page this writer produces is held in memory until
//! `close()`: this lets the dictionary page, whose contents aren't final
//! until the last value has been seen, be written before the data pages
//! that reference it without a second pass over the column.

use std::collections::HashSet;

use parquet_format as parquet;
use thrift::protocol::TCompactOutputProtocol;

use crate::basic::{Compression, Encoding};
use crate::compression::{checksum, create_codec, Codec};
use crate::data_type::{AsBytes, DataType};
use crate::encodings::encoding::{get_encoder, DictEncoder, Encoder};
use crate::encodings::levels::LevelEncoder;
use crate::errors::Result;
use crate::file::metadata::{ColumnChunkMetaData, ColumnChunkMetaDataBuilder, ColumnIndex, OffsetIndex, PageLocation, Statistics};
use crate::file::writer::ColumnProperties;
use crate::schema::types::ColumnDescPtr;
use crate::util::memory::ByteBufferPtr;
use crate::util::ordering;

/// One finished page's framed bytes plus the page-index facts about it,
/// kept separate from the bytes themselves so `ColumnWriterImpl::close`
/// doesn't have to re-parse what it just wrote.
struct PreparedPage {
  bytes: Vec<u8>,
  is_dictionary: bool,
  null_page: bool,
  min: Option<Vec<u8>>,
  max: Option<Vec<u8>>,
  null_count: i64,
  first_row_index: i64,
}

/// The return of `ColumnWriterImpl::close`: the column chunk's fully framed
/// byte stream (offsets still relative to its own start) plus the metadata
/// `file::writer` rebases against the chunk's actual file offset.
pub struct ColumnCloseResult {
  pub bytes: Vec<u8>,
  pub num_rows: i64,
  pub metadata: ColumnChunkMetaData,
  pub column_index: Option<ColumnIndex>,
  pub offset_index: Option<OffsetIndex>,
}

/// Per-column value/level buffers, running statistics, and the page-cut
/// policy.
pub struct ColumnWriterImpl<T: DataType> {
  descr: ColumnDescPtr,
  props: ColumnProperties,
  page_size: usize,
  data_page_version: i32,
  compressor: Box<dyn Codec>,

  def_levels_sink: Vec<i16>,
  rep_levels_sink: Vec<i16>,
  values_sink: Vec<T::T>,

  dict_encoder: Option<DictEncoder<T>>,
  fallback_encoder: Option<Box<dyn Encoder<T>>>,
  fell_back: bool,

  page_min: Option<Vec<u8>>,
  page_max: Option<Vec<u8>>,
  chunk_min: Option<Vec<u8>>,
  chunk_max: Option<Vec<u8>>,
  page_null_count: i64,
  chunk_null_count: i64,

  pages: Vec<PreparedPage>,
  encodings_used: HashSet<Encoding>,
  total_uncompressed_size: i64,
  total_compressed_size: i64,
  total_num_values: i64,
  rows_written: i64,
  rows_written_before_page: i64,
}

impl<T: DataType> ColumnWriterImpl<T> {
  pub fn new(descr: ColumnDescPtr, props: ColumnProperties, page_size: usize, data_page_version: i32) -> Result<Self> {
    let compressor = create_codec_for(props.codec)?;
    let dict_encoder = if props.dictionary_enabled { Some(DictEncoder::<T>::new(descr.clone())) } else { None };
    Ok(ColumnWriterImpl {
      descr,
      props,
      page_size,
      data_page_version,
      compressor,
      def_levels_sink: Vec::new(),
      rep_levels_sink: Vec::new(),
      values_sink: Vec::new(),
      dict_encoder,
      fallback_encoder: None,
      fell_back: false,
      page_min: None,
      page_max: None,
      chunk_min: None,
      chunk_max: None,
      page_null_count: 0,
      chunk_null_count: 0,
      pages: Vec::new(),
      encodings_used: HashSet::new(),
      total_uncompressed_size: 0,
      total_compressed_size: 0,
      total_num_values: 0,
      rows_written: 0,
      rows_written_before_page: 0,
    })
  }

  fn max_def_level(&self) -> i16 {
    self.descr.max_def_level()
  }

  fn max_rep_level(&self) -> i16 {
    self.descr.max_rep_level()
  }

  /// Appends `values` (non-null entries only, in order) tagged by parallel
  /// `def_levels`/`rep_levels` (one entry per physical record slot,
  /// including nulls). Returns the number of values consumed from `values`.
  pub fn write_batch(
    &mut self,
    values: &[T::T],
    def_levels: Option<&[i16]>,
    rep_levels: Option<&[i16]>,
  ) -> Result<usize> {
    let max_def = self.max_def_level();
    let num_levels = match def_levels {
      Some(d) => d.len(),
      None => values.len(),
    };
    if let Some(rep) = rep_levels {
      if rep.len() != num_levels {
        return Err(general_err!(
          "rep_levels length {} does not match def_levels length {}",
          rep.len(),
          num_levels
        ));
      }
    }

    let mut value_pos = 0usize;
    for i in 0..num_levels {
      let def = def_levels.map(|d| d[i]).unwrap_or(max_def);
      let rep = rep_levels.map(|r| r[i]).unwrap_or(0);
      if rep == 0 {
        self.rows_written += 1;
      }
      self.def_levels_sink.push(def);
      self.rep_levels_sink.push(rep);
      if def == max_def {
        let v = values.get(value_pos).ok_or_else(|| {
          general_err!("def_levels declared more non-null values than `values` provided")
        })?;
        self.update_stats(v);
        self.values_sink.push(v.clone());
        value_pos += 1;
      } else {
        self.page_null_count += 1;
        self.chunk_null_count += 1;
      }
    }

    if self.estimated_page_size() >= self.page_size {
      self.add_data_page()?;
    }
    Ok(value_pos)
  }

  fn update_stats(&mut self, v: &T::T) {
    let physical_type = T::get_physical_type();
    let bytes = v.as_bytes();
    if ordering::is_nan_bytes(physical_type, &bytes) {
      return;
    }
    if self.page_min.as_ref().map_or(true, |m| ordering::compare(physical_type, &bytes, m) == std::cmp::Ordering::Less) {
      self.page_min = Some(bytes.clone());
    }
    if self.page_max.as_ref().map_or(true, |m| ordering::compare(physical_type, &bytes, m) == std::cmp::Ordering::Greater) {
      self.page_max = Some(bytes.clone());
    }
    if self.chunk_min.as_ref().map_or(true, |m| ordering::compare(physical_type, &bytes, m) == std::cmp::Ordering::Less) {
      self.chunk_min = Some(bytes.clone());
    }
    if self.chunk_max.as_ref().map_or(true, |m| ordering::compare(physical_type, &bytes, m) == std::cmp::Ordering::Greater) {
      self.chunk_max = Some(bytes);
    }
  }

  fn estimated_page_size(&self) -> usize {
    let values_size = match (&self.dict_encoder, &self.fallback_encoder) {
      (Some(d), _) if !self.fell_back => d.estimated_data_encoded_size(),
      (_, Some(e)) => e.estimated_data_encoded_size(),
      _ => self.values_sink.len() * T::get_type_size().unwrap_or(4),
    };
    let levels_size = self.def_levels_sink.len() * 2 + self.rep_levels_sink.len() * 2;
    values_size + levels_size
  }

  /// Forces a page cut with whatever is currently buffered.
  pub fn flush(&mut self) -> Result<()> {
    self.add_data_page()
  }

  fn current_encoder_is_dict(&mut self) -> Result<bool> {
    if self.fell_back {
      return Ok(false);
    }
    if let Some(ref dict) = self.dict_encoder {
      let limit = self.props.dictionary_page_size_limit;
      if dict.write_dict()?.len() > limit {
        self.fell_back = true;
        return Ok(false);
      }
      return Ok(true);
    }
    Ok(false)
  }

  fn add_data_page(&mut self) -> Result<()> {
    if self.def_levels_sink.is_empty() {
      return Ok(());
    }

    let num_values = self.def_levels_sink.len();
    let max_def = self.max_def_level();
    let max_rep = self.max_rep_level();

    let num_rows = if max_rep > 0 {
      self.rep_levels_sink.iter().filter(|&&r| r == 0).count() as i32
    } else {
      num_values as i32
    };

    let use_dict = self.current_encoder_is_dict()?;
    let (value_bytes, encoding) = if use_dict {
      let dict = self.dict_encoder.as_mut().expect("dict_encoder present when use_dict");
      dict.put(&self.values_sink)?;
      (dict.flush_buffer()?, Encoding::RLE_DICTIONARY)
    } else {
      if self.fallback_encoder.is_none() {
        let enc = self.props.encoding.unwrap_or(Encoding::PLAIN);
        self.fallback_encoder = Some(get_encoder::<T>(self.descr.clone(), enc)?);
      }
      let enc = self.fallback_encoder.as_mut().expect("fallback_encoder just installed");
      enc.put(&self.values_sink)?;
      let encoding = enc.encoding();
      (enc.flush_buffer()?, encoding)
    };
    self.values_sink.clear();
    self.encodings_used.insert(encoding);
    self.encodings_used.insert(Encoding::RLE);

    let rep_bytes = if max_rep > 0 {
      let size = LevelEncoder::max_buffer_size(Encoding::RLE, max_rep, num_values);
      let mut enc = LevelEncoder::new(Encoding::RLE, max_rep, vec![0u8; size]);
      enc.put(&self.rep_levels_sink)?;
      Some(enc.consume()?)
    } else {
      None
    };
    let def_bytes = if max_def > 0 {
      let size = LevelEncoder::max_buffer_size(Encoding::RLE, max_def, num_values);
      let mut enc = LevelEncoder::new(Encoding::RLE, max_def, vec![0u8; size]);
      enc.put(&self.def_levels_sink)?;
      Some(enc.consume()?)
    } else {
      None
    };
    self.def_levels_sink.clear();
    self.rep_levels_sink.clear();

    let page_bytes = if self.data_page_version == 2 {
      self.build_v2_page(num_values as i32, num_rows, encoding, rep_bytes, def_bytes, value_bytes.as_slice())?
    } else {
      self.build_v1_page(num_values as i32, encoding, rep_bytes, def_bytes, value_bytes.as_slice())?
    };

    let null_page = self.page_null_count == num_values as i64;
    self.pages.push(PreparedPage {
      bytes: page_bytes,
      is_dictionary: false,
      null_page,
      min: self.page_min.take(),
      max: self.page_max.take(),
      null_count: self.page_null_count,
      first_row_index: self.rows_written_before_page,
    });
    self.page_null_count = 0;
    self.rows_written_before_page += num_rows as i64;
    self.total_num_values += num_values as i64;
    Ok(())
  }

  #[allow(clippy::too_many_arguments)]
  fn build_v1_page(
    &mut self,
    num_values: i32,
    encoding: Encoding,
    rep_bytes: Option<Vec<u8>>,
    def_bytes: Option<Vec<u8>>,
    value_bytes: &[u8],
  ) -> Result<Vec<u8>> {
    let mut uncompressed = Vec::new();
    if let Some(rep) = &rep_bytes {
      uncompressed.extend_from_slice(rep);
    }
    if let Some(def) = &def_bytes {
      uncompressed.extend_from_slice(def);
    }
    uncompressed.extend_from_slice(value_bytes);

    let mut compressed = Vec::new();
    self.compressor.compress(&uncompressed, &mut compressed)?;

    let header = parquet::PageHeader {
      type_: parquet::PageType::DataPage,
      uncompressed_page_size: uncompressed.len() as i32,
      compressed_page_size: compressed.len() as i32,
      crc: Some(checksum(&compressed) as i32),
      data_page_header: Some(parquet::DataPageHeader {
        num_values,
        encoding: encoding.into(),
        definition_level_encoding: parquet::Encoding::RLE,
        repetition_level_encoding: parquet::Encoding::RLE,
        statistics: None,
      }),
      index_page_header: None,
      dictionary_page_header: None,
      data_page_header_v2: None,
    };
    let header_bytes = encode_thrift(&header)?;
    self.total_uncompressed_size += (header_bytes.len() + uncompressed.len()) as i64;
    self.total_compressed_size += (header_bytes.len() + compressed.len()) as i64;

    let mut out = header_bytes;
    out.extend_from_slice(&compressed);
    Ok(out)
  }

  #[allow(clippy::too_many_arguments)]
  fn build_v2_page(
    &mut self,
    num_values: i32,
    num_rows: i32,
    encoding: Encoding,
    rep_bytes: Option<Vec<u8>>,
    def_bytes: Option<Vec<u8>>,
    value_bytes: &[u8],
  ) -> Result<Vec<u8>> {
    // v2 stores levels uncompressed and unframed (no length prefix, since
    // the header declares their byte lengths directly): strip the 4-byte
    // RLE length prefix `LevelEncoder::consume` always adds.
    let strip_prefix = |b: Option<Vec<u8>>| -> Vec<u8> {
      match b {
        Some(bytes) => bytes[4..].to_vec(),
        None => Vec::new(),
      }
    };
    let rep_raw = strip_prefix(rep_bytes);
    let def_raw = strip_prefix(def_bytes);

    let mut compressed_values = Vec::new();
    self.compressor.compress(value_bytes, &mut compressed_values)?;

    let uncompressed_page_size = rep_raw.len() + def_raw.len() + value_bytes.len();
    let compressed_page_size = rep_raw.len() + def_raw.len() + compressed_values.len();

    let mut payload = Vec::with_capacity(compressed_page_size);
    payload.extend_from_slice(&rep_raw);
    payload.extend_from_slice(&def_raw);
    payload.extend_from_slice(&compressed_values);

    let header = parquet::PageHeader {
      type_: parquet::PageType::DataPageV2,
      uncompressed_page_size: uncompressed_page_size as i32,
      compressed_page_size: compressed_page_size as i32,
      crc: Some(checksum(&payload) as i32),
      data_page_header: None,
      index_page_header: None,
      dictionary_page_header: None,
      data_page_header_v2: Some(parquet::DataPageHeaderV2 {
        num_values,
        num_nulls: self.page_null_count as i32,
        num_rows,
        encoding: encoding.into(),
        definition_levels_byte_length: def_raw.len() as i32,
        repetition_levels_byte_length: rep_raw.len() as i32,
        is_compressed: Some(self.props.codec != Compression::UNCOMPRESSED),
        statistics: None,
      }),
    };
    let header_bytes = encode_thrift(&header)?;
    self.total_uncompressed_size += (header_bytes.len() + uncompressed_page_size) as i64;
    self.total_compressed_size += (header_bytes.len() + compressed_page_size) as i64;

    let mut out = header_bytes;
    out.extend_from_slice(&payload);
    Ok(out)
  }

  /// Flushes residual buffered values and finalizes the column chunk:
  /// concatenates the dictionary page (if any) and data pages into one byte
  /// stream, and builds the metadata/page-index entries `file::writer`
  /// rebases against the chunk's eventual file offset.
  pub fn close(mut self) -> Result<ColumnCloseResult> {
    self.add_data_page()?;

    let mut bytes = Vec::new();
    let mut dictionary_page_offset = None;

    if let Some(dict) = self.dict_encoder.take() {
      if dict.num_entries() > 0 {
        let dict_bytes = dict.write_dict()?;
        let mut compressed = Vec::new();
        self.compressor.compress(dict_bytes.as_slice(), &mut compressed)?;
        let header = parquet::PageHeader {
          type_: parquet::PageType::DictionaryPage,
          uncompressed_page_size: dict_bytes.len() as i32,
          compressed_page_size: compressed.len() as i32,
          crc: Some(checksum(&compressed) as i32),
          data_page_header: None,
          index_page_header: None,
          dictionary_page_header: Some(parquet::DictionaryPageHeader {
            num_values: dict.num_entries() as i32,
            encoding: parquet::Encoding::PLAIN,
            is_sorted: Some(false),
          }),
          data_page_header_v2: None,
        };
        let header_bytes = encode_thrift(&header)?;
        self.total_uncompressed_size += (header_bytes.len() + dict_bytes.len()) as i64;
        self.total_compressed_size += (header_bytes.len() + compressed.len()) as i64;
        self.encodings_used.insert(Encoding::PLAIN);

        dictionary_page_offset = Some(0i64);
        bytes.extend_from_slice(&header_bytes);
        bytes.extend_from_slice(&compressed);
      }
    }

    let data_page_offset = bytes.len() as i64;
    let skip_page_index = self.props.skip_page_index;

    let mut null_pages = Vec::with_capacity(self.pages.len());
    let mut min_values = Vec::with_capacity(self.pages.len());
    let mut max_values = Vec::with_capacity(self.pages.len());
    let mut null_counts = Vec::with_capacity(self.pages.len());
    let mut page_locations = Vec::with_capacity(self.pages.len());

    for page in &self.pages {
      if !skip_page_index {
        let offset = bytes.len() as i64;
        null_pages.push(page.null_page);
        min_values.push(page.min.clone().unwrap_or_default());
        max_values.push(page.max.clone().unwrap_or_default());
        null_counts.push(page.null_count);
        page_locations.push(PageLocation {
          offset,
          compressed_page_size: page.bytes.len() as i32,
          first_row_index: page.first_row_index,
        });
      }
      bytes.extend_from_slice(&page.bytes);
    }

    let statistics = Statistics {
      min_value: self.chunk_min.clone(),
      max_value: self.chunk_max.clone(),
      null_count: Some(self.chunk_null_count),
      distinct_count: None,
      is_max_value_exact: Some(true),
      is_min_value_exact: Some(true),
    };

    let mut encodings: Vec<Encoding> = self.encodings_used.into_iter().collect();
    encodings.sort_by_key(|e| format!("{:?}", e));

    let metadata = ColumnChunkMetaDataBuilder::new(T::get_physical_type(), self.descr.path().to_vec())
      .set_encodings(encodings)
      .set_compression(self.props.codec)
      .set_num_values(self.total_num_values)
      .set_total_uncompressed_size(self.total_uncompressed_size)
      .set_total_compressed_size(self.total_compressed_size)
      .set_data_page_offset(data_page_offset)
      .set_dictionary_page_offset(dictionary_page_offset)
      .set_statistics(Some(statistics))
      .build();

    let column_index = if skip_page_index {
      None
    } else {
      Some(ColumnIndex {
        null_pages,
        min_values,
        max_values,
        boundary_order: Some(crate::file::metadata::BoundaryOrder::Unordered),
        null_counts: Some(null_counts),
      })
    };
    let offset_index = if skip_page_index { None } else { Some(OffsetIndex { page_locations }) };

    Ok(ColumnCloseResult { bytes, num_rows: self.rows_written, metadata, column_index, offset_index })
  }
}

fn create_codec_for(codec: Compression) -> Result<Box<dyn Codec>> {
  match codec {
    Compression::UNCOMPRESSED => create_codec(Compression::UNCOMPRESSED),
    other => create_codec(other),
  }
}

fn encode_thrift(header: &parquet::PageHeader) -> Result<Vec<u8>> {
  let mut buf = Vec::new();
  {
    let mut prot = TCompactOutputProtocol::new(&mut buf);
    header.write_to_out_protocol(&mut prot).map_err(|e| general_err!("Could not encode page header: {}", e))?;
  }
  Ok(buf)
}

/// Avoids an unused-import lint when a caller only needs the byte-slice
/// view; kept here since several encoders hand back `ByteBufferPtr` rather
/// than `Vec<u8>`.
#[allow(dead_code)]
fn as_bytes(b: &ByteBufferPtr) -> &[u8] {
  b.as_slice()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::Type as PhysicalType;
  use crate::column::reader::ColumnReader;
  use crate::column::page::SerializedPageReader;
  use crate::data_type::Int32Type;
  use crate::file::writer::ColumnProperties;
  use crate::schema::types::{GroupTypeBuilder, PrimitiveTypeBuilder, SchemaDescriptor};
  use std::io::Cursor;
  use std::sync::Arc;

  fn required_int32_descr() -> ColumnDescPtr {
    let leaf = PrimitiveTypeBuilder::new("value", PhysicalType::INT32).build().unwrap();
    let root = GroupTypeBuilder::new("schema").with_fields(vec![Arc::new(leaf)]).build();
    SchemaDescriptor::new(Arc::new(root)).column(0).clone()
  }

  fn optional_int32_descr() -> ColumnDescPtr {
    use crate::basic::Repetition;
    let leaf = PrimitiveTypeBuilder::new("value", PhysicalType::INT32)
      .with_repetition(Repetition::OPTIONAL)
      .build()
      .unwrap();
    let root = GroupTypeBuilder::new("schema").with_fields(vec![Arc::new(leaf)]).build();
    SchemaDescriptor::new(Arc::new(root)).column(0).clone()
  }

  #[test]
  fn test_write_read_roundtrip_plain_required() {
    let descr = required_int32_descr();
    let props = ColumnProperties { dictionary_enabled: false, ..Default::default() };
    let mut writer: ColumnWriterImpl<Int32Type> = ColumnWriterImpl::new(descr.clone(), props, 1024, 1).unwrap();
    let values = [1, 2, 3, 4, 5];
    writer.write_batch(&values, None, None).unwrap();
    let result = writer.close().unwrap();

    assert_eq!(result.num_rows, 5);
    assert_eq!(result.metadata.num_values(), 5);

    let chunk = SerializedPageReader::new(
      Cursor::new(result.bytes),
      result.metadata.num_values(),
      result.metadata.compression(),
      result.metadata.column_type(),
    )
    .unwrap();
    let mut reader: ColumnReader<Int32Type> = ColumnReader::new(descr, 0, Box::new(chunk));
    let mut out = vec![0i32; 5];
    let (n, _) = reader.read_batch(5, None, None, &mut out).unwrap();
    assert_eq!(n, 5);
    assert_eq!(out, values);
  }

  #[test]
  fn test_write_read_roundtrip_dictionary_optional() {
    let descr = optional_int32_descr();
    let props = ColumnProperties { dictionary_enabled: true, ..Default::default() };
    let mut writer: ColumnWriterImpl<Int32Type> = ColumnWriterImpl::new(descr.clone(), props, 1024, 1).unwrap();
    let values = [7, -3];
    let def_levels = [1i16, 0, 1];
    writer.write_batch(&values, Some(&def_levels), None).unwrap();
    let result = writer.close().unwrap();

    assert_eq!(result.num_rows, 3);
    assert_eq!(result.metadata.num_values(), 3);
    assert!(result.metadata.dictionary_page_offset().is_some());

    let chunk = SerializedPageReader::new(
      Cursor::new(result.bytes),
      result.metadata.num_values(),
      result.metadata.compression(),
      result.metadata.column_type(),
    )
    .unwrap();
    let mut reader: ColumnReader<Int32Type> = ColumnReader::new(descr, 0, Box::new(chunk));
    let mut def_out = vec![0i16; 3];
    let mut values_out = vec![0i32; 3];
    let (n, levels) = reader.read_batch(3, Some(&mut def_out), None, &mut values_out).unwrap();
    assert_eq!(levels, 3);
    assert_eq!(n, 2);
    assert_eq!(def_out, vec![1, 0, 1]);
    assert_eq!(&values_out[..1], &[7]);
    assert_eq!(values_out[1], 0);
    assert_eq!(&values_out[1..2], &[-3]);
  }
}
