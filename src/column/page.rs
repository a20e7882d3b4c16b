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

//! The `Page` value and its serialized reader: framing, CRC verification,
//! and decompression of one column chunk's page stream. Does not own a
//! back-reference to its column chunk — a non-owning handle (the chunk's
//! physical type and codec) is enough.

use std::io::Read;

use parquet_format as parquet;
use thrift::protocol::TCompactInputProtocol;

use crate::basic::{Compression, Encoding, PageType, Type as PhysicalType};
use crate::compression::{checksum, create_codec, Codec};
use crate::errors::{ParquetError, Result};
use crate::file::metadata::Statistics;
use crate::util::memory::ByteBufferPtr;

/// One page of a column chunk: either the chunk's single dictionary page,
/// or a v1/v2 data page. `buf` holds the (already decompressed) payload;
/// for a data page that payload still needs level/value splitting by
/// `column::reader`.
#[derive(Debug, Clone)]
pub enum Page {
  DictionaryPage { buf: ByteBufferPtr, num_values: u32, encoding: Encoding, is_sorted: bool },
  DataPage {
    buf: ByteBufferPtr,
    num_values: u32,
    encoding: Encoding,
    def_level_encoding: Encoding,
    rep_level_encoding: Encoding,
    statistics: Option<Statistics>,
  },
  DataPageV2 {
    buf: ByteBufferPtr,
    num_values: u32,
    encoding: Encoding,
    num_nulls: u32,
    num_rows: u32,
    def_levels_byte_len: u32,
    rep_levels_byte_len: u32,
    is_compressed: bool,
    statistics: Option<Statistics>,
  },
}

impl Page {
  pub fn page_type(&self) -> PageType {
    match self {
      Page::DictionaryPage { .. } => PageType::DICTIONARY_PAGE,
      Page::DataPage { .. } => PageType::DATA_PAGE,
      Page::DataPageV2 { .. } => PageType::DATA_PAGE_V2,
    }
  }

  pub fn buffer(&self) -> &ByteBufferPtr {
    match self {
      Page::DictionaryPage { buf, .. } => buf,
      Page::DataPage { buf, .. } => buf,
      Page::DataPageV2 { buf, .. } => buf,
    }
  }

  pub fn num_values(&self) -> u32 {
    match self {
      Page::DictionaryPage { num_values, .. } => *num_values,
      Page::DataPage { num_values, .. } => *num_values,
      Page::DataPageV2 { num_values, .. } => *num_values,
    }
  }

  pub fn encoding(&self) -> Encoding {
    match self {
      Page::DictionaryPage { encoding, .. } => *encoding,
      Page::DataPage { encoding, .. } => *encoding,
      Page::DataPageV2 { encoding, .. } => *encoding,
    }
  }

  pub fn statistics(&self) -> Option<&Statistics> {
    match self {
      Page::DictionaryPage { .. } => None,
      Page::DataPage { statistics, .. } => statistics.as_ref(),
      Page::DataPageV2 { statistics, .. } => statistics.as_ref(),
    }
  }
}

/// Yields the pages of one column chunk in order, cycling through a
/// `{Start -> HeaderRead -> PayloadRead -> Yielded}` state machine.
pub trait PageReader: Iterator<Item = Result<Page>> {
  fn get_next_page(&mut self) -> Result<Option<Page>>;
}

/// Reads pages out of any buffered `Read` positioned at the start of a
/// column chunk's byte range.
pub struct SerializedPageReader<T: Read> {
  buf: T,
  decompressor: Option<Box<dyn Codec>>,
  seen_num_values: i64,
  total_num_values: i64,
  physical_type: PhysicalType,
  any_page_seen: bool,
}

impl<T: Read> SerializedPageReader<T> {
  pub fn new(buf: T, total_num_values: i64, compression: Compression, physical_type: PhysicalType) -> Result<Self> {
    let decompressor = match compression {
      Compression::UNCOMPRESSED => None,
      other => Some(create_codec(other)?),
    };
    Ok(SerializedPageReader {
      buf,
      decompressor,
      total_num_values,
      seen_num_values: 0,
      physical_type,
      any_page_seen: false,
    })
  }

  pub fn physical_type(&self) -> PhysicalType {
    self.physical_type
  }

  fn read_page_header(&mut self) -> Result<parquet::PageHeader> {
    let mut prot = TCompactInputProtocol::new(&mut self.buf);
    parquet::PageHeader::read_from_in_protocol(&mut prot).map_err(ParquetError::from)
  }
}

impl<T: Read> Iterator for SerializedPageReader<T> {
  type Item = Result<Page>;

  fn next(&mut self) -> Option<Self::Item> {
    self.get_next_page().transpose()
  }
}

impl<T: Read> PageReader for SerializedPageReader<T> {
  fn get_next_page(&mut self) -> Result<Option<Page>> {
    while self.seen_num_values < self.total_num_values {
      let header = self.read_page_header()?;

      // v2 stores levels uncompressed ahead of the (possibly compressed)
      // value section; v1 has no such split.
      let mut level_bytes_len: usize = 0;
      let mut can_decompress = true;
      if let Some(ref v2) = header.data_page_header_v2 {
        level_bytes_len = (v2.definition_levels_byte_length + v2.repetition_levels_byte_length) as usize;
        can_decompress = v2.is_compressed.unwrap_or(true);
      }

      let compressed_len = header.compressed_page_size as usize;
      let mut buffer = vec![0u8; compressed_len];
      self.buf.read_exact(&mut buffer).map_err(|e| eof_err!("Could not read page payload: {}", e))?;

      if let Some(crc) = header.crc {
        if crc != 0 && checksum(&buffer) != crc as u32 {
          return Err(crate::errors::ParquetError::Corrupted(format!(
            "Page CRC32 mismatch: header declared {}, computed {}",
            crc as u32,
            checksum(&buffer)
          )));
        }
      }

      if let Some(decompressor) = self.decompressor.as_mut() {
        if can_decompress {
          let uncompressed_len = header.uncompressed_page_size as usize - level_bytes_len;
          let mut decoded = Vec::with_capacity(uncompressed_len);
          decompressor.decompress(&buffer[level_bytes_len..], &mut decoded, uncompressed_len)?;
          if level_bytes_len > 0 {
            buffer.truncate(level_bytes_len);
            buffer.extend_from_slice(&decoded);
          } else {
            buffer = decoded;
          }
        }
      }

      let page = match header.type_ {
        parquet::PageType::DictionaryPage => {
          if self.any_page_seen {
            return Err(general_err!("Unexpected page type: dictionary page is not the first page of the chunk"));
          }
          self.any_page_seen = true;
          let dict_header = header
            .dictionary_page_header
            .ok_or_else(|| general_err!("Dictionary page header missing dictionary_page_header"))?;
          Page::DictionaryPage {
            buf: ByteBufferPtr::new(buffer),
            num_values: dict_header.num_values as u32,
            encoding: Encoding::from(dict_header.encoding),
            is_sorted: dict_header.is_sorted.unwrap_or(false),
          }
        }
        parquet::PageType::DataPage => {
          self.any_page_seen = true;
          let h = header.data_page_header.ok_or_else(|| general_err!("Data page header missing data_page_header"))?;
          self.seen_num_values += h.num_values as i64;
          Page::DataPage {
            buf: ByteBufferPtr::new(buffer),
            num_values: h.num_values as u32,
            encoding: Encoding::from(h.encoding),
            def_level_encoding: Encoding::from(h.definition_level_encoding),
            rep_level_encoding: Encoding::from(h.repetition_level_encoding),
            statistics: Statistics::from_thrift_opt(h.statistics.as_ref()),
          }
        }
        parquet::PageType::DataPageV2 => {
          self.any_page_seen = true;
          let h = header
            .data_page_header_v2
            .ok_or_else(|| general_err!("Data page header missing data_page_header_v2"))?;
          self.seen_num_values += h.num_values as i64;
          Page::DataPageV2 {
            buf: ByteBufferPtr::new(buffer),
            num_values: h.num_values as u32,
            encoding: Encoding::from(h.encoding),
            num_nulls: h.num_nulls as u32,
            num_rows: h.num_rows as u32,
            def_levels_byte_len: h.definition_levels_byte_length as u32,
            rep_levels_byte_len: h.repetition_levels_byte_length as u32,
            is_compressed: h.is_compressed.unwrap_or(true),
            statistics: Statistics::from_thrift_opt(h.statistics.as_ref()),
          }
        }
        // INDEX_PAGE is never data and is skipped.
        _ => continue,
      };
      return Ok(Some(page));
    }
    Ok(None)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::Type as PhysicalType;
  use std::io::Cursor;

  fn encode_plain_data_page(values: &[i32]) -> Vec<u8> {
    use thrift::protocol::TCompactOutputProtocol;
    let mut payload = Vec::new();
    for v in values {
      payload.extend_from_slice(&v.to_le_bytes());
    }
    let header = parquet::PageHeader {
      type_: parquet::PageType::DataPage,
      uncompressed_page_size: payload.len() as i32,
      compressed_page_size: payload.len() as i32,
      crc: None,
      data_page_header: Some(parquet::DataPageHeader {
        num_values: values.len() as i32,
        encoding: parquet::Encoding::PLAIN,
        definition_level_encoding: parquet::Encoding::RLE,
        repetition_level_encoding: parquet::Encoding::RLE,
        statistics: None,
      }),
      index_page_header: None,
      dictionary_page_header: None,
      data_page_header_v2: None,
    };
    let mut out = Vec::new();
    {
      let mut prot = TCompactOutputProtocol::new(&mut out);
      header.write_to_out_protocol(&mut prot).unwrap();
    }
    out.extend_from_slice(&payload);
    out
  }

  #[test]
  fn test_reads_single_data_page() {
    let bytes = encode_plain_data_page(&[1, 2, 3]);
    let mut reader =
      SerializedPageReader::new(Cursor::new(bytes), 3, Compression::UNCOMPRESSED, PhysicalType::INT32).unwrap();
    let page = reader.get_next_page().unwrap().unwrap();
    assert_eq!(page.num_values(), 3);
    assert_eq!(page.buffer().as_slice().len(), 12);
    assert!(reader.get_next_page().unwrap().is_none());
  }

  #[test]
  fn test_crc_mismatch_is_corrupted() {
    use thrift::protocol::TCompactOutputProtocol;
    let payload = vec![1u8, 2, 3, 4];
    let header = parquet::PageHeader {
      type_: parquet::PageType::DataPage,
      uncompressed_page_size: payload.len() as i32,
      compressed_page_size: payload.len() as i32,
      crc: Some(0x1234_5678),
      data_page_header: Some(parquet::DataPageHeader {
        num_values: 1,
        encoding: parquet::Encoding::PLAIN,
        definition_level_encoding: parquet::Encoding::RLE,
        repetition_level_encoding: parquet::Encoding::RLE,
        statistics: None,
      }),
      index_page_header: None,
      dictionary_page_header: None,
      data_page_header_v2: None,
    };
    let mut out = Vec::new();
    {
      let mut prot = TCompactOutputProtocol::new(&mut out);
      header.write_to_out_protocol(&mut prot).unwrap();
    }
    out.extend_from_slice(&payload);
    let mut reader =
      SerializedPageReader::new(Cursor::new(out), 1, Compression::UNCOMPRESSED, PhysicalType::INT32).unwrap();
    let err = reader.get_next_page().unwrap_err();
    assert!(matches!(err, ParquetError::Corrupted(_)));
  }
}
