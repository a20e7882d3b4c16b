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

//! Footer parsing: validates the leading/trailing `PAR1`
//! magic, decodes the Thrift `FileMetaData`, materializes the schema tree,
//! and (unless the caller opted out) decodes the page-index sidecar.

use std::sync::Arc;

use parquet_format as parquet;
use thrift::protocol::TCompactInputProtocol;

use crate::errors::Result;
use crate::file::metadata::{build_file_metadata, ColumnIndex, OffsetIndex, ParquetMetaData, RowGroupMetaData};
use crate::file::page_index;
use crate::file::reader::ChunkReader;
use crate::schema::types;

const FOOTER_SIZE: u64 = 8;
const PARQUET_MAGIC: [u8; 4] = [b'P', b'A', b'R', b'1'];

/// Options a caller passes to `parse_metadata`/`SerializedFileReader::new`.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
  /// Skip decoding the page-index sidecar, even if present, mirroring the
  /// writer's own `skip_page_index` option so a reader can opt out of the
  /// extra parsing cost when it doesn't need page-level statistics.
  pub skip_page_index: bool,
}

/// Parses the footer against any positioned, known-size byte source.
pub fn parse_metadata<R: ChunkReader>(chunk_reader: &R) -> Result<ParquetMetaData> {
  parse_metadata_with_options(chunk_reader, &ReadOptions::default())
}

pub fn parse_metadata_with_options<R: ChunkReader>(
  chunk_reader: &R,
  options: &ReadOptions,
) -> Result<ParquetMetaData> {
  let file_size = chunk_reader.len();
  if file_size < 2 * FOOTER_SIZE {
    return Err(general_err!(
      "Invalid Parquet file, size {} is less than minimum file footer ({})",
      file_size,
      2 * FOOTER_SIZE
    ));
  }

  let header = chunk_reader.get_bytes(0, 4)?;
  if header.as_slice() != PARQUET_MAGIC {
    return Err(general_err!("Invalid header: expected magic PAR1, got {:?}", header.as_slice()));
  }

  let trailer = chunk_reader.get_bytes(file_size - FOOTER_SIZE, FOOTER_SIZE as usize)?;
  let trailer = trailer.as_slice();
  if trailer[4..8] != PARQUET_MAGIC {
    return Err(general_err!("Invalid footer: expected trailing magic PAR1, got {:?}", &trailer[4..8]));
  }
  let footer_len = u32::from_le_bytes(trailer[0..4].try_into().unwrap()) as u64;
  if footer_len == 0 || footer_len > file_size - 2 * FOOTER_SIZE {
    return Err(general_err!(
      "Invalid footer: footer length {} does not fit within file of size {}",
      footer_len,
      file_size
    ));
  }

  let footer_start = file_size - FOOTER_SIZE - footer_len;
  let footer_bytes = chunk_reader.get_bytes(footer_start, footer_len as usize)?;
  let mut cursor: &[u8] = footer_bytes.as_slice();
  let mut prot = TCompactInputProtocol::new(&mut cursor);
  let t_meta = parquet::FileMetaData::read_from_in_protocol(&mut prot)
    .map_err(|e| general_err!("Could not decode footer: {}", e))?;

  if t_meta.schema.is_empty() {
    return Err(general_err!("Missing root column: schema element list is empty"));
  }

  let root = types::from_thrift(&t_meta.schema)?;
  let (file_metadata, schema_descr) = build_file_metadata(root, &t_meta)?;

  let row_groups = t_meta
    .row_groups
    .iter()
    .map(|rg| RowGroupMetaData::from_thrift(schema_descr.clone(), rg))
    .collect::<Result<Vec<_>>>()?;

  let (column_index, offset_index) = if options.skip_page_index {
    (None, None)
  } else {
    match try_read_page_index(chunk_reader, &row_groups) {
      Some((ci, oi)) => (Some(ci), Some(oi)),
      None => (None, None),
    }
  };

  Ok(ParquetMetaData::new(file_metadata, row_groups, column_index, offset_index))
}

/// Decodes the page-index sidecar in row-major order.
/// The sidecar is treated as all-or-nothing: if any column chunk is missing
/// its offsets, or the Thrift bytes don't decode, the whole sidecar is
/// dropped and a warning logged rather than surfacing a partially-populated
/// index that callers might mistake for complete coverage.
fn try_read_page_index<R: ChunkReader>(
  chunk_reader: &R,
  row_groups: &[RowGroupMetaData],
) -> Option<(Vec<Vec<ColumnIndex>>, Vec<Vec<OffsetIndex>>)> {
  let mut column_indexes = Vec::with_capacity(row_groups.len());
  let mut offset_indexes = Vec::with_capacity(row_groups.len());
  for rg in row_groups {
    let mut ci_row = Vec::with_capacity(rg.num_columns());
    let mut oi_row = Vec::with_capacity(rg.num_columns());
    for col in rg.columns() {
      let ci_off = col.column_index_offset();
      let ci_len = col.column_index_length();
      let oi_off = col.offset_index_offset();
      let oi_len = col.offset_index_length();
      let (ci_off, ci_len, oi_off, oi_len) = match (ci_off, ci_len, oi_off, oi_len) {
        (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
        _ => {
          log::warn!("column chunk is missing page-index offsets; skipping page index for file");
          return None;
        }
      };
      let ci_bytes = chunk_reader.get_bytes(ci_off as u64, ci_len as usize).ok()?;
      let oi_bytes = chunk_reader.get_bytes(oi_off as u64, oi_len as usize).ok()?;
      let ci = match page_index::decode_column_index(ci_bytes.as_slice()) {
        Ok(ci) => ci,
        Err(e) => {
          log::warn!("could not decode column index, skipping page index for file: {}", e);
          return None;
        }
      };
      let oi = match page_index::decode_offset_index(oi_bytes.as_slice()) {
        Ok(oi) => oi,
        Err(e) => {
          log::warn!("could not decode offset index, skipping page index for file: {}", e);
          return None;
        }
      };
      ci_row.push(ci);
      oi_row.push(oi);
    }
    column_indexes.push(ci_row);
    offset_indexes.push(oi_row);
  }
  Some((column_indexes, offset_indexes))
}

/// Serializes `metadata` back to raw Thrift bytes, used by `file::writer` to
/// emit the final footer and trailing magic.
pub fn write_metadata_bytes(t_meta: &parquet::FileMetaData) -> Result<Vec<u8>> {
  use thrift::protocol::TCompactOutputProtocol;

  let mut buf = Vec::new();
  {
    let mut prot = TCompactOutputProtocol::new(&mut buf);
    t_meta.write_to_out_protocol(&mut prot).map_err(|e| general_err!("Could not encode footer: {}", e))?;
  }
  Ok(buf)
}

pub const MAGIC: [u8; 4] = PARQUET_MAGIC;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_magic_is_par1() {
    assert_eq!(&MAGIC, b"PAR1");
  }

  #[test]
  fn test_rejects_truncated_file() {
    let data = vec![0u8; 4];
    let err = parse_metadata(&data).unwrap_err();
    assert!(format!("{}", err).contains("less than minimum"));
  }

  #[test]
  fn test_rejects_missing_header_magic() {
    let mut data = vec![0u8; 16];
    data[12..16].copy_from_slice(b"PAR1");
    let err = parse_metadata(&data).unwrap_err();
    assert!(format!("{}", err).contains("Invalid header"));
  }
}
