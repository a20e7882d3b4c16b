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

//! Decoding of the page-index sidecar and the `Search` primitive over it
//! that lets a caller binary-search a sorted column chunk down to a page
//! index without reading any payload.

use std::cmp::Ordering;
use std::io::Read;

use parquet_format as parquet;
use thrift::protocol::{TCompactInputProtocol, TCompactOutputProtocol};

use crate::basic::Type as PhysicalType;
use crate::errors::Result;
use crate::file::metadata::{BoundaryOrder, ColumnIndex, OffsetIndex};
use crate::util::ordering;

/// Decodes one column chunk's `ColumnIndex` from its Thrift-encoded bytes.
pub fn decode_column_index(buf: &[u8]) -> Result<ColumnIndex> {
  let mut cursor: &[u8] = buf;
  let mut prot = TCompactInputProtocol::new(&mut cursor);
  let t = parquet::ColumnIndex::read_from_in_protocol(&mut prot)
    .map_err(|e| general_err!("Could not decode page index: {}", e))?;
  Ok(ColumnIndex::from(&t))
}

/// Decodes one column chunk's `OffsetIndex` from its Thrift-encoded bytes.
pub fn decode_offset_index(buf: &[u8]) -> Result<OffsetIndex> {
  let mut cursor: &[u8] = buf;
  let mut prot = TCompactInputProtocol::new(&mut cursor);
  let t = parquet::OffsetIndex::read_from_in_protocol(&mut prot)
    .map_err(|e| general_err!("Could not decode page index: {}", e))?;
  Ok(OffsetIndex::from(&t))
}

/// Encodes one column chunk's `ColumnIndex` to Thrift compact-protocol
/// bytes, the write-side counterpart of `decode_column_index` used by
/// `file::writer` to emit the page-index sidecar.
pub fn encode_column_index(index: &ColumnIndex) -> Result<Vec<u8>> {
  let t = parquet::ColumnIndex::from(index);
  let mut buf = Vec::new();
  let mut prot = TCompactOutputProtocol::new(&mut buf);
  t.write_to_out_protocol(&mut prot).map_err(|e| general_err!("Could not encode column index: {}", e))?;
  Ok(buf)
}

/// Encodes one column chunk's `OffsetIndex` to Thrift compact-protocol bytes.
pub fn encode_offset_index(index: &OffsetIndex) -> Result<Vec<u8>> {
  let t = parquet::OffsetIndex::from(index);
  let mut buf = Vec::new();
  let mut prot = TCompactOutputProtocol::new(&mut buf);
  t.write_to_out_protocol(&mut prot).map_err(|e| general_err!("Could not encode offset index: {}", e))?;
  Ok(buf)
}

/// Reads and decodes `length` bytes of Thrift-encoded `ColumnIndex` starting
/// at `offset` out of any `Read` positioned there.
pub fn read_column_index<R: Read>(reader: &mut R, length: usize) -> Result<ColumnIndex> {
  let mut buf = vec![0u8; length];
  reader.read_exact(&mut buf).map_err(|e| general_err!("Could not read page index: {}", e))?;
  decode_column_index(&buf)
}

pub fn read_offset_index<R: Read>(reader: &mut R, length: usize) -> Result<OffsetIndex> {
  let mut buf = vec![0u8; length];
  reader.read_exact(&mut buf).map_err(|e| general_err!("Could not read page index: {}", e))?;
  decode_offset_index(&buf)
}

/// Returns the index, among this chunk's pages, of the page whose `[min, max]`
/// range (under `physical_type`'s ordering) could contain `value`.
/// Pages flagged `null_pages` are skipped. Falls
/// back to a linear scan when the sidecar did not declare a boundary order
/// (`Unordered`, or absent) since binary search is only sound under a known
/// monotonic order.
pub fn search(index: &ColumnIndex, value: &[u8], physical_type: PhysicalType) -> Option<usize> {
  let n = index.min_values.len();
  if n == 0 {
    return None;
  }
  match index.boundary_order {
    Some(BoundaryOrder::Ascending) => {
      let mut lo = 0usize;
      let mut hi = n;
      while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let past = !index.null_pages[mid]
          && ordering::compare(physical_type, &index.max_values[mid], value) == Ordering::Less;
        if past {
          lo = mid + 1;
        } else {
          hi = mid;
        }
      }
      (lo < n).then_some(lo)
    }
    Some(BoundaryOrder::Descending) => {
      let mut lo = 0usize;
      let mut hi = n;
      while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let past = !index.null_pages[mid]
          && ordering::compare(physical_type, &index.min_values[mid], value) == Ordering::Greater;
        if past {
          lo = mid + 1;
        } else {
          hi = mid;
        }
      }
      (lo < n).then_some(lo)
    }
    _ => (0..n).find(|&i| {
      !index.null_pages[i]
        && ordering::compare(physical_type, &index.min_values[i], value) != Ordering::Greater
        && ordering::compare(physical_type, &index.max_values[i], value) != Ordering::Less
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn i32_index(bounds: &[(i32, i32)]) -> ColumnIndex {
    ColumnIndex {
      null_pages: bounds.iter().map(|_| false).collect(),
      min_values: bounds.iter().map(|(lo, _)| lo.to_le_bytes().to_vec()).collect(),
      max_values: bounds.iter().map(|(_, hi)| hi.to_le_bytes().to_vec()).collect(),
      boundary_order: Some(BoundaryOrder::Ascending),
      null_counts: None,
    }
  }

  #[test]
  fn test_search_ascending() {
    let index = i32_index(&[(0, 9), (10, 19), (20, 29)]);
    let v = 15i32.to_le_bytes();
    assert_eq!(search(&index, &v, PhysicalType::INT32), Some(1));
  }

  #[test]
  fn test_search_miss_past_end() {
    let index = i32_index(&[(0, 9), (10, 19)]);
    let v = 100i32.to_le_bytes();
    assert_eq!(search(&index, &v, PhysicalType::INT32), None);
  }

  #[test]
  fn test_search_skips_null_page() {
    let mut index = i32_index(&[(0, 9), (10, 19), (20, 29)]);
    index.null_pages[1] = true;
    let v = 15i32.to_le_bytes();
    // The null page's max is still consulted for the binary-search bound,
    // landing search on the next non-null page.
    assert_eq!(search(&index, &v, PhysicalType::INT32), Some(2));
  }
}
