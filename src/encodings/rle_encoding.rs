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

//! The hybrid run-length/bit-packed encoding used by `RLE`, `RLE_DICTIONARY`
//! and the repetition/definition level streams. A run is either:
//!
//!  - an RLE run: a ULEB128 header `(count << 1)` followed by one
//!    byte-aligned value, `ceil(bit_width / 8)` bytes wide; or
//!  - a bit-packed run: a ULEB128 header `(num_groups << 1) | 1` followed by
//!    `num_groups * 8` values, each `bit_width` bits wide (the last group is
//!    zero-padded).
//!
//! `RleEncoder` buffers every value pushed via `put` and only decides how to
//! split them into runs when `flush` is called, re-deriving the full encoded
//! body from scratch each time. This trades a little redundant work across
//! repeated `flush` calls (`LevelEncoder::put` flushes after every batch) for
//! an encoder that never has to un-commit bytes already written for an RLE
//! run that turned out shorter than 8 once more values arrived.

use std::cmp;

use crate::errors::{ParquetError, Result};
use crate::util::bit_util::{ceil, BitReader, BitWriter, FromLeBytes};
use crate::util::memory::ByteBufferPtr;

const MIN_RUN_LENGTH: usize = 8;

fn encode_runs(values: &[u64], bit_width: u8, writer: &mut BitWriter) -> bool {
  let byte_width = ceil(bit_width as i64, 8) as usize;
  let n = values.len();
  let mut i = 0;
  while i < n {
    let run_len = {
      let mut len = 1;
      while i + len < n && values[i + len] == values[i] {
        len += 1;
      }
      len
    };

    if run_len >= MIN_RUN_LENGTH {
      let header = (run_len as u64) << 1;
      if !writer.put_vlq_int(header) {
        return false;
      }
      if !writer.put_aligned(values[i], byte_width) {
        return false;
      }
      i += run_len;
    } else {
      // Greedily bit-pack a literal stretch until a run of at least
      // `MIN_RUN_LENGTH` identical values begins (or the input ends).
      let literal_start = i;
      let mut j = i;
      while j < n {
        let mut k = j;
        let mut rep = 1;
        while k + 1 < n && values[k + 1] == values[k] {
          k += 1;
          rep += 1;
          if rep >= MIN_RUN_LENGTH {
            break;
          }
        }
        if rep >= MIN_RUN_LENGTH {
          break;
        }
        j += 1;
      }
      let count = j - literal_start;
      let num_groups = ceil(count as i64, 8) as usize;
      let header = ((num_groups as u64) << 1) | 1;
      if !writer.put_vlq_int(header) {
        return false;
      }
      for g in 0..num_groups {
        for b in 0..8 {
          let idx = literal_start + g * 8 + b;
          let v = if idx < literal_start + count { values[idx] } else { 0 };
          if !writer.put_value(v, bit_width as usize) {
            return false;
          }
        }
      }
      i = literal_start + count;
    }
  }
  true
}

/// Encodes a stream of `u64`-widened values (the caller truncates to
/// `bit_width` bits) using the hybrid RLE/bit-packed scheme.
///
/// Values are buffered in memory and the hybrid run structure is only
/// decided at `flush` time; see the module docs for why.
pub struct RleEncoder {
  bit_width: u8,
  buffer: Vec<u8>,
  start: usize,
  values: Vec<u64>,
  encoded_len: usize,
}

impl RleEncoder {
  /// Writes into `buffer` starting at byte offset `start`; bytes before
  /// `start` are left untouched (used by callers that reserve a prefix for
  /// a length or bit-width byte).
  pub fn new_from_buf(bit_width: u8, buffer: Vec<u8>, start: usize) -> Self {
    RleEncoder { bit_width, buffer, start, values: Vec::new(), encoded_len: 0 }
  }

  /// Buffers `value`'s low `bit_width` bits. Always succeeds; overflow of
  /// the destination buffer is only detectable once the run structure is
  /// known, and is reported by `flush` instead.
  pub fn put(&mut self, value: u64) -> Result<bool> {
    self.values.push(value);
    Ok(true)
  }

  /// Re-derives the full encoded body from every value buffered so far and
  /// writes it into the destination buffer at `start`.
  pub fn flush(&mut self) -> Result<()> {
    let capacity = self.buffer.len().saturating_sub(self.start) + 2 * self.values.len() + 16;
    let mut writer = BitWriter::new(capacity);
    if !encode_runs(&self.values, self.bit_width, &mut writer) {
      return Err(ParquetError::General("Not enough bytes left for RLE encoding".to_string()));
    }
    let body = writer.consume();
    if self.start + body.len() > self.buffer.len() {
      return Err(ParquetError::General("Not enough bytes left for RLE encoding".to_string()));
    }
    self.buffer[self.start..self.start + body.len()].copy_from_slice(&body);
    self.encoded_len = body.len();
    Ok(())
  }

  /// Length, in bytes, of the body written by the most recent `flush`.
  pub fn len(&self) -> usize {
    self.encoded_len
  }

  pub fn is_empty(&self) -> bool {
    self.encoded_len == 0
  }

  /// Consumes the encoder, returning the destination buffer truncated just
  /// past the most recently flushed body.
  pub fn consume(mut self) -> Vec<u8> {
    self.buffer.truncate(self.start + self.encoded_len);
    self.buffer
  }

  /// Smallest buffer (in bytes) that can hold a single RLE run of any value
  /// at this bit width — the floor every `max_buffer_size` call respects.
  pub fn min_buffer_size(bit_width: u8) -> usize {
    let max_header_bytes = 5; // ULEB128 of a usize-sized run count
    let byte_width = ceil(bit_width as i64, 8) as usize;
    max_header_bytes + byte_width
  }

  /// Conservative upper bound on the encoded size of `num_values` values at
  /// `bit_width` bits, assuming the least favorable (all-literal) run split.
  pub fn max_buffer_size(bit_width: u8, num_values: usize) -> usize {
    let num_groups = ceil(num_values as i64, 8) as usize;
    let bytes_per_group = bit_width as usize;
    let literal_max_size = 5 + num_groups * bytes_per_group;
    cmp::max(literal_max_size, Self::min_buffer_size(bit_width))
  }
}

/// Decodes a hybrid RLE/bit-packed stream written by `RleEncoder`.
pub struct RleDecoder {
  bit_width: u8,
  bit_reader: Option<BitReader>,
  rle_left: usize,
  rle_value: u64,
  bp_left: usize,
}

impl RleDecoder {
  pub fn new(bit_width: u8) -> Self {
    RleDecoder { bit_width, bit_reader: None, rle_left: 0, rle_value: 0, bp_left: 0 }
  }

  pub fn set_data(&mut self, data: ByteBufferPtr) {
    self.bit_reader = Some(BitReader::new(data));
    self.rle_left = 0;
    self.bp_left = 0;
  }

  fn next_run(&mut self) -> Result<bool> {
    let reader = self.bit_reader.as_mut().expect("set_data not called");
    let header = match reader.get_vlq_int() {
      Some(h) => h as u64,
      None => return Ok(false),
    };
    if header & 1 == 0 {
      let count = (header >> 1) as usize;
      let byte_width = ceil(self.bit_width as i64, 8) as usize;
      let value: u64 =
        reader.get_aligned(byte_width).ok_or_else(|| ParquetError::Eof("Not enough bytes to decode RLE run value".to_string()))?;
      self.rle_left = count;
      self.rle_value = value;
    } else {
      let num_groups = (header >> 1) as usize;
      self.bp_left = num_groups * 8;
    }
    Ok(true)
  }

  /// Decodes up to `buffer.len()` values. Returns the number actually
  /// decoded, which is less than `buffer.len()` only once the stream is
  /// exhausted.
  pub fn get_batch<T: FromLeBytes>(&mut self, buffer: &mut [T]) -> Result<usize> {
    let mut n = 0;
    while n < buffer.len() {
      if self.rle_left == 0 && self.bp_left == 0 && !self.next_run()? {
        break;
      }
      if self.rle_left > 0 {
        let take = cmp::min(self.rle_left, buffer.len() - n);
        let bytes = self.rle_value.to_le_bytes();
        for slot in buffer[n..n + take].iter_mut() {
          *slot = T::from_le_slice(&bytes);
        }
        n += take;
        self.rle_left -= take;
      } else {
        let take = cmp::min(self.bp_left, buffer.len() - n);
        let reader = self.bit_reader.as_mut().expect("set_data not called");
        for slot in buffer[n..n + take].iter_mut() {
          let v: u64 = reader
            .get_value(self.bit_width as usize)
            .ok_or_else(|| ParquetError::Eof("Not enough bits to decode bit-packed run".to_string()))?;
          *slot = T::from_le_slice(&v.to_le_bytes());
        }
        n += take;
        self.bp_left -= take;
      }
    }
    Ok(n)
  }

  /// Decodes up to `max_values` dictionary indices and resolves each
  /// through `dict`, writing the resolved values into `buffer`.
  pub fn get_batch_with_dict<V: Clone + Default>(
    &mut self,
    dict: &[V],
    buffer: &mut [V],
    max_values: usize,
  ) -> Result<usize> {
    let want = cmp::min(buffer.len(), max_values);
    let mut n = 0;
    while n < want {
      if self.rle_left == 0 && self.bp_left == 0 && !self.next_run()? {
        break;
      }
      if self.rle_left > 0 {
        let take = cmp::min(self.rle_left, want - n);
        let idx = self.rle_value as usize;
        let value = dict
          .get(idx)
          .ok_or_else(|| ParquetError::IndexOutOfBounds(idx, dict.len()))?
          .clone();
        for slot in buffer[n..n + take].iter_mut() {
          *slot = value.clone();
        }
        n += take;
        self.rle_left -= take;
      } else {
        let take = cmp::min(self.bp_left, want - n);
        let reader = self.bit_reader.as_mut().expect("set_data not called");
        for slot in buffer[n..n + take].iter_mut() {
          let idx: u64 = reader
            .get_value(self.bit_width as usize)
            .ok_or_else(|| ParquetError::Eof("Not enough bits to decode bit-packed run".to_string()))?;
          let idx = idx as usize;
          *slot = dict.get(idx).ok_or_else(|| ParquetError::IndexOutOfBounds(idx, dict.len()))?.clone();
        }
        n += take;
        self.bp_left -= take;
      }
    }
    Ok(n)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn encode(bit_width: u8, values: &[u64]) -> Vec<u8> {
    let buf_size = RleEncoder::max_buffer_size(bit_width, values.len());
    let mut encoder = RleEncoder::new_from_buf(bit_width, vec![0u8; buf_size], 0);
    for v in values {
      encoder.put(*v).unwrap();
    }
    encoder.flush().unwrap();
    encoder.consume()
  }

  #[test]
  fn test_roundtrip_runs_only() {
    let values: Vec<u64> = vec![7; 20];
    let bytes = encode(4, &values);
    let mut decoder = RleDecoder::new(4);
    decoder.set_data(ByteBufferPtr::new(bytes));
    let mut out = vec![0u64; 20];
    let n = decoder.get_batch(&mut out).unwrap();
    assert_eq!(n, 20);
    assert_eq!(out, values);
  }

  #[test]
  fn test_roundtrip_literals_only() {
    let values: Vec<u64> = (0..37).map(|i| i % 5).collect();
    let bytes = encode(3, &values);
    let mut decoder = RleDecoder::new(3);
    decoder.set_data(ByteBufferPtr::new(bytes));
    let mut out = vec![0u64; values.len()];
    let n = decoder.get_batch(&mut out).unwrap();
    assert_eq!(n, values.len());
    assert_eq!(out, values);
  }

  #[test]
  fn test_roundtrip_mixed() {
    let mut values = vec![1u64; 10];
    values.extend((0..15).map(|i| i % 3));
    values.extend(vec![2u64; 9]);
    let bytes = encode(2, &values);
    let mut decoder = RleDecoder::new(2);
    decoder.set_data(ByteBufferPtr::new(bytes));
    let mut out = vec![0u64; values.len()];
    let n = decoder.get_batch(&mut out).unwrap();
    assert_eq!(n, values.len());
    assert_eq!(out, values);
  }

  #[test]
  fn test_get_batch_with_dict() {
    let dict = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let indices: Vec<u64> = vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 1, 2];
    let bytes = encode(2, &indices);
    let mut decoder = RleDecoder::new(2);
    decoder.set_data(ByteBufferPtr::new(bytes));
    let mut out = vec![String::new(); indices.len()];
    let n = decoder.get_batch_with_dict(&dict, &mut out, indices.len()).unwrap();
    assert_eq!(n, indices.len());
    assert_eq!(out[0], "a");
    assert_eq!(out[8], "b");
    assert_eq!(out[9], "c");
  }

  #[test]
  fn test_bit_width_zero() {
    let values = vec![0u64; 12];
    let bytes = encode(0, &values);
    let mut decoder = RleDecoder::new(0);
    decoder.set_data(ByteBufferPtr::new(bytes));
    let mut out = vec![0u64; 12];
    let n = decoder.get_batch(&mut out).unwrap();
    assert_eq!(n, 12);
  }
}
