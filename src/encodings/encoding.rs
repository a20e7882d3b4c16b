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

//! Value encoders, the write-side counterpart of `decoding.rs`. Every
//! encoder buffers the values handed to it across `put` calls and produces
//! its wire representation only once, in `flush_buffer`, which keeps
//! `BoolType`'s bit-packing contiguous across a whole page and keeps
//! `DeltaBitPackEncoder`'s block framing simple to compute in one pass.

use std::cmp;
use std::marker::PhantomData;

use crate::basic::Encoding;
use crate::data_type::*;
use crate::errors::Result;
use crate::schema::types::ColumnDescPtr;
use crate::util::bit_util::{num_required_bits, BitWriter};
use crate::util::hash_util::hash;
use crate::util::memory::ByteBufferPtr;

use super::rle_encoding::RleEncoder;

const HASH_SEED: u32 = 0;

/// Encodes a column's values into one encoding's wire format.
pub trait Encoder<T: DataType> {
  fn put(&mut self, values: &[T::T]) -> Result<()>;

  fn encoding(&self) -> Encoding;

  /// Number of values buffered but not yet flushed.
  fn estimated_data_encoded_size(&self) -> usize;

  /// Finalizes the current page and returns its encoded bytes, resetting the
  /// encoder so it can be reused for the next page.
  fn flush_buffer(&mut self) -> Result<ByteBufferPtr>;
}

/// `PLAIN`: values are simply concatenated in their natural byte layout.
pub struct PlainEncoder<T: DataType> {
  values: Vec<T::T>,
  _phantom: PhantomData<T>,
}

impl<T: DataType> PlainEncoder<T> {
  pub fn new() -> Self {
    PlainEncoder { values: Vec::new(), _phantom: PhantomData }
  }
}

impl<T: DataType> Default for PlainEncoder<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: DataType> Encoder<T> for PlainEncoder<T> {
  fn put(&mut self, values: &[T::T]) -> Result<()> {
    self.values.extend_from_slice(values);
    Ok(())
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }

  fn estimated_data_encoded_size(&self) -> usize {
    self.values.len() * T::get_type_size().unwrap_or(0)
  }

  fn flush_buffer(&mut self) -> Result<ByteBufferPtr> {
    let mut out = Vec::new();
    T::encode_plain(&self.values, &mut out);
    self.values.clear();
    Ok(ByteBufferPtr::new(out))
  }
}

/// `RLE_DICTIONARY`: values are deduplicated into a shared dictionary and
/// the data page holds only hybrid-RLE-encoded indices into it.
pub struct DictEncoder<T: DataType> {
  descr: ColumnDescPtr,
  entries: Vec<T::T>,
  index: Vec<Vec<i32>>,
  indices: Vec<i32>,
}

const DICT_HASH_BUCKETS: usize = 1 << 10;

impl<T: DataType> DictEncoder<T> {
  pub fn new(descr: ColumnDescPtr) -> Self {
    DictEncoder { descr, entries: Vec::new(), index: vec![Vec::new(); DICT_HASH_BUCKETS], indices: Vec::new() }
  }

  fn insert(&mut self, value: &T::T) -> i32 {
    let bucket = (hash(value, HASH_SEED) as usize) % DICT_HASH_BUCKETS;
    for &idx in &self.index[bucket] {
      if &self.entries[idx as usize] == value {
        return idx;
      }
    }
    let idx = self.entries.len() as i32;
    self.entries.push(value.clone());
    self.index[bucket].push(idx);
    idx
  }

  /// Number of distinct values seen so far.
  pub fn num_entries(&self) -> usize {
    self.entries.len()
  }

  /// Encodes the dictionary itself as a `PLAIN` page.
  pub fn write_dict(&self) -> Result<ByteBufferPtr> {
    let mut out = Vec::new();
    T::encode_plain(&self.entries, &mut out);
    Ok(ByteBufferPtr::new(out))
  }
}

impl<T: DataType> Encoder<T> for DictEncoder<T> {
  fn put(&mut self, values: &[T::T]) -> Result<()> {
    for v in values {
      let idx = self.insert(v);
      self.indices.push(idx);
    }
    Ok(())
  }

  fn encoding(&self) -> Encoding {
    Encoding::RLE_DICTIONARY
  }

  fn estimated_data_encoded_size(&self) -> usize {
    let bit_width = num_required_bits(self.entries.len().saturating_sub(1) as u64) as u8;
    RleEncoder::max_buffer_size(bit_width.max(1), self.indices.len()) + 1
  }

  fn flush_buffer(&mut self) -> Result<ByteBufferPtr> {
    let bit_width = num_required_bits(self.entries.len().saturating_sub(1) as u64).max(1) as u8;
    let buf_size = RleEncoder::max_buffer_size(bit_width, self.indices.len()) + 1;
    let mut buf = vec![0u8; buf_size];
    buf[0] = bit_width;
    let mut encoder = RleEncoder::new_from_buf(bit_width, buf, 1);
    for &idx in &self.indices {
      encoder.put(idx as u64)?;
    }
    encoder.flush()?;
    self.indices.clear();
    let _ = &self.descr;
    Ok(ByteBufferPtr::new(encoder.consume()))
  }
}

/// `DELTA_BINARY_PACKED`: only meaningful for `Int32Type`/`Int64Type`.
/// Buffers pushed values (widened to `i64` via `DataType::delta_as_i64`) and
/// computes the block/mini-block framing in a single pass over the whole
/// buffered run at `flush_buffer` time.
pub struct DeltaBitPackEncoder<T: DataType> {
  values: Vec<i64>,
  block_size: usize,
  num_mini_blocks: usize,
  values_per_mini_block: usize,
  _phantom: PhantomData<T>,
}

impl<T: DataType> DeltaBitPackEncoder<T> {
  pub fn new() -> Self {
    let block_size = 128;
    let num_mini_blocks = 4;
    DeltaBitPackEncoder {
      values: Vec::new(),
      block_size,
      num_mini_blocks,
      values_per_mini_block: block_size / num_mini_blocks,
      _phantom: PhantomData,
    }
  }
}

impl<T: DataType> Default for DeltaBitPackEncoder<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: DataType> Encoder<T> for DeltaBitPackEncoder<T> {
  fn put(&mut self, values: &[T::T]) -> Result<()> {
    for v in values {
      self.values.push(T::delta_as_i64(v));
    }
    Ok(())
  }

  fn encoding(&self) -> Encoding {
    Encoding::DELTA_BINARY_PACKED
  }

  fn estimated_data_encoded_size(&self) -> usize {
    self.values.len() * 10 + 32
  }

  fn flush_buffer(&mut self) -> Result<ByteBufferPtr> {
    let total_values = self.values.len();
    let mut writer = BitWriter::new(total_values * 10 + 64);
    writer.put_vlq_int(self.block_size as u64);
    writer.put_vlq_int(self.num_mini_blocks as u64);
    writer.put_vlq_int(total_values as u64);
    let first_value = if total_values > 0 { self.values[0] } else { 0 };
    writer.put_zigzag_vlq_int(first_value);

    let mut idx = 1;
    let mut prev = first_value;
    while idx < total_values {
      let block_count = cmp::min(self.block_size, total_values - idx);
      let mut deltas = Vec::with_capacity(block_count);
      let mut p = prev;
      for k in 0..block_count {
        let v = self.values[idx + k];
        deltas.push(v - p);
        p = v;
      }
      prev = p;
      idx += block_count;

      let min_delta = deltas.iter().copied().min().unwrap_or(0);
      let mut widths = vec![0u8; self.num_mini_blocks];
      for (mb, width) in widths.iter_mut().enumerate() {
        let start = mb * self.values_per_mini_block;
        if start >= deltas.len() {
          *width = 0;
          continue;
        }
        let end = cmp::min(start + self.values_per_mini_block, deltas.len());
        let max_adj = deltas[start..end].iter().map(|d| (d - min_delta) as u64).max().unwrap_or(0);
        *width = num_required_bits(max_adj) as u8;
      }

      writer.put_zigzag_vlq_int(min_delta);
      for &w in &widths {
        writer.put_aligned(w, 1);
      }
      for (mb, &w) in widths.iter().enumerate() {
        let start = mb * self.values_per_mini_block;
        for k in 0..self.values_per_mini_block {
          let adj = if start + k < deltas.len() { (deltas[start + k] - min_delta) as u64 } else { 0 };
          writer.put_value(adj, w as usize);
        }
      }
    }

    self.values.clear();
    Ok(ByteBufferPtr::new(writer.consume()))
  }
}

/// `DELTA_LENGTH_BYTE_ARRAY`: a `DELTA_BINARY_PACKED` stream of lengths
/// followed by the concatenated raw bytes of each value.
pub struct DeltaLengthByteArrayEncoder<T: DataType> {
  values: Vec<T::T>,
  _phantom: PhantomData<T>,
}

impl<T: DataType> DeltaLengthByteArrayEncoder<T> {
  pub fn new() -> Self {
    DeltaLengthByteArrayEncoder { values: Vec::new(), _phantom: PhantomData }
  }
}

impl<T: DataType> Default for DeltaLengthByteArrayEncoder<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: DataType> Encoder<T> for DeltaLengthByteArrayEncoder<T> {
  fn put(&mut self, values: &[T::T]) -> Result<()> {
    self.values.extend_from_slice(values);
    Ok(())
  }

  fn encoding(&self) -> Encoding {
    Encoding::DELTA_LENGTH_BYTE_ARRAY
  }

  fn estimated_data_encoded_size(&self) -> usize {
    self.values.iter().map(|v| T::byte_array_value(v).len()).sum::<usize>() + self.values.len() * 4
  }

  fn flush_buffer(&mut self) -> Result<ByteBufferPtr> {
    let lengths: Vec<i32> = self.values.iter().map(|v| T::byte_array_value(v).len() as i32).collect();
    let mut length_encoder = DeltaBitPackEncoder::<Int32Type>::new();
    length_encoder.put(&lengths)?;
    let mut out = length_encoder.flush_buffer()?.as_slice().to_vec();
    for v in &self.values {
      out.extend_from_slice(T::byte_array_value(v));
    }
    self.values.clear();
    Ok(ByteBufferPtr::new(out))
  }
}

/// `DELTA_BYTE_ARRAY`: each value is expressed relative to the previous one
/// as a shared prefix length plus a literal suffix.
pub struct DeltaByteArrayEncoder<T: DataType> {
  values: Vec<T::T>,
  _phantom: PhantomData<T>,
}

impl<T: DataType> DeltaByteArrayEncoder<T> {
  pub fn new() -> Self {
    DeltaByteArrayEncoder { values: Vec::new(), _phantom: PhantomData }
  }
}

impl<T: DataType> Default for DeltaByteArrayEncoder<T> {
  fn default() -> Self {
    Self::new()
  }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
  a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

impl<T: DataType> Encoder<T> for DeltaByteArrayEncoder<T> {
  fn put(&mut self, values: &[T::T]) -> Result<()> {
    self.values.extend_from_slice(values);
    Ok(())
  }

  fn encoding(&self) -> Encoding {
    Encoding::DELTA_BYTE_ARRAY
  }

  fn estimated_data_encoded_size(&self) -> usize {
    self.values.iter().map(|v| T::byte_array_value(v).len()).sum::<usize>() + self.values.len() * 8
  }

  fn flush_buffer(&mut self) -> Result<ByteBufferPtr> {
    let mut prefix_lengths = Vec::with_capacity(self.values.len());
    let mut suffixes: Vec<&[u8]> = Vec::with_capacity(self.values.len());
    let mut previous: &[u8] = &[];
    let bytes: Vec<&[u8]> = self.values.iter().map(T::byte_array_value).collect();
    for b in &bytes {
      let prefix_len = common_prefix_len(previous, b);
      prefix_lengths.push(prefix_len as i32);
      suffixes.push(&b[prefix_len..]);
      previous = b;
    }
    let suffix_lengths: Vec<i32> = suffixes.iter().map(|s| s.len() as i32).collect();

    let mut prefix_encoder = DeltaBitPackEncoder::<Int32Type>::new();
    prefix_encoder.put(&prefix_lengths)?;
    let mut out = prefix_encoder.flush_buffer()?.as_slice().to_vec();

    let mut suffix_encoder = DeltaBitPackEncoder::<Int32Type>::new();
    suffix_encoder.put(&suffix_lengths)?;
    out.extend_from_slice(suffix_encoder.flush_buffer()?.as_slice());

    for s in &suffixes {
      out.extend_from_slice(s);
    }
    self.values.clear();
    Ok(ByteBufferPtr::new(out))
  }
}

/// `BYTE_STREAM_SPLIT`: each value's fixed-width bytes are spread across
/// `type_size` separate streams.
pub struct ByteStreamSplitEncoder<T: DataType> {
  values: Vec<T::T>,
  _phantom: PhantomData<T>,
}

impl<T: DataType> ByteStreamSplitEncoder<T> {
  pub fn new() -> Self {
    ByteStreamSplitEncoder { values: Vec::new(), _phantom: PhantomData }
  }
}

impl<T: DataType> Default for ByteStreamSplitEncoder<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: DataType> Encoder<T> for ByteStreamSplitEncoder<T> {
  fn put(&mut self, values: &[T::T]) -> Result<()> {
    self.values.extend_from_slice(values);
    Ok(())
  }

  fn encoding(&self) -> Encoding {
    Encoding::BYTE_STREAM_SPLIT
  }

  fn estimated_data_encoded_size(&self) -> usize {
    self.values.len() * T::get_type_size().unwrap_or(0)
  }

  fn flush_buffer(&mut self) -> Result<ByteBufferPtr> {
    let type_size = T::get_type_size().ok_or_else(|| nyi_err!("BYTE_STREAM_SPLIT requires a fixed-width type"))?;
    let mut plain = Vec::new();
    T::encode_plain(&self.values, &mut plain);
    let n = self.values.len();
    let mut out = vec![0u8; plain.len()];
    for i in 0..n {
      for b in 0..type_size {
        out[b * n + i] = plain[i * type_size + b];
      }
    }
    self.values.clear();
    Ok(ByteBufferPtr::new(out))
  }
}

/// Selects the `Encoder` implementing `encoding` for `T`, erroring out for
/// encoding/physical-type combinations that do not make sense.
pub fn get_encoder<T: DataType>(descr: ColumnDescPtr, encoding: Encoding) -> Result<Box<dyn Encoder<T>>> {
  use crate::basic::Type as PhysicalType;
  match encoding {
    Encoding::PLAIN => Ok(Box::new(PlainEncoder::<T>::new())),
    Encoding::RLE_DICTIONARY | Encoding::PLAIN_DICTIONARY => Ok(Box::new(DictEncoder::<T>::new(descr))),
    Encoding::DELTA_BINARY_PACKED => match T::get_physical_type() {
      PhysicalType::INT32 | PhysicalType::INT64 => Ok(Box::new(DeltaBitPackEncoder::<T>::new())),
      other => Err(nyi_err!("DELTA_BINARY_PACKED does not support physical type {:?}", other)),
    },
    Encoding::DELTA_LENGTH_BYTE_ARRAY => match T::get_physical_type() {
      PhysicalType::BYTE_ARRAY => Ok(Box::new(DeltaLengthByteArrayEncoder::<T>::new())),
      other => Err(nyi_err!("DELTA_LENGTH_BYTE_ARRAY does not support physical type {:?}", other)),
    },
    Encoding::DELTA_BYTE_ARRAY => match T::get_physical_type() {
      PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY => {
        Ok(Box::new(DeltaByteArrayEncoder::<T>::new()))
      }
      other => Err(nyi_err!("DELTA_BYTE_ARRAY does not support physical type {:?}", other)),
    },
    Encoding::BYTE_STREAM_SPLIT => match T::get_type_size() {
      Some(_) => Ok(Box::new(ByteStreamSplitEncoder::<T>::new())),
      None => Err(nyi_err!("BYTE_STREAM_SPLIT requires a fixed-width type")),
    },
    _ => Err(nyi_err!("Unsupported encoder encoding {:?}", encoding)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::encodings::decoding::{Decoder, PlainDecoder};
  use crate::schema::types::{GroupTypeBuilder, PrimitiveTypeBuilder, SchemaDescriptor};

  fn col_desc(physical: crate::basic::Type) -> ColumnDescPtr {
    let leaf = PrimitiveTypeBuilder::new("col", physical).build().unwrap();
    let root = GroupTypeBuilder::new("schema")
      .with_repetition(None)
      .with_fields(vec![std::sync::Arc::new(leaf)])
      .build();
    SchemaDescriptor::new(std::sync::Arc::new(root)).column(0).clone()
  }

  #[test]
  fn test_plain_encode_roundtrip() {
    let values = vec![1i32, 2, 3, -4, i32::MAX];
    let mut encoder = PlainEncoder::<Int32Type>::new();
    encoder.put(&values).unwrap();
    let bytes = encoder.flush_buffer().unwrap();

    let descr = col_desc(crate::basic::Type::INT32);
    let mut decoder = PlainDecoder::<Int32Type>::new(descr);
    decoder.set_data(bytes, values.len()).unwrap();
    let mut out = vec![0i32; values.len()];
    decoder.get(&mut out).unwrap();
    assert_eq!(out, values);
  }

  #[test]
  fn test_dict_encode_roundtrip() {
    let descr = col_desc(crate::basic::Type::BYTE_ARRAY);
    let values = vec![
      ByteArray::from("a"),
      ByteArray::from("b"),
      ByteArray::from("a"),
      ByteArray::from("c"),
      ByteArray::from("b"),
    ];
    let mut encoder = DictEncoder::<ByteArrayType>::new(descr.clone());
    encoder.put(&values).unwrap();
    assert_eq!(encoder.num_entries(), 3);
    let dict_bytes = encoder.write_dict().unwrap();
    let num_entries = encoder.num_entries();
    let indices_bytes = encoder.flush_buffer().unwrap();

    let mut dict_page_decoder: PlainDecoder<ByteArrayType> = PlainDecoder::new(descr);
    dict_page_decoder.set_data(dict_bytes, num_entries).unwrap();

    let mut dict_decoder: crate::encodings::decoding::DictDecoder<ByteArrayType> =
      crate::encodings::decoding::DictDecoder::new();
    dict_decoder.set_dict(Box::new(dict_page_decoder)).unwrap();
    dict_decoder.set_data(indices_bytes, values.len()).unwrap();
    let mut out = vec![ByteArray::default(); values.len()];
    dict_decoder.get(&mut out).unwrap();
    assert_eq!(out, values);
  }

  #[test]
  fn test_delta_bit_pack_encode_single_block() {
    let values: Vec<i64> = vec![100, 101, 99, 105, 1000, -50];
    let mut encoder = DeltaBitPackEncoder::<Int64Type>::new();
    encoder.put(&values).unwrap();
    let bytes = encoder.flush_buffer().unwrap();

    let mut decoder = crate::encodings::decoding::DeltaBitPackDecoder::<Int64Type>::new();
    decoder.set_data(bytes, values.len()).unwrap();
    let mut out = vec![0i64; values.len()];
    decoder.get(&mut out).unwrap();
    assert_eq!(out, values);
  }

  #[test]
  fn test_delta_length_byte_array_encode_roundtrip() {
    let values = vec![ByteArray::from("x"), ByteArray::from("yy"), ByteArray::from("zzz"), ByteArray::from("")];
    let mut encoder = DeltaLengthByteArrayEncoder::<ByteArrayType>::new();
    encoder.put(&values).unwrap();
    let bytes = encoder.flush_buffer().unwrap();

    let mut decoder = crate::encodings::decoding::DeltaLengthByteArrayDecoder::<ByteArrayType>::new();
    decoder.set_data(bytes, values.len()).unwrap();
    let mut out = vec![ByteArray::default(); values.len()];
    decoder.get(&mut out).unwrap();
    assert_eq!(out, values);
  }

  #[test]
  fn test_common_prefix_len() {
    assert_eq!(common_prefix_len(b"apple", b"application"), 3);
    assert_eq!(common_prefix_len(b"", b"x"), 0);
    assert_eq!(common_prefix_len(b"same", b"same"), 4);
  }
}
