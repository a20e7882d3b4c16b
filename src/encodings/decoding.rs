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

//! Value decoders, one per `Encoding` variant a data or dictionary page can
//! declare. Each decoder is generic over `DataType`; physical-type-specific
//! behavior is delegated to the hooks on `DataType` itself
//! (`decode_plain`/`delta_from_i64`/`byte_array_from`/...) rather than to
//! nightly specialization, so `get_decoder` below is a single ordinary
//! generic function.

use std::cmp;
use std::marker::PhantomData;

use crate::basic::{Encoding, Type as PhysicalType};
use crate::data_type::*;
use crate::errors::Result;
use crate::schema::types::ColumnDescPtr;
use crate::util::bit_util::BitReader;
use crate::util::memory::ByteBufferPtr;

use super::rle_encoding::RleDecoder;

/// Decodes a column chunk's values out of one encoding's wire format.
pub trait Decoder<T: DataType> {
  /// Sets the decoder to read `num_values` values out of `data`.
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()>;

  /// Decodes up to `buffer.len()` values, returning the number actually
  /// decoded (less than `buffer.len()` only once the page is exhausted).
  fn get(&mut self, buffer: &mut [T::T]) -> Result<usize>;

  /// Number of values not yet returned by `get`.
  fn values_left(&self) -> usize;

  fn encoding(&self) -> Encoding;
}

/// `PLAIN`: values are simply concatenated in their natural byte layout.
pub struct PlainDecoder<T: DataType> {
  data: Option<ByteBufferPtr>,
  type_length: i32,
  num_values: usize,
  pos: usize,
  _phantom: PhantomData<T>,
}

impl<T: DataType> PlainDecoder<T> {
  pub fn new(descr: ColumnDescPtr) -> Self {
    PlainDecoder { data: None, type_length: descr.type_length(), num_values: 0, pos: 0, _phantom: PhantomData }
  }
}

impl<T: DataType> Decoder<T> for PlainDecoder<T> {
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()> {
    self.data = Some(data);
    self.num_values = num_values;
    self.pos = 0;
    Ok(())
  }

  fn get(&mut self, buffer: &mut [T::T]) -> Result<usize> {
    let data = self.data.as_ref().ok_or_else(|| general_err!("PlainDecoder::set_data was not called"))?;
    let want = cmp::min(buffer.len(), self.num_values);
    let (decoded, new_pos) = T::decode_plain(data, self.pos, self.type_length, &mut buffer[..want])?;
    self.pos = new_pos;
    self.num_values -= decoded;
    Ok(decoded)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }
}

/// `RLE_DICTIONARY` (and the deprecated `PLAIN_DICTIONARY` alias): each
/// value is a dictionary index, hybrid-RLE encoded. The dictionary itself
/// arrives separately as a `PLAIN`-encoded dictionary page and is installed
/// via `set_dict` before any data page using this decoder is read.
pub struct DictDecoder<T: DataType> {
  dictionary: Vec<T::T>,
  num_values: usize,
  rle_decoder: Option<RleDecoder>,
  _phantom: PhantomData<T>,
}

impl<T: DataType> DictDecoder<T> {
  pub fn new() -> Self {
    DictDecoder { dictionary: Vec::new(), num_values: 0, rle_decoder: None, _phantom: PhantomData }
  }

  /// Reads every value out of `decoder` (a freshly `set_data`'d `PlainDecoder`
  /// over the dictionary page) into this decoder's dictionary.
  pub fn set_dict(&mut self, mut decoder: Box<dyn Decoder<T>>) -> Result<()> {
    let num_values = decoder.values_left();
    let mut dictionary = vec![T::T::default(); num_values];
    decoder.get(&mut dictionary)?;
    self.dictionary = dictionary;
    Ok(())
  }
}

impl<T: DataType> Default for DictDecoder<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: DataType> Decoder<T> for DictDecoder<T> {
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()> {
    if data.is_empty() {
      self.rle_decoder = Some(RleDecoder::new(0));
      self.num_values = num_values;
      return Ok(());
    }
    let bit_width = data.as_slice()[0];
    let mut rle_decoder = RleDecoder::new(bit_width);
    rle_decoder.set_data(data.start_from(1));
    self.rle_decoder = Some(rle_decoder);
    self.num_values = num_values;
    Ok(())
  }

  fn get(&mut self, buffer: &mut [T::T]) -> Result<usize> {
    let rle_decoder =
      self.rle_decoder.as_mut().ok_or_else(|| general_err!("DictDecoder::set_data was not called"))?;
    let want = cmp::min(buffer.len(), self.num_values);
    let n = rle_decoder.get_batch_with_dict(&self.dictionary, &mut buffer[..want], want)?;
    self.num_values -= n;
    Ok(n)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::RLE_DICTIONARY
  }
}

/// `DELTA_BINARY_PACKED`: only meaningful for `Int32Type`/`Int64Type`. A
/// page's worth of values is decoded eagerly into `buffered` the first time
/// `get` is called, since the block framing is awkward to resume mid-block
/// and pages are bounded in size anyway.
pub struct DeltaBitPackDecoder<T: DataType> {
  bit_reader: BitReader,
  buffered: Vec<i64>,
  buffered_pos: usize,
  total_values: usize,
  initialized: bool,
  _phantom: PhantomData<T>,
}

impl<T: DataType> DeltaBitPackDecoder<T> {
  pub fn new() -> Self {
    DeltaBitPackDecoder {
      bit_reader: BitReader::from(vec![]),
      buffered: Vec::new(),
      buffered_pos: 0,
      total_values: 0,
      initialized: false,
      _phantom: PhantomData,
    }
  }

  fn init_page(&mut self) -> Result<()> {
    let block_size = self
      .bit_reader
      .get_vlq_int()
      .ok_or_else(|| eof_err!("DELTA_BINARY_PACKED: missing block size"))? as usize;
    let num_mini_blocks = self
      .bit_reader
      .get_vlq_int()
      .ok_or_else(|| eof_err!("DELTA_BINARY_PACKED: missing mini-block count"))? as usize;
    let total_values = self
      .bit_reader
      .get_vlq_int()
      .ok_or_else(|| eof_err!("DELTA_BINARY_PACKED: missing value count"))? as usize;
    let first_value = self
      .bit_reader
      .get_zigzag_vlq_int()
      .ok_or_else(|| eof_err!("DELTA_BINARY_PACKED: missing first value"))?;

    if num_mini_blocks == 0 || block_size % num_mini_blocks != 0 {
      return Err(general_err!("DELTA_BINARY_PACKED: invalid block/mini-block size"));
    }
    let values_per_mini_block = block_size / num_mini_blocks;

    let mut values = Vec::with_capacity(total_values);
    let mut current = first_value;
    if total_values > 0 {
      values.push(current);
    }

    while values.len() < total_values {
      let min_delta = self
        .bit_reader
        .get_zigzag_vlq_int()
        .ok_or_else(|| eof_err!("DELTA_BINARY_PACKED: missing block min delta"))?;
      let mut widths = vec![0u8; num_mini_blocks];
      for w in widths.iter_mut() {
        *w = self
          .bit_reader
          .get_aligned::<u8>(1)
          .ok_or_else(|| eof_err!("DELTA_BINARY_PACKED: missing mini-block width"))?;
      }
      for &width in &widths {
        for _ in 0..values_per_mini_block {
          let delta: u64 = self
            .bit_reader
            .get_value(width as usize)
            .ok_or_else(|| eof_err!("DELTA_BINARY_PACKED: missing packed delta"))?;
          if values.len() < total_values {
            current += min_delta + delta as i64;
            values.push(current);
          }
        }
      }
    }

    self.buffered = values;
    self.buffered_pos = 0;
    self.total_values = total_values;
    self.initialized = true;
    Ok(())
  }

  /// Byte offset into the page's data this decoder has consumed so far,
  /// rounded up to the next byte boundary. Used by `DELTA_LENGTH_BYTE_ARRAY`
  /// and `DELTA_BYTE_ARRAY` to find where the lengths section ends.
  pub fn get_offset(&mut self) -> usize {
    let _: Option<u8> = self.bit_reader.get_aligned(0);
    self.bit_reader.get_byte_offset()
  }
}

impl<T: DataType> Default for DeltaBitPackDecoder<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: DataType> Decoder<T> for DeltaBitPackDecoder<T> {
  fn set_data(&mut self, data: ByteBufferPtr, _num_values: usize) -> Result<()> {
    self.bit_reader.reset(data);
    self.initialized = false;
    Ok(())
  }

  fn get(&mut self, buffer: &mut [T::T]) -> Result<usize> {
    if !self.initialized {
      self.init_page()?;
    }
    let want = cmp::min(buffer.len(), self.total_values - self.buffered_pos);
    for (i, slot) in buffer[..want].iter_mut().enumerate() {
      *slot = T::delta_from_i64(self.buffered[self.buffered_pos + i]);
    }
    self.buffered_pos += want;
    Ok(want)
  }

  fn values_left(&self) -> usize {
    self.total_values - self.buffered_pos
  }

  fn encoding(&self) -> Encoding {
    Encoding::DELTA_BINARY_PACKED
  }
}

/// `DELTA_LENGTH_BYTE_ARRAY`: a `DELTA_BINARY_PACKED` stream of lengths
/// followed by the concatenated raw bytes of each value.
pub struct DeltaLengthByteArrayDecoder<T: DataType> {
  lengths: Vec<i32>,
  length_idx: usize,
  data: Option<ByteBufferPtr>,
  offset: usize,
  num_values: usize,
  _phantom: PhantomData<T>,
}

impl<T: DataType> DeltaLengthByteArrayDecoder<T> {
  pub fn new() -> Self {
    DeltaLengthByteArrayDecoder {
      lengths: Vec::new(),
      length_idx: 0,
      data: None,
      offset: 0,
      num_values: 0,
      _phantom: PhantomData,
    }
  }
}

impl<T: DataType> Default for DeltaLengthByteArrayDecoder<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: DataType> Decoder<T> for DeltaLengthByteArrayDecoder<T> {
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()> {
    let mut length_decoder = DeltaBitPackDecoder::<Int32Type>::new();
    length_decoder.set_data(data.clone(), num_values)?;
    let mut lengths = vec![0i32; num_values];
    length_decoder.get(&mut lengths)?;
    let consumed = length_decoder.get_offset();

    self.lengths = lengths;
    self.length_idx = 0;
    self.data = Some(data.start_from(consumed));
    self.offset = 0;
    self.num_values = num_values;
    Ok(())
  }

  fn get(&mut self, buffer: &mut [T::T]) -> Result<usize> {
    let data = self
      .data
      .as_ref()
      .ok_or_else(|| general_err!("DeltaLengthByteArrayDecoder::set_data was not called"))?;
    let slice = data.as_slice();
    let want = cmp::min(buffer.len(), self.num_values);
    for slot in buffer[..want].iter_mut() {
      let len = self.lengths[self.length_idx] as usize;
      self.length_idx += 1;
      if self.offset + len > slice.len() {
        return Err(eof_err!("DELTA_LENGTH_BYTE_ARRAY: not enough bytes for value"));
      }
      *slot = T::byte_array_from(slice[self.offset..self.offset + len].to_vec());
      self.offset += len;
    }
    self.num_values -= want;
    Ok(want)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::DELTA_LENGTH_BYTE_ARRAY
  }
}

/// `DELTA_BYTE_ARRAY`: each value is expressed as a shared prefix length
/// (relative to the previous value) plus a literal suffix, both
/// delta-encoded ahead of the concatenated suffix bytes.
pub struct DeltaByteArrayDecoder<T: DataType> {
  prefix_lengths: Vec<i32>,
  suffix_lengths: Vec<i32>,
  idx: usize,
  data: Option<ByteBufferPtr>,
  offset: usize,
  previous: Vec<u8>,
  num_values: usize,
  _phantom: PhantomData<T>,
}

impl<T: DataType> DeltaByteArrayDecoder<T> {
  pub fn new() -> Self {
    DeltaByteArrayDecoder {
      prefix_lengths: Vec::new(),
      suffix_lengths: Vec::new(),
      idx: 0,
      data: None,
      offset: 0,
      previous: Vec::new(),
      num_values: 0,
      _phantom: PhantomData,
    }
  }
}

impl<T: DataType> Default for DeltaByteArrayDecoder<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: DataType> Decoder<T> for DeltaByteArrayDecoder<T> {
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()> {
    let mut prefix_decoder = DeltaBitPackDecoder::<Int32Type>::new();
    prefix_decoder.set_data(data.clone(), num_values)?;
    let mut prefix_lengths = vec![0i32; num_values];
    prefix_decoder.get(&mut prefix_lengths)?;
    let after_prefixes = prefix_decoder.get_offset();

    let rest = data.start_from(after_prefixes);
    let mut suffix_decoder = DeltaBitPackDecoder::<Int32Type>::new();
    suffix_decoder.set_data(rest.clone(), num_values)?;
    let mut suffix_lengths = vec![0i32; num_values];
    suffix_decoder.get(&mut suffix_lengths)?;
    let after_suffixes = suffix_decoder.get_offset();

    self.prefix_lengths = prefix_lengths;
    self.suffix_lengths = suffix_lengths;
    self.idx = 0;
    self.data = Some(rest.start_from(after_suffixes));
    self.offset = 0;
    self.previous = Vec::new();
    self.num_values = num_values;
    Ok(())
  }

  fn get(&mut self, buffer: &mut [T::T]) -> Result<usize> {
    let data = self.data.as_ref().ok_or_else(|| general_err!("DeltaByteArrayDecoder::set_data was not called"))?;
    let slice = data.as_slice();
    let want = cmp::min(buffer.len(), self.num_values);
    for slot in buffer[..want].iter_mut() {
      let prefix_len = self.prefix_lengths[self.idx] as usize;
      let suffix_len = self.suffix_lengths[self.idx] as usize;
      self.idx += 1;
      if self.offset + suffix_len > slice.len() || prefix_len > self.previous.len() {
        return Err(eof_err!("DELTA_BYTE_ARRAY: not enough bytes for value"));
      }
      let mut value = Vec::with_capacity(prefix_len + suffix_len);
      value.extend_from_slice(&self.previous[..prefix_len]);
      value.extend_from_slice(&slice[self.offset..self.offset + suffix_len]);
      self.offset += suffix_len;
      self.previous = value.clone();
      *slot = T::byte_array_from(value);
    }
    self.num_values -= want;
    Ok(want)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::DELTA_BYTE_ARRAY
  }
}

/// `BYTE_STREAM_SPLIT`: each value's fixed-width bytes are spread across
/// `type_size` separate streams (stream `b` holds byte `b` of every value),
/// which compresses better for floating-point columns than row-major PLAIN.
pub struct ByteStreamSplitDecoder<T: DataType> {
  data: Option<ByteBufferPtr>,
  type_length: i32,
  type_size: usize,
  total_values: usize,
  values_read: usize,
  _phantom: PhantomData<T>,
}

impl<T: DataType> ByteStreamSplitDecoder<T> {
  pub fn new(descr: ColumnDescPtr) -> Self {
    ByteStreamSplitDecoder {
      data: None,
      type_length: descr.type_length(),
      type_size: T::get_type_size().unwrap_or(0),
      total_values: 0,
      values_read: 0,
      _phantom: PhantomData,
    }
  }
}

impl<T: DataType> Decoder<T> for ByteStreamSplitDecoder<T> {
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()> {
    self.total_values = num_values;
    self.values_read = 0;
    self.data = Some(data);
    Ok(())
  }

  fn get(&mut self, buffer: &mut [T::T]) -> Result<usize> {
    let data = self.data.as_ref().ok_or_else(|| general_err!("ByteStreamSplitDecoder::set_data was not called"))?;
    let slice = data.as_slice();
    let type_size = self.type_size;
    if type_size == 0 {
      return Err(nyi_err!("BYTE_STREAM_SPLIT requires a fixed-width type"));
    }
    let total = slice.len() / type_size;
    let want = cmp::min(buffer.len(), self.total_values - self.values_read);
    let mut tmp = vec![0u8; type_size];
    for (i, slot) in buffer[..want].iter_mut().enumerate() {
      let value_idx = self.values_read + i;
      for b in 0..type_size {
        tmp[b] = slice[b * total + value_idx];
      }
      let tmp_buf = ByteBufferPtr::new(tmp.clone());
      let (_, _) = T::decode_plain(&tmp_buf, 0, self.type_length, std::slice::from_mut(slot))?;
    }
    self.values_read += want;
    Ok(want)
  }

  fn values_left(&self) -> usize {
    self.total_values - self.values_read
  }

  fn encoding(&self) -> Encoding {
    Encoding::BYTE_STREAM_SPLIT
  }
}

/// Selects the `Decoder` implementing `encoding` for `T`, erroring out for
/// encoding/physical-type combinations that do not make sense (e.g.
/// `DELTA_BINARY_PACKED` over a `BYTE_ARRAY` column).
pub fn get_decoder<T: DataType>(descr: ColumnDescPtr, encoding: Encoding) -> Result<Box<dyn Decoder<T>>> {
  match encoding {
    Encoding::PLAIN => Ok(Box::new(PlainDecoder::<T>::new(descr))),
    Encoding::RLE_DICTIONARY | Encoding::PLAIN_DICTIONARY => Ok(Box::new(DictDecoder::<T>::new())),
    Encoding::DELTA_BINARY_PACKED => match T::get_physical_type() {
      PhysicalType::INT32 | PhysicalType::INT64 => Ok(Box::new(DeltaBitPackDecoder::<T>::new())),
      other => Err(nyi_err!("DELTA_BINARY_PACKED does not support physical type {:?}", other)),
    },
    Encoding::DELTA_LENGTH_BYTE_ARRAY => match T::get_physical_type() {
      PhysicalType::BYTE_ARRAY => Ok(Box::new(DeltaLengthByteArrayDecoder::<T>::new())),
      other => Err(nyi_err!("DELTA_LENGTH_BYTE_ARRAY does not support physical type {:?}", other)),
    },
    Encoding::DELTA_BYTE_ARRAY => match T::get_physical_type() {
      PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY => {
        Ok(Box::new(DeltaByteArrayDecoder::<T>::new()))
      }
      other => Err(nyi_err!("DELTA_BYTE_ARRAY does not support physical type {:?}", other)),
    },
    Encoding::BYTE_STREAM_SPLIT => match T::get_type_size() {
      Some(_) => Ok(Box::new(ByteStreamSplitDecoder::<T>::new(descr))),
      None => Err(nyi_err!("BYTE_STREAM_SPLIT requires a fixed-width type")),
    },
    _ => Err(nyi_err!("Unsupported decoder encoding {:?}", encoding)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::Type as PhysicalType;
  use crate::schema::types::{GroupTypeBuilder, PrimitiveTypeBuilder, SchemaDescriptor};

  fn col_desc(type_length: i32, physical: PhysicalType) -> ColumnDescPtr {
    let mut builder = PrimitiveTypeBuilder::new("col", physical);
    if physical == PhysicalType::FIXED_LEN_BYTE_ARRAY {
      builder = builder.with_length(type_length);
    }
    let leaf = builder.build().unwrap();
    let root = GroupTypeBuilder::new("schema")
      .with_repetition(None)
      .with_fields(vec![std::sync::Arc::new(leaf)])
      .build();
    let schema = SchemaDescriptor::new(std::sync::Arc::new(root));
    schema.column(0).clone()
  }

  fn test_plain_decode<T: DataType>(values: &[T::T], physical: PhysicalType, type_length: i32) {
    let mut bytes = Vec::new();
    T::encode_plain(values, &mut bytes);
    let descr = col_desc(type_length, physical);
    let mut decoder: PlainDecoder<T> = PlainDecoder::new(descr);
    decoder.set_data(ByteBufferPtr::new(bytes), values.len()).unwrap();
    let mut out = vec![T::T::default(); values.len()];
    let n = decoder.get(&mut out).unwrap();
    assert_eq!(n, values.len());
    assert_eq!(&out[..], values);
  }

  #[test]
  fn test_plain_decode_int32() {
    let values = vec![1, -2, 3, i32::MAX, i32::MIN];
    test_plain_decode::<Int32Type>(&values, PhysicalType::INT32, -1);
  }

  #[test]
  fn test_plain_decode_int64() {
    let values = vec![1i64, -2, 3, i64::MAX, i64::MIN];
    test_plain_decode::<Int64Type>(&values, PhysicalType::INT64, -1);
  }

  #[test]
  fn test_plain_decode_float_double() {
    test_plain_decode::<FloatType>(&[1.5f32, -2.25, 0.0], PhysicalType::FLOAT, -1);
    test_plain_decode::<DoubleType>(&[1.5f64, -2.25, 0.0], PhysicalType::DOUBLE, -1);
  }

  #[test]
  fn test_plain_decode_bool() {
    test_plain_decode::<BoolType>(
      &[true, false, false, true, true, true, true, true, false],
      PhysicalType::BOOLEAN,
      -1,
    );
  }

  #[test]
  fn test_plain_decode_byte_array() {
    let values = vec![ByteArray::from("hello"), ByteArray::from("world!"), ByteArray::from("")];
    test_plain_decode::<ByteArrayType>(&values, PhysicalType::BYTE_ARRAY, -1);
  }

  #[test]
  fn test_plain_decode_fixed_len_byte_array() {
    let values = vec![ByteArray::from(vec![1u8, 2, 3, 4]), ByteArray::from(vec![5u8, 6, 7, 8])];
    test_plain_decode::<FixedLenByteArrayType>(&values, PhysicalType::FIXED_LEN_BYTE_ARRAY, 4);
  }

  #[test]
  fn test_delta_bit_packed_roundtrip() {
    let values: Vec<i32> = (0..500).map(|i| i * 3 - 17).collect();
    use crate::encodings::encoding::Encoder;
    let mut encoder = crate::encodings::encoding::DeltaBitPackEncoder::<Int32Type>::new();
    encoder.put(&values).unwrap();
    let bytes = encoder.flush_buffer().unwrap();

    let mut decoder = DeltaBitPackDecoder::<Int32Type>::new();
    decoder.set_data(bytes, values.len()).unwrap();
    let mut out = vec![0i32; values.len()];
    let n = decoder.get(&mut out).unwrap();
    assert_eq!(n, values.len());
    assert_eq!(out, values);
  }

  #[test]
  fn test_delta_byte_array_roundtrip() {
    let values = vec![
      ByteArray::from("apple"),
      ByteArray::from("application"),
      ByteArray::from("apply"),
      ByteArray::from("banana"),
    ];
    use crate::encodings::encoding::Encoder;
    let mut encoder = crate::encodings::encoding::DeltaByteArrayEncoder::<ByteArrayType>::new();
    encoder.put(&values).unwrap();
    let bytes = encoder.flush_buffer().unwrap();

    let mut decoder = DeltaByteArrayDecoder::<ByteArrayType>::new();
    decoder.set_data(bytes, values.len()).unwrap();
    let mut out = vec![ByteArray::default(); values.len()];
    let n = decoder.get(&mut out).unwrap();
    assert_eq!(n, values.len());
    assert_eq!(out, values);
  }

  #[test]
  fn test_byte_stream_split_roundtrip() {
    let values = vec![1.5f32, -2.25, 3.0, f32::MAX, f32::MIN, 0.0];
    use crate::encodings::encoding::Encoder;
    let mut encoder = crate::encodings::encoding::ByteStreamSplitEncoder::<FloatType>::new();
    encoder.put(&values).unwrap();
    let bytes = encoder.flush_buffer().unwrap();

    let descr = col_desc(-1, PhysicalType::FLOAT);
    let mut decoder = ByteStreamSplitDecoder::<FloatType>::new(descr);
    decoder.set_data(bytes, values.len()).unwrap();
    let mut out = vec![0f32; values.len()];
    let n = decoder.get(&mut out).unwrap();
    assert_eq!(n, values.len());
    assert_eq!(out, values);
  }
}
