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

//! Rust-level representations of Parquet's physical types, and the
//! `DataType` trait that ties a physical `Type` variant to one of them.
//!
//! Per-physical-type behavior (e.g. "how do I default-construct a value of
//! this type", "how do I read this type off the wire with Plain encoding")
//! could be reached via specialization on a blanket
//! `impl<T: DataType> Decoder<T> for PlainDecoder<T>`, but specialization
//! never stabilized on stable Rust, so each concrete `DataType` implementor
//! supplies its own small, explicit set of hooks instead; `encodings/decoding.rs`
//! and `encodings/encoding.rs` match on `T::get_physical_type()` to dispatch.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::basic::Type as PhysicalType;
use crate::errors::{ParquetError, Result};
use crate::util::bit_util::{BitReader, BitWriter};
use crate::util::memory::ByteBufferPtr;

/// A Parquet `INT96`: 12 bytes, historically used to store
/// nanosecond-precision timestamps split into a 64-bit time-of-day and a
/// 32-bit Julian day. Carried as three little-endian `u32`s, the natural
/// decomposition of the PLAIN encoding's 12-byte layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Int96 {
  value: [u32; 3],
}

impl Int96 {
  pub fn new(elem0: u32, elem1: u32, elem2: u32) -> Self {
    Int96 { value: [elem0, elem1, elem2] }
  }

  pub fn data(&self) -> &[u32] {
    &self.value
  }

  pub fn set_data(&mut self, elem0: u32, elem1: u32, elem2: u32) {
    self.value = [elem0, elem1, elem2];
  }

  /// Converts this INT96 into the number of days since the Unix epoch and
  /// nanoseconds within that day, the layout's documented semantics.
  pub fn to_i64(&self) -> i64 {
    const JULIAN_DAY_OF_EPOCH: i64 = 2_440_588;
    let day = self.value[2] as i64;
    let nanoseconds = ((self.value[1] as i64) << 32) + self.value[0] as i64;
    (day - JULIAN_DAY_OF_EPOCH) * 86_400 * 1_000_000_000 + nanoseconds
  }
}

impl fmt::Display for Int96 {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self.value)
  }
}

impl PartialOrd for Int96 {
  fn partial_cmp(&self, other: &Int96) -> Option<Ordering> {
    Some(self.to_i64().cmp(&other.to_i64()))
  }
}

/// A variable-length byte array, shared cheaply via reference counting so
/// that dictionary-encoded values and statistics min/max can hold a copy
/// without re-allocating the underlying bytes.
#[derive(Clone, Debug, Default, Eq)]
pub struct ByteArray {
  data: std::sync::Arc<Vec<u8>>,
}

impl ByteArray {
  pub fn new(data: Vec<u8>) -> Self {
    ByteArray { data: std::sync::Arc::new(data) }
  }

  pub fn data(&self) -> &[u8] {
    self.data.as_slice()
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }
}

impl From<Vec<u8>> for ByteArray {
  fn from(v: Vec<u8>) -> Self {
    ByteArray::new(v)
  }
}

impl From<&str> for ByteArray {
  fn from(s: &str) -> Self {
    ByteArray::new(s.as_bytes().to_vec())
  }
}

impl PartialEq for ByteArray {
  fn eq(&self, other: &ByteArray) -> bool {
    self.data() == other.data()
  }
}

impl PartialOrd for ByteArray {
  fn partial_cmp(&self, other: &ByteArray) -> Option<Ordering> {
    // Lexicographic byte-array ordering (unsigned byte order), matching the
    // comparator statistics min/max accumulation uses.
    Some(self.data().cmp(other.data()))
  }
}

impl fmt::Display for ByteArray {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self.data())
  }
}

/// A `FIXED_LEN_BYTE_ARRAY` value. Distinguished from `ByteArray` only at the
/// type level; on the wire it carries no length prefix, since the length is
/// fixed by the column's `type_length`.
pub type FixedLenByteArray = ByteArray;

/// A single leaf value, tagged with the repetition/definition levels and
/// column (flattened leaf) index it was produced for during Dremel
/// shredding. This is the record-assembly-facing counterpart of the raw,
/// untagged values that flow through the column encoders.
#[derive(Clone, Debug, PartialEq)]
pub struct Value<T> {
  value: Option<T>,
  repetition_level: i16,
  definition_level: i16,
  column_index: usize,
}

impl<T> Value<T> {
  pub fn new(
    value: Option<T>,
    repetition_level: i16,
    definition_level: i16,
    column_index: usize,
  ) -> Self {
    Value { value, repetition_level, definition_level, column_index }
  }

  pub fn value(&self) -> Option<&T> {
    self.value.as_ref()
  }

  pub fn into_value(self) -> Option<T> {
    self.value
  }

  pub fn is_null(&self) -> bool {
    self.value.is_none()
  }

  pub fn repetition_level(&self) -> i16 {
    self.repetition_level
  }

  pub fn definition_level(&self) -> i16 {
    self.definition_level
  }

  pub fn column_index(&self) -> usize {
    self.column_index
  }
}

/// Binds a physical `Type` to its native Rust representation, minus the
/// specialized-default pattern the encoders might otherwise reach for.
/// `get_physical_type()` lets encoders/decoders
/// recover which variant they are handling without a second generic
/// parameter.
pub trait DataType: 'static {
  type T: std::fmt::Debug + Default + Clone + PartialEq + Send + Sync + AsBytes;

  fn get_physical_type() -> PhysicalType;

  /// Size in bytes of a single fixed-width value of this type, or `None`
  /// for variable-length types (`ByteArray`). Used by `PLAIN` and
  /// `BYTE_STREAM_SPLIT` to compute stride.
  fn get_type_size() -> Option<usize>;

  /// Decodes up to `buffer.len()` PLAIN-encoded values out of `data`,
  /// resuming from opaque cursor `pos` (the value returned by a previous
  /// call, or 0 for a fresh page; units are type-defined — a byte offset
  /// for fixed- and variable-width types, a bit offset for `BOOLEAN`).
  /// Returns `(values_decoded, new_pos)`. `type_length` is only consulted
  /// by `FIXED_LEN_BYTE_ARRAY`.
  fn decode_plain(
    data: &ByteBufferPtr,
    pos: usize,
    type_length: i32,
    buffer: &mut [Self::T],
  ) -> Result<(usize, usize)>;

  /// Appends the PLAIN encoding of `values` to `out`.
  fn encode_plain(values: &[Self::T], out: &mut Vec<u8>);

  /// Widens this type's native value to `i64` for `DELTA_BINARY_PACKED`.
  /// Only `Int32Type`/`Int64Type` override these; `get_encoder`/`get_decoder`
  /// never route other physical types through the delta path, so the
  /// default panics on a caller bug rather than on reachable data.
  fn delta_as_i64(_v: &Self::T) -> i64 {
    panic!("DELTA_BINARY_PACKED only supports Int32Type and Int64Type")
  }

  fn delta_from_i64(_v: i64) -> Self::T {
    panic!("DELTA_BINARY_PACKED only supports Int32Type and Int64Type")
  }

  /// Views this type's native value as raw bytes, for `DELTA_LENGTH_BYTE_ARRAY`
  /// and `DELTA_BYTE_ARRAY`. Only `ByteArrayType`/`FixedLenByteArrayType`
  /// override this; `get_encoder`/`get_decoder` never route other physical
  /// types through these encodings.
  fn byte_array_value(_v: &Self::T) -> &[u8] {
    panic!("DELTA_LENGTH_BYTE_ARRAY/DELTA_BYTE_ARRAY only support byte array types")
  }

  fn byte_array_from(_v: Vec<u8>) -> Self::T {
    panic!("DELTA_LENGTH_BYTE_ARRAY/DELTA_BYTE_ARRAY only support byte array types")
  }
}

macro_rules! impl_numeric_data_type {
  ($name:ident, $physical_ty:expr, $native_ty:ty $(, delta: $as_i64:expr, $from_i64:expr)?) => {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct $name {}

    impl DataType for $name {
      type T = $native_ty;

      fn get_physical_type() -> PhysicalType {
        $physical_ty
      }

      fn get_type_size() -> Option<usize> {
        Some(mem::size_of::<$native_ty>())
      }

      fn decode_plain(
        data: &ByteBufferPtr,
        pos: usize,
        _type_length: i32,
        buffer: &mut [Self::T],
      ) -> Result<(usize, usize)> {
        let size = mem::size_of::<$native_ty>();
        let slice = data.as_slice();
        let n = buffer.len();
        if slice.len() < pos + n * size {
          return Err(ParquetError::Eof(format!(
            "Not enough bytes to decode {} {} value(s)",
            n,
            stringify!($name)
          )));
        }
        for (i, slot) in buffer.iter_mut().enumerate() {
          let s = pos + i * size;
          let mut bytes = [0u8; mem::size_of::<$native_ty>()];
          bytes.copy_from_slice(&slice[s..s + size]);
          *slot = <$native_ty>::from_le_bytes(bytes);
        }
        Ok((n, pos + n * size))
      }

      fn encode_plain(values: &[Self::T], out: &mut Vec<u8>) {
        out.reserve(values.len() * mem::size_of::<$native_ty>());
        for v in values {
          out.extend_from_slice(&v.to_le_bytes());
        }
      }

      $(
        fn delta_as_i64(v: &Self::T) -> i64 {
          let f: fn(&$native_ty) -> i64 = $as_i64;
          f(v)
        }

        fn delta_from_i64(v: i64) -> Self::T {
          let f: fn(i64) -> $native_ty = $from_i64;
          f(v)
        }
      )?
    }
  };
}

impl_numeric_data_type!(Int32Type, PhysicalType::INT32, i32, delta: |v| *v as i64, |v| v as i32);
impl_numeric_data_type!(Int64Type, PhysicalType::INT64, i64, delta: |v| *v, |v| v);
impl_numeric_data_type!(FloatType, PhysicalType::FLOAT, f32);
impl_numeric_data_type!(DoubleType, PhysicalType::DOUBLE, f64);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoolType {}

impl DataType for BoolType {
  type T = bool;

  fn get_physical_type() -> PhysicalType {
    PhysicalType::BOOLEAN
  }

  fn get_type_size() -> Option<usize> {
    Some(mem::size_of::<bool>())
  }

  fn decode_plain(
    data: &ByteBufferPtr,
    pos: usize,
    _type_length: i32,
    buffer: &mut [bool],
  ) -> Result<(usize, usize)> {
    let mut reader = BitReader::new(data.clone());
    if pos > 0 && !reader.skip(pos) {
      return Err(ParquetError::Eof("Not enough bits to skip".to_string()));
    }
    let mut n = 0;
    for slot in buffer.iter_mut() {
      match reader.get_value::<u8>(1) {
        Some(v) => {
          *slot = v != 0;
          n += 1;
        }
        None => break,
      }
    }
    Ok((n, pos + n))
  }

  fn encode_plain(values: &[bool], out: &mut Vec<u8>) {
    let mut writer = BitWriter::new(values.len() / 8 + 1);
    for v in values {
      writer.put_value(*v as u64, 1);
    }
    out.extend_from_slice(writer.get());
  }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Int96Type {}

impl DataType for Int96Type {
  type T = Int96;

  fn get_physical_type() -> PhysicalType {
    PhysicalType::INT96
  }

  fn get_type_size() -> Option<usize> {
    Some(12)
  }

  fn decode_plain(
    data: &ByteBufferPtr,
    pos: usize,
    _type_length: i32,
    buffer: &mut [Int96],
  ) -> Result<(usize, usize)> {
    let size = 12;
    let slice = data.as_slice();
    let n = buffer.len();
    if slice.len() < pos + n * size {
      return Err(ParquetError::Eof("Not enough bytes to decode Int96 value(s)".to_string()));
    }
    for (i, slot) in buffer.iter_mut().enumerate() {
      let s = pos + i * size;
      let a = u32::from_le_bytes(slice[s..s + 4].try_into().unwrap());
      let b = u32::from_le_bytes(slice[s + 4..s + 8].try_into().unwrap());
      let c = u32::from_le_bytes(slice[s + 8..s + 12].try_into().unwrap());
      *slot = Int96::new(a, b, c);
    }
    Ok((n, pos + n * size))
  }

  fn encode_plain(values: &[Int96], out: &mut Vec<u8>) {
    out.reserve(values.len() * 12);
    for v in values {
      for word in v.data() {
        out.extend_from_slice(&word.to_le_bytes());
      }
    }
  }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ByteArrayType {}

impl DataType for ByteArrayType {
  type T = ByteArray;

  fn get_physical_type() -> PhysicalType {
    PhysicalType::BYTE_ARRAY
  }

  fn get_type_size() -> Option<usize> {
    None
  }

  fn decode_plain(
    data: &ByteBufferPtr,
    pos: usize,
    _type_length: i32,
    buffer: &mut [ByteArray],
  ) -> Result<(usize, usize)> {
    let slice = data.as_slice();
    let mut offset = pos;
    let mut n = 0;
    for slot in buffer.iter_mut() {
      if offset + 4 > slice.len() {
        break;
      }
      let len = u32::from_le_bytes(slice[offset..offset + 4].try_into().unwrap()) as usize;
      offset += 4;
      if offset + len > slice.len() {
        return Err(ParquetError::Eof("Not enough bytes to decode byte array".to_string()));
      }
      *slot = ByteArray::new(slice[offset..offset + len].to_vec());
      offset += len;
      n += 1;
    }
    Ok((n, offset))
  }

  fn encode_plain(values: &[ByteArray], out: &mut Vec<u8>) {
    for v in values {
      out.extend_from_slice(&(v.len() as u32).to_le_bytes());
      out.extend_from_slice(v.data());
    }
  }

  fn byte_array_value(v: &ByteArray) -> &[u8] {
    v.data()
  }

  fn byte_array_from(v: Vec<u8>) -> ByteArray {
    ByteArray::new(v)
  }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedLenByteArrayType {}

impl DataType for FixedLenByteArrayType {
  type T = FixedLenByteArray;

  fn get_physical_type() -> PhysicalType {
    PhysicalType::FIXED_LEN_BYTE_ARRAY
  }

  fn get_type_size() -> Option<usize> {
    None
  }

  fn decode_plain(
    data: &ByteBufferPtr,
    pos: usize,
    type_length: i32,
    buffer: &mut [ByteArray],
  ) -> Result<(usize, usize)> {
    let tl = type_length.max(0) as usize;
    let slice = data.as_slice();
    let mut offset = pos;
    let mut n = 0;
    for slot in buffer.iter_mut() {
      if offset + tl > slice.len() {
        break;
      }
      *slot = ByteArray::new(slice[offset..offset + tl].to_vec());
      offset += tl;
      n += 1;
    }
    Ok((n, offset))
  }

  fn encode_plain(values: &[ByteArray], out: &mut Vec<u8>) {
    for v in values {
      out.extend_from_slice(v.data());
    }
  }

  fn byte_array_value(v: &ByteArray) -> &[u8] {
    v.data()
  }

  fn byte_array_from(v: Vec<u8>) -> ByteArray {
    ByteArray::new(v)
  }
}

/// Converts a fixed-width value into its little-endian byte representation.
/// Used by `BitWriter::put_aligned` and by level/statistics encoding that
/// needs to splice a raw length or value into a byte buffer.
pub trait AsBytes {
  fn as_bytes(&self) -> Vec<u8>;
}

macro_rules! impl_as_bytes {
  ($ty:ty) => {
    impl AsBytes for $ty {
      fn as_bytes(&self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
      }
    }
  };
}

impl_as_bytes!(i8);
impl_as_bytes!(i16);
impl_as_bytes!(i32);
impl_as_bytes!(i64);
impl_as_bytes!(u8);
impl_as_bytes!(u16);
impl_as_bytes!(u32);
impl_as_bytes!(u64);
impl_as_bytes!(f32);
impl_as_bytes!(f64);

impl AsBytes for bool {
  fn as_bytes(&self) -> Vec<u8> {
    vec![if *self { 1 } else { 0 }]
  }
}

impl AsBytes for Int96 {
  fn as_bytes(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(12);
    for word in &self.value {
      out.extend_from_slice(&word.to_le_bytes());
    }
    out
  }
}

impl AsBytes for ByteArray {
  fn as_bytes(&self) -> Vec<u8> {
    self.data().to_vec()
  }
}

impl AsBytes for [u8] {
  fn as_bytes(&self) -> Vec<u8> {
    self.to_vec()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_int96_to_i64() {
    let mut i96 = Int96::new(0, 0, 2_440_588);
    assert_eq!(i96.to_i64(), 0);
    i96.set_data(0, 0, 2_440_589);
    assert_eq!(i96.to_i64(), 86_400 * 1_000_000_000);
  }

  #[test]
  fn test_byte_array_ordering() {
    let a = ByteArray::from("abc");
    let b = ByteArray::from("abd");
    assert!(a < b);
    assert_eq!(a, ByteArray::from("abc"));
  }

  #[test]
  fn test_value_null() {
    let v: Value<i32> = Value::new(None, 1, 0, 3);
    assert!(v.is_null());
    assert_eq!(v.repetition_level(), 1);
    assert_eq!(v.column_index(), 3);
  }

  #[test]
  fn test_physical_type_sizes() {
    assert_eq!(Int32Type::get_type_size(), Some(4));
    assert_eq!(Int64Type::get_type_size(), Some(8));
    assert_eq!(ByteArrayType::get_type_size(), None);
    assert_eq!(Int96Type::get_physical_type(), PhysicalType::INT96);
  }
}
