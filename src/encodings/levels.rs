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

//! Repetition/definition level encoding: `RLE` (the only encoding modern
//! writers emit for levels) and the legacy `BIT_PACKED` fallback a reader
//! still has to understand.

use std::mem;

use crate::basic::Encoding;
use crate::errors::{ParquetError, Result};
use crate::util::bit_util::{ceil, num_required_bits, BitReader, BitWriter};
use crate::util::memory::ByteBufferPtr;

use super::rle_encoding::{RleDecoder, RleEncoder};

enum InternalEncoder {
  Rle(RleEncoder),
  BitPacked(BitWriter),
}

/// Encodes a column's repetition or definition levels ahead of the values
/// they tag, as a data page's layout requires.
pub struct LevelEncoder {
  bit_width: u8,
  encoder: InternalEncoder,
}

impl LevelEncoder {
  /// `byte_buffer` is pre-sized via `max_buffer_size` by the caller.
  pub fn new(encoding: Encoding, max_level: i16, byte_buffer: Vec<u8>) -> Self {
    let bit_width = num_required_bits(max_level as u64) as u8;
    let encoder = match encoding {
      Encoding::RLE => InternalEncoder::Rle(RleEncoder::new_from_buf(bit_width, byte_buffer, mem::size_of::<i32>())),
      Encoding::BIT_PACKED => InternalEncoder::BitPacked(BitWriter::new_from_buf(byte_buffer, 0)),
      _ => panic!("Unsupported encoding for level encoder: {:?}", encoding),
    };
    LevelEncoder { bit_width, encoder }
  }

  /// The maximum number of bytes needed to encode `num_buffered_values`
  /// levels, each bounded by `max_level`.
  pub fn max_buffer_size(encoding: Encoding, max_level: i16, num_buffered_values: usize) -> usize {
    let bit_width = num_required_bits(max_level as u64) as u8;
    match encoding {
      Encoding::RLE => RleEncoder::max_buffer_size(bit_width, num_buffered_values) + mem::size_of::<i32>(),
      Encoding::BIT_PACKED => ceil((num_buffered_values * bit_width as usize) as i64, 8) as usize,
      _ => panic!("Unsupported encoding for level encoder: {:?}", encoding),
    }
  }

  /// Encodes `buffer`, returning the number of levels actually written (less
  /// than `buffer.len()` only if the destination is full).
  pub fn put(&mut self, buffer: &[i16]) -> Result<usize> {
    let mut num_encoded = 0;
    match self.encoder {
      InternalEncoder::Rle(ref mut rle_encoder) => {
        for value in buffer {
          if !rle_encoder.put(*value as u64)? {
            break;
          }
          num_encoded += 1;
        }
        rle_encoder.flush()?;
      }
      InternalEncoder::BitPacked(ref mut bit_packed_encoder) => {
        for value in buffer {
          if !bit_packed_encoder.put_value(*value as u64, self.bit_width as usize) {
            return Err(ParquetError::General("Not enough bytes left".to_string()));
          }
          num_encoded += 1;
        }
      }
    }
    Ok(num_encoded)
  }

  /// Finalizes the encoder and returns the encoded bytes. For `RLE`, the
  /// body is prefixed by its own little-endian `i32` length, per the
  /// `DataPageHeader`'s framing for the level streams.
  pub fn consume(self) -> Result<Vec<u8>> {
    match self.encoder {
      InternalEncoder::Rle(rle_encoder) => {
        let len = rle_encoder.len() as i32;
        let mut encoded = rle_encoder.consume();
        encoded[0..4].copy_from_slice(&len.to_le_bytes());
        Ok(encoded)
      }
      InternalEncoder::BitPacked(bit_packed_encoder) => Ok(bit_packed_encoder.consume()),
    }
  }
}

enum InternalDecoder {
  Rle(RleDecoder),
  BitPacked(BitReader, usize),
}

/// Decodes a column's repetition or definition levels.
pub struct LevelDecoder {
  encoding: Encoding,
  bit_width: u8,
  decoder: Option<InternalDecoder>,
}

impl LevelDecoder {
  pub fn new(encoding: Encoding, max_level: i16) -> Self {
    let bit_width = num_required_bits(max_level as u64) as u8;
    LevelDecoder { encoding, bit_width, decoder: None }
  }

  /// Points the decoder at `data`, which holds (at least) `num_buffered_values`
  /// levels. Returns the number of bytes of `data` consumed by the level
  /// stream's own framing (the caller slices past this to reach the values).
  pub fn set_data(&mut self, num_buffered_values: usize, data: ByteBufferPtr) -> usize {
    match self.encoding {
      Encoding::RLE => {
        let len = i32::from_le_bytes(data.as_slice()[0..4].try_into().unwrap()) as usize;
        let mut rle_decoder = RleDecoder::new(self.bit_width);
        rle_decoder.set_data(data.range(4, len));
        self.decoder = Some(InternalDecoder::Rle(rle_decoder));
        4 + len
      }
      Encoding::BIT_PACKED => {
        let num_bytes = ceil((num_buffered_values * self.bit_width as usize) as i64, 8) as usize;
        let reader = BitReader::new(data.range(0, num_bytes));
        self.decoder = Some(InternalDecoder::BitPacked(reader, num_buffered_values));
        num_bytes
      }
      _ => panic!("Unsupported encoding for level decoder: {:?}", self.encoding),
    }
  }

  /// Like `set_data`, but the level stream is `len` bytes starting at
  /// `start` within `data` rather than occupying the whole buffer. Only
  /// `RLE` supports this, since `BIT_PACKED`'s length is implied entirely by
  /// `num_buffered_values` and never separately framed.
  pub fn set_data_range(&mut self, num_buffered_values: usize, data: &ByteBufferPtr, start: usize, len: usize) -> usize {
    let _ = num_buffered_values;
    match self.encoding {
      Encoding::RLE => {
        let mut rle_decoder = RleDecoder::new(self.bit_width);
        rle_decoder.set_data(data.range(start, len));
        self.decoder = Some(InternalDecoder::Rle(rle_decoder));
        len
      }
      _ => panic!("set_data_range is only supported for RLE encoding"),
    }
  }

  pub fn get(&mut self, buffer: &mut [i16]) -> Result<usize> {
    match self.decoder {
      Some(InternalDecoder::Rle(ref mut rle_decoder)) => rle_decoder.get_batch(buffer),
      Some(InternalDecoder::BitPacked(ref mut reader, ref mut values_left)) => {
        let want = std::cmp::min(buffer.len(), *values_left);
        let n = reader.get_batch(&mut buffer[..want], self.bit_width as usize);
        *values_left -= n;
        Ok(n)
      }
      None => Err(ParquetError::General("LevelDecoder::set_data was not called".to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::test_common::random_numbers_range;

  fn test_internal_roundtrip(encoding: Encoding, levels: &[i16], max_level: i16) {
    let size = LevelEncoder::max_buffer_size(encoding, max_level, levels.len());
    let mut encoder = LevelEncoder::new(encoding, max_level, vec![0u8; size]);
    let num_encoded = encoder.put(levels).unwrap();
    assert_eq!(num_encoded, levels.len());
    let encoded = encoder.consume().unwrap();

    let mut decoder = LevelDecoder::new(encoding, max_level);
    decoder.set_data(levels.len(), ByteBufferPtr::new(encoded));
    let mut buffer = vec![0i16; levels.len()];
    let num_decoded = decoder.get(&mut buffer).unwrap();
    assert_eq!(num_decoded, levels.len());
    assert_eq!(buffer, levels);
  }

  #[test]
  fn test_rle_roundtrip() {
    let mut levels = Vec::new();
    random_numbers_range(100, 0i16, 4, &mut levels);
    test_internal_roundtrip(Encoding::RLE, &levels, 3);
  }

  #[test]
  fn test_bit_packed_roundtrip() {
    let mut levels = Vec::new();
    random_numbers_range(100, 0i16, 4, &mut levels);
    test_internal_roundtrip(Encoding::BIT_PACKED, &levels, 3);
  }

  #[test]
  fn test_rle_roundtrip_all_zero_max_level() {
    let levels = vec![0i16; 50];
    test_internal_roundtrip(Encoding::RLE, &levels, 0);
  }

  #[test]
  fn test_rle_incremental_put() {
    let size = LevelEncoder::max_buffer_size(Encoding::RLE, 3, 30);
    let mut encoder = LevelEncoder::new(Encoding::RLE, 3, vec![0u8; size]);
    encoder.put(&[1, 2, 3]).unwrap();
    encoder.put(&[1, 1, 1, 1, 1, 1, 1, 1, 1, 1]).unwrap();
    let encoded = encoder.consume().unwrap();

    let mut decoder = LevelDecoder::new(Encoding::RLE, 3);
    decoder.set_data(13, ByteBufferPtr::new(encoded));
    let mut buffer = vec![0i16; 13];
    let n = decoder.get(&mut buffer).unwrap();
    assert_eq!(n, 13);
    assert_eq!(&buffer[0..3], &[1, 2, 3]);
    assert_eq!(&buffer[3..13], &[1; 10]);
  }

  #[test]
  fn test_bit_packed_overflow() {
    let size = LevelEncoder::max_buffer_size(Encoding::BIT_PACKED, 3, 8);
    let mut encoder = LevelEncoder::new(Encoding::BIT_PACKED, 3, vec![0u8; size]);
    let levels = vec![1i16; 8];
    let mut found_err = false;
    for _ in 0..100 {
      if encoder.put(&levels).is_err() {
        found_err = true;
        break;
      }
    }
    assert!(found_err, "expected bit-packed level encoder to eventually overflow");
  }

  #[test]
  fn test_rle_overflow() {
    let size = LevelEncoder::max_buffer_size(Encoding::RLE, 3, 8);
    let mut encoder = LevelEncoder::new(Encoding::RLE, 3, vec![0u8; size]);
    let levels: Vec<i16> = (0..8).map(|i| i % 4).collect();
    let mut found_err = false;
    for _ in 0..1000 {
      if encoder.put(&levels).is_err() {
        found_err = true;
        break;
      }
    }
    assert!(found_err, "expected RLE level encoder to eventually overflow");
  }

  #[test]
  fn test_set_data_range() {
    let mut levels = Vec::new();
    random_numbers_range(50, 0i16, 4, &mut levels);
    let size = LevelEncoder::max_buffer_size(Encoding::RLE, 3, levels.len());
    let mut encoder = LevelEncoder::new(Encoding::RLE, 3, vec![0u8; size]);
    encoder.put(&levels).unwrap();
    let encoded = encoder.consume().unwrap();
    let len = encoded.len() - 4;

    let data = ByteBufferPtr::new(encoded);
    let mut decoder = LevelDecoder::new(Encoding::RLE, 3);
    decoder.set_data_range(levels.len(), &data, 4, len);
    let mut buffer = vec![0i16; levels.len()];
    let n = decoder.get(&mut buffer).unwrap();
    assert_eq!(n, levels.len());
    assert_eq!(buffer, levels);
  }

  #[test]
  #[should_panic(expected = "Unsupported encoding")]
  fn test_invalid_encoding_panics() {
    LevelEncoder::new(Encoding::PLAIN, 3, vec![0u8; 16]);
  }
}
