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

//! Page-payload compression. This module only adapts each codec crate to
//! one small `Codec` trait so `column::page` never has to match on
//! `Compression` itself.

use std::io::{self, Read, Write};

use crate::basic::Compression;
use crate::errors::Result;

/// Compresses/decompresses whole page payloads. `decompress` is told the
/// expected output size up front (`uncompressed_page_size` from the page
/// header), which lets every codec here pre-size its output buffer instead
/// of growing it incrementally.
pub trait Codec: Send {
  fn decompress(&mut self, input: &[u8], output: &mut Vec<u8>, uncompressed_size: usize) -> Result<()>;

  fn compress(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()>;
}

struct UncompressedCodec;

impl Codec for UncompressedCodec {
  fn decompress(&mut self, input: &[u8], output: &mut Vec<u8>, _uncompressed_size: usize) -> Result<()> {
    output.extend_from_slice(input);
    Ok(())
  }

  fn compress(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    output.extend_from_slice(input);
    Ok(())
  }
}

struct SnappyCodec;

impl Codec for SnappyCodec {
  fn decompress(&mut self, input: &[u8], output: &mut Vec<u8>, uncompressed_size: usize) -> Result<()> {
    let len = output.len();
    output.resize(len + uncompressed_size, 0);
    let mut decoder = snap::raw::Decoder::new();
    let decoded = decoder
      .decompress(input, &mut output[len..])
      .map_err(|e| general_err!("Snappy decompress error: {}", e))?;
    output.truncate(len + decoded);
    Ok(())
  }

  fn compress(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut encoder = snap::raw::Encoder::new();
    let compressed =
      encoder.compress_vec(input).map_err(|e| general_err!("Snappy compress error: {}", e))?;
    output.extend_from_slice(&compressed);
    Ok(())
  }
}

struct GzipCodec;

impl Codec for GzipCodec {
  fn decompress(&mut self, input: &[u8], output: &mut Vec<u8>, _uncompressed_size: usize) -> Result<()> {
    let mut decoder = flate2::read::GzDecoder::new(input);
    decoder.read_to_end(output).map_err(|e| general_err!("Gzip decompress error: {}", e))?;
    Ok(())
  }

  fn compress(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(input).map_err(|e| general_err!("Gzip compress error: {}", e))?;
    let compressed = encoder.finish().map_err(|e| general_err!("Gzip compress error: {}", e))?;
    output.extend_from_slice(&compressed);
    Ok(())
  }
}

struct BrotliCodec;

const BROTLI_BUFFER_SIZE: usize = 4096;
const BROTLI_QUALITY: u32 = 11;
const BROTLI_WINDOW: u32 = 22;

impl Codec for BrotliCodec {
  fn decompress(&mut self, input: &[u8], output: &mut Vec<u8>, _uncompressed_size: usize) -> Result<()> {
    let mut decompressor = brotli::Decompressor::new(input, BROTLI_BUFFER_SIZE);
    decompressor.read_to_end(output).map_err(|e| general_err!("Brotli decompress error: {}", e))?;
    Ok(())
  }

  fn compress(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut writer =
      brotli::CompressorWriter::new(Vec::new(), BROTLI_BUFFER_SIZE, BROTLI_QUALITY, BROTLI_WINDOW);
    writer.write_all(input).map_err(|e| general_err!("Brotli compress error: {}", e))?;
    output.extend_from_slice(writer.get_ref());
    Ok(())
  }
}

struct Lz4RawCodec;

impl Codec for Lz4RawCodec {
  fn decompress(&mut self, input: &[u8], output: &mut Vec<u8>, uncompressed_size: usize) -> Result<()> {
    let decompressed = lz4_flex::block::decompress(input, uncompressed_size)
      .map_err(|e| general_err!("LZ4 decompress error: {}", e))?;
    output.extend_from_slice(&decompressed);
    Ok(())
  }

  fn compress(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let compressed = lz4_flex::block::compress(input);
    output.extend_from_slice(&compressed);
    Ok(())
  }
}

struct ZstdCodec;

impl Codec for ZstdCodec {
  fn decompress(&mut self, mut input: &[u8], output: &mut Vec<u8>, _uncompressed_size: usize) -> Result<()> {
    zstd::stream::copy_decode(&mut input, output).map_err(|e| general_err!("Zstd decompress error: {}", e))?;
    Ok(())
  }

  fn compress(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let compressed =
      zstd::stream::encode_all(input, 0).map_err(|e| general_err!("Zstd compress error: {}", e))?;
    output.extend_from_slice(&compressed);
    Ok(())
  }
}

/// Builds the `Codec` matching `codec`. `UNCOMPRESSED` returns a pass-through
/// implementation rather than `None`, so callers never need a special case.
pub fn create_codec(codec: Compression) -> Result<Box<dyn Codec>> {
  match codec {
    Compression::UNCOMPRESSED => Ok(Box::new(UncompressedCodec)),
    Compression::SNAPPY => Ok(Box::new(SnappyCodec)),
    Compression::GZIP => Ok(Box::new(GzipCodec)),
    Compression::BROTLI => Ok(Box::new(BrotliCodec)),
    Compression::LZ4_RAW => Ok(Box::new(Lz4RawCodec)),
    Compression::ZSTD => Ok(Box::new(ZstdCodec)),
  }
}

/// Computes the CRC32-IEEE checksum a page's header declares: over the raw
/// compressed payload exactly as written,
/// including any uncompressed v2 level bytes the payload carries ahead of
/// the (possibly compressed) value section.
pub fn checksum(data: &[u8]) -> u32 {
  crc32fast::hash(data)
}

/// Wraps `io::Error` so call sites that only have a `Read`/`Write` failure
/// can still produce a `ParquetError` uniformly.
pub fn io_err_to_parquet(e: io::Error) -> crate::errors::ParquetError {
  crate::errors::ParquetError::Io(format!("{}", e))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn roundtrip(codec: Compression, data: &[u8]) {
    let mut compressed = Vec::new();
    create_codec(codec).unwrap().compress(data, &mut compressed).unwrap();
    let mut decompressed = Vec::new();
    create_codec(codec)
      .unwrap()
      .decompress(&compressed, &mut decompressed, data.len())
      .unwrap();
    assert_eq!(decompressed, data);
  }

  #[test]
  fn test_uncompressed_roundtrip() {
    roundtrip(Compression::UNCOMPRESSED, b"hello world, this is a test payload");
  }

  #[test]
  fn test_snappy_roundtrip() {
    roundtrip(Compression::SNAPPY, b"hello world, this is a test payload, snappy");
  }

  #[test]
  fn test_gzip_roundtrip() {
    roundtrip(Compression::GZIP, b"hello world, this is a test payload, gzip gzip gzip");
  }

  #[test]
  fn test_brotli_roundtrip() {
    roundtrip(Compression::BROTLI, b"hello world, this is a test payload, brotli brotli");
  }

  #[test]
  fn test_lz4_raw_roundtrip() {
    roundtrip(Compression::LZ4_RAW, b"hello world, this is a test payload, lz4 lz4 lz4 lz4");
  }

  #[test]
  fn test_zstd_roundtrip() {
    roundtrip(Compression::ZSTD, b"hello world, this is a test payload, zstd zstd zstd");
  }

  #[test]
  fn test_checksum_changes_with_bit_flip() {
    let mut data = b"the quick brown fox".to_vec();
    let original = checksum(&data);
    data[0] ^= 0x01;
    assert_ne!(checksum(&data), original);
  }
}
