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

//! Reader-side traits (`FileReader`, `RowGroupReader`) and their serialized
//! implementation over any positioned byte source,
//! plus `ChunkReader`/`Length`, the abstraction a `File` and an in-memory
//! buffer both satisfy so the rest of the crate never special-cases I/O
//! backends.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use crate::column::page::{PageReader, SerializedPageReader};
use crate::errors::Result;
use crate::file::footer;
use crate::file::metadata::{ParquetMetaData, RowGroupMetaData};

/// Anything with a known total byte length.
pub trait Length {
  fn len(&self) -> u64;
}

/// A positioned, random-access byte source. `get_read` hands back an independent,
/// range-limited `Read` so concurrent column readers over the same
/// underlying file don't contend on a shared cursor.
pub trait ChunkReader: Length + Send + Sync {
  type T: Read;

  fn get_read(&self, start: u64, length: usize) -> Result<Self::T>;

  fn get_bytes(&self, start: u64, length: usize) -> Result<crate::util::memory::ByteBufferPtr> {
    let mut buffer = Vec::with_capacity(length);
    let mut reader = self.get_read(start, length)?;
    reader.read_to_end(&mut buffer).map_err(|e| general_err!("{}", e))?;
    if buffer.len() != length {
      return Err(eof_err!("Expected to read {} bytes, got {}", length, buffer.len()));
    }
    Ok(crate::util::memory::ByteBufferPtr::new(buffer))
  }
}

impl Length for File {
  fn len(&self) -> u64 {
    self.metadata().map(|m| m.len()).unwrap_or(0)
  }
}

/// A `Read` bounded to `[start, start + length)` of a cloned file handle.
/// Every read re-seeks to its absolute position first, so instances created
/// from the same `File` can be used independently without coordinating a
/// shared cursor.
pub struct FileSource<R> {
  reader: R,
  start: u64,
  remaining: u64,
}

impl<R: Read + Seek> FileSource<R> {
  pub fn new(reader: R, start: u64, length: usize) -> Self {
    FileSource { reader, start, remaining: length as u64 }
  }
}

impl<R: Read + Seek> Read for FileSource<R> {
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    if self.remaining == 0 {
      return Ok(0);
    }
    self.reader.seek(SeekFrom::Start(self.start))?;
    let want = (buf.len() as u64).min(self.remaining) as usize;
    let n = self.reader.read(&mut buf[..want])?;
    self.start += n as u64;
    self.remaining -= n as u64;
    Ok(n)
  }
}

impl ChunkReader for File {
  type T = FileSource<File>;

  fn get_read(&self, start: u64, length: usize) -> Result<Self::T> {
    let clone = self.try_clone().map_err(|e| general_err!("Could not clone file handle: {}", e))?;
    Ok(FileSource::new(clone, start, length))
  }
}

/// In-memory byte source, mainly for tests and small files materialized
/// entirely in RAM.
impl Length for Vec<u8> {
  fn len(&self) -> u64 {
    Vec::len(self) as u64
  }
}

impl ChunkReader for Vec<u8> {
  type T = io::Cursor<Vec<u8>>;

  fn get_read(&self, start: u64, length: usize) -> Result<Self::T> {
    let start = start as usize;
    if start + length > self.len() as usize {
      return Err(eof_err!(
        "Requested range [{}, {}) exceeds buffer of length {}",
        start,
        start + length,
        self.len()
      ));
    }
    Ok(io::Cursor::new(self[start..start + length].to_vec()))
  }
}

/// Top-level handle over an opened Parquet file: its metadata and an
/// iterator-producing accessor for each row group.
pub trait FileReader {
  fn metadata(&self) -> &ParquetMetaData;

  fn num_row_groups(&self) -> usize;

  fn get_row_group(&self, i: usize) -> Result<Box<dyn RowGroupReader + '_>>;
}

/// One row group's column chunks.
pub trait RowGroupReader {
  fn metadata(&self) -> &RowGroupMetaData;

  fn num_columns(&self) -> usize;

  fn get_column_page_reader(&self, i: usize) -> Result<Box<dyn PageReader>>;
}

/// The crate's `FileReader`, backed by any `ChunkReader` (a `File`, or an
/// in-memory `Vec<u8>`). Opening parses the footer and, unless the caller
/// opted out via `ReadOptions`, the page-index sidecar.
pub struct SerializedFileReader<R: ChunkReader> {
  chunk_reader: Arc<R>,
  metadata: Arc<ParquetMetaData>,
}

impl<R: 'static + ChunkReader> SerializedFileReader<R> {
  pub fn new(chunk_reader: R) -> Result<Self> {
    Self::new_with_options(chunk_reader, footer::ReadOptions::default())
  }

  pub fn new_with_options(chunk_reader: R, options: footer::ReadOptions) -> Result<Self> {
    let metadata = footer::parse_metadata_with_options(&chunk_reader, &options)?;
    Ok(Self { chunk_reader: Arc::new(chunk_reader), metadata: Arc::new(metadata) })
  }
}

impl<R: 'static + ChunkReader> FileReader for SerializedFileReader<R> {
  fn metadata(&self) -> &ParquetMetaData {
    &self.metadata
  }

  fn num_row_groups(&self) -> usize {
    self.metadata.num_row_groups()
  }

  fn get_row_group(&self, i: usize) -> Result<Box<dyn RowGroupReader + '_>> {
    let row_group_metadata = self.metadata.row_group(i);
    Ok(Box::new(SerializedRowGroupReader::new(self.chunk_reader.clone(), row_group_metadata)))
  }
}

/// A single row group's columns, each producing a `PageReader` lazily so
/// unread columns never pay for an I/O round trip.
pub struct SerializedRowGroupReader<'a, R: ChunkReader> {
  chunk_reader: Arc<R>,
  metadata: &'a RowGroupMetaData,
}

impl<'a, R: ChunkReader> SerializedRowGroupReader<'a, R> {
  pub fn new(chunk_reader: Arc<R>, metadata: &'a RowGroupMetaData) -> Self {
    SerializedRowGroupReader { chunk_reader, metadata }
  }
}

impl<'a, R: 'static + ChunkReader> RowGroupReader for SerializedRowGroupReader<'a, R> {
  fn metadata(&self) -> &RowGroupMetaData {
    self.metadata
  }

  fn num_columns(&self) -> usize {
    self.metadata.num_columns()
  }

  fn get_column_page_reader(&self, i: usize) -> Result<Box<dyn PageReader>> {
    let col = self.metadata.column(i);
    let (start, length) = col.byte_range();
    let chunk = self.chunk_reader.get_read(start, length as usize)?;
    Ok(Box::new(SerializedPageReader::new(chunk, col.num_values(), col.compression(), col.column_type())?))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_in_memory_chunk_reader_range() {
    let data: Vec<u8> = (0..16u8).collect();
    let got = data.get_bytes(4, 4).unwrap();
    assert_eq!(got.as_slice(), &[4, 5, 6, 7]);
  }

  #[test]
  fn test_in_memory_chunk_reader_out_of_range() {
    let data: Vec<u8> = (0..4u8).collect();
    assert!(data.get_bytes(0, 8).is_err());
  }
}
