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

use std::{cell, io, result, str};

use quick_error::quick_error;

quick_error! {
  /// Set of errors that can be produced during Parquet's IO, encoding/decoding,
  /// schema, or composition operations.
  ///
  /// The taxonomy follows four buckets: format errors (fatal for the file),
  /// type/schema errors (fatal for the operation), I/O errors (propagated
  /// verbatim), and resource errors (recoverable by the caller).
  #[derive(Debug)]
  pub enum ParquetError {
    /// General Parquet error, e.g. IO, file format issues, checksum failures.
    General(message: String) {
      display("Parquet error: {}", message)
      from(e: str::Utf8Error) -> (format!("underlying Utf8 error: {:?}", e))
      from(e: cell::BorrowMutError) -> (format!("underlying borrow-mut error: {:?}", e))
    }
    /// "Not yet implemented" error: functionality is not yet implemented
    NYI(message: String) {
      display("NYI: {}", message)
    }
    /// Error when an operation reached end-of-stream unexpectedly, e.g. a page
    /// or column chunk ran out of bytes before decoding finished.
    Eof(message: String) {
      display("Eof: {}", message)
    }
    /// Underlying IO error.
    Io(message: String) {
      display("IO error: {}", message)
      from(e: io::Error) -> (format!("{}", e))
    }
    /// The first four bytes of the file are not the `PAR1` magic.
    InvalidHeader(message: String) {
      display("Invalid header: {}", message)
    }
    /// The last four bytes of the file are not the `PAR1` magic, or the
    /// declared footer length does not fit within the file.
    InvalidFooter(message: String) {
      display("Invalid footer: {}", message)
    }
    /// The footer's Thrift-encoded `FileMetaData` could not be decoded.
    FooterDecode(message: String) {
      display("Could not decode footer: {}", message)
    }
    /// A file's flattened schema list was empty.
    MissingRootColumn(message: String) {
      display("Missing root column: {}", message)
    }
    /// The column/offset index sidecar could not be decoded; callers may
    /// still read the file without page-level statistics.
    PageIndexDecode(message: String) {
      display("Could not decode page index: {}", message)
    }
    /// A page's declared offset/length places it outside its column chunk.
    PageIndexOutOfRange(message: String) {
      display("Page index out of range: {}", message)
    }
    /// A page header declared a page type that is not valid in context (for
    /// example, a dictionary page that is not the first page of the chunk).
    UnexpectedPageType(message: String) {
      display("Unexpected page type: {}", message)
    }
    /// Two schemas being merged or converted between are not compatible and
    /// cannot be reconciled.
    SchemaMismatch(message: String) {
      display("Schema mismatch: {}", message)
    }
    /// A requested schema conversion (type coercion) is not supported.
    ConvertNotSupported(message: String) {
      display("Conversion not supported: {}", message)
    }
    /// Row groups being merged in sorted mode do not all carry the required
    /// sorting-columns prefix.
    SortingColumnsMismatch(message: String) {
      display("Sorting columns mismatch: {}", message)
    }
    /// Wire-format corruption: CRC mismatch, truncated page payload, etc.
    Corrupted(message: String) {
      display("Corrupted: {}", message)
    }
    /// A caller-supplied buffer was too small to hold a requested batch of
    /// values or levels.
    BufferTooSmall(message: String) {
      display("Buffer too small: {}", message)
    }
    /// Programmer error: an invariant the API promises was violated by the
    /// caller (e.g. dictionary lookup out of range, seeking backward on a
    /// non-seekable reader). These terminate the operation loudly.
    IndexOutOfBounds(index: usize, bound: usize) {
      display("Index {} out of bound: {}", index, bound)
    }
    /// Attempted to seek backward on a reader that does not support it (e.g.
    /// the sorted-merge row reader).
    SeekBackward(message: String) {
      display("Cannot seek backward: {}", message)
    }
  }
}

impl From<thrift::Error> for ParquetError {
  fn from(e: thrift::Error) -> ParquetError {
    ParquetError::General(format!("Thrift error: {}", e))
  }
}

/// A specialized `Result` for Parquet errors.
pub type Result<T> = result::Result<T, ParquetError>;
