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

//! A low-level engine for reading and writing the Apache Parquet columnar
//! file format: footer/schema parsing, page-level encoding and decoding
//! (including Dremel repetition/definition levels), row-group and
//! column-chunk I/O, schema conversion, and row-group merging.
//!
//! Layout: `basic`/`data_type` for the physical type system,
//! `schema` for the node tree and column descriptors, `encodings` for the
//! per-physical-type codecs, `column`/`file` for the row-group engine, and
//! `record`/`merge` for the composition operators on top.

#[macro_use]
mod macros;

pub mod basic;
pub mod column;
pub mod compression;
pub mod data_type;
pub mod dictionary;
pub mod encodings;
pub mod errors;
pub mod file;
pub mod merge;
pub mod record;
pub mod schema;
pub mod util;

pub use errors::{ParquetError, Result};
