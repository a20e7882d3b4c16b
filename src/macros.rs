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

/// Builds a `ParquetError::General` and returns it wrapped in `Err`.
macro_rules! general_err {
  ($fmt:expr) => ($crate::errors::ParquetError::General($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) => ($crate::errors::ParquetError::General(format!($fmt, $($args),*)));
}

/// Builds a `ParquetError::NYI` ("not yet implemented") and returns it wrapped in `Err`.
macro_rules! nyi_err {
  ($fmt:expr) => ($crate::errors::ParquetError::NYI($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) => ($crate::errors::ParquetError::NYI(format!($fmt, $($args),*)));
}

/// Builds a `ParquetError::Eof` and returns it wrapped in `Err`.
macro_rules! eof_err {
  ($fmt:expr) => ($crate::errors::ParquetError::Eof($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) => ($crate::errors::ParquetError::Eof(format!($fmt, $($args),*)));
}

/// Reads `$size` bytes from `$src`, starting at the current position, and interprets them
/// as `$ty` in little-endian order. `$src` must be a byte slice.
macro_rules! read_num_bytes {
  ($ty:ty, $size:expr, $src:expr) => {{
    assert!($size <= $src.len());
    let mut buf = [0u8; ::std::mem::size_of::<$ty>()];
    buf[..$size].copy_from_slice(&$src[..$size]);
    <$ty>::from_le_bytes(buf)
  }};
}
