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

//! The hash function backing `DictEncoder`'s open-addressed hash table.
//! Any fixed-quality 64-bit hash works here since the table only needs a
//! good-enough bucket distribution, not a cryptographic guarantee; this is
//! a 64-bit MurmurHash2 variant, the same family of hash the wider Parquet
//! ecosystem (parquet-cpp, arrow-rs) uses for dictionary hashing.

use crate::data_type::AsBytes;

const M: u64 = 0xc6a4a7935bd1e995;
const R: u32 = 47;

/// Hashes the little-endian byte representation of `value`, salted with
/// `seed`. `seed` lets `DictEncoder::double_table_size` rehash with the same
/// function used for the original insert.
pub fn hash<T: AsBytes + ?Sized>(value: &T, seed: u32) -> u64 {
  murmur2_64a(&value.as_bytes(), seed as u64)
}

fn murmur2_64a(data: &[u8], seed: u64) -> u64 {
  let mut h: u64 = seed ^ (data.len() as u64).wrapping_mul(M);

  let n = data.len() / 8;
  for i in 0..n {
    let mut k = u64::from_le_bytes(data[i * 8..i * 8 + 8].try_into().unwrap());
    k = k.wrapping_mul(M);
    k ^= k >> R;
    k = k.wrapping_mul(M);

    h ^= k;
    h = h.wrapping_mul(M);
  }

  let tail = &data[n * 8..];
  if !tail.is_empty() {
    let mut buf = [0u8; 8];
    buf[..tail.len()].copy_from_slice(tail);
    let k = u64::from_le_bytes(buf);
    h ^= k;
    h = h.wrapping_mul(M);
  }

  h ^= h >> R;
  h = h.wrapping_mul(M);
  h ^= h >> R;
  h
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_hash_deterministic() {
    let a = hash(&42i32, 0);
    let b = hash(&42i32, 0);
    assert_eq!(a, b);
  }

  #[test]
  fn test_hash_seed_changes_value() {
    let a = hash(&42i32, 0);
    let b = hash(&42i32, 1);
    assert_ne!(a, b);
  }

  #[test]
  fn test_hash_distinguishes_values() {
    let a = hash(&1i64, 0);
    let b = hash(&2i64, 0);
    assert_ne!(a, b);
  }
}
