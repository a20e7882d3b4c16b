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

//! Random value generation shared by the test modules scattered across the
//! crate (`encodings::decoding`, `encodings::encoding`, `column::writer`,
//! `record::shred`, ...). Specialization via a blanket `default impl
//! RandGen<T> for T` never stabilized on stable Rust, so each concrete
//! `DataType` gets its own explicit `RandGen` impl, generated by the same
//! macro idiom used in `data_type.rs`.

use rand::distributions::{Distribution, Standard};
use rand::{thread_rng, Rng};

use crate::data_type::*;

pub trait RandGen<T: DataType> {
  fn gen(len: i32) -> T::T;

  fn gen_vec(len: i32, total: usize) -> Vec<T::T> {
    let mut result = Vec::with_capacity(total);
    for _ in 0..total {
      result.push(Self::gen(len));
    }
    result
  }
}

macro_rules! make_rand_gen {
  ($ty:ty) => {
    impl RandGen<$ty> for $ty {
      fn gen(_len: i32) -> <$ty as DataType>::T {
        thread_rng().gen::<<$ty as DataType>::T>()
      }
    }
  };
}

make_rand_gen!(BoolType);
make_rand_gen!(Int32Type);
make_rand_gen!(Int64Type);
make_rand_gen!(FloatType);
make_rand_gen!(DoubleType);

impl RandGen<Int96Type> for Int96Type {
  fn gen(_len: i32) -> Int96 {
    let mut rng = thread_rng();
    Int96::new(rng.gen::<u32>(), rng.gen::<u32>(), rng.gen::<u32>())
  }
}

impl RandGen<ByteArrayType> for ByteArrayType {
  fn gen(len: i32) -> ByteArray {
    let mut rng = thread_rng();
    let value_len = if len < 0 { rng.gen_range(0..128) } else { len as usize };
    ByteArray::from(random_bytes(value_len))
  }
}

impl RandGen<FixedLenByteArrayType> for FixedLenByteArrayType {
  fn gen(len: i32) -> ByteArray {
    let mut rng = thread_rng();
    let value_len = if len < 0 { rng.gen_range(0..128) } else { len as usize };
    ByteArray::from(random_bytes(value_len))
  }
}

pub fn random_bytes(n: usize) -> Vec<u8> {
  let mut result = vec![0u8; n];
  thread_rng().fill(&mut result[..]);
  result
}

pub fn random_bools(n: usize) -> Vec<bool> {
  let mut rng = thread_rng();
  (0..n).map(|_| rng.gen::<bool>()).collect()
}

pub fn random_numbers<T>(n: usize) -> Vec<T>
where
  Standard: Distribution<T>,
{
  let mut rng = thread_rng();
  (0..n).map(|_| rng.gen::<T>()).collect()
}

pub fn random_numbers_range<T>(n: usize, low: T, high: T, result: &mut Vec<T>)
where
  T: rand::distributions::uniform::SampleUniform + PartialOrd + Copy,
{
  let mut rng = thread_rng();
  for _ in 0..n {
    result.push(rng.gen_range(low..high));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_random_bytes_len() {
    assert_eq!(random_bytes(10).len(), 10);
  }

  #[test]
  fn test_rand_gen_vec() {
    let v = Int32Type::gen_vec(-1, 5);
    assert_eq!(v.len(), 5);
  }

  #[test]
  fn test_rand_gen_fixed_len() {
    let v = FixedLenByteArrayType::gen(8);
    assert_eq!(v.len(), 8);
  }
}
