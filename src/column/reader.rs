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

//! Drives a `PageReader` into typed values, weaving the level streams back
//! into the physical value stream. A dictionary page, if present, is
//! always the first page of the chunk and is installed once; every later
//! `RLE_DICTIONARY` data page decodes against it.

use std::collections::HashMap;

use crate::basic::Encoding;
use crate::column::page::{Page, PageReader};
use crate::data_type::{DataType, Value};
use crate::encodings::decoding::{get_decoder, Decoder, DictDecoder, PlainDecoder};
use crate::encodings::levels::LevelDecoder;
use crate::errors::Result;
use crate::schema::types::ColumnDescPtr;

/// Normalizes the deprecated `PLAIN_DICTIONARY` alias onto the same decoder
/// slot as `RLE_DICTIONARY`, since both name the same on-wire index stream.
fn dict_slot(encoding: Encoding) -> Encoding {
  match encoding {
    Encoding::PLAIN_DICTIONARY => Encoding::RLE_DICTIONARY,
    other => other,
  }
}

/// One column chunk's value stream, yielding values a batch at a time.
/// Wraps a `PageReader`, transparently advancing to the next page (and
/// installing a dictionary, if the chunk has one) whenever the current
/// page is exhausted.
pub struct ColumnReader<T: DataType> {
  descr: ColumnDescPtr,
  column_index: usize,
  page_reader: Box<dyn PageReader>,
  decoders: HashMap<Encoding, Box<dyn Decoder<T>>>,
  current_encoding: Option<Encoding>,
  def_level_decoder: Option<LevelDecoder>,
  rep_level_decoder: Option<LevelDecoder>,
  num_buffered_values: usize,
  num_decoded_values: usize,
}

impl<T: DataType> ColumnReader<T> {
  pub fn new(descr: ColumnDescPtr, column_index: usize, page_reader: Box<dyn PageReader>) -> Self {
    ColumnReader {
      descr,
      column_index,
      page_reader,
      decoders: HashMap::new(),
      current_encoding: None,
      def_level_decoder: None,
      rep_level_decoder: None,
      num_buffered_values: 0,
      num_decoded_values: 0,
    }
  }

  fn max_rep_level(&self) -> i16 {
    self.descr.max_rep_level()
  }

  fn max_def_level(&self) -> i16 {
    self.descr.max_def_level()
  }

  /// Advances past pages with no remaining values (and an initial
  /// dictionary page, if any) until a data page is current, or the chunk
  /// is exhausted.
  fn read_new_page(&mut self) -> Result<bool> {
    loop {
      match self.page_reader.get_next_page()? {
        None => return Ok(false),
        Some(Page::DictionaryPage { buf, num_values, encoding: _, is_sorted: _ }) => {
          let mut plain = PlainDecoder::<T>::new(self.descr.clone());
          plain.set_data(buf, num_values as usize)?;
          let mut dict = DictDecoder::<T>::new();
          dict.set_dict(Box::new(plain))?;
          self.decoders.insert(Encoding::RLE_DICTIONARY, Box::new(dict));
        }
        Some(Page::DataPage { buf, num_values, encoding, def_level_encoding, rep_level_encoding, statistics: _ }) => {
          let mut offset = 0usize;

          self.rep_level_decoder = if self.max_rep_level() > 0 {
            let mut decoder = LevelDecoder::new(rep_level_encoding, self.max_rep_level());
            offset += decoder.set_data(num_values as usize, buf.start_from(offset));
            Some(decoder)
          } else {
            None
          };

          self.def_level_decoder = if self.max_def_level() > 0 {
            let mut decoder = LevelDecoder::new(def_level_encoding, self.max_def_level());
            offset += decoder.set_data(num_values as usize, buf.start_from(offset));
            Some(decoder)
          } else {
            None
          };

          self.set_current_decoder(encoding, buf.start_from(offset), num_values as usize)?;
          self.num_buffered_values = num_values as usize;
          self.num_decoded_values = 0;
          return Ok(true);
        }
        Some(Page::DataPageV2 {
          buf,
          num_values,
          encoding,
          num_nulls: _,
          num_rows: _,
          def_levels_byte_len,
          rep_levels_byte_len,
          is_compressed: _,
          statistics: _,
        }) => {
          let mut offset = 0usize;

          self.rep_level_decoder = if self.max_rep_level() > 0 {
            let mut decoder = LevelDecoder::new(Encoding::RLE, self.max_rep_level());
            decoder.set_data_range(num_values as usize, &buf, offset, rep_levels_byte_len as usize);
            offset += rep_levels_byte_len as usize;
            Some(decoder)
          } else {
            None
          };

          self.def_level_decoder = if self.max_def_level() > 0 {
            let mut decoder = LevelDecoder::new(Encoding::RLE, self.max_def_level());
            decoder.set_data_range(num_values as usize, &buf, offset, def_levels_byte_len as usize);
            offset += def_levels_byte_len as usize;
            Some(decoder)
          } else {
            None
          };

          self.set_current_decoder(encoding, buf.start_from(offset), num_values as usize)?;
          self.num_buffered_values = num_values as usize;
          self.num_decoded_values = 0;
          return Ok(true);
        }
      }
    }
  }

  fn set_current_decoder(
    &mut self,
    encoding: Encoding,
    data: crate::util::memory::ByteBufferPtr,
    num_values: usize,
  ) -> Result<()> {
    let slot = dict_slot(encoding);
    self.current_encoding = Some(slot);
    if !self.decoders.contains_key(&slot) {
      let decoder = get_decoder::<T>(self.descr.clone(), slot)?;
      self.decoders.insert(slot, decoder);
    }
    let decoder = self.decoders.get_mut(&slot).expect("decoder just inserted");
    decoder.set_data(data, num_values)
  }

  /// Reads up to `def_levels.len()`/`rep_levels.len()`/`values.len()` worth
  /// of data (all three must have equal length, one slot per physical
  /// record slot including nulls), returning `(values_read, levels_read)`.
  ///
  /// `values` is filled right-to-left: values decoded from the page fill the
  /// non-null slots from the end backward, so an earlier slot is never
  /// overwritten before it has been consumed.
  pub fn read_batch(
    &mut self,
    batch_size: usize,
    mut def_levels: Option<&mut [i16]>,
    mut rep_levels: Option<&mut [i16]>,
    values: &mut [T::T],
  ) -> Result<(usize, usize)> {
    let mut total_values = 0usize;
    let mut total_levels = 0usize;
    let mut remaining = batch_size;

    while remaining > 0 {
      if self.num_decoded_values >= self.num_buffered_values && !self.read_new_page()? {
        break;
      }

      let page_remaining = self.num_buffered_values - self.num_decoded_values;
      let want = std::cmp::min(remaining, page_remaining);

      let def_slice = def_levels.as_deref_mut().map(|d| &mut d[total_levels..total_levels + want]);
      let rep_slice = rep_levels.as_deref_mut().map(|d| &mut d[total_levels..total_levels + want]);
      let value_slice = &mut values[total_values..];

      let (values_read, levels_read) = self.read_page_batch(want, def_slice, rep_slice, value_slice)?;

      self.num_decoded_values += levels_read;
      total_values += values_read;
      total_levels += levels_read;
      remaining -= levels_read;

      if levels_read < want {
        // page exhausted mid-batch; loop back around to pull the next one
        continue;
      }
    }

    Ok((total_values, total_levels))
  }

  fn read_page_batch(
    &mut self,
    want: usize,
    def_levels: Option<&mut [i16]>,
    rep_levels: Option<&mut [i16]>,
    values: &mut [T::T],
  ) -> Result<(usize, usize)> {
    let num_rep_levels = match (&mut self.rep_level_decoder, rep_levels) {
      (Some(decoder), Some(buf)) => decoder.get(&mut buf[..want])?,
      _ => want,
    };

    let max_def = self.max_def_level();
    let (num_def_levels, def_levels_read);
    match (&mut self.def_level_decoder, def_levels) {
      (Some(decoder), Some(buf)) => {
        let n = decoder.get(&mut buf[..want])?;
        num_def_levels = n;
        def_levels_read = Some(buf[..n].to_vec());
      }
      (Some(decoder), None) => {
        let mut scratch = vec![0i16; want];
        let n = decoder.get(&mut scratch)?;
        num_def_levels = n;
        scratch.truncate(n);
        def_levels_read = Some(scratch);
      }
      (None, _) => {
        num_def_levels = want;
        def_levels_read = None;
      }
    }

    let num_levels = std::cmp::min(num_rep_levels, num_def_levels);

    // Counts non-null slots directly against whichever buffer the levels were
    // just decoded into, whether caller-supplied or internal scratch — the
    // two arms above must agree on this or the value decoder is asked to
    // produce too many or too few values for the physical page.
    let values_to_read = if max_def > 0 {
      match &def_levels_read {
        Some(levels) => levels[..num_levels].iter().filter(|&&l| l == max_def).count(),
        None => num_levels,
      }
    } else {
      num_levels
    };

    let encoding = self.current_encoding.expect("a data page must be current");
    let decoder = self.decoders.get_mut(&encoding).expect("current decoder must be installed");
    let values_read = decoder.get(&mut values[..values_to_read])?;

    Ok((values_read, num_levels))
  }
}

/// Wraps `ColumnReader::read_batch` to produce tagged `Value`s directly, for
/// callers (record assembly) that want rep/def levels attached rather than
/// parallel arrays.
pub fn read_tagged_batch<T: DataType>(reader: &mut ColumnReader<T>, batch_size: usize) -> Result<Vec<Value<T::T>>> {
  let max_def = reader.max_def_level();
  let max_rep = reader.max_rep_level();
  let column_index = reader.column_index;

  let mut def_levels = vec![0i16; batch_size];
  let mut rep_levels = vec![0i16; batch_size];
  let mut values = vec![T::T::default(); batch_size];

  let def_arg = if max_def > 0 { Some(def_levels.as_mut_slice()) } else { None };
  let rep_arg = if max_rep > 0 { Some(rep_levels.as_mut_slice()) } else { None };

  let (_, num_levels) = reader.read_batch(batch_size, def_arg, rep_arg, &mut values)?;

  let mut out = Vec::with_capacity(num_levels);
  let mut value_pos = 0usize;
  for i in 0..num_levels {
    let def = if max_def > 0 { def_levels[i] } else { 0 };
    let rep = if max_rep > 0 { rep_levels[i] } else { 0 };
    if max_def == 0 || def == max_def {
      out.push(Value::new(Some(values[value_pos].clone()), rep, def, column_index));
      value_pos += 1;
    } else {
      out.push(Value::new(None, rep, def, column_index));
    }
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::Compression;
  use crate::basic::Type as PhysicalType;
  use crate::column::page::SerializedPageReader;
  use crate::data_type::Int32Type;
  use crate::schema::types::{GroupTypeBuilder, PrimitiveTypeBuilder, SchemaDescriptor};
  use std::io::Cursor;
  use std::sync::Arc;
  use thrift::protocol::TCompactOutputProtocol;

  fn required_int32_descr() -> ColumnDescPtr {
    let leaf = PrimitiveTypeBuilder::new("value", PhysicalType::INT32).build().unwrap();
    let root = GroupTypeBuilder::new("schema").with_fields(vec![Arc::new(leaf)]).build();
    let schema = SchemaDescriptor::new(Arc::new(root));
    schema.column(0).clone()
  }

  fn encode_plain_data_page(values: &[i32]) -> Vec<u8> {
    use parquet_format as parquet;
    let mut payload = Vec::new();
    for v in values {
      payload.extend_from_slice(&v.to_le_bytes());
    }
    let header = parquet::PageHeader {
      type_: parquet::PageType::DataPage,
      uncompressed_page_size: payload.len() as i32,
      compressed_page_size: payload.len() as i32,
      crc: None,
      data_page_header: Some(parquet::DataPageHeader {
        num_values: values.len() as i32,
        encoding: parquet::Encoding::PLAIN,
        definition_level_encoding: parquet::Encoding::RLE,
        repetition_level_encoding: parquet::Encoding::RLE,
        statistics: None,
      }),
      index_page_header: None,
      dictionary_page_header: None,
      data_page_header_v2: None,
    };
    let mut out = Vec::new();
    {
      let mut prot = TCompactOutputProtocol::new(&mut out);
      header.write_to_out_protocol(&mut prot).unwrap();
    }
    out.extend_from_slice(&payload);
    out
  }

  #[test]
  fn test_reads_required_column_no_levels() {
    let descr = required_int32_descr();
    let bytes = encode_plain_data_page(&[1, 2, 3, 4]);
    let page_reader =
      SerializedPageReader::new(Cursor::new(bytes), 4, Compression::UNCOMPRESSED, PhysicalType::INT32).unwrap();
    let mut reader: ColumnReader<Int32Type> = ColumnReader::new(descr, 0, Box::new(page_reader));
    let mut values = vec![0i32; 4];
    let (values_read, levels_read) = reader.read_batch(4, None, None, &mut values).unwrap();
    assert_eq!(values_read, 4);
    assert_eq!(levels_read, 4);
    assert_eq!(values, vec![1, 2, 3, 4]);
  }
}
