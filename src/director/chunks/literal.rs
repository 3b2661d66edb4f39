use binary_reader::BinaryReader;
use log::{debug, error};
use num_derive::FromPrimitive;

use crate::io::reader::DirectorExt;

pub struct LiteralStoreRecord {
  pub literal_type: LiteralType,
  pub offset: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
  String(String),
  Int(i32),
  Float(f64),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
pub enum LiteralType {
  String = 1,
  Int = 4,
  Float = 9,
}

/// Constant table of a script together with the record width it was stored with.
pub struct LiteralStore {
  pub literals: Vec<Literal>,
  pub bytes_per_constant: usize,
}

impl LiteralStore {
  pub fn from_reader(
    reader: &mut BinaryReader,
    count: usize,
    records_offset: usize,
    data_offset: usize,
  ) -> Result<LiteralStore, String> {
    let mut bytes_per_constant = 6;
    let mut literals = Vec::with_capacity(count);
    let mut pos = records_offset;

    for i in 0..count {
      reader.jmp(pos);
      let record = Self::read_record(reader, &mut bytes_per_constant)?;
      pos = reader.pos;

      let literal = Self::read_data(reader, &record, data_offset)?;
      debug!("constants[{}] = {}", i, literal.to_source());
      literals.push(literal);
    }

    Ok(LiteralStore { literals, bytes_per_constant })
  }

  /// Records start out as a 2-byte type and a 4-byte offset. A zero type marks the
  /// wide layout, after which every type is read as 4 bytes.
  pub fn read_record(
    reader: &mut BinaryReader,
    bytes_per_constant: &mut usize,
  ) -> Result<LiteralStoreRecord, String> {
    let read_err = |e: std::io::Error| format!("truncated constant record: {}", e);
    let raw_type = if *bytes_per_constant == 8 {
      reader.read_i32().map_err(read_err)?
    } else {
      let mut raw_type = reader.read_i16().map_err(read_err)? as i32;
      if raw_type == 0 {
        raw_type = reader.read_i16().map_err(read_err)? as i32;
        *bytes_per_constant = 8;
      }
      raw_type
    };
    let offset = reader.read_i32().map_err(read_err)?;

    let literal_type: LiteralType = match num::FromPrimitive::from_i32(raw_type) {
      Some(literal_type) => literal_type,
      None => {
        error!("Unknown constant type: {}", raw_type);
        return Err("Unknown constant type!".to_owned());
      }
    };
    Ok(LiteralStoreRecord {
      literal_type,
      offset: offset as usize,
    })
  }

  pub fn read_data(
    reader: &mut BinaryReader,
    record: &LiteralStoreRecord,
    start_offset: usize,
  ) -> Result<Literal, String> {
    let read_err = |e: std::io::Error| format!("truncated constant data: {}", e);
    match record.literal_type {
      LiteralType::Int => Ok(Literal::Int(record.offset as i32)),
      LiteralType::String => {
        reader.jmp(start_offset + record.offset);
        let length = reader.read_i32().map_err(read_err)?;
        let value = reader.read_string((length - 1).max(0) as usize).map_err(read_err)?;
        Ok(Literal::String(value))
      }
      LiteralType::Float => {
        reader.jmp(start_offset + record.offset);
        let _length = reader.read_i32().map_err(read_err)?;
        let value = reader.read_apple_float_80().map_err(read_err)?;
        Ok(Literal::Float(value))
      }
    }
  }
}

impl Literal {
  /// Source form shared by both generators: quoted strings, decimal integers and
  /// shortest round-trip floats.
  pub fn to_source(&self) -> String {
    match self {
      Literal::String(value) => escape_string(value),
      Literal::Int(value) => value.to_string(),
      Literal::Float(value) => format_float(*value),
    }
  }
}

pub fn escape_string(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      '\t' => out.push_str("\\t"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      c if (c as u32) < 0x20 || (0x7f..=0xff).contains(&(c as u32)) => {
        out.push_str(&format!("\\x{:02x}", c as u32));
      }
      c => out.push(c),
    }
  }
  out.push('"');
  out
}

/// Shortest representation that round-trips, positional between 1e-4 and 1e16.
pub fn format_float(value: f64) -> String {
  if value.is_nan() {
    return "nan".to_owned();
  }
  if value.is_infinite() {
    return if value > 0.0 { "inf".to_owned() } else { "-inf".to_owned() };
  }

  let scientific = format!("{:e}", value);
  let (mantissa, exponent) = match scientific.split_once('e') {
    Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
    None => (scientific.as_str(), 0),
  };

  if (-4..16).contains(&exponent) {
    let positional = value.to_string();
    if positional.contains('.') {
      positional
    } else {
      positional + ".0"
    }
  } else {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
  }
}
