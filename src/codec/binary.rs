//! Binary serialization of ledger JSON
//!
//! Transactions travel as serialized objects: each field is a field ID
//! followed by its value, fields sorted by `(type code, nth)`. Nested
//! objects end with `0xE1` and arrays with `0xF1`; the top-level object has
//! no end marker.

use crate::codec::definitions::{
    field_by_code, field_by_name, permission_code, permission_name, transaction_type_code,
    transaction_type_name, FieldDef, FieldType, ARRAY_END_MARKER, OBJECT_END_MARKER,
};
use crate::crypto::{decode_address, encode_account_id, KeyError};
use serde_json::{Map, Value};
use thiserror::Error;

/// Codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Blob is not valid hex")]
    InvalidHex,
    #[error("Transaction is not signed")]
    Unsigned,
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("Unexpected end of data")]
    UnexpectedEnd,
}

fn invalid(def: &FieldDef, reason: impl Into<String>) -> CodecError {
    CodecError::InvalidValue {
        field: def.name.to_string(),
        reason: reason.into(),
    }
}

const NOT_NATIVE_BIT: u64 = 0x8000_0000_0000_0000;
const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;
const MPT_BIT: u8 = 0x20;
const MAX_DROPS: u64 = 100_000_000_000_000_000;

const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
const MIN_EXPONENT: i32 = -96;
const MAX_EXPONENT: i32 = 80;
const EXPONENT_BIAS: i32 = 97;
const MANTISSA_MASK: u64 = (1 << 54) - 1;

// =============================================================================
// Serializer
// =============================================================================

/// Serialize a JSON object's fields in canonical order.
///
/// With `signing_only`, fields no signature covers are left out at this
/// level.
pub fn serialize_object(
    object: &Map<String, Value>,
    signing_only: bool,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let mut fields = Vec::with_capacity(object.len());
    for (name, value) in object {
        let def = field_by_name(name).ok_or_else(|| CodecError::UnknownField(name.clone()))?;
        if signing_only && !def.signing {
            continue;
        }
        fields.push((def, value));
    }
    fields.sort_by_key(|(def, _)| def.ordinal());

    for (def, value) in fields {
        out.extend(def.header());
        write_value(def, value, out)?;
    }
    Ok(())
}

fn write_value(def: &FieldDef, value: &Value, out: &mut Vec<u8>) -> Result<(), CodecError> {
    match def.field_type {
        FieldType::UInt16 => {
            let code = match value {
                Value::String(name) if def.name == "TransactionType" => {
                    transaction_type_code(name)
                        .ok_or_else(|| invalid(def, format!("unknown type {}", name)))?
                }
                _ => {
                    let n = as_u64(def, value)?;
                    u16::try_from(n).map_err(|_| invalid(def, "out of range"))?
                }
            };
            out.extend(code.to_be_bytes());
        }
        FieldType::UInt32 => {
            let n = match value {
                Value::String(name) if def.name == "PermissionValue" => permission_code(name)
                    .ok_or_else(|| invalid(def, format!("unknown permission {}", name)))?,
                _ => {
                    let n = as_u64(def, value)?;
                    u32::try_from(n).map_err(|_| invalid(def, "out of range"))?
                }
            };
            out.extend(n.to_be_bytes());
        }
        FieldType::Hash192 => out.extend(fixed_hex(def, value, 24)?),
        FieldType::Hash256 => out.extend(fixed_hex(def, value, 32)?),
        FieldType::Amount => write_amount(def, value, out)?,
        FieldType::Blob => {
            let text = as_str(def, value)?;
            let bytes = hex::decode(text).map_err(|_| invalid(def, "not hex"))?;
            write_length_prefixed(def, &bytes, out)?;
        }
        FieldType::AccountId => {
            let account_id = decode_address(as_str(def, value)?)?;
            write_length_prefixed(def, &account_id, out)?;
        }
        FieldType::StObject => {
            let object = value.as_object().ok_or_else(|| invalid(def, "not an object"))?;
            serialize_object(object, false, out)?;
            out.push(OBJECT_END_MARKER);
        }
        FieldType::StArray => {
            let items = value.as_array().ok_or_else(|| invalid(def, "not an array"))?;
            for item in items {
                let wrapper = item
                    .as_object()
                    .filter(|o| o.len() == 1)
                    .ok_or_else(|| invalid(def, "array items wrap exactly one object"))?;
                serialize_object(wrapper, false, out)?;
            }
            out.push(ARRAY_END_MARKER);
        }
        FieldType::Issue => {
            let object = value.as_object().ok_or_else(|| invalid(def, "not an object"))?;
            let currency = object
                .get("currency")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid(def, "missing currency"))?;
            let code = currency_bytes(def, currency)?;
            out.extend(code);
            if code != [0u8; 20] {
                let issuer = object
                    .get("issuer")
                    .and_then(Value::as_str)
                    .ok_or_else(|| invalid(def, "missing issuer"))?;
                out.extend(decode_address(issuer)?);
            }
        }
    }
    Ok(())
}

fn as_u64(def: &FieldDef, value: &Value) -> Result<u64, CodecError> {
    value.as_u64().ok_or_else(|| invalid(def, "not an unsigned integer"))
}

fn as_str<'a>(def: &FieldDef, value: &'a Value) -> Result<&'a str, CodecError> {
    value.as_str().ok_or_else(|| invalid(def, "not a string"))
}

fn fixed_hex(def: &FieldDef, value: &Value, len: usize) -> Result<Vec<u8>, CodecError> {
    let bytes = hex::decode(as_str(def, value)?).map_err(|_| invalid(def, "not hex"))?;
    if bytes.len() != len {
        return Err(invalid(def, format!("expected {} bytes", len)));
    }
    Ok(bytes)
}

fn write_length_prefixed(
    def: &FieldDef,
    bytes: &[u8],
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let len = bytes.len();
    if len <= 192 {
        out.push(len as u8);
    } else if len <= 12_480 {
        let rest = len - 193;
        out.push(193 + (rest >> 8) as u8);
        out.push((rest & 0xFF) as u8);
    } else if len <= 918_744 {
        let rest = len - 12_481;
        out.push(241 + (rest >> 16) as u8);
        out.push(((rest >> 8) & 0xFF) as u8);
        out.push((rest & 0xFF) as u8);
    } else {
        return Err(invalid(def, "too long"));
    }
    out.extend_from_slice(bytes);
    Ok(())
}

// =============================================================================
// Amounts
// =============================================================================

fn write_amount(def: &FieldDef, value: &Value, out: &mut Vec<u8>) -> Result<(), CodecError> {
    match value {
        Value::String(drops) => {
            let drops: u64 = drops.parse().map_err(|_| invalid(def, "bad drops"))?;
            if drops > MAX_DROPS {
                return Err(invalid(def, "more drops than exist"));
            }
            out.extend((drops | POSITIVE_BIT).to_be_bytes());
        }
        Value::Object(object) if object.contains_key("mpt_issuance_id") => {
            let text = object
                .get("value")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid(def, "missing value"))?;
            let amount: u64 = text.parse().map_err(|_| invalid(def, "bad MPT value"))?;
            if amount > i64::MAX as u64 {
                return Err(invalid(def, "MPT value too large"));
            }
            let issuance = object
                .get("mpt_issuance_id")
                .cloned()
                .unwrap_or(Value::Null);
            out.push(MPT_BIT | 0x40);
            out.extend(amount.to_be_bytes());
            out.extend(fixed_hex(def, &issuance, 24)?);
        }
        Value::Object(object) => {
            let field = |key: &str| {
                object
                    .get(key)
                    .and_then(Value::as_str)
                    .ok_or_else(|| invalid(def, format!("missing {}", key)))
            };
            let currency = field("currency")?;
            if currency == "XRP" {
                return Err(invalid(def, "XRP is not an issued currency"));
            }
            out.extend(issued_value_bits(def, field("value")?)?.to_be_bytes());
            out.extend(currency_bytes(def, currency)?);
            out.extend(decode_address(field("issuer")?)?);
        }
        _ => return Err(invalid(def, "not an amount")),
    }
    Ok(())
}

/// Pack a decimal string into the 64-bit issued-value form
fn issued_value_bits(def: &FieldDef, text: &str) -> Result<u64, CodecError> {
    let bad = || invalid(def, format!("bad issued value {}", text));

    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (number, mut exponent) = match unsigned.split_once(['e', 'E']) {
        Some((n, e)) => (n, e.parse::<i32>().map_err(|_| bad())?),
        None => (unsigned, 0),
    };
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(bad());
    }
    let all_digits = format!("{}{}", whole, fraction);
    if !all_digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad());
    }
    exponent -= fraction.len() as i32;

    let digits = all_digits.trim_start_matches('0');
    let significant = digits.trim_end_matches('0');
    exponent += (digits.len() - significant.len()) as i32;
    if significant.is_empty() {
        return Ok(NOT_NATIVE_BIT);
    }
    if significant.len() > 16 {
        return Err(invalid(def, "more than 16 significant digits"));
    }

    let mut mantissa: u64 = significant.parse().map_err(|_| bad())?;
    while mantissa < MIN_MANTISSA {
        mantissa *= 10;
        exponent -= 1;
    }

    if exponent < MIN_EXPONENT {
        return Ok(NOT_NATIVE_BIT);
    }
    if exponent > MAX_EXPONENT {
        return Err(invalid(def, "issued value too large"));
    }

    let mut bits = NOT_NATIVE_BIT | ((exponent + EXPONENT_BIAS) as u64) << 54 | mantissa;
    if !negative {
        bits |= POSITIVE_BIT;
    }
    Ok(bits)
}

fn issued_value_text(bits: u64) -> String {
    let mantissa = bits & MANTISSA_MASK;
    if mantissa == 0 {
        return "0".to_string();
    }
    let mut exponent = ((bits >> 54) & 0xFF) as i32 - EXPONENT_BIAS;
    let mut digits = mantissa.to_string();
    while digits.ends_with('0') {
        digits.pop();
        exponent += 1;
    }

    let magnitude = if exponent >= 0 {
        format!("{}{}", digits, "0".repeat(exponent as usize))
    } else {
        let point = digits.len() as i32 + exponent;
        if point > 0 {
            let (whole, fraction) = digits.split_at(point as usize);
            format!("{}.{}", whole, fraction)
        } else {
            format!("0.{}{}", "0".repeat((-point) as usize), digits)
        }
    };

    if bits & POSITIVE_BIT == 0 {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}

/// Three-letter codes sit at bytes 12..15; anything else is 40 hex digits
fn currency_bytes(def: &FieldDef, code: &str) -> Result<[u8; 20], CodecError> {
    let mut bytes = [0u8; 20];
    if code == "XRP" {
        return Ok(bytes);
    }
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_graphic()) {
        bytes[12..15].copy_from_slice(code.as_bytes());
        return Ok(bytes);
    }
    let raw = hex::decode(code).map_err(|_| invalid(def, format!("bad currency {}", code)))?;
    if raw.len() != 20 {
        return Err(invalid(def, format!("bad currency {}", code)));
    }
    bytes.copy_from_slice(&raw);
    Ok(bytes)
}

fn currency_text(bytes: &[u8]) -> String {
    if bytes.iter().all(|b| *b == 0) {
        return "XRP".to_string();
    }
    let standard = bytes[..12].iter().all(|b| *b == 0)
        && bytes[15..].iter().all(|b| *b == 0)
        && bytes[12..15].iter().all(|b| b.is_ascii_graphic());
    if standard {
        String::from_utf8_lossy(&bytes[12..15]).into_owned()
    } else {
        hex::encode_upper(bytes)
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Reads serialized fields back into ledger JSON
pub struct BinaryParser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn read(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self.pos.checked_add(n).ok_or(CodecError::UnexpectedEnd)?;
        let slice = self.data.get(self.pos..end).ok_or(CodecError::UnexpectedEnd)?;
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read(1)?[0])
    }

    fn read_u64(&mut self) -> Result<u64, CodecError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.read(8)?);
        Ok(u64::from_be_bytes(buf))
    }

    fn read_header(&mut self) -> Result<(u8, u8), CodecError> {
        let first = self.read_u8()?;
        let mut type_code = first >> 4;
        let mut nth = first & 0x0F;
        if type_code == 0 {
            type_code = self.read_u8()?;
        }
        if nth == 0 {
            nth = self.read_u8()?;
        }
        Ok((type_code, nth))
    }

    fn read_length(&mut self) -> Result<usize, CodecError> {
        let b1 = self.read_u8()? as usize;
        if b1 <= 192 {
            return Ok(b1);
        }
        let b2 = self.read_u8()? as usize;
        if b1 <= 240 {
            return Ok(193 + (b1 - 193) * 256 + b2);
        }
        let b3 = self.read_u8()? as usize;
        Ok(12_481 + (b1 - 241) * 65_536 + b2 * 256 + b3)
    }

    /// Read a whole top-level object
    pub fn read_transaction(mut self) -> Result<Map<String, Value>, CodecError> {
        let object = self.read_object()?;
        if !self.is_done() {
            return Err(CodecError::InvalidValue {
                field: "blob".to_string(),
                reason: "trailing bytes".to_string(),
            });
        }
        Ok(object)
    }

    fn read_object(&mut self) -> Result<Map<String, Value>, CodecError> {
        let mut object = Map::new();
        while !self.is_done() {
            let (type_code, nth) = self.read_header()?;
            if (type_code, nth) == (FieldType::StObject.code(), 1) {
                break;
            }
            let def = field_by_code(type_code, nth)
                .ok_or_else(|| CodecError::UnknownField(format!("{}:{}", type_code, nth)))?;
            let value = self.read_value(def)?;
            object.insert(def.name.to_string(), value);
        }
        Ok(object)
    }

    fn read_value(&mut self, def: &FieldDef) -> Result<Value, CodecError> {
        let value = match def.field_type {
            FieldType::UInt16 => {
                let bytes = self.read(2)?;
                let n = u16::from_be_bytes([bytes[0], bytes[1]]);
                if def.name == "TransactionType" {
                    let name = transaction_type_name(n)
                        .ok_or_else(|| invalid(def, format!("unknown type {}", n)))?;
                    Value::from(name)
                } else {
                    Value::from(n)
                }
            }
            FieldType::UInt32 => {
                let bytes = self.read(4)?;
                let n = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                match permission_name(n) {
                    Some(name) if def.name == "PermissionValue" => Value::from(name),
                    _ => Value::from(n),
                }
            }
            FieldType::Hash192 => Value::from(hex::encode_upper(self.read(24)?)),
            FieldType::Hash256 => Value::from(hex::encode_upper(self.read(32)?)),
            FieldType::Amount => self.read_amount()?,
            FieldType::Blob => {
                let len = self.read_length()?;
                Value::from(hex::encode_upper(self.read(len)?))
            }
            FieldType::AccountId => {
                let len = self.read_length()?;
                Value::from(self.read_account(len)?)
            }
            FieldType::StObject => Value::Object(self.read_object()?),
            FieldType::StArray => {
                let mut items = Vec::new();
                loop {
                    let (type_code, nth) = self.read_header()?;
                    if (type_code, nth) == (FieldType::StArray.code(), 1) {
                        break;
                    }
                    let item = field_by_code(type_code, nth)
                        .filter(|d| d.field_type == FieldType::StObject)
                        .ok_or_else(|| invalid(def, "array item is not an object"))?;
                    let mut wrapper = Map::new();
                    wrapper.insert(item.name.to_string(), Value::Object(self.read_object()?));
                    items.push(Value::Object(wrapper));
                }
                Value::Array(items)
            }
            FieldType::Issue => {
                let currency = self.read(20)?;
                let mut object = Map::new();
                object.insert("currency".to_string(), Value::from(currency_text(currency)));
                if currency.iter().any(|b| *b != 0) {
                    object.insert("issuer".to_string(), Value::from(self.read_account(20)?));
                }
                Value::Object(object)
            }
        };
        Ok(value)
    }

    fn read_account(&mut self, len: usize) -> Result<String, CodecError> {
        let bytes = self.read(len)?;
        let account_id: [u8; 20] = bytes.try_into().map_err(|_| CodecError::InvalidValue {
            field: "AccountID".to_string(),
            reason: format!("{} bytes", len),
        })?;
        Ok(encode_account_id(&account_id))
    }

    fn read_amount(&mut self) -> Result<Value, CodecError> {
        let first = *self.data.get(self.pos).ok_or(CodecError::UnexpectedEnd)?;

        if first & 0x80 != 0 {
            let bits = self.read_u64()?;
            let currency = currency_text(self.read(20)?);
            let issuer = self.read_account(20)?;
            let mut object = Map::new();
            object.insert("currency".to_string(), Value::from(currency));
            object.insert("issuer".to_string(), Value::from(issuer));
            object.insert("value".to_string(), Value::from(issued_value_text(bits)));
            return Ok(Value::Object(object));
        }

        if first & MPT_BIT != 0 {
            self.read_u8()?;
            let amount = self.read_u64()?;
            let mut object = Map::new();
            object.insert(
                "mpt_issuance_id".to_string(),
                Value::from(hex::encode_upper(self.read(24)?)),
            );
            object.insert("value".to_string(), Value::from(amount.to_string()));
            return Ok(Value::Object(object));
        }

        let bits = self.read_u64()?;
        Ok(Value::from((bits & !POSITIVE_BIT).to_string()))
    }
}
