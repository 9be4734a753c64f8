//! Encoding and decoding of element data, i.e. everything after the header.
//!
//! Both directions work on single scalars and are dispatched on the
//! [`Format`] of the file. List properties are a length (stored as the list's
//! count type) followed by that many scalars.

use std::{
    cmp,
    convert::TryFrom,
    io::{Read, Write},
};

use byteorder::{BigEndian, LittleEndian, NativeEndian};

use crate::{
    error::Error,
    input::Input,
    scalar::{Scalar, ScalarType},
    schema::{Format, PropertyKind},
    value::{ScalarList, Value},
};

mod ascii;
mod binary;


use self::{
    ascii::{AsciiDecoder, AsciiEncoder},
    binary::{BinaryDecoder, BinaryEncoder},
};


/// Lists are never preallocated with more entries than this, as the length
/// comes straight from the (potentially broken) file.
const MAX_LIST_PREALLOC: usize = 1024;


// ===========================================================================
// ===== Decoding
// ===========================================================================

/// Reads values of one encoding.
pub(crate) trait Decoder {
    /// Reads a single value stored as `ty`.
    fn read_scalar<R: Read>(input: &mut Input<R>, ty: ScalarType) -> Result<Scalar, Error>;

    /// Reads the length of a list stored as `ty`. Fails for negative
    /// lengths.
    fn read_list_len<R: Read>(input: &mut Input<R>, ty: ScalarType) -> Result<u64, Error> {
        let offset = input.offset();
        let len = Self::read_scalar(input, ty)?;
        match len.as_integer() {
            Some(len) if len >= 0 => Ok(len as u64),
            _ => Err(Error::MalformedData {
                offset,
                msg: format!("invalid list length {}", len),
            }),
        }
    }
}

/// Reads one property value of the given kind. Values are returned in their
/// file type.
pub(crate) fn read_property<R: Read>(
    input: &mut Input<R>,
    format: Format,
    kind: PropertyKind,
) -> Result<Value, Error> {
    match format {
        Format::Ascii => read_property_with::<AsciiDecoder, _>(input, kind),
        Format::BinaryBigEndian => read_property_with::<BinaryDecoder<BigEndian>, _>(input, kind),
        Format::BinaryLittleEndian => {
            read_property_with::<BinaryDecoder<LittleEndian>, _>(input, kind)
        }
    }
}

fn read_property_with<D: Decoder, R: Read>(
    input: &mut Input<R>,
    kind: PropertyKind,
) -> Result<Value, Error> {
    match kind {
        PropertyKind::Scalar(ty) => D::read_scalar(input, ty).map(Value::Scalar),
        PropertyKind::List { len_type, scalar_type } => {
            let offset = input.offset();
            let len = D::read_list_len(input, len_type)?;
            if len_type.max_list_len().map_or(true, |max| len > max) {
                return Err(Error::MalformedData {
                    offset,
                    msg: format!("list length {} does not fit count type '{}'", len, len_type),
                });
            }
            let len = usize::try_from(len).map_err(|_| Error::MalformedData {
                offset,
                msg: format!("list length {} does not fit into memory", len),
            })?;

            let mut list = ScalarList::with_capacity(cmp::min(len, MAX_LIST_PREALLOC));
            for _ in 0..len {
                list.push(D::read_scalar(input, scalar_type)?);
            }

            Ok(Value::List(list))
        }
    }
}


// ===========================================================================
// ===== Encoding
// ===========================================================================

/// Writes values in one encoding. One encoder is used per element instance.
pub(crate) trait Encoder {
    /// Writes a single value, exactly in the type it has.
    fn write_scalar(&mut self, v: Scalar) -> Result<(), Error>;

    /// Called after all properties of one element instance are written.
    fn end_element(&mut self) -> Result<(), Error>;
}

/// Creates an encoder for `format` that writes to `w` and passes it to `func`.
pub(crate) fn with_encoder<W, F, O>(w: &mut W, format: Format, func: F) -> Result<O, Error>
where
    W: Write,
    F: FnOnce(&mut dyn Encoder) -> Result<O, Error>,
{
    match format {
        Format::Ascii => func(&mut AsciiEncoder::new(w)),
        Format::BinaryBigEndian => func(&mut BinaryEncoder::<_, BigEndian>::new(w)),
        Format::BinaryLittleEndian => func(&mut BinaryEncoder::<_, LittleEndian>::new(w)),
    }
}

/// Makes sure that `value` can be written as property `name` of kind `kind`:
/// the shapes have to match and lists have to be short enough for the count
/// type.
pub(crate) fn check_value(name: &str, kind: PropertyKind, value: &Value) -> Result<(), Error> {
    match (kind, value) {
        (PropertyKind::Scalar(_), Value::Scalar(_)) => Ok(()),
        (PropertyKind::List { len_type, .. }, Value::List(list)) => {
            let max = len_type.max_list_len().ok_or_else(|| {
                schema_violation!("list property '{}' has non-integer count type", name)
            })?;

            if list.len() as u64 > max {
                return Err(schema_violation!(
                    "list with {} entries is too long for property '{}' (count type '{}' \
                        allows at most {})",
                    list.len(),
                    name,
                    len_type,
                    max,
                ));
            }

            Ok(())
        }
        (kind, value) => Err(schema_violation!(
            "value {} does not match property '{}' of kind '{}'",
            value,
            name,
            kind,
        )),
    }
}

/// Writes `value` as property of the given kind, converting it into the file
/// type(s) first.
pub(crate) fn write_property(
    enc: &mut dyn Encoder,
    name: &str,
    kind: PropertyKind,
    value: &Value,
) -> Result<(), Error> {
    check_value(name, kind, value)?;

    match (kind, value) {
        (PropertyKind::Scalar(ty), Value::Scalar(s)) => enc.write_scalar(s.convert(ty)),
        (PropertyKind::List { len_type, scalar_type }, Value::List(list)) => {
            // `check_value` made sure the length fits into `len_type`.
            enc.write_scalar(Scalar::Uint32(list.len() as u32).convert(len_type))?;
            for s in list {
                enc.write_scalar(s.convert(scalar_type))?;
            }
            Ok(())
        }
        _ => unreachable!("shape was checked by `check_value`"),
    }
}


// ===========================================================================
// ===== Native blobs
// ===========================================================================

/// Appends `value` to `buf` in the binary encoding with native byte order.
/// The value is converted into the file type(s) of `kind` first.
pub(crate) fn push_native(
    buf: &mut Vec<u8>,
    name: &str,
    kind: PropertyKind,
    value: &Value,
) -> Result<(), Error> {
    write_property(&mut BinaryEncoder::<_, NativeEndian>::new(buf), name, kind, value)
}

/// Reads one value of the given kind from a buffer filled by
/// [`push_native`].
pub(crate) fn read_native<R: Read>(input: &mut Input<R>, kind: PropertyKind) -> Result<Value, Error> {
    read_property_with::<BinaryDecoder<NativeEndian>, _>(input, kind)
}
