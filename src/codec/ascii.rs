use std::io::{Read, Write};

use crate::{
    error::Error,
    input::Input,
    scalar::{Scalar, ScalarType},
};
use super::{Decoder, Encoder};


/// Decodes whitespace separated decimal numbers.
///
/// Line breaks are treated like any other whitespace, i.e. an element
/// instance may span several lines or share a line with another one.
pub(crate) enum AsciiDecoder {}

impl AsciiDecoder {
    /// Reads the next whitespace delimited token and passes it to `func`
    /// together with its start offset.
    fn token<R, F, O>(input: &mut Input<R>, func: F) -> Result<O, Error>
    where
        R: Read,
        F: FnOnce(&str, u64) -> Result<O, Error>,
    {
        if !input.skip_until(|b: u8| !b.is_ascii_whitespace())? {
            return Err(Error::TruncatedData("reading ASCII element data".into()));
        }

        let offset = input.offset();
        input.take_until(|b: u8| b.is_ascii_whitespace(), |raw| {
            let token = std::str::from_utf8(raw).map_err(|_| Error::MalformedData {
                offset,
                msg: "token is not valid UTF-8".into(),
            })?;
            func(token, offset)
        })
    }
}

impl Decoder for AsciiDecoder {
    fn read_scalar<R: Read>(input: &mut Input<R>, ty: ScalarType) -> Result<Scalar, Error> {
        Self::token(input, |token, offset| {
            parse_scalar(token, ty).ok_or_else(|| Error::MalformedData {
                offset,
                msg: format!("expected {} value, found {:?}", ty, token),
            })
        })
    }

    fn read_list_len<R: Read>(input: &mut Input<R>, _ty: ScalarType) -> Result<u64, Error> {
        // Unlike values, lengths have to be proper non-negative integers.
        Self::token(input, |token, offset| {
            token.parse::<u64>().map_err(|_| Error::MalformedData {
                offset,
                msg: format!("invalid list length {:?}", token),
            })
        })
    }
}

/// Parses a token as value of type `ty`.
///
/// Integer types accept decimal integers and, as some exporters write
/// integer properties as `3.0`, floating point numbers, which are then
/// truncated. Out of range values are converted like an `as` cast.
fn parse_scalar(token: &str, ty: ScalarType) -> Option<Scalar> {
    match ty {
        ScalarType::Float32 => token.parse::<f32>().ok().map(Scalar::Float32),
        ScalarType::Float64 => token.parse::<f64>().ok().map(Scalar::Float64),
        _ => match token.parse::<i64>() {
            Ok(v) => Some(integer_scalar(v, ty)),
            Err(_) => token.parse::<f64>().ok().map(|v| Scalar::Float64(v).convert(ty)),
        },
    }
}

fn integer_scalar(v: i64, ty: ScalarType) -> Scalar {
    match ty {
        ScalarType::Int8 => Scalar::Int8(v as i8),
        ScalarType::Uint8 => Scalar::Uint8(v as u8),
        ScalarType::Int16 => Scalar::Int16(v as i16),
        ScalarType::Uint16 => Scalar::Uint16(v as u16),
        ScalarType::Int32 => Scalar::Int32(v as i32),
        ScalarType::Uint32 => Scalar::Uint32(v as u32),
        ScalarType::Float32 => Scalar::Float32(v as f32),
        ScalarType::Float64 => Scalar::Float64(v as f64),
    }
}


/// Writes values separated by a single space and terminates each element
/// instance with `'\n'`.
pub(crate) struct AsciiEncoder<'a, W: Write> {
    writer: &'a mut W,
    at_start_of_line: bool,
}

impl<'a, W: Write> AsciiEncoder<'a, W> {
    pub(crate) fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            at_start_of_line: true,
        }
    }

    fn write_separator(&mut self) -> Result<(), Error> {
        if self.at_start_of_line {
            self.at_start_of_line = false;
        } else {
            self.writer.write_all(b" ")?;
        }

        Ok(())
    }
}

impl<W: Write> Encoder for AsciiEncoder<'_, W> {
    fn write_scalar(&mut self, v: Scalar) -> Result<(), Error> {
        self.write_separator()?;
        write!(self.writer, "{}", v)?;
        Ok(())
    }

    fn end_element(&mut self) -> Result<(), Error> {
        self.writer.write_all(b"\n")?;
        self.at_start_of_line = true;
        Ok(())
    }
}
