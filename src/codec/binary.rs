use std::{
    io::{Read, Write},
    marker::PhantomData,
};

use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};

use crate::{
    error::Error,
    input::Input,
    scalar::{Scalar, ScalarType},
};
use super::{Decoder, Encoder};


/// Decodes tightly packed values with byte order `B`. There is no padding or
/// separator between values.
pub(crate) struct BinaryDecoder<B: ByteOrder>(PhantomData<B>);

impl<B: ByteOrder> Decoder for BinaryDecoder<B> {
    fn read_scalar<R: Read>(input: &mut Input<R>, ty: ScalarType) -> Result<Scalar, Error> {
        let v = match ty {
            ScalarType::Int8 => Scalar::Int8(input.read_i8()?),
            ScalarType::Uint8 => Scalar::Uint8(input.read_u8()?),
            ScalarType::Int16 => Scalar::Int16(input.read_i16::<B>()?),
            ScalarType::Uint16 => Scalar::Uint16(input.read_u16::<B>()?),
            ScalarType::Int32 => Scalar::Int32(input.read_i32::<B>()?),
            ScalarType::Uint32 => Scalar::Uint32(input.read_u32::<B>()?),
            ScalarType::Float32 => Scalar::Float32(input.read_f32::<B>()?),
            ScalarType::Float64 => Scalar::Float64(input.read_f64::<B>()?),
        };

        Ok(v)
    }
}

/// Writes tightly packed values with byte order `B`.
pub(crate) struct BinaryEncoder<'a, W: Write, B: ByteOrder> {
    writer: &'a mut W,
    _order: PhantomData<B>,
}

impl<'a, W: Write, B: ByteOrder> BinaryEncoder<'a, W, B> {
    pub(crate) fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            _order: PhantomData,
        }
    }
}

impl<W: Write, B: ByteOrder> Encoder for BinaryEncoder<'_, W, B> {
    fn write_scalar(&mut self, v: Scalar) -> Result<(), Error> {
        let w = &mut self.writer;
        match v {
            Scalar::Int8(v) => w.write_i8(v)?,
            Scalar::Uint8(v) => w.write_u8(v)?,
            Scalar::Int16(v) => w.write_i16::<B>(v)?,
            Scalar::Uint16(v) => w.write_u16::<B>(v)?,
            Scalar::Int32(v) => w.write_i32::<B>(v)?,
            Scalar::Uint32(v) => w.write_u32::<B>(v)?,
            Scalar::Float32(v) => w.write_f32::<B>(v)?,
            Scalar::Float64(v) => w.write_f64::<B>(v)?,
        }

        Ok(())
    }

    fn end_element(&mut self) -> Result<(), Error> {
        // Nothing to do: binary elements have no terminator
        Ok(())
    }
}
