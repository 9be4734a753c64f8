//! Data the calling program did not ask for, kept so that it can be written
//! out again unchanged.
//!
//! Values are stored in a compact binary blob: each property in its file
//! type, native byte order, lists prefixed by their length in the list's
//! count type. When reading a binary file with native byte order, this is
//! exactly the byte sequence of the file.

use derive_more::{From, Into};

use crate::{
    codec,
    error::Error,
    input::Input,
    schema::{ElementDef, PropertyDef},
    value::Value,
};


/// Describes the properties of one element that were not requested while
/// reading. Pass it to [`Writer::declare_other_properties`][crate::Writer::declare_other_properties]
/// to declare the same properties in an output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherProps {
    /// Name of the element the properties belong to.
    pub element: String,

    /// The unrequested properties in file order.
    pub property_defs: Vec<PropertyDef>,
}

/// The values of all unrequested properties of one element instance.
///
/// The content is opaque. It can be written again by a [`Writer`][crate::Writer]
/// or interpreted with [`OtherData::decode`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, From, Into)]
pub struct OtherData(Vec<u8>);

impl OtherData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends the value of property `def`. The value is converted into the
    /// property's file type.
    pub(crate) fn push(&mut self, def: &PropertyDef, value: &Value) -> Result<(), Error> {
        codec::push_native(&mut self.0, &def.name, def.kind, value)
    }

    /// Decodes all values, assuming they were stored for the given
    /// properties. Fails if the data doesn't match the definitions.
    pub fn decode(&self, defs: &[PropertyDef]) -> Result<Vec<Value>, Error> {
        let mut input = Input::new(&self.0[..]);
        let values = defs.iter()
            .map(|def| codec::read_native(&mut input, def.kind))
            .collect::<Result<Vec<_>, _>>()?;

        if input.offset() != self.0.len() as u64 {
            return Err(Error::MalformedData {
                offset: input.offset(),
                msg: format!(
                    "{} trailing byte(s) in other data after decoding {} properties",
                    self.0.len() as u64 - input.offset(),
                    defs.len(),
                ),
            });
        }

        Ok(values)
    }
}

/// An element that was read without interpreting it: its definition and the
/// data of every instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherElement {
    pub def: ElementDef,
    pub instances: Vec<OtherData>,
}

impl OtherElement {
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Decodes the values of the instance with the given index, or returns
    /// `None` if there is no such instance.
    pub fn decode_instance(&self, idx: usize) -> Option<Result<Vec<Value>, Error>> {
        self.instances.get(idx).map(|data| data.decode(&self.def.property_defs))
    }
}


#[cfg(test)]
mod tests {
    use crate::{
        scalar::{Scalar, ScalarType},
        value::Value,
    };
    use super::*;

    #[test]
    fn push_and_decode() -> Result<(), failure::Error> {
        let defs = [
            PropertyDef::scalar("confidence", ScalarType::Float32),
            PropertyDef::list("neighbors", ScalarType::Uint8, ScalarType::Int32),
        ];

        let mut data = OtherData::new();
        data.push(&defs[0], &Scalar::Float64(0.25).into())?;
        data.push(&defs[1], &Value::list_of(&[3u8, 9]))?;
        assert_eq!(data.len(), 4 + 1 + 2 * 4);

        assert_eq!(data.decode(&defs)?, vec![
            Value::Scalar(Scalar::Float32(0.25)),
            Value::list_of(&[3i32, 9]),
        ]);

        Ok(())
    }

    #[test]
    fn decode_mismatch() {
        let data = OtherData::from(vec![1, 2, 3]);

        match data.decode(&[PropertyDef::scalar("a", ScalarType::Int32)]) {
            Err(Error::TruncatedData(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        match data.decode(&[PropertyDef::scalar("a", ScalarType::Int16)]) {
            Err(Error::MalformedData { offset: 2, .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
