use std::fmt;

use smallvec::SmallVec;

use crate::{
    scalar::{PlyScalar, Scalar},
    schema::PropertyKind,
};


/// The values of a list property. Lists are short in practice (the most
/// common one, a triangle's `vertex_indices`, has three entries), so a few
/// values are stored inline.
pub type ScalarList = SmallVec<[Scalar; 4]>;

/// One property value: either a single tagged scalar or a list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    List(ScalarList),
}

impl Value {
    /// Creates a list value from primitive values.
    pub fn list_of<P: PlyScalar>(values: &[P]) -> Self {
        Value::List(values.iter().map(|v| v.into_scalar()).collect())
    }

    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Value::Scalar(s) => Some(*s),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            Value::Scalar(_) => None,
            Value::List(l) => Some(l),
        }
    }

    /// Returns `true` if this value has the shape (scalar or list) of `kind`.
    pub fn fits(&self, kind: PropertyKind) -> bool {
        self.is_list() == kind.is_list()
    }

    pub fn is_list(&self) -> bool {
        match self {
            Value::Scalar(_) => false,
            Value::List(_) => true,
        }
    }

    /// Converts the value (or every list entry) into the scalar type of
    /// `kind`. Returns `None` if the value is a scalar and `kind` a list or
    /// vice versa.
    pub fn convert(&self, kind: PropertyKind) -> Option<Value> {
        match (self, kind) {
            (Value::Scalar(s), PropertyKind::Scalar(ty)) => Some(Value::Scalar(s.convert(ty))),
            (Value::List(l), PropertyKind::List { scalar_type, .. }) => {
                Some(Value::List(l.iter().map(|s| s.convert(scalar_type)).collect()))
            }
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(src: Scalar) -> Self {
        Value::Scalar(src)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Scalar(s) => s.fmt(f),
            Value::List(l) => {
                write!(f, "[")?;
                for (i, s) in l.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    s.fmt(f)?;
                }
                write!(f, "]")
            }
        }
    }
}
