//! Connecting PLY properties with fields of your own types.
//!
//! A [`PropBinding`] names a property and provides two accessors: one that
//! reads the property's value from an instance of `T` (used when writing)
//! and one that stores a value into an instance (used when reading). Values
//! are exchanged as [`Value`]s in the *program kind* of the binding and are
//! converted from/to the file's types automatically.

use std::fmt;

use crate::{
    scalar::{PlyScalar, ScalarType},
    schema::PropertyKind,
    value::Value,
};


type Getter<T> = Box<dyn Fn(&T) -> Value>;
type Setter<T> = Box<dyn Fn(&mut T, Value)>;

/// Accessors for one property of records of type `T`.
///
/// # Example
///
/// ```
/// use plyio::PropBinding;
///
/// #[derive(Default)]
/// struct Face {
///     vertex_indices: Vec<u32>,
///     intensity: f32,
/// }
///
/// let vi = PropBinding::list("vertex_indices", |f: &Face| &f.vertex_indices[..], |f, v| f.vertex_indices = v);
/// let intensity = PropBinding::scalar("intensity", |f: &Face| f.intensity, |f, v| f.intensity = v);
/// ```
pub struct PropBinding<T> {
    name: String,
    kind: PropertyKind,
    get: Getter<T>,
    set: Setter<T>,
}

impl<T: 'static> PropBinding<T> {
    /// Creates a binding with accessors working on raw [`Value`]s.
    ///
    /// `set` receives values converted to `kind`. `get` has to return values
    /// of the shape of `kind` (scalar or list); their scalar type may differ,
    /// they are converted into the file type anyway.
    pub fn new(
        name: impl Into<String>,
        kind: PropertyKind,
        get: impl Fn(&T) -> Value + 'static,
        set: impl Fn(&mut T, Value) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            get: Box::new(get),
            set: Box::new(set),
        }
    }

    /// Binds a scalar property to a value of primitive type `P`.
    pub fn scalar<P: PlyScalar>(
        name: impl Into<String>,
        get: impl Fn(&T) -> P + 'static,
        set: impl Fn(&mut T, P) + 'static,
    ) -> Self {
        Self::new(
            name,
            PropertyKind::Scalar(P::TYPE),
            move |t| Value::Scalar(get(t).into_scalar()),
            move |t, v| {
                if let Some(s) = v.as_scalar() {
                    set(t, s.cast());
                }
            },
        )
    }

    /// Binds a list property to a sequence of primitive values `P`.
    pub fn list<P: PlyScalar>(
        name: impl Into<String>,
        get: impl Fn(&T) -> &[P] + 'static,
        set: impl Fn(&mut T, Vec<P>) + 'static,
    ) -> Self {
        Self::new(
            name,
            PropertyKind::list(ScalarType::Uint32, P::TYPE),
            move |t| Value::list_of(get(t)),
            move |t, v| {
                if let Some(list) = v.as_list() {
                    set(t, list.iter().map(|s| s.cast()).collect());
                }
            },
        )
    }
}

impl<T> PropBinding<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind values are exchanged in. For lists, only the scalar type is
    /// relevant; the count type of the file is always used.
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub(crate) fn get(&self, record: &T) -> Value {
        (self.get)(record)
    }

    /// Converts `value` into the program kind and stores it.
    pub(crate) fn set(&self, record: &mut T, value: Value) {
        match value.convert(self.kind) {
            Some(v) => (self.set)(record, v),
            None => (self.set)(record, value),
        }
    }
}

impl<T> fmt::Debug for PropBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PropBinding")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use crate::scalar::Scalar;
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Vertex {
        x: f32,
        flags: u8,
        neighbors: Vec<u16>,
    }

    #[test]
    fn scalar_binding_converts() {
        let b = PropBinding::scalar("x", |v: &Vertex| v.x, |v, x| v.x = x);
        assert_eq!(b.name(), "x");
        assert_eq!(b.kind(), PropertyKind::Scalar(ScalarType::Float32));

        let mut v = Vertex::default();
        b.set(&mut v, Value::Scalar(Scalar::Float64(2.5)));
        assert_eq!(v.x, 2.5);
        assert_eq!(b.get(&v), Value::Scalar(Scalar::Float32(2.5)));

        let flags = PropBinding::scalar("flags", |v: &Vertex| v.flags, |v, f| v.flags = f);
        flags.set(&mut v, Value::Scalar(Scalar::Int32(257)));
        assert_eq!(v.flags, 1);
    }

    #[test]
    fn list_binding_converts() {
        let b = PropBinding::list(
            "neighbors",
            |v: &Vertex| &v.neighbors[..],
            |v, n| v.neighbors = n,
        );
        assert_eq!(b.kind().scalar_type(), ScalarType::Uint16);

        let mut v = Vertex::default();
        b.set(&mut v, Value::list_of(&[1i32, 2, 70_000]));
        assert_eq!(v.neighbors, vec![1, 2, 4464]);
        assert_eq!(b.get(&v), Value::list_of(&[1u16, 2, 4464]));
    }
}
