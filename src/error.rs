use std::io;

use failure::Fail;


/// Everything that can go wrong while reading or writing a PLY file.
///
/// `SchemaViolation` and `SequencingError` are usage errors: they are caused
/// by the calling code, not by the file. All other variants describe problems
/// with the data or the underlying stream.
#[derive(Debug, Fail)]
pub enum Error {
    /// The header is not valid: bad magic number, unknown keyword or a line
    /// that could not be parsed. `line` is 1-based.
    #[fail(display = "malformed PLY header (line {}): {}", line, msg)]
    MalformedHeader {
        line: usize,
        msg: String,
    },

    #[fail(display = "unsupported PLY format version \"{}\" (line {})", version, line)]
    UnsupportedFormatVersion {
        version: String,
        line: usize,
    },

    #[fail(display = "unknown scalar type name \"{}\" (line {})", name, line)]
    UnknownScalarTypeName {
        name: String,
        line: usize,
    },

    /// The schema is inconsistent, e.g. a duplicate property name or a list
    /// whose count type is a floating point type.
    #[fail(display = "schema violation: {}", _0)]
    SchemaViolation(String),

    /// Elements or instances were read or written out of the declared order
    /// or with the wrong count.
    #[fail(display = "sequencing error: {}", _0)]
    SequencingError(String),

    #[fail(display = "unexpected end of data while {}", _0)]
    TruncatedData(String),

    /// Element data that can't be decoded, e.g. an ASCII token that is not a
    /// number or a negative list length. `offset` is the byte offset in the
    /// input.
    #[fail(display = "malformed element data (at byte {}): {}", offset, msg)]
    MalformedData {
        offset: u64,
        msg: String,
    },

    #[fail(display = "IO error: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(src: io::Error) -> Self {
        match src.kind() {
            io::ErrorKind::UnexpectedEof => {
                Error::TruncatedData("reading from the underlying stream".into())
            }
            _ => Error::Io(src),
        }
    }
}

macro_rules! sequencing_error {
    ($($t:tt)*) => {
        $crate::error::Error::SequencingError(format!($($t)*))
    };
}

macro_rules! schema_violation {
    ($($t:tt)*) => {
        $crate::error::Error::SchemaViolation(format!($($t)*))
    };
}
