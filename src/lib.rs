//! Reads and writes binary buffers through a cursor that tracks the current position.
//!
//! [`BufferReader`] decodes values from a borrowed slice and [`BufferWriter`] encodes them into
//! an owned `Vec<u8>` that grows on demand. Both expose the same family of typed accessors
//! (`read_u16`, `read_u16_le`, `read_u16_be_at`, `write_u16`, ...), plus dynamic `get`/`set`
//! accessors keyed by a [`ValueType`], which can be parsed from names like `"UInt16BE"`.
//!
//! Accessors either work at the cursor and advance it, or work at an explicit offset and leave
//! it alone. Navigation (`skip`, `skip_to`, `trim`, `slice`, ...) comes from [`CursorAccess`].
//!
//! ```
//! use cursor_binary_io::{BufferReader, BufferWriter, CursorAccess, Options, ValueType};
//!
//! let mut w = BufferWriter::new();
//! w.write_u8(42).write_u16_be(0x0102);
//! w.write_string("hi", &Options::new()).unwrap();
//! assert_eq!(w.buffer(), [42, 0x01, 0x02, b'h', b'i']);
//!
//! let mut r = BufferReader::new(w.buffer());
//! let ty: ValueType = "uint8".parse().unwrap();
//! assert_eq!(r.get(ty, &Options::new()).and_then(|v| v.as_int()), Some(42));
//! assert_eq!(r.read_u16_be().unwrap(), 0x0102);
//! ```

#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

mod codec;
mod cursor;
mod encoding;
mod error;
pub mod ieee754;
mod reader;
mod value;
mod writer;


pub use codec::MAX_VAR_BYTES;
pub use cursor::{Cursor, CursorAccess, CursorOptions, Endian};
pub use encoding::TextEncoding;
pub use error::{Error, Result};
pub use reader::BufferReader;
pub use value::{types, Kind, Options, Order, Value, ValueType};
pub use writer::BufferWriter;
