use crate::Result;

/// Byte order of multi-byte values.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Endian {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

/// Construction options shared by [`BufferReader`](crate::BufferReader) and
/// [`BufferWriter`](crate::BufferWriter).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CursorOptions {
    /// Initial cursor position.
    pub offset: usize,
    /// Byte order used by accessors that do not name one.
    pub endian: Endian,
}

impl CursorOptions {
    /// Little-endian, starting at offset 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial cursor position.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the default byte order.
    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Selects big-endian when `big` is true, little-endian otherwise.
    pub fn big_endian(self, big: bool) -> Self {
        self.endian(if big { Endian::Big } else { Endian::Little })
    }
}

/// The storage, position and byte order behind a reader or writer.
///
/// All typed accessors funnel through [`Cursor::execute_read`] and
/// [`Cursor::execute_write`], which own the rules for when the position moves: an access at an
/// explicit offset never moves it, and an access at the cursor moves it past the bytes touched.
#[derive(Clone, Debug)]
pub struct Cursor<S> {
    storage: S,
    position: usize,
    endian: Endian,
}

impl<S: AsRef<[u8]>> Cursor<S> {
    /// Constructor
    pub fn new(storage: S, options: CursorOptions) -> Self {
        Self {
            storage,
            position: options.offset,
            endian: options.endian,
        }
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Extracts the underlying storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to `position`. The position is not checked against the storage length.
    #[inline]
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Default byte order.
    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// The explicit offset if there is one, otherwise the cursor position.
    #[inline]
    pub fn resolve(&self, offset: Option<usize>) -> usize {
        offset.unwrap_or(self.position)
    }

    /// Runs `read` at the resolved offset. Without an explicit offset, the cursor then advances
    /// by `size`. A failed read leaves the cursor where it was.
    #[inline]
    pub fn execute_read<T>(
        &mut self,
        size: usize,
        offset: Option<usize>,
        read: impl FnOnce(&S, usize) -> Result<T>,
    ) -> Result<T> {
        let at = self.resolve(offset);
        let value = read(&self.storage, at)?;
        if offset.is_none() {
            self.position = self.position.saturating_add(size);
        }
        Ok(value)
    }

    /// Returns true when `size` bytes at `offset` would not fit in the storage.
    pub fn would_overflow(&self, size: usize, offset: usize) -> bool {
        offset
            .checked_add(size)
            .map_or(true, |end| end > self.storage.as_ref().len())
    }
}

impl Cursor<Vec<u8>> {
    /// Grows the storage, zero-filled, so that `size` bytes fit at `offset`.
    fn reserve_at(&mut self, offset: usize, size: usize) {
        let min_len = offset.saturating_add(size);
        if self.storage.len() < min_len {
            tracing::trace!(from = self.storage.len(), to = min_len, "growing buffer");
            self.storage.resize(min_len, 0);
        }
    }

    /// Grows the storage to hold `size` bytes at the resolved offset, then runs `write`, which
    /// returns the offset just past the bytes it produced. Without an explicit offset, the cursor
    /// moves to that returned offset rather than to `offset + size`, so writers that produce
    /// fewer bytes than reserved (truncated text, capped byte copies) position it correctly.
    #[inline]
    pub fn execute_write(
        &mut self,
        size: usize,
        offset: Option<usize>,
        write: impl FnOnce(&mut [u8], usize) -> Result<usize>,
    ) -> Result<()> {
        let at = self.resolve(offset);
        self.reserve_at(at, size);
        let end = write(self.storage.as_mut_slice(), at)?;
        if offset.is_none() {
            self.position = end;
        }
        Ok(())
    }
}

/// Navigation shared by readers and writers.
pub trait CursorAccess {
    /// Storage type behind the cursor.
    type Storage: AsRef<[u8]>;

    /// The cursor core.
    fn cursor(&self) -> &Cursor<Self::Storage>;

    /// The cursor core, mutably.
    fn cursor_mut(&mut self) -> &mut Cursor<Self::Storage>;

    /// The whole underlying buffer.
    fn buffer(&self) -> &[u8] {
        self.cursor().storage().as_ref()
    }

    /// Current cursor position.
    fn offset(&self) -> usize {
        self.cursor().position()
    }

    /// Length of the underlying buffer.
    fn len(&self) -> usize {
        self.buffer().len()
    }

    /// Returns true if the underlying buffer is empty.
    fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    /// Default byte order.
    fn endian(&self) -> Endian {
        self.cursor().endian()
    }

    /// Moves the cursor forward by `count` bytes without checking the buffer length.
    fn skip(&mut self, count: usize) {
        let cursor = self.cursor_mut();
        let position = cursor.position().saturating_add(count);
        cursor.set_position(position);
    }

    /// Moves the cursor to `offset` without checking the buffer length.
    fn skip_to(&mut self, offset: usize) {
        self.cursor_mut().set_position(offset);
    }

    /// True while the cursor is before the end of the buffer.
    fn is_before_end(&self) -> bool {
        self.offset() < self.len()
    }

    /// Returns true when `size` bytes at `offset` would not fit in the buffer.
    fn would_overflow(&self, size: usize, offset: usize) -> bool {
        self.cursor().would_overflow(size, offset)
    }

    /// The bytes before the cursor, i.e. what has been written (or read) so far.
    fn trim(&self) -> &[u8] {
        let data = self.buffer();
        &data[..self.offset().min(data.len())]
    }

    /// A view relative to the cursor: it starts `start` bytes after the cursor (default 0) and
    /// ends `length` bytes after the cursor (default: at the end of the buffer). The range is
    /// clamped to the buffer. A `length` of `Some(0)` is an empty view, not "to the end".
    fn slice(&self, start: Option<usize>, length: Option<usize>) -> &[u8] {
        let data = self.buffer();
        let position = self.offset();
        let from = position.saturating_add(start.unwrap_or(0)).min(data.len());
        let to = match length {
            Some(length) => position.saturating_add(length).min(data.len()),
            None => data.len(),
        };
        &data[from..to.max(from)]
    }
}
