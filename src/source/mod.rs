/*!
Character sources provide bounded random access into a character sequence.

The matcher never touches text directly. Instead, it asks a [`CharSource`]
for the character at some offset relative to a cursor. This makes it possible
to run exactly the same matching code over an in-memory buffer
([`CharBuffer`]) and over a forward-only reader ([`StreamSource`]).

Every source upholds one contract: asking for a character at an offset with
no data behind it returns `None` and never panics. `None` plays the role of
an out-of-bounds sentinel. The matcher treats it as "no character here",
which is what makes `$`, `\Z` and word boundaries work at the edges of the
data.
*/

pub use self::{buffer::CharBuffer, stream::StreamSource};

mod buffer;
mod stream;

/// A source of characters with a cursor.
///
/// Offsets given to [`CharSource::char_at`] are relative to the cursor and
/// may be negative. Implementations are free to return `None` for negative
/// offsets they cannot serve, but must return `None` (and not panic) for any
/// offset outside the data they hold.
///
/// Methods take `&mut self` so that lazily filled sources, like
/// [`StreamSource`], can read ahead on demand.
pub trait CharSource {
    /// Returns the character at `cursor + offset`, or `None` if there is no
    /// character there.
    fn char_at(&mut self, offset: isize) -> Option<char>;

    /// Advances the cursor by `n` characters, stopping at the end of the
    /// data. Returns whether the cursor is still valid afterwards (see
    /// [`CharSource::is_valid`]).
    fn advance(&mut self, n: usize) -> bool;

    /// Returns true when the cursor points at a character. That is, when the
    /// cursor has not yet reached the end of the data.
    fn is_valid(&mut self) -> bool {
        self.char_at(0).is_some()
    }

    /// Returns the absolute offset of the cursor, counted in characters from
    /// the start of the data.
    fn position(&self) -> usize;
}

impl<'a, S: CharSource + ?Sized> CharSource for &'a mut S {
    fn char_at(&mut self, offset: isize) -> Option<char> {
        (**self).char_at(offset)
    }

    fn advance(&mut self, n: usize) -> bool {
        (**self).advance(n)
    }

    fn is_valid(&mut self) -> bool {
        (**self).is_valid()
    }

    fn position(&self) -> usize {
        (**self).position()
    }
}
