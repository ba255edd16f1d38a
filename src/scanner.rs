use memchr::{memchr2_iter, memrchr};

pub const OPEN_BRACE: u8 = b'{';
pub const CLOSE_BRACE: u8 = b'}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brace {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracePosition {
    pub offset: usize,
    pub brace: Brace,
}

/// Reports every `{` and `}` byte of `buf` in ascending offset order.
///
/// Nothing is interpreted: a brace inside a JSON string counts exactly like a
/// structural one, so this is only sound for payloads whose string values
/// never contain literal braces.
pub fn scan_braces(buf: &[u8]) -> impl Iterator<Item = BracePosition> + '_ {
    memchr2_iter(OPEN_BRACE, CLOSE_BRACE, buf).map(move |offset| BracePosition {
        offset,
        brace: if buf[offset] == OPEN_BRACE {
            Brace::Open
        } else {
            Brace::Close
        },
    })
}

/// Offset of the last `{` in `buf`, searching backwards from its end.
pub fn rfind_open_brace(buf: &[u8]) -> Option<usize> {
    memrchr(OPEN_BRACE, buf)
}
