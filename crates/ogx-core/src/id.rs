use std::fmt;

/// Session-scoped object id.
///
/// Allocated monotonically by the writer. `-1` is the end-of-stream sentinel
/// and never names an object.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ObjectId(i64);

impl ObjectId {
    pub const END_OF_STREAM: ObjectId = ObjectId(-1);

    #[inline]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_end_of_stream(self) -> bool {
        self.0 == -1
    }

    /// The id allocated after this one.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
