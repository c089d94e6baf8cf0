//! ANSI color codes for stream dumps and analyzer output.
//!
//! - Blue: object ids and binding chains
//! - Green: string payloads
//! - Yellow: record tags
//! - Dim: counts, separators, positions

/// ANSI palette. Standard 16-color codes only.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    pub id: &'static str,
    pub literal: &'static str,
    pub tag: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        id: "\x1b[34m",
        literal: "\x1b[32m",
        tag: "\x1b[33m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        id: "",
        literal: "",
        tag: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }
}
