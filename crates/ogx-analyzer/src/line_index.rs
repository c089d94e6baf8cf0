//! Byte offset to line/column mapping.

use ogx_core::Position;
use rowan::TextSize;

/// Start offsets of every line. `\n`, `\r\n` and a lone `\r` all end a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![TextSize::from(0)];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    i += 2;
                    starts.push(TextSize::from(i as u32));
                }
                b'\n' | b'\r' => {
                    i += 1;
                    starts.push(TextSize::from(i as u32));
                }
                _ => i += 1,
            }
        }
        Self {
            starts,
            len: TextSize::from(text.len() as u32),
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Position of `offset`. Offsets past the end clamp to the end.
    pub fn position(&self, offset: TextSize) -> Position {
        let offset = offset.min(self.len);
        let line = self.starts.partition_point(|&start| start <= offset) - 1;
        let column = offset - self.starts[line];
        Position::new(line as u32 + 1, u32::from(column))
    }

    /// 1-based line of `offset`.
    pub fn line(&self, offset: TextSize) -> u32 {
        self.position(offset).line
    }

    /// Offset where the 1-based `line` starts.
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        let index = usize::try_from(line).ok()?.checked_sub(1)?;
        self.starts.get(index).copied()
    }
}
