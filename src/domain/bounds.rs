/// Inclusive character-count window for a generated or crawled field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

pub const TITLE_BOUNDS: LengthBounds = LengthBounds { min: 30, max: 60 };
pub const META_BOUNDS: LengthBounds = LengthBounds { min: 70, max: 155 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthVerdict {
    TooShort,
    InRange,
    TooLong,
}

impl LengthBounds {
    pub fn verdict(&self, len: usize) -> LengthVerdict {
        if len < self.min {
            LengthVerdict::TooShort
        } else if len > self.max {
            LengthVerdict::TooLong
        } else {
            LengthVerdict::InRange
        }
    }

    pub fn contains(&self, len: usize) -> bool {
        self.verdict(len) == LengthVerdict::InRange
    }

    pub fn indicator(&self, len: usize) -> &'static str {
        if self.contains(len) { "✅" } else { "⚠️" }
    }
}

/// Character count as an operator would see it, not the UTF-8 byte length.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
