use regex::bytes::Captures;

/// Sequential reader over the capture groups of a matched sentence
///
/// Optional groups may be absent or empty. `has_next` steps over such a group
/// and reports false, so callers walk the fields in wire order and only
/// consume what was actually transmitted.
pub struct CaptureCursor<'h> {
    captures: Captures<'h>,
    pos: usize,
}

impl<'h> CaptureCursor<'h> {
    pub fn new(captures: Captures<'h>) -> Self {
        // Group 0 is the whole match
        Self { captures, pos: 1 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check that the next group carries text, skipping it otherwise
    pub fn has_next(&mut self) -> bool {
        self.has_next_n(1)
    }

    /// Check that the next `count` groups all carry text
    ///
    /// When any of them is absent or empty the whole run is skipped.
    pub fn has_next_n(&mut self, count: usize) -> bool {
        let present = (self.pos..self.pos + count).all(|index| {
            self.captures
                .get(index)
                .map(|group| !group.as_bytes().is_empty())
                .unwrap_or(false)
        });
        if !present {
            self.pos += count;
        }
        present
    }

    /// Take the next group verbatim, present or not
    pub fn next_str(&mut self) -> Option<&'h str> {
        let group = self.captures.get(self.pos);
        self.pos += 1;
        group.and_then(|group| std::str::from_utf8(group.as_bytes()).ok())
    }

    /// Next group as an integer; absent, empty or malformed yields `None`
    pub fn next_int(&mut self) -> Option<i64> {
        if !self.has_next() {
            return None;
        }
        self.next_str().and_then(|text| text.parse().ok())
    }

    /// Next group as an unsigned calendar/clock field
    pub fn next_u32(&mut self) -> Option<u32> {
        if !self.has_next() {
            return None;
        }
        self.next_str().and_then(|text| text.parse().ok())
    }

    /// Next group as a decimal; absent, empty or malformed yields `None`
    pub fn next_double(&mut self) -> Option<f64> {
        if !self.has_next() {
            return None;
        }
        self.next_str().and_then(|text| text.parse().ok())
    }

    /// Next three groups as degrees, decimal minutes and hemisphere
    pub fn next_coordinate(&mut self) -> Option<f64> {
        if !self.has_next_n(3) {
            return None;
        }
        let degrees = self.next_str().and_then(|text| text.parse::<i64>().ok());
        let minutes = self.next_str().and_then(|text| text.parse::<f64>().ok());
        let hemisphere = self.next_str();
        Some(crate::conversion::convert_coordinate(
            degrees?,
            minutes?,
            hemisphere?,
        ))
    }
}
