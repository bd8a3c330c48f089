use std::fmt;

const VISIBLE_PREFIX: usize = 4;

/// Debug view of a secret: a short prefix and the length, never the value.
pub(crate) struct Redacted<'a>(pub(crate) &'a str);

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0.trim();
        let len = value.chars().count();

        // Short values would leak most of themselves through the prefix.
        if len <= VISIBLE_PREFIX * 2 {
            return write!(f, "<redacted>");
        }

        let prefix: String = value.chars().take(VISIBLE_PREFIX).collect();
        write!(f, "\"{prefix}...\" ({len} chars)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_short_values_entirely() {
        assert_eq!(format!("{:?}", Redacted("")), "<redacted>");
        assert_eq!(format!("{:?}", Redacted("   ")), "<redacted>");
        assert_eq!(format!("{:?}", Redacted("12345678")), "<redacted>");
    }

    #[test]
    fn shows_prefix_and_length_of_receipts() {
        let out = format!("{:?}", Redacted("AQ1bc2de3fg4hi5jk6"));
        assert_eq!(out, "\"AQ1b...\" (18 chars)");
        assert!(!out.contains("5jk6"));
    }
}
