//! Pluralization for summary lines.

/// `""` for one, `"s"` otherwise.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `plural_count(3, "source")` -> `"3 sources"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "source"), "0 sources");
        assert_eq!(plural_count(1, "source"), "1 source");
        assert_eq!(plural_count(7, "output"), "7 outputs");
    }
}
