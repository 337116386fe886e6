//! Separator-aware string building.
//!
//! The joining invariant: appending a separator to a buffer is a no-op when
//! the buffer is empty or already ends with that separator. Nested visits
//! append fragments independently, so this is what keeps doubled spaces and
//! commas out of the rendered output.

/// Append `separator` unless the buffer is empty or already ends with it.
pub fn append_if_needed(buffer: &mut String, separator: char) {
    if buffer.is_empty() {
        return;
    }
    if !buffer.ends_with(separator) {
        buffer.push(separator);
    }
}

/// Append each non-empty value, separator-joined per [`append_if_needed`].
pub fn append_join_if_needed<I, S>(buffer: &mut String, separator: char, values: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for value in values {
        let value = value.as_ref();
        if value.is_empty() {
            continue;
        }
        append_if_needed(buffer, separator);
        buffer.push_str(value);
    }
}

/// Join two fragments with a separator, skipping empty sides.
pub fn join_if_needed(left: &str, separator: char, right: &str) -> String {
    let mut out = String::from(left);
    append_join_if_needed(&mut out, separator, [right]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_if_needed_skips_empty_and_duplicate() {
        let mut s = String::new();
        append_if_needed(&mut s, ' ');
        assert_eq!(s, "");

        s.push_str("const");
        append_if_needed(&mut s, ' ');
        append_if_needed(&mut s, ' ');
        assert_eq!(s, "const ");
    }

    #[test]
    fn join_skips_empty_values() {
        let mut s = String::from("const");
        append_join_if_needed(&mut s, ' ', ["", "volatile", ""]);
        assert_eq!(s, "const volatile");

        assert_eq!(join_if_needed("", ' ', "int"), "int");
        assert_eq!(join_if_needed("const", ' ', "int"), "const int");
        assert_eq!(join_if_needed("const", ' ', ""), "const");
    }
}
