use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating stored filenames on download requests
    /// Must start with an alphanumeric character and contain only
    /// alphanumerics, dots, underscores and hyphens
    /// - Valid: "report.pdf", "3f2a-form.pdf", "notes_v2.txt"
    /// - Invalid: "../secret", ".hidden", "a/b.pdf", "name with spaces"
    pub static ref SAFE_FILENAME_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap();

    /// Characters replaced with '-' when sanitizing client-supplied filenames
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename_regex_valid() {
        assert!(SAFE_FILENAME_REGEX.is_match("report.pdf"));
        assert!(SAFE_FILENAME_REGEX.is_match("3f2a-form.pdf"));
        assert!(SAFE_FILENAME_REGEX.is_match("notes_v2.txt"));
        assert!(SAFE_FILENAME_REGEX.is_match("a"));
        assert!(SAFE_FILENAME_REGEX.is_match("archive.tar.gz"));
    }

    #[test]
    fn test_safe_filename_regex_invalid() {
        assert!(!SAFE_FILENAME_REGEX.is_match("../secret")); // traversal
        assert!(!SAFE_FILENAME_REGEX.is_match("..")); // traversal
        assert!(!SAFE_FILENAME_REGEX.is_match(".hidden")); // leading dot
        assert!(!SAFE_FILENAME_REGEX.is_match("a/b.pdf")); // separator
        assert!(!SAFE_FILENAME_REGEX.is_match("a\\b.pdf")); // separator
        assert!(!SAFE_FILENAME_REGEX.is_match("name with spaces")); // spaces
        assert!(!SAFE_FILENAME_REGEX.is_match("")); // empty
    }
}
