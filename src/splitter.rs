//! Splits a generated code reply into individual files.
//!
//! The generation prompts ask the model to start every file with a marker
//! line of the form `// FILE: <path>`. Everything after a marker, up to the
//! next marker or the end of the reply, is that file's content.

use std::collections::BTreeMap;

/// Marker token that opens a new file.
pub const FILE_MARKER: &str = "// FILE: ";

/// Path -> content mapping recovered from one reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFileSet {
    files: BTreeMap<String, String>,
}

impl GeneratedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the content for a path.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    #[cfg(test)]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All entries, including an empty-path entry if the reply had one.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    /// Entries that can be written out. An empty path is not a file.
    pub fn usable_files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(path, _)| !path.is_empty())
    }

    pub fn usable_count(&self) -> usize {
        self.usable_files().count()
    }

    /// Rebuild the marker-delimited text for this set.
    #[cfg(test)]
    pub fn to_marked_text(&self) -> String {
        self.iter()
            .map(|(path, content)| format!("{}{}\n{}", FILE_MARKER, path, content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<(String, String)> for GeneratedFileSet {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// Split a reply into files.
///
/// Lines before the first marker are dropped. A path seen twice keeps the
/// content of its last occurrence.
pub fn split_generated_code(text: &str) -> GeneratedFileSet {
    let mut files = GeneratedFileSet::new();
    let mut current: Option<String> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(FILE_MARKER) {
            if let Some(path) = current.take() {
                files.insert(path, buffer.join("\n").trim());
            }
            current = Some(rest.trim().to_string());
            buffer.clear();
        } else if current.is_some() {
            buffer.push(line);
        }
    }

    if let Some(path) = current {
        files.insert(path, buffer.join("\n").trim());
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers_yields_empty_set() {
        assert!(split_generated_code("").is_empty());
        assert!(split_generated_code("public class A {}\n// not a marker").is_empty());
        assert!(split_generated_code("//FILE: A.java\nclass A{}").is_empty());
    }

    #[test]
    fn test_noise_before_first_marker_is_dropped() {
        let files =
            split_generated_code("noise\n// FILE: A.java\nclass A{}\n// FILE: B.java\nclass B{}\n");
        assert_eq!(files.len(), 2);
        assert_eq!(files.get("A.java"), Some("class A{}"));
        assert_eq!(files.get("B.java"), Some("class B{}"));
    }

    #[test]
    fn test_content_is_trimmed_as_a_block() {
        let text = "// FILE:   src/Page.java  \n\n  package pages;\n\npublic class Page {}\n\n";
        let files = split_generated_code(text);
        assert_eq!(
            files.get("src/Page.java"),
            Some("package pages;\n\npublic class Page {}")
        );
    }

    #[test]
    fn test_duplicate_path_keeps_last() {
        let text = "// FILE: A.java\nfirst\n// FILE: B.java\nb\n// FILE: A.java\nsecond";
        let files = split_generated_code(text);
        assert_eq!(files.len(), 2);
        assert_eq!(files.get("A.java"), Some("second"));
    }

    #[test]
    fn test_marker_without_content() {
        let files = split_generated_code("// FILE: Empty.java\n// FILE: B.java\nb");
        assert_eq!(files.get("Empty.java"), Some(""));
        assert_eq!(files.get("B.java"), Some("b"));
    }

    #[test]
    fn test_empty_path_is_kept_but_not_usable() {
        let files = split_generated_code("// FILE:    \norphan\n// FILE: A.java\na");
        assert_eq!(files.len(), 2);
        assert_eq!(files.get(""), Some("orphan"));
        assert_eq!(files.usable_count(), 1);
        assert_eq!(files.usable_files().next(), Some(("A.java", "a")));
    }

    #[test]
    fn test_marked_text_round_trip() {
        let original: GeneratedFileSet = [
            (
                "src/test/java/LoginTest.java".to_string(),
                "public class LoginTest {\n    @Test\n    void login() {}\n}".to_string(),
            ),
            (
                "src/main/java/pages/LoginPage.java".to_string(),
                "public class LoginPage {}".to_string(),
            ),
            ("testng.xml".to_string(), "<suite name=\"qe\"/>".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(split_generated_code(&original.to_marked_text()), original);
    }

    #[test]
    fn test_crlf_input() {
        let files = split_generated_code("// FILE: A.java\r\nclass A{}\r\n");
        assert_eq!(files.get("A.java"), Some("class A{}"));
    }
}
