//! MIME type lookup module
//!
//! Maps a file extension to the Content-Type sent with it. The table is built
//! once at startup and only read afterwards.

use std::collections::HashMap;

/// Built-in extension -> content type entries
const DEFAULT_TYPES: [(&str, &str); 2] = [("css", "text/css"), ("html", "text/html")];

/// Immutable extension -> content type mapping
#[derive(Debug, Clone)]
pub struct MimeTable {
    types: HashMap<String, String>,
}

impl MimeTable {
    /// Build the table from the built-in entries plus configured extras.
    ///
    /// Extras may add extensions or override the content type of a built-in one.
    pub fn with_extras<'a, I>(extras: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut table = Self::default();
        for (ext, content_type) in extras {
            table.types.insert(ext.clone(), content_type.clone());
        }
        table
    }

    /// Get the Content-Type for an extension, `None` if it is not served
    ///
    /// # Examples
    /// ```
    /// use wwwserve::http::mime::MimeTable;
    /// let table = MimeTable::default();
    /// assert_eq!(table.get_content_type("css"), Some("text/css"));
    /// assert_eq!(table.get_content_type("txt"), None);
    /// ```
    pub fn get_content_type(&self, extension: &str) -> Option<&str> {
        self.types.get(extension).map(String::as_str)
    }
}

impl Default for MimeTable {
    fn default() -> Self {
        Self {
            types: DEFAULT_TYPES
                .iter()
                .map(|(ext, content_type)| ((*ext).to_string(), (*content_type).to_string()))
                .collect(),
        }
    }
}
