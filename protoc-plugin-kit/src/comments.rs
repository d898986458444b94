use std::collections::hash_map::Entry;
use std::collections::HashMap;

use itertools::Itertools;
use log::warn;
use prost_types::source_code_info::Location;
use prost_types::SourceCodeInfo;

/// The formatted comment used when a declaration has none.
pub const EMPTY_COMMENT: &str = "\"\"";

/// Comments on the declarations of one `.proto` file, indexed by location path.
#[derive(Debug, Default, Clone)]
pub struct CommentIndex {
    by_path: HashMap<Vec<i32>, String>,
}

impl CommentIndex {
    /// Indexes every location carrying a leading or trailing comment.
    ///
    /// Detached comments are ignored. When two locations share a path the first
    /// one wins.
    pub fn from_source_info(source_info: Option<&SourceCodeInfo>) -> Self {
        let mut by_path = HashMap::new();
        let locations = source_info.map_or(&[][..], |info| info.location.as_slice());
        for location in locations {
            let Some(comment) = comment_of(location) else {
                continue;
            };
            match by_path.entry(location.path.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(comment);
                }
                Entry::Occupied(_) => {
                    warn!("Discarding comment due to duplicate path: {}", comment);
                }
            }
        }
        CommentIndex { by_path }
    }

    /// The raw comment text at `path`.
    pub fn get(&self, path: &[i32]) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

/// Leading comments followed by trailing comments. Both already end in a
/// newline, so they are concatenated as-is.
fn comment_of(location: &Location) -> Option<String> {
    match (&location.leading_comments, &location.trailing_comments) {
        (None, None) => None,
        (leading, trailing) => {
            let mut comment = String::new();
            if let Some(leading) = leading {
                comment.push_str(leading);
            }
            if let Some(trailing) = trailing {
                comment.push_str(trailing);
            }
            Some(comment)
        }
    }
}

/// Formats a comment into a Java string expression that can be embedded in
/// generated code.
///
/// For example:
///
/// ```text
///   comment saying "stuff" and
///
///   line2
/// ```
///
/// becomes `"comment saying \"stuff\" and\n" + "line2"`.
pub fn format_comment(comment: Option<&str>) -> String {
    let Some(comment) = comment else {
        return EMPTY_COMMENT.to_owned();
    };
    let quoted = format!("\"{}\"", comment.trim().replace('"', "\\\""));
    quoted
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .join("\\n\" + \"")
}
