//! Combining per-file extracted text into one analyzable document.

/// Delimiter line prefix marking the start of each file's text.
pub const FILE_DELIMITER: &str = "NEW FILE:";

/// Concatenate per-file text blocks in upload order.
///
/// Each block is `"NEW FILE:" + filename + "\n" + text + "\n"`. Filenames
/// are not escaped; a filename containing the delimiter text itself will
/// corrupt downstream attribution. Downstream consumers that ever need
/// per-file attribution must re-split on the literal marker.
pub fn aggregate(files: &[(String, String)]) -> String {
    let mut combined = String::new();
    for (filename, text) in files {
        combined.push_str(FILE_DELIMITER);
        combined.push_str(filename);
        combined.push('\n');
        combined.push_str(text);
        combined.push('\n');
    }
    combined
}
