use crate::services::collection::types::display_name_of;
use crate::services::dimensions::Dimensions;
use crate::services::staging::types::OutputFormat;

const FALLBACK_EXTENSION: &str = "png";

/// Extension of the source file name, without the dot.
pub fn source_extension(source_path: &str) -> Option<String> {
    let name = display_name_of(source_path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_string()),
        _ => None,
    }
}

fn source_stem(source_path: &str) -> String {
    let name = display_name_of(source_path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem.to_string(),
        _ => name,
    }
}

/// `<stem>_resized_<w>x<h>`.
pub fn default_file_stem(source_path: &str, target: Dimensions) -> String {
    format!(
        "{}_resized_{}x{}",
        source_stem(source_path),
        target.width,
        target.height
    )
}

/// Extension a batch in `format` writes for `source_path`.
pub fn output_extension(format: OutputFormat, source_path: &str) -> String {
    match format.fixed_extension() {
        Some(ext) => ext.to_string(),
        None => source_extension(source_path).unwrap_or_else(|| FALLBACK_EXTENSION.to_string()),
    }
}

/// `<directory>/<file_name>.<extension>`, without doubling a trailing separator.
pub fn destination_path(directory: &str, file_name: &str, extension: &str) -> String {
    if directory.ends_with(['/', '\\']) {
        format!("{directory}{file_name}.{extension}")
    } else {
        format!("{directory}/{file_name}.{extension}")
    }
}

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod tests;
