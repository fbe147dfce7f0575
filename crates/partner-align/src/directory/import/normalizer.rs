pub(crate) fn normalize_header(value: &str) -> String {
    crate::directory::domain::normalize_token(value).replace(' ', "_")
}

/// Splits a spreadsheet cell holding several focus areas.
pub(crate) fn split_focus_areas(value: &str) -> Vec<String> {
    value
        .split([';', '|'])
        .map(str::trim)
        .filter(|area| !area.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) fn normalize_header_for_tests(value: &str) -> String {
    normalize_header(value)
}
