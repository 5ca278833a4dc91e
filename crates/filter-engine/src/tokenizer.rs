/// Splits raw `/filters` input into labels.
///
/// Input containing a comma is split on commas; anything else is one label.
/// Pieces are trimmed and empty pieces dropped, so `"a, , b,"` yields `["a", "b"]`.
#[must_use]
pub fn split_labels(raw: &str) -> Vec<String> {
    let pieces: Vec<&str> = if raw.contains(',') {
        raw.split(',').collect()
    } else {
        vec![raw]
    };
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
