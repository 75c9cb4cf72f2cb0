//! Couplet splitting and pagination for song lyrics.

use crate::pagination::Page;

/// Split lyrics into couplets.
///
/// Literal `\n` escape sequences (as sent by some clients) and `\r\n` line
/// endings are normalised to `\n` first. Couplets are separated by one or
/// more blank lines; leading and trailing newlines of each couplet are
/// dropped, as are empty couplets.
///
/// # Examples
///
/// ```
/// use musiclib_core::lyrics::split_couplets;
///
/// let couplets = split_couplets("one\ntwo\n\nthree");
/// assert_eq!(couplets, vec!["one\ntwo", "three"]);
/// ```
pub fn split_couplets(text: &str) -> Vec<String> {
    let normalised = text.replace("\\n", "\n").replace("\r\n", "\n");

    normalised
        .split("\n\n")
        .map(|c| c.trim_matches('\n'))
        .filter(|c| !c.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Return the couplets selected by `page`.
///
/// A song without text, or an offset past the last couplet, yields an empty
/// list.
pub fn paginate_couplets(text: Option<&str>, page: Page) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(0);

    split_couplets(text)
        .into_iter()
        .skip(offset)
        .take(limit)
        .collect()
}
