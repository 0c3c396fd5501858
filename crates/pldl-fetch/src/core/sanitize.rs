use once_cell::sync::Lazy;
use regex::Regex;

static FORBIDDEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[\\/*?:"<>|]"#).unwrap()
});

/// Strip characters that common filesystems reject in file names.
///
/// Removes every `\ / * ? : " < > |`. All other characters, including spaces
/// and non-ASCII text, pass through untouched. A title made only of forbidden
/// characters becomes the empty string.
///
/// # Examples
///
/// ```
/// use pldl_fetch::sanitize_filename;
///
/// assert_eq!(sanitize_filename("AC/DC: Live?"), "ACDC Live");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    FORBIDDEN.replace_all(title, "").into_owned()
}
