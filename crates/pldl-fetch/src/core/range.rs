/// Build the `Range` header value that asks for everything from `offset` on.
///
/// An offset of zero still yields `bytes=0-`, which servers treat as the
/// whole resource.
pub fn range_header(offset: u64) -> String {
    format!("bytes={offset}-")
}
