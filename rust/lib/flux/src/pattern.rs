/// Whether a `/`-separated path matches a subscription or route pattern.
///
/// `+` matches exactly one segment. `#` matches the remaining segments
/// (zero or more) and is only meaningful as the last segment.
pub fn matches(pattern: &str, path: &str) -> bool {
    let mut pat = pattern.split('/');
    let mut segs = path.split('/');

    loop {
        match (pat.next(), segs.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(p), Some(s)) if p == s => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}
