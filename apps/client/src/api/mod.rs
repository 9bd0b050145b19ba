// Thin endpoint wrappers over the gateway.
// Each one builds a request, sends it once through `ApiClient`, and returns the
// decoded payload or the gateway's error unchanged.

pub mod auth;
pub mod chat;
pub mod health;
pub mod jobfit;
pub mod resumes;
pub mod review;
pub mod search;

/// Percent-encodes a single path segment, leaving the same characters
/// unescaped as JavaScript's `encodeURIComponent`.
pub(crate) fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("job-123_a.b"), "job-123_a.b");
        assert_eq!(encode_path_segment("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_path_segment("café"), "caf%C3%A9");
    }
}
