//! YouTube video ID extraction and template selection

use std::sync::LazyLock;

use regex::Regex;

/// Length of a YouTube video ID
pub const VIDEO_ID_LEN: usize = 11;

// Known URL shapes: watch?v=, &v=, youtu.be/, embed/, v/, u/<x>/
#[allow(clippy::expect_used)]
static VIDEO_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/[A-Za-z0-9_]/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("Invalid regex")
});

/// Extract the 11-character video ID from a YouTube URL
///
/// The captured run stops at `#`, `&` or `?`; anything other than exactly eleven
/// characters is treated as unparseable.
///
/// ```
/// use courseforge_generator::youtube::extract_video_id;
///
/// assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
/// assert_eq!(extract_video_id("https://example.com/watch"), None);
/// ```
pub fn extract_video_id(url: &str) -> Option<&str> {
    let captures = VIDEO_ID_PATTERN.captures(url)?;
    let id = captures.get(2)?.as_str();
    (id.encode_utf16().count() == VIDEO_ID_LEN).then_some(id)
}

/// Template index for a video ID: sum of UTF-16 code units modulo `template_count`
///
/// Returns 0 when `template_count` is 0; callers only pass validated catalogs.
pub fn template_index(video_id: &str, template_count: usize) -> usize {
    if template_count == 0 {
        return 0;
    }
    let sum: u64 = video_id.encode_utf16().map(u64::from).sum();
    (sum % template_count as u64) as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_url_shapes() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ#t=10",
            "https://www.youtube.com/u/w/dQw4w9WgXcQ",
        ];
        for url in cases {
            assert_eq!(extract_video_id(url), Some("dQw4w9WgXcQ"), "url: {url}");
        }
    }

    #[test]
    fn test_wrong_length_is_unparseable() {
        assert_eq!(extract_video_id("https://youtu.be/short"), None);
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQx"), None);
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_template_index() {
        // d Q w 4 w 9 W g X c Q sums to 986
        assert_eq!(template_index("dQw4w9WgXcQ", 3), 986 % 3);
        assert_eq!(template_index("dQw4w9WgXcQ", 1), 0);
        assert_eq!(template_index("anything", 0), 0);
    }
}
