/// Lowercases a title and joins its alphanumeric runs with `-`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch != '\'' {
            pending_dash = true;
        }
    }

    slug
}

/// Course slug, made unique by the row id
pub fn course_slug(title: &str, id: i32) -> String {
    let base = slugify(title);
    if base.is_empty() {
        id.to_string()
    } else {
        format!("{base}-{id}")
    }
}

/// Renders a lecture length as `"{minutes}m {seconds}s"`, flooring both parts
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    format!("{}m {}s", total / 60, total % 60)
}

/// Media references that were already issued by the storage layer come back
/// from clients as absolute URLs
pub fn is_issued_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rust for Beginners"), "rust-for-beginners");
        assert_eq!(slugify("  C++ & Systems!  "), "c-systems");
        assert_eq!(slugify("Don't Panic"), "dont-panic");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_course_slug() {
        assert_eq!(course_slug("Intro to Axum", 42), "intro-to-axum-42");
        assert_eq!(course_slug("!!!", 7), "7");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0m 0s");
        assert_eq!(format_duration(59.9), "0m 59s");
        assert_eq!(format_duration(61.2), "1m 1s");
        assert_eq!(format_duration(3725.0), "62m 5s");
        assert_eq!(format_duration(f64::NAN), "0m 0s");
    }

    #[test]
    fn test_is_issued_url() {
        assert!(is_issued_url("http://cdn.example.com/a.mp4"));
        assert!(is_issued_url("https://cdn.example.com/a.mp4"));
        assert!(!is_issued_url("uploads/a.mp4"));
    }
}
