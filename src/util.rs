use std::path::{Path, PathBuf};

pub(crate) fn endpoint_url(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    let endpoint = endpoint.trim_matches('/');
    format!("{}/{}/", base, endpoint)
}

/// Expands a leading `~` to the user's home directory.
pub(crate) fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Replaces characters that are not allowed in file names on common platforms.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "download".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Appends `.<ext>` without touching any dot already in the name.
pub(crate) fn with_extension_appended(path: &Path, ext: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_normalizes_slashes() {
        assert_eq!(
            endpoint_url("https://api.helioviewer.org/v2/", "getStatus"),
            "https://api.helioviewer.org/v2/getStatus/"
        );
        assert_eq!(endpoint_url("http://localhost/v2", "/getTile/"), "http://localhost/v2/getTile/");
    }

    #[test]
    fn home_expansion() {
        let plain = Path::new("movies/out.mp4");
        assert_eq!(expand_home(plain), plain);
        // `~user` is not a home reference
        assert_eq!(expand_home(Path::new("~other/x")), Path::new("~other/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/out.mp4")), home.join("out.mp4"));
            assert_eq!(expand_home(Path::new("~")), home);
        }
    }

    #[test]
    fn sanitizes_derived_names() {
        assert_eq!(
            sanitize_filename("AIA 171 (2022-01-01 00:00:00 - 00:05:00 UTC)"),
            "AIA 171 (2022-01-01 00_00_00 - 00_05_00 UTC)"
        );
        assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_filename("  "), "download");
        assert_eq!(sanitize_filename(".."), "download");
    }

    #[test]
    fn extension_is_appended() {
        assert_eq!(
            with_extension_appended(Path::new("/tmp/my.movie"), "mp4"),
            Path::new("/tmp/my.movie.mp4")
        );
    }
}
