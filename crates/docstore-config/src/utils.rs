use std::{env, path::PathBuf, time::Duration};

/// Returns the user's home directory, falling back to `/root` when `HOME` is unset.
pub fn home_dir() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/root"))
}

/// Returns the user's config directory following the XDG Base Directory Specification.
///
/// Checks `XDG_CONFIG_HOME` first and defaults to `$HOME/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Parses a duration string such as `1m30s` or `250ms`.
///
/// The string is a sequence of `<digits><unit>` pairs where the unit is one of
/// `ms`, `s`, `m`, `h` or `d`. Returns `None` for malformed input, a missing
/// unit, or arithmetic overflow. The empty string parses to zero.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use docstore_config::utils::parse_duration;
///
/// assert_eq!(parse_duration("1m30s"), Some(Duration::from_secs(90)));
/// ```
pub fn parse_duration(input: &str) -> Option<Duration> {
    let mut total: u64 = 0;
    let mut chars = input.chars().peekable();

    while chars.peek().is_some() {
        let mut number_str = String::new();
        while let Some(c) = chars.peek() {
            if c.is_ascii_digit() {
                number_str.push(chars.next()?);
            } else {
                break;
            }
        }

        if number_str.is_empty() {
            return None;
        }

        let number: u64 = number_str.parse().ok()?;
        let multiplier = match chars.next()? {
            'm' if chars.peek() == Some(&'s') => {
                chars.next();
                1
            }
            's' => 1000,
            'm' => 60 * 1000,
            'h' => 60 * 60 * 1000,
            'd' => 24 * 60 * 60 * 1000,
            _ => return None,
        };

        total = total.checked_add(number.checked_mul(multiplier)?)?;
    }

    Some(Duration::from_millis(total))
}
