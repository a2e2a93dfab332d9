// Linux-specific helpers: /proc readers.

/// Parse the first field of /proc/uptime (seconds since boot, fractional).
pub(super) fn parse_proc_uptime(content: &str) -> Option<f64> {
    content
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Read uptime with sub-second precision from /proc/uptime (Linux).
pub(super) fn read_uptime_linux() -> Option<f64> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/uptime").ok()?;
        parse_proc_uptime(&content)
    }
    #[cfg(not(target_os = "linux"))]
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fractional_uptime() {
        assert_eq!(parse_proc_uptime("120.50 340.12\n"), Some(120.5));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_proc_uptime(""), None);
        assert_eq!(parse_proc_uptime("abc 1.0"), None);
        assert_eq!(parse_proc_uptime("-3.0 1.0"), None);
    }
}
