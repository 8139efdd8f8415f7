//! Pure text-formatting helpers shared by the tool handlers.

use serde_json::Value;

/// Status glyph for nodes and guests.
pub fn status_glyph(status: &str) -> &'static str {
    match status {
        "running" | "online" => "\u{1f7e2}",
        "stopped" | "offline" => "\u{1f534}",
        _ => "\u{1f7e1}",
    }
}

/// Type glyph for guests.
pub fn kind_glyph(kind: crate::proxmox::guests::GuestKind) -> &'static str {
    match kind {
        crate::proxmox::guests::GuestKind::Qemu => "\u{1f5a5}\u{fe0f}",
        crate::proxmox::guests::GuestKind::Lxc => "\u{1f4e6}",
    }
}

/// `3d 4h 5m`, dropping leading zero units. Never shows seconds.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Human-readable byte count, base 1024, at most two decimals with trailing
/// zeros stripped.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (value * 100.0).round() / 100.0;

    let mut s = format!("{:.2}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }

    format!("{} {}", s, UNITS[exp])
}

/// Percentage with one decimal; `N/A` when the denominator is zero or absent.
pub fn percent(used: f64, total: f64) -> String {
    if total <= 0.0 {
        "N/A".to_string()
    } else {
        format!("{:.1}%", used / total * 100.0)
    }
}

/// CPU fraction (0.0..=1.0) as a percentage with one decimal.
pub fn cpu_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// `used / total (pct)` line, or `N/A` when either side is missing.
pub fn usage_line(used: Option<u64>, total: Option<u64>) -> String {
    match (used, total) {
        (Some(u), Some(t)) => format!(
            "{} / {} ({})",
            format_bytes(u),
            format_bytes(t),
            percent(u as f64, t as f64)
        ),
        _ => "N/A".to_string(),
    }
}

/// Proxmox reports load averages as strings; tolerate numbers too.
pub fn load_sample(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime_minutes_only() {
        assert_eq!(format_uptime(0), "0m");
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(60), "1m");
        assert_eq!(format_uptime(3599), "59m");
    }

    #[test]
    fn test_format_uptime_hours() {
        assert_eq!(format_uptime(3600), "1h 0m");
        assert_eq!(format_uptime(3661), "1h 1m");
        assert_eq!(format_uptime(86399), "23h 59m");
    }

    #[test]
    fn test_format_uptime_days() {
        assert_eq!(format_uptime(86400), "1d 0h 0m");
        assert_eq!(format_uptime(90061), "1d 1h 1m");
        assert_eq!(format_uptime(3 * 86400 + 4 * 3600 + 5 * 60 + 59), "3d 4h 5m");
    }

    #[test]
    fn test_format_bytes_zero() {
        assert_eq!(format_bytes(0), "0 B");
    }

    #[test]
    fn test_format_bytes_units() {
        assert_eq!(format_bytes(1), "1 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5 GB");
        assert_eq!(format_bytes(1024_u64.pow(4)), "1 TB");
    }

    #[test]
    fn test_format_bytes_rounding() {
        // 1.625 KB rounds to 1.63, trailing zeros stripped elsewhere
        assert_eq!(format_bytes(1664), "1.63 KB");
        assert_eq!(format_bytes(1126), "1.1 KB");
    }

    #[test]
    fn test_format_bytes_roundtrip_within_tolerance() {
        const UNITS: [(u32, &str); 5] = [(0, "B"), (1, "KB"), (2, "MB"), (3, "GB"), (4, "TB")];
        for b in [1u64, 512, 2047, 4096, 123_456_789, 9_876_543_210] {
            let s = format_bytes(b);
            let (num, unit) = s.split_once(' ').unwrap();
            let parsed: f64 = num.parse().unwrap();
            let exp = UNITS.iter().find(|(_, u)| *u == unit).unwrap().0;
            let expected = b as f64 / 1024f64.powi(exp as i32);
            assert!(
                (parsed - expected).abs() < 0.01,
                "{} -> {} off by more than 0.01",
                b,
                s
            );
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(750.0, 2000.0), "37.5%");
        assert_eq!(percent(1.0, 0.0), "N/A");
        assert_eq!(percent(0.0, 0.0), "N/A");
    }

    #[test]
    fn test_load_sample() {
        assert_eq!(load_sample(&serde_json::json!("0.52")), Some("0.52".into()));
        assert_eq!(load_sample(&serde_json::json!(1.5)), Some("1.5".into()));
        assert_eq!(load_sample(&serde_json::Value::Null), None);
    }
}
