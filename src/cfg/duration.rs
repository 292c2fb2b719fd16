use std::time::Duration;
use thiserror::Error;

/// 时间字符串解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("expected number at {0:?}")]
    ExpectedNumber(String),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("missing unit after {0}")]
    MissingUnit(String),
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
    #[error("duration out of range: {0}")]
    Overflow(String),
}

/// 解析时间字符串: "1h30m45s" -> Duration
///
/// 支持单位: ns, us/µs, ms, s, m, h, d，允许小数，大小写不敏感。
/// 单独的 "0" 表示零时长。
pub fn parse_duration(s: &str) -> Result<Duration, DurationError> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err(DurationError::Empty);
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let chars: Vec<char> = s.chars().collect();
    let mut total = Duration::ZERO;
    let mut i = 0;

    while i < chars.len() {
        // 解析数字
        let mut num_str = String::new();
        while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
            num_str.push(chars[i]);
            i += 1;
        }
        if num_str.is_empty() {
            return Err(DurationError::ExpectedNumber(chars[i..].iter().collect()));
        }
        let value: f64 = num_str
            .parse()
            .map_err(|_| DurationError::InvalidNumber(num_str.clone()))?;

        // 解析单位
        let mut unit_str = String::new();
        while i < chars.len() && chars[i].is_alphabetic() {
            unit_str.push(chars[i]);
            i += 1;
        }
        if unit_str.is_empty() {
            return Err(DurationError::MissingUnit(num_str));
        }

        let nanos_per_unit: f64 = match unit_str.as_str() {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "d" => 86400e9,
            _ => return Err(DurationError::UnknownUnit(unit_str)),
        };

        let nanos = (value * nanos_per_unit).round();
        if !nanos.is_finite() || nanos > u64::MAX as f64 {
            return Err(DurationError::Overflow(s.clone()));
        }
        total = total
            .checked_add(Duration::from_nanos(nanos as u64))
            .ok_or_else(|| DurationError::Overflow(s.clone()))?;
    }

    Ok(total)
}

/// Duration格式化为字符串: Duration -> "1h30m45s"
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let nanos = duration.subsec_nanos();

    if total_secs == 0 {
        if nanos == 0 {
            return "0s".to_string();
        } else if nanos % 1_000_000 == 0 {
            return format!("{}ms", nanos / 1_000_000);
        } else if nanos % 1_000 == 0 {
            return format!("{}us", nanos / 1_000);
        } else {
            return format!("{}ns", nanos);
        }
    }

    let mut parts = Vec::new();
    let mut remaining = total_secs;

    if remaining >= 86400 {
        parts.push(format!("{}d", remaining / 86400));
        remaining %= 86400;
    }
    if remaining >= 3600 {
        parts.push(format!("{}h", remaining / 3600));
        remaining %= 3600;
    }
    if remaining >= 60 {
        parts.push(format!("{}m", remaining / 60));
        remaining %= 60;
    }

    if nanos == 0 {
        if remaining > 0 {
            parts.push(format!("{}s", remaining));
        }
    } else if nanos % 1_000_000 == 0 {
        parts.push(format!("{}ms", remaining * 1000 + (nanos / 1_000_000) as u64));
    } else {
        // 亚毫秒精度拆成两段，避免丢失
        if remaining > 0 {
            parts.push(format!("{}s", remaining));
        }
        parts.push(format!("{}ns", nanos));
    }

    parts.join("")
}
