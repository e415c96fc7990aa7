//! Build information
//!
//! Compile-time build counter and timestamp, printed in the startup banner.

use std::fmt;

/// Build number, bumped by build.rs on each recompilation
pub const BUILD_NUMBER: u64 = match option_env!("FDC_BRANDED_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("FDC_BRANDED_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut result: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return None;
        }
        result = result * 10 + (b - b'0') as u64;
        i += 1;
    }
    Some(result)
}

/// Identity of the running binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (build {}, compiled {})",
            self.name, self.version, self.build_number, self.build_timestamp
        )
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    let rule = "=".repeat(47);
    eprintln!("{rule}");
    eprintln!("  FDC Branded Foods merger");
    eprintln!("  {}", BuildInfo::current());
    eprintln!("{rule}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64() {
        assert_eq!(parse_u64("42"), Some(42));
        assert_eq!(parse_u64("4x2"), None);
        assert_eq!(parse_u64(""), None);
    }

    #[test]
    fn test_display() {
        let info = BuildInfo {
            name: "fdc-branded",
            version: "1.0.0",
            build_number: 7,
            build_timestamp: "2024-04-01T00:00:00Z",
        };
        assert_eq!(
            info.to_string(),
            "fdc-branded 1.0.0 (build 7, compiled 2024-04-01T00:00:00Z)"
        );
    }
}
