//! Build script for fdc-branded
//!
//! Bumps the local build counter and embeds build metadata for the banner.

use std::fs;
use std::path::Path;

fn main() {
    // Only rerun when src/ files change
    println!("cargo:rerun-if-changed=src");

    let build_number_path = Path::new("build_number.txt");

    let previous: u64 = fs::read_to_string(build_number_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let build_number = previous + 1;

    fs::write(build_number_path, build_number.to_string())
        .expect("Failed to write build number file");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=FDC_BRANDED_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=FDC_BRANDED_BUILD_TIMESTAMP={}", timestamp);
}
