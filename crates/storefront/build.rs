//! Build script for the storefront crate.
//!
//! Generates a content hash for the stylesheet so templates can reference an
//! immutable, cache-friendly filename.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    let Ok(content) = fs::read(&css_path) else {
        // Stylesheet may not exist yet during a fresh checkout
        println!("cargo:warning=static/css/main.css not found, skipping hash");
        println!("cargo:rustc-env=CSS_HASH=");
        return;
    };

    // First 8 hex chars of SHA256 are plenty for cache busting
    let digest = format!("{:x}", Sha256::digest(&content));
    let short_hash = &digest[..8];

    println!("cargo:rustc-env=CSS_HASH={short_hash}");

    // Copy to a derived file carrying the hash in its name
    let derived_dir = Path::new(&manifest_dir).join("static/css/derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived CSS directory");
    fs::copy(&css_path, derived_dir.join(format!("main.{short_hash}.css")))
        .expect("Failed to copy CSS to derived directory");
}
