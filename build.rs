//! Build script: stamps build metadata into the binary
//!
//! Release pipelines may set FILTERSNATCH_BUILD_TYPE together with
//! FILTERSNATCH_VERSION_TAG and/or FILTERSNATCH_GIT_COMMIT. When they do,
//! the app shows "Version <type>-<tag or commit>" in its status bar.

fn main() {
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=FILTERSNATCH_BUILD_DATE={}", build_date);

    for key in [
        "FILTERSNATCH_BUILD_TYPE",
        "FILTERSNATCH_VERSION_TAG",
        "FILTERSNATCH_GIT_COMMIT",
    ] {
        println!("cargo:rerun-if-env-changed={}", key);
        let value = std::env::var(key).unwrap_or_default();
        println!("cargo:rustc-env={}={}", key, value);
    }
}
