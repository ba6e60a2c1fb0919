fn main() {
    println!("cargo:rerun-if-changed=navigator.toml");

    // The config is embedded with include_str!, so reject a broken file here rather
    // than silently running on defaults in the browser.
    let source = std::fs::read_to_string("navigator.toml").unwrap_or_else(|error| {
        panic!("cannot read navigator.toml: {error}");
    });
    if let Err(error) = engine::NavigatorConfig::from_toml_str(&source) {
        panic!("navigator.toml is invalid: {error}");
    }
}
