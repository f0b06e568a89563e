// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_shorthand_message(repeats: usize) -> String {
    let base = "Some **bold** words, __italic__ and ~~struck~~ text with `code`, ||hidden|| bits and ```block```.<br>";
    base.repeat(repeats)
}

#[allow(dead_code)]
pub fn generate_tagged_message(repeats: usize) -> String {
    let base = r#"<div><b>Bold</b> <i>it</i> <a href="https://example.test">link</a> <img alt=":)"> &lt;tag&gt;</div>"#;
    base.repeat(repeats)
}
