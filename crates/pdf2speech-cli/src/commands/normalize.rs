//! Normalize command implementation.

use text_normalizer::normalize;

/// Run the normalize command.
pub fn run(input: &str) {
    let result = normalize(input);

    println!("Input:      {input}");
    println!("Normalized: {result}");
    println!(
        "Chars:      {} -> {}",
        input.chars().count(),
        result.as_str().chars().count()
    );
}
