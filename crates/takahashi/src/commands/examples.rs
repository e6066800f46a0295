use colored::Colorize;

use crate::parser;
use crate::source::EXAMPLES;

pub fn run() {
    println!("{}", "Bundled examples:".bold());
    for (name, content) in EXAMPLES {
        let title = parser::get_metadata(content)
            .get("title")
            .cloned()
            .unwrap_or_default();
        println!(
            "  {:<20} {:>3} slides  {}",
            name.cyan(),
            parser::count(content),
            title.dimmed()
        );
    }
    println!();
    println!("Present one with: takahashi --example <name>");
}
