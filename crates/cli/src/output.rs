//! Terminal output. The only place the CLI writes to stdout or stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use ruta_segura_admin::components::DataTable;

pub fn line(text: &str) {
    println!("{text}");
}

pub fn heading(text: &str) {
    println!("\n== {text} ==");
}

pub fn table(table: &DataTable) {
    println!("\n{}", table.render());
}

pub fn error(err: &dyn std::fmt::Display) {
    eprintln!("error: {err}");
}
