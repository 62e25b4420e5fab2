#[macro_use]
extern crate log;

mod config;
mod logging;

use clap::Parser;
use mbs::ErrorKind;
use std::fs;
use std::io::{stdin, stdout};
use std::process;

const DEMO: &str = r#"
a = 123;
b = "abc";
c = true;
d = 4.2;
if (c) {
    println("c is true");
}
if (a == 123) {
    println("a is 123");
}
if (c && true) {
    println("c && true");
}
if (b == "abc") {
    println("b is abc");
}
println(b + "123");
for (; false; ) {
}
for (e = 1; e < 4; e = e + 1) {
    println("e");
}
input = readln();
println(input);
for (e = 0; e < 10; e = e + 2) {
    println("*");
}
"#;

fn exit_code(kind: &ErrorKind) -> i32 {
    match kind {
        ErrorKind::Syntax { .. } | ErrorKind::Type(_) => 1,
        ErrorKind::Io => 2,
        _ => 3,
    }
}

fn main() {
    // usage errors exit with 2, --help and --version with 0
    let config = match config::Config::try_parse() {
        Ok(c) => c,
        Err(e) => e.exit(),
    };

    if let Err(e) = logging::setup_logger(config.log_level) {
        eprintln!("error: failed to set up logging: {}", e);
        process::exit(2);
    }

    let source = match &config.script {
        Some(path) => match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {}: {}", path.display(), e);
                process::exit(2);
            }
        },
        None => DEMO.to_owned(),
    };
    info!(
        "running {}",
        config
            .script
            .as_ref()
            .map_or("demo program".to_owned(), |p| p.display().to_string())
    );

    let result = if config.check_only {
        mbs::check(&source).map(|_| ())
    } else {
        let stdin = stdin();
        let stdout = stdout();
        mbs::run(&source, stdin.lock(), stdout.lock()).map(|_| ())
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(exit_code(e.kind()));
    }
}
