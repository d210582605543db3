//! `@@@`-prefixed trial output (§6): one line per trial, whitespace
//! separated numeric fields followed by the kernel's configuration tag.

use std::time::Duration;

pub fn print_trial(trial: usize, tag: &str, elapsed: Duration, verified: Option<bool>) {
    let verdict = match verified {
        Some(true) => "PASS",
        Some(false) => "FAIL",
        None => "-",
    };
    println!("@@@ {trial} {:.6} {verdict} {tag}", elapsed.as_secs_f64());
}
