// Interactive console implementation of the load-address chooser
use std::io::{self, BufRead, Write};

use dcload_core::loader::chooser::{LoadAddressChooser, CHOOSER_HEADER, CHOOSER_TITLE};

/// Modal chooser on stdin/stdout. An empty line or `q` cancels.
pub struct ConsoleChooser;

impl LoadAddressChooser for ConsoleChooser {
    fn choose(&self) -> Option<usize> {
        println!("{CHOOSER_TITLE}");
        println!("  #  {CHOOSER_HEADER}");
        for n in 0..self.count() {
            println!("  {}  {}", n + 1, self.row(n));
        }

        let stdin = io::stdin();
        loop {
            print!("Choice [1-{}, empty cancels]: ", self.count());
            let _ = io::stdout().flush();

            let mut line = String::new();
            if stdin.lock().read_line(&mut line).is_err() {
                return None;
            }
            let line = line.trim();
            if line.is_empty() || line.eq_ignore_ascii_case("q") {
                return None;
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=self.count()).contains(&n) => return Some(n - 1),
                _ => println!("Invalid choice: {line}"),
            }
        }
    }
}
