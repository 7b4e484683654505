//! `dlmon root` – print the resolved installation root.

use std::path::Path;

pub fn run_root(root: &Path) {
    println!("{}", root.display());
}
