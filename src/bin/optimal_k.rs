//! Optimal-k probe: one read per line on stdin, prints the largest k that
//! admits a balanced de Bruijn graph, or nothing if none does.

use debruijn_asm::optimal_k::find_optimal_k;
use std::io::{self, Read};

fn main() -> io::Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let reads: Vec<&[u8]> = input
        .lines()
        .map(|l| l.trim_end_matches(['\r', '\n']).as_bytes())
        .filter(|l| !l.is_empty())
        .collect();
    if reads.is_empty() {
        eprintln!("malformed input: no reads given");
        std::process::exit(1);
    }

    let max_k = reads.iter().map(|r| r.len()).min().unwrap_or(0);
    if let Some(k) = find_optimal_k(max_k, &reads) {
        println!("{}", k);
    }
    Ok(())
}
