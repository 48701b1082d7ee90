//! Stdin-framed bubble counting stage: first token k, second token the
//! bubble threshold, remaining tokens the reads. Prints the bubble count.

use debruijn_asm::graph::DeBruijnGraph;
use debruijn_asm::bubble::count_bubbles;
use std::io::{self, Read};

fn main() -> io::Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let mut tokens = input.split_whitespace();
    let k: usize = match tokens.next().and_then(|t| t.parse().ok()) {
        Some(k) if k >= 3 => k,
        _ => {
            eprintln!("malformed input: expected k >= 3 as the first token");
            std::process::exit(1);
        }
    };
    let bubble_threshold: usize = match tokens.next().and_then(|t| t.parse().ok()) {
        Some(t) if t >= 1 => t,
        _ => {
            eprintln!("malformed input: expected bubble threshold >= 1 as the second token");
            std::process::exit(1);
        }
    };

    let reads: Vec<&[u8]> = tokens.map(|s| s.as_bytes()).collect();
    if reads.is_empty() {
        eprintln!("malformed input: no reads given");
        std::process::exit(1);
    }

    let graph = DeBruijnGraph::build(reads, k);
    println!("{}", count_bubbles(&graph, bubble_threshold));
    Ok(())
}
