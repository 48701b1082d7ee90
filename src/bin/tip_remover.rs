//! Stdin-framed tip-removal stage: whitespace-separated reads, k fixed at
//! 15. Prints the number of edges removed.

use debruijn_asm::graph::DeBruijnGraph;
use debruijn_asm::tip_removal::remove_tips;
use std::io::{self, Read};

const K: usize = 15;

fn main() -> io::Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let reads: Vec<&[u8]> = input.split_whitespace().map(|s| s.as_bytes()).collect();
    if reads.is_empty() {
        eprintln!("malformed input: no reads given");
        std::process::exit(1);
    }

    let mut graph = DeBruijnGraph::build(reads, K);
    let removed = remove_tips(&mut graph, K);
    println!("{}", removed);
    Ok(())
}
