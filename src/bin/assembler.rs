//! Full error-prone-read assembler: build, clean (tips then bubbles), spell.
//! k is fixed at 20; both cleanup thresholds use the assembly variant k + 1.

use debruijn_asm::bubble::remove_bubbles;
use debruijn_asm::eulerian::eulerian_cycle_from_graph;
use debruijn_asm::graph::DeBruijnGraph;
use debruijn_asm::spelling::spell_genome;
use debruijn_asm::tip_removal::remove_tips;
use std::io::{self, Read};

const K: usize = 20;

fn main() -> io::Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let reads: Vec<&[u8]> = input.split_whitespace().map(|s| s.as_bytes()).collect();
    if reads.is_empty() {
        eprintln!("malformed input: no reads given");
        std::process::exit(1);
    }

    let mut graph = DeBruijnGraph::build(reads, K);
    let threshold = K + 1;
    remove_tips(&mut graph, threshold);
    graph.sweep_empty_leaves();
    remove_bubbles(&mut graph, threshold);

    match eulerian_cycle_from_graph(&graph) {
        Ok(cycle) => {
            let genome = spell_genome(&graph, &cycle, K);
            println!("{}", String::from_utf8_lossy(&genome));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
