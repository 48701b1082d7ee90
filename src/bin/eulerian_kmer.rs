//! Reconstruct a circular genome from its k-mer composition: stdin carries
//! whitespace-separated equal-length k-mers (k inferred from the first
//! token), de Bruijn graph built directly over them (no read-splitting),
//! Eulerian cycle spelled back into one line.
//!
//! Traverses with the multiplicity-preserving engine: composition input is
//! exactly the case where repeated (k-1)-mer transitions must be walked once
//! per occurrence, not collapsed to one edge.

use debruijn_asm::eulerian::eulerian_cycle_multigraph_from_graph;
use debruijn_asm::graph::DeBruijnGraph;
use debruijn_asm::spelling::spell_genome;
use std::io::{self, Read};

fn main() -> io::Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let kmers: Vec<&[u8]> = input.split_whitespace().map(|s| s.as_bytes()).collect();
    let k = match kmers.first() {
        Some(first) => first.len(),
        None => {
            eprintln!("malformed input: no k-mers given");
            std::process::exit(1);
        }
    };

    let graph = DeBruijnGraph::build(kmers, k);
    match eulerian_cycle_multigraph_from_graph(&graph) {
        Ok(cycle) => {
            let genome = spell_genome(&graph, &cycle, k);
            println!("{}", String::from_utf8_lossy(&genome));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
