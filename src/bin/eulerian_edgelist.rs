//! Eulerian cycle over a raw 1-based edge list. Stdin: first line "V E",
//! then E lines "u v". Prints "1"/"0" for balanced/unbalanced on line 1,
//! then the path (1-based, closing duplicate omitted) on line 2. Line 1 is
//! the per-vertex degree check alone: a balanced but disconnected edge list
//! still prints "1", with an empty line 2 if the single-component traversal
//! can't reach every edge.

use debruijn_asm::eulerian::eulerian_cycle_checked;
use std::io::{self, Read};

fn main() -> io::Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let mut lines = input.lines();
    let header = match lines.next() {
        Some(h) => h,
        None => {
            eprintln!("malformed input: missing \"V E\" header line");
            std::process::exit(1);
        }
    };
    let mut header_tokens = header.split_whitespace();
    let num_vertices: usize = match header_tokens.next().and_then(|t| t.parse().ok()) {
        Some(v) => v,
        None => {
            eprintln!("malformed input: expected vertex count as the first header token");
            std::process::exit(1);
        }
    };
    let num_edges: usize = match header_tokens.next().and_then(|t| t.parse().ok()) {
        Some(e) => e,
        None => {
            eprintln!("malformed input: expected edge count as the second header token");
            std::process::exit(1);
        }
    };

    let mut edges: Vec<(usize, usize)> = Vec::with_capacity(num_edges);
    for line in lines.by_ref().take(num_edges) {
        let mut tokens = line.split_whitespace();
        let u: usize = match tokens.next().and_then(|t| t.parse().ok()) {
            Some(u) if u >= 1 => u - 1,
            _ => {
                eprintln!("malformed input: expected a 1-based source vertex");
                std::process::exit(1);
            }
        };
        let v: usize = match tokens.next().and_then(|t| t.parse().ok()) {
            Some(v) if v >= 1 => v - 1,
            _ => {
                eprintln!("malformed input: expected a 1-based target vertex");
                std::process::exit(1);
            }
        };
        edges.push((u, v));
    }
    if edges.len() != num_edges {
        eprintln!("malformed input: fewer edge lines than declared");
        std::process::exit(1);
    }

    let (balanced, path) = eulerian_cycle_checked(num_vertices, &edges);
    println!("{}", if balanced { "1" } else { "0" });
    match path {
        Some(path) => {
            let open = if path.len() > 1 { &path[..path.len() - 1] } else { &path[..] };
            let rendered: Vec<String> = open.iter().map(|&v| (v + 1).to_string()).collect();
            println!("{}", rendered.join(" "));
        }
        None => println!(),
    }
    Ok(())
}
