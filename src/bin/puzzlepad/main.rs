#![warn(rust_2018_idioms)]

use anyhow::Result;
use itertools::Itertools;
use puzzlepad::client::SolverClient;
use puzzlepad::codec::Solved;
use puzzlepad::puzzle::PuzzleKind;
use puzzlepad::session::Session;

use crate::options::{Options, Source};

mod options;

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::from_args()?;
    let client = SolverClient::new(options.server());

    let mut session = match options.source() {
        Source::File(path) => {
            println!("Reading puzzle from \"{}\"", path.display());
            let mut session = Session::new(PuzzleKind::Sudoku);
            session.load(path)?;
            session
        }
        Source::Generate(generate) => {
            let mut session = Session::new(generate.kind);
            if let Some(size) = generate.size {
                session.resize(size);
            }
            println!("Generating a {} puzzle", session.kind());
            session.generate(&client)?;
            session
        }
    };

    println!("{}", session.grid());

    if options.solve() {
        session.solve(&client)?;
        if let Some(solved) = session.solution() {
            println!("Solution:");
            print_solution(solved);
        }
    }

    if let Some(path) = options.output_path() {
        session.save(path)?;
        println!("Saved puzzle to {}", path.display());
    }
    Ok(())
}

fn print_solution(solved: &Solved) {
    match solved {
        Solved::Grid(solution) => println!("{}", solution),
        Solved::Marks { grid, marks } => {
            for (row, cells) in grid.rows().enumerate() {
                let line = cells
                    .iter()
                    .enumerate()
                    .map(|(col, cell)| {
                        if marks.contains([row, col].into()) {
                            "#".to_string()
                        } else if cell == "0" {
                            ".".to_string()
                        } else {
                            cell.clone()
                        }
                    })
                    .join(" ");
                println!("{}", line);
            }
        }
        Solved::Rects(rects) => {
            for rect in rects {
                println!(
                    "  {:>2}: ({}, {}) {}x{}",
                    rect.id,
                    rect.start_row,
                    rect.start_col,
                    rect.height(),
                    rect.width()
                );
            }
        }
        Solved::Bridges(bridges) => {
            for (key, bridge) in bridges.iter().sorted_by_key(|(key, _)| *key) {
                let (from, to) = key.endpoints();
                println!("  {:?} = {:?} x{}", from, to, bridge.count);
            }
        }
    }
}
