use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::ArgMatches;
use puzzlepad::client::DEFAULT_SERVER;
use puzzlepad::puzzle::PuzzleKind;

#[derive(Clone)]
pub(crate) struct Options {
    source: Source,
    solve: bool,
    server: String,
    output_path: Option<PathBuf>,
}

impl Options {
    pub fn from_args() -> Result<Self> {
        Self::from_arg_matches(&clap_app().get_matches())
    }

    fn from_arg_matches(matches: &ArgMatches<'_>) -> Result<Self> {
        let options = Self {
            source: if let Some(path) = matches.value_of("input") {
                Source::File(path.into())
            } else {
                let kind = match matches.value_of("type") {
                    Some(name) => PuzzleKind::from_name(name)
                        .ok_or_else(|| anyhow!("unknown puzzle type: {}", name))?,
                    None => PuzzleKind::Sudoku,
                };
                let size = matches
                    .value_of("size")
                    .map(|s| s.parse::<usize>())
                    .transpose()
                    .map_err(|_| anyhow!("invalid size"))?;
                Source::Generate(Generate { kind, size })
            },
            solve: matches.is_present("solve"),
            server: matches
                .value_of("server")
                .unwrap_or(DEFAULT_SERVER)
                .to_string(),
            output_path: matches.value_of("output_path").map(PathBuf::from),
        };
        Ok(options)
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn solve(&self) -> bool {
        self.solve
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }
}

#[derive(Clone)]
pub(crate) enum Source {
    File(PathBuf),
    Generate(Generate),
}

#[derive(Clone)]
pub(crate) struct Generate {
    pub kind: PuzzleKind,
    pub size: Option<usize>,
}

fn clap_app() -> clap::App<'static, 'static> {
    use clap::{App, AppSettings, Arg, ArgGroup};

    App::new("puzzlepad")
        .help_message("Annotate and solve paper logic puzzles")
        .setting(AppSettings::ArgRequiredElseHelp)
        .group(
            ArgGroup::with_name("source")
                .args(&["generate", "input"])
                .required(true),
        )
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .value_name("PATH")
                .help("read a puzzle from a file")
                .display_order(1),
        )
        .arg(
            Arg::with_name("generate")
                .short("g")
                .long("generate")
                .help("generate a puzzle from the solver service")
                .display_order(1),
        )
        .arg(
            Arg::with_name("type")
                .short("t")
                .long("type")
                .takes_value(true)
                .value_name("TYPE")
                .requires("generate")
                .possible_values(&[
                    "sudoku",
                    "futoshiki",
                    "numberlink",
                    "nurikabe",
                    "shikaku",
                    "hashiwokakero",
                ])
                .help("the puzzle type to generate"),
        )
        .arg(
            Arg::with_name("size")
                .long("size")
                .takes_value(true)
                .value_name("SIZE")
                .requires("generate")
                .help("the grid size of the generated puzzle"),
        )
        .arg(
            Arg::with_name("solve")
                .short("s")
                .long("solve")
                .help("solve the puzzle and print the solution"),
        )
        .arg(
            Arg::with_name("server")
                .long("server")
                .takes_value(true)
                .value_name("URL")
                .help("the solver service base URL"),
        )
        .arg(
            Arg::with_name("output_path")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("PATH")
                .help("save the puzzle to a file"),
        )
}
