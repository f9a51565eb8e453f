mod cmd;

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use anyhow::{bail, Context};
use clap::Parser;
use linked_queue::{MergeStrategy, SortOptions, SortOrder};
use log::info;

use cmd::{Flow, Interpreter};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let reader: Box<dyn BufRead> = match &args.file {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let mut stdout = io::stdout().lock();

    let options = SortOptions::new(args.order).with_strategy(args.strategy);
    let mut interpreter = Interpreter::new(options, args.capacity);

    for line in reader.lines() {
        let line = line.context("Failed to read command")?;
        match interpreter.run_line(&line, &mut stdout) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
            Err(err) => return Err(err.into()),
        }
    }

    let errors = interpreter.errors();
    if errors > 0 {
        bail!("{errors} command(s) failed");
    }
    info!("all commands succeeded");

    Ok(())
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Order used by `sort` when none is given (lexicographic | natural)
    #[arg(long, default_value = "lexicographic")]
    order: SortOrder,
    /// Merge sort walk (bottom-up | top-down)
    #[arg(long, default_value = "bottom-up")]
    strategy: MergeStrategy,
    /// Size of the buffer that receives removed values
    #[arg(short, long, default_value_t = 1024)]
    capacity: usize,
}
