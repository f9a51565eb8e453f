use std::{fmt::Write as _, io, str::FromStr, str::SplitWhitespace};

use anyhow::{anyhow, bail, Context};
use itertools::Itertools;
use linked_queue::{Queue, QueueHandle, SortOptions, SortOrder};
use log::debug;

const HELP: &str = "\
new              create a new empty queue
free             delete the current queue
ih str [n]       insert str at the head n times (default 1)
it str [n]       insert str at the tail n times (default 1)
rh [str]         remove from the head, optionally checking the removed value
size [n]         print the queue size, optionally checking it
reverse          reverse the queue
sort [order]     sort the queue (lexicographic | natural)
show             print the queue
help             print this message
quit             exit";

pub struct Parser<'a> {
    words: SplitWhitespace<'a>,
    /// useful for debugging purposes
    full_command: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            words: line.split_whitespace(),
            full_command: line,
        }
    }

    pub fn next_string(&mut self) -> Option<String> {
        self.words.next().map(str::to_owned)
    }

    pub fn next_parsed<T>(&mut self, what: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.words
            .next()
            .map(|word| {
                word.parse()
                    .with_context(|| format!("Failed to parse {what} from `{word}`"))
            })
            .transpose()
    }

    fn finish(mut self) -> anyhow::Result<()> {
        match self.words.next() {
            Some(extra) => bail!(
                "Unexpected argument `{extra}` in `{}`",
                self.full_command.trim()
            ),
            None => Ok(()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    New,
    Free,
    InsertFront { value: String, count: usize },
    InsertBack { value: String, count: usize },
    RemoveFront { expected: Option<String> },
    Size { expected: Option<usize> },
    Reverse,
    Sort { order: Option<SortOrder> },
    Show,
    Help,
    Quit,
}

impl Command {
    /// Blank lines and `#` comments parse to `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.split('#').next().unwrap_or_default();
        let mut parser = Parser::new(line);
        let Some(name) = parser.next_string() else {
            return Ok(None);
        };

        let command = match name.as_str() {
            "new" => Command::New,
            "free" => Command::Free,
            "ih" | "it" => {
                let value = parser
                    .next_string()
                    .ok_or_else(|| anyhow!("Expected a string to insert"))?;
                let count = parser.next_parsed("insert count")?.unwrap_or(1);
                if name == "ih" {
                    Command::InsertFront { value, count }
                } else {
                    Command::InsertBack { value, count }
                }
            }
            "rh" => Command::RemoveFront {
                expected: parser.next_string(),
            },
            "size" => Command::Size {
                expected: parser.next_parsed("expected size")?,
            },
            "reverse" => Command::Reverse,
            "sort" => Command::Sort {
                order: parser.next_parsed("sort order")?,
            },
            "show" => Command::Show,
            "help" => Command::Help,
            "quit" => Command::Quit,
            other => bail!("Unknown command `{other}`"),
        };
        parser.finish()?;

        Ok(Some(command))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Drives a single queue handle through parsed commands.
pub struct Interpreter {
    queue: Option<Queue>,
    options: SortOptions,
    capacity: usize,
    errors: usize,
}

impl Interpreter {
    pub fn new(options: SortOptions, capacity: usize) -> Self {
        Self {
            queue: None,
            options,
            capacity,
            errors: 0,
        }
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Runs one line and writes its transcript to `out`. Command failures
    /// are written as `ERROR:` lines and counted; only I/O errors on `out`
    /// are returned.
    pub fn run_line<W: io::Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let mut transcript = String::new();
        let result = Command::parse(line).and_then(|command| match command {
            Some(command) => {
                debug!("executing {command:?}");
                self.execute(command, &mut transcript)
            }
            None => Ok(Flow::Continue),
        });

        let flow = match result {
            Ok(flow) => flow,
            Err(err) => {
                self.errors += 1;
                let _ = writeln!(transcript, "ERROR: {err:#}");
                Flow::Continue
            }
        };

        out.write_all(transcript.as_bytes())?;
        Ok(flow)
    }

    fn execute(&mut self, command: Command, out: &mut String) -> anyhow::Result<Flow> {
        match command {
            Command::New => {
                self.queue.free();
                self.queue = Some(Queue::new());
                self.show(out)?;
            }
            Command::Free => {
                self.queue.free();
                self.show(out)?;
            }
            Command::InsertFront { value, count } => {
                for _ in 0..count {
                    self.queue
                        .insert_front(&value)
                        .with_context(|| format!("Failed to insert `{value}` at head"))?;
                }
                self.show(out)?;
            }
            Command::InsertBack { value, count } => {
                for _ in 0..count {
                    self.queue
                        .insert_back(&value)
                        .with_context(|| format!("Failed to insert `{value}` at tail"))?;
                }
                self.show(out)?;
            }
            Command::RemoveFront { expected } => {
                let mut buf = vec![0_u8; self.capacity];
                self.queue
                    .remove_front(Some(buf.as_mut_slice()))
                    .context("Failed to remove from head")?;

                let removed = buf.split(|b| *b == 0).next().unwrap_or_default();
                let removed = String::from_utf8_lossy(removed);
                writeln!(out, "Removed {removed} from queue")?;
                self.show(out)?;

                if let Some(expected) = expected {
                    if removed != expected {
                        bail!("Removed value `{removed}` does not match expected `{expected}`");
                    }
                }
            }
            Command::Size { expected } => {
                let size = self.queue.size();
                writeln!(out, "Queue size = {size}")?;

                if let Some(expected) = expected {
                    if size != expected {
                        bail!("Queue size {size} does not match expected {expected}");
                    }
                }
            }
            Command::Reverse => {
                self.queue.reverse();
                self.show(out)?;
            }
            Command::Sort { order } => {
                let options = match order {
                    Some(order) => SortOptions { order, ..self.options },
                    None => self.options,
                };
                self.queue.sort(options);
                self.show(out)?;
            }
            Command::Show => self.show(out)?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn show(&self, out: &mut String) -> anyhow::Result<()> {
        match &self.queue {
            Some(queue) => writeln!(out, "q = [{}]", queue.iter().join(" "))?,
            None => writeln!(out, "q = NULL")?,
        }
        Ok(())
    }
}
