use std::{
    env,
    io::{self, BufRead, Write},
    process,
};

use chrono::NaiveDate;
use log::error;
use terminal_rs::{
    assistant::Record, stats::Summary, store::Dataset, Assistant, MemoryStore, Policy, State,
    TerminalError, Turn,
};

const PLAYER: &str = "local";
const SHOWN: usize = 5;

fn main() {
    env_logger::init();

    let policy = match env::args().nth(1) {
        Some(path) => match Policy::from_json_file(&path) {
            Ok(policy) => policy,
            Err(e) => {
                error!("could not read policy from {}: {}", path, e);
                process::exit(1);
            }
        },
        None => Policy::default(),
    };

    let assistant = Assistant::new(MemoryStore::new()).policy(policy);

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = run(stdin.lock(), stdout.lock(), &assistant) {
        error!("{}", e);
        process::exit(1);
    }
}

enum Input {
    Exit,
    NewGame,
    Stats,
    DailyStats(String),
    Export(String),
    Line(String),
}

fn read<R: BufRead>(reader: &mut R) -> io::Result<Input> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(Input::Exit);
    }
    let line = line.trim();

    Ok(match line.split_once(' ') {
        Some(("export", path)) => Input::Export(path.trim().to_string()),
        Some(("stats", day)) => Input::DailyStats(day.trim().to_string()),
        _ => match line {
            "exit" => Input::Exit,
            "new" => Input::NewGame,
            "stats" => Input::Stats,
            _ => Input::Line(line.to_string()),
        },
    })
}

fn run<R: BufRead, W: Write>(
    mut reader: R,
    mut out: W,
    assistant: &Assistant<MemoryStore, &'static str>,
) -> terminal_rs::Result<()> {
    'games: loop {
        writeln!(
            out,
            "Enter the word list, one word per line, and an empty line to finish:"
        )?;

        let mut lines = Vec::new();
        loop {
            match read(&mut reader)? {
                Input::Exit => return Ok(()),
                Input::NewGame => continue 'games,
                Input::Stats => print_stats(&mut out, assistant)?,
                Input::DailyStats(day) => print_daily_stats(&mut out, assistant, &day)?,
                Input::Export(path) => export(&mut out, assistant, &path)?,
                Input::Line(line) if line.is_empty() => break,
                Input::Line(line) => lines.push(line),
            }
        }

        let start = match assistant.submit_word_list(PLAYER, &lines) {
            Ok(start) => start,
            Err(TerminalError::Validation { kind }) => {
                writeln!(out, "{}", kind)?;
                continue;
            }
            Err(e) => return Err(e),
        };

        if let Some(hint) = &start.hint {
            writeln!(out, "This list was solved before, the target was probably {}", hint)?;
        }
        match (start.state, start.words.first()) {
            (State::Solved, Some(target)) => {
                writeln!(out, "Target word: {} (nothing to guess)", target)?;
                continue;
            }
            (State::Contradiction, _) => {
                writeln!(out, "The word list is empty")?;
                continue;
            }
            _ => print_candidates(&mut out, &start.words)?,
        }

        loop {
            writeln!(out, "Enter your attempt as <word> <matches>, or 'new' for a new game:")?;
            let line = match read(&mut reader)? {
                Input::Exit => return Ok(()),
                Input::NewGame => {
                    assistant.new_game(&PLAYER);
                    continue 'games;
                }
                Input::Stats => {
                    print_stats(&mut out, assistant)?;
                    continue;
                }
                Input::DailyStats(day) => {
                    print_daily_stats(&mut out, assistant, &day)?;
                    continue;
                }
                Input::Export(path) => {
                    export(&mut out, assistant, &path)?;
                    continue;
                }
                Input::Line(line) => line,
            };

            let (guess, matches) = match parse_attempt(&line) {
                Some(attempt) => attempt,
                None => {
                    writeln!(out, "Could not read that attempt")?;
                    continue;
                }
            };

            match assistant.submit_attempt(&PLAYER, guess, matches)? {
                Turn::Continue(words) => print_candidates(&mut out, &words)?,
                Turn::Solved {
                    target,
                    attempts,
                    record,
                } => {
                    writeln!(out, "Target word: {} (found in {} attempts)", target, attempts)?;
                    if let Record::Failed(e) = record {
                        writeln!(out, "The game could not be saved: {}", e)?;
                    }
                    continue 'games;
                }
                Turn::Contradiction => {
                    writeln!(
                        out,
                        "No matching words left. Maybe one of the match counts was wrong?"
                    )?;
                    continue 'games;
                }
            }
        }
    }
}

fn parse_attempt(line: &str) -> Option<(&str, usize)> {
    let mut parts = line.split_whitespace();
    let guess = parts.next()?;
    let matches = parts.next()?.parse().ok()?;
    match parts.next() {
        Some(_) => None,
        None => Some((guess, matches)),
    }
}

fn print_candidates<W: Write>(out: &mut W, words: &[String]) -> io::Result<()> {
    writeln!(out, "Available {} words:", words.len())?;
    for (i, word) in words.iter().take(SHOWN).enumerate() {
        writeln!(out, "#{}: {}", i + 1, word)?;
    }
    if words.len() > SHOWN {
        writeln!(out, "...and {} more", words.len() - SHOWN)?;
    }
    Ok(())
}

fn print_stats<W: Write>(
    out: &mut W,
    assistant: &Assistant<MemoryStore, &'static str>,
) -> io::Result<()> {
    write!(out, "{}", Summary::from_games(&assistant.store().games()))
}

fn print_daily_stats<W: Write>(
    out: &mut W,
    assistant: &Assistant<MemoryStore, &'static str>,
    day: &str,
) -> io::Result<()> {
    match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(day) => {
            writeln!(out, "Games finished on {}", day)?;
            write!(out, "{}", Summary::on_day(&assistant.store().games(), day))
        }
        Err(_) => writeln!(out, "Could not read the date {}, expected YYYY-MM-DD", day),
    }
}

fn export<W: Write>(
    out: &mut W,
    assistant: &Assistant<MemoryStore, &'static str>,
    path: &str,
) -> terminal_rs::Result<()> {
    let dataset = Dataset::from_games(assistant.store().games());
    dataset.save(path)?;
    writeln!(out, "Exported {} games to {}", dataset.total_games, path)?;
    Ok(())
}
