mod app;
mod editor;
mod grid;
mod help;
mod logging;
mod notes;
mod progress;
mod state;
mod theme;
use crate::app::App;
use crate::notes::NoteStore;
use crate::progress::{AnyClock, FixedClock, SystemClock, TimeUnit};
use crate::state::DotYear;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, UtcOffset};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        date: Option<Date>,
        unit: TimeUnit,
        notes: Option<PathBuf>,
        log: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut date = None;
        let mut unit = TimeUnit::Day;
        let mut notes = None;
        let mut log = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('u') | Arg::Long("unit") => unit = parser.value()?.parse()?,
                Arg::Short('n') | Arg::Long("notes") => notes = Some(PathBuf::from(parser.value()?)),
                Arg::Long("log") => log = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            date,
            unit,
            notes,
            log,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                date,
                unit,
                notes,
                log,
            } => {
                if let Some(path) = log {
                    logging::init(&path)?;
                }
                let clock = match date {
                    Some(d) => AnyClock::Fixed(FixedClock(d)),
                    None => AnyClock::System(SystemClock::new(
                        UtcOffset::current_local_offset()
                            .context("failed to determine local time zone offset")?,
                    )),
                };
                let store = match notes.as_deref() {
                    Some(path) => NoteStore::load(path)?,
                    None => NoteStore::new(),
                };
                let mut dotyear = DotYear::new(clock, store);
                dotyear.select_unit(unit);
                tracing::info!(today = %dotyear.today(), %unit, "starting calendar");
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(dotyear, notes).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: dotyear [<options>] [YYYY-MM-DD]");
                println!();
                println!("Watch the year go by one dot at a time, and keep a journal note for any");
                println!("day, month, or week");
                println!();
                println!("The date argument, if given, is used in place of today's date.");
                println!();
                println!("Options:");
                println!("  -u, --unit <day|month|week>");
                println!("                    Start out showing the given granularity [default: day]");
                println!();
                println!("  -n, --notes <FILE>");
                println!("                    Load notes from & save notes to the given JSON file");
                println!();
                println!("  --log <FILE>      Append diagnostic logs to the given file; the level is");
                println!("                    controlled by the DOTYEAR_LOG environment variable");
                println!();
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("dotyear").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(
            parse(&[]).unwrap(),
            Command::Run {
                date: None,
                unit: TimeUnit::Day,
                notes: None,
                log: None,
            }
        );
    }

    #[test]
    fn test_all_options() {
        assert_eq!(
            parse(&[
                "-u",
                "week",
                "--notes",
                "journal.json",
                "--log=dotyear.log",
                "2025-04-10"
            ])
            .unwrap(),
            Command::Run {
                date: Some(date!(2025 - 04 - 10)),
                unit: TimeUnit::Week,
                notes: Some(PathBuf::from("journal.json")),
                log: Some(PathBuf::from("dotyear.log")),
            }
        );
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(parse(&["2025-04-10", "--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_bad_unit() {
        assert!(parse(&["--unit", "fortnight"]).is_err());
    }

    #[test]
    fn test_bad_date() {
        assert!(parse(&["2025-02-30"]).is_err());
    }

    #[test]
    fn test_two_dates() {
        assert!(parse(&["2025-01-01", "2025-01-02"]).is_err());
    }
}
