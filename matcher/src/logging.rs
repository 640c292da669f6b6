use std::io::Write;

use clap::ValueEnum;
use env_logger::{fmt::Formatter, Builder, Target, WriteStyle};
use log::{Level, LevelFilter};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

/// Send log lines to stderr so they never mix with the matchings printed on stdout.
pub fn init_logger(level: LogLevel) -> anyhow::Result<()> {
    Builder::new()
        .filter_level(level.to_filter())
        .write_style(WriteStyle::Never)
        .target(Target::Stderr)
        .format(|buf: &mut Formatter, record| {
            writeln!(buf, "{} [{}] {}", level_tag(record.level()), record.target(), record.args())
        })
        .try_init()
        .map_err(|e| anyhow::anyhow!("logger init failed: {e}"))
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
