use std::path::PathBuf;

use clap::Parser;

use crate::config::TidyConfig;
use crate::tidy::columns::{Column, ColumnSelection};

pub const TOOL_NAME: &str = "tidy-panda";

fn column_help() -> String {
    let names: Vec<&str> = Column::DEFAULT.iter().map(|c| c.name()).collect();
    format!("Comma-separated columns to output, in order: {}", names.join(","))
}

#[derive(Debug, Parser)]
#[command(
    name = TOOL_NAME,
    version,
    about = "Convert gold-standard XML scan data to tidy format",
    long_about = "Convert a gold-standard XML measurement export into a tidy CSV with one row per observation and wavelength."
)]
pub struct Cli {
    #[arg(value_name = "INPUT_FILE", help = "Input document; standard input when omitted")]
    pub input: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "OUTPUT_FILE",
        help = "Output file or directory; `-` or omitted writes to standard output"
    )]
    pub output: Option<PathBuf>,
    #[arg(long, value_name = "CATPATH", help = "Path to the category reference xml")]
    pub category: Option<PathBuf>,
    #[arg(long, help = "Name for category 1")]
    pub catname1: Option<String>,
    #[arg(long, help = "Name for category 2")]
    pub catname2: Option<String>,
    #[arg(long, help = "Name for category 3")]
    pub catname3: Option<String>,
    #[arg(long, help = "Omit the header row")]
    pub noheader: bool,
    #[arg(long, help = "Refuse to overwrite an existing output file")]
    pub noclobber: bool,
    #[arg(long, help = "Suppress informational and warning messages")]
    pub quiet: bool,
    #[arg(long, help = "EAN/UPC of the output drink")]
    pub upc: Option<String>,
    #[arg(long = "temp", help = "Liquid temperature of the output drink")]
    pub temperature: Option<String>,
    #[arg(
        long = "column",
        value_name = "COLUMNS",
        value_delimiter = ',',
        conflicts_with = "exclude",
        help = column_help()
    )]
    pub column: Option<Vec<String>>,
    #[arg(
        long,
        value_name = "COLUMNS",
        value_delimiter = ',',
        help = "Comma-separated columns to leave out of the default set"
    )]
    pub exclude: Option<Vec<String>>,
    #[arg(
        long = "strict-categories",
        help = "Fail when a category name is missing from the category reference"
    )]
    pub strict_categories: bool,
}

impl From<Cli> for TidyConfig {
    fn from(cli: Cli) -> Self {
        let columns = match (cli.column, cli.exclude) {
            (Some(include), _) => ColumnSelection::Include(include),
            (None, Some(exclude)) => ColumnSelection::Exclude(exclude),
            (None, None) => ColumnSelection::Default,
        };
        TidyConfig {
            input: cli.input,
            output: cli.output,
            category_path: cli.category,
            category_names: [cli.catname1, cli.catname2, cli.catname3],
            no_header: cli.noheader,
            no_clobber: cli.noclobber,
            quiet: cli.quiet,
            upc: cli.upc,
            temperature: cli.temperature,
            columns,
            strict_categories: cli.strict_categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<TidyConfig, clap::Error> {
        Cli::try_parse_from(std::iter::once(TOOL_NAME).chain(args.iter().copied()))
            .map(TidyConfig::from)
    }

    #[test]
    fn parses_full_command_line() {
        let config = parse(&[
            "drink.xml",
            "-o",
            "out",
            "--category",
            "cat.xml",
            "--catname2",
            "Diet",
            "--noheader",
            "--noclobber",
            "--upc",
            "123",
            "--temp",
            "4",
            "--column",
            "upc,name",
        ])
        .unwrap();

        assert_eq!(config.input, Some(PathBuf::from("drink.xml")));
        assert_eq!(config.output, Some(PathBuf::from("out")));
        assert_eq!(config.category_path, Some(PathBuf::from("cat.xml")));
        assert_eq!(config.category_names, [None, Some("Diet".to_string()), None]);
        assert!(config.no_header && config.no_clobber && !config.quiet);
        assert_eq!(config.upc.as_deref(), Some("123"));
        assert_eq!(config.temperature.as_deref(), Some("4"));
        assert_eq!(
            config.columns,
            ColumnSelection::Include(vec!["upc".into(), "name".into()])
        );
    }

    #[test]
    fn column_and_exclude_conflict() {
        let err = parse(&["--column", "name", "--exclude", "upc"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn defaults_read_stdin_with_default_columns() {
        let config = parse(&[]).unwrap();
        assert!(config.input.is_none());
        assert_eq!(config.columns, ColumnSelection::Default);
        assert_eq!(config.input_name(), "stdin");
    }

    #[test]
    fn version_is_reported_by_clap() {
        let err = parse(&["--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }
}
