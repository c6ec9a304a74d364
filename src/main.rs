use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use xlcp::cli;
use xlcp::order::TransferOptions;
use xlcp::position::HeaderPosition;

#[derive(Parser)]
#[command(name = "xlcp")]
#[command(about = "Copy cell blocks between workbooks as listed in an order workbook")]
#[command(long_about = "xlcp - copy rectangular cell blocks between spreadsheet workbooks

Every sheet of the order workbook is an order:

  B1   template workbook, copied to create missing destination files
  B2   source directory
  B3   destination directory
  A6.. one row per block: header | source file | source sheet | source range
       | destination file | destination sheet | destination range

RANGES:
  A1:D10   fixed block
  B3:      start at B3, extend down and right over the contiguous data
  A1:D     four columns wide, extend down
  A2:5     rows 2 to 5, extend right

EXAMPLES:
  xlcp orders.xlsx
  xlcp orders.xlsx -f --header-position \"(left,top)\"
  xlcp orders.xlsx --transpose")]
#[command(version)]
struct Cli {
    /// Order workbook (.xlsx, .xlsm, .xls, .ods)
    order_file: PathBuf,

    /// Transpose every block before writing it
    #[arg(short, long)]
    transpose: bool,

    /// Overwrite existing destination files without asking
    #[arg(short, long, env = "XLCP_FORCE_OVERWRITE")]
    force_overwrite: bool,

    /// Header position relative to the data, e.g. "(top,left)" or "(left,top)"
    #[arg(long, default_value = "(top,left)", env = "XLCP_HEADER_POSITION")]
    header_position: HeaderPosition,

    /// Print the loaded order tables and debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "xlcp=debug" } else { "xlcp=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let options = TransferOptions {
        transpose: args.transpose,
        force_overwrite: args.force_overwrite,
        header_position: args.header_position,
    };

    cli::run(args.order_file.clone(), options, args.verbose)
        .with_context(|| format!("xlcp failed on {}", args.order_file.display()))
}
