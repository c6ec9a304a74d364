use crate::error::XlcpResult;
use crate::order::{Order, OrderSummary, OverwritePrompt, Transfer, TransferOptions, TransferOutcome};
use crate::workbook::{SourceBook, WorkbookPool};
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Overwrite prompt on the terminal. Anything not starting with `y` means no.
pub struct StdinPrompt;

impl OverwritePrompt for StdinPrompt {
    fn confirm_overwrite(&mut self, path: &Path) -> XlcpResult<bool> {
        print!(
            "file {} already exists. Overwrite? ({}/{}) ",
            path.display().to_string().cyan(),
            "y".cyan(),
            "n".red()
        );
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim_start().starts_with(['y', 'Y'])
}

/// Load one order per sheet of the order workbook. The workbook is closed
/// again before anything runs.
pub fn load_orders(order_file: &Path) -> XlcpResult<Vec<Order>> {
    let mut book = SourceBook::open(order_file)?;
    let orders = book
        .worksheets()?
        .iter()
        .map(|(name, sheet)| Order::load(name, sheet))
        .collect::<Vec<_>>();
    info!("{}: {} order(s)", book.path().display(), orders.len());
    Ok(orders)
}

/// Execute the copy run described by `order_file`
pub fn run(order_file: PathBuf, options: TransferOptions, verbose: bool) -> XlcpResult<()> {
    println!("{}", "xlcp - Copying cell blocks".bold().green());
    println!("   Order file: {}", order_file.display());
    println!("   Header position: {}", options.header_position);
    if options.transpose {
        println!("   {}", "Transposing every block".yellow());
    }
    if options.force_overwrite {
        println!("   {}", "Overwriting existing files without asking".yellow());
    }
    println!();

    let orders = load_orders(&order_file)?;
    let mut pool = WorkbookPool::new();
    let mut prompt = StdinPrompt;
    let mut copied = 0;
    let mut not_copied = 0;

    for order in &orders {
        if order.transfers.is_empty() && order.rejected.is_empty() {
            continue;
        }
        println!("{} {}", "Order".bold(), order.name.bright_blue().bold());
        if verbose {
            println!("{}\n", order);
        }
        for rejected in &order.rejected {
            println!(
                "   {} row {}: {}",
                "✗".red(),
                rejected.row + 1,
                rejected.error.to_string().red()
            );
        }

        let summary = order.execute(&mut pool, &options, &mut prompt)?;
        print_summary(order, &summary);
        copied += summary.copied();
        not_copied += summary.not_copied() + order.rejected.len();
    }
    pool.release_all();

    println!();
    if not_copied == 0 {
        println!("{}", format!("✅ {} block(s) copied", copied).bold().green());
    } else {
        println!(
            "{}",
            format!("⚠️  {} block(s) copied, {} not copied", copied, not_copied)
                .bold()
                .yellow()
        );
    }
    Ok(())
}

fn print_summary(order: &Order, summary: &OrderSummary) {
    for (transfer, outcome) in order.transfers.iter().zip(&summary.outcomes) {
        print_outcome(transfer, outcome);
    }
    for path in &summary.saved {
        println!("   saved {}", path.display().to_string().cyan());
    }
    println!();
}

fn print_outcome(transfer: &Transfer, outcome: &TransferOutcome) {
    println!(
        "   {} -> {}",
        transfer.source.file.cyan(),
        transfer.destination.file.cyan()
    );
    match outcome {
        TransferOutcome::Copied {
            range,
            written,
            created_sheet,
            ..
        } => {
            if *created_sheet {
                println!(
                    "      created {} in {}",
                    transfer.destination.sheet.cyan(),
                    transfer.destination.file.cyan()
                );
            }
            println!(
                "      {} data shape : {} written to {} {}",
                "✓".green(),
                format!("({}, {})", written.0, written.1).cyan(),
                transfer.destination.sheet,
                range
            );
        }
        TransferOutcome::ReadFailed(failure) => {
            println!("      {} {}", "✗".red(), failure.to_string().red());
        }
        TransferOutcome::Declined(path) => {
            println!("      {} kept existing {}", "•".yellow(), path.display());
        }
        TransferOutcome::Skipped(path) => {
            println!(
                "      {} skipped, overwrite of {} was declined",
                "•".yellow(),
                path.display()
            );
        }
        TransferOutcome::InvalidHeader(message) => {
            println!("      {} {}", "✗".red(), message.red());
        }
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
