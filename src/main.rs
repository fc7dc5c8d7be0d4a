use clap::Parser;
use census_tally::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    let args = Args::parse();

    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let cancellation_token = CancellationToken::new();
        let command = commands::run(args, cancellation_token.clone());
        tokio::pin!(command);

        // The first Ctrl+C stops new writes; the import loop then reports
        // what was stored and what was never attempted.
        tokio::select! {
            result = &mut command => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to listen for CTRL+C: {}", e);
                }
                eprintln!("\nReceived CTRL+C, finishing the current write...");
                cancellation_token.cancel();
                command.await
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Census Tally - wide population table import and export");
    println!("=======================================================");
    println!();
    println!("Validate area-by-age-by-gender CSV uploads, store them as normalized");
    println!("records, and rebuild the same wide layout for any reporting period.");
    println!();
    println!("USAGE:");
    println!("    census-tally [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    import        Validate and import CSV files into the record store");
    println!("    validate      Check CSV files without importing them");
    println!("    export        Export a period as a wide CSV table");
    println!("    summary       Grouped totals (by area, bracket, gender, period)");
    println!("    template      Write a blank upload template");
    println!("    delete-batch  Remove the records of one import");
    println!();
    println!("OPTIONS:");
    println!("        --store <FILE>     Record store file (JSON lines)");
    println!("    -c, --config <FILE>    Engine configuration (JSON)");
    println!("        --format <FORMAT>  human, json or csv");
    println!("    -h, --help             Show help information");
    println!("    -V, --version          Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Write a template, fill it in, then import it for January 2025:");
    println!("    census-tally template --output upload.csv");
    println!("    census-tally import upload.csv --period 2025-01");
    println!();
    println!("    # Export the month back out:");
    println!("    census-tally export --period 2025-01 --output january.csv");
    println!();
    println!("    # Totals by area and gender for the whole year:");
    println!("    census-tally summary --by area,gender --period 2025 --sorted");
    println!();
    println!("For detailed help on any command, use:");
    println!("    census-tally <COMMAND> --help");
}
