//! Console header and summary for verbose runs
//!
//! Everything here is written to stderr so the success stream stays
//! machine-readable when piped.

use crate::walker::WalkResult;
use console::style;

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a header at the start of the walk
pub fn print_header(url: &str, workers: usize, tasks: usize, output: &str) {
    eprintln!();
    eprintln!(
        "{} {}",
        style("http-walker").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!("  {} {}", style("Target:").bold(), url);
    eprintln!("  {} {}", style("Workers:").bold(), workers);
    eprintln!("  {} {}", style("Seeds:").bold(), format_number(tasks as u64));
    eprintln!("  {} {}", style("Output:").bold(), output);
    eprintln!();
}

/// Print a summary of the walk results
pub fn print_summary(result: &WalkResult) {
    let duration_secs = result.duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        result.probes as f64 / duration_secs
    } else {
        0.0
    };

    let title = if result.completed {
        style("Walk Complete").green().bold()
    } else {
        style("Walk Interrupted").yellow().bold()
    };

    eprintln!();
    eprintln!("{}", title);
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!("  {} {}", style("Requests:").bold(), format_number(result.probes));
    eprintln!("  {} {}", style("Results:").bold(), format_number(result.results));
    eprintln!("  {} {}", style("Variations:").bold(), format_number(result.expansions));
    eprintln!(
        "  {} {} queued, {} taken",
        style("Tasks:").bold(),
        format_number(result.queued),
        format_number(result.dequeued)
    );
    if result.pending > 0 {
        eprintln!(
            "  {} {} tasks never probed",
            style("Left:").yellow().bold(),
            format_number(result.pending as u64)
        );
    }
    eprintln!(
        "  {} {:.1}s ({:.0} requests/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    if result.failures > 0 {
        eprintln!(
            "  {} {} ({} retried, {} dropped)",
            style("Failures:").yellow().bold(),
            format_number(result.failures),
            format_number(result.retries),
            format_number(result.abandoned)
        );
    }
    eprintln!();
}
