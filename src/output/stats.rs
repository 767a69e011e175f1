//! Console statistics for a finished run

use crate::fetch::BatchReport;
use crate::output::summary::RunSummary;

/// Share of `part` in `total`, in percent
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64) * 100.0
}

/// Prints a run summary to stdout
pub fn print_statistics(summary: &RunSummary) {
    println!("=== Harvest Statistics: {} ===\n", summary.label);

    println!("Run:");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Duration: {} seconds", summary.duration_seconds());
    println!();

    if let Some(crawl) = &summary.crawl {
        println!("Listing:");
        println!("  Pages analyzed: {}", crawl.pages);
        println!("  Empty-render waits: {}", crawl.empty_render_retries);
        println!("  Termination: {}", crawl.termination);
        println!();
    }

    if let Some(posts) = summary.api_posts {
        println!("Remote API:");
        println!("  Posts collected: {}", posts);
        println!();
    }

    print_downloads(&summary.downloads);
}

fn print_downloads(report: &BatchReport) {
    println!("Downloads:");
    if report.total == 0 {
        println!("  Nothing to download");
        return;
    }

    for (label, count) in [
        ("Done", report.done),
        ("Skipped", report.skipped),
        ("Failed", report.failed),
        ("Cancelled", report.cancelled),
    ] {
        if count > 0 {
            println!(
                "  {}: {} ({:.1}%)",
                label,
                count,
                percentage(count, report.total)
            );
        }
    }

    println!(
        "Success Rate: {:.1}% ({} / {} files present)",
        percentage(report.done + report.skipped, report.total),
        report.done + report.skipped,
        report.total
    );
}
