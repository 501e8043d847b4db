//! Console presentation of run progress
//!
//! The presenter runs as its own task and only sees what arrives over the
//! progress channel. It acknowledges every event after printing it.

use crate::core::export::ExportSummary;
use crate::core::progress::{ProgressEvent, ProgressKind, ProgressReceiver};
use tokio::task::JoinHandle;

/// Spawns the console presenter; resolves to the number of events shown
/// once every sender is dropped
pub fn spawn_console_presenter(mut receiver: ProgressReceiver) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut shown = 0;
        while let Some(envelope) = receiver.recv().await {
            println!("{}", format_event(envelope.event()));
            envelope.acknowledge();
            shown += 1;
        }
        shown
    })
}

/// One console line per event
pub fn format_event(event: &ProgressEvent) -> String {
    let icon = match event.kind {
        ProgressKind::Info => "⏳",
        ProgressKind::Success => "✅",
        ProgressKind::Error => "❌",
    };
    format!("{icon} {}", event.body)
}

/// Prints the final counts of a run
pub fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Summary:");
    println!("  Books: {}", summary.total);
    println!("  Exported: {}", summary.exported);
    println!("  Without notes: {}", summary.empty);
    println!("  Failed: {}", summary.failed());
    if summary.interrupted {
        println!("  Not processed: {}", summary.not_processed);
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    if summary.has_failures() {
        println!();
        println!("⚠️  Failed books:");
        for (title, reason) in summary.failed_titles.iter().zip(&summary.failures) {
            println!("  - {title}: {reason}");
        }
    }
    println!();
}

/// Exit code for a run that produced a summary
///
/// 130 when interrupted, 1 when some books failed, 0 otherwise.
pub fn summary_exit_code(summary: &ExportSummary) -> i32 {
    if summary.interrupted {
        130
    } else if summary.has_failures() {
        1
    } else {
        0
    }
}
