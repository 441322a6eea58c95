//! Run summary.

use serde::{Deserialize, Serialize};

use crate::ingest::DocumentOutcome;
use textload_core::Result;

/// A document that failed under the isolate-per-document policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub name: String,
    pub path: String,
    pub error: String,
}

/// Totals for one load run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    pub documents: usize,
    pub sections: usize,
    pub bytes: u64,
    pub replaced_chars: usize,
    pub failures: Vec<DocumentFailure>,
}

impl IngestReport {
    pub fn record(&mut self, outcome: &DocumentOutcome) {
        self.documents += 1;
        self.sections += outcome.sections;
        self.bytes += outcome.bytes;
        self.replaced_chars += outcome.replaced_chars;
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn print_report(report: &IngestReport) {
    println!("=== Text Load Report ===");
    println!();
    println!("Documents loaded:   {}", report.documents);
    println!("Sections written:   {}", report.sections);
    println!("Bytes read:         {}", report.bytes);
    println!("Replaced chars:     {}", report.replaced_chars);

    if !report.failures.is_empty() {
        println!();
        println!("Failed documents:");
        for f in &report.failures {
            println!("  - {} ({}): {}", f.name, f.path, f.error);
        }
    }

    println!();
    if report.is_success() {
        println!("Status: OK");
    } else {
        println!("Status: {} DOCUMENT(S) FAILED", report.failures.len());
    }
}
