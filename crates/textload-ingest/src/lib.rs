//! textload ingest — directory enumeration, byte chunking, and the per-file load driver.

pub mod chunking;
pub mod ingest;
pub mod report;
pub mod scan;

pub use chunking::{expected_section_count, ByteChunker, DecodedSection, RawSection, Sections};
pub use ingest::{load_directory, DocumentOutcome, Loader};
pub use report::{print_report, DocumentFailure, IngestReport};
pub use scan::{document_name, enumerate_documents, DocumentEntry};
