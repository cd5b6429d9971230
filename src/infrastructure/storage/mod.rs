pub mod file_evidence_storage;

pub use file_evidence_storage::FileEvidenceStorage;
