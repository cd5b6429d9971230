#![allow(dead_code)]

pub mod mocks;

use spsi_lib::domain::entities::{
    EvidenceUpload, LineItemInput, SubmissionDraft, SubmissionValues,
};

pub fn values(sugar: (&str, &str), salt: (&str, &str)) -> SubmissionValues {
    SubmissionValues::new(
        LineItemInput::new(sugar.0, sugar.1),
        LineItemInput::new(salt.0, salt.1),
    )
}

pub fn draft(supervisor_id: &str, sugar: (&str, &str), salt: (&str, &str)) -> SubmissionDraft {
    SubmissionDraft::new(supervisor_id, format!("{supervisor_id} name"), values(sugar, salt))
}

pub fn photo(name: &str) -> EvidenceUpload {
    EvidenceUpload::jpeg(name, format!("bytes of {name}").into_bytes())
}
