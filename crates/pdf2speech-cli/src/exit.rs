//! Process exit codes.

use std::process::ExitCode;

use runtime::PipelineFailure;
use tts_core::{ErrorKind, TtsError};

/// Exit code for configuration and invalid-input errors.
pub const CONFIG: u8 = 9;

/// Exit code for an error kind.
pub fn code_for(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DocumentNotFound => 2,
        ErrorKind::EmptyDocument => 3,
        ErrorKind::NoExtractableText => 4,
        ErrorKind::ModelLoad => 5,
        ErrorKind::Synthesis => 6,
        ErrorKind::EmptyInput => 7,
        ErrorKind::DocumentOpen => 8,
        ErrorKind::Config | ErrorKind::InvalidInput => CONFIG,
        ErrorKind::PageExtraction | ErrorKind::Io | ErrorKind::Internal => 1,
    }
}

/// Kind of the first pipeline or library error in the chain.
pub fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.chain().find_map(|cause| {
        if let Some(failure) = cause.downcast_ref::<PipelineFailure>() {
            Some(failure.kind())
        } else {
            cause.downcast_ref::<TtsError>().map(TtsError::kind)
        }
    })
}

/// Exit code for a command error; 1 when no known error is in the chain.
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(error_kind(err).map_or(1, code_for))
}
