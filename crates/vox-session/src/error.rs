use thiserror::Error;

use vox_directory::DirectoryError;
use vox_voice::VoiceError;

/// Failures during session bootstrap.
///
/// A bootstrap error aborts the whole sequence: no partial role or
/// selection state is ever committed from a failed run.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Voice(#[from] VoiceError),
}
