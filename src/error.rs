use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlateDwellError {
    #[error("could not open capture source: {0}")]
    CaptureUnavailable(String),

    #[error("capture returned no frame")]
    EndOfStream,

    #[error(transparent)]
    OpenCv(#[from] opencv::Error),

    #[error("ocr engine failure: {0}")]
    Ocr(String),
}

pub type Result<T> = std::result::Result<T, PlateDwellError>;
