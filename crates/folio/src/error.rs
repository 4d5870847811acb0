/// Failures talking to the book catalog
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Catalog returned HTTP {0}")]
    Status(u16),

    #[error("Could not decode catalog response: {0}")]
    Decode(String),
}
