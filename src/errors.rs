use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("A node cannot be its own parent")]
    SelfParent,

    #[error("Linking would create a cycle: the child is an ancestor of the parent")]
    CycleRejected,

    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Serialized output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type TreeResult<T> = Result<T, TreeError>;
