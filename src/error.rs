use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    #[snafu(display("storage backend unavailable: {message}"))]
    Unavailable { message: String },

    #[snafu(display("failed to read {key}: {message}"))]
    Read { key: String, message: String },

    #[snafu(display("failed to write {key}: {message}"))]
    Write { key: String, message: String },

    #[snafu(display("stored {key} is not a bucket list: {source}"))]
    Decode {
        key: String,
        source: serde_json::Error,
    },

    #[snafu(display("failed to encode buckets: {source}"))]
    Encode { source: serde_json::Error },
}

#[derive(Debug, Snafu, PartialEq)]
#[snafu(visibility(pub))]
pub enum BucketError {
    #[snafu(display("bucket {field} must not be empty"))]
    EmptyField { field: &'static str },
}

#[derive(Debug, Snafu, PartialEq)]
#[snafu(visibility(pub))]
pub enum PageError {
    #[snafu(display("element has no editable value"))]
    NotEditable,

    #[snafu(display("DOM call failed: {message}"))]
    Dom { message: String },

    #[snafu(display("clipboard unavailable: {message}"))]
    ClipboardUnavailable { message: String },
}
