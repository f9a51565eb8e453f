use derive_more::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[display(fmt = "queue is absent")]
    Absent,

    #[display(fmt = "could not allocate space for a new element")]
    Alloc,

    #[display(fmt = "queue is empty")]
    Empty,
}

impl std::error::Error for QueueError {}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display(fmt = "unknown {} `{}`", kind, value)]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl ParseOptionError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

impl std::error::Error for ParseOptionError {}
