use crate::error::{LedgerError, Result};
use std::io::Read;

/// One named operation with its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub operation: String,
    pub args: Vec<String>,
}

/// Reads invocations from a CSV source.
///
/// Each record is `operation,arg1,arg2,...`. There is no header row, records
/// may have any length, fields are trimmed and lines starting with `#` are
/// skipped.
pub struct InvocationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InvocationReader<R> {
    /// Creates a new `InvocationReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads invocations.
    pub fn invocations(self) -> impl Iterator<Item = Result<Invocation>> {
        self.reader.into_records().filter_map(|record| match record {
            Ok(record) => {
                let mut fields = record.iter().map(str::to_string);
                let operation = fields.next().filter(|op| !op.is_empty())?;
                Some(Ok(Invocation {
                    operation,
                    args: fields.collect(),
                }))
            }
            Err(err) => Some(Err(LedgerError::from(err))),
        })
    }
}
