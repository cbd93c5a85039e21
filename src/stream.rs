//! Streaming decoder for bulk data files.
//!
//! Bulk exports are a single top-level JSON array that can hold hundreds of
//! thousands of cards. The decoder walks the array with one
//! `serde_json::Deserializer` and hands each element to a callback as soon
//! as it has been decoded, so only one record is held in memory at a time.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use flate2::read::GzDecoder;
use serde::de::{self, DeserializeOwned, DeserializeSeed, Deserializer, SeqAccess, Visitor};
use tracing::debug;

use crate::error::{Result, ScryfallError};
use crate::progress::classify_io;

const EXPECTED_OPEN: &str = "expected '[' at start of bulk data";
const EXPECTED_CLOSE: &str = "expected ']' at end of bulk data";
const DECODE_RECORD: &str = "decode record object";

/// Where the decoder was when the deserializer stopped.
#[derive(Debug, Default)]
struct Cursor {
    /// The opening `[` has been consumed.
    opened: bool,
    /// An element value has started decoding (reset before each element).
    in_record: bool,
    /// Error returned by the record callback, handed back untouched.
    callback_error: Option<ScryfallError>,
}

/// Decode a JSON array of records from `reader`, calling `on_record` once per
/// element in array order.
///
/// Fails with [`ScryfallError::MalformedPayload`] if the payload does not
/// start with `[`, an element cannot be decoded as `T`, or the array is not
/// closed. Records delivered before a failure stay delivered. An error from
/// `on_record` stops decoding immediately and is returned as is. Bytes after
/// the closing `]` are not inspected.
pub fn process_bulk_data_stream<R, T, F>(reader: R, mut on_record: F) -> Result<()>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(T) -> Result<()>,
{
    let mut de = serde_json::Deserializer::from_reader(BufReader::new(reader));
    let mut cursor = Cursor::default();

    let outcome = (&mut de).deserialize_seq(ArrayVisitor {
        cursor: &mut cursor,
        on_record: &mut on_record,
        marker: PhantomData::<T>,
    });

    match outcome {
        Ok(()) => Ok(()),
        Err(err) => Err(classify(err, cursor)),
    }
}

/// Stream a previously downloaded bulk file from disk through
/// [`process_bulk_data_stream`]. Files ending in `.gz` are decompressed on
/// the fly.
pub fn process_bulk_file<P, T, F>(path: P, on_record: F) -> Result<()>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
    F: FnMut(T) -> Result<()>,
{
    let path = path.as_ref();
    debug!(path = %path.display(), "processing bulk file");
    let file = File::open(path)?;

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        process_bulk_data_stream(GzDecoder::new(BufReader::new(file)), on_record)
    } else {
        process_bulk_data_stream(file, on_record)
    }
}

/// Turn a deserializer failure into the error the caller should see.
fn classify(err: serde_json::Error, mut cursor: Cursor) -> ScryfallError {
    if let Some(callback_error) = cursor.callback_error.take() {
        return callback_error;
    }
    if err.is_io() {
        return classify_io(err.into());
    }
    if !cursor.opened {
        ScryfallError::malformed_with(EXPECTED_OPEN, err)
    } else if cursor.in_record {
        ScryfallError::malformed_with(DECODE_RECORD, err)
    } else {
        ScryfallError::malformed_with(EXPECTED_CLOSE, err)
    }
}

// ---------------------------------------------------------------------------
// Visitor plumbing
// ---------------------------------------------------------------------------

struct ArrayVisitor<'a, T, F> {
    cursor: &'a mut Cursor,
    on_record: &'a mut F,
    marker: PhantomData<T>,
}

impl<'de, T, F> Visitor<'de> for ArrayVisitor<'_, T, F>
where
    T: DeserializeOwned,
    F: FnMut(T) -> Result<()>,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON array of records")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        let Self {
            cursor, on_record, ..
        } = self;
        cursor.opened = true;

        loop {
            cursor.in_record = false;
            let seed = RecordSeed {
                started: &mut cursor.in_record,
                marker: PhantomData::<T>,
            };
            let Some(record) = seq.next_element_seed(seed)? else {
                return Ok(());
            };
            if let Err(err) = on_record(record) {
                cursor.callback_error = Some(err);
                return Err(de::Error::custom("record callback failed"));
            }
        }
    }
}

/// Decodes one element, flagging that element decoding has begun so that a
/// failure can be told apart from a broken array separator.
struct RecordSeed<'a, T> {
    started: &'a mut bool,
    marker: PhantomData<T>,
}

impl<'de, T> DeserializeSeed<'de> for RecordSeed<'_, T>
where
    T: DeserializeOwned,
{
    type Value = T;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        *self.started = true;
        T::deserialize(deserializer)
    }
}
