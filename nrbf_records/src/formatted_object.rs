use crate::records::{Record, SerializationHeader};
use crate::{Id, ParseOptions, RecordMap, RecordParser, RecordWriter};
use anyhow::Result;
use nrbf_types::io_utils::CountingReader;
use nrbf_types::serde::{ReadResult, WriteLen};
use nrbf_types::NrbfError;
use std::io::{Read, Write};
use tracing::debug;

/// One fully parsed stream: its header, and every id-bearing record keyed by id.
///
/// Parsing fails fast. A malformed stream yields an error and no partial object.
#[derive(PartialEq, Debug)]
pub struct BinaryFormattedObject {
    header: SerializationHeader,
    map: RecordMap,
    /// Ids of the records that appeared at the top level of the stream, in stream order.
    /// Libraries are excluded.
    top_level_ids: Vec<Id>,
}

impl BinaryFormattedObject {
    pub fn parse(r: &mut impl Read) -> Result<Self> {
        Self::parse_with_options(r, &ParseOptions::default())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = bytes;
        Self::parse(&mut r)
    }

    pub fn parse_with_options(r: &mut impl Read, options: &ParseOptions) -> Result<Self> {
        let mut r = CountingReader::new(r);
        let mut parser = RecordParser::new(options.clone());

        let header = match parser.parse_next(&mut r)? {
            ReadResult::EOF => return Err(NrbfError::unexpected_eos("stream header").into()),
            ReadResult::Some(_, Record::SerializationHeader(header)) => header,
            ReadResult::Some(_, record) => {
                return Err(NrbfError::corrupt(format!(
                    "Stream starts with a {:?} record",
                    record.record_type()
                ))
                .into());
            }
        };

        let mut top_level_ids = vec![];
        loop {
            let record = match parser.parse_next(&mut r)? {
                ReadResult::EOF if options.is_require_message_end() => {
                    return Err(NrbfError::unexpected_eos("MessageEnd record").into());
                }
                ReadResult::EOF | ReadResult::Some(_, Record::MessageEnd) => break,
                ReadResult::Some(_, record) => record,
            };
            match record {
                Record::BinaryLibrary(_) => {
                    parser.register(record)?;
                }
                Record::Class(_) | Record::BinaryObjectString(_) | Record::Array(_) => {
                    top_level_ids.push(parser.register(record)?);
                }
                record => {
                    return Err(NrbfError::corrupt(format!(
                        "{:?} record at the top level",
                        record.record_type()
                    ))
                    .into());
                }
            }
        }

        let map = parser.finish(header.root_id)?;
        debug!(
            "Parsed stream of {} bytes: {} records, root id {}",
            r.position(),
            map.len(),
            header.root_id
        );
        Ok(Self {
            header,
            map,
            top_level_ids,
        })
    }

    /// Assembles an object from records built in memory, eg for writing.
    pub fn new(header: SerializationHeader, map: RecordMap, top_level_ids: Vec<Id>) -> Result<Self> {
        if !map.contains(header.root_id) {
            return Err(NrbfError::MissingId(*header.root_id).into());
        }
        Ok(Self {
            header,
            map,
            top_level_ids,
        })
    }

    pub fn header(&self) -> &SerializationHeader {
        &self.header
    }
    pub fn root_id(&self) -> Id {
        self.header.root_id
    }
    pub fn record_map(&self) -> &RecordMap {
        &self.map
    }
    pub fn top_level_ids(&self) -> &[Id] {
        &self.top_level_ids
    }

    pub fn root_record(&self) -> Result<&Record> {
        self.map.get(self.header.root_id)
    }

    pub fn ser(&self, w: &mut impl Write) -> Result<WriteLen> {
        RecordWriter::new(&self.map).ser_stream(&self.header, &self.top_level_ids, w)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = vec![];
        self.ser(&mut buf)?;
        Ok(buf)
    }
}
