use super::bytes::Bytes;
use anyhow::Result;
use nrbf_objects::{FrameworkObject, Materializer};
use nrbf_records::catalog::{BinaryType, RecordType};
use nrbf_records::records::{ArrayInfo, MemberValue, Record};
use nrbf_records::{BinaryFormattedObject, Id, ParseOptions, RecordParser};
use nrbf_types::io_utils::CountingReader;
use nrbf_types::serde::{PrimitiveType, PrimitiveValue, ReadResult};
use nrbf_types::NrbfError;
use std::sync::Arc;

fn kind(res: Result<BinaryFormattedObject>) -> Option<NrbfError> {
    match res {
        Ok(_) => None,
        Err(err) => NrbfError::kind_of(&err).cloned(),
    }
}

/// `System.Int32` 42 boxed at the root.
pub fn boxed_int32() -> Vec<u8> {
    Bytes::header(1)
        .system_class(1, "System.Int32", &["m_value"])
        .bin_type(BinaryType::Primitive)
        .prim(PrimitiveType::Int32)
        .i32(42)
        .end()
}

/// A default `System.Collections.Hashtable` holding "This" => "That".
pub fn hashtable_this_that() -> Vec<u8> {
    let members = [
        "LoadFactor",
        "Version",
        "Comparer",
        "HashCodeProvider",
        "HashSize",
        "Keys",
        "Values",
    ];
    Bytes::header(1)
        .system_class(1, "System.Collections.Hashtable", &members)
        .bin_type(BinaryType::Primitive)
        .bin_type(BinaryType::Primitive)
        .bin_type(BinaryType::SystemClass)
        .bin_type(BinaryType::SystemClass)
        .bin_type(BinaryType::Primitive)
        .bin_type(BinaryType::ObjectArray)
        .bin_type(BinaryType::ObjectArray)
        .prim(PrimitiveType::Single)
        .prim(PrimitiveType::Int32)
        .str("System.Collections.IComparer")
        .str("System.Collections.IHashCodeProvider")
        .prim(PrimitiveType::Int32)
        .f32(0.72)
        .i32(1)
        .tag(RecordType::ObjectNull)
        .tag(RecordType::ObjectNull)
        .i32(3)
        .tag(RecordType::MemberReference)
        .i32(2)
        .tag(RecordType::MemberReference)
        .i32(3)
        .object_array(2, 1)
        .string(4, "This")
        .object_array(3, 1)
        .string(5, "That")
        .end()
}

pub fn test_canonical_streams() -> Result<()> {
    let bfo = BinaryFormattedObject::from_bytes(&boxed_int32())?;
    assert_eq!(
        Some(FrameworkObject::Primitive(PrimitiveValue::Int32(42))),
        Materializer::new(&bfo).try_get_primitive_type()?
    );

    let bfo = BinaryFormattedObject::from_bytes(&hashtable_this_that())?;
    assert_eq!(&[Id::from(1), Id::from(2), Id::from(3)], bfo.top_level_ids());
    let obj = Materializer::new(&bfo).try_get_framework_object()?;
    let table = obj
        .as_ref()
        .and_then(FrameworkObject::as_hashtable)
        .ok_or_else(|| anyhow::anyhow!("Not a hashtable: {obj:?}"))?;
    assert_eq!(1, table.len());
    assert_eq!(Some(&FrameworkObject::string("That")), table.get_str("This"));

    // A string array whose second slot refers back to the first string.
    let bytes = Bytes::header(1)
        .tag(RecordType::ArraySingleString)
        .i32(1)
        .i32(4)
        .string(2, "repeated")
        .tag(RecordType::MemberReference)
        .i32(2)
        .tag(RecordType::ObjectNullMultiple256)
        .u8(2)
        .end();
    let bfo = BinaryFormattedObject::from_bytes(&bytes)?;
    let strs = match Materializer::new(&bfo).try_get_framework_object()? {
        Some(FrameworkObject::StringArray(strs)) => strs,
        obj => anyhow::bail!("Not a string array: {obj:?}"),
    };
    assert_eq!(4, strs.len());
    assert!(strs[2..].iter().all(Option::is_none));
    match (&strs[0], &strs[1]) {
        (Some(a), Some(b)) => assert!(Arc::ptr_eq(a, b)),
        _ => anyhow::bail!("Missing strings: {strs:?}"),
    }

    Ok(())
}

pub fn test_streaming_parser() -> Result<()> {
    let bytes = hashtable_this_that();
    let mut r = CountingReader::new(&bytes[..]);
    let mut parser = RecordParser::new(ParseOptions::default());

    let mut root_id = None;
    let mut record_types = vec![];
    let mut total_len = 0;
    loop {
        let (r_len, record) = match parser.parse_next(&mut r)? {
            ReadResult::EOF => break,
            ReadResult::Some(r_len, record) => (r_len, record),
        };
        total_len += r_len;
        record_types.push(record.record_type());
        match record {
            Record::SerializationHeader(header) => root_id = Some(header.root_id),
            Record::MessageEnd => {}
            record => {
                parser.register(record)?;
            }
        }
    }
    assert_eq!(bytes.len(), total_len);
    assert_eq!(
        vec![
            RecordType::SerializedStreamHeader,
            RecordType::SystemClassWithMembersAndTypes,
            RecordType::ArraySingleObject,
            RecordType::ArraySingleObject,
            RecordType::MessageEnd,
        ],
        record_types
    );

    // The strings were defined inside the arrays and registered by the parser itself.
    assert!(parser.record_map().contains(Id::from(4)));
    let root_id = root_id.ok_or_else(|| anyhow::anyhow!("No header"))?;
    let map = parser.finish(root_id)?;
    assert_eq!(5, map.len());
    let keys = map.get(Id::from(2))?.as_array().ok_or_else(|| anyhow::anyhow!("No array"))?;
    assert_eq!(vec![MemberValue::Object(Id::from(4))], keys.elements);

    Ok(())
}

pub fn test_malformed_streams() -> Result<()> {
    let mut r: &[u8] = &[0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF];
    let err = ArrayInfo::deser(&mut r).err();
    let err = err.as_ref().and_then(NrbfError::kind_of);
    assert!(err.is_some_and(NrbfError::is_out_of_range), "{err:?}");

    let mut r: &[u8] = &[0x01, 0x00, 0x00, 0x00, 0x02];
    let err = ArrayInfo::deser(&mut r).err();
    let err = err.as_ref().and_then(NrbfError::kind_of);
    assert!(err.is_some_and(NrbfError::is_unexpected_eos), "{err:?}");

    // Truncated anywhere inside the hashtable.
    let bytes = hashtable_this_that();
    for len in 0..bytes.len() - 1 {
        let res = BinaryFormattedObject::from_bytes(&bytes[..len]);
        let err = kind(res);
        // Exhaustion at a record boundary leaves the root or a reference undefined.
        let ok = err
            .as_ref()
            .is_some_and(|err| err.is_unexpected_eos() || err.is_corrupt());
        assert!(ok, "{len} {err:?}");
    }

    let res = BinaryFormattedObject::from_bytes(&Bytes::header(1).u8(18).end());
    assert_eq!(Some(NrbfError::UnknownRecordType(18)), kind(res));
    let res = BinaryFormattedObject::from_bytes(&Bytes::header(1).u8(21).end());
    assert!(matches!(kind(res), Some(NrbfError::UnsupportedRecord(_))));

    let dangling = Bytes::header(1)
        .object_array(1, 1)
        .tag(RecordType::MemberReference)
        .i32(7)
        .end();
    let res = BinaryFormattedObject::from_bytes(&dangling);
    assert!(kind(res).is_some_and(|err| err.is_corrupt()));

    let no_root = Bytes::header(3).string(1, "x").end();
    let res = BinaryFormattedObject::from_bytes(&no_root);
    assert!(kind(res).is_some_and(|err| err.is_corrupt()));

    Ok(())
}

pub fn test_options() -> Result<()> {
    let unterminated = Bytes::header(1).string(1, "x").unterminated();
    let bfo = BinaryFormattedObject::from_bytes(&unterminated)?;
    assert_eq!(
        Some(FrameworkObject::string("x")),
        Materializer::new(&bfo).try_get_framework_object()?
    );

    let strict = ParseOptions::new().with_require_message_end(true);
    let res = BinaryFormattedObject::parse_with_options(&mut &unterminated[..], &strict);
    assert!(kind(res).is_some_and(|err| err.is_unexpected_eos()));

    let small = ParseOptions::new().with_max_array_elements(2);
    let bytes = Bytes::header(1)
        .object_array(1, 3)
        .tag(RecordType::ObjectNullMultiple256)
        .u8(3)
        .end();
    let res = BinaryFormattedObject::parse_with_options(&mut &bytes[..], &small);
    assert!(kind(res).is_some_and(|err| err.is_out_of_range()));
    BinaryFormattedObject::from_bytes(&bytes)?;

    Ok(())
}
