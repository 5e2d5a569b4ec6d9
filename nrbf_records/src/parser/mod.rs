use crate::catalog::{
    BinaryArrayType, BinaryType, MemberType, MemberTypeInfo, RecordType, RecordTypeInt,
};
use crate::records::{
    ArrayInfo, ArrayKind, ArrayRecord, BinaryLibrary, BinaryObjectString, ClassInfo, ClassKind,
    ClassMetadata, ClassRecord, Record, SerializationHeader,
};
use crate::{Id, MetadataCache, ParseOptions, RecordMap, SlotAccepts, SlotLayout};
use anyhow::Result;
use nrbf_types::io_utils::{self, CountingReader};
use nrbf_types::serde::{PrimitiveType, PrimitiveTypeInt, PrimitiveValue, ReadResult};
use nrbf_types::NrbfError;
use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;
use tracing::trace;

mod members;

/// Reads records one top-level record at a time.
///
/// Records defined inline within a top-level record (member values, array elements)
/// are registered in the parser's [`RecordMap`] as they are read.
/// Top-level records are returned to the caller, who registers them with [`Self::register`].
pub struct RecordParser {
    options: ParseOptions,
    map: RecordMap,
    metadata: MetadataCache,
    /// Every id read so far, including those of records still being parsed.
    claimed_ids: HashSet<Id>,
    library_ids: HashSet<Id>,
    /// Targets of `MemberReference`s, checked once the stream is complete.
    references: Vec<Id>,
    /// Elements declared by all arrays so far.
    total_elements: usize,
    depth: usize,
}

impl RecordParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            map: RecordMap::new(),
            metadata: MetadataCache::default(),
            claimed_ids: HashSet::new(),
            library_ids: HashSet::new(),
            references: vec![],
            total_elements: 0,
            depth: 0,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn record_map(&self) -> &RecordMap {
        &self.map
    }

    /// Returns [`ReadResult::EOF`] iff the stream is exhausted exactly at a record boundary.
    pub fn parse_next<R: Read>(&mut self, r: &mut CountingReader<R>) -> Result<ReadResult<Record>> {
        let pos_before = r.position();
        let rec_type = match RecordTypeInt::deser(r)? {
            None => return Ok(ReadResult::EOF),
            Some(int) => RecordType::try_from(int)?,
        };
        let record = self.parse_record_body(rec_type, r)?;
        let r_len = r.position() - pos_before;
        trace!("Parsed top-level {:?} record of {} bytes", rec_type, r_len);
        Ok(ReadResult::Some(r_len, record))
    }

    /// Stores a top-level record under its id.
    pub fn register(&mut self, record: Record) -> Result<Id> {
        self.map.insert(record)
    }

    /// Checks that the root and every referenced id were defined, and hands over the map.
    pub fn finish(self, root_id: Id) -> Result<RecordMap> {
        if !self.map.contains(root_id) {
            return Err(NrbfError::corrupt(format!("Root id {root_id} is never defined")).into());
        }
        for id in self.references.iter() {
            if !self.map.contains(*id) {
                return Err(
                    NrbfError::corrupt(format!("Reference to undefined id {id}")).into()
                );
            }
        }
        Ok(self.map)
    }

    fn read_record_type<R: Read>(r: &mut R) -> Result<RecordType> {
        match RecordTypeInt::deser(r)? {
            None => Err(NrbfError::unexpected_eos("record type").into()),
            Some(int) => RecordType::try_from(int),
        }
    }

    fn claim_id(&mut self, id: Id) -> Result<()> {
        if !id.is_valid() {
            return Err(NrbfError::corrupt("Record with id 0").into());
        }
        if !self.claimed_ids.insert(id) {
            return Err(NrbfError::corrupt(format!("Duplicate id {id}")).into());
        }
        Ok(())
    }

    fn parse_record_body<R: Read>(&mut self, rec_type: RecordType, r: &mut R) -> Result<Record> {
        let record = match rec_type {
            RecordType::SerializedStreamHeader => {
                Record::SerializationHeader(SerializationHeader::deser(r)?)
            }
            RecordType::ClassWithId => {
                let (_, object_id) = Id::deser(r)?;
                let (_, metadata_id) = Id::deser(r)?;
                self.claim_id(object_id)?;
                let metadata = self.metadata.resolve(metadata_id)?;
                self.metadata.insert(object_id, Arc::clone(&metadata))?;
                self.parse_class_members(object_id, ClassKind::ClassWithId { metadata_id }, metadata, r)?
            }
            RecordType::SystemClassWithMembers
            | RecordType::ClassWithMembers
            | RecordType::SystemClassWithMembersAndTypes
            | RecordType::ClassWithMembersAndTypes => self.parse_class(rec_type, r)?,
            RecordType::BinaryObjectString => {
                let s = BinaryObjectString::deser(r)?;
                self.claim_id(s.object_id)?;
                Record::BinaryObjectString(s)
            }
            RecordType::BinaryArray => self.parse_binary_array(r)?,
            RecordType::MemberPrimitiveTyped => {
                let prim_type = Self::read_primitive_type(r)?;
                let (_, val) = PrimitiveValue::deser(prim_type, r)?;
                Record::MemberPrimitiveTyped(val)
            }
            RecordType::MemberReference => {
                let (_, id) = Id::deser(r)?;
                if !id.is_valid() {
                    return Err(NrbfError::corrupt("Reference to id 0").into());
                }
                self.references.push(id);
                Record::MemberReference(id)
            }
            RecordType::ObjectNull => Record::ObjectNull,
            RecordType::MessageEnd => Record::MessageEnd,
            RecordType::BinaryLibrary => {
                let lib = BinaryLibrary::deser(r)?;
                self.claim_id(lib.library_id)?;
                self.library_ids.insert(lib.library_id);
                Record::BinaryLibrary(lib)
            }
            RecordType::ObjectNullMultiple256 => {
                let [count] = io_utils::read_array::<1>(r, "null count")?;
                Record::ObjectNullMultiple256(count as u32)
            }
            RecordType::ObjectNullMultiple => {
                let count = i32::from_le_bytes(io_utils::read_array::<4>(r, "null count")?);
                let count = u32::try_from(count)
                    .map_err(|_| NrbfError::out_of_range(format!("Null count {count}")))?;
                Record::ObjectNullMultiple(count)
            }
            RecordType::ArraySinglePrimitive => {
                let (_, info) = ArrayInfo::deser(r)?;
                let prim_type = Self::read_primitive_type(r)?;
                self.parse_single_array(info, ArrayKind::SinglePrimitive, MemberType::Primitive(prim_type), r)?
            }
            RecordType::ArraySingleObject => {
                let (_, info) = ArrayInfo::deser(r)?;
                self.parse_single_array(info, ArrayKind::SingleObject, MemberType::Object, r)?
            }
            RecordType::ArraySingleString => {
                let (_, info) = ArrayInfo::deser(r)?;
                self.parse_single_array(info, ArrayKind::SingleString, MemberType::String, r)?
            }
            RecordType::MethodCall | RecordType::MethodReturn => {
                return Err(NrbfError::unsupported_record(format!("{rec_type:?}")).into());
            }
        };
        Ok(record)
    }

    fn read_primitive_type<R: Read>(r: &mut R) -> Result<PrimitiveType> {
        let (_, int) = PrimitiveTypeInt::deser(r)?;
        PrimitiveType::try_from(int)
    }

    fn parse_class<R: Read>(&mut self, rec_type: RecordType, r: &mut R) -> Result<Record> {
        let ClassInfo {
            object_id,
            name,
            member_names,
        } = ClassInfo::deser(r)?;
        self.claim_id(object_id)?;

        let (kind, has_types, has_library) = match rec_type {
            RecordType::ClassWithMembersAndTypes => (ClassKind::ClassWithMembersAndTypes, true, true),
            RecordType::SystemClassWithMembersAndTypes => {
                (ClassKind::SystemClassWithMembersAndTypes, true, false)
            }
            RecordType::ClassWithMembers => (ClassKind::ClassWithMembers, false, true),
            _ => (ClassKind::SystemClassWithMembers, false, false),
        };

        let member_types = match has_types {
            true => Some(MemberTypeInfo::deser(member_names.len(), r)?),
            false => None,
        };
        let library_id = match has_library {
            false => None,
            true => {
                let (_, lib_id) = Id::deser(r)?;
                if !self.library_ids.contains(&lib_id) {
                    return Err(NrbfError::corrupt(format!(
                        "Class {name:?} names undeclared library {lib_id}"
                    ))
                    .into());
                }
                Some(lib_id)
            }
        };

        let metadata = Arc::new(ClassMetadata {
            name,
            member_names,
            member_types,
            library_id,
        });
        self.metadata.insert(object_id, Arc::clone(&metadata))?;
        self.parse_class_members(object_id, kind, metadata, r)
    }

    fn parse_class_members<R: Read>(
        &mut self,
        object_id: Id,
        kind: ClassKind,
        metadata: Arc<ClassMetadata>,
        r: &mut R,
    ) -> Result<Record> {
        let member_values = self.parse_slots(
            metadata.member_names.len(),
            |member_i| SlotLayout::of(metadata.member_type(member_i)),
            r,
        )?;
        Ok(Record::Class(ClassRecord {
            object_id,
            kind,
            metadata,
            member_values,
        }))
    }

    /// Counts the array against both limits before any of its slots are read.
    fn check_array_len(&mut self, len: usize) -> Result<()> {
        if len > self.options.max_array_elements() {
            return Err(NrbfError::out_of_range(format!(
                "Array of {len} elements exceeds the limit of {}",
                self.options.max_array_elements()
            ))
            .into());
        }
        let total = self.total_elements.saturating_add(len);
        if total > self.options.max_total_elements() {
            return Err(NrbfError::out_of_range(format!(
                "Arrays of {total} elements in all exceed the limit of {}",
                self.options.max_total_elements()
            ))
            .into());
        }
        self.total_elements = total;
        Ok(())
    }

    fn parse_single_array<R: Read>(
        &mut self,
        info: ArrayInfo,
        kind: ArrayKind,
        element_type: MemberType,
        r: &mut R,
    ) -> Result<Record> {
        self.claim_id(info.object_id)?;
        let len = info.length as usize;
        self.check_array_len(len)?;
        let layout = SlotLayout::of(Some(&element_type));
        let elements = self.parse_slots(len, |_| layout, r)?;
        Ok(Record::Array(ArrayRecord {
            object_id: info.object_id,
            kind,
            element_type,
            lengths: vec![info.length as i32],
            lower_bounds: vec![],
            elements,
        }))
    }

    fn read_i32s<R: Read>(count: usize, what: &'static str, r: &mut R) -> Result<Vec<i32>> {
        let mut ints = Vec::with_capacity(count.min(32));
        for _ in 0..count {
            ints.push(i32::from_le_bytes(io_utils::read_array::<4>(r, what)?));
        }
        Ok(ints)
    }

    fn parse_binary_array<R: Read>(&mut self, r: &mut R) -> Result<Record> {
        let (_, object_id) = Id::deser(r)?;
        let bin_arr_type = BinaryArrayType::deser(r)?;
        let rank = i32::from_le_bytes(io_utils::read_array::<4>(r, "array rank")?);
        let rank = match usize::try_from(rank) {
            Ok(rank) if rank >= 1 => rank,
            _ => return Err(NrbfError::out_of_range(format!("Array rank {rank}")).into()),
        };
        if bin_arr_type.is_single_dimension() && rank != 1 {
            return Err(NrbfError::corrupt(format!(
                "{bin_arr_type:?} array with rank {rank}"
            ))
            .into());
        }

        let lengths = Self::read_i32s(rank, "array length", r)?;
        let lower_bounds = match bin_arr_type.has_lower_bounds() {
            true => Self::read_i32s(rank, "array lower bound", r)?,
            false => vec![],
        };
        let bin_type = BinaryType::deser(r)?;
        let element_type = MemberType::deser_additional_info(bin_type, r)?;

        let mut len = 1usize;
        for length in lengths.iter() {
            let length = usize::try_from(*length)
                .map_err(|_| NrbfError::out_of_range(format!("Array length {length}")))?;
            len = len
                .checked_mul(length)
                .ok_or_else(|| NrbfError::out_of_range("Array element count overflows"))?;
        }
        self.check_array_len(len)?;
        self.claim_id(object_id)?;

        let layout = SlotLayout::of(Some(&element_type));
        let elements = self.parse_slots(len, |_| layout, r)?;
        Ok(Record::Array(ArrayRecord {
            object_id,
            kind: ArrayKind::Binary(bin_arr_type),
            element_type,
            lengths,
            lower_bounds,
            elements,
        }))
    }

    /// Parses one record in a member or element position.
    /// Any `BinaryLibrary` records preceding it are registered on the way.
    fn parse_slot_record<R: Read>(&mut self, accepts: SlotAccepts, r: &mut R) -> Result<Record> {
        loop {
            let rec_type = Self::read_record_type(r)?;
            if rec_type == RecordType::BinaryLibrary {
                let lib = self.parse_record_body(rec_type, r)?;
                self.map.insert(lib)?;
                continue;
            }

            if self.depth >= self.options.max_depth() {
                return Err(NrbfError::corrupt(format!(
                    "Records nested deeper than {}",
                    self.options.max_depth()
                ))
                .into());
            }
            self.depth += 1;
            let record = self.parse_record_body(rec_type, r);
            self.depth -= 1;
            let record = record?;

            if !accepts.accepts(&record) {
                return Err(NrbfError::corrupt(format!(
                    "{rec_type:?} record in a slot that takes {accepts:?}"
                ))
                .into());
            }
            trace!("Parsed nested {:?} record at depth {}", rec_type, self.depth + 1);
            return Ok(record);
        }
    }
}
