use crate::catalog::MemberType;
use crate::records::{ArrayRecord, ClassKind, ClassRecord, MemberValue, Record, SerializationHeader};
use crate::{Id, RecordMap, SlotLayout};
use anyhow::Result;
use nrbf_types::serde::{PrimitiveType, WriteLen};
use nrbf_types::NrbfError;
use std::collections::HashSet;
use std::io::Write;


/// Writes the records of a [`RecordMap`] back out as a stream.
///
/// Each record given by id is written with everything it defines inline.
/// A `BinaryLibrary` is written immediately before the first class record that needs it.
pub struct RecordWriter<'a> {
    map: &'a RecordMap,
    written_libraries: HashSet<Id>,
}

impl<'a> RecordWriter<'a> {
    pub fn new(map: &'a RecordMap) -> Self {
        Self {
            map,
            written_libraries: HashSet::new(),
        }
    }

    pub fn ser_stream(
        &mut self,
        header: &SerializationHeader,
        top_level_ids: &[Id],
        w: &mut impl Write,
    ) -> Result<WriteLen> {
        let mut w_len = *header.ser(w)?;
        for id in top_level_ids {
            self.ser_record(*id, w, &mut w_len)?;
        }
        Record::MessageEnd.ser_leaf(w, &mut w_len)?;
        Ok(WriteLen::new_manual(w_len))
    }

    pub fn ser_record<W: Write>(&mut self, id: Id, w: &mut W, w_len: &mut usize) -> Result<()> {
        match self.map.get(id)? {
            Record::Class(class) => self.ser_class(class, w, w_len),
            Record::Array(array) => self.ser_array(array, w, w_len),
            Record::BinaryLibrary(_) => self.ser_library(id, w, w_len),
            record => record.ser_leaf(w, w_len),
        }
    }

    fn ser_library<W: Write>(&mut self, lib_id: Id, w: &mut W, w_len: &mut usize) -> Result<()> {
        if !self.written_libraries.insert(lib_id) {
            return Ok(());
        }
        let lib = self.map.get(lib_id)?;
        if lib.as_library().is_none() {
            return Err(NrbfError::corrupt(format!("Id {lib_id} is not a library")).into());
        }
        lib.ser_leaf(w, w_len)
    }

    fn ser_libraries_of<W: Write>(
        &mut self,
        memb_type: &MemberType,
        w: &mut W,
        w_len: &mut usize,
    ) -> Result<()> {
        if let MemberType::Class(info) = memb_type {
            self.ser_library(info.library_id, w, w_len)?;
        }
        Ok(())
    }

    fn ser_class<W: Write>(&mut self, class: &ClassRecord, w: &mut W, w_len: &mut usize) -> Result<()> {
        if !matches!(class.kind, ClassKind::ClassWithId { .. }) {
            if let Some(lib_id) = class.library_id() {
                self.ser_library(lib_id, w, w_len)?;
            }
            for memb_type in class.metadata.member_types.iter().flatten() {
                self.ser_libraries_of(memb_type, w, w_len)?;
            }
        }

        class.ser_head(w, w_len)?;

        if class.member_values.len() != class.member_names().len() {
            return Err(NrbfError::corrupt(format!(
                "Class {:?} has {} member names and {} values",
                class.name(),
                class.member_names().len(),
                class.member_values.len()
            ))
            .into());
        }
        for (member_i, val) in class.member_values.iter().enumerate() {
            let layout = SlotLayout::of(class.metadata.member_type(member_i));
            self.ser_value(layout, val, w, w_len)?;
        }
        Ok(())
    }

    fn ser_array<W: Write>(&mut self, array: &ArrayRecord, w: &mut W, w_len: &mut usize) -> Result<()> {
        self.ser_libraries_of(&array.element_type, w, w_len)?;
        array.ser_head(w, w_len)?;

        let layout = SlotLayout::of(Some(&array.element_type));
        let mut elements = array.elements.iter().peekable();
        while let Some(val) = elements.next() {
            if val.is_null() && matches!(layout, SlotLayout::Record(_)) {
                let mut null_count = 1u32;
                while elements.next_if(|val| val.is_null()).is_some() {
                    null_count += 1;
                }
                Record::null_run(null_count).ser_leaf(w, w_len)?;
            } else {
                self.ser_value(layout, val, w, w_len)?;
            }
        }
        Ok(())
    }

    fn ser_value<W: Write>(
        &mut self,
        layout: SlotLayout,
        val: &MemberValue,
        w: &mut W,
        w_len: &mut usize,
    ) -> Result<()> {
        match (layout, val) {
            (SlotLayout::Inline(prim_type), MemberValue::Primitive(prim_val)) => {
                if prim_type != PrimitiveType::from(prim_val) {
                    return Err(NrbfError::corrupt(format!(
                        "{prim_val:?} in a {prim_type:?} slot"
                    ))
                    .into());
                }
                *w_len += *prim_val.ser(w)?;
                Ok(())
            }
            (SlotLayout::Inline(prim_type), val) => {
                Err(NrbfError::corrupt(format!("{val:?} in a {prim_type:?} slot")).into())
            }
            (SlotLayout::Record(_), MemberValue::Null) => Record::ObjectNull.ser_leaf(w, w_len),
            (SlotLayout::Record(_), MemberValue::Primitive(prim_val)) => {
                Record::MemberPrimitiveTyped(*prim_val).ser_leaf(w, w_len)
            }
            (SlotLayout::Record(_), MemberValue::Reference(id)) => {
                Record::MemberReference(*id).ser_leaf(w, w_len)
            }
            (SlotLayout::Record(_), MemberValue::Object(id)) => self.ser_record(*id, w, w_len),
        }
    }
}
