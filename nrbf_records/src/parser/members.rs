use super::RecordParser;
use crate::records::{MemberValue, Record};
use crate::SlotLayout;
use anyhow::Result;
use nrbf_types::serde::PrimitiveValue;
use nrbf_types::NrbfError;
use std::io::Read;
use std::iter;

/// Declared counts come from untrusted bytes; never preallocate more slots than this.
const SLOTS_PREALLOC_LIMIT: usize = 1 << 12;

impl RecordParser {
    /// Parses `count` member or element slots.
    ///
    /// A null run fills that many slots at once. It must be non-empty, must not run past the last
    /// slot, must not be immediately followed by another null run, and may only cover record slots.
    pub(super) fn parse_slots<R: Read>(
        &mut self,
        count: usize,
        layout_of: impl Fn(usize) -> SlotLayout,
        r: &mut R,
    ) -> Result<Vec<MemberValue>> {
        let mut values = Vec::with_capacity(count.min(SLOTS_PREALLOC_LIMIT));
        let mut follows_null_run = false;

        while values.len() < count {
            let slot_i = values.len();
            let accepts = match layout_of(slot_i) {
                SlotLayout::Inline(prim_type) => {
                    let (_, val) = PrimitiveValue::deser(prim_type, r)?;
                    values.push(MemberValue::Primitive(val));
                    follows_null_run = false;
                    continue;
                }
                SlotLayout::Record(accepts) => accepts,
            };

            let record = self.parse_slot_record(accepts, r)?;
            let null_count = match record {
                Record::ObjectNullMultiple256(n) | Record::ObjectNullMultiple(n) => n as usize,
                record => {
                    values.push(self.slot_value(record)?);
                    follows_null_run = false;
                    continue;
                }
            };

            if null_count == 0 {
                return Err(NrbfError::corrupt("Null run of zero slots").into());
            }
            if follows_null_run {
                return Err(NrbfError::corrupt(format!(
                    "Consecutive null runs at slot {slot_i}"
                ))
                .into());
            }
            let remaining = count - slot_i;
            if null_count > remaining {
                return Err(NrbfError::corrupt(format!(
                    "Null run of {null_count} slots where {remaining} remain"
                ))
                .into());
            }
            if let Some(inline_i) =
                (slot_i..slot_i + null_count).find(|i| matches!(layout_of(*i), SlotLayout::Inline(_)))
            {
                return Err(NrbfError::corrupt(format!(
                    "Null run covers primitive slot {inline_i}"
                ))
                .into());
            }

            values.extend(iter::repeat(MemberValue::Null).take(null_count));
            follows_null_run = true;
        }

        Ok(values)
    }

    /// Turns a record read in a slot into the slot's value,
    /// storing it in the map if it defines an object.
    fn slot_value(&mut self, record: Record) -> Result<MemberValue> {
        let val = match record {
            Record::ObjectNull => MemberValue::Null,
            Record::MemberReference(id) => MemberValue::Reference(id),
            Record::MemberPrimitiveTyped(val) => MemberValue::Primitive(val),
            record => MemberValue::Object(self.map.insert(record)?),
        };
        Ok(val)
    }
}
