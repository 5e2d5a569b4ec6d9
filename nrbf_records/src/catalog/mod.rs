//! # Record catalog
//!
//! A stream is a sequence of records. Every record starts with a `u8` [`RecordType`] tag.
//!
//! ```text
//! struct Stream {
//!     header:     SerializedStreamHeader,
//!     records:    [Record; ..],
//!     end:        MessageEnd,
//! }
//!
//! struct SerializedStreamHeader {   // tag 0
//!     root_id:        i32,
//!     header_id:      i32,
//!     major_version:  i32,    // 1
//!     minor_version:  i32,    // 0
//! }
//!
//! struct ClassInfo {
//!     object_id:      i32,
//!     name:           LengthPrefixedString,
//!     member_count:   i32,
//!     member_names:   [LengthPrefixedString; member_count],
//! }
//!
//! struct MemberTypeInfo {
//!     binary_types:       [u8; member_count],
//!     additional_infos:   [AdditionalInfo; ..],   // one per binary_type that carries one
//! }
//!
//! struct ClassWithMembersAndTypes {         // tag 5; tag 4 omits library_id
//!     class_info:         ClassInfo,
//!     member_type_info:   MemberTypeInfo,
//!     library_id:         i32,
//!     member_values:      [Value; member_count],
//! }
//!
//! struct ClassWithMembers {                 // tag 3; tag 2 omits library_id
//!     class_info:         ClassInfo,
//!     library_id:         i32,
//!     member_values:      [Record; member_count],
//! }
//!
//! struct ClassWithId {                      // tag 1
//!     object_id:          i32,
//!     metadata_id:        i32,    // object_id of an earlier class record
//!     member_values:      [Value; ..],
//! }
//!
//! struct BinaryObjectString { object_id: i32, value: LengthPrefixedString }    // tag 6
//! struct MemberPrimitiveTyped { primitive_type: u8, value: Primitive }        // tag 8
//! struct MemberReference { id_ref: i32 }                                      // tag 9
//! struct ObjectNull {}                                                        // tag 10
//! struct MessageEnd {}                                                        // tag 11
//! struct BinaryLibrary { library_id: i32, name: LengthPrefixedString }        // tag 12
//! struct ObjectNullMultiple256 { null_count: u8 }                             // tag 13
//! struct ObjectNullMultiple { null_count: i32 }                               // tag 14
//!
//! struct ArrayInfo { object_id: i32, length: i32 }
//! struct ArraySinglePrimitive { array_info, primitive_type: u8, [Primitive; length] }   // tag 15
//! struct ArraySingleObject { array_info, [Record; ..] }                               // tag 16
//! struct ArraySingleString { array_info, [Record; ..] }                               // tag 17
//!
//! struct BinaryArray {                      // tag 7
//!     object_id:          i32,
//!     binary_array_type:  u8,
//!     rank:               i32,
//!     lengths:            [i32; rank],
//!     lower_bounds:       [i32; rank],    // only for the *Offset array types
//!     binary_type:        u8,
//!     additional_info:    AdditionalInfo, // if binary_type carries one
//!     elements:           [Value; ..],
//! }
//! ```
//!
//! A `Value` is an untagged primitive if the member's binary type is `Primitive`,
//! and otherwise a record. A `Record` in a value position may be preceded by
//! any number of `BinaryLibrary` records.
//!
//! Null runs (`ObjectNullMultiple*`) stand for that many consecutive null slots.

mod binary_array_type;
mod member_type;
mod record_type;

pub use binary_array_type::*;
pub use member_type::*;
pub use record_type::*;
