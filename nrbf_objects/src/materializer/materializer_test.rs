#[cfg(test)]
mod test {
    use crate::{
        DrawingPrimitive, FrameworkObject, KnownTypes, ListItems, Materializer, ShapeKind,
        ARRAY_LIST_TYPE_NAME, DRAWING_LIBRARY_NAME, HASHTABLE_TYPE_NAME,
        NOT_SUPPORTED_EXCEPTION_TYPE_NAME,
    };
    use anyhow::Result;
    use nrbf_records::catalog::{BinaryArrayType, ClassTypeInfo, MemberType};
    use nrbf_records::records::{
        ArrayKind, ArrayRecord, BinaryLibrary, BinaryObjectString, ClassKind, ClassMetadata,
        ClassRecord, MemberValue, Record, SerializationHeader,
    };
    use nrbf_records::{BinaryFormattedObject, Id, RecordMap};
    use nrbf_types::serde::{PrimitiveType, PrimitiveValue};
    use nrbf_types::NrbfError;
    use std::sync::Arc;

    type Member<'n> = (&'n str, MemberType, MemberValue);

    /// The first record is the root.
    fn graph(records: Vec<Record>) -> Result<BinaryFormattedObject> {
        let mut map = RecordMap::new();
        let mut top_level_ids = vec![];
        for record in records {
            let is_library = matches!(record, Record::BinaryLibrary(_));
            let id = map.insert(record)?;
            if !is_library {
                top_level_ids.push(id);
            }
        }
        BinaryFormattedObject::new(SerializationHeader::new(top_level_ids[0]), map, top_level_ids)
    }

    fn class(id: i32, name: &str, library_id: Option<i32>, members: Vec<Member>) -> Record {
        let kind = match library_id {
            Some(_) => ClassKind::ClassWithMembersAndTypes,
            None => ClassKind::SystemClassWithMembersAndTypes,
        };
        let metadata = ClassMetadata {
            name: name.to_string(),
            member_names: members.iter().map(|(n, _, _)| n.to_string()).collect(),
            member_types: Some(members.iter().map(|(_, t, _)| t.clone()).collect()),
            library_id: library_id.map(Id::from),
        };
        Record::Class(ClassRecord {
            object_id: Id::from(id),
            kind,
            metadata: Arc::new(metadata),
            member_values: members.into_iter().map(|(_, _, v)| v).collect(),
        })
    }

    fn array(id: i32, kind: ArrayKind, element_type: MemberType, elements: Vec<MemberValue>) -> Record {
        Record::Array(ArrayRecord {
            object_id: Id::from(id),
            kind,
            element_type,
            lengths: vec![elements.len() as i32],
            lower_bounds: vec![],
            elements,
        })
    }

    fn object_array(id: i32, elements: Vec<MemberValue>) -> Record {
        array(id, ArrayKind::SingleObject, MemberType::Object, elements)
    }

    fn string(id: i32, s: &str) -> Record {
        Record::BinaryObjectString(BinaryObjectString {
            object_id: Id::from(id),
            value: s.to_string(),
        })
    }

    fn library(id: i32, name: &str) -> Record {
        Record::BinaryLibrary(BinaryLibrary {
            library_id: Id::from(id),
            library_name: name.to_string(),
        })
    }

    fn int32(name: &str, i: i32) -> Member {
        (name, MemberType::Primitive(PrimitiveType::Int32), MemberValue::Primitive(PrimitiveValue::Int32(i)))
    }

    fn reference(id: i32) -> MemberValue {
        MemberValue::Reference(Id::from(id))
    }

    fn hashtable_members<'n>(comparer: MemberValue) -> Vec<Member<'n>> {
        vec![
            (
                "LoadFactor",
                MemberType::Primitive(PrimitiveType::Single),
                MemberValue::Primitive(PrimitiveValue::Single(0.72)),
            ),
            int32("Version", 1),
            ("Comparer", MemberType::SystemClass("System.Collections.IComparer".into()), comparer),
            (
                "HashCodeProvider",
                MemberType::SystemClass("System.Collections.IHashCodeProvider".into()),
                MemberValue::Null,
            ),
            int32("HashSize", 3),
            ("Keys", MemberType::ObjectArray, reference(2)),
            ("Values", MemberType::ObjectArray, reference(3)),
        ]
    }

    fn framework_object(bfo: &BinaryFormattedObject) -> Result<Option<FrameworkObject>> {
        Materializer::new(bfo).try_get_framework_object()
    }

    fn corrupt(res: Result<Option<FrameworkObject>>) -> bool {
        match res {
            Err(err) => NrbfError::kind_of(&err).is_some_and(NrbfError::is_corrupt),
            Ok(_) => false,
        }
    }

    #[test]
    fn hashtable() -> Result<()> {
        let bfo = graph(vec![
            class(1, HASHTABLE_TYPE_NAME, None, hashtable_members(MemberValue::Null)),
            object_array(2, vec![MemberValue::Object(Id::from(4))]),
            object_array(3, vec![MemberValue::Object(Id::from(5))]),
            string(4, "This"),
            string(5, "That"),
        ])?;
        let obj = framework_object(&bfo)?;
        let table = obj
            .as_ref()
            .and_then(FrameworkObject::as_hashtable)
            .ok_or_else(|| anyhow::anyhow!("no hashtable"))?;
        assert_eq!(1, table.len());
        assert_eq!(Some(&FrameworkObject::string("That")), table.get_str("This"));

        let narrowed = KnownTypes::framework().without(ShapeKind::Hashtable);
        assert_eq!(None, Materializer::with_known_types(&bfo, narrowed).try_get_framework_object()?);
        Ok(())
    }

    #[test]
    fn hashtable_declines() -> Result<()> {
        // A custom comparer is not reconstructed.
        let bfo = graph(vec![
            class(1, HASHTABLE_TYPE_NAME, None, hashtable_members(reference(4))),
            object_array(2, vec![]),
            object_array(3, vec![]),
            class(4, "System.Collections.CaseInsensitiveComparer", None, vec![]),
        ])?;
        assert_eq!(None, framework_object(&bfo)?);

        // A class of the same name from a user library is not the framework hashtable.
        let bfo = graph(vec![
            library(9, "Evil, Version=1.0.0.0"),
            class(1, HASHTABLE_TYPE_NAME, Some(9), hashtable_members(MemberValue::Null)),
            object_array(2, vec![]),
            object_array(3, vec![]),
        ])?;
        assert_eq!(None, framework_object(&bfo)?);

        // A value that is not a scalar.
        let bfo = graph(vec![
            class(1, HASHTABLE_TYPE_NAME, None, hashtable_members(MemberValue::Null)),
            object_array(2, vec![MemberValue::Primitive(PrimitiveValue::Int32(1))]),
            object_array(3, vec![reference(4)]),
            object_array(4, vec![]),
        ])?;
        assert_eq!(None, framework_object(&bfo)?);
        Ok(())
    }

    #[test]
    fn corrupt_hashtables() -> Result<()> {
        let mut members = hashtable_members(MemberValue::Null);
        members.remove(4);
        let bfo = graph(vec![
            class(1, HASHTABLE_TYPE_NAME, None, members),
            object_array(2, vec![]),
            object_array(3, vec![]),
        ])?;
        assert!(corrupt(framework_object(&bfo)));

        let one = MemberValue::Primitive(PrimitiveValue::Int32(1));
        let cases = [
            (vec![one], vec![]),
            (vec![one, one], vec![MemberValue::Null, MemberValue::Null]),
            (vec![MemberValue::Null], vec![one]),
        ];
        for (keys, vals) in cases {
            let bfo = graph(vec![
                class(1, HASHTABLE_TYPE_NAME, None, hashtable_members(MemberValue::Null)),
                object_array(2, keys),
                object_array(3, vals),
            ])?;
            assert!(corrupt(framework_object(&bfo)));
        }

        // Keys that are a string array rather than an object array.
        let bfo = graph(vec![
            class(1, HASHTABLE_TYPE_NAME, None, hashtable_members(MemberValue::Null)),
            array(2, ArrayKind::SingleString, MemberType::String, vec![]),
            object_array(3, vec![]),
        ])?;
        assert!(corrupt(framework_object(&bfo)));
        Ok(())
    }

    #[test]
    fn boxed_primitives() -> Result<()> {
        let m_value = |val: PrimitiveValue| {
            vec![(
                "m_value",
                MemberType::Primitive(PrimitiveType::from(&val)),
                MemberValue::Primitive(val),
            )]
        };
        let bfo = graph(vec![class(1, "System.Int32", None, m_value(PrimitiveValue::Int32(7)))])?;
        let expected = Some(FrameworkObject::Primitive(PrimitiveValue::Int32(7)));
        assert_eq!(expected, framework_object(&bfo)?);
        assert_eq!(expected, Materializer::new(&bfo).try_get_primitive_type()?);

        let bfo = graph(vec![class(1, "System.Int32", None, m_value(PrimitiveValue::Int64(7)))])?;
        assert!(corrupt(framework_object(&bfo)));

        let bfo = graph(vec![class(1, "System.Int32", None, vec![])])?;
        assert!(corrupt(framework_object(&bfo)));

        let bfo = graph(vec![
            library(2, "MyLib"),
            class(1, "System.Int32", Some(2), m_value(PrimitiveValue::Int32(7))),
        ])?;
        assert_eq!(None, framework_object(&bfo)?);
        Ok(())
    }

    #[test]
    fn primitive_type_only_accepts_scalars() -> Result<()> {
        let bfo = graph(vec![string(1, "text")])?;
        assert_eq!(
            Some(FrameworkObject::string("text")),
            Materializer::new(&bfo).try_get_primitive_type()?
        );

        let bfo = graph(vec![object_array(1, vec![])])?;
        assert_eq!(None, Materializer::new(&bfo).try_get_primitive_type()?);
        assert_eq!(Some(FrameworkObject::ObjectArray(vec![])), framework_object(&bfo)?);
        Ok(())
    }

    #[test]
    fn strings_are_shared() -> Result<()> {
        let bfo = graph(vec![
            array(
                1,
                ArrayKind::SingleString,
                MemberType::String,
                vec![MemberValue::Object(Id::from(2)), MemberValue::Null, reference(2)],
            ),
            string(2, "shared"),
        ])?;
        let strs = match framework_object(&bfo)? {
            Some(FrameworkObject::StringArray(strs)) => strs,
            obj => anyhow::bail!("Unexpected {obj:?}"),
        };
        assert_eq!(None, strs[1]);
        match (&strs[0], &strs[2]) {
            (Some(a), Some(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => anyhow::bail!("Missing strings {strs:?}"),
        }
        Ok(())
    }

    #[test]
    fn arrays() -> Result<()> {
        let prims = vec![MemberValue::Primitive(PrimitiveValue::Byte(1)); 3];
        let bfo = graph(vec![array(
            1,
            ArrayKind::Binary(BinaryArrayType::Single),
            MemberType::Primitive(PrimitiveType::Byte),
            prims.clone(),
        )])?;
        assert_eq!(
            Some(FrameworkObject::PrimitiveArray(
                PrimitiveType::Byte,
                vec![PrimitiveValue::Byte(1); 3]
            )),
            framework_object(&bfo)?
        );

        let mut rect = ArrayRecord {
            object_id: Id::from(1),
            kind: ArrayKind::Binary(BinaryArrayType::Rectangular),
            element_type: MemberType::Primitive(PrimitiveType::Byte),
            lengths: vec![1, 3],
            lower_bounds: vec![],
            elements: prims.clone(),
        };
        let bfo = graph(vec![Record::Array(rect.clone())])?;
        assert_eq!(None, framework_object(&bfo)?);

        rect.kind = ArrayKind::Binary(BinaryArrayType::SingleOffset);
        rect.lengths = vec![3];
        rect.lower_bounds = vec![1];
        let bfo = graph(vec![Record::Array(rect)])?;
        assert_eq!(None, framework_object(&bfo)?);

        // An object array holding anything but scalars is declined.
        let bfo = graph(vec![object_array(1, vec![reference(2)]), object_array(2, vec![])])?;
        assert_eq!(None, framework_object(&bfo)?);

        // Arrays of classes are not a framework shape.
        let class_type = MemberType::Class(ClassTypeInfo {
            type_name: "My.Type".to_string(),
            library_id: Id::from(3),
        });
        let bfo = graph(vec![
            library(3, "MyLib"),
            array(1, ArrayKind::Binary(BinaryArrayType::Single), class_type, vec![MemberValue::Null]),
        ])?;
        assert_eq!(None, framework_object(&bfo)?);

        let bfo = graph(vec![array(
            1,
            ArrayKind::SinglePrimitive,
            MemberType::Primitive(PrimitiveType::Byte),
            vec![MemberValue::Null],
        )])?;
        assert!(corrupt(framework_object(&bfo)));
        Ok(())
    }

    #[test]
    fn lists() -> Result<()> {
        let list_name = "System.Collections.Generic.List`1[[System.Int32, mscorlib, Version=4.0.0.0, \
                         Culture=neutral, PublicKeyToken=b77a5c561934e089]]";
        let list = |size| {
            class(
                1,
                list_name,
                None,
                vec![
                    ("_items", MemberType::PrimitiveArray(PrimitiveType::Int32), reference(2)),
                    int32("_size", size),
                    int32("_version", 5),
                ],
            )
        };
        let items = || {
            let vals = (0..4).map(|i| MemberValue::Primitive(PrimitiveValue::Int32(i))).collect();
            array(2, ArrayKind::SinglePrimitive, MemberType::Primitive(PrimitiveType::Int32), vals)
        };

        // Capacity beyond the size is not part of the list.
        let bfo = graph(vec![list(2), items()])?;
        assert_eq!(
            Some(FrameworkObject::List(ListItems::Primitive(
                PrimitiveType::Int32,
                vec![PrimitiveValue::Int32(0), PrimitiveValue::Int32(1)]
            ))),
            framework_object(&bfo)?
        );

        let bfo = graph(vec![list(5), items()])?;
        assert!(corrupt(framework_object(&bfo)));
        let bfo = graph(vec![list(-1), items()])?;
        assert!(corrupt(framework_object(&bfo)));

        let bfo = graph(vec![list(2), items()])?;
        let narrowed = KnownTypes::all().without(ShapeKind::List);
        assert_eq!(None, Materializer::with_known_types(&bfo, narrowed).try_get_framework_object()?);

        let array_list = class(
            1,
            ARRAY_LIST_TYPE_NAME,
            None,
            vec![
                ("_items", MemberType::ObjectArray, reference(2)),
                int32("_size", 1),
                int32("_version", 1),
            ],
        );
        let bfo = graph(vec![
            array_list,
            object_array(2, vec![MemberValue::Object(Id::from(3)), MemberValue::Null]),
            string(3, "x"),
        ])?;
        assert_eq!(
            Some(FrameworkObject::ArrayList(vec![FrameworkObject::string("x")])),
            framework_object(&bfo)?
        );
        Ok(())
    }

    fn exception(id: i32, inner: MemberValue) -> Record {
        let string_type = || MemberType::String;
        class(
            id,
            NOT_SUPPORTED_EXCEPTION_TYPE_NAME,
            None,
            vec![
                ("ClassName", string_type(), reference(100)),
                ("Message", string_type(), MemberValue::Null),
                ("Data", MemberType::SystemClass("System.Collections.IDictionary".into()), MemberValue::Null),
                ("InnerException", MemberType::SystemClass("System.Exception".into()), inner),
                ("StackTraceString", string_type(), MemberValue::Null),
                int32("HResult", -2146233067),
            ],
        )
    }

    #[test]
    fn exceptions() -> Result<()> {
        let bfo = graph(vec![
            exception(1, reference(2)),
            exception(2, MemberValue::Null),
            string(100, NOT_SUPPORTED_EXCEPTION_TYPE_NAME),
        ])?;
        let info = match framework_object(&bfo)? {
            Some(FrameworkObject::Exception(info)) => info,
            obj => anyhow::bail!("Unexpected {obj:?}"),
        };
        assert_eq!(NOT_SUPPORTED_EXCEPTION_TYPE_NAME, &*info.class_name);
        assert_eq!(None, info.help_url);
        let inner = info.inner_exception.ok_or_else(|| anyhow::anyhow!("no inner"))?;
        assert!(Arc::ptr_eq(&info.class_name, &inner.class_name));

        // An exception that is its own inner exception.
        let bfo = graph(vec![
            exception(1, reference(1)),
            string(100, NOT_SUPPORTED_EXCEPTION_TYPE_NAME),
        ])?;
        assert!(corrupt(framework_object(&bfo)));

        let bfo = graph(vec![
            exception(1, reference(2)),
            string(2, "not an exception"),
            string(100, NOT_SUPPORTED_EXCEPTION_TYPE_NAME),
        ])?;
        assert!(corrupt(framework_object(&bfo)));
        Ok(())
    }

    #[test]
    fn drawing_primitives() -> Result<()> {
        let point = |lib_id, members| class(1, "System.Drawing.Point", lib_id, members);
        let xy = || vec![int32("x", 3), int32("y", 4)];

        let bfo = graph(vec![library(2, DRAWING_LIBRARY_NAME), point(Some(2), xy())])?;
        assert_eq!(
            Some(DrawingPrimitive::Point { x: 3, y: 4 }),
            Materializer::new(&bfo).try_get_drawing_primitives_object()?
        );
        assert_eq!(None, framework_object(&bfo)?);

        let older = "System.Drawing, Version=2.0.0.0, Culture=neutral, PublicKeyToken=b03f5f7f11d50a3a";
        let bfo = graph(vec![library(2, older), point(Some(2), xy())])?;
        assert!(Materializer::new(&bfo).try_get_drawing_primitives_object()?.is_some());

        let bfo = graph(vec![library(2, "NotDrawing"), point(Some(2), xy())])?;
        assert_eq!(None, Materializer::new(&bfo).try_get_drawing_primitives_object()?);
        let bfo = graph(vec![point(None, xy())])?;
        assert_eq!(None, Materializer::new(&bfo).try_get_drawing_primitives_object()?);

        let bfo = graph(vec![library(2, DRAWING_LIBRARY_NAME), point(Some(2), vec![int32("x", 3)])])?;
        let res = Materializer::new(&bfo).try_get_drawing_primitives_object();
        assert!(res.is_err_and(|err| NrbfError::kind_of(&err).is_some_and(NrbfError::is_corrupt)));

        let bfo = graph(vec![library(2, DRAWING_LIBRARY_NAME), point(Some(2), xy())])?;
        let res = Materializer::with_known_types(&bfo, KnownTypes::framework())
            .try_get_drawing_primitives_object()?;
        assert_eq!(None, res);
        Ok(())
    }

    #[test]
    fn unknown_classes_are_declined() -> Result<()> {
        let bfo = graph(vec![
            library(2, "MyLib"),
            class(1, "My.Type", Some(2), vec![int32("n", 1)]),
        ])?;
        assert_eq!(None, framework_object(&bfo)?);
        assert_eq!(None, Materializer::new(&bfo).try_get_primitive_type()?);
        assert_eq!(None, Materializer::new(&bfo).try_get_drawing_primitives_object()?);

        let bfo = graph(vec![class(1, "System.Collections.Queue", None, vec![])])?;
        assert_eq!(None, framework_object(&bfo)?);
        Ok(())
    }

    #[test]
    fn class_typed_arrays_are_declined() -> Result<()> {
        let pair_type = "System.Collections.Generic.KeyValuePair`2[[System.String],[System.String]]";
        let pairs_type = MemberType::SystemClass(format!("{pair_type}[]"));
        let pair = class(
            3,
            pair_type,
            None,
            vec![
                ("key", MemberType::String, MemberValue::Object(Id::from(4))),
                ("value", MemberType::String, MemberValue::Null),
            ],
        );
        let pairs = array(
            2,
            ArrayKind::Binary(BinaryArrayType::Single),
            MemberType::SystemClass(pair_type.to_string()),
            vec![reference(3)],
        );
        let dictionary = class(
            1,
            "System.Collections.Generic.Dictionary`2[[System.String],[System.String]]",
            None,
            vec![
                int32("Version", 1),
                (
                    "Comparer",
                    MemberType::SystemClass("System.Collections.Generic.IEqualityComparer`1".into()),
                    MemberValue::Null,
                ),
                int32("HashSize", 3),
                ("KeyValuePairs", pairs_type, reference(2)),
            ],
        );
        let bfo = graph(vec![dictionary, pairs, pair, string(4, "k")])?;
        assert_eq!(None, framework_object(&bfo)?);

        // The same array as the comparer of a hashtable.
        let bfo = graph(vec![
            class(1, HASHTABLE_TYPE_NAME, None, hashtable_members(reference(4))),
            object_array(2, vec![]),
            object_array(3, vec![]),
            array(
                4,
                ArrayKind::Binary(BinaryArrayType::Single),
                MemberType::SystemClass(pair_type.to_string()),
                vec![],
            ),
        ])?;
        assert_eq!(None, framework_object(&bfo)?);

        // Nullable primitives in class-typed slots.
        let bfo = graph(vec![class(
            1,
            "My.Holder",
            None,
            vec![(
                "count",
                MemberType::SystemClass("System.Nullable`1[[System.Int32]]".into()),
                MemberValue::Primitive(PrimitiveValue::Int32(7)),
            )],
        )])?;
        assert_eq!(None, framework_object(&bfo)?);
        Ok(())
    }
}
