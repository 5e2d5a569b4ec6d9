use super::decode::{boxed_int32, hashtable_this_that};
use anyhow::Result;
use itertools::Itertools;
use nrbf_objects::{
    try_write_drawing_primitives_object, try_write_framework_object, Color, DrawingPrimitive,
    ExceptionInfo, FrameworkObject, Hashtable, ListItems, Materializer,
};
use nrbf_records::BinaryFormattedObject;
use nrbf_types::serde::{PrimitiveType, PrimitiveValue};
use rand::Rng;
use std::sync::Arc;

fn write(value: &FrameworkObject) -> Result<Vec<u8>> {
    let mut buf = vec![];
    assert!(try_write_framework_object(&mut buf, value)?, "{value:?}");
    Ok(buf)
}

fn read(bytes: &[u8]) -> Result<Option<FrameworkObject>> {
    let bfo = BinaryFormattedObject::from_bytes(bytes)?;
    let mut materializer = Materializer::new(&bfo);
    materializer.try_get_framework_object()
}

pub fn test_canonical_bytes() -> Result<()> {
    let value = FrameworkObject::Primitive(PrimitiveValue::Int32(42));
    assert_eq!(boxed_int32(), write(&value)?);

    let table: Hashtable = [(FrameworkObject::string("This"), FrameworkObject::string("That"))]
        .into_iter()
        .collect();
    assert_eq!(hashtable_this_that(), write(&FrameworkObject::Hashtable(table))?);

    Ok(())
}

pub fn test_random_round_trips() -> Result<()> {
    let mut rng = rand::thread_rng();

    for _ in 0..20 {
        let len = rng.gen_range(0..300);
        let ints = (0..len)
            .map(|_| PrimitiveValue::Int32(rng.gen::<i32>()))
            .collect_vec();
        let doubles = (0..len)
            .map(|_| PrimitiveValue::Double(rng.gen::<f64>()))
            .collect_vec();
        let strs = (0..len)
            .map(|_| match rng.gen_range(0..4) {
                0 => None,
                i => Some(Arc::<str>::from(format!("s{i}"))),
            })
            .collect_vec();
        let objs = (0..len)
            .map(|i| match rng.gen_range(0..3) {
                0 => FrameworkObject::Null,
                1 => FrameworkObject::from(PrimitiveValue::Int64(i as i64)),
                _ => FrameworkObject::string(&format!("o{}", i % 7)),
            })
            .collect_vec();
        let table: Hashtable = (0..len)
            .map(|i| {
                let key = FrameworkObject::string(&format!("k{i}"));
                (key, objs[i].clone())
            })
            .collect();

        let values = [
            FrameworkObject::PrimitiveArray(PrimitiveType::Int32, ints.clone()),
            FrameworkObject::PrimitiveArray(PrimitiveType::Double, doubles),
            FrameworkObject::StringArray(strs.clone()),
            FrameworkObject::ObjectArray(objs.clone()),
            FrameworkObject::List(ListItems::Primitive(PrimitiveType::Int32, ints)),
            FrameworkObject::List(ListItems::String(strs)),
            FrameworkObject::ArrayList(objs),
            FrameworkObject::Hashtable(table),
        ];
        for value in values {
            let bytes = write(&value)?;
            assert_eq!(Some(value), read(&bytes)?);
        }
    }

    for _ in 0..20 {
        let point = DrawingPrimitive::RectangleF {
            x: rng.gen(),
            y: rng.gen(),
            width: rng.gen(),
            height: rng.gen(),
        };
        let color = DrawingPrimitive::Color(Color::from_argb(rng.gen()));
        for value in [point, color] {
            let mut bytes = vec![];
            assert!(try_write_drawing_primitives_object(&mut bytes, &value)?);
            let bfo = BinaryFormattedObject::from_bytes(&bytes)?;
            let read = Materializer::new(&bfo).try_get_drawing_primitives_object()?;
            assert_eq!(Some(value), read);
        }
    }

    Ok(())
}

pub fn test_idempotent_reparse() -> Result<()> {
    let mut exception = ExceptionInfo::not_supported("outer");
    exception.inner_exception = Some(Box::new(ExceptionInfo::not_supported("inner")));
    exception.data = Some(
        [(FrameworkObject::string("outer"), FrameworkObject::from(PrimitiveValue::Boolean(true)))]
            .into_iter()
            .collect(),
    );

    let streams = [
        boxed_int32(),
        hashtable_this_that(),
        write(&FrameworkObject::Exception(exception))?,
    ];
    for bytes in streams {
        let bfo = BinaryFormattedObject::from_bytes(&bytes)?;
        let rewritten = bfo.to_bytes()?;
        assert_eq!(bytes, rewritten);
        assert_eq!(bfo, BinaryFormattedObject::from_bytes(&rewritten)?);
    }

    Ok(())
}
