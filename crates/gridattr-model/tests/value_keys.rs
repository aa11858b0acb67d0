use std::collections::{BTreeMap, BTreeSet};

use gridattr_model::{
    AttributeKind, AttributeValue, Color, Font, OpaqueHandle, Pen, PenStyle, PixmapHandle,
    ValueType,
};
use pretty_assertions::assert_eq;

fn sample(ty: ValueType) -> AttributeValue {
    match ty {
        ValueType::Bool => AttributeValue::Bool(true),
        ValueType::Int => AttributeValue::Int(3),
        ValueType::Color => Color::rgb(1, 2, 3).into(),
        ValueType::Pen => Pen::solid(Color::black()).into(),
        ValueType::Font => Font::new("Sans", 12).into(),
        ValueType::String => "text".into(),
        ValueType::Pixmap => PixmapHandle::new(9, 4, 4).into(),
        ValueType::Opaque => OpaqueHandle::new(1).into(),
    }
}

#[test]
fn every_kind_has_a_matching_sample() {
    for kind in AttributeKind::ALL {
        assert_eq!(sample(kind.value_type()).value_type(), kind.value_type(), "{kind}");
    }
}

#[test]
fn pixmaps_with_one_cache_key_share_a_bucket() {
    let mut buckets: BTreeMap<AttributeValue, u32> = BTreeMap::new();
    *buckets
        .entry(PixmapHandle::new(42, 16, 16).into())
        .or_default() += 1;
    *buckets
        .entry(PixmapHandle::new(42, 32, 32).into())
        .or_default() += 1;
    *buckets
        .entry(PixmapHandle::new(43, 16, 16).into())
        .or_default() += 1;
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[&AttributeValue::Pixmap(PixmapHandle::new(42, 0, 0))], 2);
}

#[test]
fn fonts_differing_in_one_field_are_distinct_keys() {
    let plain = Font::new("Sans", 12);
    let mut italic = plain.clone();
    italic.italic = true;
    let keys: BTreeSet<AttributeValue> = [plain.clone(), italic, plain]
        .into_iter()
        .map(AttributeValue::from)
        .collect();
    assert_eq!(keys.len(), 2);
}

#[test]
fn ordering_groups_by_variant_first() {
    let mut values = vec![
        AttributeValue::from("b"),
        AttributeValue::Int(7),
        AttributeValue::from("a"),
        AttributeValue::Bool(false),
        AttributeValue::Int(-1),
        AttributeValue::Pen(Pen::new(PenStyle::Dot, 1, Color::white())),
    ];
    values.sort();
    assert_eq!(
        values,
        vec![
            AttributeValue::Bool(false),
            AttributeValue::Int(-1),
            AttributeValue::Int(7),
            AttributeValue::Pen(Pen::new(PenStyle::Dot, 1, Color::white())),
            AttributeValue::from("a"),
            AttributeValue::from("b"),
        ]
    );
}

#[test]
fn values_serialize_with_type_tags() {
    let json = serde_json::to_value(AttributeValue::Color(Color::new_argb(0xFF112233))).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"type": "color", "value": "#FF112233"})
    );

    let decoded: AttributeValue =
        serde_json::from_value(serde_json::json!({"type": "font", "value": {"family": "Mono"}}))
            .unwrap();
    let expected = Font {
        family: "Mono".to_string(),
        ..Font::default()
    };
    assert_eq!(decoded, AttributeValue::Font(expected));

    let kind = serde_json::to_value(AttributeKind::TopBorderPen).unwrap();
    assert_eq!(kind, serde_json::json!("top_border_pen"));
}
