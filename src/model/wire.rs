//! Wire encoding for gateway and dashboard payloads.
//!
//! [`Float64`](super::Float64) and [`Percent`](super::Percent) serialize as
//! strings everywhere except in request bodies, where the backends expect JSON
//! numbers. [`to_wire_vec`] and [`to_wire_value`] wrap the target serializer in
//! [`WireSerializer`], which recognises those two types by their newtype name
//! and emits a number instead.

use serde::ser::{
    Error as _, Serialize, SerializeMap, SerializeSeq, SerializeStruct,
    SerializeStructVariant, SerializeTuple, SerializeTupleStruct, SerializeTupleVariant,
    Serializer,
};
use serde_json::Value;

/// Newtype name shared by the decimal wrappers.
pub(crate) const WIRE_NUMBER_TOKEN: &str = "$tyk_operator::wire::Number";

/// Encode `value` as JSON bytes with decimal wrappers written as numbers.
pub fn to_wire_vec<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(256);
    let mut serializer = serde_json::Serializer::new(&mut out);
    value.serialize(WireSerializer::new(&mut serializer))?;
    Ok(out)
}

/// Encode `value` as a JSON string with decimal wrappers written as numbers.
pub fn to_wire_string<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let bytes = to_wire_vec(value)?;
    // serde_json only ever writes UTF-8
    String::from_utf8(bytes).map_err(serde_json::Error::custom)
}

/// Encode `value` as a [`Value`] with decimal wrappers written as numbers.
pub fn to_wire_value<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Value> {
    value.serialize(WireSerializer::new(serde_json::value::Serializer))
}

/// Serializer adapter that turns decimal wrappers into numbers and forwards
/// everything else to the inner serializer.
pub struct WireSerializer<S> {
    inner: S,
}

impl<S> WireSerializer<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

/// Re-enters [`WireSerializer`] for nested values.
struct Wire<'a, T: ?Sized>(&'a T);

impl<T: Serialize + ?Sized> Serialize for Wire<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(WireSerializer::new(serializer))
    }
}

/// Compound state wrapper, see [`Wire`].
pub struct WireCompound<C> {
    inner: C,
}

fn emit_number<S: Serializer>(serializer: S, text: &str) -> Result<S::Ok, S::Error> {
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return serializer.serialize_i64(int);
    }

    let float: f64 = trimmed
        .parse()
        .map_err(|_| S::Error::custom(format!("failed to encode {:?} as a number", text)))?;
    if !float.is_finite() {
        return Err(S::Error::custom(format!("failed to encode {:?} as a number", text)));
    }

    // whole numbers are written without a fraction
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        return serializer.serialize_i64(float as i64);
    }

    serializer.serialize_f64(float)
}

impl<S: Serializer> Serializer for WireSerializer<S> {
    type Ok = S::Ok;
    type Error = S::Error;
    type SerializeSeq = WireCompound<S::SerializeSeq>;
    type SerializeTuple = WireCompound<S::SerializeTuple>;
    type SerializeTupleStruct = WireCompound<S::SerializeTupleStruct>;
    type SerializeTupleVariant = WireCompound<S::SerializeTupleVariant>;
    type SerializeMap = WireCompound<S::SerializeMap>;
    type SerializeStruct = WireCompound<S::SerializeStruct>;
    type SerializeStructVariant = WireCompound<S::SerializeStructVariant>;

    fn serialize_bool(self, v: bool) -> Result<S::Ok, S::Error> {
        self.inner.serialize_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i8(v)
    }

    fn serialize_i16(self, v: i16) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i16(v)
    }

    fn serialize_i32(self, v: i32) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i32(v)
    }

    fn serialize_i64(self, v: i64) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i64(v)
    }

    fn serialize_u8(self, v: u8) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u8(v)
    }

    fn serialize_u16(self, v: u16) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u16(v)
    }

    fn serialize_u32(self, v: u32) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u32(v)
    }

    fn serialize_u64(self, v: u64) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u64(v)
    }

    fn serialize_f32(self, v: f32) -> Result<S::Ok, S::Error> {
        self.inner.serialize_f32(v)
    }

    fn serialize_f64(self, v: f64) -> Result<S::Ok, S::Error> {
        self.inner.serialize_f64(v)
    }

    fn serialize_char(self, v: char) -> Result<S::Ok, S::Error> {
        self.inner.serialize_char(v)
    }

    fn serialize_str(self, v: &str) -> Result<S::Ok, S::Error> {
        self.inner.serialize_str(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<S::Ok, S::Error> {
        self.inner.serialize_bytes(v)
    }

    fn serialize_none(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_none()
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<S::Ok, S::Error> {
        self.inner.serialize_some(&Wire(value))
    }

    fn serialize_unit(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit()
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit_struct(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit_variant(name, variant_index, variant)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        if name == WIRE_NUMBER_TOKEN {
            return match serde_json::to_value(value).map_err(S::Error::custom)? {
                Value::String(text) => emit_number(self.inner, &text),
                other => Err(S::Error::custom(format!("expected decimal text, got {}", other))),
            };
        }
        self.inner.serialize_newtype_struct(name, &Wire(value))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        self.inner.serialize_newtype_variant(name, variant_index, variant, &Wire(value))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, S::Error> {
        self.inner.serialize_seq(len).map(|inner| WireCompound { inner })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, S::Error> {
        self.inner.serialize_tuple(len).map(|inner| WireCompound { inner })
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, S::Error> {
        self.inner.serialize_tuple_struct(name, len).map(|inner| WireCompound { inner })
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, S::Error> {
        self.inner
            .serialize_tuple_variant(name, variant_index, variant, len)
            .map(|inner| WireCompound { inner })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, S::Error> {
        self.inner.serialize_map(len).map(|inner| WireCompound { inner })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, S::Error> {
        self.inner.serialize_struct(name, len).map(|inner| WireCompound { inner })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, S::Error> {
        self.inner
            .serialize_struct_variant(name, variant_index, variant, len)
            .map(|inner| WireCompound { inner })
    }

    fn is_human_readable(&self) -> bool {
        self.inner.is_human_readable()
    }
}

impl<C: SerializeSeq> SerializeSeq for WireCompound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_element(&Wire(value))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTuple> SerializeTuple for WireCompound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_element(&Wire(value))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTupleStruct> SerializeTupleStruct for WireCompound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_field(&Wire(value))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTupleVariant> SerializeTupleVariant for WireCompound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_field(&Wire(value))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeMap> SerializeMap for WireCompound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), C::Error> {
        self.inner.serialize_key(&Wire(key))
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_value(&Wire(value))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeStruct> SerializeStruct for WireCompound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), C::Error> {
        self.inner.serialize_field(key, &Wire(value))
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), C::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeStructVariant> SerializeStructVariant for WireCompound<C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), C::Error> {
        self.inner.serialize_field(key, &Wire(value))
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), C::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Float64, Percent};
    use serde::Serialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Breaker {
        path: String,
        threshold_percent: Percent,
        samples: i64,
    }

    #[derive(Serialize)]
    struct Holder {
        value: Float64,
    }

    #[test]
    fn test_float_wire_vs_plain() {
        let holder = Holder { value: Float64::parse("3.14").unwrap() };

        assert_eq!(to_wire_string(&holder).unwrap(), r#"{"value":3.14}"#);
        assert_eq!(serde_json::to_string(&holder).unwrap(), r#"{"value":"3.14"}"#);
    }

    #[test]
    fn test_whole_numbers_have_no_fraction() {
        let holder = Holder { value: Float64::parse("3.0").unwrap() };
        assert_eq!(to_wire_string(&holder).unwrap(), r#"{"value":3}"#);
    }

    #[test]
    fn test_nested_and_collections() {
        let mut versions = BTreeMap::new();
        versions.insert(
            "v1",
            vec![Some(Breaker {
                path: "/pay".to_string(),
                threshold_percent: Percent::parse("0.5").unwrap(),
                samples: 10,
            })],
        );

        let value = to_wire_value(&versions).unwrap();
        assert_eq!(
            value,
            json!({"v1": [{"path": "/pay", "threshold_percent": 0.5, "samples": 10}]})
        );

        let plain = serde_json::to_value(&versions).unwrap();
        assert_eq!(plain["v1"][0]["threshold_percent"], json!("0.5"));
    }

    #[test]
    fn test_flattened_fields_are_encoded() {
        #[derive(Serialize)]
        struct Outer {
            #[serde(flatten)]
            inner: Holder,
            name: &'static str,
        }

        let outer = Outer { inner: Holder { value: Float64::parse("2.5").unwrap() }, name: "x" };
        assert_eq!(to_wire_value(&outer).unwrap(), json!({"value": 2.5, "name": "x"}));
    }

    #[test]
    fn test_unparsable_text_fails() {
        let holder = Holder { value: Float64::unchecked("abc") };
        assert!(to_wire_vec(&holder).is_err());
        assert_eq!(serde_json::to_string(&holder).unwrap(), r#"{"value":"abc"}"#);
    }
}
