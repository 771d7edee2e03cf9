//! Record shape classification
//!
//! A section record must be a keyed aggregate: a struct or a map. The
//! [`ShapeCheck`] serializer stops at the first call the record's
//! `Serialize` impl makes and never descends into fields, so for derived
//! impls the outcome depends only on the type. Optional values are rejected
//! whether they hold `Some` or `None`.

use std::fmt;

use serde::ser::{self, Impossible, Serialize};

/// Returns the kind that was found when `value` is not a struct or map
pub(crate) fn check_shape<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    value.serialize(ShapeCheck).map_err(|e| e.0)
}

#[derive(Debug)]
struct ShapeError(String);

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ShapeError {}

impl ser::Error for ShapeError {
    fn custom<M: fmt::Display>(msg: M) -> Self {
        Self(format!("unserializable value ({msg})"))
    }
}

fn found<R>(kind: &str) -> Result<R, ShapeError> {
    Err(ShapeError(kind.to_string()))
}

struct ShapeCheck;

/// Accepted struct or map; its entries are not inspected
struct Keyed;

impl ser::Serializer for ShapeCheck {
    type Ok = ();
    type Error = ShapeError;
    type SerializeSeq = Impossible<(), ShapeError>;
    type SerializeTuple = Impossible<(), ShapeError>;
    type SerializeTupleStruct = Impossible<(), ShapeError>;
    type SerializeTupleVariant = Impossible<(), ShapeError>;
    type SerializeMap = Keyed;
    type SerializeStruct = Keyed;
    type SerializeStructVariant = Impossible<(), ShapeError>;

    fn serialize_bool(self, _: bool) -> Result<(), ShapeError> {
        found("bool")
    }

    fn serialize_i8(self, _: i8) -> Result<(), ShapeError> {
        found("number")
    }

    fn serialize_i16(self, _: i16) -> Result<(), ShapeError> {
        found("number")
    }

    fn serialize_i32(self, _: i32) -> Result<(), ShapeError> {
        found("number")
    }

    fn serialize_i64(self, _: i64) -> Result<(), ShapeError> {
        found("number")
    }

    fn serialize_u8(self, _: u8) -> Result<(), ShapeError> {
        found("number")
    }

    fn serialize_u16(self, _: u16) -> Result<(), ShapeError> {
        found("number")
    }

    fn serialize_u32(self, _: u32) -> Result<(), ShapeError> {
        found("number")
    }

    fn serialize_u64(self, _: u64) -> Result<(), ShapeError> {
        found("number")
    }

    fn serialize_f32(self, _: f32) -> Result<(), ShapeError> {
        found("number")
    }

    fn serialize_f64(self, _: f64) -> Result<(), ShapeError> {
        found("number")
    }

    fn serialize_char(self, _: char) -> Result<(), ShapeError> {
        found("string")
    }

    fn serialize_str(self, _: &str) -> Result<(), ShapeError> {
        found("string")
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<(), ShapeError> {
        found("bytes")
    }

    fn serialize_none(self) -> Result<(), ShapeError> {
        found("optional value")
    }

    fn serialize_some<V>(self, _: &V) -> Result<(), ShapeError>
    where
        V: ?Sized + Serialize,
    {
        found("optional value")
    }

    fn serialize_unit(self) -> Result<(), ShapeError> {
        found("unit value")
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<(), ShapeError> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<(), ShapeError> {
        found("enum variant")
    }

    fn serialize_newtype_struct<V>(self, _: &'static str, value: &V) -> Result<(), ShapeError>
    where
        V: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<V>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &V,
    ) -> Result<(), ShapeError>
    where
        V: ?Sized + Serialize,
    {
        found("enum variant")
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq, ShapeError> {
        found("sequence")
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple, ShapeError> {
        found("sequence")
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct, ShapeError> {
        found("sequence")
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant, ShapeError> {
        found("enum variant")
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Keyed, ShapeError> {
        Ok(Keyed)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Keyed, ShapeError> {
        Ok(Keyed)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant, ShapeError> {
        found("enum variant")
    }
}

impl ser::SerializeMap for Keyed {
    type Ok = ();
    type Error = ShapeError;

    fn serialize_key<K>(&mut self, _: &K) -> Result<(), ShapeError>
    where
        K: ?Sized + Serialize,
    {
        Ok(())
    }

    fn serialize_value<V>(&mut self, _: &V) -> Result<(), ShapeError>
    where
        V: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<(), ShapeError> {
        Ok(())
    }
}

impl ser::SerializeStruct for Keyed {
    type Ok = ();
    type Error = ShapeError;

    fn serialize_field<V>(&mut self, _: &'static str, _: &V) -> Result<(), ShapeError>
    where
        V: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<(), ShapeError> {
        Ok(())
    }
}
