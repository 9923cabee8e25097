//! Student handlers
//!
//! Create, Get and List operate on a [`StudentStore`]. The store lock is taken
//! and released inside the store call, so encoding happens lock-free.

use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::Response;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::error::ApiError;
use crate::http::build_json_response;
use crate::store::{Student, StudentStore};

type HandlerResult = Result<Response<Full<Bytes>>, ApiError>;

/// `GET {prefix}/{id}`: respond with the student stored under `id`
pub async fn get_student(store: &StudentStore, id: &str) -> HandlerResult {
    let student = store.get(id).await.ok_or(ApiError::StudentNotFound)?;
    build_json_response(&student)
}

/// `POST {prefix}`: decode a student from the body, store it under its id and echo it back
pub async fn create_student<B>(store: &StudentStore, body: B, max_body_size: u64) -> HandlerResult
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = Limited::new(body, limit)
        .collect()
        .await
        .map_err(|e| ApiError::Body(e.to_string()))?
        .to_bytes();

    let student = decode_student(&bytes)?;
    store.insert(student.clone()).await;
    build_json_response(&student)
}

/// Encode every stored student as a JSON array. Not reachable over HTTP.
pub async fn list_students(store: &StudentStore) -> HandlerResult {
    let students = store.list().await;
    build_json_response(&students)
}

/// Decode the first JSON value in `bytes` as a student.
///
/// Bytes after the first value are ignored and a top-level `null` yields an
/// all-zero record. An empty body is an error. Object keys match field names
/// ignoring ASCII case, `null` members leave the field at its zero value, and
/// when a field appears more than once the last occurrence wins. Members that
/// name a field must still have its type.
pub fn decode_student(bytes: &[u8]) -> Result<Student, serde_json::Error> {
    let mut values = serde_json::Deserializer::from_slice(bytes).into_iter::<Option<BodyFields>>();
    let fields = match values.next() {
        Some(value) => value?,
        None => return Err(serde::de::Error::custom("empty request body")),
    };

    let mut student = Student::default();
    for (key, value) in fields.map(|f| f.0).unwrap_or_default() {
        if value.is_null() {
            continue;
        }
        if key.eq_ignore_ascii_case("id") {
            student.id = i64::deserialize(value)?;
        } else if key.eq_ignore_ascii_case("name") {
            student.name = String::deserialize(value)?;
        } else if key.eq_ignore_ascii_case("age") {
            student.age = i64::deserialize(value)?;
        }
    }
    Ok(student)
}

/// Members of a JSON object in source order, duplicates included
struct BodyFields(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for BodyFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = BodyFields;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<BodyFields, A::Error> {
                let mut fields = Vec::new();
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    fields.push(entry);
                }
                Ok(BodyFields(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}
