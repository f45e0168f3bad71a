//! Raw API record → typed record.
//!
//! Known fields are parsed strictly, the rest is discarded. A record missing a
//! required key fails with its position and the key name; one bad record
//! fails the whole collection.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::client::ResourceKind;
use crate::error::{ClientError, ClientResult};
use crate::types::{EvaluatorInfo, InputSpec, JudgeInfo, NestedEvaluatorInfo};

const EVALUATOR_REQUIRED: &[&str] = &["id", "name", "created_at", "inputs"];
const JUDGE_REQUIRED: &[&str] = &["id", "name", "created_at"];

#[derive(Deserialize)]
struct RawEvaluator {
    id: String,
    name: String,
    created_at: String,
    #[serde(default)]
    objective: Option<Value>,
    inputs: BTreeMap<String, InputSpec>,
}

#[derive(Deserialize)]
struct RawJudge {
    id: String,
    name: String,
    created_at: String,
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    evaluators: Option<Vec<NestedEvaluatorInfo>>,
}

fn require_fields<'a>(
    kind: ResourceKind,
    index: usize,
    record: &'a Value,
    required: &[&str],
) -> ClientResult<&'a Map<String, Value>> {
    let label = kind.record_label();
    let map = record.as_object().ok_or_else(|| {
        warn!(index, record = %record, "{} record is not an object", label);
        ClientError::validation(
            format!("{} at index {} is not an object", label, index),
            Some(record.clone()),
        )
    })?;

    if let Some(missing) = required.iter().find(|field| !map.contains_key(**field)) {
        warn!(index, field = *missing, record = %record, "{} missing required field", label);
        return Err(ClientError::validation(
            format!(
                "{} at index {} missing required field: '{}'",
                label, index, missing
            ),
            Some(record.clone()),
        ));
    }

    Ok(map)
}

fn parse_record<T: DeserializeOwned>(
    kind: ResourceKind,
    index: usize,
    record: &Value,
) -> ClientResult<T> {
    serde_json::from_value(record.clone()).map_err(|e| {
        let label = kind.record_label();
        warn!(index, error = %e, record = %record, "{} record has invalid fields", label);
        ClientError::validation(
            format!("{} at index {} is invalid: {}", label, index, e),
            Some(record.clone()),
        )
    })
}

/// Decode one raw evaluator record.
pub fn decode_evaluator(index: usize, record: &Value) -> ClientResult<EvaluatorInfo> {
    let kind = ResourceKind::Evaluators;
    require_fields(kind, index, record, EVALUATOR_REQUIRED)?;
    let raw: RawEvaluator = parse_record(kind, index, record)?;

    let intent = raw
        .objective
        .as_ref()
        .and_then(|objective| objective.get("intent"))
        .and_then(Value::as_str)
        .map(String::from);

    Ok(EvaluatorInfo {
        name: raw.name,
        id: raw.id,
        created_at: raw.created_at,
        intent,
        inputs: raw.inputs,
    })
}

/// Decode one raw judge record.
pub fn decode_judge(index: usize, record: &Value) -> ClientResult<JudgeInfo> {
    let kind = ResourceKind::Judges;
    require_fields(kind, index, record, JUDGE_REQUIRED)?;
    let raw: RawJudge = parse_record(kind, index, record)?;

    Ok(JudgeInfo {
        name: raw.name,
        id: raw.id,
        created_at: raw.created_at,
        evaluators: raw.evaluators.unwrap_or_default(),
        // The judge listing carries its description under `intent`.
        description: raw.intent,
    })
}

/// Decode every record of a page, aborting on the first bad one.
pub fn decode_all<T>(
    records: &[Value],
    decode: impl Fn(usize, &Value) -> ClientResult<T>,
) -> ClientResult<Vec<T>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| decode(index, record))
        .collect()
}

/// Decode an execution result, unwrapping a top-level `result` envelope when present.
pub(crate) fn decode_result<T: DeserializeOwned>(payload: Value, what: &str) -> ClientResult<T> {
    let result = match payload.get("result") {
        Some(inner) => inner.clone(),
        None => payload.clone(),
    };

    serde_json::from_value(result).map_err(|e| {
        warn!(error = %e, payload = %payload, "invalid {} response", what);
        ClientError::validation(
            format!("Invalid {} response format: {}", what, e),
            Some(payload),
        )
    })
}
