//! Declared input schemas, shared by the tool catalogue and argument validation.

use serde_json::{json, Value};

const REQUEST_DESCRIPTION: &str = "The user query to evaluate";
const RESPONSE_DESCRIPTION: &str = "The AI assistant's response to evaluate";

fn object_schema(title: &str, properties: Value, required: &[&str]) -> Value {
    json!({
        "title": title,
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

fn text(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn evaluation_properties(selector_name: &str, selector: Value) -> Value {
    let mut properties = json!({
        "request": text(REQUEST_DESCRIPTION),
        "response": text(RESPONSE_DESCRIPTION),
        "contexts": {
            "type": ["array", "null"],
            "items": { "type": "string" },
            "default": null,
            "description": "List of required context strings for evaluation. Used only for evaluators that have 'contexts' defined in their inputs."
        },
        "expected_output": {
            "type": ["string", "null"],
            "default": null,
            "description": "The expected LLM response. Used only for evaluators that have 'expected_output' defined in their inputs."
        }
    });
    properties[selector_name] = selector;
    properties
}

pub(crate) fn list_evaluators() -> Value {
    object_schema("ListEvaluatorsRequest", json!({}), &[])
}

pub(crate) fn list_judges() -> Value {
    object_schema("ListJudgesRequest", json!({}), &[])
}

pub(crate) fn run_evaluation() -> Value {
    object_schema(
        "EvaluationRequest",
        evaluation_properties("evaluator_id", text("The ID of the evaluator to use")),
        &["evaluator_id", "request", "response"],
    )
}

pub(crate) fn run_evaluation_by_name() -> Value {
    let selector = json!({
        "type": "string",
        "description": "The EXACT name of the evaluator as returned by the `list_evaluators` tool, including spaces and special characters",
        "examples": [
            "Compliance-preview",
            "Truthfulness - Global",
            "Safety for Children",
            "Context Precision"
        ]
    });
    object_schema(
        "EvaluationRequestByName",
        evaluation_properties("evaluator_name", selector),
        &["evaluator_name", "request", "response"],
    )
}

pub(crate) fn run_coding_policy_adherence() -> Value {
    object_schema(
        "CodingPolicyAdherenceEvaluationRequest",
        json!({
            "policy_documents": {
                "type": "array",
                "items": { "type": "string" },
                "description": "The policy documents which describe the coding policy, such as cursor/rules file contents"
            },
            "code": text("The code to evaluate")
        }),
        &["policy_documents", "code"],
    )
}

pub(crate) fn run_judge() -> Value {
    object_schema(
        "RunJudgeRequest",
        json!({
            "judge_id": text("The ID of the judge to use"),
            "judge_name": {
                "type": "string",
                "default": "-",
                "description": "The name of the judge to use. Optional, only for logging purposes."
            },
            "request": text(REQUEST_DESCRIPTION),
            "response": text(RESPONSE_DESCRIPTION)
        }),
        &["judge_id", "request", "response"],
    )
}
