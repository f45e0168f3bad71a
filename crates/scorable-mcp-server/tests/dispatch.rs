//! End-to-end dispatch tests: tool call → validation → service → mocked Scorable API.

use scorable_client::ClientConfig;
use scorable_mcp_server::{ServerConfig, StdioServer, ToolRouter};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn router_for(mock_server: &MockServer, tweak: impl FnOnce(&mut ServerConfig)) -> ToolRouter {
    let client = ClientConfig::new("test-key")
        .with_base_url(mock_server.uri())
        .with_max_evaluators(2);
    let mut config = ServerConfig::new(client);
    tweak(&mut config);
    ToolRouter::new(&config).expect("failed to build router")
}

fn parse(text: &str) -> Value {
    serde_json::from_str(text).expect("tool result is not JSON")
}

fn evaluator(id: &str, extra_input: Option<&str>) -> Value {
    let mut inputs = json!({"request": {"type": "string"}, "response": {"type": "string"}});
    if let Some(name) = extra_input {
        inputs[name] = json!({"type": "array", "items": {"type": "string"}});
    }
    json!({
        "id": id,
        "name": format!("Evaluator {}", id),
        "created_at": "2024-06-01T09:30:00Z",
        "objective": {"intent": null},
        "inputs": inputs,
        "status": "published"
    })
}

#[tokio::test]
async fn test_list_evaluators_is_capped_and_drops_nulls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/evaluators"))
        .and(query_param("page_size", "2"))
        .and(header("authorization", "Api-Key test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [evaluator("a", Some("contexts")), evaluator("b", None), evaluator("c", None)],
            "next": format!("{}/v1/evaluators?cursor=more", mock_server.uri())
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let text = router_for(&mock_server, |_| {})
        .call_tool("list_evaluators", json!({}))
        .await;
    let value = parse(&text);

    let evaluators = value["evaluators"].as_array().expect("evaluators list");
    assert_eq!(evaluators.len(), 2);
    assert_eq!(evaluators[0]["id"], "a");
    assert!(evaluators[0].get("intent").is_none(), "{}", text);
    assert!(evaluators[0].get("status").is_none(), "{}", text);
    assert!(evaluators[0]["inputs"].get("contexts").is_some());
}

#[tokio::test]
async fn test_run_evaluation_not_found_is_single_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/evaluators/execute/missing-id/"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Evaluator not found"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let text = router_for(&mock_server, |_| {})
        .call_tool(
            "run_evaluation",
            json!({"evaluator_id": "missing-id", "request": "q", "response": "a"}),
        )
        .await;

    let error = parse(&text)["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Error calling tool run_evaluation:"), "{}", error);
    assert!(error.contains("evaluation"), "{}", error);
    assert!(error.contains("not found"), "{}", error);
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_the_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let router = router_for(&mock_server, |_| {});
    for arguments in [
        json!({"evaluator_name": "Clarity", "request": "   ", "response": "a"}),
        json!({"evaluator_name": "Clarity", "request": "q", "response": ""}),
        json!({"evaluator_name": "Clarity", "request": "q"}),
        json!({"evaluator_name": "Clarity", "request": "q", "response": "a", "extra": 1}),
    ] {
        let text = router.call_tool("run_evaluation_by_name", arguments).await;
        let error = parse(&text)["error"].as_str().unwrap().to_string();
        assert!(
            error.starts_with("Invalid arguments for run_evaluation_by_name:"),
            "{}",
            error
        );
    }
}

#[tokio::test]
async fn test_coding_policy_adherence_is_rewritten() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/evaluators/execute/policy-evaluator/"))
        .and(body_partial_json(json!({
            "request": "Does the code follow the policy?",
            "response": "x=1",
            "contexts": ["doc"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "evaluator_name": "Coding policy adherence",
            "score": 0.75,
            "justification": "mostly compliant",
            "cost": 0.002
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let router = router_for(&mock_server, |config| {
        config.coding_policy_evaluator_id = "policy-evaluator".to_string();
        config.coding_policy_evaluator_request = "Does the code follow the policy?".to_string();
    });
    let text = router
        .call_tool(
            "run_coding_policy_adherence",
            json!({"policy_documents": ["doc"], "code": "x=1"}),
        )
        .await;

    let value = parse(&text);
    let score = value["score"].as_f64().expect("score");
    assert!((0.0..=1.0).contains(&score));
    assert!(value.get("execution_log_id").is_none());
}

#[tokio::test]
async fn test_coding_policy_blank_code_never_reaches_the_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"score": 1.0})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let text = router_for(&mock_server, |_| {})
        .call_tool(
            "run_coding_policy_adherence",
            json!({"policy_documents": ["doc"], "code": "   "}),
        )
        .await;
    assert_eq!(
        parse(&text),
        json!({"error": "Error calling tool run_coding_policy_adherence: response: Response cannot be empty"})
    );

    let text = router_for(&mock_server, |config| {
        config.coding_policy_evaluator_request = " ".to_string();
    })
    .call_tool(
        "run_coding_policy_adherence",
        json!({"policy_documents": ["doc"], "code": "x=1"}),
    )
    .await;
    let error = parse(&text)["error"].as_str().unwrap().to_string();
    assert!(error.ends_with("request: Request cannot be empty"), "{}", error);
}

#[tokio::test]
async fn test_run_evaluation_by_name_with_contexts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/evaluators/execute/by-name/"))
        .and(query_param("name", "Context Precision"))
        .and(body_partial_json(json!({"contexts": ["passage"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"evaluator_name": "Context Precision", "score": 0.5, "execution_log_id": "log-9"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let text = router_for(&mock_server, |_| {})
        .call_tool(
            "run_evaluation_by_name",
            json!({
                "evaluator_name": "Context Precision",
                "request": "q",
                "response": "a",
                "contexts": ["passage"]
            }),
        )
        .await;

    assert_eq!(
        parse(&text),
        json!({"evaluator_name": "Context Precision", "score": 0.5, "execution_log_id": "log-9"})
    );
}

#[tokio::test]
async fn test_list_and_run_judge() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/judges"))
        .and(query_param("show_global", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "j1",
            "name": "Support quality",
            "created_at": "2024-06-01T09:30:00Z",
            "evaluators": [{"id": "e1", "name": "Helpfulness"}]
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/judges/j1/execute/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "evaluator_results": [
                {"evaluator_name": "Helpfulness", "score": 0.9, "justification": "clear answer"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let router = router_for(&mock_server, |config| {
        config.client.show_public_judges = true;
    });

    let listed = parse(&router.call_tool("list_judges", json!({})).await);
    assert_eq!(listed["judges"][0]["id"], "j1");
    assert_eq!(listed["judges"][0]["evaluators"][0]["intent"], "");
    assert!(listed["judges"][0].get("description").is_none());

    let ran = parse(
        &router
            .call_tool(
                "run_judge",
                json!({"judge_id": "j1", "judge_name": "Support quality", "request": "hi", "response": "hello"}),
            )
            .await,
    );
    assert_eq!(ran["evaluator_results"][0]["score"], 0.9);
}

#[tokio::test]
async fn test_decode_failure_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/judges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "j1", "name": "No timestamp"}]
        })))
        .mount(&mock_server)
        .await;

    let text = router_for(&mock_server, |_| {})
        .call_tool("list_judges", json!({}))
        .await;
    let error = parse(&text)["error"].as_str().unwrap().to_string();
    assert!(error.contains("Invalid judges response"), "{}", error);
    assert!(error.contains("'created_at'"), "{}", error);
}

#[tokio::test]
async fn test_stdio_round_trip_against_mock_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/evaluators/execute/e1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "evaluator_name": "Truthfulness",
            "score": 1.0
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let server = StdioServer::new(router_for(&mock_server, |_| {}));
    let call = json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "tools/call",
        "params": {
            "name": "run_evaluation",
            "arguments": {"evaluator_id": "e1", "request": "2+2?", "response": "4"}
        }
    });
    let input = format!("{}\n", call);
    let mut output = Vec::new();
    server
        .serve(tokio::io::BufReader::new(input.as_bytes()), &mut output)
        .await
        .expect("serve failed");

    let reply: Value = serde_json::from_slice(&output).expect("reply is not JSON");
    assert_eq!(reply["id"], 7);
    let text = reply["result"]["content"][0]["text"].as_str().unwrap();
    assert_eq!(
        parse(text),
        json!({"evaluator_name": "Truthfulness", "score": 1.0})
    );
}

#[tokio::test]
async fn test_get_evaluator_by_id_searches_listing() {
    use scorable_client::EvaluatorRepository;
    use scorable_mcp_server::EvaluatorService;

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/evaluators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [evaluator("a", None), evaluator("b", Some("expected_output"))]
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let repository =
        EvaluatorRepository::new(ClientConfig::new("test-key").with_base_url(mock_server.uri()))
            .expect("failed to create client");
    let service = EvaluatorService::new(repository);

    let found = service
        .get_evaluator_by_id("b")
        .await
        .expect("lookup failed")
        .expect("evaluator b listed");
    assert!(found.requires_expected_output());
    assert!(!found.requires_contexts());

    let missing = service.get_evaluator_by_id("zzz").await.expect("lookup failed");
    assert!(missing.is_none());
}
