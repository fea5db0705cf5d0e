/// DynamoDB Item正規化 Lambda関数
///
/// API GatewayまたはEventBridge経由で受け取ったDynamoDB JSON形式のItem
/// （本文の`Items`または`Item`）をプレーンなJSONレコードに変換して返却する。
/// クエリ文字列`includeKeys=true`でpk/skを残す。
use lambda_kit::application::{
    content_type_for, end, end_with_error, get_input_body, get_query_string_parameters,
    HandlerError, LambdaResponse,
};
use lambda_kit::domain::clean_items_json;
use lambda_kit::infrastructure::{init_logging, start_logger, CorsConfig, LogMetadata};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // Lambda関数を初期化して実行
    let func = service_fn(handler);
    lambda_runtime::run(func).await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. 相関ID付きのロガーを開始
/// 2. 入力本文からItemを取り出して正規化
/// 3. 成功時は200、入力不正時は400のレスポンスを返却
async fn handler(event: LambdaEvent<Value>) -> Result<LambdaResponse, Error> {
    let span = start_logger(
        &event.payload,
        Some(event.context.request_id.as_str()),
        &LogMetadata::from_env(),
    );
    let cors = CorsConfig::from_env();

    Ok(span.in_scope(|| process(&event.payload, &cors)))
}

/// イベントを処理してレスポンスを生成
fn process(payload: &Value, cors: &CorsConfig) -> LambdaResponse {
    let body = match get_input_body(payload) {
        Ok(body) => body,
        Err(err) => return end_with_error(&err, 400, None),
    };

    let Some(items) = body.get("Items").or_else(|| body.get("Item")) else {
        let err = HandlerError::BadRequest("Missing Items or Item in request body".to_string());
        return end_with_error(&err, 400, None);
    };

    let include_keys = get_query_string_parameters(payload)
        .get("includeKeys")
        .is_some_and(|v| v == "true");

    let records = clean_items_json(items, include_keys);

    info!(
        record_count = records.len(),
        include_keys = include_keys,
        "Itemを正規化"
    );

    let message = Value::Array(records.into_iter().map(Value::Object).collect());
    let headers = cors.response_headers(content_type_for(Some(&message)));

    end(200, Some(&message), Some(headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_body(response: &LambdaResponse) -> Value {
        serde_json::from_str(response.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn test_process_api_gateway_items() {
        let payload = json!({
            "body": json!({
                "Items": [
                    {"pk": {"S": "a"}, "name": {"S": "first"}, "count": {"N": "1"}},
                    {"pk": {"S": "b"}, "name": {"S": "second"}, "count": {"N": "2"}}
                ]
            }).to_string()
        });

        let response = process(&payload, &CorsConfig::default());

        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Content-Type"], "application/json");
        assert_eq!(
            parse_body(&response),
            json!([{"name": "first", "count": 1}, {"name": "second", "count": 2}])
        );
    }

    #[test]
    fn test_process_single_item_with_keys() {
        let payload = json!({
            "body": json!({"Item": {"pk": {"S": "a"}, "sk": {"S": "b"}}}).to_string(),
            "queryStringParameters": {"includeKeys": "true"}
        });

        let response = process(&payload, &CorsConfig::default());

        assert_eq!(parse_body(&response), json!([{"pk": "a", "sk": "b"}]));
    }

    #[test]
    fn test_process_eventbridge_detail() {
        let payload = json!({"detail": {"data": {"Items": [{"flag": {"BOOL": true}}]}}});

        let response = process(&payload, &CorsConfig::default());

        assert_eq!(parse_body(&response), json!([{"flag": true}]));
    }

    #[test]
    fn test_process_missing_items() {
        let payload = json!({"body": "{}"});

        let response = process(&payload, &CorsConfig::default());

        assert_eq!(response.status_code, 400);
        assert_eq!(
            response.body.as_deref(),
            Some("Missing Items or Item in request body")
        );
    }

    #[test]
    fn test_process_invalid_body() {
        let payload = json!({"body": "{broken"});

        let response = process(&payload, &CorsConfig::default());

        assert_eq!(response.status_code, 400);
    }
}
