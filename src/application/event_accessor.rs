/// トリガーイベントからのフィールド抽出
///
/// API Gateway（REST/HTTP API）とEventBridgeのイベントを同じ関数で扱えるように、
/// よく使うフィールドを形の違いを吸収して取り出す。
use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

use super::error::StatusHint;
use crate::infrastructure::binary::decode_base64;

/// 入力本文の取得エラー
#[derive(Debug, Error)]
pub enum InputBodyError {
    /// base64としてデコードできない
    #[error("Invalid base64 body: {0}")]
    InvalidBase64(String),

    /// デコード結果がUTF-8ではない
    #[error("Body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// JSONとしてパースできない
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl StatusHint for InputBodyError {
    fn status_code(&self) -> Option<u16> {
        Some(400)
    }
}

/// 入力本文を取得する
///
/// 1. EventBridge: `detail.data`があればそれを、なければ`detail`全体を返す
/// 2. `isBase64Encoded`が真なら本文をbase64デコードしてJSONとしてパース
/// 3. 本文が空でない文字列ならJSONとしてパース
/// 4. それ以外は本文をそのまま返す（本文なしは`null`）
pub fn get_input_body(event: &Value) -> Result<Value, InputBodyError> {
    if let Some(detail) = event.get("detail").filter(|d| is_truthy(d)) {
        let data = detail.get("data").filter(|d| is_truthy(d));
        return Ok(data.unwrap_or(detail).clone());
    }

    let body = event.get("body").cloned().unwrap_or(Value::Null);

    if event.get("isBase64Encoded").is_some_and(is_truthy) {
        let encoded = body.as_str().unwrap_or_default();
        let bytes =
            decode_base64(encoded).map_err(|e| InputBodyError::InvalidBase64(e.to_string()))?;
        let text = String::from_utf8(bytes)?;
        return Ok(serde_json::from_str(&text)?);
    }

    match body {
        Value::String(text) if !text.is_empty() => Ok(serde_json::from_str(&text)?),
        other => Ok(other),
    }
}

/// EventBridgeイベントの`detail.metadata`を取得する
pub fn get_metadata(event: &Value) -> Option<&Value> {
    event.get("detail")?.get("metadata")
}

/// パスパラメーターを取得する（なければ空）
pub fn get_path_parameters(event: &Value) -> HashMap<String, String> {
    string_map(event.get("pathParameters"))
}

/// クエリ文字列パラメーターを取得する（なければ空）
pub fn get_query_string_parameters(event: &Value) -> HashMap<String, String> {
    string_map(event.get("queryStringParameters"))
}

/// Lambdaオーソライザーが渡した認可コンテキストを取得する（なければ空オブジェクト）
pub fn get_auth_context(event: &Value) -> Value {
    event
        .get("requestContext")
        .and_then(|ctx| ctx.get("authorizer"))
        .and_then(|authorizer| authorizer.get("lambda"))
        .filter(|lambda| is_truthy(lambda))
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// `Authorization`ヘッダーからBearerトークンを取り出す
///
/// `Authorization`、なければ`authorization`を見る。値は`Bearer `で始まる必要がある。
pub fn get_bearer_token(headers: &Value) -> Option<String> {
    let authorization = ["Authorization", "authorization"]
        .iter()
        .filter_map(|name| headers.get(*name).and_then(Value::as_str))
        .find(|value| !value.is_empty())?;

    authorization.strip_prefix("Bearer ").map(str::to_string)
}

/// 文字列がJSONとしてパースできるか
pub fn is_json_string(text: &str) -> bool {
    serde_json::from_str::<Value>(text).is_ok()
}

/// 文字列値だけを集めたマップにする
fn string_map(value: Option<&Value>) -> HashMap<String, String> {
    value
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// イベントのフィールドが「値あり」とみなせるか
///
/// `null`、`false`、`0`、空文字列は値なしとする。
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
