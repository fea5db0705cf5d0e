// Lambdaレスポンスエンベロープ生成
//
// API Gateway（プロキシ統合）が受け付ける`statusCode`/`body`/`headers`形式の
// レスポンスを組み立てる。レスポンス生成はリクエスト処理の終わりでもあるため、
// 現在の相関IDもここでクリアする。

use lambda_http::{Body, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

use super::error::StatusHint;
use crate::infrastructure::{reset_correlation_id, CorsConfig};

/// テキスト本文のContent-Type
pub const TEXT_PLAIN: &str = "text/plain";
/// JSON本文のContent-Type
pub const APPLICATION_JSON: &str = "application/json";

/// Lambdaレスポンスエンベロープ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaResponse {
    /// HTTPステータスコード
    pub status_code: u16,
    /// 本文（メッセージなしの場合は省略）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// レスポンスヘッダー
    pub headers: Map<String, Value>,
}

impl LambdaResponse {
    /// HTTPランタイム（lambda_http）用のレスポンスに変換
    ///
    /// 文字列でないヘッダー値（`true`など）はJSON表記の文字列にする。
    ///
    /// # エラー
    /// ステータスコードやヘッダー名・値がHTTPとして不正な場合
    pub fn into_http_response(self) -> Result<Response<Body>, lambda_http::http::Error> {
        let mut builder = Response::builder().status(self.status_code);

        for (name, value) in &self.headers {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            builder = builder.header(name.as_str(), value);
        }

        builder.body(self.body.map_or(Body::Empty, Body::Text))
    }
}

/// メッセージに対応するContent-Typeを判定
///
/// メッセージなし・`null`・`false`・数値・文字列は`text/plain`、
/// それ以外（`true`、配列、オブジェクト）は`application/json`。
pub fn content_type_for(message: Option<&Value>) -> &'static str {
    match message {
        None
        | Some(Value::Null)
        | Some(Value::Bool(false))
        | Some(Value::Number(_))
        | Some(Value::String(_)) => TEXT_PLAIN,
        Some(Value::Bool(true)) | Some(Value::Array(_)) | Some(Value::Object(_)) => {
            APPLICATION_JSON
        }
    }
}

/// レスポンスを生成する
///
/// - 文字列メッセージはそのまま本文に、それ以外はJSON文字列にする
/// - `headers`を指定した場合はデフォルトのCORSヘッダーを完全に置き換える
/// - 現在の相関IDをクリアする
///
/// # 使用例
/// ```ignore
/// end(201, None, None); // 本文なし、CORSヘッダー付き
/// end(200, Some(&json!({"itemId": "abc123"})), None);
/// ```
pub fn end(
    status_code: u16,
    message: Option<&Value>,
    headers: Option<Map<String, Value>>,
) -> LambdaResponse {
    let headers = headers
        .unwrap_or_else(|| CorsConfig::default().response_headers(content_type_for(message)));

    let body = message.map(|message| match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    reset_correlation_id();

    debug!(status_code = status_code, "レスポンスを生成");

    LambdaResponse {
        status_code,
        body,
        headers,
    }
}

/// エラーからレスポンスを生成する
///
/// ステータスはエラー自身のヒント（0以外）を優先し、なければ`default_status_code`。
/// 本文はエラーの表示文字列。生成前にエラーをログに記録する。
pub fn end_with_error<E>(
    error: &E,
    default_status_code: u16,
    headers: Option<Map<String, Value>>,
) -> LambdaResponse
where
    E: StatusHint + ?Sized,
{
    let status_code = error
        .status_code()
        .filter(|code| *code != 0)
        .unwrap_or(default_status_code);
    let message = error.to_string();

    error!(status_code = status_code, error = %message, "ハンドラーエラー");

    end(status_code, Some(&Value::String(message)), headers)
}

/// CORSプリフライト用のレスポンスを生成する（デフォルト設定）
pub fn handle_cors() -> LambdaResponse {
    handle_cors_with(&CorsConfig::default())
}

/// 指定したCORS設定でプリフライト用のレスポンスを生成する
///
/// 本文はJSON文字列の`"OK"`。
pub fn handle_cors_with(config: &CorsConfig) -> LambdaResponse {
    LambdaResponse {
        status_code: 200,
        body: Some(Value::String("OK".to_string()).to_string()),
        headers: config.response_headers(TEXT_PLAIN),
    }
}
