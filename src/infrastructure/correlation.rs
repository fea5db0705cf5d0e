/// 相関IDの解決と保持
///
/// リクエスト単位の相関IDをプロセス全体で1つだけ保持する。
/// `start_logger`で設定され、レスポンス生成（`end`）でクリアされる。
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

/// 現在処理中のリクエストの相関ID（空文字列は未設定）
static CURRENT_CORRELATION_ID: RwLock<String> = RwLock::new(String::new());

/// 現在の相関IDを取得（未設定なら`None`）
pub fn current_correlation_id() -> Option<String> {
    let current = CURRENT_CORRELATION_ID
        .read()
        .unwrap_or_else(PoisonError::into_inner);

    (!current.is_empty()).then(|| current.clone())
}

/// 現在の相関IDを設定
pub fn set_correlation_id(correlation_id: &str) {
    let mut current = CURRENT_CORRELATION_ID
        .write()
        .unwrap_or_else(PoisonError::into_inner);

    *current = correlation_id.to_string();
}

/// 現在の相関IDをクリア
pub fn reset_correlation_id() {
    set_correlation_id("");
}

/// 相関IDを解決する
///
/// 以下の順で最初に見つかった空でない値を返す:
/// 1. 現在設定されている相関ID
/// 2. `headers["x-correlation-id"]`
/// 3. `headers["X-Correlation-Id"]`
/// 4. `detail.metadata.correlationId`（EventBridge）
/// 5. `detail.metadata.correlation_id`（EventBridge）
/// 6. LambdaのリクエストID
/// 7. 空文字列
pub fn get_correlation_id(event: Option<&Value>, request_id: Option<&str>) -> String {
    if let Some(current) = current_correlation_id() {
        return current;
    }

    let from_event = event.and_then(|event| {
        let headers = event.get("headers");
        let metadata = event.get("detail").and_then(|detail| detail.get("metadata"));

        [
            headers.and_then(|h| h.get("x-correlation-id")),
            headers.and_then(|h| h.get("X-Correlation-Id")),
            metadata.and_then(|m| m.get("correlationId")),
            metadata.and_then(|m| m.get("correlation_id")),
        ]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|id| !id.is_empty())
        .map(str::to_string)
    });

    from_event
        .or_else(|| request_id.filter(|id| !id.is_empty()).map(str::to_string))
        .unwrap_or_default()
}
