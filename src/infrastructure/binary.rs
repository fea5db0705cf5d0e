// base64テキストとバイト列の変換
//
// aws_lambda_eventsのBase64Dataのserde実装をそのまま使う。

use aws_lambda_events::encodings::Base64Data;
use serde_json::Value;

/// バイト列をbase64テキストにする
pub fn encode_base64(bytes: &[u8]) -> String {
    match serde_json::to_value(Base64Data(bytes.to_vec())) {
        Ok(Value::String(text)) => text,
        // Base64Dataは常に文字列へシリアライズされる
        _ => String::new(),
    }
}

/// base64テキストをバイト列に戻す
pub fn decode_base64(text: &str) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::from_value::<Base64Data>(Value::String(text.to_string())).map(|data| data.0)
}
