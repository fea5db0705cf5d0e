// DynamoDB Streamsイメージの正規化
//
// aws_lambda_eventsのストリームレコードはserde_dynamoのAttributeValueで
// イメージ（Keys/NewImage/OldImage）を保持する。これを共通のデコーダーに通す。

use serde_dynamo::AttributeValue as StreamAttributeValue;
use serde_json::{Map, Value};

use super::binary::encode_base64;
use crate::domain::{clean_item, AttributeValue, Item};

/// ストリームイメージの属性値を変換する
pub fn from_stream_attribute(attribute: &StreamAttributeValue) -> AttributeValue {
    match attribute {
        StreamAttributeValue::S(s) => AttributeValue::S(s.clone()),
        StreamAttributeValue::N(n) => AttributeValue::N(n.clone()),
        StreamAttributeValue::B(bytes) => AttributeValue::B(encode_base64(bytes)),
        StreamAttributeValue::Ss(items) => AttributeValue::Ss(items.clone()),
        StreamAttributeValue::Ns(items) => AttributeValue::Ns(items.clone()),
        StreamAttributeValue::Bs(items) => {
            AttributeValue::Bs(items.iter().map(|bytes| encode_base64(bytes)).collect())
        }
        StreamAttributeValue::L(items) => {
            AttributeValue::L(items.iter().map(from_stream_attribute).collect())
        }
        StreamAttributeValue::M(entries) => AttributeValue::M(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), from_stream_attribute(value)))
                .collect(),
        ),
        StreamAttributeValue::Null(flag) => AttributeValue::Null(*flag),
        StreamAttributeValue::Bool(b) => AttributeValue::Bool(*b),
    }
}

/// ストリームイメージを1件デコードしてプレーンなレコードにする
///
/// 空のイメージ（INSERT時のOldImageなど）は空のレコードになる。
pub fn clean_stream_image(image: &serde_dynamo::Item, include_keys: bool) -> Map<String, Value> {
    let typed: Item = image
        .iter()
        .map(|(key, value)| (key.clone(), from_stream_attribute(value)))
        .collect();

    clean_item(&typed, include_keys)
}
