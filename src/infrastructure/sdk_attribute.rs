/// AWS SDKのAttributeValueとの相互変換
///
/// DynamoDBクライアント（aws-sdk-dynamodb）が返すItemを同じデコーダーで正規化し、
/// エンコーダーの出力をそのままクライアントに渡せるようにする。
/// バイナリはbase64テキストを介して変換する。
use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue as SdkAttributeValue;
use serde_json::{Map, Value};
use thiserror::Error;

use super::binary::{decode_base64, encode_base64};
use crate::domain::{clean_item, to_attribute, AttributeValue, Item};

/// SDK形式への変換エラー
#[derive(Debug, Error)]
pub enum AttributeConversionError {
    /// バイナリのbase64テキストが不正
    #[error("Invalid base64 binary payload: {0}")]
    InvalidBase64(String),
}

/// SDKのAttributeValueを変換する
///
/// SDKが将来追加する未知の型は`NULL`として扱う。
pub fn from_sdk_attribute(attribute: &SdkAttributeValue) -> AttributeValue {
    match attribute {
        SdkAttributeValue::S(s) => AttributeValue::S(s.clone()),
        SdkAttributeValue::N(n) => AttributeValue::N(n.clone()),
        SdkAttributeValue::B(blob) => AttributeValue::B(encode_base64(blob.as_ref())),
        SdkAttributeValue::Ss(items) => AttributeValue::Ss(items.clone()),
        SdkAttributeValue::Ns(items) => AttributeValue::Ns(items.clone()),
        SdkAttributeValue::Bs(blobs) => {
            AttributeValue::Bs(blobs.iter().map(|blob| encode_base64(blob.as_ref())).collect())
        }
        SdkAttributeValue::L(items) => AttributeValue::L(items.iter().map(from_sdk_attribute).collect()),
        SdkAttributeValue::M(entries) => AttributeValue::M(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), from_sdk_attribute(value)))
                .collect(),
        ),
        SdkAttributeValue::Null(flag) => AttributeValue::Null(*flag),
        SdkAttributeValue::Bool(b) => AttributeValue::Bool(*b),
        _ => AttributeValue::Null(true),
    }
}

/// SDKのAttributeValueに変換する
///
/// # エラー
/// `B`/`BS`のbase64テキストが不正な場合は`InvalidBase64`を返す。
pub fn to_sdk_attribute(
    attribute: &AttributeValue,
) -> Result<SdkAttributeValue, AttributeConversionError> {
    let converted = match attribute {
        AttributeValue::S(s) => SdkAttributeValue::S(s.clone()),
        AttributeValue::N(n) => SdkAttributeValue::N(n.clone()),
        AttributeValue::B(text) => SdkAttributeValue::B(decode_blob(text)?),
        AttributeValue::Ss(items) => SdkAttributeValue::Ss(items.clone()),
        AttributeValue::Ns(items) => SdkAttributeValue::Ns(items.clone()),
        AttributeValue::Bs(items) => SdkAttributeValue::Bs(
            items
                .iter()
                .map(|text| decode_blob(text))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::L(items) => SdkAttributeValue::L(
            items
                .iter()
                .map(to_sdk_attribute)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::M(entries) => SdkAttributeValue::M(
            entries
                .iter()
                .map(|(key, value)| Ok((key.clone(), to_sdk_attribute(value)?)))
                .collect::<Result<HashMap<_, _>, AttributeConversionError>>()?,
        ),
        AttributeValue::Null(flag) => SdkAttributeValue::Null(*flag),
        AttributeValue::Bool(b) => SdkAttributeValue::Bool(*b),
    };

    Ok(converted)
}

/// SDK形式のItemを1件デコードしてプレーンなレコードにする
pub fn clean_sdk_item(
    item: &HashMap<String, SdkAttributeValue>,
    include_keys: bool,
) -> Map<String, Value> {
    let typed: Item = item
        .iter()
        .map(|(key, value)| (key.clone(), from_sdk_attribute(value)))
        .collect();

    clean_item(&typed, include_keys)
}

/// レコードをSDK形式のItemにエンコードする
pub fn to_sdk_item(
    record: &Map<String, Value>,
) -> Result<HashMap<String, SdkAttributeValue>, AttributeConversionError> {
    record
        .iter()
        .map(|(key, value)| Ok((key.clone(), to_sdk_attribute(&to_attribute(value))?)))
        .collect()
}

fn decode_blob(text: &str) -> Result<Blob, AttributeConversionError> {
    decode_base64(text)
        .map(Blob::new)
        .map_err(|e| AttributeConversionError::InvalidBase64(e.to_string()))
}
