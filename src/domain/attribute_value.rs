/// DynamoDB形式のタグ付き属性値
///
/// 各値は型を示す単一キーのオブジェクトで包まれる（`{"S": "..."}`、`{"NULL": true}` など）。
/// serdeの外部タグ表現がそのままDynamoDB JSONのワイヤ形式になる。
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// パーティションキー/ソートキーとして予約されたフィールド名
pub const RESERVED_KEYS: [&str; 2] = ["pk", "sk"];

/// 動的JSONからタグを探すときの優先順位
const TAG_PRIORITY: [&str; 10] = ["S", "N", "B", "SS", "NS", "BS", "L", "M", "NULL", "BOOL"];

/// DynamoDBの1レコード（フィールド名 → タグ付き属性値）
pub type Item = HashMap<String, AttributeValue>;

/// タグ付き属性値
///
/// バイナリ（`B`/`BS`）はDynamoDB JSONと同じくbase64文字列のまま保持し、
/// 中身は解釈しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// 文字列
    S(String),
    /// 数値（10進文字列）
    N(String),
    /// バイナリ（base64文字列）
    B(String),
    /// 文字列セット
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    /// 数値セット
    #[serde(rename = "NS")]
    Ns(Vec<String>),
    /// バイナリセット
    #[serde(rename = "BS")]
    Bs(Vec<String>),
    /// リスト
    L(Vec<AttributeValue>),
    /// マップ
    M(HashMap<String, AttributeValue>),
    /// NULL（真偽値の中身は意味を持たない）
    #[serde(rename = "NULL")]
    Null(bool),
    /// 真偽値
    #[serde(rename = "BOOL")]
    Bool(bool),
}

impl AttributeValue {
    /// ワイヤ形式のタグ名を取得
    pub fn tag(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::B(_) => "B",
            AttributeValue::Ss(_) => "SS",
            AttributeValue::Ns(_) => "NS",
            AttributeValue::Bs(_) => "BS",
            AttributeValue::L(_) => "L",
            AttributeValue::M(_) => "M",
            AttributeValue::Null(_) => "NULL",
            AttributeValue::Bool(_) => "BOOL",
        }
    }

    /// 動的なJSON値からタグ付き属性値を読み取る
    ///
    /// タグは`S, N, B, SS, NS, BS, L, M, NULL, BOOL`の順に探し、最初に見つかったものを採用する。
    /// 余分なキーは無視される。オブジェクトでない入力、既知のタグがない入力、
    /// ペイロードの形が合わない入力は`None`を返す。
    ///
    /// `L`/`M`の要素で読み取れないものは`NULL`として扱う。
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let (tag, payload) = TAG_PRIORITY
            .iter()
            .find_map(|tag| object.get(*tag).map(|payload| (*tag, payload)))?;

        match tag {
            "S" => payload.as_str().map(|s| AttributeValue::S(s.to_string())),
            "N" => number_text(payload).map(AttributeValue::N),
            "B" => payload.as_str().map(|s| AttributeValue::B(s.to_string())),
            "SS" => string_list(payload, |v| v.as_str().map(str::to_string)).map(AttributeValue::Ss),
            "NS" => string_list(payload, number_text).map(AttributeValue::Ns),
            "BS" => string_list(payload, |v| v.as_str().map(str::to_string)).map(AttributeValue::Bs),
            "L" => payload.as_array().map(|items| {
                AttributeValue::L(items.iter().map(Self::from_json_or_null).collect())
            }),
            "M" => payload.as_object().map(|entries| {
                AttributeValue::M(
                    entries
                        .iter()
                        .map(|(key, value)| (key.clone(), Self::from_json_or_null(value)))
                        .collect(),
                )
            }),
            "NULL" => Some(AttributeValue::Null(payload.as_bool().unwrap_or(true))),
            "BOOL" => payload.as_bool().map(AttributeValue::Bool),
            _ => None,
        }
    }

    /// `from_json`と同じだが、読み取れない入力は`NULL`にする
    pub fn from_json_or_null(value: &Value) -> Self {
        Self::from_json(value).unwrap_or(AttributeValue::Null(true))
    }
}

/// `N`のペイロードは文字列が正だが、JSON数値も受け付ける
fn number_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 配列ペイロードを要素ごとに読み取る（1つでも読めなければ`None`）
fn string_list(value: &Value, read: impl Fn(&Value) -> Option<String>) -> Option<Vec<String>> {
    value.as_array()?.iter().map(read).collect()
}
