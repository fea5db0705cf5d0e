/// プレーンなJSON値からタグ付き属性値へのエンコーダー
///
/// DynamoDBへ書き込む前の変換に使う。出力されるタグは
/// `NULL`、`BOOL`、`S`、`N`、`L`、`M`のいずれかのみ。
/// セット型（`SS`/`NS`/`BS`）や`B`は生成しない。
use serde_json::{Map, Number, Value};

use super::attribute_value::{AttributeValue, Item};

/// JSON値をタグ付き属性値に変換する
///
/// `serde_json::Value`は閉じた列挙型なので、すべての入力がいずれかのタグに対応する。
pub fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Number(n) => AttributeValue::N(render_number(n)),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(entries) => AttributeValue::M(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), to_attribute(value)))
                .collect(),
        ),
    }
}

/// 値が存在しない場合は`NULL: true`になる
pub fn to_attribute_opt(value: Option<&Value>) -> AttributeValue {
    value.map_or(AttributeValue::Null(true), to_attribute)
}

/// レコード全体をItemに変換する
pub fn to_item(record: &Map<String, Value>) -> Item {
    record
        .iter()
        .map(|(key, value)| (key.clone(), to_attribute(value)))
        .collect()
}

/// 数値を`N`タグ用の10進文字列にする
///
/// ECMAScriptの`Number#toString`と同じ表記にそろえる:
/// 整数は小数部なし、それ以外は往復可能な最短表記、
/// 絶対値が`1e21`以上または`1e-6`未満の場合は指数表記（`1.5e+21`、`1e-7`）。
/// 2^53を超える整数は倍精度に丸めてから表記する。
pub fn render_number(number: &Number) -> String {
    if let Some(i) = number.as_i64().filter(|i| i.unsigned_abs() <= MAX_SAFE_INTEGER) {
        return i.to_string();
    }

    number
        .as_f64()
        .map_or_else(|| number.to_string(), render_f64)
}

const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

fn render_f64(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        // Rustの指数表記は正の指数に符号が付かない（1.5e21）
        let exponential = format!("{:e}", n);
        return match exponential.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => exponential,
        };
    }

    // f64のDisplayは指数を使わない最短表記（1.0は"1"）
    n.to_string()
}
