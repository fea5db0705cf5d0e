/// タグ付き属性値からプレーンなJSON値へのデコーダー
///
/// DynamoDBから取得したItemを、アプリケーションがそのまま扱える
/// タグなしのレコードに正規化する。
///
/// デコードは全域関数であり、失敗しない。未知・不正な属性は`null`に縮退する。
use serde_json::{Map, Number, Value};

use super::attribute_value::{AttributeValue, Item, RESERVED_KEYS};

/// `clean_items`の入力
///
/// 単一のItem、Itemの並び、または入力なしを受け付ける。
#[derive(Debug, Clone, Copy, Default)]
pub enum ItemBatch<'a> {
    /// 入力なし（空の結果になる）
    #[default]
    Absent,
    /// 単一のItem（1要素として扱う）
    Single(&'a Item),
    /// 複数のItem
    Many(&'a [Item]),
}

impl<'a> From<&'a Item> for ItemBatch<'a> {
    fn from(item: &'a Item) -> Self {
        ItemBatch::Single(item)
    }
}

impl<'a> From<&'a [Item]> for ItemBatch<'a> {
    fn from(items: &'a [Item]) -> Self {
        ItemBatch::Many(items)
    }
}

impl<'a> From<&'a Vec<Item>> for ItemBatch<'a> {
    fn from(items: &'a Vec<Item>) -> Self {
        ItemBatch::Many(items.as_slice())
    }
}

impl<'a> From<Option<&'a Item>> for ItemBatch<'a> {
    fn from(item: Option<&'a Item>) -> Self {
        item.map_or(ItemBatch::Absent, ItemBatch::Single)
    }
}

/// タグ付き属性値を1つデコードする
///
/// | タグ | 結果 |
/// |---|---|
/// | `S` | 文字列そのまま |
/// | `N` | 倍精度数値 |
/// | `B` / `SS` / `BS` | ペイロードそのまま |
/// | `NS` | 各要素を数値化した配列 |
/// | `L` / `M` | 再帰的にデコード |
/// | `NULL` | `null` |
/// | `BOOL` | 真偽値そのまま |
pub fn extract_value(attribute: &AttributeValue) -> Value {
    match attribute {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::B(blob) => Value::String(blob.clone()),
        AttributeValue::Ss(items) | AttributeValue::Bs(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(items) => Value::Array(items.iter().map(|n| parse_number(n)).collect()),
        AttributeValue::L(items) => Value::Array(items.iter().map(extract_value).collect()),
        AttributeValue::M(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), extract_value(value)))
                .collect(),
        ),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
    }
}

/// 生のJSON形式の属性値をデコードする
///
/// 入力なし・オブジェクト以外・既知のタグがない場合は`null`を返す。
pub fn extract_json_value(attribute: Option<&Value>) -> Value {
    attribute
        .and_then(AttributeValue::from_json)
        .map_or(Value::Null, |attr| extract_value(&attr))
}

/// Itemを1件デコードしてプレーンなレコードにする
///
/// `include_keys`が`false`の場合は`pk`/`sk`を取り除く。
/// デコード後、`{`または`[`で始まる文字列フィールドはJSONとしてパースを試み、
/// 成功した場合のみパース結果に置き換える。
pub fn clean_item(item: &Item, include_keys: bool) -> Map<String, Value> {
    let mut record: Map<String, Value> = item
        .iter()
        .filter(|(key, _)| include_keys || !RESERVED_KEYS.contains(&key.as_str()))
        .map(|(key, attr)| (key.clone(), extract_value(attr)))
        .collect();

    for value in record.values_mut() {
        if let Some(parsed) = parse_embedded_json(value) {
            *value = parsed;
        }
    }

    record
}

/// 生のJSON形式のItemを1件デコードする
///
/// 読み取れないフィールドは`null`になる。
pub fn clean_item_json(item: &Map<String, Value>, include_keys: bool) -> Map<String, Value> {
    let typed: Item = item
        .iter()
        .map(|(key, value)| (key.clone(), AttributeValue::from_json_or_null(value)))
        .collect();

    clean_item(&typed, include_keys)
}

/// 複数のItemをデコードする（バッチ入口）
///
/// 入力なしは空のVec、単一Itemは1要素のVecを返す。順序は保持される。
pub fn clean_items<'a>(items: impl Into<ItemBatch<'a>>, include_keys: bool) -> Vec<Map<String, Value>> {
    match items.into() {
        ItemBatch::Absent => Vec::new(),
        ItemBatch::Single(item) => vec![clean_item(item, include_keys)],
        ItemBatch::Many(items) => items
            .iter()
            .map(|item| clean_item(item, include_keys))
            .collect(),
    }
}

/// 生のJSON形式のItem（単一または配列）をデコードする
///
/// - `null`/`false`などの空値: 空のVec
/// - オブジェクト: 1要素のVec
/// - 配列: 要素ごとにデコード（オブジェクトでない要素は空レコード）
pub fn clean_items_json(items: &Value, include_keys: bool) -> Vec<Map<String, Value>> {
    match items {
        Value::Object(item) => vec![clean_item_json(item, include_keys)],
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_object()
                    .map(|item| clean_item_json(item, include_keys))
                    .unwrap_or_default()
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// 数値文字列を倍精度数値としてパースする
///
/// 前後の空白は無視し、空文字列は0とする。
/// `0x`/`0o`/`0b`接頭辞の整数表記（符号なし）も受け付ける。
/// パースできない値やNaN/無限大はJSONで表現できないため`null`になる。
fn parse_number(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::from(0);
    }

    let parsed = match radix_prefix(trimmed) {
        Some((radix, digits)) => parse_radix(digits, radix),
        None => trimmed.parse::<f64>().ok(),
    };

    parsed.map_or(Value::Null, number_value)
}

fn radix_prefix(text: &str) -> Option<(u32, &str)> {
    let prefix = text.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    Some((radix, &text[2..]))
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }

    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

/// 2^53未満の整数値は整数として表現する
///
/// 倍精度として同じ値でも`Value`の比較では区別されるため、
/// `1.0`をエンコードしてデコードすると`1`（整数）になる。
fn number_value(n: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Value::from(n as i64);
    }

    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

/// JSONらしく見える文字列をパースする（失敗時は`None`）
fn parse_embedded_json(value: &Value) -> Option<Value> {
    let text = value.as_str()?;
    if !(text.starts_with('{') || text.starts_with('[')) {
        return None;
    }

    serde_json::from_str(text).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== テストヘルパー ====================

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    fn n(value: &str) -> AttributeValue {
        AttributeValue::N(value.to_string())
    }

    fn item(attrs: Vec<(&str, AttributeValue)>) -> Item {
        attrs
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    /// pk/skとあらゆる型を含むサンプルItem
    fn sample_item() -> Item {
        item(vec![
            ("pk", s("item#123")),
            ("sk", s("meta#456")),
            ("name", s("Test Item")),
            ("age", n("25")),
            ("isActive", AttributeValue::Bool(true)),
            ("tags", AttributeValue::Ss(vec!["tag1".to_string(), "tag2".to_string()])),
            (
                "metadata",
                AttributeValue::M(
                    [("key1".to_string(), s("value1")), ("key2".to_string(), n("100"))]
                        .into_iter()
                        .collect(),
                ),
            ),
            ("list", AttributeValue::L(vec![s("item1"), s("item2")])),
        ])
    }

    fn expected_without_keys() -> Value {
        json!({
            "name": "Test Item",
            "age": 25,
            "isActive": true,
            "tags": ["tag1", "tag2"],
            "metadata": {"key1": "value1", "key2": 100},
            "list": ["item1", "item2"]
        })
    }

    // ==================== extract_value テスト ====================

    #[test]
    fn test_extract_value_scalars() {
        assert_eq!(extract_value(&s("hello")), json!("hello"));
        assert_eq!(extract_value(&n("42")), json!(42));
        assert_eq!(extract_value(&n("-7")), json!(-7));
        assert_eq!(extract_value(&n("3.5")), json!(3.5));
        assert_eq!(extract_value(&AttributeValue::Bool(false)), json!(false));
        assert_eq!(extract_value(&AttributeValue::Bool(true)), json!(true));
    }

    #[test]
    fn test_extract_value_null_ignores_flag() {
        assert_eq!(extract_value(&AttributeValue::Null(true)), Value::Null);
        assert_eq!(extract_value(&AttributeValue::Null(false)), Value::Null);
    }

    #[test]
    fn test_extract_value_empty_string_stays_string() {
        assert_eq!(extract_value(&s("")), json!(""));
    }

    #[test]
    fn test_extract_value_number_set() {
        let attr = AttributeValue::Ns(vec!["1".to_string(), "2".to_string(), "3".to_string()]);
        assert_eq!(extract_value(&attr), json!([1, 2, 3]));
    }

    #[test]
    fn test_extract_value_binary_passthrough() {
        let attr = AttributeValue::Bs(vec!["YmxvYkE=".to_string(), "YmxvYkI=".to_string()]);
        assert_eq!(extract_value(&attr), json!(["YmxvYkE=", "YmxvYkI="]));

        let attr = AttributeValue::B("AAEC".to_string());
        assert_eq!(extract_value(&attr), json!("AAEC"));
    }

    #[test]
    fn test_extract_value_string_set_passthrough() {
        let attr = AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(extract_value(&attr), json!(["a", "b"]));
    }

    #[test]
    fn test_extract_value_nested() {
        let attr = AttributeValue::M(
            [(
                "inner".to_string(),
                AttributeValue::L(vec![n("1"), AttributeValue::Null(true), s("x")]),
            )]
            .into_iter()
            .collect(),
        );

        assert_eq!(extract_value(&attr), json!({"inner": [1, null, "x"]}));
    }

    #[test]
    fn test_extract_value_malformed_number_is_null() {
        assert_eq!(extract_value(&n("abc")), Value::Null);
        assert_eq!(extract_value(&n("NaN")), Value::Null);
    }

    #[test]
    fn test_extract_value_number_whitespace_and_empty() {
        assert_eq!(extract_value(&n(" 12 ")), json!(12));
        assert_eq!(extract_value(&n("")), json!(0));
    }

    #[test]
    fn test_extract_value_radix_prefixed_numbers() {
        assert_eq!(extract_value(&n("0x1A")), json!(26));
        assert_eq!(extract_value(&n("0X1a")), json!(26));
        assert_eq!(extract_value(&n("0o17")), json!(15));
        assert_eq!(extract_value(&n(" 0b101 ")), json!(5));
        assert_eq!(extract_value(&n("0x")), Value::Null);
        assert_eq!(extract_value(&n("0xZZ")), Value::Null);
        assert_eq!(extract_value(&n("-0x1A")), Value::Null);
    }

    #[test]
    fn test_extract_value_integral_float_becomes_integer() {
        let decoded = extract_value(&n("1.0"));

        assert_eq!(decoded, json!(1));
        assert_ne!(decoded, json!(1.0));
        assert_eq!(decoded.as_f64(), Some(1.0));
    }

    #[test]
    fn test_extract_value_large_number_stays_float() {
        assert_eq!(extract_value(&n("1e300")), json!(1e300));
    }

    // ==================== extract_json_value テスト ====================

    #[test]
    fn test_extract_json_value_absent_and_unknown() {
        assert_eq!(extract_json_value(None), Value::Null);
        assert_eq!(extract_json_value(Some(&json!(null))), Value::Null);
        assert_eq!(extract_json_value(Some(&json!({"UNKNOWN": "x"}))), Value::Null);
    }

    #[test]
    fn test_extract_json_value_reads_wire_form() {
        let value = json!({"NS": ["1", "2", "3"]});
        assert_eq!(extract_json_value(Some(&value)), json!([1, 2, 3]));

        let value = json!({"M": {"a": {"L": [{"BOOL": true}, {"NULL": true}]}}});
        assert_eq!(extract_json_value(Some(&value)), json!({"a": [true, null]}));
    }

    // ==================== clean_item テスト ====================

    #[test]
    fn test_clean_item_strips_reserved_keys() {
        let record = clean_item(&sample_item(), false);

        assert!(!record.contains_key("pk"));
        assert!(!record.contains_key("sk"));
        assert_eq!(Value::Object(record), expected_without_keys());
    }

    #[test]
    fn test_clean_item_keeps_reserved_keys() {
        let record = clean_item(&sample_item(), true);

        let mut expected = expected_without_keys();
        expected["pk"] = json!("item#123");
        expected["sk"] = json!("meta#456");
        assert_eq!(Value::Object(record), expected);
    }

    #[test]
    fn test_clean_item_promotes_embedded_json() {
        let source = item(vec![
            ("pk", s("item#123")),
            ("sk", s("meta#456")),
            ("jsonString", s(r#"{"key": "value"}"#)),
            ("jsonArray", s("[1, 2]")),
            ("malformedJsonString", s("{key: value")),
            ("simpleString", s("Just a string")),
        ]);

        let record = clean_item(&source, false);

        assert_eq!(
            Value::Object(record),
            json!({
                "jsonString": {"key": "value"},
                "jsonArray": [1, 2],
                "malformedJsonString": "{key: value",
                "simpleString": "Just a string"
            })
        );
    }

    #[test]
    fn test_clean_item_does_not_promote_nested_strings() {
        // 埋め込みJSONの昇格はトップレベルのフィールドのみ
        let source = item(vec![(
            "nested",
            AttributeValue::M([("inner".to_string(), s("[1]"))].into_iter().collect()),
        )]);

        let record = clean_item(&source, false);
        assert_eq!(record["nested"], json!({"inner": "[1]"}));
    }

    #[test]
    fn test_clean_item_json_from_wire_form() {
        let raw = json!({
            "pk": {"S": "a"},
            "count": {"N": "3"},
            "broken": {"WHAT": "?"}
        });

        let record = clean_item_json(raw.as_object().unwrap(), false);
        assert_eq!(Value::Object(record), json!({"count": 3, "broken": null}));
    }

    // ==================== clean_items テスト ====================

    #[test]
    fn test_clean_items_absent_is_empty() {
        assert!(clean_items(ItemBatch::Absent, false).is_empty());
        assert!(clean_items(None::<&Item>, true).is_empty());
    }

    #[test]
    fn test_clean_items_single_item() {
        let source = sample_item();
        let records = clean_items(&source, false);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0], clean_item(&source, false));
    }

    #[test]
    fn test_clean_items_many_preserves_order() {
        let items = vec![
            item(vec![("pk", s("1")), ("v", n("1"))]),
            item(vec![("pk", s("2")), ("v", n("2"))]),
            item(vec![("pk", s("3")), ("v", n("3"))]),
        ];

        let records = clean_items(&items, true);

        let pks: Vec<&Value> = records.iter().map(|r| &r["pk"]).collect();
        assert_eq!(pks, vec![&json!("1"), &json!("2"), &json!("3")]);
        assert!(records.iter().all(|r| r.contains_key("v")));
    }

    #[test]
    fn test_clean_items_json_shapes() {
        assert!(clean_items_json(&Value::Null, false).is_empty());
        assert!(clean_items_json(&json!(false), false).is_empty());

        let single = json!({"name": {"S": "one"}});
        assert_eq!(clean_items_json(&single, false).len(), 1);

        let many = json!([{"name": {"S": "one"}}, "not an item", {"name": {"S": "two"}}]);
        let records = clean_items_json(&many, false);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["name"], json!("one"));
        assert!(records[1].is_empty());
        assert_eq!(records[2]["name"], json!("two"));
    }
}
