// CORSレスポンスヘッダー設定
//
// 環境変数からCORSヘッダーの値を読み込み、
// レスポンスエンベロープ用のヘッダーマップを生成する。

use serde_json::{Map, Value};

/// デフォルトの許可オリジン
pub const DEFAULT_ALLOW_ORIGIN: &str = "*";
/// デフォルトの許可メソッド
pub const DEFAULT_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
/// デフォルトの許可ヘッダー
pub const DEFAULT_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// CORS設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Access-Control-Allow-Origin (CORS_ALLOW_ORIGIN環境変数)
    pub allow_origin: String,
    /// Access-Control-Allow-Methods (CORS_ALLOW_METHODS環境変数)
    pub allow_methods: String,
    /// Access-Control-Allow-Headers (CORS_ALLOW_HEADERS環境変数)
    pub allow_headers: String,
    /// Access-Control-Allow-Credentials (CORS_ALLOW_CREDENTIALS環境変数)
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: DEFAULT_ALLOW_ORIGIN.to_string(),
            allow_methods: DEFAULT_ALLOW_METHODS.to_string(),
            allow_headers: DEFAULT_ALLOW_HEADERS.to_string(),
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// 環境変数から設定を読み込み
    ///
    /// 未設定または空の項目はデフォルト値を使う。
    /// CORS_ALLOW_CREDENTIALSは`true`/`false`以外の値なら無視する。
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let get_string = |key: &str, default: String| -> String {
            std::env::var(key)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(default)
        };

        let allow_credentials = std::env::var("CORS_ALLOW_CREDENTIALS")
            .ok()
            .and_then(|v| v.trim().parse::<bool>().ok())
            .unwrap_or(defaults.allow_credentials);

        Self {
            allow_origin: get_string("CORS_ALLOW_ORIGIN", defaults.allow_origin),
            allow_methods: get_string("CORS_ALLOW_METHODS", defaults.allow_methods),
            allow_headers: get_string("CORS_ALLOW_HEADERS", defaults.allow_headers),
            allow_credentials,
        }
    }

    /// CORSヘッダーと指定のContent-Typeを含むヘッダーマップを生成
    pub fn response_headers(&self, content_type: &str) -> Map<String, Value> {
        let mut headers = Map::new();
        headers.insert(
            "Access-Control-Allow-Origin".to_string(),
            Value::String(self.allow_origin.clone()),
        );
        headers.insert(
            "Access-Control-Allow-Methods".to_string(),
            Value::String(self.allow_methods.clone()),
        );
        headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            Value::String(self.allow_headers.clone()),
        );
        headers.insert(
            "Access-Control-Allow-Credentials".to_string(),
            Value::Bool(self.allow_credentials),
        );
        headers.insert(
            "Content-Type".to_string(),
            Value::String(content_type.to_string()),
        );
        headers
    }
}
