/// ログ基盤モジュール
///
/// Lambda環境向けの構造化ログ設定を提供する。
/// tracingクレートを使用し、JSON形式での出力をサポートする。
/// リクエストごとのspanには相関IDとサービスのメタデータを載せる。
use std::sync::Once;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{field, info_span, Span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::correlation::{get_correlation_id, set_correlation_id};

/// ログサブスクライバー初期化用の同期プリミティブ
static INIT: Once = Once::new();

/// Lambda環境向けのログサブスクライバーを初期化する
///
/// JSON形式での構造化ログ出力を設定し、環境変数`RUST_LOG`または
/// デフォルトのログレベル（info）でフィルタリングを行う。
///
/// この関数は複数回呼び出しても安全で、最初の呼び出しのみ初期化を実行する。
/// 既に別のサブスクライバーが登録されている場合はそちらを優先する。
///
/// # 使用例
/// ```ignore
/// use lambda_kit::infrastructure::init_logging;
///
/// init_logging();
/// tracing::info!("Lambda function started");
/// ```
pub fn init_logging() {
    INIT.call_once(|| {
        // 環境変数からログレベルを取得、デフォルトはinfo
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // JSON形式のログレイヤー（Lambda/CloudWatch向け）
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .flatten_event(true)
            .with_current_span(true);

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init();
    });
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
///
/// # 注意
/// この関数はテスト専用であり、本番環境では`init_logging`を使用すること。
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}

/// ログに付与するサービスのメタデータ
///
/// すべて任意項目。設定された項目だけがspanに記録される。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMetadata {
    /// サービス名 (SERVICE_NAME環境変数)
    pub service: Option<String>,
    /// バージョン (SERVICE_VERSION環境変数)
    pub version: Option<String>,
    /// ドメイン (SERVICE_DOMAIN環境変数)
    pub domain: Option<String>,
    /// システム (SERVICE_SYSTEM環境変数)
    pub system: Option<String>,
    /// チーム (SERVICE_TEAM環境変数)
    pub team: Option<String>,
    /// オーナー (SERVICE_OWNER環境変数)
    pub owner: Option<String>,
    /// タグ (SERVICE_TAGS環境変数、カンマ区切り)
    #[serde(default)]
    pub tags: Vec<String>,
}

impl LogMetadata {
    /// 環境変数からメタデータを読み込み
    pub fn from_env() -> Self {
        // 空文字はNone扱い
        let get_optional_string = |key: &str| -> Option<String> {
            std::env::var(key).ok().filter(|s| !s.trim().is_empty())
        };

        let tags = std::env::var("SERVICE_TAGS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            service: get_optional_string("SERVICE_NAME"),
            version: get_optional_string("SERVICE_VERSION"),
            domain: get_optional_string("SERVICE_DOMAIN"),
            system: get_optional_string("SERVICE_SYSTEM"),
            team: get_optional_string("SERVICE_TEAM"),
            owner: get_optional_string("SERVICE_OWNER"),
            tags,
        }
    }
}

/// リクエスト処理用のロガーを開始する
///
/// 1. イベントとリクエストIDから相関IDを解決し、現在の相関IDとして保持
/// 2. ログサブスクライバーを初期化（初回のみ）
/// 3. 相関ID・リクエストID・関数情報・メタデータを持つspanを返す
///
/// 呼び出し側は返されたspanに入ってからハンドラー処理を行う。
pub fn start_logger(event: &Value, request_id: Option<&str>, metadata: &LogMetadata) -> Span {
    let correlation_id = get_correlation_id(Some(event), request_id);
    set_correlation_id(&correlation_id);

    init_logging();

    let span = info_span!(
        "handler",
        correlation_id = %correlation_id,
        request_id = request_id.unwrap_or_default(),
        function_name = field::Empty,
        region = field::Empty,
        service = field::Empty,
        version = field::Empty,
        domain = field::Empty,
        system = field::Empty,
        team = field::Empty,
        owner = field::Empty,
        tags = field::Empty,
    );

    // Lambda実行環境が設定する変数
    if let Ok(function_name) = std::env::var("AWS_LAMBDA_FUNCTION_NAME") {
        span.record("function_name", function_name.as_str());
    }
    if let Ok(region) = std::env::var("AWS_REGION") {
        span.record("region", region.as_str());
    }

    let optional_fields = [
        ("service", &metadata.service),
        ("version", &metadata.version),
        ("domain", &metadata.domain),
        ("system", &metadata.system),
        ("team", &metadata.team),
        ("owner", &metadata.owner),
    ];
    for (name, value) in optional_fields {
        if let Some(value) = value {
            span.record(name, value.as_str());
        }
    }
    if !metadata.tags.is_empty() {
        span.record("tags", metadata.tags.join(",").as_str());
    }

    span
}
