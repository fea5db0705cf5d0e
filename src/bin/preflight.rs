/// CORSプリフライト HTTP Lambdaエントリポイント
///
/// OPTIONSリクエストに対して、環境変数のCORS設定を反映した
/// 200レスポンスを返却する。
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use lambda_kit::application::handle_cors_with;
use lambda_kit::infrastructure::{init_logging, CorsConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("プリフライトLambda関数を初期化");

    // Lambda関数を実行
    run(service_fn(handler)).await
}

/// HTTPリクエストハンドラー
///
/// # Arguments
/// * `_request` - HTTPリクエスト（内容は使用しない）
///
/// # Returns
/// CORSヘッダー付きのHTTP 200レスポンス
async fn handler(_request: Request) -> Result<Response<Body>, Error> {
    let config = CorsConfig::from_env();

    let response = handle_cors_with(&config).into_http_response()?;

    Ok(response)
}
