/// DynamoDB Streams正規化 Lambda関数
///
/// DynamoDBテーブルのストリームイベントを受け取り、各レコードのKeys/NewImage/OldImageを
/// プレーンなJSONレコードに変換して構造化ログに出力する。
use aws_lambda_events::event::dynamodb::{Event, EventRecord};
use lambda_kit::infrastructure::{
    clean_stream_image, init_logging, reset_correlation_id, start_logger, LogMetadata,
};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // Lambda関数を初期化して実行
    let func = service_fn(handler);
    lambda_runtime::run(func).await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// ストリームイベントには相関IDの入る場所がないため、リクエストIDを相関IDとして使う。
async fn handler(event: LambdaEvent<Event>) -> Result<(), Error> {
    let span = start_logger(
        &Value::Null,
        Some(event.context.request_id.as_str()),
        &LogMetadata::from_env(),
    );

    span.in_scope(|| {
        info!(
            record_count = event.payload.records.len(),
            "DynamoDB Streamsイベントを受信"
        );

        for record in &event.payload.records {
            let normalized = normalize_record(record);
            info!(
                event_name = %record.event_name,
                record = %normalized,
                "レコードを正規化"
            );
        }
    });

    reset_correlation_id();

    Ok(())
}

/// ストリームレコードを正規化
///
/// KeysはpkとskそのものなのでKeysのみ予約キーを残す。
fn normalize_record(record: &EventRecord) -> Value {
    json!({
        "eventName": record.event_name,
        "keys": clean_stream_image(&record.change.keys, true),
        "newImage": clean_stream_image(&record.change.new_image, false),
        "oldImage": clean_stream_image(&record.change.old_image, false),
    })
}
