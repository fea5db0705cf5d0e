// アプリケーション層モジュール
pub mod error;
pub mod event_accessor;
pub mod response;

// 再エクスポート
pub use error::{HandlerError, StatusHint};
pub use event_accessor::{
    get_auth_context, get_bearer_token, get_input_body, get_metadata, get_path_parameters,
    get_query_string_parameters, is_json_string, InputBodyError,
};
pub use response::{
    content_type_for, end, end_with_error, handle_cors, handle_cors_with, LambdaResponse,
};
