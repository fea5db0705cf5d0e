/// ハンドラーエラーとHTTPステータスの対応
use thiserror::Error;

/// エラーが持つHTTPステータスのヒント
///
/// `end_with_error`はこのヒントがあればそれを、なければ呼び出し側の既定値を使う。
pub trait StatusHint: std::error::Error {
    /// 対応するHTTPステータス（不明なら`None`）
    fn status_code(&self) -> Option<u16> {
        None
    }
}

/// ハンドラー処理で使う汎用エラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// 入力が不正
    #[error("{0}")]
    BadRequest(String),
    /// 認証されていない
    #[error("{0}")]
    Unauthorized(String),
    /// 権限がない
    #[error("{0}")]
    Forbidden(String),
    /// 対象が存在しない
    #[error("{0}")]
    NotFound(String),
    /// 任意のステータスを持つエラー
    #[error("{message}")]
    WithStatus { status_code: u16, message: String },
    /// ステータスを持たないエラー
    #[error("{0}")]
    Other(String),
}

impl StatusHint for HandlerError {
    fn status_code(&self) -> Option<u16> {
        match self {
            HandlerError::BadRequest(_) => Some(400),
            HandlerError::Unauthorized(_) => Some(401),
            HandlerError::Forbidden(_) => Some(403),
            HandlerError::NotFound(_) => Some(404),
            HandlerError::WithStatus { status_code, .. } => Some(*status_code),
            HandlerError::Other(_) => None,
        }
    }
}
