/// SchemaRegistryError は Schema Registry 操作に関するエラーを表す。
///
/// 呼び出し側からは 2 種類に分類される。
/// - Registry エラー: レジストリがリクエストを解釈し、構造化されたエラーを返した。
/// - Transport エラー: レジストリとの正常なやり取りとして完了しなかった。
#[derive(Debug, thiserror::Error)]
pub enum SchemaRegistryError {
    /// レジストリが `{error_code, message}` 形式のエラーを返した。
    #[error("Schema registry error: {error_code} - {message}")]
    Registry {
        /// 観測した HTTP ステータス。
        status: u16,
        /// レジストリが割り当てたエラーコード。
        error_code: i64,
        /// レジストリが返したメッセージ。
        message: String,
    },

    /// 非成功レスポンスのボディが JSON として解釈できなかった。
    #[error("Schema registry error: no error in response; httpStatus is {status}")]
    NoErrorEnvelope {
        /// 観測した HTTP ステータス。
        status: u16,
        /// 受信したボディ。
        body: String,
    },

    /// 非成功レスポンスのボディは JSON だが `error_code` / `message` を欠いていた。
    #[error("Schema registry error: malformed error envelope; httpStatus is {status}")]
    MalformedErrorEnvelope {
        /// 観測した HTTP ステータス。
        status: u16,
        /// 受信したボディ。
        body: String,
    },

    /// レスポンスボディが UTF-8 ではなかった。
    #[error("Invalid response body (httpStatus {status}): {reason}")]
    InvalidResponseBody {
        /// 観測した HTTP ステータス。
        status: u16,
        /// 失敗理由。
        reason: String,
    },

    /// HTTP リクエストが失敗した（接続・送信・ボディ受信中のエラー）。
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// レジストリから受信したボディのデシリアライズに失敗した。
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 送信前のリクエストボディのエンコードに失敗した（通信は発生していない）。
    #[error("Encoding error: {0}")]
    Encoding(#[source] serde_json::Error),

    /// サブジェクトにバージョンが 1 つも登録されていない。
    #[error("Subject {subject} has no registered versions")]
    NoVersions {
        /// サブジェクト名。
        subject: String,
    },

    /// 接続設定が不正、または HTTP クライアントを構築できなかった。
    #[error("Invalid registry configuration: {0}")]
    InvalidConfig(String),
}

impl SchemaRegistryError {
    /// レジストリが構造化エラーを返した場合に true。
    pub fn is_registry_error(&self) -> bool {
        matches!(self, SchemaRegistryError::Registry { .. })
    }

    /// 通信エラー、または解釈できないレスポンスの場合に true。
    ///
    /// 送信前のエンコード失敗（`Encoding`）はローカルのエラーであり含まない。
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            SchemaRegistryError::NoErrorEnvelope { .. }
                | SchemaRegistryError::MalformedErrorEnvelope { .. }
                | SchemaRegistryError::InvalidResponseBody { .. }
                | SchemaRegistryError::Http(_)
                | SchemaRegistryError::Serialization(_)
        )
    }

    /// レジストリのエラーコードを返す。
    pub fn error_code(&self) -> Option<i64> {
        match self {
            SchemaRegistryError::Registry { error_code, .. } => Some(*error_code),
            _ => None,
        }
    }

    /// 観測した HTTP ステータスを返す。
    pub fn status(&self) -> Option<u16> {
        match self {
            SchemaRegistryError::Registry { status, .. }
            | SchemaRegistryError::NoErrorEnvelope { status, .. }
            | SchemaRegistryError::MalformedErrorEnvelope { status, .. }
            | SchemaRegistryError::InvalidResponseBody { status, .. } => Some(*status),
            SchemaRegistryError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
