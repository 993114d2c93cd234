use serde::Deserialize;
use tracing::error;

use crate::error::SchemaRegistryError;
use crate::transport::RegistryResponse;

/// 非成功レスポンスで返される `{error_code, message}`。
///
/// フィールドの欠落は `MalformedErrorEnvelope` として扱うため Option で受ける。
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error_code: Option<i64>,
    message: Option<String>,
}

/// レスポンスのステータスを検査してエラーに変換する。
///
/// - 期待したステータス → Ok
/// - JSON として解釈できないボディ → `NoErrorEnvelope`
/// - `error_code` / `message` を欠く JSON → `MalformedErrorEnvelope`
/// - それ以外 → `Registry`
///
/// 成功時のペイロード解析より前に必ず呼び出すこと。
pub(crate) fn check_response(
    expected_status: u16,
    response: &RegistryResponse,
) -> Result<(), SchemaRegistryError> {
    if response.status == expected_status {
        return Ok(());
    }

    let value: serde_json::Value = match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(_) => {
            error!(
                status = response.status,
                "Schema Registry returned a non-JSON error body"
            );
            return Err(SchemaRegistryError::NoErrorEnvelope {
                status: response.status,
                body: response.body.clone(),
            });
        }
    };

    let envelope = serde_json::from_value::<ErrorEnvelope>(value).ok();
    match envelope {
        Some(ErrorEnvelope {
            error_code: Some(error_code),
            message: Some(message),
        }) => {
            error!(
                status = response.status,
                error_code, "Schema Registry returned error: {}", message
            );
            Err(SchemaRegistryError::Registry {
                status: response.status,
                error_code,
                message,
            })
        }
        _ => {
            error!(
                status = response.status,
                body = %response.body,
                "Schema Registry returned a malformed error envelope"
            );
            Err(SchemaRegistryError::MalformedErrorEnvelope {
                status: response.status,
                body: response.body.clone(),
            })
        }
    }
}
