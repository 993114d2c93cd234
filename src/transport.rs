use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Method;
use tracing::{debug, error};

use crate::config::{RegistryConfig, Scheme};
use crate::error::SchemaRegistryError;

/// Schema Registry 固有の JSON メディアタイプ。
pub const SCHEMA_REGISTRY_CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";

/// 1 回のリクエストを表す不変の記述子。
///
/// 呼び出しごとに新しく生成し、複数のリクエスト間で共有・変更しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRequest {
    pub method: Method,
    /// パスプレフィックスの後ろに連結されるサフィックス（例: `schemas/ids/42`）。
    pub path: String,
    pub body: Option<String>,
}

impl RegistryRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body.into()),
        }
    }
}

/// ボディを最後まで受信したレスポンス。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryResponse {
    pub status: u16,
    pub body: String,
}

/// PEM 形式の CA 証明書（複数可）を解析する。
///
/// 証明書を 1 つも含まない場合はエラーとし、既定のルート証明書へ暗黙にフォールバックしない。
fn parse_certificate_authority(
    pem: &str,
) -> Result<Vec<reqwest::Certificate>, SchemaRegistryError> {
    let certs = reqwest::Certificate::from_pem_bundle(pem.as_bytes()).map_err(|e| {
        SchemaRegistryError::InvalidConfig(format!("invalid certificate authority: {}", e))
    })?;
    if certs.is_empty() {
        return Err(SchemaRegistryError::InvalidConfig(
            "certificate authority contains no PEM certificates".into(),
        ));
    }
    Ok(certs)
}

/// 1 回の操作のために構築される HTTP(S) トランスポート。
///
/// アイドル接続を保持しないため、リクエストごとに新しい接続を使用する。
/// タイムアウトとリトライは行わない。
pub struct HttpTransport<'a> {
    config: &'a RegistryConfig,
    http_client: reqwest::Client,
}

impl<'a> HttpTransport<'a> {
    /// 設定を検証し、TLS の信頼設定を反映した HTTP クライアントを構築する。
    pub fn new(config: &'a RegistryConfig) -> Result<Self, SchemaRegistryError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);

        if config.scheme == Scheme::Https {
            if let Some(pem) = &config.certificate_authority {
                for cert in parse_certificate_authority(pem)? {
                    builder = builder.add_root_certificate(cert);
                }
            }
            if config.accept_invalid_certs {
                // 明示的に指定された場合のみ検証を無効化する。
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let http_client = builder
            .build()
            .map_err(|e| SchemaRegistryError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// リクエストを送信し、レスポンスボディをすべて受信してから返す。
    ///
    /// 受信途中でエラーが発生した場合は、それまでに受信したデータを破棄してエラーを返す。
    pub async fn execute(
        &self,
        request: &RegistryRequest,
    ) -> Result<RegistryResponse, SchemaRegistryError> {
        let url = self.config.request_url(&request.path);
        let auth = self.config.basic_auth();

        debug!(
            method = %request.method,
            url = %url,
            basic_auth = auth.is_some(),
            "Sending Schema Registry request"
        );

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .header(CONTENT_TYPE, SCHEMA_REGISTRY_CONTENT_TYPE);

        if let Some((username, password)) = auth {
            builder = builder.basic_auth(username, Some(password));
        }

        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_LENGTH, body.len())
                .body(body.clone());
        }

        let mut response = builder.send().await.map_err(|e| {
            error!(url = %url, "Schema Registry request failed: {}", e);
            SchemaRegistryError::Http(e)
        })?;

        let status = response.status().as_u16();
        let mut buffer: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            error!(
                url = %url,
                status,
                "Schema Registry response stream failed: {}",
                e
            );
            SchemaRegistryError::Http(e)
        })? {
            buffer.extend_from_slice(&chunk);
        }

        let body = String::from_utf8(buffer).map_err(|e| {
            SchemaRegistryError::InvalidResponseBody {
                status,
                reason: e.to_string(),
            }
        })?;

        debug!(
            url = %url,
            status,
            bytes = body.len(),
            "Received Schema Registry response"
        );

        Ok(RegistryResponse { status, body })
    }
}
