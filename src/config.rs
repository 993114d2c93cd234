use serde::{Deserialize, Serialize};

use crate::error::SchemaRegistryError;

/// Schema Registry への接続方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// 平文 HTTP。
    Http,
    /// TLS 上の HTTP。
    Https,
}

impl Scheme {
    /// URL に使用する文字列表現を返す。
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema Registry 接続設定。
///
/// 呼び出し側が操作ごとに渡す不変の接続記述子。クライアントは接続状態を保持しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// 接続方式。デフォルト: http
    #[serde(default = "default_scheme")]
    pub scheme: Scheme,

    /// ホスト名。
    pub host: String,

    /// ポート番号。
    pub port: u16,

    /// パスプレフィックス。加工せずそのまま連結されるため `/` で始まり `/` で終わる必要がある。
    /// デフォルト: "/"
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Basic 認証のユーザー名。
    #[serde(default)]
    pub username: Option<String>,

    /// Basic 認証のパスワード。
    #[serde(default)]
    pub password: Option<String>,

    /// サーバー証明書の検証に使用する CA 証明書（PEM）。
    #[serde(default)]
    pub certificate_authority: Option<String>,

    /// true の場合は証明書検証を無効化する。明示的に指定しない限り検証は有効。
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_scheme() -> Scheme {
    Scheme::Http
}

fn default_base_path() -> String {
    "/".to_string()
}

impl RegistryConfig {
    /// 指定したホスト・ポートで設定を作成する。
    ///
    /// パスプレフィックスは "/"、認証なし、証明書検証ありがデフォルト値として設定される。
    pub fn new(scheme: Scheme, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme,
            host: host.into(),
            port,
            base_path: default_base_path(),
            username: None,
            password: None,
            certificate_authority: None,
            accept_invalid_certs: false,
        }
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_certificate_authority(mut self, pem: impl Into<String>) -> Self {
        self.certificate_authority = Some(pem.into());
        self
    }

    /// サーバー証明書の検証を無効化する。
    pub fn danger_accept_invalid_certs(mut self) -> Self {
        self.accept_invalid_certs = true;
        self
    }

    /// ユーザー名とパスワードの両方が空でない場合のみ認証情報を返す。
    ///
    /// 未設定の環境変数から読み込まれた空文字列は未指定として扱う。
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username, password))
            }
            _ => None,
        }
    }

    /// `{scheme}://{host}:{port}` を返す。
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// パスプレフィックスと操作ごとのサフィックスを連結した URL を返す。
    pub fn request_url(&self, suffix: &str) -> String {
        format!("{}{}{}", self.origin(), self.base_path, suffix)
    }

    /// 設定値のバリデーション。
    pub fn validate(&self) -> Result<(), SchemaRegistryError> {
        if self.host.is_empty() {
            return Err(SchemaRegistryError::InvalidConfig(
                "host is required".into(),
            ));
        }
        if self.port == 0 {
            return Err(SchemaRegistryError::InvalidConfig(
                "port must be > 0".into(),
            ));
        }
        if !self.base_path.starts_with('/') || !self.base_path.ends_with('/') {
            return Err(SchemaRegistryError::InvalidConfig(format!(
                "base_path must start and end with '/': {:?}",
                self.base_path
            )));
        }
        if self.certificate_authority.is_some() && self.scheme == Scheme::Http {
            tracing::warn!(
                host = %self.host,
                "certificate_authority is ignored for plain http"
            );
        }
        Ok(())
    }
}
