use async_trait::async_trait;
#[cfg(feature = "mock")]
use mockall::automock;

use crate::{
    config::RegistryConfig,
    error::SchemaRegistryError,
    operations,
    schema::{LatestSchema, SchemaId},
};

/// Schema Registry クライアントのインターフェース。
///
/// スキーマの取得・登録・最新バージョン取得を提供する。
/// `mock` feature を有効にすると `MockSchemaRegistryClient` が生成される。
#[async_trait]
#[cfg_attr(feature = "mock", automock)]
pub trait SchemaRegistryClient: Send + Sync {
    /// グローバルスキーマ ID でスキーマを取得する。
    async fn get_schema_by_id(
        &self,
        schema_id: SchemaId,
    ) -> Result<serde_json::Value, SchemaRegistryError>;

    /// スキーマをサブジェクトに登録し、スキーマ ID を返す。
    async fn push_schema(
        &self,
        subject: &str,
        schema: &serde_json::Value,
    ) -> Result<SchemaId, SchemaRegistryError>;

    /// サブジェクトの最新バージョンのスキーマを取得する。
    async fn get_latest_version_for_subject(
        &self,
        subject: &str,
    ) -> Result<LatestSchema, SchemaRegistryError>;

    /// サブジェクトの指定バージョンのスキーマを取得する。
    async fn get_schema_version(
        &self,
        subject: &str,
        version: i32,
    ) -> Result<LatestSchema, SchemaRegistryError>;

    /// サブジェクトに登録されているすべてのバージョン番号を返す。
    async fn list_versions(&self, subject: &str) -> Result<Vec<i32>, SchemaRegistryError>;

    /// 登録されているすべてのサブジェクト名を返す。
    async fn list_subjects(&self) -> Result<Vec<String>, SchemaRegistryError>;
}

/// HTTP 経由で Schema Registry と通信する実装。
///
/// 保持するのは接続設定のみで、接続は操作ごとに確立する。
#[derive(Debug, Clone)]
pub struct HttpSchemaRegistryClient {
    config: RegistryConfig,
}

impl HttpSchemaRegistryClient {
    /// 設定を検証してクライアントを構築する。
    pub fn new(config: RegistryConfig) -> Result<Self, SchemaRegistryError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

#[async_trait]
impl SchemaRegistryClient for HttpSchemaRegistryClient {
    async fn get_schema_by_id(
        &self,
        schema_id: SchemaId,
    ) -> Result<serde_json::Value, SchemaRegistryError> {
        operations::get_schema_by_id(&self.config, schema_id).await
    }

    async fn push_schema(
        &self,
        subject: &str,
        schema: &serde_json::Value,
    ) -> Result<SchemaId, SchemaRegistryError> {
        operations::push_schema(&self.config, subject, schema).await
    }

    async fn get_latest_version_for_subject(
        &self,
        subject: &str,
    ) -> Result<LatestSchema, SchemaRegistryError> {
        operations::get_latest_version_for_subject(&self.config, subject).await
    }

    async fn get_schema_version(
        &self,
        subject: &str,
        version: i32,
    ) -> Result<LatestSchema, SchemaRegistryError> {
        operations::get_schema_version(&self.config, subject, version).await
    }

    async fn list_versions(&self, subject: &str) -> Result<Vec<i32>, SchemaRegistryError> {
        operations::list_versions(&self.config, subject).await
    }

    async fn list_subjects(&self) -> Result<Vec<String>, SchemaRegistryError> {
        operations::list_subjects(&self.config).await
    }
}
