//! k1s0-schemaregistry-client: Schema Registry HTTP クライアントライブラリ。
//!
//! スキーマ ID によるスキーマ取得、サブジェクトへのスキーマ登録、
//! サブジェクトの最新バージョン取得を提供する。
//! スキーマの内容は解釈せず、JSON 値としてそのまま受け渡す。
//!
//! # 使用例
//!
//! ```rust,no_run
//! use k1s0_schemaregistry_client::{
//!     HttpSchemaRegistryClient, RegistryConfig, SchemaRegistryClient, Scheme,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RegistryConfig::new(Scheme::Http, "schema-registry", 8081);
//!     let client = HttpSchemaRegistryClient::new(config)?;
//!
//!     let schema = serde_json::json!({"type": "record", "name": "UserCreated", "fields": []});
//!     let schema_id = client
//!         .push_schema("k1s0.system.auth.user-created.v1-value", &schema)
//!         .await?;
//!
//!     println!("Registered schema id={}", schema_id);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
mod envelope;
pub mod error;
pub mod operations;
pub mod schema;
pub mod transport;

pub use client::{HttpSchemaRegistryClient, SchemaRegistryClient};
pub use config::{RegistryConfig, Scheme};
pub use error::SchemaRegistryError;
pub use operations::{get_latest_version_for_subject, get_schema_by_id, push_schema};
pub use schema::{LatestSchema, SchemaId};
pub use transport::SCHEMA_REGISTRY_CONTENT_TYPE;

#[cfg(feature = "mock")]
pub use client::MockSchemaRegistryClient;
