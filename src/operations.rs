//! Schema Registry に対する個々の操作。
//!
//! 各関数は接続設定を引数に取り、1 回（最新バージョン取得のみ 2 回）の
//! リクエストで完結する。リトライや部分的な成功からの回復は行わない。

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    config::RegistryConfig,
    envelope::check_response,
    error::SchemaRegistryError,
    schema::{
        LatestSchema, PushSchemaRequest, PushSchemaResponse, SchemaByIdResponse, SchemaId,
        SchemaVersionResponse,
    },
    transport::{HttpTransport, RegistryRequest, RegistryResponse},
};

const EXPECTED_STATUS: u16 = 200;

/// エラーエンベロープを検査した後でペイロードを解析する。
fn parse_success<T: DeserializeOwned>(response: &RegistryResponse) -> Result<T, SchemaRegistryError> {
    check_response(EXPECTED_STATUS, response)?;
    Ok(serde_json::from_str(&response.body)?)
}

async fn send<T: DeserializeOwned>(
    transport: &HttpTransport<'_>,
    request: RegistryRequest,
) -> Result<T, SchemaRegistryError> {
    let response = transport.execute(&request).await?;
    parse_success(&response)
}

/// スキーマを文字列化し、`{"schema": "..."}` として再度シリアライズする。
fn encode_push_body(schema: &serde_json::Value) -> Result<String, SchemaRegistryError> {
    let schema = serde_json::to_string(schema).map_err(SchemaRegistryError::Encoding)?;
    serde_json::to_string(&PushSchemaRequest { schema }).map_err(SchemaRegistryError::Encoding)
}

/// グローバルスキーマ ID でスキーマを取得する。
///
/// レスポンスの `schema` フィールドをそのまま返す。
pub async fn get_schema_by_id(
    registry: &RegistryConfig,
    schema_id: SchemaId,
) -> Result<serde_json::Value, SchemaRegistryError> {
    debug!("Fetching schema by id={}", schema_id);

    let transport = HttpTransport::new(registry)?;
    let data: SchemaByIdResponse = send(
        &transport,
        RegistryRequest::get(format!("schemas/ids/{}", schema_id)),
    )
    .await?;

    Ok(data.schema)
}

/// スキーマをサブジェクトに登録し、スキーマ ID を返す。
///
/// スキーマは文字列にシリアライズされた上で `{"schema": "..."}` に埋め込まれる。
/// 同一スキーマが既に存在する場合、レジストリは既存の ID を返すことがある。
pub async fn push_schema(
    registry: &RegistryConfig,
    subject: &str,
    schema: &serde_json::Value,
) -> Result<SchemaId, SchemaRegistryError> {
    let body = encode_push_body(schema)?;

    debug!("Registering schema: subject={}", subject);

    let transport = HttpTransport::new(registry)?;
    let reg: PushSchemaResponse = send(
        &transport,
        RegistryRequest::post(format!("subjects/{}/versions", subject), body),
    )
    .await?;

    debug!("Schema registered: subject={}, id={}", subject, reg.id);
    Ok(reg.id)
}

/// サブジェクトに登録されているすべてのバージョン番号をレジストリの順序のまま返す。
pub async fn list_versions(
    registry: &RegistryConfig,
    subject: &str,
) -> Result<Vec<i32>, SchemaRegistryError> {
    let transport = HttpTransport::new(registry)?;
    fetch_versions(&transport, subject).await
}

/// サブジェクトの指定バージョンのスキーマを取得する。
pub async fn get_schema_version(
    registry: &RegistryConfig,
    subject: &str,
    version: i32,
) -> Result<LatestSchema, SchemaRegistryError> {
    let transport = HttpTransport::new(registry)?;
    fetch_version(&transport, subject, version).await
}

/// サブジェクトの最新バージョンのスキーマを取得する。
///
/// バージョン一覧の末尾を最新とみなし、その一覧を完全に受信してから
/// 2 回目のリクエストを送信する。一覧が空の場合は 2 回目のリクエストを送らない。
pub async fn get_latest_version_for_subject(
    registry: &RegistryConfig,
    subject: &str,
) -> Result<LatestSchema, SchemaRegistryError> {
    let transport = HttpTransport::new(registry)?;

    let versions = fetch_versions(&transport, subject).await?;
    let version = *versions
        .last()
        .ok_or_else(|| SchemaRegistryError::NoVersions {
            subject: subject.to_string(),
        })?;

    debug!(
        "Selected latest version: subject={}, version={}",
        subject, version
    );

    fetch_version(&transport, subject, version).await
}

/// 登録されているすべてのサブジェクト名を返す。
pub async fn list_subjects(registry: &RegistryConfig) -> Result<Vec<String>, SchemaRegistryError> {
    debug!("Listing all subjects");

    let transport = HttpTransport::new(registry)?;
    let subjects: Vec<String> = send(&transport, RegistryRequest::get("subjects")).await?;

    debug!("Found {} subjects", subjects.len());
    Ok(subjects)
}

async fn fetch_versions(
    transport: &HttpTransport<'_>,
    subject: &str,
) -> Result<Vec<i32>, SchemaRegistryError> {
    debug!("Listing versions: subject={}", subject);

    let versions: Vec<i32> = send(
        transport,
        RegistryRequest::get(format!("subjects/{}/versions", subject)),
    )
    .await?;

    debug!("Subject {} has {} versions", subject, versions.len());
    Ok(versions)
}

async fn fetch_version(
    transport: &HttpTransport<'_>,
    subject: &str,
    version: i32,
) -> Result<LatestSchema, SchemaRegistryError> {
    debug!("Fetching schema: subject={}, version={}", subject, version);

    let data: SchemaVersionResponse = send(
        transport,
        RegistryRequest::get(format!("subjects/{}/versions/{}", subject, version)),
    )
    .await?;

    Ok(LatestSchema {
        schema: data.schema,
        id: data.id,
        version,
    })
}
