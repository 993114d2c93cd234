use serde::{Deserialize, Serialize};

/// Schema Registry が割り当てたグローバルスキーマ ID。
///
/// ローカルで生成されることはない。レジストリから受信した 0 はデコード時に拒否する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SchemaId(pub u32);

impl SchemaId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for SchemaId {
    type Error = String;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        if id == 0 {
            return Err("schema id must be a positive integer".to_string());
        }
        Ok(Self(id))
    }
}

impl From<SchemaId> for u32 {
    fn from(id: SchemaId) -> Self {
        id.0
    }
}

/// サブジェクトの特定バージョンとして登録されたスキーマ。
///
/// `schema` はレジストリが返した形のまま保持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestSchema {
    /// スキーマ定義（通常は JSON 文字列）。
    pub schema: serde_json::Value,
    /// グローバルスキーマ ID。
    pub id: SchemaId,
    /// 取得したバージョン番号。
    pub version: i32,
}

/// `POST /subjects/{subject}/versions` のリクエストペイロード。
///
/// `schema` にはシリアライズ済みのスキーマ文字列を格納するため、
/// ワイヤー上では JSON 文字列が JSON オブジェクトに埋め込まれる。
#[derive(Debug, Serialize)]
pub(crate) struct PushSchemaRequest {
    pub schema: String,
}

/// スキーマ登録レスポンス。
#[derive(Debug, Deserialize)]
pub(crate) struct PushSchemaResponse {
    pub id: SchemaId,
}

/// `GET /schemas/ids/{id}` のレスポンス。
#[derive(Debug, Deserialize)]
pub(crate) struct SchemaByIdResponse {
    pub schema: serde_json::Value,
}

/// `GET /subjects/{subject}/versions/{version}` のレスポンス。
#[derive(Debug, Deserialize)]
pub(crate) struct SchemaVersionResponse {
    pub schema: serde_json::Value,
    pub id: SchemaId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_id_is_transparent() {
        let id: SchemaId = serde_json::from_str("42").unwrap();
        assert_eq!(id, SchemaId(42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_schema_id_rejects_negative() {
        assert!(serde_json::from_str::<SchemaId>("-1").is_err());
    }

    #[test]
    fn test_schema_id_rejects_zero() {
        let err = serde_json::from_str::<SchemaId>("0").unwrap_err();
        assert!(err.to_string().contains("positive"));
        assert!(SchemaId::try_from(0).is_err());
        assert_eq!(SchemaId::try_from(7), Ok(SchemaId(7)));
    }

    #[test]
    fn test_push_request_double_encoding() {
        let schema = serde_json::json!({"type": "record", "name": "Order", "fields": []});
        let req = PushSchemaRequest {
            schema: serde_json::to_string(&schema).unwrap(),
        };
        let wire = serde_json::to_string(&req).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&wire).unwrap();
        let inner = parsed["schema"].as_str().unwrap();
        let back: serde_json::Value = serde_json::from_str(inner).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn test_schema_by_id_keeps_string_schema() {
        let resp: SchemaByIdResponse =
            serde_json::from_str(r#"{"schema":"{\"type\":\"string\"}"}"#).unwrap();
        assert_eq!(
            resp.schema,
            serde_json::Value::String(r#"{"type":"string"}"#.to_string())
        );
    }

    #[test]
    fn test_schema_version_response_ignores_extra_fields() {
        let json = r#"{"subject":"orders-value","version":5,"id":12,"schema":"\"string\"","schemaType":"AVRO"}"#;
        let resp: SchemaVersionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id, SchemaId(12));
        assert_eq!(resp.schema, serde_json::json!("\"string\""));
    }
}
