use std::sync::Arc;

use k1s0_schemaregistry_client::{get_schema_by_id, RegistryConfig, SchemaId, Scheme};
use rcgen::{BasicConstraints, Certificate, CertificateParams, DnType, IsCa, KeyPair};
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

const BODY: &str = r#"{"schema":"\"string\""}"#;

/// テスト用の CA とその CA で署名したサーバー証明書。
struct TestPki {
    ca_pem: String,
    server_acceptor: TlsAcceptor,
}

fn generate_ca(common_name: &str) -> (Certificate, KeyPair) {
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params
        .distinguished_name
        .push(DnType::CommonName, common_name);
    let key = KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();
    (cert, key)
}

fn generate_pki() -> TestPki {
    let (ca_cert, ca_key) = generate_ca("k1s0 test ca");

    let leaf_params =
        CertificateParams::new(vec!["localhost".to_string(), "127.0.0.1".to_string()]).unwrap();
    let leaf_key = KeyPair::generate().unwrap();
    let leaf_cert = leaf_params.signed_by(&leaf_key, &ca_cert, &ca_key).unwrap();

    let server_config = rustls::ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_no_client_auth()
    .with_single_cert(
        vec![leaf_cert.der().clone()],
        PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
    )
    .unwrap();

    TestPki {
        ca_pem: ca_cert.pem(),
        server_acceptor: TlsAcceptor::from(Arc::new(server_config)),
    }
}

/// 任意のリクエストに `BODY` を返す HTTPS サーバーを起動し、ポート番号を返す。
async fn start_tls_server(acceptor: TlsAcceptor) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                // 検証に失敗したクライアントはハンドシェイク中に切断する。
                let Ok(mut tls) = acceptor.accept(stream).await else {
                    return;
                };
                let mut received = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let n = match tls.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => n,
                    };
                    received.extend_from_slice(&buf[..n]);
                    if received.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    BODY.len(),
                    BODY
                );
                let _ = tls.write_all(response.as_bytes()).await;
                let _ = tls.shutdown().await;
            });
        }
    });

    port
}

#[tokio::test]
async fn test_https_rejects_untrusted_certificate_by_default() {
    let pki = generate_pki();
    let port = start_tls_server(pki.server_acceptor).await;

    let config = RegistryConfig::new(Scheme::Https, "127.0.0.1", port);
    let err = get_schema_by_id(&config, SchemaId(1)).await.unwrap_err();
    assert!(err.is_transport_error());
    assert!(!err.is_registry_error());
}

#[tokio::test]
async fn test_https_trusts_configured_certificate_authority() {
    let pki = generate_pki();
    let port = start_tls_server(pki.server_acceptor).await;

    let config =
        RegistryConfig::new(Scheme::Https, "127.0.0.1", port).with_certificate_authority(pki.ca_pem);
    let schema = get_schema_by_id(&config, SchemaId(1)).await.unwrap();
    assert_eq!(schema, serde_json::json!("\"string\""));
}

#[tokio::test]
async fn test_https_rejects_certificate_from_other_authority() {
    let pki = generate_pki();
    let port = start_tls_server(pki.server_acceptor).await;
    let (other_ca, _) = generate_ca("unrelated ca");

    let config = RegistryConfig::new(Scheme::Https, "127.0.0.1", port)
        .with_certificate_authority(other_ca.pem());
    let err = get_schema_by_id(&config, SchemaId(1)).await.unwrap_err();
    assert!(err.is_transport_error());
}

#[tokio::test]
async fn test_https_accept_invalid_certs_opt_in() {
    let pki = generate_pki();
    let port = start_tls_server(pki.server_acceptor).await;

    let config = RegistryConfig::new(Scheme::Https, "127.0.0.1", port).danger_accept_invalid_certs();
    let schema = get_schema_by_id(&config, SchemaId(1)).await.unwrap();
    assert_eq!(schema, serde_json::json!("\"string\""));
}
