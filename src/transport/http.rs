//! Blocking HTTP/HTTPS transport built on `ureq`.

use std::fs;
use std::io;
use std::path::Path;

use ureq::Agent;
use ureq::tls::{Certificate, ClientCert, PemItem, PrivateKey, TlsConfig};

use super::{FailureKind, HttpRequest, HttpResponse, Transport, TransportFailure};
use crate::config::{ClientCertificate, ClientConfig};

/// Sends requests with a fresh `ureq` agent per call.
///
/// Nothing is pooled: every request opens and drops its own connection.
/// The agent never follows redirects and never turns HTTP statuses into
/// errors; status handling belongs to the client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a transport for the given connection parameters.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn agent(&self) -> Result<Agent, TransportFailure> {
        let timeout = Some(self.config.timeout);

        let mut builder = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_connect(timeout)
            .timeout_recv_response(timeout)
            .timeout_recv_body(timeout)
            .tls_config(self.tls_config()?);

        if let Some(proxy) = &self.config.proxy {
            let proxy = ureq::Proxy::new(proxy).map_err(|e| {
                TransportFailure::new(FailureKind::Setup, format!("invalid proxy '{}': {}", proxy, e))
            })?;
            builder = builder.proxy(Some(proxy));
        }

        log::trace!(
            "Agent: timeout={:?} insecure={} proxy={}",
            self.config.timeout,
            self.config.insecure,
            self.config.proxy.is_some()
        );

        Ok(Agent::new_with_config(builder.build()))
    }

    fn tls_config(&self) -> Result<TlsConfig, TransportFailure> {
        let mut tls = TlsConfig::builder().disable_verification(self.config.insecure);

        if let Some(cert) = &self.config.client_cert {
            tls = tls.client_cert(Some(load_client_cert(cert)?));
        }

        Ok(tls.build())
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let agent = self.agent()?;

        let response = agent
            .post(&request.url)
            .header("Content-Type", &request.content_type)
            .header("User-Agent", &self.config.user_agent)
            .send(&request.body[..])
            .map_err(|e| classify(&request.url, e))?;

        let status = response.status().as_u16();
        log::trace!("{} answered {}", request.url, status);

        Ok(HttpResponse::new(status, response.into_body().into_reader()))
    }
}

fn classify(url: &str, error: ureq::Error) -> TransportFailure {
    let kind = match &error {
        ureq::Error::HostNotFound => FailureKind::Dns,
        ureq::Error::ConnectionFailed => FailureKind::Connect,
        ureq::Error::Timeout(_) => FailureKind::Timeout,
        ureq::Error::Tls(_) => FailureKind::Tls,
        ureq::Error::Io(e) => match e.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::AddrNotAvailable
            | io::ErrorKind::HostUnreachable
            | io::ErrorKind::NetworkUnreachable => FailureKind::Connect,
            io::ErrorKind::TimedOut => FailureKind::Timeout,
            _ => FailureKind::Io,
        },
        ureq::Error::BadUri(_) | ureq::Error::InvalidProxyUrl => FailureKind::Setup,
        _ => FailureKind::Io,
    };

    log::error!("❌ Request to {} failed ({:?}): {}", url, kind, error);
    TransportFailure::new(kind, format!("{}: {}", url, error))
}

fn load_client_cert(paths: &ClientCertificate) -> Result<ClientCert, TransportFailure> {
    let cert_pem = read_pem(&paths.cert_path)?;
    let key_pem = read_pem(&paths.key_path)?;

    let mut certs: Vec<Certificate<'static>> = Vec::new();
    for item in ureq::tls::parse_pem(&cert_pem) {
        if let PemItem::Certificate(cert) = item.map_err(|e| pem_error(&paths.cert_path, e))? {
            certs.push(cert.to_owned());
        }
    }
    if certs.is_empty() {
        return Err(TransportFailure::new(
            FailureKind::Setup,
            format!("no certificate found in {}", paths.cert_path.display()),
        ));
    }

    let mut key: Option<PrivateKey<'static>> = None;
    for item in ureq::tls::parse_pem(&key_pem) {
        if let PemItem::PrivateKey(k) = item.map_err(|e| pem_error(&paths.key_path, e))? {
            key = Some(k.to_owned());
            break;
        }
    }
    let key = key.ok_or_else(|| {
        TransportFailure::new(
            FailureKind::Setup,
            format!("no private key found in {}", paths.key_path.display()),
        )
    })?;

    log::debug!("Loaded client certificate chain of {} certificate(s)", certs.len());
    Ok(ClientCert::new_with_certs(&certs, key))
}

fn read_pem(path: &Path) -> Result<Vec<u8>, TransportFailure> {
    fs::read(path).map_err(|e| {
        TransportFailure::new(
            FailureKind::Setup,
            format!("cannot read {}: {}", path.display(), e),
        )
    })
}

fn pem_error(path: &Path, error: ureq::Error) -> TransportFailure {
    TransportFailure::new(
        FailureKind::Setup,
        format!("invalid PEM in {}: {}", path.display(), error),
    )
}
