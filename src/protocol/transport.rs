use std::fs::File;
use std::io::{self, BufReader};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::sync::Arc;

use rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use rustls::{ClientConnection, DigitallySignedStruct, SignatureScheme, StreamOwned};
use tracing::debug;

use crate::core::{ClientConfig, Error, Result, TlsOptions};
use crate::protocol::framing;

/// Blocking frame-oriented connection to an EPP server
///
/// The trait is the seam between the session client and the network: production
/// code uses [`TlsTransport`], tests substitute a scripted implementation.
pub trait Transport {
    /// Opens the connection
    fn connect(&mut self) -> Result<()>;

    /// Reads exactly one frame, blocking until it arrives or the timeout expires
    fn read_frame(&mut self) -> Result<Vec<u8>>;

    /// Writes exactly one frame
    fn write_frame(&mut self, payload: &[u8]) -> Result<()>;

    /// Releases the connection; must be safe to call in any state, repeatedly
    fn close(&mut self);
}

/// Mutually-authenticated TLS transport over a blocking TCP socket
pub struct TlsTransport {
    config: ClientConfig,
    stream: Option<StreamOwned<ClientConnection, TcpStream>>,
}

impl TlsTransport {
    /// Creates a transport; no connection is made until [`Transport::connect`]
    pub fn new(config: ClientConfig) -> Self {
        TlsTransport {
            config,
            stream: None,
        }
    }

    fn stream_mut(&mut self) -> Result<&mut StreamOwned<ClientConnection, TcpStream>> {
        self.stream
            .as_mut()
            .ok_or_else(|| Error::transport("transport is not connected"))
    }
}

impl Transport for TlsTransport {
    fn connect(&mut self) -> Result<()> {
        self.close();

        // Fail on bad TLS material before a socket is ever opened.
        let tls_config = Arc::new(build_tls_config(&self.config.tls)?);

        let addr = (self.config.host.as_str(), self.config.port)
            .to_socket_addrs()
            .map_err(|e| Error::connection(format!("cannot resolve {}: {}", self.config.host, e)))?
            .next()
            .ok_or_else(|| {
                Error::connection(format!("{} resolved to no address", self.config.host))
            })?;

        let tcp = TcpStream::connect_timeout(&addr, self.config.timeout)
            .map_err(|e| Error::connection(format!("cannot connect to {}: {}", addr, e)))?;
        tcp.set_read_timeout(Some(self.config.timeout))
            .map_err(|e| Error::connection(format!("cannot set read timeout: {}", e)))?;
        tcp.set_write_timeout(Some(self.config.timeout))
            .map_err(|e| Error::connection(format!("cannot set write timeout: {}", e)))?;
        tcp.set_nodelay(true)
            .map_err(|e| Error::connection(format!("cannot disable Nagle: {}", e)))?;

        let server_name = ServerName::try_from(self.config.host.clone())
            .map_err(|e| Error::connection(format!("invalid server name: {}", e)))?;
        let mut connection = ClientConnection::new(tls_config, server_name)
            .map_err(|e| Error::connection(format!("TLS setup failed: {}", e)))?;

        // Drive the handshake now so certificate problems surface as connection
        // errors instead of failing the first frame exchange.
        while connection.is_handshaking() {
            connection
                .complete_io(&mut (&tcp))
                .map_err(|e| Error::connection(format!("TLS handshake failed: {}", e)))?;
        }

        debug!(host = %self.config.host, port = self.config.port, "transport connected");
        self.stream = Some(StreamOwned::new(connection, tcp));
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Vec<u8>> {
        let stream = self.stream_mut()?;
        framing::read_frame(stream)
    }

    fn write_frame(&mut self, payload: &[u8]) -> Result<()> {
        let stream = self.stream_mut()?;
        framing::write_frame(stream, payload)
    }

    fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.conn.send_close_notify();
            let _ = stream.conn.write_tls(&mut stream.sock);
            let _ = stream.sock.shutdown(Shutdown::Both);
            debug!("transport closed");
        }
    }
}

impl Drop for TlsTransport {
    fn drop(&mut self) {
        self.close();
    }
}

fn build_tls_config(options: &TlsOptions) -> Result<rustls::ClientConfig> {
    let certs = load_certs(&options.cert_file)?;
    let key = load_key(&options.key_file)?;

    let builder = rustls::ClientConfig::builder();
    let config = if options.verify_server {
        let mut roots = rustls::RootCertStore::empty();
        match &options.ca_file {
            Some(path) => {
                for cert in load_certs(path)? {
                    roots
                        .add(cert)
                        .map_err(|e| Error::config(format!("bad CA certificate: {}", e)))?;
                }
            }
            None => roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned()),
        }
        builder
            .with_root_certificates(roots)
            .with_client_auth_cert(certs, key)
    } else {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(InsecureVerifier))
            .with_client_auth_cert(certs, key)
    };

    config.map_err(|e| Error::config(format!("bad client certificate or key: {}", e)))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path)
        .map_err(|e| Error::config(format!("cannot open {}: {}", path.display(), e)))?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<io::Result<Vec<_>>>()
        .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
    if certs.is_empty() {
        return Err(Error::config(format!(
            "no certificates found in {}",
            path.display()
        )));
    }
    Ok(certs)
}

fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let file = File::open(path)
        .map_err(|e| Error::config(format!("cannot open {}: {}", path.display(), e)))?;
    rustls_pemfile::private_key(&mut BufReader::new(file))
        .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?
        .ok_or_else(|| Error::config(format!("no private key found in {}", path.display())))
}

/// Verifier used when server verification is disabled in [`TlsOptions`]
#[derive(Debug)]
struct InsecureVerifier;

impl ServerCertVerifier for InsecureVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ED25519,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconnected() -> TlsTransport {
        let tls = TlsOptions::new("/nonexistent/cert.pem", "/nonexistent/key.pem");
        TlsTransport::new(ClientConfig::new("127.0.0.1", tls))
    }

    #[test]
    fn test_frames_require_connection() {
        let mut transport = unconnected();

        assert!(matches!(
            transport.read_frame(),
            Err(Error::Transport(_))
        ));
        assert!(matches!(
            transport.write_frame(b"<epp/>"),
            Err(Error::Transport(_))
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut transport = unconnected();
        transport.close();
        transport.close();
    }

    #[test]
    fn test_connect_fails_on_missing_certificate() {
        let mut transport = unconnected();

        // TLS material is validated before any socket is opened.
        assert!(matches!(transport.connect(), Err(Error::Config(_))));
    }
}
