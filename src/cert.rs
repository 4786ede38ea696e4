use p256::pkcs8::LineEnding;
use sha2::{Digest, Sha256};
use x509_parser::prelude::*;

fn key_algorithm_name(oid: &str) -> &'static str {
    match oid {
        "1.2.840.10045.2.1" => "EC",
        "1.2.840.113549.1.1.1" => "RSA",
        "1.3.101.112" => "Ed25519",
        "1.3.101.113" => "Ed448",
        _ => "unknown",
    }
}

/// Human-readable summary of a DER certificate. Never fails: a certificate
/// that cannot be parsed yields a diagnostic line instead.
pub fn describe(der: &[u8]) -> String {
    let cert = match X509Certificate::from_der(der) {
        Ok((_, cert)) => cert,
        Err(e) => {
            tracing::warn!(len = der.len(), error = %e, "Certificate could not be parsed");
            return format!("could not parse certificate: {e}");
        }
    };

    let spki = cert.public_key();
    let alg_oid = spki.algorithm.algorithm.to_id_string();
    let key_info = match spki.parsed() {
        Ok(x509_parser::public_key::PublicKey::RSA(rsa)) => format!("RSA {} bits", rsa.key_size()),
        Ok(x509_parser::public_key::PublicKey::EC(point)) => {
            let curve = spki
                .algorithm
                .parameters
                .as_ref()
                .and_then(|p| p.as_oid().ok())
                .map(|oid| oid.to_id_string())
                .unwrap_or_else(|| "unknown curve".into());
            format!("EC {} bits ({curve})", point.key_size())
        }
        _ => format!("{} ({alg_oid})", key_algorithm_name(&alg_oid)),
    };
    let fingerprint = hex::encode(Sha256::digest(der));

    let mut out = String::new();
    out.push_str(&format!("Version:     {}\n", cert.version().0 + 1));
    out.push_str(&format!("Serial:      {}\n", cert.raw_serial_as_string()));
    out.push_str(&format!("Subject:     {}\n", cert.subject()));
    out.push_str(&format!("Issuer:      {}\n", cert.issuer()));
    out.push_str(&format!("Not Before:  {}\n", cert.validity().not_before));
    out.push_str(&format!("Not After:   {}\n", cert.validity().not_after));
    out.push_str(&format!("Public Key:  {key_info}\n"));
    out.push_str(&format!("Signature:   {}\n", cert.signature_algorithm.algorithm.to_id_string()));
    out.push_str(&format!("SHA-256:     {fingerprint}\n"));
    out
}

/// Concatenated `CERTIFICATE` PEM blocks, in chain order.
pub fn chain_to_pem<'a, I>(chain: I) -> Result<String, pem_rfc7468::Error>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut out = String::new();
    for der in chain {
        out.push_str(&pem_rfc7468::encode_string("CERTIFICATE", LineEnding::LF, der)?);
    }
    Ok(out)
}
