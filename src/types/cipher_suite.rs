use nom::number::complete::be_u16;
use nom::IResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum CipherSuite {
    ECDHE_ECDSA_AES128_GCM_SHA256,
    ECDHE_RSA_AES128_GCM_SHA256,
    ECDHE_RSA_AES256_GCM_SHA384,
    RSA_AES128_CBC_SHA256,
    RSA_AES256_CBC_SHA256,
    Unknown(u16),
}

impl Default for CipherSuite {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl CipherSuite {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0xC02B => CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256,
            0xC02F => CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
            0xC030 => CipherSuite::ECDHE_RSA_AES256_GCM_SHA384,
            0x003C => CipherSuite::RSA_AES128_CBC_SHA256,
            0x003D => CipherSuite::RSA_AES256_CBC_SHA256,
            _ => CipherSuite::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256 => 0xC02B,
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256 => 0xC02F,
            CipherSuite::ECDHE_RSA_AES256_GCM_SHA384 => 0xC030,
            CipherSuite::RSA_AES128_CBC_SHA256 => 0x003C,
            CipherSuite::RSA_AES256_CBC_SHA256 => 0x003D,
            CipherSuite::Unknown(value) => *value,
        }
    }

    /// All supported suites ordered by preference.
    pub fn all() -> &'static [CipherSuite] {
        &[
            CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256,
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
            CipherSuite::ECDHE_RSA_AES256_GCM_SHA384,
            CipherSuite::RSA_AES128_CBC_SHA256,
            CipherSuite::RSA_AES256_CBC_SHA256,
        ]
    }

    pub fn bulk_cipher(&self) -> BulkCipher {
        match self {
            CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256 => BulkCipher::Aes128Gcm,
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256 => BulkCipher::Aes128Gcm,
            CipherSuite::ECDHE_RSA_AES256_GCM_SHA384 => BulkCipher::Aes256Gcm,
            CipherSuite::RSA_AES128_CBC_SHA256 => BulkCipher::Aes128Cbc,
            CipherSuite::RSA_AES256_CBC_SHA256 => BulkCipher::Aes256Cbc,
            CipherSuite::Unknown(_) => BulkCipher::Null,
        }
    }

    /// MAC algorithm used for record integrity. AEAD suites carry no
    /// separate MAC.
    pub fn mac_algorithm(&self) -> MacAlgorithm {
        match self.bulk_cipher() {
            BulkCipher::Aes128Cbc | BulkCipher::Aes256Cbc => MacAlgorithm::HmacSha256,
            _ => MacAlgorithm::Null,
        }
    }

    /// (mac_key_len, enc_key_len, iv_len) for the legacy key block split.
    pub fn key_lengths(&self) -> (usize, usize, usize) {
        let mac = self.mac_algorithm().key_len();
        let bulk = self.bulk_cipher();
        (mac, bulk.key_len(), bulk.fixed_iv_len())
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], CipherSuite> {
        let (input, value) = be_u16(input)?;
        Ok((input, CipherSuite::from_u16(value)))
    }

    pub fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.as_u16().to_be_bytes());
    }
}

/// Bulk cipher of a negotiated suite. The factory methods that turn one of
/// these into a live read/write cipher live in `crypto::cipher`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkCipher {
    Null,
    Aes128Gcm,
    Aes256Gcm,
    Aes128Cbc,
    Aes256Cbc,
}

impl BulkCipher {
    pub fn is_aead(&self) -> bool {
        matches!(self, BulkCipher::Aes128Gcm | BulkCipher::Aes256Gcm)
    }

    pub fn key_len(&self) -> usize {
        match self {
            BulkCipher::Null => 0,
            BulkCipher::Aes128Gcm | BulkCipher::Aes128Cbc => 16,
            BulkCipher::Aes256Gcm | BulkCipher::Aes256Cbc => 32,
        }
    }

    /// Length of the IV taken from the key block. GCM suites use a 4-byte
    /// fixed salt (RFC 5288), CBC suites a full block.
    pub fn fixed_iv_len(&self) -> usize {
        match self {
            BulkCipher::Null => 0,
            BulkCipher::Aes128Gcm | BulkCipher::Aes256Gcm => 4,
            BulkCipher::Aes128Cbc | BulkCipher::Aes256Cbc => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacAlgorithm {
    /// AEAD suites: integrity comes from the cipher itself.
    Null,
    HmacSha256,
}

impl MacAlgorithm {
    pub fn key_len(&self) -> usize {
        match self {
            MacAlgorithm::Null => 0,
            MacAlgorithm::HmacSha256 => 32,
        }
    }
}
