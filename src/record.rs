//! Record-layer cipher slots.
//!
//! The handshake engine installs read/write ciphers here; fragmentation
//! and actual record encryption belong to the surrounding record layer.
//! Each installation supersedes the previous cipher and bumps the
//! direction's epoch.

use crate::crypto::{ReadCipher, WriteCipher};

#[derive(Debug, Default)]
pub struct RecordLayer {
    read_cipher: Option<ReadCipher>,
    write_cipher: Option<WriteCipher>,
    read_epoch: u64,
    write_epoch: u64,
}

impl RecordLayer {
    pub fn new() -> Self {
        RecordLayer::default()
    }

    /// Install a new read cipher for subsequent incoming records.
    pub fn change_read_ciphers(&mut self, cipher: ReadCipher) {
        self.read_cipher = Some(cipher);
        self.read_epoch += 1;
    }

    /// Install a new write cipher for subsequent outgoing records.
    pub fn change_write_ciphers(&mut self, cipher: WriteCipher) {
        self.write_cipher = Some(cipher);
        self.write_epoch += 1;
    }

    pub fn read_cipher(&self) -> Option<&ReadCipher> {
        self.read_cipher.as_ref()
    }

    pub fn write_cipher(&self) -> Option<&WriteCipher> {
        self.write_cipher.as_ref()
    }

    /// Number of read cipher installations so far.
    pub fn read_epoch(&self) -> u64 {
        self.read_epoch
    }

    /// Number of write cipher installations so far.
    pub fn write_epoch(&self) -> u64 {
        self.write_epoch
    }
}
