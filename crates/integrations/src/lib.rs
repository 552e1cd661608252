//! Clients for the services around the backend: media storage for
//! receipts, receipt OCR, the team chat webhook, outgoing mail and
//! callbacks to origin systems.
//!
//! Every client is optional except [`OriginClient`], which needs no
//! credentials. The application wires up whatever its settings
//! provide; handlers answer with a clear error when a client is
//! missing.

pub use chat::ChatClient;
pub use error::IntegrationError;
pub use mail::Mailer;
pub use ocr::OcrClient;
pub use origin::OriginClient;
pub use storage::{StorageClient, StoredFile};

mod chat;
mod error;
mod mail;
mod ocr;
mod origin;
mod storage;

/// The bundle of clients handed to the HTTP layer.
#[derive(Clone)]
pub struct Integrations {
    pub storage: Option<StorageClient>,
    pub ocr: Option<OcrClient>,
    pub chat: Option<ChatClient>,
    pub mail: Option<Mailer>,
    pub origin: OriginClient,
}

impl Integrations {
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: None,
            ocr: None,
            chat: None,
            mail: None,
            origin: OriginClient::new(),
        }
    }
}

impl Default for Integrations {
    fn default() -> Self {
        Self::new()
    }
}
