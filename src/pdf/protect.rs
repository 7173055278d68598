use anyhow::{anyhow, bail, Context, Result};
use lopdf::encryption::crypt_filters::{Aes256CryptFilter, CryptFilter};
use lopdf::{Document, EncryptionState, EncryptionVersion, Object, Permissions, StringFormat};
use rand::Rng;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const CRYPT_FILTER: &[u8] = b"StdCF";

/// Passwords and reader permissions for an AES-256 protected copy.
#[derive(Debug, Clone)]
pub struct ProtectOptions {
    /// Needed to open the document; empty means anyone can open it.
    pub user_password: String,
    /// Lifts the permission restrictions; falls back to the user password.
    pub owner_password: String,
    pub allow_print: bool,
    pub allow_copy: bool,
    pub allow_modify: bool,
    pub allow_annotate: bool,
}

impl Default for ProtectOptions {
    fn default() -> Self {
        Self {
            user_password: String::new(),
            owner_password: String::new(),
            allow_print: true,
            allow_copy: true,
            allow_modify: true,
            allow_annotate: true,
        }
    }
}

impl ProtectOptions {
    pub fn validate(&self) -> Result<()> {
        if self.user_password.is_empty() && self.owner_password.is_empty() {
            bail!("Enter a user or owner password");
        }
        Ok(())
    }

    fn owner_password(&self) -> &str {
        if self.owner_password.is_empty() {
            &self.user_password
        } else {
            &self.owner_password
        }
    }

    pub fn permissions(&self) -> Permissions {
        // Accessibility extraction stays on regardless of the copy flag.
        let mut permissions = Permissions::COPYABLE_FOR_ACCESSIBILITY;
        if self.allow_print {
            permissions |= Permissions::PRINTABLE | Permissions::PRINTABLE_IN_HIGH_QUALITY;
        }
        if self.allow_copy {
            permissions |= Permissions::COPYABLE;
        }
        if self.allow_modify {
            permissions |= Permissions::MODIFIABLE | Permissions::ASSEMBLABLE;
        }
        if self.allow_annotate {
            permissions |= Permissions::ANNOTABLE | Permissions::FILLABLE;
        }
        permissions
    }
}

/// Encrypt every string and stream of `doc` in place with AES-256.
pub fn protect_document(doc: &mut Document, options: &ProtectOptions) -> Result<()> {
    options.validate()?;
    if doc.is_encrypted() {
        bail!("Document is already encrypted");
    }

    ensure_file_id(doc);

    let mut file_key = [0u8; 32];
    rand::rng().fill(&mut file_key);
    let filter: Arc<dyn CryptFilter> = Arc::new(Aes256CryptFilter);

    let version = EncryptionVersion::V5 {
        encrypt_metadata: true,
        crypt_filters: BTreeMap::from([(CRYPT_FILTER.to_vec(), filter)]),
        file_encryption_key: &file_key,
        stream_filter: CRYPT_FILTER.to_vec(),
        string_filter: CRYPT_FILTER.to_vec(),
        owner_password: options.owner_password(),
        user_password: &options.user_password,
        permissions: options.permissions(),
    };
    let state = EncryptionState::try_from(version)
        .map_err(|e| anyhow!("Cannot use these passwords: {}", e))?;
    doc.encrypt(&state)
        .map_err(|e| anyhow!("Failed to encrypt document: {}", e))?;

    debug!(
        user_password = !options.user_password.is_empty(),
        permissions = options.permissions().bits(),
        "encrypted document"
    );
    Ok(())
}

/// Compress, encrypt and write `doc` to `path`.
///
/// Streams are compressed before encryption; compressing afterwards would
/// filter ciphertext.
pub fn save_protected<P: AsRef<Path>>(
    doc: &mut Document,
    options: &ProtectOptions,
    path: P,
) -> Result<()> {
    doc.prune_objects();
    doc.compress();
    protect_document(doc, options)?;
    doc.save(&path)
        .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
    debug!(path = %path.as_ref().display(), "saved protected document");
    Ok(())
}

// The trailer /ID keys some handlers; documents built from scratch lack one.
fn ensure_file_id(doc: &mut Document) {
    if doc.trailer.has(b"ID") {
        return;
    }
    let mut id = [0u8; 16];
    rand::rng().fill(&mut id);
    let entry = Object::String(id.to_vec(), StringFormat::Hexadecimal);
    doc.trailer.set("ID", Object::Array(vec![entry.clone(), entry]));
}
