//! Tipos do buffer durável: transmissão e registro em disco.
//!
//! Uma [`Transmission`] é o payload de saída em memória; um
//! [`TransmissionRecord`] é a transmissão decodificada de (ou destinada a)
//! um arquivo de backup, com a identidade do arquivo anexada.

use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

// ──────────────────────────────────────────────
// Transmission
// ──────────────────────────────────────────────

/// Payload de rede pendente de envio.
#[derive(Debug, Clone, PartialEq)]
pub struct Transmission {
    /// Endpoint de destino (URI absoluta)
    pub address: Url,
    /// Corpo bruto do payload (nunca vazio)
    pub content: Vec<u8>,
    /// Tipo do conteúdo (ex: "application/json"); sem `:` nem quebra de linha
    pub content_type: String,
    /// Codificação do conteúdo (ex: "gzip"); pode ser vazia, sem `:` nem quebra de linha
    pub content_encoding: String,
}

impl Transmission {
    pub fn new(
        address: Url,
        content: Vec<u8>,
        content_type: impl Into<String>,
        content_encoding: impl Into<String>,
    ) -> Self {
        Self {
            address,
            content,
            content_type: content_type.into(),
            content_encoding: content_encoding.into(),
        }
    }
}

// ──────────────────────────────────────────────
// TransmissionRecord
// ──────────────────────────────────────────────

/// Observador de descarte: invocado uma única vez quando o registro é liberado.
pub type ReleaseObserver = Box<dyn FnOnce(&TransmissionRecord)>;

/// Transmissão ancorada a um arquivo de backup.
///
/// O registro é dono dos bytes decodificados; o arquivo em si pertence ao
/// gerenciador de fila externo, que é avisado via [`set_on_release`] quando
/// o registro deixa de ser necessário (para apagar o arquivo, por exemplo).
///
/// [`set_on_release`]: TransmissionRecord::set_on_release
pub struct TransmissionRecord {
    /// Transmissão decodificada, sempre completa (não existe registro parcial)
    pub transmission: Transmission,
    /// Nome-base do arquivo de backup (derivado do caminho, nunca do conteúdo)
    pub file_name: String,
    /// Caminho completo do arquivo, guardado para remoção posterior pelo dono
    pub full_path: PathBuf,
    on_release: Option<ReleaseObserver>,
}

impl TransmissionRecord {
    /// Cria um registro; o caminho completo inicia igual ao nome do arquivo
    /// até o chamador anexar o caminho real via [`set_full_path`].
    ///
    /// [`set_full_path`]: TransmissionRecord::set_full_path
    pub fn new(transmission: Transmission, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let full_path = PathBuf::from(&file_name);
        Self {
            transmission,
            file_name,
            full_path,
            on_release: None,
        }
    }

    /// Anexa o caminho completo do arquivo de backup.
    pub fn set_full_path(&mut self, path: impl Into<PathBuf>) {
        self.full_path = path.into();
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Registra o observador de descarte (slot único: substitui o anterior).
    pub fn set_on_release(&mut self, observer: impl FnOnce(&TransmissionRecord) + 'static) {
        self.on_release = Some(Box::new(observer));
    }

    /// Libera o registro, notificando o observador de forma síncrona.
    ///
    /// Consome o registro, então liberar duas vezes não compila. Sem
    /// observador registrado é um no-op. O callback roda inline na thread
    /// que liberou e não deve bloquear por muito tempo.
    pub fn release(self) {
        // Drop dispara a notificação
    }
}

impl Drop for TransmissionRecord {
    fn drop(&mut self) {
        if let Some(observer) = self.on_release.take() {
            observer(&*self);
        }
    }
}

impl fmt::Debug for TransmissionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransmissionRecord")
            .field("transmission", &self.transmission)
            .field("file_name", &self.file_name)
            .field("full_path", &self.full_path)
            .field("has_observer", &self.on_release.is_some())
            .finish()
    }
}

impl PartialEq for TransmissionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.transmission == other.transmission
            && self.file_name == other.file_name
            && self.full_path == other.full_path
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
