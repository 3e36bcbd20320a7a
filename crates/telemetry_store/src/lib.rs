//! # Telemetry Store
//!
//! Buffer durável em disco para transmissões de telemetria: payloads que não
//! puderam ser enviados sobrevivem a reinícios de processo e quedas de rede
//! gravados em um formato de texto estrito, e são recarregados depois para
//! retry. O parser rejeita qualquer arquivo malformado — registro corrompido
//! nunca vira request de saída com cabeçalho errado ou corpo truncado.
//!
//! ## Módulos
//! - [`types`] – [`Transmission`] e [`TransmissionRecord`] com notificação de descarte
//! - [`codec`] – Encode/decode estrito do layout de arquivo
//! - [`storage`] – Carga de arquivos e gravação via tmp + rename
//! - [`config`] – Configuração via TOML

pub mod codec;
pub mod config;
pub mod storage;
pub mod types;

// Re-exports convenientes
pub use codec::{decode_record, decode_transmission, encode_transmission, CodecError};
pub use config::StoreConfig;
pub use storage::{load_from_file, save_to_directory};
pub use types::{Transmission, TransmissionRecord};
