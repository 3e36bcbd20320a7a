//! Carga e persistência de arquivos de transmissão.
//!
//! Caminho de carga: abrir o arquivo, derivar o nome-base do caminho e
//! decodificar via [`codec`]. Caminho de gravação: codificar em um arquivo
//! `.tmp` (com flush garantido) e renomear para a extensão final, para que
//! um scanner de diretório concorrente nunca enxergue registro parcial.
//!
//! [`codec`]: crate::codec

use crate::codec::{self, CodecError};
use crate::config::StoreConfig;
use crate::types::{Transmission, TransmissionRecord};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

/// Carrega um registro de um arquivo existente.
///
/// O nome do registro vem do nome-base do caminho; o caminho completo fica
/// anexado para o dono apagar o arquivo depois. Em caso de erro o arquivo
/// não é tocado — apagar ou quarentenar é decisão do chamador.
pub fn load_from_file(path: &Path) -> Result<TransmissionRecord, CodecError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut record = codec::decode_record(&mut reader, &file_name)?;
    record.set_full_path(path);

    debug!("Transmissão carregada de {}", path.display());
    Ok(record)
}

/// Persiste uma transmissão em `dir` sob um nome novo e único.
///
/// Retorna o registro apontando para o arquivo recém-gravado, pronto para o
/// gerenciador de fila assumir a posse.
pub fn save_to_directory(
    transmission: Transmission,
    dir: &Path,
    config: &StoreConfig,
) -> Result<TransmissionRecord, CodecError> {
    let base = Uuid::new_v4().simple().to_string();
    let file_name = format!("{base}.{}", config.extension);
    let temp_path = dir.join(format!("{base}.{}", config.temp_extension));
    let final_path = dir.join(&file_name);

    let file = File::create(&temp_path)?;
    let mut writer = BufWriter::new(file);
    let written = codec::encode_transmission(&transmission, &mut writer);
    drop(writer);

    if let Err(e) = written {
        warn!("Falha ao gravar {}: {e}", temp_path.display());
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&temp_path, &final_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    debug!("Transmissão persistida em {}", final_path.display());

    let mut record = TransmissionRecord::new(transmission, file_name);
    record.set_full_path(final_path);
    Ok(record)
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn sample_transmission() -> Transmission {
        Transmission::new(
            Url::parse("https://ingest.example/v1").unwrap(),
            b"Hello".to_vec(),
            "application/json",
            "gzip",
        )
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::default();

        let saved = save_to_directory(sample_transmission(), dir.path(), &config).unwrap();
        let loaded = load_from_file(saved.full_path()).unwrap();

        assert_eq!(loaded.transmission, sample_transmission());
        assert_eq!(loaded.file_name, saved.file_name);
        assert_eq!(loaded.full_path(), saved.full_path());
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::default();

        let record = save_to_directory(sample_transmission(), dir.path(), &config).unwrap();

        assert!(record.file_name.ends_with(".trn"));
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "sobrou arquivo temporário: {leftovers:?}");
    }

    #[test]
    fn saved_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::default();

        let first = save_to_directory(sample_transmission(), dir.path(), &config).unwrap();
        let second = save_to_directory(sample_transmission(), dir.path(), &config).unwrap();
        assert_ne!(first.file_name, second.file_name);
    }

    #[test]
    fn load_derives_file_name_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pending.trn");
        fs::write(
            &path,
            "https://ingest.example/v1\nContent-Type:application/json\nContent-Encoding:gzip\n\nSGVsbG8=",
        )
        .unwrap();

        let record = load_from_file(&path).unwrap();
        assert_eq!(record.file_name, "pending.trn");
        assert_eq!(record.full_path(), path);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_from_file(&dir.path().join("nao-existe.trn"));
        assert!(matches!(result, Err(CodecError::Io(_))));
    }

    #[test]
    fn load_rejects_corrupted_file_and_keeps_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrompido.trn");
        fs::write(&path, "isto não é um arquivo de transmissão").unwrap();

        assert!(load_from_file(&path).is_err());
        // O arquivo ruim continua no disco: quarentena é decisão do dono
        assert!(path.exists());
    }

    #[test]
    fn release_after_load_lets_owner_delete_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::default();

        let saved = save_to_directory(sample_transmission(), dir.path(), &config).unwrap();
        let path = saved.full_path().to_path_buf();

        let mut record = load_from_file(&path).unwrap();
        record.set_on_release(|r| {
            fs::remove_file(r.full_path()).unwrap();
        });
        record.release();

        assert!(!path.exists());
    }
}
