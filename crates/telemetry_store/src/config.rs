//! Configuração do buffer de transmissões via TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Configuração do armazenamento de transmissões.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Extensão dos arquivos de transmissão prontos para retry
    pub extension: String,
    /// Extensão dos arquivos ainda em gravação (invisíveis ao scanner)
    pub temp_extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            extension: "trn".into(),
            temp_extension: "tmp".into(),
        }
    }
}

impl StoreConfig {
    /// Carrega configuração de um arquivo TOML, com fallback para o padrão.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<StoreConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        StoreConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (label, ext) in [
            ("extension", &self.extension),
            ("temp_extension", &self.temp_extension),
        ] {
            if ext.is_empty() {
                errors.push(format!("{label} não pode ser vazia"));
            }
            if ext.starts_with('.') {
                errors.push(format!("{label} não deve incluir o ponto: {ext:?}"));
            }
        }

        if self.extension == self.temp_extension {
            errors.push(format!(
                "extension e temp_extension não podem ser iguais: {:?}",
                self.extension
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = StoreConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn roundtrip_toml() {
        let config = StoreConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: StoreConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.extension, parsed.extension);
        assert_eq!(config.temp_extension, parsed.temp_extension);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"extension = "queued""#;
        let config: StoreConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.extension, "queued");
        // Outros campos devem ter valor padrão
        assert_eq!(config.temp_extension, "tmp");
    }

    #[test]
    fn rejects_dotted_or_equal_extensions() {
        let config = StoreConfig {
            extension: ".trn".into(),
            temp_extension: ".trn".into(),
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 3);
    }
}
