//! Codec do formato de arquivo de transmissão.
//!
//! Layout de texto estrito, orientado a linhas:
//!
//! ```text
//! <endereço como URI absoluta>
//! Content-Type:<tipo>
//! Content-Encoding:<codificação>
//! <linha vazia>
//! <base64 do conteúdo>
//! ```
//!
//! Esses arquivos reenviam telemetria do usuário após queda de rede, então
//! um registro meio-interpretado é pior que uma rejeição: qualquer desvio do
//! layout (cabeçalhos trocados, separador ausente, base64 inválido) é
//! corrupção e aborta o decode inteiro no primeiro erro encontrado. Não é um
//! parser genérico de chave-valor; a ordem das linhas é fixa de propósito.

use crate::types::{Transmission, TransmissionRecord};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::io::{self, BufRead, Write};
use url::Url;

/// Cabeçalho da linha 2.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Cabeçalho da linha 3.
pub const CONTENT_ENCODING_HEADER: &str = "Content-Encoding";

/// Erros do codec.
///
/// Todos os erros de decode são terminais para aquele arquivo; quem decide
/// apagar, quarentenar ou logar o arquivo ruim é o chamador.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Primeira linha vazia ou ausente: sem endereço de destino")]
    MissingAddress,

    #[error("Endereço de destino inválido: {0}")]
    InvalidAddress(#[from] url::ParseError),

    #[error("Cabeçalho ausente: {0}")]
    MissingHeader(&'static str),

    #[error("Cabeçalho malformado (esperado `Nome:valor`): {0:?}")]
    MalformedHeader(String),

    #[error("Cabeçalho inesperado: esperado {expected:?}, encontrado {actual:?}")]
    UnexpectedHeader {
        expected: &'static str,
        actual: String,
    },

    #[error("Conteúdo ausente após os cabeçalhos")]
    MissingContent,

    #[error("Conteúdo não é base64 válido: {0}")]
    MalformedContent(#[from] base64::DecodeError),

    #[error("Erro de E/S: {0}")]
    Io(#[from] io::Error),
}

// ──────────────────────────────────────────────
// Encode
// ──────────────────────────────────────────────

/// Escreve uma [`Transmission`] no layout de arquivo.
///
/// O writer recebe flush antes do retorno mesmo quando uma escrita falha no
/// meio; o primeiro erro (escrita ou flush) é o que propaga. Os valores de
/// cabeçalho saem crus, sem escape: manter `:` e quebras de linha fora deles
/// é contrato do chamador.
pub fn encode_transmission<W: Write>(
    transmission: &Transmission,
    writer: &mut W,
) -> io::Result<()> {
    let result = write_layout(transmission, writer);
    let flushed = writer.flush();
    result.and(flushed)
}

fn write_layout<W: Write>(transmission: &Transmission, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{}", transmission.address)?;
    writeln!(
        writer,
        "{CONTENT_TYPE_HEADER}:{}",
        transmission.content_type
    )?;
    writeln!(
        writer,
        "{CONTENT_ENCODING_HEADER}:{}",
        transmission.content_encoding
    )?;
    writeln!(writer)?;
    // Token base64 único, sem quebras de linha
    writer.write_all(BASE64.encode(&transmission.content).as_bytes())
}

// ──────────────────────────────────────────────
// Decode
// ──────────────────────────────────────────────

/// Decodifica o layout de arquivo em um [`TransmissionRecord`].
///
/// `file_name` vem do chamador (derivado do caminho do arquivo, nunca
/// adivinhado aqui) e entra no registro como nome e como caminho inicial.
pub fn decode_record<R: BufRead>(
    reader: &mut R,
    file_name: &str,
) -> Result<TransmissionRecord, CodecError> {
    let transmission = decode_transmission(reader)?;
    Ok(TransmissionRecord::new(transmission, file_name))
}

/// Decodifica o layout de arquivo, validando linha a linha na ordem fixa.
pub fn decode_transmission<R: BufRead>(reader: &mut R) -> Result<Transmission, CodecError> {
    // Linha 1: endereço
    let address = match read_line(reader)? {
        Some(line) if !line.is_empty() => Url::parse(&line)?,
        _ => return Err(CodecError::MissingAddress),
    };

    // Linhas 2 e 3: cabeçalhos em ordem fixa (tipo antes de codificação)
    let content_type = read_header(reader, CONTENT_TYPE_HEADER)?;
    let content_encoding = read_header(reader, CONTENT_ENCODING_HEADER)?;

    // Restante do stream: separador em branco + token base64.
    // O writer pode ter quebrado o token em linhas; o reader trata tudo
    // como um bloco só e descarta whitespace antes de decodificar.
    let mut rest = String::new();
    reader.read_to_string(&mut rest)?;
    let compact: String = rest.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(CodecError::MissingContent);
    }
    let content = BASE64.decode(compact.as_bytes())?;

    Ok(Transmission {
        address,
        content,
        content_type,
        content_encoding,
    })
}

/// Lê uma linha sem o terminador; `None` em fim de stream.
fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}

/// Valida uma linha de cabeçalho: split em `:` com exatamente duas partes e
/// nome exato (case-sensitive). Valor com `:` extra é rejeitado — afrouxar
/// isso mascararia corrupção real.
fn read_header<R: BufRead>(
    reader: &mut R,
    expected: &'static str,
) -> Result<String, CodecError> {
    let line = match read_line(reader)? {
        Some(line) if !line.is_empty() => line,
        _ => return Err(CodecError::MissingHeader(expected)),
    };

    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() != 2 {
        return Err(CodecError::MalformedHeader(line));
    }
    if parts[0] != expected {
        return Err(CodecError::UnexpectedHeader {
            expected,
            actual: parts[0].to_string(),
        });
    }

    Ok(parts[1].trim().to_string())
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
