//! Response classification
//!
//! Every HTTP response from the Evolution API is folded into an
//! [`ApiResponse`] envelope carrying a human-readable explanation of the
//! status code. On failures the explanation is enriched with the error
//! details the server nests under `response.message`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

/// Uniform result envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub status_code: Option<u16>,
    pub message: String,
    pub response: Option<Value>,
}

/// Explanation for a status code
pub fn explain_status_code(status_code: u16) -> String {
    let message = match status_code {
        200 => "Sucesso: Requisição processada com êxito.",
        201 => "Mensagem enviada.",
        400 => "Requisição inválida.",
        401 => "Não autorizado. Verifique sua API key.",
        404 => "Recurso não encontrado.",
        413 => "Tamanho do arquivo excedeu o limite.",
        429 => "Limite de requisições excedido.",
        500 => "Erro interno do servidor.",
        504 => "Tempo de espera excedido.",
        _ => return format!("❓ [{}] Código desconhecido. Conteúdo:", status_code),
    };
    message.to_string()
}

impl ApiResponse {
    /// Classify a status code and an already decoded body.
    ///
    /// Bodies that failed to decode as JSON are passed as `Value::String`
    /// holding the raw text.
    pub fn classify(status_code: u16, body: Value) -> Self {
        let success = (200..300).contains(&status_code);
        let mut message = explain_status_code(status_code);

        if !success && body.is_object() {
            message = message.trim_end_matches('.').to_string();
            if let Some(details) = error_details(&body) {
                message.push_str(": ");
                message.push_str(&details);
            }
        }

        Self {
            success,
            status_code: Some(status_code),
            message,
            response: Some(body),
        }
    }

    /// Envelope for a failure that never produced a usable response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: None,
            message: message.into(),
            response: None,
        }
    }

    /// Read and classify a `reqwest` response.
    ///
    /// Reading the body can fail mid-stream; that is reported as an
    /// envelope without status code rather than as an error.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to read response body ({}): {}", status, e);
                return Self::failure(format!("Erro ao processar resposta: {}", e));
            }
        };
        Self::classify(status, decode_body(text))
    }
}

/// Decode a body as JSON, keeping the raw text when it is not.
pub(crate) fn decode_body(text: String) -> Value {
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}

/// Flattened `response.message` details, if the server sent any.
fn error_details(body: &Value) -> Option<String> {
    let list = body.get("response")?.get("message")?.as_array()?;
    if list.is_empty() {
        return None;
    }

    match flatten_messages(list) {
        Some(items) if items.is_empty() => None,
        Some(items) => Some(items.join(", ")),
        None => Some(Value::Array(list.clone()).to_string()),
    }
}

/// Flattens `response.message` one level deep: nested lists give their
/// strings, strings give their characters, objects give their keys.
/// `None` when an element cannot be flattened into strings.
fn flatten_messages(list: &[Value]) -> Option<Vec<String>> {
    let mut items = Vec::new();
    for entry in list {
        match entry {
            Value::Array(inner) => {
                for item in inner {
                    items.push(item.as_str()?.to_string());
                }
            }
            Value::String(s) => items.extend(s.chars().map(String::from)),
            Value::Object(map) => items.extend(map.keys().cloned()),
            _ => return None,
        }
    }
    Some(items)
}
