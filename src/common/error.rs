// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// A taxonomia de erros do domínio. Cada variante carrega a mensagem
// que o cliente HTTP vai receber; o `IntoResponse` abaixo decide o status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Entidade referenciada não existe (ou não pertence ao tenant).
    #[error("{0} não encontrado(a)")]
    NotFound(String),

    // Operação não é legal a partir do estado atual do ciclo de vida.
    #[error("Estado inválido: {0}")]
    InvalidState(String),

    // Janela sobreposta, capacidade excedida, campo único duplicado.
    #[error("Conflito: {0}")]
    Conflict(String),

    // Faixa malformada, quantidade/valor não positivo, estoque insuficiente.
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    // Política de papéis negou a operação.
    #[error("Acesso negado: {0}")]
    Forbidden(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::NotFound(ref what) => {
                (StatusCode::NOT_FOUND, format!("{} não encontrado(a).", what))
            }
            AppError::InvalidState(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone()),

            // DatabaseError e InternalServerError viram 500; o detalhe vai
            // para o log, nunca para o cliente.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
