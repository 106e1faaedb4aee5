// src/middleware/roles.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::common::{error::AppError, policy::StaffRole};

// Quem autentica e resolve o papel do usuário é a borda (fora deste
// serviço); aqui só chega o papel já resolvido, num cabeçalho. A decisão
// de autorização fica na tabela estática de common/policy.rs.
const ROLE_HEADER: &str = "x-role";

#[derive(Debug, Clone, Copy)]
pub struct RoleContext(pub StaffRole);

impl<S> FromRequestParts<S> for RoleContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ROLE_HEADER)
            .ok_or_else(|| AppError::Forbidden("O cabeçalho X-Role é obrigatório.".into()))?
            .to_str()
            .map_err(|_| AppError::Forbidden("Cabeçalho X-Role inválido.".into()))?;

        let role = StaffRole::parse(raw)
            .ok_or_else(|| AppError::Forbidden(format!("Papel desconhecido: {}.", raw)))?;

        Ok(RoleContext(role))
    }
}
