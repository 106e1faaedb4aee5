// src/common/policy.rs
//
// Tabela ESTÁTICA de autorização: (operação, papel) -> permitido.
// A decisão acontece na camada de handlers; os services nunca recebem
// papel como parâmetro.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Admin,
    Manager,
    Receptionist,
    Waiter,
}

impl StaffRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Self::Admin),
            "MANAGER" => Some(Self::Manager),
            "RECEPTIONIST" => Some(Self::Receptionist),
            "WAITER" => Some(Self::Waiter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    // Hospedagem
    CreateStay,
    UpdateStay,
    CheckInStay,
    CheckOutStay,
    CancelStay,
    DeleteStay,
    // Reservas esportivas
    CreateReservation,
    TransitionReservation,
    UpdateReservation,
    PayReservation,
    DeleteReservation,
    // Pedidos
    CreateOrder,
    MutateOrderItems,
    PayOrder,
    CancelOrder,
    DeleteOrder,
    // Mesas
    AssignTable,
    ClearTable,
    ReserveTable,
    // Cadastros
    ManageCatalog,
}

/// A tabela em si. Admin pode tudo; os demais papéis têm recortes fixos.
pub fn is_allowed(role: StaffRole, op: Operation) -> bool {
    use Operation::*;
    use StaffRole::*;

    match role {
        Admin => true,
        Manager => !matches!(op, DeleteStay | DeleteReservation | DeleteOrder),
        Receptionist => matches!(
            op,
            CreateStay
                | UpdateStay
                | CheckInStay
                | CheckOutStay
                | CancelStay
                | CreateReservation
                | TransitionReservation
                | UpdateReservation
                | PayReservation
        ),
        Waiter => matches!(
            op,
            CreateOrder | MutateOrderItems | PayOrder | AssignTable | ClearTable | ReserveTable
        ),
    }
}

/// Conveniência para os handlers: transforma a negação em `Forbidden`.
pub fn authorize(role: StaffRole, op: Operation) -> Result<(), AppError> {
    if is_allowed(role, op) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "O papel {:?} não pode executar esta operação.",
            role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_pode_tudo() {
        assert!(is_allowed(StaffRole::Admin, Operation::DeleteOrder));
        assert!(is_allowed(StaffRole::Admin, Operation::ManageCatalog));
    }

    #[test]
    fn manager_nao_remove_registros() {
        assert!(is_allowed(StaffRole::Manager, Operation::CancelOrder));
        assert!(!is_allowed(StaffRole::Manager, Operation::DeleteStay));
        assert!(!is_allowed(StaffRole::Manager, Operation::DeleteOrder));
    }

    #[test]
    fn recepcionista_cuida_de_hospedagem_e_reservas() {
        assert!(is_allowed(StaffRole::Receptionist, Operation::CheckInStay));
        assert!(is_allowed(StaffRole::Receptionist, Operation::PayReservation));
        assert!(!is_allowed(StaffRole::Receptionist, Operation::CreateOrder));
        assert!(!is_allowed(StaffRole::Receptionist, Operation::ManageCatalog));
    }

    #[test]
    fn garcom_cuida_de_pedidos_e_mesas() {
        assert!(is_allowed(StaffRole::Waiter, Operation::AssignTable));
        assert!(!is_allowed(StaffRole::Waiter, Operation::CreateStay));
    }

    #[test]
    fn authorize_devolve_forbidden() {
        let err = authorize(StaffRole::Waiter, Operation::DeleteOrder).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn parse_de_papel_ignora_caixa() {
        assert_eq!(StaffRole::parse("waiter"), Some(StaffRole::Waiter));
        assert_eq!(StaffRole::parse("ADMIN"), Some(StaffRole::Admin));
        assert_eq!(StaffRole::parse("chef"), None);
    }
}
